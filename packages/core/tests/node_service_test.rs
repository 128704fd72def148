//! Node Service Tests
//!
//! Verifies the CRUD orchestration rules: server-assigned identity,
//! field-preserving patches, and not-found outcomes conveyed as values
//! rather than errors.

#[cfg(test)]
mod node_service_tests {
    use anyhow::Result;
    use mindmesh_core::db::{DatabaseService, LibsqlStore};
    use mindmesh_core::models::{NodeDraft, NodePatch, NodeType};
    use mindmesh_core::services::{NodeService, NodeServiceError};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn create_test_service() -> Result<(NodeService, TempDir)> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await?);
        Ok((NodeService::new(Arc::new(LibsqlStore::new(db))), temp_dir))
    }

    fn draft(title: &str, x: f64, y: f64, node_type: NodeType) -> NodeDraft {
        NodeDraft {
            title: title.to_string(),
            description: None,
            x,
            y,
            color: None,
            node_type,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_echoes_fields() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let input = NodeDraft {
            title: "Main Idea".to_string(),
            description: Some("The central concept".to_string()),
            x: 100.0,
            y: 200.0,
            color: Some("#FF5733".to_string()),
            node_type: NodeType::Idea,
        };
        let created = service.create_node(input.clone()).await?;

        assert!(created.id > 0);
        assert_eq!(created.title, input.title);
        assert_eq!(created.description, input.description);
        assert_eq!(created.x, input.x);
        assert_eq!(created.y, input.y);
        assert_eq!(created.color, input.color);
        assert_eq!(created.node_type, input.node_type);
        assert!(created.connection_ids.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let result = service.create_node(draft("  ", 0.0, 0.0, NodeType::Note)).await;
        assert!(matches!(
            result,
            Err(NodeServiceError::ValidationFailed(_))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_with_non_numeric_id_is_invalid_input() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        // Never not-found, never a storage error
        let result = service.get_node("not-a-number").await;
        assert!(matches!(result, Err(NodeServiceError::InvalidId { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_node_is_none() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        assert!(service.get_node("12345").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_all_mutable_fields() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let created = service
            .create_node(NodeDraft {
                title: "Before".to_string(),
                description: Some("old".to_string()),
                x: 1.0,
                y: 2.0,
                color: Some("#000000".to_string()),
                node_type: NodeType::Idea,
            })
            .await?;

        let updated = service
            .update_node(
                &created.id.to_string(),
                NodeDraft {
                    title: "After".to_string(),
                    description: None,
                    x: 3.0,
                    y: 4.0,
                    color: None,
                    node_type: NodeType::Decision,
                },
            )
            .await?
            .expect("node should exist");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "After");
        // Full replacement clears fields omitted from the payload
        assert!(updated.description.is_none());
        assert!(updated.color.is_none());
        assert_eq!(updated.node_type, NodeType::Decision);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_node_returns_none() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let result = service
            .update_node("999", draft("X", 0.0, 0.0, NodeType::Task))
            .await?;
        assert!(result.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_patch_color_leaves_other_fields_unchanged() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let created = service
            .create_node(NodeDraft {
                title: "Stable".to_string(),
                description: Some("desc".to_string()),
                x: 10.0,
                y: 20.0,
                color: Some("#FF0000".to_string()),
                node_type: NodeType::Task,
            })
            .await?;

        let patched = service
            .patch_node(
                &created.id.to_string(),
                NodePatch {
                    color: Some("#00FF00".to_string()),
                    ..Default::default()
                },
            )
            .await?
            .expect("node should exist");

        assert_eq!(patched.color.as_deref(), Some("#00FF00"));
        assert_eq!(patched.title, "Stable");
        assert_eq!(patched.description.as_deref(), Some("desc"));
        assert_eq!(patched.x, 10.0);
        assert_eq!(patched.y, 20.0);
        assert_eq!(patched.node_type, NodeType::Task);

        Ok(())
    }

    #[tokio::test]
    async fn test_patch_missing_node_returns_none() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let result = service
            .patch_node(
                "424242",
                NodePatch {
                    title: Some("ghost".to_string()),
                    ..Default::default()
                },
            )
            .await?;
        assert!(result.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_node_is_false_without_side_effects() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let survivor = service.create_node(draft("Keep", 0.0, 0.0, NodeType::Note)).await?;

        assert!(!service.delete_node("777777").await?);

        // Existing data untouched
        let all = service.list_nodes().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, survivor.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let created = service.create_node(draft("Gone", 0.0, 0.0, NodeType::Idea)).await?;
        let id = created.id.to_string();

        assert!(service.delete_node(&id).await?);
        assert!(service.get_node(&id).await?.is_none());

        Ok(())
    }
}
