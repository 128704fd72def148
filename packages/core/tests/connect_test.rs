//! Connection Management Tests
//!
//! Verifies connect semantics: one-shot edge creation, idempotent repeats
//! reported as "not applied", and symmetric adjacency in listings.

#[cfg(test)]
mod connect_tests {
    use anyhow::Result;
    use mindmesh_core::db::{DatabaseService, LibsqlStore};
    use mindmesh_core::models::{ConnectRequest, Node, NodeDraft, NodeType};
    use mindmesh_core::services::{NodeService, NodeServiceError};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::broadcast::error::TryRecvError;

    async fn create_test_service() -> Result<(NodeService, TempDir)> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await?);
        Ok((NodeService::new(Arc::new(LibsqlStore::new(db))), temp_dir))
    }

    async fn create_node(
        service: &NodeService,
        title: &str,
        x: f64,
        y: f64,
        node_type: NodeType,
    ) -> Result<Node> {
        Ok(service
            .create_node(NodeDraft {
                title: title.to_string(),
                description: None,
                x,
                y,
                color: None,
                node_type,
            })
            .await?)
    }

    fn connect(a: i64, b: i64) -> ConnectRequest {
        ConnectRequest {
            source_id: a.to_string(),
            target_id: b.to_string(),
        }
    }

    #[tokio::test]
    async fn test_connect_succeeds_exactly_once() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let a = create_node(&service, "A", 0.0, 0.0, NodeType::Idea).await?;
        let b = create_node(&service, "B", 10.0, 10.0, NodeType::Note).await?;

        assert!(service.connect_nodes(connect(a.id, b.id)).await?);

        // Second identical call: not applied, no duplicate edge
        assert!(!service.connect_nodes(connect(a.id, b.id)).await?);

        let fetched = service.get_node(&a.id.to_string()).await?.unwrap();
        assert_eq!(fetched.connection_ids, vec![b.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_connect_is_direction_agnostic() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let a = create_node(&service, "A", 0.0, 0.0, NodeType::Idea).await?;
        let b = create_node(&service, "B", 1.0, 1.0, NodeType::Note).await?;

        assert!(service.connect_nodes(connect(a.id, b.id)).await?);
        // Reversed pair is the same undirected edge
        assert!(!service.connect_nodes(connect(b.id, a.id)).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_connect_missing_node_is_not_applied() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let a = create_node(&service, "A", 0.0, 0.0, NodeType::Idea).await?;

        // Missing target: a normal negative outcome, not an error
        assert!(!service.connect_nodes(connect(a.id, 999)).await?);
        assert!(!service.connect_nodes(connect(999, a.id)).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_self_connect_is_not_applied() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let a = create_node(&service, "A", 0.0, 0.0, NodeType::Idea).await?;
        let mut rx = service.subscribe_to_events();

        // Not applied, no stored edge, no broadcast
        assert!(!service.connect_nodes(connect(a.id, a.id)).await?);
        assert!(!service.connect_nodes(connect(a.id, a.id)).await?);

        let fetched = service.get_node(&a.id.to_string()).await?.unwrap();
        assert!(fetched.connection_ids.is_empty());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        Ok(())
    }

    #[tokio::test]
    async fn test_connect_rejects_blank_and_malformed_ids() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let blank = service
            .connect_nodes(ConnectRequest {
                source_id: "".to_string(),
                target_id: "2".to_string(),
            })
            .await;
        assert!(matches!(
            blank,
            Err(NodeServiceError::ValidationFailed(_))
        ));

        let malformed = service
            .connect_nodes(ConnectRequest {
                source_id: "one".to_string(),
                target_id: "2".to_string(),
            })
            .await;
        assert!(matches!(
            malformed,
            Err(NodeServiceError::InvalidId { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_end_to_end_connect_scenario() -> Result<()> {
        let (service, _temp_dir) = create_test_service().await?;

        let a = create_node(&service, "Root", 0.0, 0.0, NodeType::Idea).await?;
        let b = create_node(&service, "Child", 10.0, 10.0, NodeType::Note).await?;

        assert!(service.connect_nodes(connect(a.id, b.id)).await?);

        // Listing shows the adjacency from both sides
        let all = service.list_nodes().await?;
        let root = all.iter().find(|n| n.id == a.id).unwrap();
        let child = all.iter().find(|n| n.id == b.id).unwrap();
        assert!(root.connection_ids.contains(&b.id));
        assert!(child.connection_ids.contains(&a.id));

        assert!(!service.connect_nodes(connect(a.id, b.id)).await?);

        Ok(())
    }
}
