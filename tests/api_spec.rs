use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use dragon_scales::api::create_router;
use dragon_scales::models::*;
use dragon_scales::workspace::Workspace;

fn setup() -> TestServer {
    let app = create_router(Workspace::new());
    TestServer::new(app).expect("Failed to create test server")
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap()
}

async fn create_entity(
    server: &TestServer,
    id: &str,
    name: &str,
    entity_type: EntityType,
    parent: Option<&str>,
    minute: u32,
) -> Entity {
    let response = server
        .post("/api/v1/entities")
        .json(&CreateEntityInput {
            entity_type,
            name: name.to_string(),
            parent_id: parent.map(EntityId::from),
            user: None,
            id: Some(EntityId::from(id)),
            created_at: Some(at(minute)),
        })
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Entity>()
}

/// lib-1 > notebook-1 > {project-a, project-b > step-1 (cb-1: "draft")}
async fn seed(server: &TestServer) {
    create_entity(server, "lib-1", "Field Notes", EntityType::Library, None, 0).await;
    create_entity(server, "notebook-1", "Bench Log", EntityType::Notebook, Some("lib-1"), 0).await;
    create_entity(server, "project-a", "Project A", EntityType::Project, Some("notebook-1"), 0).await;
    create_entity(server, "project-b", "Project B", EntityType::Project, Some("notebook-1"), 5).await;
    create_entity(server, "step-1", "Mix buffer", EntityType::Step, Some("project-b"), 6).await;

    server
        .post("/api/v1/entities/notebook-1/comments")
        .json(&CreateCommentInput {
            comment_type: CommentType::Note,
            content: "comment-x".to_string(),
            created_at: Some(at(2)),
        })
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/api/v1/entities/step-1/content-blocks")
        .json(&CreateContentBlockInput {
            content: "draft".to_string(),
            id: Some(ContentBlockId::from("cb-1")),
        })
        .await
        .assert_status(StatusCode::CREATED);
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

mod entities {
    use super::*;

    #[tokio::test]
    async fn creates_and_fetches_an_entity() {
        let server = setup();
        seed(&server).await;

        let response = server.get("/api/v1/entities/notebook-1").await;

        response.assert_status_ok();
        let entity: Entity = response.json();
        assert_eq!(entity.name, "Bench Log");
        assert_eq!(entity.parent_id, Some(EntityId::from("lib-1")));
        assert_eq!(
            entity.child_ids,
            vec![EntityId::from("project-a"), EntityId::from("project-b")]
        );
        assert_eq!(entity.comments.len(), 1);
    }

    #[tokio::test]
    async fn returns_only_the_name_when_asked() {
        let server = setup();
        seed(&server).await;

        let response = server
            .get("/api/v1/entities/lib-1")
            .add_query_param("name_only", true)
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body, serde_json::json!({ "name": "Field Notes" }));
    }

    #[tokio::test]
    async fn lists_libraries() {
        let server = setup();
        seed(&server).await;

        let libraries: Vec<Entity> = server.get("/api/v1/libraries").await.json();

        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].id, EntityId::from("lib-1"));
    }

    #[tokio::test]
    async fn returns_404_for_unknown_entity() {
        let server = setup();

        let response = server.get("/api/v1/entities/nope").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn rejects_a_step_directly_under_a_library() {
        let server = setup();
        create_entity(&server, "lib-1", "Field Notes", EntityType::Library, None, 0).await;

        let response = server
            .post("/api/v1/entities")
            .json(&CreateEntityInput {
                entity_type: EntityType::Step,
                name: "Orphan".to_string(),
                parent_id: Some(EntityId::from("lib-1")),
                user: None,
                id: None,
                created_at: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_a_duplicate_id() {
        let server = setup();
        create_entity(&server, "lib-1", "Field Notes", EntityType::Library, None, 0).await;

        let response = server
            .post("/api/v1/entities")
            .json(&CreateEntityInput {
                entity_type: EntityType::Library,
                name: "Again".to_string(),
                parent_id: None,
                user: None,
                id: Some(EntityId::from("lib-1")),
                created_at: None,
            })
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn returns_404_when_commenting_on_unknown_entity() {
        let server = setup();

        let response = server
            .post("/api/v1/entities/nope/comments")
            .json(&CreateCommentInput {
                comment_type: CommentType::Question,
                content: "hello?".to_string(),
                created_at: None,
            })
            .await;

        response.assert_status_not_found();
    }
}

mod tree {
    use super::*;

    #[tokio::test]
    async fn returns_descendants_without_the_root() {
        let server = setup();
        seed(&server).await;

        let response = server.get("/api/v1/entities/lib-1/tree").await;

        response.assert_status_ok();
        let nodes: Vec<TreeNode> = response.json();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label, "Bench Log");
        assert_eq!(nodes[0].children.len(), 2);
        assert_eq!(nodes[0].children[1].children[0].label, "Mix buffer");
    }

    #[tokio::test]
    async fn returns_404_for_unknown_root() {
        let server = setup();

        let response = server.get("/api/v1/entities/nope/tree").await;

        response.assert_status_not_found();
    }
}

mod timeline {
    use super::*;

    #[tokio::test]
    async fn interleaves_children_and_comments_by_time() {
        let server = setup();
        seed(&server).await;

        let response = server.get("/api/v1/entities/notebook-1/timeline").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let kinds: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["entity", "comment", "entity"]);
        assert_eq!(body[0]["id"], "project-a");
        assert_eq!(body[1]["content"], "comment-x");
        assert_eq!(body[2]["id"], "project-b");
    }
}

mod content_blocks {
    use super::*;

    #[tokio::test]
    async fn appends_and_lists_versions() {
        let server = setup();
        seed(&server).await;

        let response = server
            .post("/api/v1/content-blocks/cb-1/versions")
            .json(&AppendVersionInput {
                content: "draft v2".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let appended: VersionAppended = response.json();
        assert_eq!(appended.version_index, 1);

        let history: Vec<String> = server
            .get("/api/v1/content-blocks/cb-1/versions")
            .await
            .json();
        assert_eq!(history, vec!["draft", "draft v2"]);

        let block: ContentBlock = server.get("/api/v1/content-blocks/cb-1").await.json();
        assert_eq!(block.current(), Some("draft v2"));
    }

    #[tokio::test]
    async fn rejects_blocks_on_non_step_entities() {
        let server = setup();
        seed(&server).await;

        let response = server
            .post("/api/v1/entities/project-a/content-blocks")
            .json(&CreateContentBlockInput {
                content: "nope".to_string(),
                id: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn returns_404_for_unknown_block() {
        let server = setup();

        server
            .get("/api/v1/content-blocks/missing/versions")
            .await
            .assert_status_not_found();
        server
            .post("/api/v1/content-blocks/missing/versions")
            .json(&AppendVersionInput {
                content: "x".to_string(),
            })
            .await
            .assert_status_not_found();
    }
}
