//! GraphQL facade - schema, resolvers and error mapping
//!
//! Resolvers validate input, run store calls on the blocking thread pool and
//! map domain rows into response types. Every write that touches more than
//! one table happens inside a single store transaction.

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};

use crate::model::DEFAULT_PAGE_SIZE;
use crate::storage::SqliteStore;
use crate::Error;

pub mod error;
pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// GraphQL schema type
pub type GameGraphSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Shared state available to every resolver
#[derive(Clone)]
pub struct GraphContext {
    pub store: SqliteStore,
    pub page_size: u32,
}

/// Create the GraphQL schema
pub fn build_schema(store: SqliteStore, page_size: u32) -> GameGraphSchema {
    let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(GraphContext { store, page_size })
        .finish()
}

/// Run a store call on the blocking pool and map its error for the client
pub(crate) async fn with_store<T, F>(ctx: &Context<'_>, f: F) -> async_graphql::Result<T>
where
    F: FnOnce(&SqliteStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = ctx.data::<GraphContext>()?.store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(Error::from)
        .and_then(|result| result)
        .map_err(|e| e.extend())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::ServerError;
    use serde_json::{json, Value};

    fn schema() -> GameGraphSchema {
        build_schema(SqliteStore::open_in_memory().unwrap(), 2)
    }

    async fn execute(schema: &GameGraphSchema, query: &str) -> Value {
        let response = schema.execute(query).await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().unwrap()
    }

    async fn execute_err(schema: &GameGraphSchema, query: &str) -> ServerError {
        let response = schema.execute(query).await;
        response.errors.into_iter().next().expect("expected an error")
    }

    fn code(err: &ServerError) -> Value {
        serde_json::to_value(err).unwrap()["extensions"]["code"].clone()
    }

    async fn create_editor(schema: &GameGraphSchema, name: &str) -> String {
        let data = execute(
            schema,
            &format!(r#"mutation {{ createEditor(input: {{ name: "{name}" }}) {{ id }} }}"#),
        )
        .await;
        data["createEditor"]["id"].as_str().unwrap().to_string()
    }

    async fn create_zelda(schema: &GameGraphSchema, editor_id: &str) -> String {
        let data = execute(
            schema,
            &format!(
                r#"mutation {{
                    createGame(input: {{ name: "Zelda", platform: "Switch", genres: ["Adventure"], editorIDs: ["{editor_id}"] }}) {{
                        id name platform publicationDate
                    }}
                }}"#
            ),
        )
        .await;
        let game = &data["createGame"];
        assert_eq!(game["name"], "Zelda");
        assert_eq!(game["publicationDate"], 0);
        game["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_game_with_editor() {
        let schema = schema();
        let nintendo = create_editor(&schema, "Nintendo").await;
        let game = create_zelda(&schema, &nintendo).await;
        assert!(!game.is_empty());

        let data = execute(
            &schema,
            &format!(r#"{{ game(id: "{game}") {{ name platform genres editorIDs editors {{ name }} }} }}"#),
        )
        .await;
        assert_eq!(
            data["game"],
            json!({
                "name": "Zelda",
                "platform": "Switch",
                "genres": ["Adventure"],
                "editorIDs": [nintendo],
                "editors": [{ "name": "Nintendo" }],
            })
        );
    }

    #[tokio::test]
    async fn test_update_game_replaces_editors() {
        let schema = schema();
        let nintendo = create_editor(&schema, "Nintendo").await;
        let game = create_zelda(&schema, &nintendo).await;

        execute(
            &schema,
            &format!(
                r#"mutation {{
                    updateGame(id: "{game}", input: {{ name: "Zelda BOTW", platform: "Wii U", publicationDate: 2017, editorIDs: [] }}) {{ id }}
                }}"#
            ),
        )
        .await;

        let data = execute(
            &schema,
            &format!(r#"{{ game(id: "{game}") {{ name platform publicationDate editorIDs studioIDs }} }}"#),
        )
        .await;
        assert_eq!(
            data["game"],
            json!({
                "name": "Zelda BOTW",
                "platform": "Wii U",
                "publicationDate": 2017,
                "editorIDs": [],
                "studioIDs": [],
            })
        );
    }

    #[tokio::test]
    async fn test_delete_game_then_lookup() {
        let schema = schema();
        let nintendo = create_editor(&schema, "Nintendo").await;
        let game = create_zelda(&schema, &nintendo).await;

        let data = execute(&schema, &format!(r#"mutation {{ deleteGame(id: "{game}") }}"#)).await;
        assert_eq!(data["deleteGame"], game);

        let err = execute_err(&schema, &format!(r#"{{ game(id: "{game}") {{ id }} }}"#)).await;
        assert_eq!(code(&err), "NOT_FOUND");

        let err = execute_err(&schema, &format!(r#"mutation {{ deleteGame(id: "{game}") }}"#)).await;
        assert_eq!(code(&err), "NOT_FOUND");

        // The editor no longer lists the game
        let data = execute(&schema, &format!(r#"{{ editor(id: "{nintendo}") {{ games {{ id }} }} }}"#)).await;
        assert_eq!(data["editor"]["games"], json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_editor_name() {
        let schema = schema();
        create_editor(&schema, "Nintendo").await;

        let err = execute_err(&schema, r#"mutation { createEditor(input: { name: "Nintendo" }) { id } }"#).await;
        assert_eq!(code(&err), "ALREADY_EXISTS");

        let data = execute(&schema, "{ editors { name } }").await;
        assert_eq!(data["editors"], json!([{ "name": "Nintendo" }]));
    }

    #[tokio::test]
    async fn test_update_missing_studio() {
        let schema = schema();
        let err = execute_err(&schema, r#"mutation { updateStudio(id: "12", input: { name: "Ghost" }) { id } }"#).await;
        assert_eq!(code(&err), "NOT_FOUND");

        let data = execute(&schema, "{ studios { id } }").await;
        assert_eq!(data["studios"], json!([]));
    }

    #[tokio::test]
    async fn test_studio_lifecycle() {
        let schema = schema();
        let data = execute(&schema, r#"mutation { createStudio(input: { name: "Retro" }) { id name } }"#).await;
        let id = data["createStudio"]["id"].as_str().unwrap().to_string();

        let data = execute(
            &schema,
            &format!(r#"mutation {{ updateStudio(id: "{id}", input: {{ name: "Retro Studios" }}) {{ name }} }}"#),
        )
        .await;
        assert_eq!(data["updateStudio"]["name"], "Retro Studios");

        let data = execute(&schema, &format!(r#"{{ studio(id: "{id}") {{ name games {{ id }} }} }}"#)).await;
        assert_eq!(data["studio"], json!({ "name": "Retro Studios", "games": [] }));

        let data = execute(&schema, &format!(r#"mutation {{ deleteStudio(id: "{id}") }}"#)).await;
        assert_eq!(data["deleteStudio"], id);
    }

    #[tokio::test]
    async fn test_unknown_editor_rolls_back_create() {
        let schema = schema();
        let err = execute_err(
            &schema,
            r#"mutation { createGame(input: { name: "Orphan", platform: "PC", editorIDs: ["404"] }) { id } }"#,
        )
        .await;
        assert_eq!(code(&err), "NOT_FOUND");

        let data = execute(&schema, "{ games { infos { count } } }").await;
        assert_eq!(data["games"]["infos"]["count"], 0);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let schema = schema();
        let err = execute_err(&schema, r#"mutation { createEditor(input: { name: "  " }) { id } }"#).await;
        assert_eq!(code(&err), "BAD_USER_INPUT");
    }

    #[tokio::test]
    async fn test_games_pagination_infos() {
        let schema = schema();
        for name in ["A", "B", "C"] {
            execute(
                &schema,
                &format!(r#"mutation {{ createGame(input: {{ name: "{name}", platform: "PC" }}) {{ id }} }}"#),
            )
            .await;
        }

        let data = execute(
            &schema,
            "{ games { infos { count pages nextPage previousPages } results { name } } }",
        )
        .await;
        assert_eq!(
            data["games"],
            json!({
                "infos": { "count": 3, "pages": 2, "nextPage": 2, "previousPages": null },
                "results": [{ "name": "A" }, { "name": "B" }],
            })
        );

        let data = execute(&schema, "{ games(page: 2) { infos { nextPage previousPages } results { name } } }").await;
        assert_eq!(
            data["games"],
            json!({
                "infos": { "nextPage": null, "previousPages": 1 },
                "results": [{ "name": "C" }],
            })
        );

        let err = execute_err(&schema, "{ games(page: 0) { infos { count } } }").await;
        assert_eq!(code(&err), "BAD_USER_INPUT");
    }
}
