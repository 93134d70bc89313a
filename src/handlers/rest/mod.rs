use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_macros::debug_handler;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, DeleteNoteResponse, ErrorResponse, NoteResponse, UpdateNoteRequest},
    service::{NoteService, NoteServiceError},
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, update_note, delete_note, get_one_note, get_all_notes),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/notes", get(get_all_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_one_note).put(update_note).delete(delete_note),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

impl IntoResponse for NoteServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Ids that are not valid integers can never match a stored note.
fn parse_id(raw: &str) -> Result<i64, NoteServiceError> {
    raw.parse().map_err(|_| NoteServiceError::NotFound)
}

async fn root() -> Response {
    (StatusCode::OK, "Hello world!").into_response()
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Title or content missing", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => {
            tracing::debug!("created note {}", note.id);
            (StatusCode::CREATED, Json(note)).into_response()
        }
        Err(e) => {
            tracing::warn!("rejected note creation: {}", e);
            e.into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    let result = match parse_id(&id) {
        Ok(id) => service.update_note(id, payload).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(note) => {
            tracing::debug!("updated note {}", note.id);
            (StatusCode::OK, Json(note)).into_response()
        }
        Err(e) => {
            tracing::info!("note '{}' not found for update", id);
            e.into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteNoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    let result = match parse_id(&id) {
        Ok(id) => service.delete_note(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(note) => {
            tracing::debug!("deleted note {}", note.id);
            let body = DeleteNoteResponse {
                message: "Note deleted".to_string(),
                deleted_note: note,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::info!("note '{}' not found for deletion", id);
            e.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    let result = match parse_id(&id) {
        Ok(id) => service.get_one_note(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => {
            tracing::info!("note '{}' not found", id);
            e.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "List of all notes", body = Vec<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    let notes = service.get_all_notes().await;

    (StatusCode::OK, Json(notes)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, header},
    };
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn fresh_router() -> Router {
        let repo = Arc::new(tokio::sync::Mutex::new(Repository::new()));
        router(Arc::new(NoteService::new(repo)))
    }

    #[fixture]
    fn app() -> Router {
        fresh_router()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is JSON")
        };

        (status, value)
    }

    async fn create(app: &Router, title: &str, content: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/notes",
            Some(json!({ "title": title, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[rstest]
    #[tokio::test]
    async fn list_starts_empty(app: Router) {
        let (status, body) = send(&app, Method::GET, "/notes", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[rstest]
    #[tokio::test]
    async fn create_returns_created_note(app: Router) {
        let body = create(&app, "Test Title", "Test Content").await;

        assert_eq!(
            body,
            json!({ "id": 1, "title": "Test Title", "content": "Test Content" })
        );
    }

    #[rstest]
    #[case(json!({ "title": "A" }))]
    #[case(json!({ "content": "B" }))]
    #[case(json!({}))]
    #[case(json!({ "title": null, "content": "B" }))]
    #[tokio::test]
    async fn create_without_required_fields_is_bad_request(app: Router, #[case] payload: Value) {
        let (status, body) = send(&app, Method::POST, "/notes", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Title and content are required" }));

        let (_, notes) = send(&app, Method::GET, "/notes", None).await;
        assert_eq!(notes, json!([]));
    }

    #[rstest]
    #[tokio::test]
    async fn get_by_id_returns_created_note(app: Router) {
        let created = create(&app, "Test Title", "Test Content").await;

        let (status, body) = send(&app, Method::GET, "/notes/1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);
    }

    #[rstest]
    #[case("/notes/999")]
    #[case("/notes/abc")]
    #[case("/notes/1.5")]
    #[tokio::test]
    async fn get_unknown_id_is_not_found(app: Router, #[case] uri: &str) {
        let (status, body) = send(&app, Method::GET, uri, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Note not found" }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_title_and_content(app: Router) {
        create(&app, "Old Title", "Old Content").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/notes/1",
            Some(json!({ "title": "New Title", "content": "New Content" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "id": 1, "title": "New Title", "content": "New Content" })
        );
    }

    #[rstest]
    #[case("/notes/999")]
    #[case("/notes/not-a-number")]
    #[tokio::test]
    async fn update_unknown_id_is_not_found(app: Router, #[case] uri: &str) {
        let (status, body) = send(
            &app,
            Method::PUT,
            uri,
            Some(json!({ "title": "X", "content": "Y" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Note not found" }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_without_content_keeps_current_content(app: Router) {
        create(&app, "Title", "Content").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/notes/1",
            Some(json!({ "title": "X" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1, "title": "X", "content": "Content" }));
    }

    #[rstest]
    #[case("/notes/999")]
    #[case("/notes/abc")]
    #[tokio::test]
    async fn update_unknown_id_with_partial_body_is_not_found(app: Router, #[case] uri: &str) {
        let (status, body) = send(&app, Method::PUT, uri, Some(json!({ "title": "X" }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Note not found" }));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_returns_removed_note(app: Router) {
        let created = create(&app, "Test Title", "Test Content").await;

        let (status, body) = send(&app, Method::DELETE, "/notes/1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Note deleted", "deletedNote": created })
        );

        let (status, _) = send(&app, Method::GET, "/notes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::DELETE, "/notes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Note not found" }));
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_ids_are_not_reused(app: Router) {
        create(&app, "T1", "C1").await;
        create(&app, "T2", "C2").await;
        send(&app, Method::DELETE, "/notes/2", None).await;

        let third = create(&app, "T3", "C3").await;
        let (_, notes) = send(&app, Method::GET, "/notes", None).await;

        assert_eq!(third["id"], json!(3));
        assert_eq!(
            notes,
            json!([
                { "id": 1, "title": "T1", "content": "C1" },
                { "id": 3, "title": "T3", "content": "C3" }
            ])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn separate_routers_do_not_share_notes(app: Router) {
        create(&app, "Only here", "Content").await;

        let other = fresh_router();
        let (_, notes) = send(&other, Method::GET, "/notes", None).await;

        assert_eq!(notes, json!([]));
    }

    #[rstest]
    #[tokio::test]
    async fn root_answers_ok(app: Router) {
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request builds"))
            .await
            .expect("router is infallible");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[tokio::test]
    async fn openapi_document_lists_note_routes(app: Router) {
        let (status, body) = send(&app, Method::GET, "/api-doc/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/notes"].is_object());
        assert!(body["paths"]["/notes/{id}"].is_object());
    }
}
