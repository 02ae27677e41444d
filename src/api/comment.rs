use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use crate::routing_utils::{
    BasicErrorResponse, DomainErrorResponse, GenericErrorResponse, Json, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(save_comment, comments_for_todo))]
/// Defines the OpenAPI documentation for the comment API
pub struct CommentApi;
/// Constant used to group comment endpoints in OpenAPI documentation
pub const COMMENT_API_GROUP: &str = "Comments";

/// Builds a router for commenting on todos
pub fn comment_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/users/:user_id/todos/:todo_id/comments",
            post(
                |State(app_state): AppState,
                 Path((user_id, todo_id)): Path<(i64, i64)>,
                 Json(new_comment): Json<dto::NewCommentRequest>| async move {
                    let comment_service = domain::comment::CommentService {};

                    save_comment(
                        user_id,
                        todo_id,
                        new_comment,
                        &app_state.ext_cxn,
                        &comment_service,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todos/:todo_id/comments",
            get(
                |State(app_state): AppState, Path(todo_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let comment_service = domain::comment::CommentService {};

                    comments_for_todo(todo_id, &mut ext_cxn, &comment_service).await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/todos/{todo_id}/comments",
    tag = COMMENT_API_GROUP,
    params(
        ("user_id" = i64, Path, description = "The author of the comment"),
        ("todo_id" = i64, Path, description = "The todo being commented on"),
    ),
    request_body = dto::NewCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = dto::InsertedComment),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Adds a comment to a todo that has an owner
async fn save_comment(
    user_id: i64,
    todo_id: i64,
    new_comment: dto::NewCommentRequest,
    ext_cxn: &impl Transactable,
    comment_service: &impl domain::comment::driving_ports::CommentPort,
) -> Result<(StatusCode, Json<dto::InsertedComment>), ErrorResponse> {
    info!("User {user_id} commenting on todo {todo_id}");
    new_comment
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let comment_writer = persistence::db_comment_driven_ports::DbCommentWriter;

    let comment_id = comment_service
        .save_comment(
            user_id,
            todo_id,
            &new_comment.into(),
            &mut txn,
            &todo_reader,
            &user_detect,
            &comment_writer,
        )
        .await
        .map_err(DomainErrorResponse)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok((
        StatusCode::CREATED,
        Json(dto::InsertedComment { id: comment_id }),
    ))
}

#[utoipa::path(
    get,
    path = "/todos/{todo_id}/comments",
    tag = COMMENT_API_GROUP,
    params(
        ("todo_id" = i64, Path, description = "The todo whose comments to list"),
    ),
    responses(
        (status = 200, description = "Comments on the todo, oldest first", body = Vec<dto::CommentResponse>),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists the comments on a todo
async fn comments_for_todo(
    todo_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    comment_service: &impl domain::comment::driving_ports::CommentPort,
) -> Result<Json<Vec<dto::CommentResponse>>, ErrorResponse> {
    info!("Requested comments on todo {todo_id}");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let comment_reader = persistence::db_comment_driven_ports::DbCommentReader;

    let comments = comment_service
        .comments_for_todo(todo_id, &mut *ext_cxn, &todo_reader, &comment_reader)
        .await
        .map_err(DomainErrorResponse)?;

    Ok(Json(
        comments
            .into_iter()
            .map(dto::CommentResponse::from)
            .collect(),
    ))
}
