use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use crate::routing_utils::{
    BasicErrorResponse, DomainErrorResponse, GenericErrorResponse, Json, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{delete, get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(save_manager, managers_for_todo, delete_manager))]
/// Defines the OpenAPI documentation for the manager API
pub struct ManagerApi;
/// Constant used to group manager endpoints in OpenAPI documentation
pub const MANAGER_API_GROUP: &str = "Managers";

/// Builds a router for adding, listing and removing todo managers
pub fn manager_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/users/:user_id/todos/:todo_id/managers",
            post(
                |State(app_state): AppState,
                 Path((user_id, todo_id)): Path<(i64, i64)>,
                 Json(new_manager): Json<dto::NewManagerRequest>| async move {
                    let manager_service = domain::manager::ManagerService {};

                    save_manager(
                        user_id,
                        todo_id,
                        new_manager,
                        &app_state.ext_cxn,
                        &manager_service,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todos/:todo_id/managers",
            get(
                |State(app_state): AppState, Path(todo_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let manager_service = domain::manager::ManagerService {};

                    managers_for_todo(todo_id, &mut ext_cxn, &manager_service).await
                },
            ),
        )
        .route(
            "/users/:user_id/todos/:todo_id/managers/:manager_id",
            delete(
                |State(app_state): AppState,
                 Path((user_id, todo_id, manager_id)): Path<(i64, i64, i64)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let manager_service = domain::manager::ManagerService {};

                    delete_manager(user_id, todo_id, manager_id, &mut ext_cxn, &manager_service)
                        .await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/todos/{todo_id}/managers",
    tag = MANAGER_API_GROUP,
    params(
        ("user_id" = i64, Path, description = "The owner of the todo"),
        ("todo_id" = i64, Path, description = "The todo gaining a manager"),
    ),
    request_body = dto::NewManagerRequest,
    responses(
        (status = 201, description = "Manager added", body = dto::InsertedManager),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Adds a manager to a todo. The checks and the insert share one transaction.
async fn save_manager(
    user_id: i64,
    todo_id: i64,
    new_manager: dto::NewManagerRequest,
    ext_cxn: &impl Transactable,
    manager_service: &impl domain::manager::driving_ports::ManagerPort,
) -> Result<(StatusCode, Json<dto::InsertedManager>), ErrorResponse> {
    info!("User {user_id} adding manager to todo {todo_id}: {new_manager:?}");
    new_manager
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let mut txn = ext_cxn
        .start_transaction()
        .await
        .map_err(GenericErrorResponse)?;
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let manager_writer = persistence::db_manager_driven_ports::DbManagerWriter;

    let manager_id = manager_service
        .save_manager(
            user_id,
            todo_id,
            new_manager.manager_user_id,
            &mut txn,
            &todo_reader,
            &user_detect,
            &manager_writer,
        )
        .await
        .map_err(DomainErrorResponse)?;
    txn.commit().await.map_err(GenericErrorResponse)?;

    Ok((
        StatusCode::CREATED,
        Json(dto::InsertedManager { id: manager_id }),
    ))
}

#[utoipa::path(
    get,
    path = "/todos/{todo_id}/managers",
    tag = MANAGER_API_GROUP,
    params(
        ("todo_id" = i64, Path, description = "The todo whose managers to list"),
    ),
    responses(
        (status = 200, description = "Managers of the todo", body = Vec<dto::ManagerResponse>),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists the managers of a todo
async fn managers_for_todo(
    todo_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    manager_service: &impl domain::manager::driving_ports::ManagerPort,
) -> Result<Json<Vec<dto::ManagerResponse>>, ErrorResponse> {
    info!("Requested managers of todo {todo_id}");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let manager_reader = persistence::db_manager_driven_ports::DbManagerReader;

    let managers = manager_service
        .managers_for_todo(todo_id, &mut *ext_cxn, &todo_reader, &manager_reader)
        .await
        .map_err(DomainErrorResponse)?;

    Ok(Json(
        managers
            .into_iter()
            .map(dto::ManagerResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}/todos/{todo_id}/managers/{manager_id}",
    tag = MANAGER_API_GROUP,
    params(
        ("user_id" = i64, Path, description = "The owner of the todo"),
        ("todo_id" = i64, Path, description = "The todo losing a manager"),
        ("manager_id" = i64, Path, description = "The manager record to remove"),
    ),
    responses(
        (status = 204, description = "Manager removed"),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Removes a manager from a todo
async fn delete_manager(
    user_id: i64,
    todo_id: i64,
    manager_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    manager_service: &impl domain::manager::driving_ports::ManagerPort,
) -> Result<StatusCode, ErrorResponse> {
    info!("User {user_id} removing manager {manager_id} from todo {todo_id}");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let manager_reader = persistence::db_manager_driven_ports::DbManagerReader;
    let manager_writer = persistence::db_manager_driven_ports::DbManagerWriter;

    manager_service
        .delete_manager(
            user_id,
            todo_id,
            manager_id,
            &mut *ext_cxn,
            &todo_reader,
            &manager_reader,
            &manager_writer,
        )
        .await
        .map_err(DomainErrorResponse)?;

    Ok(StatusCode::NO_CONTENT)
}
