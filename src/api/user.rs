use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{BasicErrorResponse, DomainErrorResponse, Json, ValidationErrorResponse};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, put};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(get_user, change_password))]
/// Defines the OpenAPI documentation for the user API
pub struct UsersApi;
/// Constant used to group user endpoints in OpenAPI documentation
pub const USER_API_GROUP: &str = "Users";

/// Builds a router for all the user routes
pub fn user_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/:user_id",
            get(
                |State(app_state): AppState, Path(user_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService::default();

                    get_user(user_id, &mut ext_cxn, &user_service).await
                },
            ),
        )
        .route(
            "/:user_id/password",
            put(
                |State(app_state): AppState,
                 Path(user_id): Path<i64>,
                 Json(change): Json<dto::ChangePasswordRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let user_service = domain::user::UserService::default();

                    change_password(user_id, change, &mut ext_cxn, &user_service).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = USER_API_GROUP,
    params(
        ("user_id" = i64, Path, description = "The ID of the user to retrieve"),
    ),
    responses(
        (status = 200, description = "Found the user", body = dto::UserResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a user by their ID
async fn get_user(
    user_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl domain::user::driving_ports::UserPort,
) -> Result<Json<dto::UserResponse>, ErrorResponse> {
    info!("Requested user {user_id}");
    let user_reader = persistence::db_user_driven_ports::DbReadUsers;

    let user = user_service
        .get_user(user_id, &mut *ext_cxn, &user_reader)
        .await
        .map_err(DomainErrorResponse)?
        .ok_or(DomainErrorResponse(domain::Error::NotFound {
            entity: "user",
            id: user_id,
        }))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/password",
    tag = USER_API_GROUP,
    params(
        ("user_id" = i64, Path, description = "The user whose password is changing"),
    ),
    request_body = dto::ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, response = BasicErrorResponse),
        (status = 401, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Replaces a user's password after checking the current one
async fn change_password(
    user_id: i64,
    change: dto::ChangePasswordRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    user_service: &impl domain::user::driving_ports::UserPort,
) -> Result<StatusCode, ErrorResponse> {
    info!("Requested {change} for user {user_id}");
    change.validate().map_err(ValidationErrorResponse::from)?;

    let user_reader = persistence::db_user_driven_ports::DbReadUsers;
    let user_writer = persistence::db_user_driven_ports::DbWriteUsers;
    user_service
        .change_password(
            user_id,
            &change.into(),
            &mut *ext_cxn,
            &user_reader,
            &user_writer,
        )
        .await
        .map_err(DomainErrorResponse)?;

    Ok(StatusCode::NO_CONTENT)
}
