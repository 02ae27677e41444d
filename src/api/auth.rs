use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{BasicErrorResponse, DomainErrorResponse, Json, ValidationErrorResponse};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::post;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(signup, signin))]
/// Defines the OpenAPI documentation for the auth API
pub struct AuthApi;
/// Constant used to group auth endpoints in OpenAPI documentation
pub const AUTH_API_GROUP: &str = "Auth";

/// Creates a router for endpoints under "/auth"
pub fn auth_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/signup",
            post(
                |State(app_state): AppState, Json(new_signup): Json<dto::SignupRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let auth_service = domain::auth::AuthService::default();

                    signup(new_signup, &mut ext_cxn, &auth_service).await
                },
            ),
        )
        .route(
            "/signin",
            post(
                |State(app_state): AppState, Json(credentials): Json<dto::SigninRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let auth_service = domain::auth::AuthService::default();

                    signin(credentials, &mut ext_cxn, &auth_service).await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = AUTH_API_GROUP,
    request_body = dto::SignupRequest,
    responses(
        (status = 201, description = "User registered", body = dto::InsertedUser),
        (status = 400, response = BasicErrorResponse),
        (status = 409, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Registers a new user
async fn signup(
    new_signup: dto::SignupRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    auth_service: &impl domain::auth::driving_ports::AuthPort,
) -> Result<(StatusCode, Json<dto::InsertedUser>), ErrorResponse> {
    info!("Attempt {new_signup}");
    new_signup
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let user_write = persistence::db_user_driven_ports::DbWriteUsers;
    let user_id = auth_service
        .signup(&new_signup.into(), &mut *ext_cxn, &user_detect, &user_write)
        .await
        .map_err(DomainErrorResponse)?;

    Ok((StatusCode::CREATED, Json(dto::InsertedUser { id: user_id })))
}

#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = AUTH_API_GROUP,
    request_body = dto::SigninRequest,
    responses(
        (status = 200, description = "Credentials matched", body = dto::UserResponse),
        (status = 400, response = BasicErrorResponse),
        (status = 401, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Checks a user's credentials
async fn signin(
    credentials: dto::SigninRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    auth_service: &impl domain::auth::driving_ports::AuthPort,
) -> Result<Json<dto::UserResponse>, ErrorResponse> {
    info!("Attempt {credentials}");
    credentials
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let user_read = persistence::db_user_driven_ports::DbReadUsers;
    let user = auth_service
        .signin(&credentials.into(), &mut *ext_cxn, &user_read)
        .await
        .map_err(DomainErrorResponse)?;

    Ok(Json(user.into()))
}
