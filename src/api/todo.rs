use crate::domain::weather::driven_ports::WeatherReader;
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{BasicErrorResponse, DomainErrorResponse, Json, ValidationErrorResponse};
use crate::{AppState, SharedData, domain, dto, persistence, weather_api};
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(create_todo, list_todos, get_todo))]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Adds routes under "/todos" and the route for creating a user's todo
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/users/:user_id/todos",
            post(
                |State(app_state): AppState,
                 Path(user_id): Path<i64>,
                 Json(new_todo): Json<dto::NewTodoRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let weather_reader = weather_api::HttpWeatherReader {
                        forecast_url: app_state.forecast_url.clone(),
                    };

                    create_todo(
                        user_id,
                        new_todo,
                        &mut ext_cxn,
                        &weather_reader,
                        &todo_service,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todos",
            get(
                |State(app_state): AppState, Query(page_query): Query<dto::PageQuery>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    list_todos(page_query, &mut ext_cxn, &todo_service).await
                },
            ),
        )
        .route(
            "/todos/:todo_id",
            get(
                |State(app_state): AppState, Path(todo_id): Path<i64>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    get_todo(todo_id, &mut ext_cxn, &todo_service).await
                },
            ),
        )
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/todos",
    tag = TODO_API_GROUP,
    params(
        ("user_id" = i64, Path, description = "The user who will own the todo"),
    ),
    request_body = dto::NewTodoRequest,
    responses(
        (status = 201, description = "Todo created and annotated with today's weather", body = dto::InsertedTodo),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
        (status = 502, response = BasicErrorResponse),
    ),
)]
/// Creates a todo for a user
async fn create_todo(
    user_id: i64,
    new_todo: dto::NewTodoRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    weather_reader: &impl WeatherReader,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
) -> Result<(StatusCode, Json<dto::InsertedTodo>), ErrorResponse> {
    info!("Creating todo \"{new_todo}\" for user {user_id}");
    new_todo.validate().map_err(ValidationErrorResponse::from)?;

    let user_detect = persistence::db_user_driven_ports::DbDetectUser;
    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;
    let todo_id = todo_service
        .create_todo(
            user_id,
            &new_todo.into(),
            &mut *ext_cxn,
            &user_detect,
            weather_reader,
            &todo_writer,
        )
        .await
        .map_err(DomainErrorResponse)?;

    Ok((StatusCode::CREATED, Json(dto::InsertedTodo { id: todo_id })))
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = TODO_API_GROUP,
    params(dto::PageQuery),
    responses(
        (status = 200, description = "A page of todos, most recently modified first", body = dto::TodoPage),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists todos with their owners, one page at a time
async fn list_todos(
    page_query: dto::PageQuery,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
) -> Result<Json<dto::TodoPage>, ErrorResponse> {
    info!("Listing todos: {page_query:?}");
    page_query
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let page = todo_service
        .list_todos(&page_query.into(), &mut *ext_cxn, &todo_reader)
        .await
        .map_err(DomainErrorResponse)?;

    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(
        ("todo_id" = i64, Path, description = "The ID of the todo to retrieve"),
    ),
    responses(
        (status = 200, description = "Found the todo", body = dto::TodoResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a single todo with its owner
async fn get_todo(
    todo_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl domain::todo::driving_ports::TodoPort,
) -> Result<Json<dto::TodoResponse>, ErrorResponse> {
    info!("Requested todo {todo_id}");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

    let todo = todo_service
        .get_todo(todo_id, &mut *ext_cxn, &todo_reader)
        .await
        .map_err(DomainErrorResponse)?
        .ok_or(DomainErrorResponse(domain::Error::NotFound {
            entity: "todo",
            id: todo_id,
        }))?;

    Ok(Json(todo.into()))
}
