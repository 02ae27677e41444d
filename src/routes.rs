use crate::api::{auth, comment, manager, swagger_main, todo, user};
use crate::{SharedData, logging};
use axum::Router;
use std::sync::Arc;

/// Assembles every API route behind request tracing, along with the swagger UI
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let api_routes = Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/users", user::user_routes())
        .merge(todo::todo_routes())
        .merge(manager::manager_routes())
        .merge(comment::comment_routes())
        .with_state(shared_data);

    logging::attach_tracing_http(api_routes).merge(swagger_main::build_documentation())
}
