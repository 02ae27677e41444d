use crate::dto;
use crate::routing_utils::BasicErrorResponse;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Expert API",
        description = "Todos stamped with the day's weather, shared with managers and open to comments"
    ),
    components(responses(BasicErrorResponse))
)]
struct TodoExpertApi;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from other locations in the app, such as the [dto] package
/// and submodules of [api][crate::api]
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = TodoExpertApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::auth::AuthApi::openapi());
    api_docs.merge(super::user::UsersApi::openapi());
    api_docs.merge(super::todo::TodoApi::openapi());
    api_docs.merge(super::manager::ManagerApi::openapi());
    api_docs.merge(super::comment::CommentApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
