use utoipa::OpenApi;

pub mod auth;
pub mod comment;
pub mod manager;
pub mod todo;
pub mod user;

pub use auth::*;
pub use comment::*;
pub use manager::*;
pub use todo::*;
pub use user::*;

/// Schemas for every DTO the API sends or receives, merged into the generated OpenAPI document
#[derive(OpenApi)]
#[openapi(components(schemas(
    SignupRequest,
    SigninRequest,
    UserRole,
    InsertedUser,
    UserResponse,
    UserSummary,
    ChangePasswordRequest,
    NewTodoRequest,
    InsertedTodo,
    TodoResponse,
    TodoPage,
    NewManagerRequest,
    InsertedManager,
    ManagerResponse,
    NewCommentRequest,
    InsertedComment,
    CommentResponse,
)))]
pub struct OpenApiSchemas;
