use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;

use serde::Serialize;
use tracing::{error, info};
use utoipa::openapi::{RefOr, Schema};
use utoipa::{ToResponse, ToSchema, openapi};

use validator::ValidationErrors;

use crate::domain;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToResponse)]
#[response(examples(
    ("Not Found" = (
        summary = "Entity could not be found (404)",
        value = json!({
            "error_code": "not_found",
            "error_description": "todo 12 does not exist",
            "extra_info": null
        })
    )),

    ("Invalid Request" = (
        summary = "The request broke a rule about the todo it targets (400)",
        value = json!({
            "error_code": "invalid_request",
            "error_description": "invalid request: task 12 has no valid owner",
            "extra_info": null
        })
    )),

    ("Invalid Credentials" = (
        summary = "Email or password didn't match (401)",
        value = json!({
            "error_code": "invalid_credentials",
            "error_description": "the email or password was incorrect",
            "extra_info": null
        })
    )),

    ("Duplicate Email" = (
        summary = "The email is already registered (409)",
        value = json!({
            "error_code": "duplicate_email",
            "error_description": "a user with email someone@example.com is already registered",
            "extra_info": null
        })
    )),

    ("Internal Failure" = (
        summary = "Something unexpected went wrong inside the server (500)",
        value = json!({
            "error_code": "internal_error",
            "error_description": "Could not access data to complete your request",
            "extra_info": null
        })
    )),

    ("Upstream Failure" = (
        summary = "The weather service failed to provide a forecast (502)",
        value = json!({
            "error_code": "upstream_failure",
            "error_description": "A service this API depends on failed to respond properly",
            "extra_info": "the weather service responded with status 503"
        })
    )),

    ("Invalid Input" = (
        summary = "Invalid request body was passed (400)",
        value = json!({
            "error_code": "invalid_input",
            "error_description": "Submitted data was invalid.",
            "extra_info": {
                "new_password": [
                    {
                        "code": "digit",
                        "message": "must contain at least one digit",
                        "params": {}
                    }
                ]
            }
        })
    )),

    ("Malformed JSON" = (
        summary = "Invalid JSON passed to server (400)",
        value = json!({
            "error_code": "invalid_json",
            "error_description": "The passed request body contained malformed or unreadable JSON.",
            "extra_info": "Failed to parse the request body as JSON: EOF while parsing an object at line 4 column 0"
        })
    ))
))]
pub struct BasicErrorResponse {
    pub error_code: String,
    pub error_description: String,
    pub extra_info: Option<ExtraInfo>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, error_description: String) -> Self {
        BasicErrorResponse {
            error_code: error_code.into(),
            error_description,
            extra_info: None,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum ExtraInfo {
    ValidationIssues(ValidationErrorSchema),
    Message(String),
}

/// Stand-in OpenAPI schema for [ValidationErrors] which just provides an empty object
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new().into(),
        )
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(BasicErrorResponse {
                error_code: "invalid_input".into(),
                error_description: "Submitted data was invalid.".to_owned(),
                extra_info: Some(ExtraInfo::ValidationIssues(ValidationErrorSchema(self.0))),
            }),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Response type which turns a [domain::Error] into a [BasicErrorResponse]. The status code is
/// picked from the error variant alone, never from its message.
pub struct DomainErrorResponse(pub domain::Error);

impl From<domain::Error> for DomainErrorResponse {
    fn from(value: domain::Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for DomainErrorResponse {
    fn into_response(self) -> Response {
        let err = self.0;
        match err.fault() {
            domain::Fault::Upstream => error!("Request failed: {err}"),
            domain::Fault::Caller => info!("Request rejected: {err}"),
        }

        let description = err.to_string();
        let (status, body) = match err {
            domain::Error::Invalid(validation_errors) => {
                return ValidationErrorResponse(validation_errors).into_response();
            }
            domain::Error::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                BasicErrorResponse::new("not_found", description),
            ),
            domain::Error::DuplicateEmail(_) => (
                StatusCode::CONFLICT,
                BasicErrorResponse::new("duplicate_email", description),
            ),
            domain::Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                BasicErrorResponse::new("invalid_credentials", description),
            ),
            domain::Error::PasswordUnchanged
            | domain::Error::MissingOwner { .. }
            | domain::Error::NotTodoOwner { .. }
            | domain::Error::SelfAssignment { .. }
            | domain::Error::ManagerNotOnTodo { .. } => (
                StatusCode::BAD_REQUEST,
                BasicErrorResponse::new("invalid_request", description),
            ),
            domain::Error::Weather(_) => (
                StatusCode::BAD_GATEWAY,
                BasicErrorResponse {
                    error_code: "upstream_failure".into(),
                    error_description:
                        "A service this API depends on failed to respond properly".into(),
                    extra_info: Some(ExtraInfo::Message(description)),
                },
            ),
            domain::Error::PortFailure { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                BasicErrorResponse::new(
                    "internal_error",
                    "Could not access data to complete your request".into(),
                ),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Response type for failures outside the domain, such as being unable to open or commit a
/// database transaction
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Unexpected failure: {:#}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BasicErrorResponse::new(
                "internal_error",
                "Could not access data to complete your request".into(),
            )),
        )
            .into_response()
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: "invalid_json".into(),
                error_description:
                    "The passed request body contained malformed or unreadable JSON.".into(),
                extra_info: Some(ExtraInfo::Message(self.parse_problem)),
            }),
        )
            .into_response()
    }
}
