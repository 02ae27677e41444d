use crate::domain;
use crate::domain::password_policy;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    User,
}

impl From<UserRole> for domain::user::UserRole {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => domain::user::UserRole::Admin,
            UserRole::User => domain::user::UserRole::User,
        }
    }
}

impl From<domain::user::UserRole> for UserRole {
    fn from(value: domain::user::UserRole) -> Self {
        match value {
            domain::user::UserRole::Admin => UserRole::Admin,
            domain::user::UserRole::User => UserRole::User,
        }
    }
}

/// DTO for a user. The stored password never leaves the server.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct UserResponse {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = "someone@example.com")]
    pub email: String,
    pub role: UserRole,
}

impl From<domain::user::User> for UserResponse {
    fn from(value: domain::user::User) -> Self {
        UserResponse {
            id: value.id,
            email: value.email,
            role: value.role.into(),
        }
    }
}

/// DTO for a user as they appear next to todos, managers and comments
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct UserSummary {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = "someone@example.com")]
    pub email: String,
}

impl From<domain::user::UserSummary> for UserSummary {
    fn from(value: domain::user::UserSummary) -> Self {
        UserSummary {
            id: value.id,
            email: value.email,
        }
    }
}

/// DTO containing the ID of a user that was created via the API.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedUser {
    #[schema(example = 10)]
    pub id: i64,
}

/// DTO for changing a user's password
#[derive(Deserialize, ToSchema, Display)]
#[display("password change")]
#[cfg_attr(test, derive(Serialize))]
pub struct ChangePasswordRequest {
    #[schema(example = "Password1")]
    pub old_password: String,
    #[schema(example = "Changed123")]
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.old_password.is_empty() {
            errors.add("old_password", ValidationError::new("required"));
        }
        password_policy::add_violations(&mut errors, "new_password", &self.new_password);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<ChangePasswordRequest> for domain::user::ChangePassword {
    fn from(value: ChangePasswordRequest) -> Self {
        domain::user::ChangePassword {
            old_password: value.old_password,
            new_password: value.new_password,
        }
    }
}
