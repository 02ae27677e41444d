use crate::domain;
use crate::domain::password_policy;
use crate::dto::UserRole;
use derive_more::Display;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// DTO for registering a new user
#[derive(Deserialize, ToSchema, Display)]
#[display("signup for {email} as {role:?}")]
#[cfg_attr(test, derive(Serialize))]
pub struct SignupRequest {
    #[schema(example = "someone@example.com")]
    pub email: String,
    #[schema(example = "Password1")]
    pub password: String,
    pub role: UserRole,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !validator::validate_email(&self.email) {
            let mut violation = ValidationError::new("email");
            violation.message = Some(Cow::Borrowed("must be a valid email address"));
            errors.add("email", violation);
        }
        password_policy::add_violations(&mut errors, "password", &self.password);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<SignupRequest> for domain::auth::Signup {
    fn from(value: SignupRequest) -> Self {
        domain::auth::Signup {
            email: value.email,
            password: value.password,
            role: value.role.into(),
        }
    }
}

/// DTO for signing in with existing credentials
#[derive(Deserialize, Validate, ToSchema, Display)]
#[display("signin for {email}")]
#[cfg_attr(test, derive(Serialize))]
pub struct SigninRequest {
    #[validate(email)]
    #[schema(example = "someone@example.com")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "Password1")]
    pub password: String,
}

impl From<SigninRequest> for domain::auth::Signin {
    fn from(value: SigninRequest) -> Self {
        domain::auth::Signin {
            email: value.email,
            password: value.password,
        }
    }
}
