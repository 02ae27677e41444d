use crate::domain;
use crate::dto::UserSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// DTO for adding a manager to a todo
#[derive(Deserialize, Validate, ToSchema, Debug)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewManagerRequest {
    #[validate(range(min = 1))]
    #[schema(example = 7)]
    pub manager_user_id: i64,
}

/// DTO for a newly added manager
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedManager {
    #[schema(example = 3)]
    pub id: i64,
}

#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct ManagerResponse {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(example = 10)]
    pub todo_id: i64,
    pub user: UserSummary,
}

impl From<domain::manager::Manager> for ManagerResponse {
    fn from(value: domain::manager::Manager) -> Self {
        ManagerResponse {
            id: value.id,
            todo_id: value.todo_id,
            user: value.user.into(),
        }
    }
}
