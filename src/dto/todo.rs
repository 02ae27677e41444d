use crate::domain;
use crate::domain::todo::DEFAULT_PAGE_SIZE;
use crate::dto::UserSummary;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// DTO for creating a new todo via the API
#[derive(Deserialize, Validate, ToSchema, Display)]
#[display("{title}")]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodoRequest {
    #[validate(length(min = 1))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[validate(length(min = 1))]
    #[schema(example = "Two litres, semi-skimmed")]
    pub contents: String,
}

impl From<NewTodoRequest> for domain::todo::NewTodo {
    fn from(value: NewTodoRequest) -> Self {
        domain::todo::NewTodo {
            title: value.title,
            contents: value.contents,
        }
    }
}

/// DTO for a newly created todo
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedTodo {
    #[schema(example = 5)]
    pub id: i64,
}

/// DTO for a returned todo on the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoResponse {
    #[schema(example = 10)]
    pub id: i64,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "Two litres, semi-skimmed")]
    pub contents: String,
    #[schema(example = "Sunny")]
    pub weather: Option<String>,
    /// Absent when the todo's owner no longer exists
    pub owner: Option<UserSummary>,
    pub modified_at: DateTime<Utc>,
}

impl From<domain::todo::Todo> for TodoResponse {
    fn from(value: domain::todo::Todo) -> Self {
        TodoResponse {
            id: value.id,
            title: value.title,
            contents: value.contents,
            weather: value.weather,
            owner: value.owner.map(UserSummary::from),
            modified_at: value.modified_at,
        }
    }
}

/// Query parameters selecting a page of todos. Pages start at 1 and hold at most 100 todos;
/// anything outside those bounds is rejected rather than adjusted.
#[derive(Deserialize, Validate, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    #[param(example = 1)]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    #[param(example = 10)]
    pub size: Option<u32>,
}

impl From<PageQuery> for domain::todo::PageRequest {
    fn from(value: PageQuery) -> Self {
        domain::todo::PageRequest {
            page: value.page.unwrap_or(1),
            size: value.size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// DTO for a page of todos, most recently modified first
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct TodoPage {
    pub items: Vec<TodoResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub size: u32,
    #[schema(example = 42)]
    pub total_items: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl From<domain::todo::Page<domain::todo::Todo>> for TodoPage {
    fn from(value: domain::todo::Page<domain::todo::Todo>) -> Self {
        let total_pages = value.total_pages();

        TodoPage {
            items: value.items.into_iter().map(TodoResponse::from).collect(),
            page: value.page,
            size: value.size,
            total_items: value.total_items,
            total_pages,
        }
    }
}
