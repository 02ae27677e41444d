use crate::domain;
use crate::dto::UserSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// DTO for commenting on a todo
#[derive(Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    #[schema(example = "Don't forget the receipt")]
    pub contents: String,
}

impl From<NewCommentRequest> for domain::comment::NewComment {
    fn from(value: NewCommentRequest) -> Self {
        domain::comment::NewComment {
            contents: value.contents,
        }
    }
}

/// DTO for a newly created comment
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct InsertedComment {
    #[schema(example = 12)]
    pub id: i64,
}

#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct CommentResponse {
    #[schema(example = 12)]
    pub id: i64,
    #[schema(example = 10)]
    pub todo_id: i64,
    #[schema(example = "Don't forget the receipt")]
    pub contents: String,
    pub author: UserSummary,
}

impl From<domain::comment::Comment> for CommentResponse {
    fn from(value: domain::comment::Comment) -> Self {
        CommentResponse {
            id: value.id,
            todo_id: value.todo_id,
            contents: value.contents,
            author: value.author.into(),
        }
    }
}
