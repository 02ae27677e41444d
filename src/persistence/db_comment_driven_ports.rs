use super::NewId;
use crate::domain;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::user::UserSummary;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::query_as;

pub struct DbCommentReader;

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    todo_id: i64,
    contents: String,
    user_id: i64,
    email: String,
}

impl From<CommentRow> for Comment {
    fn from(value: CommentRow) -> Self {
        Comment {
            id: value.id,
            todo_id: value.todo_id,
            contents: value.contents,
            author: UserSummary {
                id: value.user_id,
                email: value.email,
            },
        }
    }
}

impl domain::comment::driven_ports::CommentReader for DbCommentReader {
    async fn comments_for_todo(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<Comment>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let comments = query_as::<_, CommentRow>(
            "SELECT c.id, c.todo_id, c.contents, c.user_id, u.email FROM comments c \
             JOIN users u ON u.id = c.user_id WHERE c.todo_id = $1 \
             ORDER BY c.created_at, c.id",
        )
        .bind(todo_id)
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch the comments on a todo")?
        .into_iter()
        .map(Comment::from)
        .collect();

        Ok(comments)
    }
}

pub struct DbCommentWriter;

impl domain::comment::driven_ports::CommentWriter for DbCommentWriter {
    async fn create_comment(
        &self,
        todo_id: i64,
        author_id: i64,
        comment: &NewComment,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i64, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, NewId>(
            "INSERT INTO comments(contents, todo_id, user_id) VALUES ($1, $2, $3) \
             RETURNING comments.id",
        )
        .bind(&comment.contents)
        .bind(todo_id)
        .bind(author_id)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new comment")?;

        Ok(new_id.id)
    }
}
