use crate::domain;
use crate::domain::association;
use crate::domain::todo::driven_ports::TodoReader;
use crate::domain::user::UserSummary;
use crate::domain::user::driven_ports::DetectUser;
use crate::domain::{Error, PortResultExt};
use crate::external_connections::ExternalConnectivity;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub todo_id: i64,
    pub contents: String,
    pub author: UserSummary,
}

#[cfg_attr(test, derive(Clone, Debug))]
pub struct NewComment {
    pub contents: String,
}

pub mod driven_ports {
    use super::*;

    pub trait CommentReader {
        /// Comments on a todo in the order they were written, each with its author
        async fn comments_for_todo(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Comment>, anyhow::Error>;
    }

    pub trait CommentWriter {
        async fn create_comment(
            &self,
            todo_id: i64,
            author_id: i64,
            comment: &NewComment,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i64, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait CommentPort {
        async fn save_comment(
            &self,
            author_id: i64,
            todo_id: i64,
            comment: &NewComment,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
            u_detect: &impl DetectUser,
            comment_write: &impl driven_ports::CommentWriter,
        ) -> Result<i64, Error>;

        async fn comments_for_todo(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
            comment_read: &impl driven_ports::CommentReader,
        ) -> Result<Vec<Comment>, Error>;
    }
}

pub struct CommentService {}

impl driving_ports::CommentPort for CommentService {
    async fn save_comment(
        &self,
        author_id: i64,
        todo_id: i64,
        comment: &NewComment,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        u_detect: &impl DetectUser,
        comment_write: &impl driven_ports::CommentWriter,
    ) -> Result<i64, Error> {
        let todo = association::load_todo(todo_id, &mut *ext_cxn, todo_read).await?;
        association::require_owner(&todo)?;
        domain::user::verify_user_exists(author_id, &mut *ext_cxn, u_detect).await?;

        let comment_id = comment_write
            .create_comment(todo_id, author_id, comment, &mut *ext_cxn)
            .await
            .trying_to("store a comment")?;

        info!(comment_id, todo_id, author_id, "comment added");
        Ok(comment_id)
    }

    async fn comments_for_todo(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        comment_read: &impl driven_ports::CommentReader,
    ) -> Result<Vec<Comment>, Error> {
        association::verify_todo_exists(todo_id, &mut *ext_cxn, todo_read).await?;

        comment_read
            .comments_for_todo(todo_id, &mut *ext_cxn)
            .await
            .trying_to("list the comments on a todo")
    }
}
