use crate::domain;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::user::UserSummary;
use crate::domain::weather::driven_ports::WeatherReader;
use crate::domain::{Error, PortResultExt};
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Utc};
use tracing::info;

/// A todo together with its owner. The owner is resolved in the same lookup as the todo and
/// is `None` when the todo no longer points at a live user.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub contents: String,
    pub weather: Option<String>,
    pub owner: Option<UserSummary>,
    pub modified_at: DateTime<Utc>,
}

#[cfg_attr(test, derive(Clone, Debug))]
pub struct NewTodo {
    pub title: String,
    pub contents: String,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One-based page selection for the todo listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.size == 0 {
            return 0;
        }
        let size = i64::from(self.size);
        (self.total_items + size - 1) / size
    }
}

pub mod driven_ports {
    use super::*;

    /// Read access to todos. Every implementation must resolve each todo's owner as part of
    /// the same retrieval instead of loading owners row by row.
    pub trait TodoReader {
        /// Todos ordered by last modification, newest first. Equal timestamps fall back to
        /// the higher id first.
        async fn list_by_recency(
            &self,
            page: &PageRequest,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Page<Todo>, anyhow::Error>;

        async fn get_by_id(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;

        /// Existence check which doesn't load the todo itself
        async fn count_by_id(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i64, anyhow::Error>;
    }

    pub trait TodoWriter {
        /// Stores the todo and registers its author as the first manager
        async fn create_todo(
            &self,
            owner_id: i64,
            new_todo: &NewTodo,
            weather: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i64, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait TodoPort {
        async fn create_todo(
            &self,
            user_id: i64,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl domain::user::driven_ports::DetectUser,
            weather_read: &impl WeatherReader,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<i64, Error>;

        async fn list_todos(
            &self,
            page: &PageRequest,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Page<Todo>, Error>;

        async fn get_todo(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Option<Todo>, Error>;
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn create_todo(
        &self,
        user_id: i64,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl domain::user::driven_ports::DetectUser,
        weather_read: &impl WeatherReader,
        todo_write: &impl TodoWriter,
    ) -> Result<i64, Error> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let weather = domain::weather::fetch_todays_weather(&mut *ext_cxn, weather_read).await?;

        let todo_id = todo_write
            .create_todo(user_id, new_todo, &weather, &mut *ext_cxn)
            .await
            .trying_to("create a todo")?;

        info!(todo_id, user_id, "created todo");
        Ok(todo_id)
    }

    async fn list_todos(
        &self,
        page: &PageRequest,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Page<Todo>, Error> {
        todo_read
            .list_by_recency(page, ext_cxn)
            .await
            .trying_to("list todos")
    }

    async fn get_todo(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Option<Todo>, Error> {
        todo_read
            .get_by_id(todo_id, ext_cxn)
            .await
            .trying_to("fetch a todo")
    }
}
