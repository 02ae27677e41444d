use super::{Count, NewId};
use crate::domain;
use crate::domain::todo::{NewTodo, Page, PageRequest, Todo};
use crate::domain::user::UserSummary;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::query_as;

/// Every todo query joins the owner in, so a page of todos is one round trip no matter how
/// many distinct owners it has
const TODO_WITH_OWNER: &str = "SELECT t.id, t.title, t.contents, t.weather, t.modified_at, \
     u.id AS owner_id, u.email AS owner_email \
     FROM todos t LEFT JOIN users u ON u.id = t.user_id";

pub struct DbTodoReader;

#[derive(sqlx::FromRow)]
struct TodoWithOwnerRow {
    id: i64,
    title: String,
    contents: String,
    weather: Option<String>,
    modified_at: DateTime<Utc>,
    owner_id: Option<i64>,
    owner_email: Option<String>,
}

impl From<TodoWithOwnerRow> for Todo {
    fn from(value: TodoWithOwnerRow) -> Self {
        let owner = match (value.owner_id, value.owner_email) {
            (Some(id), Some(email)) => Some(UserSummary { id, email }),
            _ => None,
        };

        Todo {
            id: value.id,
            title: value.title,
            contents: value.contents,
            weather: value.weather,
            owner,
            modified_at: value.modified_at,
        }
    }
}

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn list_by_recency(
        &self,
        page: &PageRequest,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Page<Todo>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<Todo> = query_as::<_, TodoWithOwnerRow>(&format!(
            "{TODO_WITH_OWNER} ORDER BY t.modified_at DESC, t.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.size))
        .bind(page.offset())
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch a page of todos")?
        .into_iter()
        .map(Todo::from)
        .collect();

        let total = query_as::<_, Count>("SELECT count(*) AS count FROM todos")
            .fetch_one(cxn.borrow_connection())
            .await
            .context("trying to count todos")?;

        Ok(Page {
            items: todos,
            page: page.page,
            size: page.size,
            total_items: total.count,
        })
    }

    async fn get_by_id(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo = query_as::<_, TodoWithOwnerRow>(&format!("{TODO_WITH_OWNER} WHERE t.id = $1"))
            .bind(todo_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to fetch a todo by ID")?
            .map(Todo::from);

        Ok(todo)
    }

    async fn count_by_id(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i64, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo_count =
            query_as::<_, Count>("SELECT count(*) AS count FROM todos t WHERE t.id = $1")
                .bind(todo_id)
                .fetch_one(cxn.borrow_connection())
                .await
                .context("trying to count todos by ID")?;

        Ok(todo_count.count)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        owner_id: i64,
        new_todo: &NewTodo,
        weather: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i64, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, NewId>(
            "WITH new_todo AS ( \
                INSERT INTO todos(title, contents, weather, user_id) VALUES ($1, $2, $3, $4) \
                RETURNING id \
             ), author_manager AS ( \
                INSERT INTO managers(todo_id, user_id) SELECT id, $4 FROM new_todo \
             ) \
             SELECT id FROM new_todo",
        )
        .bind(&new_todo.title)
        .bind(&new_todo.contents)
        .bind(weather)
        .bind(owner_id)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(new_id.id)
    }
}
