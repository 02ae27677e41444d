use super::NewId;
use crate::domain;
use crate::domain::manager::Manager;
use crate::domain::user::UserSummary;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::{query, query_as};

pub struct DbManagerReader;

#[derive(sqlx::FromRow)]
struct ManagerRow {
    id: i64,
    todo_id: i64,
    user_id: i64,
    email: String,
}

impl From<ManagerRow> for Manager {
    fn from(value: ManagerRow) -> Self {
        Manager {
            id: value.id,
            todo_id: value.todo_id,
            user: UserSummary {
                id: value.user_id,
                email: value.email,
            },
        }
    }
}

impl domain::manager::driven_ports::ManagerReader for DbManagerReader {
    async fn managers_for_todo(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<Manager>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let managers = query_as::<_, ManagerRow>(
            "SELECT m.id, m.todo_id, m.user_id, u.email FROM managers m \
             JOIN users u ON u.id = m.user_id WHERE m.todo_id = $1 ORDER BY m.id",
        )
        .bind(todo_id)
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch the managers of a todo")?
        .into_iter()
        .map(Manager::from)
        .collect();

        Ok(managers)
    }

    async fn get_by_id(
        &self,
        manager_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Manager>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let manager = query_as::<_, ManagerRow>(
            "SELECT m.id, m.todo_id, m.user_id, u.email FROM managers m \
             JOIN users u ON u.id = m.user_id WHERE m.id = $1",
        )
        .bind(manager_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a manager by ID")?
        .map(Manager::from);

        Ok(manager)
    }
}

pub struct DbManagerWriter;

impl domain::manager::driven_ports::ManagerWriter for DbManagerWriter {
    async fn create_manager(
        &self,
        todo_id: i64,
        user_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i64, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, NewId>(
            "INSERT INTO managers(todo_id, user_id) VALUES ($1, $2) RETURNING managers.id",
        )
        .bind(todo_id)
        .bind(user_id)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new manager")?;

        Ok(new_id.id)
    }

    async fn delete_manager(
        &self,
        manager_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query("DELETE FROM managers WHERE id = $1")
            .bind(manager_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a manager")?;

        Ok(())
    }
}
