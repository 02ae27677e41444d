use crate::domain;
use crate::domain::association;
use crate::domain::todo::driven_ports::TodoReader;
use crate::domain::user::UserSummary;
use crate::domain::user::driven_ports::DetectUser;
use crate::domain::{Error, PortResultExt};
use crate::external_connections::ExternalConnectivity;
use tracing::info;

/// A user who helps manage someone else's todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manager {
    pub id: i64,
    pub todo_id: i64,
    pub user: UserSummary,
}

pub mod driven_ports {
    use super::*;

    pub trait ManagerReader {
        async fn managers_for_todo(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Manager>, anyhow::Error>;

        async fn get_by_id(
            &self,
            manager_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Manager>, anyhow::Error>;
    }

    pub trait ManagerWriter {
        async fn create_manager(
            &self,
            todo_id: i64,
            user_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i64, anyhow::Error>;

        async fn delete_manager(
            &self,
            manager_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait ManagerPort {
        /// Adds `manager_user_id` as a manager of a todo owned by `requester_id`
        async fn save_manager(
            &self,
            requester_id: i64,
            todo_id: i64,
            manager_user_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
            u_detect: &impl DetectUser,
            manager_write: &impl driven_ports::ManagerWriter,
        ) -> Result<i64, Error>;

        async fn managers_for_todo(
            &self,
            todo_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
            manager_read: &impl driven_ports::ManagerReader,
        ) -> Result<Vec<Manager>, Error>;

        async fn delete_manager(
            &self,
            requester_id: i64,
            todo_id: i64,
            manager_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
            manager_read: &impl driven_ports::ManagerReader,
            manager_write: &impl driven_ports::ManagerWriter,
        ) -> Result<(), Error>;
    }
}

pub struct ManagerService {}

impl driving_ports::ManagerPort for ManagerService {
    async fn save_manager(
        &self,
        requester_id: i64,
        todo_id: i64,
        manager_user_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        u_detect: &impl DetectUser,
        manager_write: &impl driven_ports::ManagerWriter,
    ) -> Result<i64, Error> {
        let todo = association::load_todo(todo_id, &mut *ext_cxn, todo_read).await?;
        let owner = association::require_owned_by(&todo, requester_id)?;
        domain::user::verify_user_exists(manager_user_id, &mut *ext_cxn, u_detect).await?;
        if manager_user_id == owner.id {
            return Err(Error::SelfAssignment {
                user_id: manager_user_id,
            });
        }

        let manager_id = manager_write
            .create_manager(todo_id, manager_user_id, &mut *ext_cxn)
            .await
            .trying_to("add a manager to a todo")?;

        info!(manager_id, todo_id, user_id = manager_user_id, "added manager");
        Ok(manager_id)
    }

    async fn managers_for_todo(
        &self,
        todo_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        manager_read: &impl driven_ports::ManagerReader,
    ) -> Result<Vec<Manager>, Error> {
        association::verify_todo_exists(todo_id, &mut *ext_cxn, todo_read).await?;

        manager_read
            .managers_for_todo(todo_id, &mut *ext_cxn)
            .await
            .trying_to("list the managers of a todo")
    }

    async fn delete_manager(
        &self,
        requester_id: i64,
        todo_id: i64,
        manager_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        manager_read: &impl driven_ports::ManagerReader,
        manager_write: &impl driven_ports::ManagerWriter,
    ) -> Result<(), Error> {
        let todo = association::load_todo(todo_id, &mut *ext_cxn, todo_read).await?;
        association::require_owned_by(&todo, requester_id)?;

        let manager = manager_read
            .get_by_id(manager_id, &mut *ext_cxn)
            .await
            .trying_to("load a manager")?
            .ok_or(Error::NotFound {
                entity: "manager",
                id: manager_id,
            })?;
        if manager.todo_id != todo_id {
            return Err(Error::ManagerNotOnTodo {
                manager_id,
                todo_id,
            });
        }

        manager_write
            .delete_manager(manager_id, &mut *ext_cxn)
            .await
            .trying_to("remove a manager")?;

        info!(manager_id, todo_id, "removed manager");
        Ok(())
    }
}
