//! Checks shared by everything that hangs off a todo (managers and comments). A todo whose
//! owner can't be resolved never gets new associations.

use crate::domain::todo::Todo;
use crate::domain::todo::driven_ports::TodoReader;
use crate::domain::user::UserSummary;
use crate::domain::{Error, PortResultExt};
use crate::external_connections::ExternalConnectivity;

pub(super) fn require_owner(todo: &Todo) -> Result<&UserSummary, Error> {
    todo.owner
        .as_ref()
        .ok_or(Error::MissingOwner { todo_id: todo.id })
}

/// Like [require_owner], but the owner must also be the given user
pub(super) fn require_owned_by(todo: &Todo, user_id: i64) -> Result<&UserSummary, Error> {
    let owner = require_owner(todo)?;
    if owner.id != user_id {
        return Err(Error::NotTodoOwner {
            todo_id: todo.id,
            user_id,
        });
    }

    Ok(owner)
}

pub(super) async fn load_todo(
    todo_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_read: &impl TodoReader,
) -> Result<Todo, Error> {
    todo_read
        .get_by_id(todo_id, ext_cxn)
        .await
        .trying_to("load a todo")?
        .ok_or(Error::NotFound {
            entity: "todo",
            id: todo_id,
        })
}

/// Existence check for listings which don't need the todo itself
pub(super) async fn verify_todo_exists(
    todo_id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_read: &impl TodoReader,
) -> Result<(), Error> {
    let todo_count = todo_read
        .count_by_id(todo_id, ext_cxn)
        .await
        .trying_to("look up a todo")?;

    if todo_count > 0 {
        Ok(())
    } else {
        Err(Error::NotFound {
            entity: "todo",
            id: todo_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fault;
    use crate::domain::test_util::Connectivity;
    use crate::domain::todo::test_util::{InMemoryTodoPersistence, minutes};
    use crate::external_connections;
    use speculoos::prelude::*;
    use std::sync::RwLock;

    fn todo_owned_by(owner: Option<i64>) -> Todo {
        Todo {
            id: 12,
            title: "Sweep".to_owned(),
            contents: "The porch".to_owned(),
            weather: None,
            owner: owner.map(|id| UserSummary {
                id,
                email: format!("user{id}@example.com"),
            }),
            modified_at: minutes(0),
        }
    }

    #[test]
    fn ownerless_todo_is_a_caller_fault() {
        let todo = todo_owned_by(None);

        let owner_result = require_owner(&todo);
        assert_that!(owner_result).is_err().matches(|err| {
            matches!(err, Error::MissingOwner { todo_id: 12 }) && err.fault() == Fault::Caller
        });
    }

    #[test]
    fn owned_todo_yields_owner() {
        let todo = todo_owned_by(Some(4));

        assert_that!(require_owner(&todo))
            .is_ok()
            .matches(|owner| owner.id == 4);
    }

    #[test]
    fn someone_elses_todo_is_rejected() {
        let todo = todo_owned_by(Some(4));

        assert_that!(require_owned_by(&todo, 5)).is_err().matches(|err| {
            matches!(
                err,
                Error::NotTodoOwner {
                    todo_id: 12,
                    user_id: 5
                }
            )
        });
        assert_that!(require_owned_by(&todo, 4)).is_ok();
    }

    #[test]
    fn ownership_check_reports_missing_owner_first() {
        let todo = todo_owned_by(None);

        assert_that!(require_owned_by(&todo, 4))
            .is_err()
            .matches(|err| matches!(err, Error::MissingOwner { todo_id: 12 }));
    }

    #[tokio::test]
    async fn load_todo_reports_unknown_id() {
        let todo_persist = InMemoryTodoPersistence::new_locked();
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();

        let load_result = load_todo(40, &mut ext_cxn, &todo_persist).await;
        assert_that!(load_result).is_err().matches(|err| {
            matches!(
                err,
                Error::NotFound {
                    entity: "todo",
                    id: 40
                }
            )
        });
    }

    #[tokio::test]
    async fn verify_todo_exists_counts_without_loading() {
        let mut persistence = InMemoryTodoPersistence::new();
        persistence.add_todo(Some(1), "Sweep", minutes(0));
        let todo_persist = RwLock::new(persistence);
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();

        assert_that!(verify_todo_exists(1, &mut ext_cxn, &todo_persist).await).is_ok();
        assert_that!(verify_todo_exists(2, &mut ext_cxn, &todo_persist).await)
            .is_err()
            .matches(|err| matches!(err, Error::NotFound { entity: "todo", id: 2 }));

        let locked_todos = todo_persist.read().expect("todo rwlock poisoned");
        assert_eq!(0, locked_todos.owner_resolutions);
    }

    #[tokio::test]
    async fn load_todo_propagates_port_error() {
        let mut persistence = InMemoryTodoPersistence::new();
        persistence.connectivity = Connectivity::Disconnected;
        let todo_persist = RwLock::new(persistence);
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();

        let load_result = load_todo(1, &mut ext_cxn, &todo_persist).await;
        assert_that!(load_result)
            .is_err()
            .matches(|err| matches!(err, Error::PortFailure { .. }));
    }
}
