use super::test_util::{insert_todo, insert_user, prepare_db_and_test};
use crate::domain::comment::NewComment;
use crate::domain::comment::driven_ports::{CommentReader, CommentWriter};
use crate::domain::manager::driven_ports::{ManagerReader, ManagerWriter};
use crate::external_connections::{Transactable, TransactionHandle};
use crate::persistence::db_comment_driven_ports::{DbCommentReader, DbCommentWriter};
use crate::persistence::db_manager_driven_ports::{DbManagerReader, DbManagerWriter};
use chrono::Utc;

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn manager_lifecycle() {
    prepare_db_and_test(|mut ext_cxn, db| async move {
        let owner_id = insert_user(&db, "owner@example.com").await;
        let helper_id = insert_user(&db, "helper@example.com").await;
        let todo_id = insert_todo(&db, Some(owner_id), "Paint fence", Utc::now()).await;

        let manager_id = DbManagerWriter
            .create_manager(todo_id, helper_id, &mut ext_cxn)
            .await
            .expect("Manager insert failed");
        let manager = DbManagerReader
            .get_by_id(manager_id, &mut ext_cxn)
            .await
            .expect("Manager lookup failed")
            .expect("Inserted manager was not found");
        assert_eq!(todo_id, manager.todo_id);
        assert_eq!("helper@example.com", manager.user.email);

        DbManagerWriter
            .delete_manager(manager_id, &mut ext_cxn)
            .await
            .expect("Manager delete failed");
        let after_delete = DbManagerReader
            .get_by_id(manager_id, &mut ext_cxn)
            .await
            .expect("Manager lookup failed");
        assert!(after_delete.is_none());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn comments_come_back_oldest_first() {
    prepare_db_and_test(|mut ext_cxn, db| async move {
        let owner_id = insert_user(&db, "owner@example.com").await;
        let todo_id = insert_todo(&db, Some(owner_id), "Paint fence", Utc::now()).await;

        for contents in ["first", "second"] {
            DbCommentWriter
                .create_comment(
                    todo_id,
                    owner_id,
                    &NewComment {
                        contents: contents.into(),
                    },
                    &mut ext_cxn,
                )
                .await
                .expect("Comment insert failed");
        }

        let comments = DbCommentReader
            .comments_for_todo(todo_id, &mut ext_cxn)
            .await
            .expect("Comment lookup failed");
        assert_eq!(
            vec!["first", "second"],
            comments
                .iter()
                .map(|comment| comment.contents.as_str())
                .collect::<Vec<_>>()
        );
        assert!(
            comments
                .iter()
                .all(|comment| comment.author.email == "owner@example.com")
        );
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn uncommitted_manager_is_discarded() {
    prepare_db_and_test(|mut ext_cxn, db| async move {
        let owner_id = insert_user(&db, "owner@example.com").await;
        let helper_id = insert_user(&db, "helper@example.com").await;
        let todo_id = insert_todo(&db, Some(owner_id), "Paint fence", Utc::now()).await;

        {
            let mut txn = ext_cxn
                .start_transaction()
                .await
                .expect("Transaction should start");
            DbManagerWriter
                .create_manager(todo_id, helper_id, &mut txn)
                .await
                .expect("Manager insert failed");
        }
        let after_rollback = DbManagerReader
            .managers_for_todo(todo_id, &mut ext_cxn)
            .await
            .expect("Manager lookup failed");
        assert!(after_rollback.is_empty());

        let mut txn = ext_cxn
            .start_transaction()
            .await
            .expect("Transaction should start");
        DbManagerWriter
            .create_manager(todo_id, helper_id, &mut txn)
            .await
            .expect("Manager insert failed");
        txn.commit().await.expect("Commit failed");

        let after_commit = DbManagerReader
            .managers_for_todo(todo_id, &mut ext_cxn)
            .await
            .expect("Manager lookup failed");
        assert_eq!(1, after_commit.len());
    });
}
