use super::test_util::{insert_todo, insert_user, prepare_db_and_test};
use crate::domain::manager::driven_ports::ManagerReader;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::{NewTodo, PageRequest};
use crate::persistence::db_manager_driven_ports::DbManagerReader;
use crate::persistence::db_todo_driven_ports::{DbTodoReader, DbTodoWriter};
use chrono::{TimeZone, Utc};

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn created_todo_is_managed_by_its_author() {
    prepare_db_and_test(|mut ext_cxn, db| async move {
        let author_id = insert_user(&db, "author@example.com").await;
        let new_todo = NewTodo {
            title: "Buy groceries".into(),
            contents: "Milk and eggs".into(),
        };

        let todo_id = DbTodoWriter
            .create_todo(author_id, &new_todo, "Sunny", &mut ext_cxn)
            .await
            .expect("Todo insert failed");

        let todo = DbTodoReader
            .get_by_id(todo_id, &mut ext_cxn)
            .await
            .expect("Todo lookup failed")
            .expect("Inserted todo was not found");
        assert_eq!("Buy groceries", todo.title);
        assert_eq!(Some("Sunny".to_owned()), todo.weather);
        assert_eq!(
            Some(author_id),
            todo.owner.as_ref().map(|owner| owner.id)
        );

        let managers = DbManagerReader
            .managers_for_todo(todo_id, &mut ext_cxn)
            .await
            .expect("Manager lookup failed");
        assert_eq!(1, managers.len());
        assert_eq!(author_id, managers[0].user.id);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn lists_newest_first_with_id_tie_break() {
    prepare_db_and_test(|mut ext_cxn, db| async move {
        let owner_id = insert_user(&db, "owner@example.com").await;
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();

        let oldest = insert_todo(&db, Some(owner_id), "oldest", earlier).await;
        let tied_first = insert_todo(&db, Some(owner_id), "tied first", later).await;
        let tied_second = insert_todo(&db, None, "tied second", later).await;

        let page = DbTodoReader
            .list_by_recency(&PageRequest { page: 1, size: 2 }, &mut ext_cxn)
            .await
            .expect("Listing todos failed");
        assert_eq!(3, page.total_items);
        assert_eq!(
            vec![tied_second, tied_first],
            page.items.iter().map(|todo| todo.id).collect::<Vec<_>>()
        );
        assert!(page.items[0].owner.is_none());
        assert_eq!(
            Some("owner@example.com"),
            page.items[1].owner.as_ref().map(|owner| owner.email.as_str())
        );

        let second_page = DbTodoReader
            .list_by_recency(&PageRequest { page: 2, size: 2 }, &mut ext_cxn)
            .await
            .expect("Listing todos failed");
        assert_eq!(
            vec![oldest],
            second_page
                .items
                .iter()
                .map(|todo| todo.id)
                .collect::<Vec<_>>()
        );
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn counts_todos_by_id() {
    prepare_db_and_test(|mut ext_cxn, db| async move {
        let todo_id = insert_todo(&db, None, "orphan", Utc::now()).await;

        let found = DbTodoReader
            .count_by_id(todo_id, &mut ext_cxn)
            .await
            .expect("Counting failed");
        let missing = DbTodoReader
            .count_by_id(todo_id + 1, &mut ext_cxn)
            .await
            .expect("Counting failed");

        assert_eq!(1, found);
        assert_eq!(0, missing);
    });
}
