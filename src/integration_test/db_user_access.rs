use super::test_util::prepare_db_and_test;
use crate::domain::credentials::EncodedPassword;
use crate::domain::user::driven_ports::{DetectUser, UserReader, UserWriter};
use crate::domain::user::{NewUser, UserInsert, UserRole};
use crate::persistence::db_user_driven_ports::{DbDetectUser, DbReadUsers, DbWriteUsers};

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn registered_user_can_be_found() {
    prepare_db_and_test(|mut ext_cxn, _| async move {
        let user_id = DbWriteUsers
            .create_user(
                &NewUser {
                    email: "someone@example.com".into(),
                    password: EncodedPassword::from_stored("$argon2id$first".into()),
                    role: UserRole::Admin,
                },
                &mut ext_cxn,
            )
            .await
            .expect("User insert failed");
        let UserInsert::Created(user_id) = user_id else {
            panic!("Fresh email was reported as taken");
        };

        let by_email = DbReadUsers
            .get_by_email("someone@example.com", &mut ext_cxn)
            .await
            .expect("User lookup failed")
            .expect("Inserted user was not found by email");
        assert_eq!(user_id, by_email.id);
        assert_eq!(UserRole::Admin, by_email.role);
        assert_eq!("$argon2id$first", by_email.password.as_str());

        let registered = DbDetectUser
            .email_registered("someone@example.com", &mut ext_cxn)
            .await
            .expect("Email check failed");
        let exists = DbDetectUser
            .user_exists(user_id, &mut ext_cxn)
            .await
            .expect("Existence check failed");
        assert!(registered);
        assert!(exists);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn password_update_is_persisted() {
    prepare_db_and_test(|mut ext_cxn, _| async move {
        let user_id = DbWriteUsers
            .create_user(
                &NewUser {
                    email: "someone@example.com".into(),
                    password: EncodedPassword::from_stored("$argon2id$first".into()),
                    role: UserRole::User,
                },
                &mut ext_cxn,
            )
            .await
            .expect("User insert failed");
        let UserInsert::Created(user_id) = user_id else {
            panic!("Fresh email was reported as taken");
        };

        DbWriteUsers
            .update_password(
                user_id,
                &EncodedPassword::from_stored("$argon2id$second".into()),
                &mut ext_cxn,
            )
            .await
            .expect("Password update failed");

        let user = DbReadUsers
            .get_by_id(user_id, &mut ext_cxn)
            .await
            .expect("User lookup failed")
            .expect("User disappeared");
        assert_eq!("$argon2id$second", user.password.as_str());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn second_insert_with_same_email_is_taken() {
    prepare_db_and_test(|mut ext_cxn, _| async move {
        let new_user = NewUser {
            email: "someone@example.com".into(),
            password: EncodedPassword::from_stored("$argon2id$first".into()),
            role: UserRole::User,
        };

        let first = DbWriteUsers
            .create_user(&new_user, &mut ext_cxn)
            .await
            .expect("First user insert failed");
        let second = DbWriteUsers
            .create_user(&new_user, &mut ext_cxn)
            .await
            .expect("Duplicate insert should not be a store failure");

        assert!(matches!(first, UserInsert::Created(_)));
        assert_eq!(UserInsert::EmailTaken, second);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn unknown_user_is_absent() {
    prepare_db_and_test(|mut ext_cxn, _| async move {
        let user = DbReadUsers
            .get_by_id(404, &mut ext_cxn)
            .await
            .expect("User lookup failed");
        let registered = DbDetectUser
            .email_registered("nobody@example.com", &mut ext_cxn)
            .await
            .expect("Email check failed");

        assert!(user.is_none());
        assert!(!registered);
    });
}
