use crate::domain::credentials::{EncodedPassword, PasswordEncoder};
use crate::domain::{Error, PortResultExt};
use crate::external_connections::ExternalConnectivity;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "ADMIN" => Some(Self::Admin),
            "USER" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: EncodedPassword,
    pub role: UserRole,
}

/// The public face of a user as it appears next to todos, managers and comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(value: &User) -> Self {
        UserSummary {
            id: value.id,
            email: value.email.clone(),
        }
    }
}

pub struct NewUser {
    pub email: String,
    pub password: EncodedPassword,
    pub role: UserRole,
}

/// Outcome of storing a new user. Storage enforces email uniqueness, so a signup that races
/// another one for the same email ends up as [UserInsert::EmailTaken].
#[derive(Debug, PartialEq, Eq)]
pub enum UserInsert {
    Created(i64),
    EmailTaken,
}

#[cfg_attr(test, derive(Clone, Debug))]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
}

pub mod driven_ports {
    use super::*;

    pub trait UserReader {
        async fn get_by_id(
            &self,
            id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<User>, anyhow::Error>;

        async fn get_by_email(
            &self,
            email: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<User>, anyhow::Error>;
    }

    pub trait UserWriter {
        async fn create_user(
            &self,
            user: &NewUser,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<UserInsert, anyhow::Error>;

        async fn update_password(
            &self,
            user_id: i64,
            password: &EncodedPassword,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }

    pub trait DetectUser {
        async fn user_exists(
            &self,
            user_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        async fn email_registered(
            &self,
            email: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait UserPort {
        async fn get_user(
            &self,
            user_id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Option<User>, Error>;

        async fn change_password(
            &self,
            user_id: i64,
            change: &ChangePassword,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
            u_writer: &impl driven_ports::UserWriter,
        ) -> Result<(), Error>;
    }
}

pub(super) async fn verify_user_exists(
    id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    user_detect: &impl driven_ports::DetectUser,
) -> Result<(), Error> {
    let does_user_exist = user_detect
        .user_exists(id, ext_cxn)
        .await
        .trying_to("look up a user")?;

    if does_user_exist {
        Ok(())
    } else {
        Err(Error::NotFound {
            entity: "user",
            id,
        })
    }
}

/// Looks up a user who must exist for the current operation to make sense
pub(super) async fn require_user(
    id: i64,
    ext_cxn: &mut impl ExternalConnectivity,
    u_reader: &impl driven_ports::UserReader,
) -> Result<User, Error> {
    u_reader
        .get_by_id(id, ext_cxn)
        .await
        .trying_to("load a user")?
        .ok_or(Error::NotFound {
            entity: "user",
            id,
        })
}

#[derive(Default)]
pub struct UserService {
    encoder: PasswordEncoder,
}

impl driving_ports::UserPort for UserService {
    async fn get_user(
        &self,
        user_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Option<User>, Error> {
        u_reader
            .get_by_id(user_id, ext_cxn)
            .await
            .trying_to("fetch a user")
    }

    async fn change_password(
        &self,
        user_id: i64,
        change: &ChangePassword,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
        u_writer: &impl driven_ports::UserWriter,
    ) -> Result<(), Error> {
        let user = require_user(user_id, &mut *ext_cxn, u_reader).await?;

        if self.encoder.matches(&change.new_password, &user.password) {
            return Err(Error::PasswordUnchanged);
        }
        if !self.encoder.matches(&change.old_password, &user.password) {
            return Err(Error::InvalidCredentials);
        }

        let encoded = self
            .encoder
            .encode(&change.new_password)
            .trying_to("encode the new password")?;
        u_writer
            .update_password(user_id, &encoded, &mut *ext_cxn)
            .await
            .trying_to("store the new password")?;

        info!(user_id, "password changed");
        Ok(())
    }
}


#[cfg(test)]
mod user_service_tests {
    use super::*;
    use crate::domain::test_util::Connectivity;
    use crate::domain::user::driving_ports::UserPort;
    use crate::external_connections;
    use speculoos::prelude::*;
    use std::sync::RwLock;

    fn change(old_password: &str, new_password: &str) -> ChangePassword {
        ChangePassword {
            old_password: old_password.to_owned(),
            new_password: new_password.to_owned(),
        }
    }

    #[tokio::test]
    async fn get_user_finds_user() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let user_data = RwLock::new(test_util::InMemoryUserPersistence::new_with_users(&[
            test_util::user_create_default(),
        ]));

        let user_result = UserService::default()
            .get_user(1, &mut ext_cxn, &user_data)
            .await;
        assert_that!(user_result)
            .is_ok()
            .is_some()
            .matches(|user| user.id == 1 && user.email == "first@example.com");
    }

    #[tokio::test]
    async fn get_user_returns_none_for_unknown_id() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let user_data = test_util::InMemoryUserPersistence::new_locked();

        let user_result = UserService::default()
            .get_user(7, &mut ext_cxn, &user_data)
            .await;
        assert_that!(user_result).is_ok().is_none();
    }

    #[tokio::test]
    async fn change_password_happy_path() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let user_data = RwLock::new(test_util::InMemoryUserPersistence::new_with_users(&[
            test_util::user_create_default(),
        ]));
        let service = UserService::default();

        let change_result = service
            .change_password(
                1,
                &change(test_util::DEFAULT_PASSWORD, "Changed123"),
                &mut ext_cxn,
                &user_data,
                &user_data,
            )
            .await;
        assert_that!(change_result).is_ok();

        let locked_users = user_data.read().expect("user rwlock poisoned");
        let stored = &locked_users.created_users[0].password;
        assert!(PasswordEncoder.matches("Changed123", stored));
        assert!(!PasswordEncoder.matches(test_util::DEFAULT_PASSWORD, stored));
    }

    #[tokio::test]
    async fn change_password_rejects_wrong_old_password() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let user_data = RwLock::new(test_util::InMemoryUserPersistence::new_with_users(&[
            test_util::user_create_default(),
        ]));

        let change_result = UserService::default()
            .change_password(
                1,
                &change("NotMine123", "Changed123"),
                &mut ext_cxn,
                &user_data,
                &user_data,
            )
            .await;
        assert_that!(change_result)
            .is_err()
            .matches(|err| matches!(err, Error::InvalidCredentials));

        let locked_users = user_data.read().expect("user rwlock poisoned");
        assert!(PasswordEncoder.matches(
            test_util::DEFAULT_PASSWORD,
            &locked_users.created_users[0].password
        ));
    }

    #[tokio::test]
    async fn change_password_rejects_unchanged_password() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let user_data = RwLock::new(test_util::InMemoryUserPersistence::new_with_users(&[
            test_util::user_create_default(),
        ]));

        let change_result = UserService::default()
            .change_password(
                1,
                &change(test_util::DEFAULT_PASSWORD, test_util::DEFAULT_PASSWORD),
                &mut ext_cxn,
                &user_data,
                &user_data,
            )
            .await;
        assert_that!(change_result)
            .is_err()
            .matches(|err| matches!(err, Error::PasswordUnchanged));
    }

    #[tokio::test]
    async fn change_password_for_unknown_user() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let user_data = test_util::InMemoryUserPersistence::new_locked();

        let change_result = UserService::default()
            .change_password(
                3,
                &change(test_util::DEFAULT_PASSWORD, "Changed123"),
                &mut ext_cxn,
                &user_data,
                &user_data,
            )
            .await;
        assert_that!(change_result).is_err().matches(|err| {
            matches!(
                err,
                Error::NotFound {
                    entity: "user",
                    id: 3
                }
            )
        });
    }

    #[tokio::test]
    async fn change_password_propagates_port_error() {
        let mut ext_cxn = external_connections::test_util::FakeExternalConnectivity::new();
        let mut user_persistence = test_util::InMemoryUserPersistence::new();
        user_persistence.connectivity = Connectivity::Disconnected;
        let user_data = RwLock::new(user_persistence);

        let change_result = UserService::default()
            .change_password(
                1,
                &change(test_util::DEFAULT_PASSWORD, "Changed123"),
                &mut ext_cxn,
                &user_data,
                &user_data,
            )
            .await;
        assert_that!(change_result)
            .is_err()
            .matches(|err| matches!(err, Error::PortFailure { .. }));
    }
}
