use super::{Count, NewId};
use crate::domain;
use crate::domain::credentials::EncodedPassword;
use crate::domain::user::{NewUser, User, UserInsert, UserRole};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, anyhow};
use sqlx::{query, query_as};

pub struct DbDetectUser;

impl domain::user::driven_ports::DetectUser for DbDetectUser {
    async fn user_exists(
        &self,
        user_id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, anyhow::Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let user_with_id_count =
            query_as::<_, Count>("SELECT count(*) AS count FROM users u WHERE u.id = $1")
                .bind(user_id)
                .fetch_one(connection.borrow_connection())
                .await
                .context("Detecting user with ID")?;

        Ok(user_with_id_count.count > 0)
    }

    async fn email_registered(
        &self,
        email: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, anyhow::Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let user_with_email_count =
            query_as::<_, Count>("SELECT count(*) AS count FROM users u WHERE u.email = $1")
                .bind(email)
                .fetch_one(connection.borrow_connection())
                .await
                .context("Detecting user via email")?;

        Ok(user_with_email_count.count > 0)
    }
}

pub struct DbReadUsers;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
    user_role: String,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&value.user_role)
            .ok_or_else(|| anyhow!("user {} has unknown role {}", value.id, value.user_role))?;

        Ok(User {
            id: value.id,
            email: value.email,
            password: EncodedPassword::from_stored(value.password),
            role,
        })
    }
}

impl domain::user::driven_ports::UserReader for DbReadUsers {
    async fn get_by_id(
        &self,
        id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<User>, anyhow::Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, UserRow>(
            "SELECT u.id, u.email, u.password, u.user_role FROM users u WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(cxn_handle.borrow_connection())
        .await
        .context("Fetching a user by id")?;

        user.map(User::try_from).transpose()
    }

    async fn get_by_email(
        &self,
        email: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<User>, anyhow::Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let user = query_as::<_, UserRow>(
            "SELECT u.id, u.email, u.password, u.user_role FROM users u WHERE u.email = $1",
        )
        .bind(email)
        .fetch_optional(cxn_handle.borrow_connection())
        .await
        .context("Fetching a user by email")?;

        user.map(User::try_from).transpose()
    }
}

pub struct DbWriteUsers;

impl domain::user::driven_ports::UserWriter for DbWriteUsers {
    async fn create_user(
        &self,
        user: &NewUser,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<UserInsert, anyhow::Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        let inserted = query_as::<_, NewId>(
            "INSERT INTO users(email, password, user_role) VALUES ($1, $2, $3) RETURNING users.id",
        )
        .bind(&user.email)
        .bind(user.password.as_str())
        .bind(user.role.as_str())
        .fetch_one(cxn_handle.borrow_connection())
        .await;

        match inserted {
            Ok(new_user) => Ok(UserInsert::Created(new_user.id)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(UserInsert::EmailTaken)
            }
            Err(err) => Err(err).context("Inserting new user"),
        }
    }

    async fn update_password(
        &self,
        user_id: i64,
        password: &EncodedPassword,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), anyhow::Error> {
        let mut cxn_handle = ext_cxn.database_cxn().await?;

        query("UPDATE users SET password = $1, modified_at = now() WHERE id = $2")
            .bind(password.as_str())
            .bind(user_id)
            .execute(cxn_handle.borrow_connection())
            .await
            .context("Updating a user's password")?;

        Ok(())
    }
}
