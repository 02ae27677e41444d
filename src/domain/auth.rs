use crate::domain::credentials::PasswordEncoder;
use crate::domain::user::driven_ports::{DetectUser, UserReader, UserWriter};
use crate::domain::user::{NewUser, User, UserInsert, UserRole};
use crate::domain::{Error, PortResultExt};
use crate::external_connections::ExternalConnectivity;
use tracing::info;

#[cfg_attr(test, derive(Clone, Debug))]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[cfg_attr(test, derive(Clone, Debug))]
pub struct Signin {
    pub email: String,
    pub password: String,
}

pub mod driving_ports {
    use super::*;

    pub trait AuthPort {
        /// Registers a new user and returns their ID
        async fn signup(
            &self,
            signup: &Signup,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            u_write: &impl UserWriter,
        ) -> Result<i64, Error>;

        /// Checks a user's credentials, returning the user when they match
        async fn signin(
            &self,
            signin: &Signin,
            ext_cxn: &mut impl ExternalConnectivity,
            u_read: &impl UserReader,
        ) -> Result<User, Error>;
    }
}

#[derive(Default)]
pub struct AuthService {
    encoder: PasswordEncoder,
}

impl driving_ports::AuthPort for AuthService {
    async fn signup(
        &self,
        signup: &Signup,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        u_write: &impl UserWriter,
    ) -> Result<i64, Error> {
        let email_taken = u_detect
            .email_registered(&signup.email, &mut *ext_cxn)
            .await
            .trying_to("check for an existing email")?;
        if email_taken {
            return Err(Error::DuplicateEmail(signup.email.clone()));
        }

        let password = self
            .encoder
            .encode(&signup.password)
            .trying_to("encode a password")?;
        let insert = u_write
            .create_user(
                &NewUser {
                    email: signup.email.clone(),
                    password,
                    role: signup.role,
                },
                &mut *ext_cxn,
            )
            .await
            .trying_to("create a user")?;
        let UserInsert::Created(user_id) = insert else {
            return Err(Error::DuplicateEmail(signup.email.clone()));
        };

        info!(user_id, role = signup.role.as_str(), "user signed up");
        Ok(user_id)
    }

    async fn signin(
        &self,
        signin: &Signin,
        ext_cxn: &mut impl ExternalConnectivity,
        u_read: &impl UserReader,
    ) -> Result<User, Error> {
        let Some(user) = u_read
            .get_by_email(&signin.email, ext_cxn)
            .await
            .trying_to("look up a user by email")?
        else {
            return Err(Error::InvalidCredentials);
        };

        if !self.encoder.matches(&signin.password, &user.password) {
            return Err(Error::InvalidCredentials);
        }

        Ok(user)
    }
}
