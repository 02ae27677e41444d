use thiserror::Error;
use validator::ValidationErrors;

pub mod association;
pub mod auth;
pub mod comment;
pub mod credentials;
pub mod manager;
pub mod password_policy;
pub mod todo;
pub mod user;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_util;

/// Who is responsible for a failure. The API layer picks the response status from this
/// without looking at error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The request was invalid or broke a precondition
    Caller,
    /// A collaborator the service depends on (weather API, database, hashing) failed
    Upstream,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("input was invalid: {0}")]
    Invalid(ValidationErrors),
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },
    #[error("a user with email {0} is already registered")]
    DuplicateEmail(String),
    #[error("the email or password was incorrect")]
    InvalidCredentials,
    #[error("the new password must differ from the current one")]
    PasswordUnchanged,
    #[error("invalid request: task {todo_id} has no valid owner")]
    MissingOwner { todo_id: i64 },
    #[error("invalid request: user {user_id} does not own task {todo_id}")]
    NotTodoOwner { todo_id: i64, user_id: i64 },
    #[error("invalid request: user {user_id} cannot be a manager of their own task")]
    SelfAssignment { user_id: i64 },
    #[error("invalid request: manager {manager_id} is not assigned to task {todo_id}")]
    ManagerNotOnTodo { manager_id: i64, todo_id: i64 },
    #[error(transparent)]
    Weather(#[from] weather::WeatherFault),
    #[error("failed to {action} due to a communication failure: {cause}")]
    PortFailure {
        action: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl Error {
    pub fn fault(&self) -> Fault {
        match self {
            Self::Invalid(_)
            | Self::NotFound { .. }
            | Self::DuplicateEmail(_)
            | Self::InvalidCredentials
            | Self::PasswordUnchanged
            | Self::MissingOwner { .. }
            | Self::NotTodoOwner { .. }
            | Self::SelfAssignment { .. }
            | Self::ManagerNotOnTodo { .. } => Fault::Caller,
            Self::Weather(_) | Self::PortFailure { .. } => Fault::Upstream,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}

/// Converts a driven port failure into a domain error with some extra info on the action
/// being taken when communicating over the port
pub(crate) trait PortResultExt<T> {
    fn trying_to(self, action: &str) -> Result<T, Error>;
}

impl<T> PortResultExt<T> for Result<T, anyhow::Error> {
    fn trying_to(self, action: &str) -> Result<T, Error> {
        self.map_err(|cause| Error::PortFailure {
            action: action.into(),
            cause,
        })
    }
}
