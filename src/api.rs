pub mod auth;
pub mod comment;
pub mod manager;
pub mod swagger_main;
pub mod todo;
pub mod user;

#[cfg(test)]
pub mod test_util;
