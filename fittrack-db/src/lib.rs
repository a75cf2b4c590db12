pub mod connection;
pub mod schema;
pub mod user;

pub use sqlx;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("username {0} is already taken")]
    DuplicateUsername(String),
}

pub type Result<T> = std::result::Result<T, Error>;
