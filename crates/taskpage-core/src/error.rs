use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no task with id {0}")]
    NotFound(u64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no edit session is open")]
    NotOpen,
}
