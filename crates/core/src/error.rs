use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyPathError {
    #[error("Invalid key path: empty list")]
    EmptyList,

    #[error("Invalid key path: unexpected {0} element")]
    InvalidElement(String),
}

pub type Result<T> = std::result::Result<T, KeyPathError>;
