use thiserror::Error;

/// Construction errors of [`SimpleTypewriter`](crate::SimpleTypewriter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypewriterError {
    #[error("target must be a visual element")]
    InvalidTarget,
    #[error("texts must not be empty")]
    EmptyTexts,
}
