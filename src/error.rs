use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Insufficient capacity: need {needed} bytes, image holds at most {capacity}")]
    InsufficientCapacity { needed: usize, capacity: usize },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Invalid algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Payload of {0} bytes cannot be described by the legacy length field")]
    PayloadTooLarge(usize),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification of a [`StegoError`], stable across message changes.
///
/// Front ends map these to their own labels or retry flows (for example
/// re-prompting on [`ErrorKind::InvalidPassword`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidHeader,
    InsufficientCapacity,
    InvalidPassword,
    CorruptData,
    InvalidAlgorithm,
    InvalidImage,
    InvalidConfig,
    Unsupported,
    Unexpected,
}

impl StegoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHeader(_) => ErrorKind::InvalidHeader,
            Self::InsufficientCapacity { .. } | Self::PayloadTooLarge(_) => {
                ErrorKind::InsufficientCapacity
            }
            Self::InvalidPassword => ErrorKind::InvalidPassword,
            Self::CorruptData(_) => ErrorKind::CorruptData,
            Self::InvalidAlgorithm(_) => ErrorKind::InvalidAlgorithm,
            Self::InvalidImage(_) => ErrorKind::InvalidImage,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Io(_)
            | Self::Json(_)
            | Self::CompressionError(_)
            | Self::Crypto(_)
            | Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(StegoError::InvalidPassword.kind(), ErrorKind::InvalidPassword);
        assert_eq!(
            StegoError::InsufficientCapacity { needed: 10, capacity: 5 }.kind(),
            ErrorKind::InsufficientCapacity
        );
        assert_eq!(StegoError::PayloadTooLarge(1 << 24).kind(), ErrorKind::InsufficientCapacity);
        assert_eq!(StegoError::Crypto("boom".into()).kind(), ErrorKind::Unexpected);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(StegoError::from(io).kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_display_carries_sizes() {
        let err = StegoError::InsufficientCapacity { needed: 1200, capacity: 800 };
        let msg = err.to_string();
        assert!(msg.contains("1200"));
        assert!(msg.contains("800"));
    }
}
