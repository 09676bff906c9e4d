use thiserror::Error;

#[derive(Debug, Error)]
pub enum MntError {
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("invalid value for {field}: {value}")]
    InvalidFilterValue { field: &'static str, value: String },
    #[error("malformed shard notation: {0}")]
    MalformedShardNotation(String),
    #[error("cluster snapshot unavailable: {0}")]
    SnapshotUnavailable(String),
    #[error("invalid cluster snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("malformed {kind} payload: {message}")]
    MalformedPayload { kind: &'static str, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MntError {
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFilterValue {
            field,
            value: value.into(),
        }
    }

    pub fn malformed_payload(kind: &'static str, err: impl std::fmt::Display) -> Self {
        Self::MalformedPayload {
            kind,
            message: err.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NodeNotFound(_) => "NodeNotFound",
            Self::InvalidFilterValue { .. } => "InvalidFilterValue",
            Self::MalformedShardNotation(_) => "MalformedShardNotation",
            Self::SnapshotUnavailable(_) => "SnapshotUnavailable",
            Self::InvalidSnapshot(_) => "InvalidSnapshot",
            Self::MalformedPayload { .. } => "MalformedPayload",
            Self::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, MntError>;
