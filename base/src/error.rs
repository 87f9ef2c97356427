use prost::encoding::WireType;
use thiserror::Error;

/// Category of a wire decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    Malformed,
    TypeMismatch,
    Truncated,
}

/// Failure while decoding protobuf wire bytes.
///
/// `offset` is the position in the input buffer where the offending
/// field (or varint) starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Malformed({reason} at offset {offset})")]
    Malformed { offset: usize, reason: String },
    #[error("TypeMismatch(field {field} expects {expected:?} but found {found:?} at offset {offset})")]
    TypeMismatch {
        offset: usize,
        field: u32,
        expected: WireType,
        found: WireType,
    },
    #[error("Truncated(needed {needed} more byte(s) at offset {offset})")]
    Truncated { offset: usize, needed: usize },
}

impl DecodeError {
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::Malformed {
            offset,
            reason: reason.into(),
        }
    }
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Malformed { .. } => DecodeErrorKind::Malformed,
            DecodeError::TypeMismatch { .. } => DecodeErrorKind::TypeMismatch,
            DecodeError::Truncated { .. } => DecodeErrorKind::Truncated,
        }
    }
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Malformed { offset, .. }
            | DecodeError::TypeMismatch { offset, .. }
            | DecodeError::Truncated { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskDefError {
    #[error("CodecError({0})")]
    CodecError(DecodeError),
    #[error("MessageTooLarge(size {size} exceeds limit {limit})")]
    MessageTooLarge { size: usize, limit: usize },
    #[error("ValidationError({})", .0.join("; "))]
    ValidationError(Vec<String>),
    #[error("InvalidParameter({0})")]
    InvalidParameter(String),
    #[error("serde_json error({0:?})")]
    SerdeJsonError(serde_json::Error),
    #[error("ConfigError({0})")]
    ConfigError(String),
}

impl TaskDefError {
    /// Returns true if the payload itself is broken (as opposed to a
    /// well-formed payload carrying an invalid definition).
    pub fn is_codec_failure(&self) -> bool {
        matches!(
            self,
            TaskDefError::CodecError(_) | TaskDefError::MessageTooLarge { .. }
        )
    }
}

impl From<DecodeError> for TaskDefError {
    fn from(e: DecodeError) -> Self {
        TaskDefError::CodecError(e)
    }
}
impl From<serde_json::Error> for TaskDefError {
    fn from(e: serde_json::Error) -> Self {
        TaskDefError::SerdeJsonError(e)
    }
}
impl From<envy::Error> for TaskDefError {
    fn from(e: envy::Error) -> Self {
        TaskDefError::ConfigError(e.to_string())
    }
}
