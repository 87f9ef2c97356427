/// Wire and validation limits for task definitions
///
/// Default size limit for one encoded TaskDef (matches the default gRPC
/// max receive message size).
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// Maximum nesting of (deprecated) group fields accepted while skipping
/// unknown fields
pub const MAX_GROUP_DEPTH: u32 = 100;

/// Largest field number allowed by the protobuf wire format
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Maximum byte length of a varint on the wire
pub const MAX_VARINT_LEN: usize = 10;

/// Default maximum length of a task definition name
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Default minimum for responseTimeoutSeconds (a task must report back at
/// least once per second of this window)
pub const DEFAULT_MIN_RESPONSE_TIMEOUT_SECONDS: i32 = 1;
