//! TaskDef data contract of the conductor workflow client.
//!
//! The wire format is `protobuf/conductor/model/taskdef.proto`. Encoding and
//! decoding are hand written (see [`wire`]) so that unknown fields survive a
//! round trip and decode failures are typed.
//!
//! ```rust,ignore
//! use proto::{TaskDef, WireMessage};
//!
//! let def = TaskDef {
//!     name: "sendEmail".to_string(),
//!     retry_count: 3,
//!     ..Default::default()
//! };
//! let bytes = def.encode_to_vec();
//! assert_eq!(TaskDef::decode(&bytes)?, def);
//! ```

pub mod enums;
pub mod field;
pub mod json;
pub mod policy;
pub mod task_def;
pub mod template;
pub mod validation;
pub mod wire;

pub use conductor_base::codec::WireMessage;
pub use conductor_base::error::{DecodeError, DecodeErrorKind};
pub use enums::{enum_name, EnumKind, RetryLogic, TimeoutPolicy};
pub use field::{default_value, FieldValue, TaskDefField};
pub use task_def::TaskDef;
pub use wire::{UnknownField, UnknownFields};

/// Mirrors the package layout of the generated bindings.
pub mod conductor {
    pub mod model {
        pub use crate::enums::{RetryLogic, TimeoutPolicy};
        pub use crate::task_def::TaskDef;
    }
}

#[cfg(test)]
mod tests;
