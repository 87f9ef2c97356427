use std::borrow::Cow;
use strum_macros::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// What happens when a task exceeds `timeout_seconds`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum TimeoutPolicy {
    /// mark the task timed out so it is retried
    #[default]
    Retry = 0,
    /// time out the whole workflow
    TimeOutWf = 1,
    /// only alert, the task keeps running
    AlertOnly = 2,
}

/// How the delay between retries grows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum RetryLogic {
    #[default]
    Fixed = 0,
    ExponentialBackoff = 1,
}

impl TimeoutPolicy {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        self.into()
    }
    pub fn from_str_name(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl RetryLogic {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        self.into()
    }
    pub fn from_str_name(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl From<TimeoutPolicy> for i32 {
    fn from(value: TimeoutPolicy) -> Self {
        value as i32
    }
}
impl From<RetryLogic> for i32 {
    fn from(value: RetryLogic) -> Self {
        value as i32
    }
}

/// The enumerations nested in TaskDef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EnumKind {
    TimeoutPolicy,
    RetryLogic,
}

impl EnumKind {
    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        match self {
            EnumKind::TimeoutPolicy => TimeoutPolicy::from_repr(value).map(|v| v.as_str_name()),
            EnumKind::RetryLogic => RetryLogic::from_repr(value).map(|v| v.as_str_name()),
        }
    }
    pub fn value_of(&self, name: &str) -> Option<i32> {
        match self {
            EnumKind::TimeoutPolicy => TimeoutPolicy::from_str_name(name).map(i32::from),
            EnumKind::RetryLogic => RetryLogic::from_str_name(name).map(i32::from),
        }
    }
    pub fn is_known(&self, value: i32) -> bool {
        self.name_of(value).is_some()
    }
}

/// Canonical name of `value`, or its decimal form when the value is not a
/// member of the enumeration (e.g. written by a newer schema).
pub fn enum_name(kind: EnumKind, value: i32) -> Cow<'static, str> {
    match kind.name_of(value) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(value.to_string()),
    }
}
