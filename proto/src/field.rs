use crate::enums::EnumKind;
use prost::encoding::WireType;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Fields of TaskDef, numbered as on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, FromRepr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum TaskDefField {
    Name = 1,
    Description = 2,
    RetryCount = 3,
    TimeoutSeconds = 4,
    InputKeys = 5,
    OutputKeys = 6,
    TimeoutPolicy = 7,
    RetryLogic = 8,
    RetryDelaySeconds = 9,
    ResponseTimeoutSeconds = 10,
    ConcurrentExecLimit = 11,
    InputTemplate = 12,
}

impl TaskDefField {
    pub fn number(&self) -> u32 {
        *self as u32
    }
    pub fn from_number(number: u32) -> Option<Self> {
        Self::from_repr(number)
    }
    pub fn name(&self) -> &'static str {
        self.into()
    }
    pub fn wire_type(&self) -> WireType {
        match self {
            TaskDefField::Name
            | TaskDefField::Description
            | TaskDefField::InputKeys
            | TaskDefField::OutputKeys
            | TaskDefField::InputTemplate => WireType::LengthDelimited,
            _ => WireType::Varint,
        }
    }
    pub fn is_repeated(&self) -> bool {
        matches!(
            self,
            TaskDefField::InputKeys | TaskDefField::OutputKeys | TaskDefField::InputTemplate
        )
    }
    pub fn enum_kind(&self) -> Option<EnumKind> {
        match self {
            TaskDefField::TimeoutPolicy => Some(EnumKind::TimeoutPolicy),
            TaskDefField::RetryLogic => Some(EnumKind::RetryLogic),
            _ => None,
        }
    }
    /// Zero value of the field: what a reader sees when the field is absent.
    pub fn default_value(&self) -> FieldValue {
        match self {
            TaskDefField::Name | TaskDefField::Description => FieldValue::String(String::new()),
            TaskDefField::TimeoutSeconds => FieldValue::Int64(0),
            TaskDefField::InputKeys | TaskDefField::OutputKeys => FieldValue::Strings(vec![]),
            TaskDefField::TimeoutPolicy => FieldValue::Enum(EnumKind::TimeoutPolicy, 0),
            TaskDefField::RetryLogic => FieldValue::Enum(EnumKind::RetryLogic, 0),
            TaskDefField::InputTemplate => FieldValue::Template(BTreeMap::new()),
            TaskDefField::RetryCount
            | TaskDefField::RetryDelaySeconds
            | TaskDefField::ResponseTimeoutSeconds
            | TaskDefField::ConcurrentExecLimit => FieldValue::Int32(0),
        }
    }
}

pub fn default_value(field: TaskDefField) -> FieldValue {
    field.default_value()
}

/// Value of one TaskDef field, as returned by `TaskDef::get`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int32(i32),
    Int64(i64),
    Strings(Vec<String>),
    /// raw enum number (may be outside the known members)
    Enum(EnumKind, i32),
    Template(BTreeMap<String, prost_types::Value>),
}

impl FieldValue {
    pub fn is_default(&self) -> bool {
        match self {
            FieldValue::String(s) => s.is_empty(),
            FieldValue::Int32(v) | FieldValue::Enum(_, v) => *v == 0,
            FieldValue::Int64(v) => *v == 0,
            FieldValue::Strings(v) => v.is_empty(),
            FieldValue::Template(m) => m.is_empty(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::Strings(v) => write!(f, "{:?}", v),
            FieldValue::Enum(kind, v) => write!(f, "{}", crate::enums::enum_name(*kind, *v)),
            FieldValue::Template(m) => {
                let json = crate::template::template_to_json(m);
                write!(f, "{}", serde_json::Value::Object(json))
            }
        }
    }
}
