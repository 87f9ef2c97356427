//! JSON form of a task definition (camelCase keys, enums by name).
//!
//! Unknown wire fields have no JSON representation and are dropped.

use crate::enums::EnumKind;
use crate::task_def::TaskDef;
use crate::template::{template_from_json, template_to_json};
use conductor_base::error::TaskDefError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Enum value in JSON: canonical name, or the number when it has no name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum EnumRepr {
    Name(String),
    Number(i32),
}

impl EnumRepr {
    fn from_raw(kind: EnumKind, value: i32) -> Self {
        match kind.name_of(value) {
            Some(name) => EnumRepr::Name(name.to_string()),
            None => EnumRepr::Number(value),
        }
    }
    fn into_raw(self, kind: EnumKind) -> Result<i32, TaskDefError> {
        match self {
            EnumRepr::Number(v) => Ok(v),
            EnumRepr::Name(name) => kind.value_of(&name).ok_or_else(|| {
                TaskDefError::InvalidParameter(format!("unknown {} name: {}", kind, name))
            }),
        }
    }
}

impl Default for EnumRepr {
    fn default() -> Self {
        EnumRepr::Number(0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDefJson {
    pub name: String,
    pub description: String,
    pub retry_count: i32,
    pub timeout_seconds: i64,
    pub input_keys: Vec<String>,
    pub output_keys: Vec<String>,
    pub timeout_policy: EnumRepr,
    pub retry_logic: EnumRepr,
    pub retry_delay_seconds: i32,
    pub response_timeout_seconds: i32,
    pub concurrent_exec_limit: i32,
    pub input_template: serde_json::Map<String, serde_json::Value>,
}

impl From<&TaskDef> for TaskDefJson {
    fn from(def: &TaskDef) -> Self {
        Self {
            name: def.name.clone(),
            description: def.description.clone(),
            retry_count: def.retry_count,
            timeout_seconds: def.timeout_seconds,
            input_keys: def.input_keys.clone(),
            output_keys: def.output_keys.clone(),
            timeout_policy: EnumRepr::from_raw(EnumKind::TimeoutPolicy, def.timeout_policy),
            retry_logic: EnumRepr::from_raw(EnumKind::RetryLogic, def.retry_logic),
            retry_delay_seconds: def.retry_delay_seconds,
            response_timeout_seconds: def.response_timeout_seconds,
            concurrent_exec_limit: def.concurrent_exec_limit,
            input_template: template_to_json(&def.input_template),
        }
    }
}

impl TryFrom<TaskDefJson> for TaskDef {
    type Error = TaskDefError;

    fn try_from(json: TaskDefJson) -> Result<Self, Self::Error> {
        Ok(TaskDef {
            input_template: template_from_json(&json.input_template),
            name: json.name,
            description: json.description,
            retry_count: json.retry_count,
            timeout_seconds: json.timeout_seconds,
            input_keys: json.input_keys,
            output_keys: json.output_keys,
            timeout_policy: json.timeout_policy.into_raw(EnumKind::TimeoutPolicy)?,
            retry_logic: json.retry_logic.into_raw(EnumKind::RetryLogic)?,
            retry_delay_seconds: json.retry_delay_seconds,
            response_timeout_seconds: json.response_timeout_seconds,
            concurrent_exec_limit: json.concurrent_exec_limit,
            unknown_fields: Default::default(),
        })
    }
}

impl Serialize for TaskDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaskDefJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TaskDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = TaskDefJson::deserialize(deserializer)?;
        TaskDef::try_from(json).map_err(serde::de::Error::custom)
    }
}

impl TaskDef {
    pub fn to_json_value(&self) -> Result<serde_json::Value, TaskDefError> {
        serde_json::to_value(self).map_err(TaskDefError::from)
    }
    pub fn from_json_str(s: &str) -> Result<Self, TaskDefError> {
        serde_json::from_str(s).map_err(TaskDefError::from)
    }
}
