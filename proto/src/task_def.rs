use crate::enums::{enum_name, EnumKind, RetryLogic, TimeoutPolicy};
use crate::field::{FieldValue, TaskDefField};
use crate::wire::{FieldKey, UnknownField, UnknownFields, WireReader};
use bytes::{BufMut, Bytes};
use conductor_base::codec::WireMessage;
use conductor_base::error::DecodeError;
use once_cell::sync::Lazy;
use prost::encoding::{
    encode_key, encode_varint, encoded_len_varint, int32, int64, key_len, message, string,
    WireType,
};
use prost::Message;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Definition of a reusable task type: retry/timeout behaviour and the
/// shape of its input and output.
///
/// Enum fields hold the raw wire number so that values written by a newer
/// schema survive a decode/encode cycle; use the typed getters
/// ([`TaskDef::timeout_policy`], [`TaskDef::retry_logic`]) to interpret them.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TaskDef {
    pub name: String,
    pub description: String,
    pub retry_count: i32,
    /// 0: no timeout
    pub timeout_seconds: i64,
    pub input_keys: Vec<String>,
    pub output_keys: Vec<String>,
    pub timeout_policy: i32,
    pub retry_logic: i32,
    pub retry_delay_seconds: i32,
    pub response_timeout_seconds: i32,
    /// 0: unlimited
    pub concurrent_exec_limit: i32,
    pub input_template: BTreeMap<String, prost_types::Value>,
    /// fields not known to this schema, re-encoded verbatim after the known ones
    pub unknown_fields: UnknownFields,
}

static DEFAULT_TASK_DEF: Lazy<TaskDef> = Lazy::new(TaskDef::default);

const TEMPLATE_ENTRY_KEY_TAG: u32 = 1;
const TEMPLATE_ENTRY_VALUE_TAG: u32 = 2;

impl TaskDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Shared all-defaults record, for reading fields of an absent definition:
    /// `maybe_def.unwrap_or_else(TaskDef::default_instance).retry_count`
    pub fn default_instance() -> &'static TaskDef {
        &DEFAULT_TASK_DEF
    }

    /// Returns the enum value of `timeout_policy`, or the default if the field
    /// is set to an invalid enum value.
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        TimeoutPolicy::from_repr(self.timeout_policy).unwrap_or_default()
    }
    pub fn set_timeout_policy(&mut self, value: TimeoutPolicy) {
        self.timeout_policy = value.into();
    }
    pub fn timeout_policy_name(&self) -> Cow<'static, str> {
        enum_name(EnumKind::TimeoutPolicy, self.timeout_policy)
    }

    /// Returns the enum value of `retry_logic`, or the default if the field
    /// is set to an invalid enum value.
    pub fn retry_logic(&self) -> RetryLogic {
        RetryLogic::from_repr(self.retry_logic).unwrap_or_default()
    }
    pub fn set_retry_logic(&mut self, value: RetryLogic) {
        self.retry_logic = value.into();
    }
    pub fn retry_logic_name(&self) -> Cow<'static, str> {
        enum_name(EnumKind::RetryLogic, self.retry_logic)
    }

    pub fn get(&self, field: TaskDefField) -> FieldValue {
        match field {
            TaskDefField::Name => FieldValue::String(self.name.clone()),
            TaskDefField::Description => FieldValue::String(self.description.clone()),
            TaskDefField::RetryCount => FieldValue::Int32(self.retry_count),
            TaskDefField::TimeoutSeconds => FieldValue::Int64(self.timeout_seconds),
            TaskDefField::InputKeys => FieldValue::Strings(self.input_keys.clone()),
            TaskDefField::OutputKeys => FieldValue::Strings(self.output_keys.clone()),
            TaskDefField::TimeoutPolicy => {
                FieldValue::Enum(EnumKind::TimeoutPolicy, self.timeout_policy)
            }
            TaskDefField::RetryLogic => FieldValue::Enum(EnumKind::RetryLogic, self.retry_logic),
            TaskDefField::RetryDelaySeconds => FieldValue::Int32(self.retry_delay_seconds),
            TaskDefField::ResponseTimeoutSeconds => {
                FieldValue::Int32(self.response_timeout_seconds)
            }
            TaskDefField::ConcurrentExecLimit => FieldValue::Int32(self.concurrent_exec_limit),
            TaskDefField::InputTemplate => FieldValue::Template(self.input_template.clone()),
        }
    }

    /// Fields holding something other than their default value.
    pub fn present_fields(&self) -> Vec<TaskDefField> {
        use strum::IntoEnumIterator;
        TaskDefField::iter()
            .filter(|f| !self.get(*f).is_default())
            .collect()
    }

    fn template_entry_len(key: &String, value: &prost_types::Value) -> usize {
        let mut len = 0;
        if !key.is_empty() {
            len += string::encoded_len(TEMPLATE_ENTRY_KEY_TAG, key);
        }
        if value.kind.is_some() {
            len += message::encoded_len(TEMPLATE_ENTRY_VALUE_TAG, value);
        }
        len
    }

    fn merge_field(&mut self, key: FieldKey, reader: &mut WireReader<'_>) -> Result<(), DecodeError> {
        let Some(field) = TaskDefField::from_number(key.number) else {
            let raw = reader.skip_field(&key)?;
            tracing::debug!(
                "keep unknown TaskDef field {} ({:?}, {} bytes)",
                key.number,
                key.wire_type,
                raw.len()
            );
            self.unknown_fields.push(UnknownField {
                number: key.number,
                wire_type: key.wire_type,
                raw: Bytes::copy_from_slice(raw),
            });
            return Ok(());
        };
        key.expect(field.wire_type())?;
        match field {
            TaskDefField::Name => self.name = reader.read_string()?,
            TaskDefField::Description => self.description = reader.read_string()?,
            // int32 / enum values are truncated from the 64 bit varint
            TaskDefField::RetryCount => self.retry_count = reader.read_varint()? as i32,
            TaskDefField::TimeoutSeconds => self.timeout_seconds = reader.read_varint()? as i64,
            TaskDefField::InputKeys => self.input_keys.push(reader.read_string()?),
            TaskDefField::OutputKeys => self.output_keys.push(reader.read_string()?),
            TaskDefField::TimeoutPolicy => {
                self.timeout_policy = reader.read_varint()? as i32;
                if !EnumKind::TimeoutPolicy.is_known(self.timeout_policy) {
                    tracing::debug!("unknown TimeoutPolicy value: {}", self.timeout_policy);
                }
            }
            TaskDefField::RetryLogic => {
                self.retry_logic = reader.read_varint()? as i32;
                if !EnumKind::RetryLogic.is_known(self.retry_logic) {
                    tracing::debug!("unknown RetryLogic value: {}", self.retry_logic);
                }
            }
            TaskDefField::RetryDelaySeconds => {
                self.retry_delay_seconds = reader.read_varint()? as i32
            }
            TaskDefField::ResponseTimeoutSeconds => {
                self.response_timeout_seconds = reader.read_varint()? as i32
            }
            TaskDefField::ConcurrentExecLimit => {
                self.concurrent_exec_limit = reader.read_varint()? as i32
            }
            TaskDefField::InputTemplate => {
                let entry = reader.read_length_delimited()?;
                let base = reader.position() - entry.len();
                let (k, v) = decode_template_entry(entry, base)?;
                self.input_template.insert(k, v);
            }
        }
        Ok(())
    }
}

// map<string, google.protobuf.Value> entry: { string key = 1; Value value = 2; }
fn decode_template_entry(
    entry: &[u8],
    base: usize,
) -> Result<(String, prost_types::Value), DecodeError> {
    let mut reader = WireReader::nested(entry, base);
    let mut key = String::new();
    let mut value = prost_types::Value::default();
    while !reader.is_empty() {
        let field = reader.read_key()?;
        match field.number {
            TEMPLATE_ENTRY_KEY_TAG => {
                field.expect(WireType::LengthDelimited)?;
                key = reader.read_string()?;
            }
            TEMPLATE_ENTRY_VALUE_TAG => {
                field.expect(WireType::LengthDelimited)?;
                let offset = reader.position();
                let bytes = reader.read_length_delimited()?;
                value = prost_types::Value::decode(bytes).map_err(|e| {
                    DecodeError::malformed(
                        offset,
                        format!("invalid input template value for '{}': {}", key, e),
                    )
                })?;
            }
            _ => {
                reader.skip_field(&field)?;
            }
        }
    }
    Ok((key, value))
}

impl WireMessage for TaskDef {
    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.name.is_empty() {
            len += string::encoded_len(1, &self.name);
        }
        if !self.description.is_empty() {
            len += string::encoded_len(2, &self.description);
        }
        if self.retry_count != 0 {
            len += int32::encoded_len(3, &self.retry_count);
        }
        if self.timeout_seconds != 0 {
            len += int64::encoded_len(4, &self.timeout_seconds);
        }
        len += string::encoded_len_repeated(5, &self.input_keys);
        len += string::encoded_len_repeated(6, &self.output_keys);
        if self.timeout_policy != 0 {
            len += int32::encoded_len(7, &self.timeout_policy);
        }
        if self.retry_logic != 0 {
            len += int32::encoded_len(8, &self.retry_logic);
        }
        if self.retry_delay_seconds != 0 {
            len += int32::encoded_len(9, &self.retry_delay_seconds);
        }
        if self.response_timeout_seconds != 0 {
            len += int32::encoded_len(10, &self.response_timeout_seconds);
        }
        if self.concurrent_exec_limit != 0 {
            len += int32::encoded_len(11, &self.concurrent_exec_limit);
        }
        len += self
            .input_template
            .iter()
            .map(|(k, v)| {
                let entry_len = Self::template_entry_len(k, v);
                key_len(12) + encoded_len_varint(entry_len as u64) + entry_len
            })
            .sum::<usize>();
        len + self.unknown_fields.encoded_len()
    }

    fn encode_raw(&self, buf: &mut impl BufMut) {
        if !self.name.is_empty() {
            string::encode(1, &self.name, buf);
        }
        if !self.description.is_empty() {
            string::encode(2, &self.description, buf);
        }
        if self.retry_count != 0 {
            int32::encode(3, &self.retry_count, buf);
        }
        if self.timeout_seconds != 0 {
            int64::encode(4, &self.timeout_seconds, buf);
        }
        string::encode_repeated(5, &self.input_keys, buf);
        string::encode_repeated(6, &self.output_keys, buf);
        if self.timeout_policy != 0 {
            int32::encode(7, &self.timeout_policy, buf);
        }
        if self.retry_logic != 0 {
            int32::encode(8, &self.retry_logic, buf);
        }
        if self.retry_delay_seconds != 0 {
            int32::encode(9, &self.retry_delay_seconds, buf);
        }
        if self.response_timeout_seconds != 0 {
            int32::encode(10, &self.response_timeout_seconds, buf);
        }
        if self.concurrent_exec_limit != 0 {
            int32::encode(11, &self.concurrent_exec_limit, buf);
        }
        for (k, v) in &self.input_template {
            encode_key(12, WireType::LengthDelimited, buf);
            encode_varint(Self::template_entry_len(k, v) as u64, buf);
            if !k.is_empty() {
                string::encode(TEMPLATE_ENTRY_KEY_TAG, k, buf);
            }
            if v.kind.is_some() {
                message::encode(TEMPLATE_ENTRY_VALUE_TAG, v, buf);
            }
        }
        self.unknown_fields.encode_raw(buf);
    }

    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = WireReader::new(buf);
        let mut def = TaskDef::default();
        while !reader.is_empty() {
            let key = reader.read_key()?;
            def.merge_field(key, &mut reader)?;
        }
        if !def.unknown_fields.is_empty() {
            tracing::debug!(
                "decoded TaskDef '{}' with unknown fields: {:?}",
                def.name,
                def.unknown_fields.numbers()
            );
        }
        Ok(def)
    }
}
