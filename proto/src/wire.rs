//! Low level protobuf wire reading.
//!
//! Writing goes through `prost::encoding`; reading is done here so that
//! failures keep their kind (Malformed / TypeMismatch / Truncated) and so
//! that the raw bytes of unknown fields can be captured.

use bytes::{BufMut, Bytes};
use conductor_base::error::DecodeError;
use conductor_base::limits::{MAX_GROUP_DEPTH, MAX_VARINT_LEN};
use prost::encoding::WireType;

fn wire_type_from(value: u64) -> Option<WireType> {
    match value {
        0 => Some(WireType::Varint),
        1 => Some(WireType::SixtyFourBit),
        2 => Some(WireType::LengthDelimited),
        3 => Some(WireType::StartGroup),
        4 => Some(WireType::EndGroup),
        5 => Some(WireType::ThirtyTwoBit),
        _ => None,
    }
}

/// A decoded field key and the (absolute) offset it started at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    pub number: u32,
    pub wire_type: WireType,
    pub offset: usize,
}

impl FieldKey {
    pub fn expect(&self, expected: WireType) -> Result<(), DecodeError> {
        if self.wire_type == expected {
            Ok(())
        } else {
            Err(DecodeError::TypeMismatch {
                offset: self.offset,
                field: self.number,
                expected,
                found: self.wire_type,
            })
        }
    }
}

/// Cursor over an encoded message.
///
/// Nested readers (map entries) keep the absolute offset of their slice in
/// `base` so that errors point into the outermost buffer.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::nested(buf, 0)
    }
    pub fn nested(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }
    /// absolute position
    pub fn position(&self) -> usize {
        self.base + self.pos
    }
    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.position();
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_LEN {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(DecodeError::Truncated {
                    offset: start,
                    needed: 1,
                });
            };
            self.pos += 1;
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                return Err(DecodeError::malformed(start, "varint overflows 64 bits"));
            }
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte < 0x80 {
                return Ok(value);
            }
        }
        Err(DecodeError::malformed(start, "varint longer than 10 bytes"))
    }

    pub fn read_key(&mut self) -> Result<FieldKey, DecodeError> {
        let offset = self.position();
        let key = self.read_varint()?;
        if key > u64::from(u32::MAX) {
            return Err(DecodeError::malformed(offset, format!("invalid key value {}", key)));
        }
        let wire_type = wire_type_from(key & 0x07).ok_or_else(|| {
            DecodeError::malformed(offset, format!("invalid wire type value {}", key & 0x07))
        })?;
        let number = (key >> 3) as u32;
        if number == 0 {
            return Err(DecodeError::malformed(offset, "invalid field number 0"));
        }
        Ok(FieldKey {
            number,
            wire_type,
            offset,
        })
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::Truncated {
                offset: self.position(),
                needed: len - remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let offset = self.position();
        let len = self.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| DecodeError::malformed(offset, format!("length {} too large", len)))?;
        self.read_bytes(len)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let offset = self.position();
        let bytes = self.read_length_delimited()?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| DecodeError::malformed(offset, "string is not valid UTF-8"))
    }

    /// Skip the value belonging to `key`, returning the raw bytes of the
    /// whole field (key included).
    pub fn skip_field(&mut self, key: &FieldKey) -> Result<&'a [u8], DecodeError> {
        self.skip_value(key, 0)?;
        let start = key.offset - self.base;
        Ok(&self.buf[start..self.pos])
    }

    fn skip_value(&mut self, key: &FieldKey, depth: u32) -> Result<(), DecodeError> {
        match key.wire_type {
            WireType::Varint => self.read_varint().map(|_| ()),
            WireType::SixtyFourBit => self.read_bytes(8).map(|_| ()),
            WireType::ThirtyTwoBit => self.read_bytes(4).map(|_| ()),
            WireType::LengthDelimited => self.read_length_delimited().map(|_| ()),
            WireType::StartGroup => {
                if depth >= MAX_GROUP_DEPTH {
                    return Err(DecodeError::malformed(key.offset, "group nesting too deep"));
                }
                loop {
                    if self.is_empty() {
                        return Err(DecodeError::Truncated {
                            offset: self.position(),
                            needed: 1,
                        });
                    }
                    let inner = self.read_key()?;
                    if inner.wire_type == WireType::EndGroup {
                        if inner.number != key.number {
                            return Err(DecodeError::malformed(
                                inner.offset,
                                format!(
                                    "end group {} does not match start group {}",
                                    inner.number, key.number
                                ),
                            ));
                        }
                        return Ok(());
                    }
                    self.skip_value(&inner, depth + 1)?;
                }
            }
            WireType::EndGroup => Err(DecodeError::malformed(
                key.offset,
                format!("unexpected end group for field {}", key.number),
            )),
        }
    }
}

/// A field the decoder did not recognize, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField {
    pub number: u32,
    pub wire_type: WireType,
    /// key and value exactly as read
    pub raw: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownFields(Vec<UnknownField>);

impl UnknownFields {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = &UnknownField> {
        self.0.iter()
    }
    pub fn push(&mut self, field: UnknownField) {
        self.0.push(field);
    }
    pub fn numbers(&self) -> Vec<u32> {
        self.0.iter().map(|f| f.number).collect()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
    pub fn encoded_len(&self) -> usize {
        self.0.iter().map(|f| f.raw.len()).sum()
    }
    pub fn encode_raw(&self, buf: &mut impl BufMut) {
        for field in &self.0 {
            buf.put_slice(&field.raw);
        }
    }
}
