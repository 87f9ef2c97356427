use crate::config::CodecConfig;
use crate::error::{DecodeError, TaskDefError};
use anyhow::Result;
use bytes::BufMut;

/// A message with a hand-written protobuf wire codec.
///
/// Unlike `prost::Message`, decoding reports a typed [`DecodeError`]
/// (Malformed / TypeMismatch / Truncated) and implementors may keep
/// unknown fields for verbatim re-encoding.
pub trait WireMessage: Sized {
    fn encoded_len(&self) -> usize;
    fn encode_raw(&self, buf: &mut impl BufMut);
    fn decode(buf: &[u8]) -> Result<Self, DecodeError>;

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_raw(&mut buf);
        buf
    }
}

// serialize / deserialize for transport layers (size limited)
pub trait UseWireCodec {
    fn codec_config(&self) -> &CodecConfig;

    fn serialize_message<T: WireMessage>(&self, message: &T) -> Vec<u8> {
        message.encode_to_vec()
    }

    fn deserialize_message<T: WireMessage>(&self, buf: &[u8]) -> Result<T> {
        let limit = self.codec_config().max_message_bytes;
        if buf.len() > limit {
            return Err(TaskDefError::MessageTooLarge {
                size: buf.len(),
                limit,
            }
            .into());
        }
        T::decode(buf).map_err(|e| TaskDefError::CodecError(e).into())
    }
}

#[derive(Clone, Debug, Default)]
pub struct WireMessageCodec {
    config: CodecConfig,
}
impl WireMessageCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}
impl UseWireCodec for WireMessageCodec {
    fn codec_config(&self) -> &CodecConfig {
        &self.config
    }
}
