//! Codec entry points and configuration.

use bytes::{Bytes, BytesMut};

use super::decoder::Decoder;
use super::encoder::encode_value;
use crate::error::{DecodeError, EncodeError};
use crate::types::Pmt;

/// Remaining nesting budget while walking a value tree.
///
/// Each pair, vector, tuple or dict entered consumes one level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
    current: usize,
    max: usize,
}

impl Depth {
    pub(crate) fn new(max: usize) -> Self {
        Self { current: 0, max }
    }

    /// Returns the depth for the children of a compound value, or `None` past the limit.
    pub(crate) fn enter(self) -> Option<Self> {
        (self.current < self.max).then(|| Self {
            current: self.current + 1,
            max: self.max,
        })
    }

    pub(crate) fn max(self) -> usize {
        self.max
    }
}

/// Default maximum nesting of compound values.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Encoder/decoder for the legacy PMT wire format.
///
/// ```
/// use legacy_pmt::{LegacyCodec, Pmt};
///
/// let codec = LegacyCodec::new().max_depth(64);
/// let bytes = codec.encode(&Pmt::cons("freq", 2.4e9)).unwrap();
/// assert_eq!(codec.decode(&bytes).unwrap(), Pmt::cons("freq", 2.4e9));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LegacyCodec {
    max_depth: usize,
}

impl Default for LegacyCodec {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LegacyCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting of pairs, vectors, tuples and dicts.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// Encodes a value into a fresh buffer.
    pub fn encode(&self, value: &Pmt) -> Result<Bytes, EncodeError> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf, value)?;
        Ok(buf.freeze())
    }

    /// Appends the encoding of `value` to `buf`. On error `buf` is left unchanged.
    pub fn encode_into(&self, buf: &mut BytesMut, value: &Pmt) -> Result<(), EncodeError> {
        let start = buf.len();
        encode_value(buf, value, Depth::new(self.max_depth)).inspect_err(|e| {
            buf.truncate(start);
            tracing::debug!(kind = value.kind_name(), error = %e, "legacy PMT encode failed");
        })
    }

    /// Decodes one value, ignoring any bytes after it.
    pub fn decode(&self, input: &[u8]) -> Result<Pmt, DecodeError> {
        let (value, consumed) = self.decode_prefix(input)?;
        if consumed < input.len() {
            tracing::debug!(
                consumed,
                trailing = input.len() - consumed,
                "ignoring trailing bytes after legacy PMT value"
            );
        }
        Ok(value)
    }

    /// Decodes one value from the front of `input`, returning it with the number of bytes consumed.
    pub fn decode_prefix(&self, input: &[u8]) -> Result<(Pmt, usize), DecodeError> {
        if input.is_empty() {
            return Err(DecodeError::EmptyBuffer);
        }
        let mut decoder = Decoder::new(input);
        let value = decoder
            .decode_value(Depth::new(self.max_depth))
            .inspect_err(|e| {
                tracing::debug!(len = input.len(), error = %e, "legacy PMT decode failed");
            })?;
        Ok((value, decoder.consumed()))
    }
}

/// Encodes a value with the default configuration.
pub fn encode(value: &Pmt) -> Result<Bytes, EncodeError> {
    LegacyCodec::default().encode(value)
}

/// Decodes a value with the default configuration.
pub fn decode(input: &[u8]) -> Result<Pmt, DecodeError> {
    LegacyCodec::default().decode(input)
}
