//! Error types for the legacy PMT codec.

/// Errors raised while encoding a value. Nothing is written when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot encode {kind}: {reason}")]
    UnsupportedValueKind { kind: &'static str, reason: String },

    #[error("value nesting exceeds maximum depth of {max}")]
    NestingTooDeep { max: usize },
}

/// Errors raised while decoding a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty buffer")]
    EmptyBuffer,

    #[error("unknown tag 0x{tag:02X} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("unknown uniform vector element kind 0x{code:02X} at offset {offset}")]
    UnknownElementKind { code: u8, offset: usize },

    #[error("truncated at offset {offset}: need {needed} bytes but only {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("value nesting exceeds maximum depth of {max}")]
    NestingTooDeep { max: usize },

    /// The wire allows arbitrary symbol bytes; only UTF-8 fits in [`Pmt::Symbol`].
    ///
    /// [`Pmt::Symbol`]: crate::Pmt::Symbol
    #[error("symbol at offset {offset} is not valid UTF-8")]
    InvalidSymbol { offset: usize },

    #[error("malformed dict at offset {offset}: {reason}")]
    MalformedDict { offset: usize, reason: String },
}

/// Either direction of codec failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PmtError {
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl EncodeError {
    pub(crate) fn unsupported(kind: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::UnsupportedValueKind {
            kind,
            reason: reason.to_string(),
        }
    }
}
