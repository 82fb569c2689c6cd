//! The legacy PMT binary wire format.
//!
//! Every value starts with a one-byte tag that fixes the layout of the
//! payload after it. All multi-byte fields are big-endian. Compound values
//! (pairs, vectors, tuples, dicts) nest recursively; dicts are written as a
//! newest-first chain of `DICT PAIR key value` entries ending in `NULL`.

mod codec;
mod decoder;
mod encoder;
pub mod primitives;
pub mod tag;

pub use codec::{decode, encode, LegacyCodec, DEFAULT_MAX_DEPTH};
pub use tag::Tag;
