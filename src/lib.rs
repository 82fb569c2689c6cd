//! legacy-pmt — A pure-Rust codec for the legacy PMT wire format.
//!
//! PMT (polymorphic message type) values are self-describing tagged values
//! passed between signal-processing blocks. This crate reads and writes the
//! legacy binary serialization byte for byte.
//!
//! # Architecture
//!
//! - **`types`** — The PMT value model (scalars, pairs, vectors, dicts, uniform vectors)
//! - **`legacy`** — Tag registry, big-endian primitives, encoder and decoder
//! - **`error`** — Encode and decode error types
//!
//! ```
//! use legacy_pmt::{decode, encode, Pmt, PmtDict};
//!
//! let mut meta = PmtDict::new();
//! meta.insert("spam", 42);
//! meta.insert("eggs", 43);
//! let bytes = encode(&Pmt::Dict(meta.clone())).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), Pmt::Dict(meta));
//! ```

pub mod error;
pub mod legacy;
pub mod types;

pub use error::{DecodeError, EncodeError, PmtError};
pub use legacy::{decode, encode, LegacyCodec, DEFAULT_MAX_DEPTH};
pub use types::{
    Complex, Complex32, Complex64, ElementKind, Pmt, PmtDict, UniformElement, UniformVector,
};
