//! Legacy PMT encoding: `Pmt` → bytes.

use bytes::{BufMut, BytesMut};

use super::codec::Depth;
use super::primitives::{put_complex64, put_elements};
use super::tag;
use crate::error::EncodeError;
use crate::types::{Complex64, Pmt, PmtDict, UniformVector};

/// Work left to do, taken last-in first-out.
enum Step<'a> {
    Value(&'a Pmt, Depth),
    Tag(u8),
}

/// Appends the encoding of `value` to the buffer.
///
/// Children of compound values wait on an explicit stack instead of the call
/// stack, so nesting depth is bounded only by `depth`.
///
/// On error the buffer may hold a partial encoding; [`LegacyCodec`] rolls it back.
///
/// [`LegacyCodec`]: super::LegacyCodec
pub(crate) fn encode_value(
    buf: &mut BytesMut,
    value: &Pmt,
    depth: Depth,
) -> Result<(), EncodeError> {
    let mut pending = vec![Step::Value(value, depth)];
    while let Some(step) = pending.pop() {
        match step {
            Step::Tag(byte) => buf.put_u8(byte),
            Step::Value(value, depth) => encode_one(buf, value, depth, &mut pending)?,
        }
    }
    Ok(())
}

/// Writes a scalar, or a compound header with its children queued on `pending`.
fn encode_one<'a>(
    buf: &mut BytesMut,
    value: &'a Pmt,
    depth: Depth,
    pending: &mut Vec<Step<'a>>,
) -> Result<(), EncodeError> {
    match value {
        Pmt::Null => encode_null(buf),
        Pmt::Bool(b) => encode_bool(buf, *b),
        Pmt::Int32(i) => encode_int32(buf, *i),
        Pmt::Int64(i) => encode_int64(buf, *i),
        Pmt::UInt64(u) => encode_uint64(buf, *u),
        Pmt::Double(d) => encode_double(buf, *d),
        Pmt::Complex(c) => encode_complex(buf, *c),
        Pmt::Symbol(s) => encode_symbol(buf, s)?,
        Pmt::Pair(car, cdr) => {
            let inner = enter(depth)?;
            buf.put_u8(tag::PAIR);
            pending.push(Step::Value(cdr, inner));
            pending.push(Step::Value(car, inner));
        }
        Pmt::Vector(items) => encode_sequence(buf, tag::VECTOR, "vector", items, depth, pending)?,
        Pmt::Tuple(items) => encode_sequence(buf, tag::TUPLE, "tuple", items, depth, pending)?,
        Pmt::Dict(dict) => encode_dict(dict, depth, pending)?,
        Pmt::Uniform(vector) => encode_uniform(buf, vector)?,
    }
    Ok(())
}

fn enter(depth: Depth) -> Result<Depth, EncodeError> {
    depth
        .enter()
        .ok_or(EncodeError::NestingTooDeep { max: depth.max() })
}

fn encode_null(buf: &mut BytesMut) {
    buf.put_u8(tag::NULL);
}

/// Booleans are two distinct tags with no payload.
fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { tag::TRUE } else { tag::FALSE });
}

fn encode_int32(buf: &mut BytesMut, value: i32) {
    buf.put_u8(tag::INT32);
    buf.put_i32(value);
}

fn encode_int64(buf: &mut BytesMut, value: i64) {
    buf.put_u8(tag::INT64);
    buf.put_i64(value);
}

fn encode_uint64(buf: &mut BytesMut, value: u64) {
    buf.put_u8(tag::UINT64);
    buf.put_u64(value);
}

fn encode_double(buf: &mut BytesMut, value: f64) {
    buf.put_u8(tag::DOUBLE);
    buf.put_f64(value);
}

fn encode_complex(buf: &mut BytesMut, value: Complex64) {
    buf.put_u8(tag::COMPLEX);
    put_complex64(buf, value);
}

/// Encodes a symbol: tag, 16-bit byte length, raw bytes.
fn encode_symbol(buf: &mut BytesMut, value: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(value.len()).map_err(|_| {
        EncodeError::unsupported(
            "symbol",
            format!("{} bytes exceed the 16-bit length field", value.len()),
        )
    })?;
    buf.put_u8(tag::SYMBOL);
    buf.put_u16(len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn element_count(kind: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| {
        EncodeError::unsupported(kind, format!("{len} elements exceed the 32-bit count field"))
    })
}

/// Vectors and tuples share one layout: tag, 32-bit count, elements.
fn encode_sequence<'a>(
    buf: &mut BytesMut,
    tag_byte: u8,
    kind: &'static str,
    items: &'a [Pmt],
    depth: Depth,
    pending: &mut Vec<Step<'a>>,
) -> Result<(), EncodeError> {
    let inner = enter(depth)?;
    let count = element_count(kind, items.len())?;
    buf.put_u8(tag_byte);
    buf.put_u32(count);
    pending.extend(items.iter().rev().map(|item| Step::Value(item, inner)));
    Ok(())
}

/// Queues a dictionary as the legacy association chain.
///
/// Each entry is `DICT PAIR key value`, newest entry first, and the chain
/// ends with `NULL`. An empty dictionary is therefore just `NULL`.
fn encode_dict<'a>(
    dict: &'a PmtDict,
    depth: Depth,
    pending: &mut Vec<Step<'a>>,
) -> Result<(), EncodeError> {
    let inner = enter(depth)?;
    pending.push(Step::Tag(tag::NULL));
    // The oldest entry goes deepest so the newest is written first.
    for (key, value) in dict.iter() {
        pending.extend([
            Step::Value(value, inner),
            Step::Value(key, inner),
            Step::Tag(tag::PAIR),
            Step::Tag(tag::DICT),
        ]);
    }
    Ok(())
}

/// Encodes a uniform vector: tag, element kind, 32-bit count, pad, elements.
fn encode_uniform(buf: &mut BytesMut, vector: &UniformVector) -> Result<(), EncodeError> {
    let kind = vector.kind();
    let count = element_count("uniform vector", vector.len())?;
    buf.reserve(8 + vector.len() * kind.width());
    buf.put_u8(tag::UNIFORM_VECTOR);
    buf.put_u8(kind.code());
    buf.put_u32(count);
    buf.put_slice(&tag::UNIFORM_PAD);
    match vector {
        UniformVector::U8(items) => put_elements(buf, items),
        UniformVector::I8(items) => put_elements(buf, items),
        UniformVector::U16(items) => put_elements(buf, items),
        UniformVector::I16(items) => put_elements(buf, items),
        UniformVector::U32(items) => put_elements(buf, items),
        UniformVector::I32(items) => put_elements(buf, items),
        UniformVector::U64(items) => put_elements(buf, items),
        UniformVector::I64(items) => put_elements(buf, items),
        UniformVector::F32(items) => put_elements(buf, items),
        UniformVector::F64(items) => put_elements(buf, items),
        UniformVector::C32(items) => put_elements(buf, items),
        UniformVector::C64(items) => put_elements(buf, items),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::DEFAULT_MAX_DEPTH;
    use crate::types::Complex32;

    fn encode(value: &Pmt) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_value(&mut buf, value, Depth::new(DEFAULT_MAX_DEPTH)).expect("encode failed");
        buf
    }

    #[test]
    fn encode_null_tag() {
        assert_eq!(&encode(&Pmt::Null)[..], &[0x06]);
    }

    #[test]
    fn encode_booleans_as_distinct_tags() {
        assert_eq!(&encode(&Pmt::Bool(true))[..], &[0x00]);
        assert_eq!(&encode(&Pmt::Bool(false))[..], &[0x01]);
    }

    #[test]
    fn encode_int32() {
        assert_eq!(&encode(&Pmt::Int32(42))[..], &[0x03, 0x00, 0x00, 0x00, 0x2A]);
        assert_eq!(&encode(&Pmt::Int32(-1))[..], &[0x03, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn encode_int64() {
        assert_eq!(
            &encode(&Pmt::Int64(249_387_429_783_478))[..],
            &[0x0D, 0x00, 0x00, 0xE2, 0xD1, 0x09, 0x29, 0xE7, 0xB6]
        );
    }

    #[test]
    fn encode_uint64() {
        let buf = encode(&Pmt::UInt64(u64::MAX));
        assert_eq!(buf[0], tag::UINT64);
        assert_eq!(&buf[1..], &[0xFF; 8]);
    }

    #[test]
    fn encode_double() {
        assert_eq!(
            &encode(&Pmt::Double(3.14159))[..],
            &[0x04, 0x40, 0x09, 0x21, 0xF9, 0xF0, 0x1B, 0x86, 0x6E]
        );
    }

    #[test]
    fn encode_complex_scalar() {
        assert_eq!(
            &encode(&Pmt::Complex(Complex64::new(123.456, -789.321)))[..],
            &[
                0x05, 0x40, 0x5E, 0xDD, 0x2F, 0x1A, 0x9F, 0xBE, 0x77, 0xC0, 0x88, 0xAA, 0x91,
                0x68, 0x72, 0xB0, 0x21
            ]
        );
    }

    #[test]
    fn encode_symbol() {
        assert_eq!(
            &encode(&Pmt::symbol("example"))[..],
            &[0x02, 0x00, 0x07, 0x65, 0x78, 0x61, 0x6D, 0x70, 0x6C, 0x65]
        );
    }

    #[test]
    fn encode_empty_symbol() {
        assert_eq!(&encode(&Pmt::symbol(""))[..], &[0x02, 0x00, 0x00]);
    }

    #[test]
    fn encode_max_length_symbol() {
        let s = "x".repeat(usize::from(u16::MAX));
        let buf = encode(&Pmt::symbol(s));
        assert_eq!(&buf[..3], &[0x02, 0xFF, 0xFF]);
        assert_eq!(buf.len(), 3 + usize::from(u16::MAX));
    }

    #[test]
    fn oversized_symbol_rejected() {
        let s = "x".repeat(usize::from(u16::MAX) + 1);
        let mut buf = BytesMut::new();
        let err = encode_value(&mut buf, &Pmt::symbol(s), Depth::new(DEFAULT_MAX_DEPTH))
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedValueKind { kind: "symbol", .. }));
    }

    #[test]
    fn encode_pair() {
        assert_eq!(
            &encode(&Pmt::cons(123, 456.789))[..],
            &[
                0x07, 0x03, 0x00, 0x00, 0x00, 0x7B, 0x04, 0x40, 0x7C, 0x8C, 0x9F, 0xBE, 0x76,
                0xC8, 0xB4
            ]
        );
    }

    #[test]
    fn encode_vector() {
        let v = Pmt::Vector(vec![Pmt::Int32(1), Pmt::Bool(true), Pmt::Null]);
        assert_eq!(
            &encode(&v)[..],
            &[0x08, 0x00, 0x00, 0x00, 0x03, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06]
        );
    }

    #[test]
    fn encode_empty_vector() {
        assert_eq!(&encode(&Pmt::Vector(vec![]))[..], &[0x08, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn encode_tuple_uses_vector_layout() {
        let t = Pmt::Tuple(vec![Pmt::Int32(123), Pmt::Double(456.789)]);
        assert_eq!(
            &encode(&t)[..],
            &[
                0x0C, 0x00, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, 0x00, 0x7B, 0x04, 0x40, 0x7C,
                0x8C, 0x9F, 0xBE, 0x76, 0xC8, 0xB4
            ]
        );
    }

    #[test]
    fn encode_dict_newest_entry_first() {
        let mut d = PmtDict::new();
        d.insert("spam", 42);
        d.insert("eggs", 43);
        assert_eq!(
            &encode(&Pmt::Dict(d))[..],
            &[
                0x09, 0x07, 0x02, 0x00, 0x04, 0x65, 0x67, 0x67, 0x73, 0x03, 0x00, 0x00, 0x00,
                0x2B, 0x09, 0x07, 0x02, 0x00, 0x04, 0x73, 0x70, 0x61, 0x6D, 0x03, 0x00, 0x00,
                0x00, 0x2A, 0x06
            ]
        );
    }

    #[test]
    fn encode_nested_compounds_in_order() {
        let inner = PmtDict::from([("b", Pmt::cons(1, 2))]);
        let outer = PmtDict::from([("a", Pmt::Dict(inner))]);
        let value = Pmt::Vector(vec![Pmt::Dict(outer), Pmt::Bool(false)]);
        assert_eq!(
            &encode(&value)[..],
            &[
                0x08, 0x00, 0x00, 0x00, 0x02, // vector of 2
                0x09, 0x07, 0x02, 0x00, 0x01, 0x61, // outer entry, key a
                0x09, 0x07, 0x02, 0x00, 0x01, 0x62, // inner entry, key b
                0x07, 0x03, 0x00, 0x00, 0x00, 0x01, 0x03, 0x00, 0x00, 0x00, 0x02, // (1 . 2)
                0x06, // inner terminator
                0x06, // outer terminator
                0x01, // #f
            ]
        );
    }

    #[test]
    fn encode_empty_dict_is_null() {
        assert_eq!(&encode(&Pmt::Dict(PmtDict::new()))[..], &[0x06]);
    }

    #[test]
    fn encode_u8_uniform_vector() {
        assert_eq!(
            &encode(&Pmt::from(vec![222u8; 4]))[..],
            &[0x0A, 0x00, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00, 0xDE, 0xDE, 0xDE, 0xDE]
        );
    }

    #[test]
    fn encode_f32_uniform_vector() {
        let buf = encode(&Pmt::from(vec![-987.654321f32; 4]));
        assert_eq!(&buf[..8], &[0x0A, 0x08, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00]);
        for chunk in buf[8..].chunks(4) {
            assert_eq!(chunk, &[0xC4, 0x76, 0xE9, 0xE0]);
        }
        assert_eq!(buf.len(), 8 + 16);
    }

    #[test]
    fn encode_c32_uniform_vector() {
        let buf = encode(&Pmt::from(vec![Complex32::new(-987.654321, 123.456789); 4]));
        assert_eq!(&buf[..8], &[0x0A, 0x0A, 0x00, 0x00, 0x00, 0x04, 0x01, 0x00]);
        for chunk in buf[8..].chunks(8) {
            assert_eq!(chunk, &[0xC4, 0x76, 0xE9, 0xE0, 0x42, 0xF6, 0xE9, 0xE0]);
        }
        assert_eq!(buf.len(), 8 + 32);
    }

    #[test]
    fn encode_empty_uniform_vector() {
        assert_eq!(
            &encode(&Pmt::from(Vec::<i64>::new()))[..],
            &[0x0A, 0x07, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn nesting_limit_enforced() {
        let mut value = Pmt::Null;
        for _ in 0..4 {
            value = Pmt::Vector(vec![value]);
        }
        let mut buf = BytesMut::new();
        assert!(encode_value(&mut buf, &value, Depth::new(4)).is_ok());

        buf.clear();
        let err = encode_value(&mut buf, &value, Depth::new(3)).unwrap_err();
        assert_eq!(err, EncodeError::NestingTooDeep { max: 3 });
    }
}
