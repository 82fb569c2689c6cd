//! Legacy PMT decoding: bytes → `Pmt`.

use std::mem;

use bytes::Buf;

use super::codec::Depth;
use super::primitives::{get_complex64, get_elements};
use super::tag::{self, Tag};
use crate::error::DecodeError;
use crate::types::{ElementKind, Pmt, PmtDict, UniformVector};

/// A compound value whose children are still arriving.
///
/// `depth` is the budget its children are decoded with.
enum Frame {
    Pair {
        depth: Depth,
        car: Option<Pmt>,
    },
    Sequence {
        depth: Depth,
        wrap: fn(Vec<Pmt>) -> Pmt,
        remaining: usize,
        items: Vec<Pmt>,
    },
    Dict {
        depth: Depth,
        key: Option<Pmt>,
        entries: PmtDict,
    },
}

impl Frame {
    fn depth(&self) -> Depth {
        match self {
            Self::Pair { depth, .. } | Self::Sequence { depth, .. } | Self::Dict { depth, .. } => {
                *depth
            }
        }
    }
}

/// What one tag turned into: a finished value, or a compound to fill.
enum Step {
    Value(Pmt),
    Open(Frame),
}

/// Cursor over an immutable input buffer.
pub(crate) struct Decoder<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self {
            buf: input,
            total: input.len(),
        }
    }

    /// Bytes consumed so far; also the offset of the next read.
    pub(crate) fn consumed(&self) -> usize {
        self.total - self.buf.remaining()
    }

    /// Decodes a single value starting at the cursor.
    ///
    /// Open compounds live on an explicit stack, never the call stack, so
    /// nesting up to `depth` costs heap only.
    pub(crate) fn decode_value(&mut self, depth: Depth) -> Result<Pmt, DecodeError> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            let current = stack.last().map_or(depth, Frame::depth);
            let mut value = match self.decode_step(current)? {
                Step::Value(value) => value,
                Step::Open(frame) => {
                    stack.push(frame);
                    continue;
                }
            };
            // Hand the value up, closing every compound it completes.
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(value);
                };
                match self.accept(frame, value)? {
                    Some(done) => {
                        stack.pop();
                        value = done;
                    }
                    None => break,
                }
            }
        }
    }

    fn decode_step(&mut self, depth: Depth) -> Result<Step, DecodeError> {
        let offset = self.consumed();
        self.ensure_remaining(1)?;
        let byte = self.buf.get_u8();
        let Some(tag) = Tag::from_byte(byte) else {
            return Err(DecodeError::UnknownTag { tag: byte, offset });
        };

        let value = match tag {
            Tag::Null => Pmt::Null,
            Tag::True => Pmt::Bool(true),
            Tag::False => Pmt::Bool(false),
            Tag::Int32 => {
                self.ensure_remaining(4)?;
                Pmt::Int32(self.buf.get_i32())
            }
            Tag::Int64 => {
                self.ensure_remaining(8)?;
                Pmt::Int64(self.buf.get_i64())
            }
            Tag::UInt64 => {
                self.ensure_remaining(8)?;
                Pmt::UInt64(self.buf.get_u64())
            }
            Tag::Double => {
                self.ensure_remaining(8)?;
                Pmt::Double(self.buf.get_f64())
            }
            Tag::Complex => {
                self.ensure_remaining(16)?;
                Pmt::Complex(get_complex64(&mut self.buf))
            }
            Tag::Symbol => self.decode_symbol()?,
            Tag::Pair => {
                let depth = enter(depth)?;
                return Ok(Step::Open(Frame::Pair { depth, car: None }));
            }
            Tag::Vector => return self.open_sequence(depth, Pmt::Vector),
            Tag::Tuple => return self.open_sequence(depth, Pmt::Tuple),
            Tag::Dict => return self.open_dict(depth),
            Tag::UniformVector => self.decode_uniform()?,
        };
        Ok(Step::Value(value))
    }

    /// Adds a decoded child to `frame`, returning the compound once it is complete.
    fn accept(&mut self, frame: &mut Frame, value: Pmt) -> Result<Option<Pmt>, DecodeError> {
        match frame {
            Frame::Pair { car, .. } => match car.take() {
                None => {
                    *car = Some(value);
                    Ok(None)
                }
                Some(car) => Ok(Some(Pmt::Pair(Box::new(car), Box::new(value)))),
            },
            Frame::Sequence {
                wrap,
                remaining,
                items,
                ..
            } => {
                items.push(value);
                *remaining -= 1;
                if *remaining > 0 {
                    return Ok(None);
                }
                Ok(Some((*wrap)(mem::take(items))))
            }
            Frame::Dict { key, entries, .. } => {
                let Some(entry_key) = key.take() else {
                    *key = Some(value);
                    return Ok(None);
                };
                // Entries arrive newest first; a repeated key keeps its
                // first (newest) value, as an association-list lookup would.
                entries.insert_if_absent(entry_key, value);
                if self.dict_continues()? {
                    self.expect_dict_pair()?;
                    return Ok(None);
                }
                let mut dict = mem::take(entries);
                dict.reverse();
                Ok(Some(Pmt::Dict(dict)))
            }
        }
    }

    fn ensure_remaining(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < needed {
            Err(DecodeError::Truncated {
                offset: self.consumed(),
                needed,
                remaining: self.buf.remaining(),
            })
        } else {
            Ok(())
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure_remaining(len)?;
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    fn decode_symbol(&mut self) -> Result<Pmt, DecodeError> {
        self.ensure_remaining(2)?;
        let len = self.buf.get_u16() as usize;
        let offset = self.consumed();
        let data = self.take(len)?;
        let s = std::str::from_utf8(data).map_err(|_| DecodeError::InvalidSymbol { offset })?;
        Ok(Pmt::Symbol(s.to_owned()))
    }

    /// Reads the count shared by vectors and tuples. An empty one is already complete.
    fn open_sequence(
        &mut self,
        depth: Depth,
        wrap: fn(Vec<Pmt>) -> Pmt,
    ) -> Result<Step, DecodeError> {
        let depth = enter(depth)?;
        self.ensure_remaining(4)?;
        let count = self.buf.get_u32() as usize;
        if count == 0 {
            return Ok(Step::Value(wrap(Vec::new())));
        }
        // Every element takes at least one byte, so the input bounds the allocation.
        let items = Vec::with_capacity(count.min(self.buf.remaining()));
        Ok(Step::Open(Frame::Sequence {
            depth,
            wrap,
            remaining: count,
            items,
        }))
    }

    /// Starts a dict chain whose first `DICT` tag has already been read.
    fn open_dict(&mut self, depth: Depth) -> Result<Step, DecodeError> {
        let depth = enter(depth)?;
        self.expect_dict_pair()?;
        Ok(Step::Open(Frame::Dict {
            depth,
            key: None,
            entries: PmtDict::new(),
        }))
    }

    fn expect_dict_pair(&mut self) -> Result<(), DecodeError> {
        let offset = self.consumed();
        self.ensure_remaining(1)?;
        match self.buf.get_u8() {
            tag::PAIR => Ok(()),
            other => Err(DecodeError::MalformedDict {
                offset,
                reason: format!("entry must be a pair, found tag 0x{other:02X}"),
            }),
        }
    }

    /// Reads the link after a dict entry: `DICT` for another entry, `NULL` to end.
    fn dict_continues(&mut self) -> Result<bool, DecodeError> {
        let offset = self.consumed();
        self.ensure_remaining(1)?;
        match self.buf.get_u8() {
            tag::DICT => Ok(true),
            tag::NULL => Ok(false),
            other => Err(DecodeError::MalformedDict {
                offset,
                reason: format!(
                    "expected another entry or null terminator, found tag 0x{other:02X}"
                ),
            }),
        }
    }

    fn decode_uniform(&mut self) -> Result<Pmt, DecodeError> {
        let offset = self.consumed();
        self.ensure_remaining(1)?;
        let code = self.buf.get_u8();
        let kind = ElementKind::from_code(code)
            .ok_or(DecodeError::UnknownElementKind { code, offset })?;

        // 32-bit count, then a pad count followed by that many pad bytes.
        self.ensure_remaining(5)?;
        let count = self.buf.get_u32() as usize;
        let pad = usize::from(self.buf.get_u8());
        self.take(pad)?;

        let needed = count.checked_mul(kind.width()).unwrap_or(usize::MAX);
        self.ensure_remaining(needed)?;

        let buf = &mut self.buf;
        let vector = match kind {
            ElementKind::U8 => UniformVector::U8(get_elements(buf, count)),
            ElementKind::I8 => UniformVector::I8(get_elements(buf, count)),
            ElementKind::U16 => UniformVector::U16(get_elements(buf, count)),
            ElementKind::I16 => UniformVector::I16(get_elements(buf, count)),
            ElementKind::U32 => UniformVector::U32(get_elements(buf, count)),
            ElementKind::I32 => UniformVector::I32(get_elements(buf, count)),
            ElementKind::U64 => UniformVector::U64(get_elements(buf, count)),
            ElementKind::I64 => UniformVector::I64(get_elements(buf, count)),
            ElementKind::F32 => UniformVector::F32(get_elements(buf, count)),
            ElementKind::F64 => UniformVector::F64(get_elements(buf, count)),
            ElementKind::C32 => UniformVector::C32(get_elements(buf, count)),
            ElementKind::C64 => UniformVector::C64(get_elements(buf, count)),
        };
        Ok(Pmt::Uniform(vector))
    }
}

fn enter(depth: Depth) -> Result<Depth, DecodeError> {
    depth
        .enter()
        .ok_or(DecodeError::NestingTooDeep { max: depth.max() })
}
