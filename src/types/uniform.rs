//! Homogeneous numeric arrays (uniform vectors) and their element table.

use std::fmt;
use std::hash::{Hash, Hasher};

use num_complex::{Complex32, Complex64};

use super::value::hash_f64;

/// Element kind of a uniform vector, with its legacy wire code.
///
/// The discriminant is the byte written after the uniform-vector tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementKind {
    U8 = 0x00,
    I8 = 0x01,
    U16 = 0x02,
    I16 = 0x03,
    U32 = 0x04,
    I32 = 0x05,
    U64 = 0x06,
    I64 = 0x07,
    F32 = 0x08,
    F64 = 0x09,
    C32 = 0x0A,
    C64 = 0x0B,
}

impl ElementKind {
    /// Code the legacy format uses for "unknown element type". Never valid on the wire.
    pub const UNKNOWN_CODE: u8 = 0xFF;

    /// All element kinds in wire-code order.
    pub const ALL: [ElementKind; 12] = [
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::C32,
        Self::C64,
    ];

    /// Looks up the element kind for a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Bytes occupied by one element on the wire. Complex kinds count both parts.
    pub fn width(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 | Self::C32 => 8,
            Self::C64 => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "s8",
            Self::U16 => "u16",
            Self::I16 => "s16",
            Self::U32 => "u32",
            Self::I32 => "s32",
            Self::U64 => "u64",
            Self::I64 => "s64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::C32 => "c32",
            Self::C64 => "c64",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A homogeneous array of one fixed element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformVector {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C32(Vec<Complex32>),
    C64(Vec<Complex64>),
}

impl UniformVector {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::U8(_) => ElementKind::U8,
            Self::I8(_) => ElementKind::I8,
            Self::U16(_) => ElementKind::U16,
            Self::I16(_) => ElementKind::I16,
            Self::U32(_) => ElementKind::U32,
            Self::I32(_) => ElementKind::I32,
            Self::U64(_) => ElementKind::U64,
            Self::I64(_) => ElementKind::I64,
            Self::F32(_) => ElementKind::F32,
            Self::F64(_) => ElementKind::F64,
            Self::C32(_) => ElementKind::C32,
            Self::C64(_) => ElementKind::C64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::C32(v) => v.len(),
            Self::C64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the elements as a typed slice if `T` matches the element kind.
    pub fn as_slice<T: UniformElement>(&self) -> Option<&[T]> {
        T::slice_of(self)
    }
}

fn hash_floats<H: Hasher>(state: &mut H, len: usize, parts: impl Iterator<Item = f64>) {
    state.write_usize(len);
    for part in parts {
        hash_f64(part, state);
    }
}

impl Hash for UniformVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Self::U8(v) => v.hash(state),
            Self::I8(v) => v.hash(state),
            Self::U16(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::U32(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::F32(v) => hash_floats(state, v.len(), v.iter().map(|&x| f64::from(x))),
            Self::F64(v) => hash_floats(state, v.len(), v.iter().copied()),
            Self::C32(v) => hash_floats(
                state,
                v.len(),
                v.iter().flat_map(|c| [f64::from(c.re), f64::from(c.im)]),
            ),
            Self::C64(v) => hash_floats(state, v.len(), v.iter().flat_map(|c| [c.re, c.im])),
        }
    }
}

/// A concrete element type that can populate a [`UniformVector`].
///
/// This is the compile-time side of the element table: each implementing
/// type knows its [`ElementKind`] and how to wrap or view a typed vector.
pub trait UniformElement: Copy + PartialEq + fmt::Display + Sized {
    const KIND: ElementKind;

    fn into_uniform(items: Vec<Self>) -> UniformVector;

    fn slice_of(vector: &UniformVector) -> Option<&[Self]>;
}

macro_rules! uniform_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl UniformElement for $ty {
                const KIND: ElementKind = ElementKind::$variant;

                fn into_uniform(items: Vec<Self>) -> UniformVector {
                    UniformVector::$variant(items)
                }

                fn slice_of(vector: &UniformVector) -> Option<&[Self]> {
                    match vector {
                        UniformVector::$variant(items) => Some(items),
                        _ => None,
                    }
                }
            }

            impl From<Vec<$ty>> for UniformVector {
                fn from(items: Vec<$ty>) -> Self {
                    UniformVector::$variant(items)
                }
            }
        )*
    };
}

uniform_element! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Complex32 => C32,
    Complex64 => C64,
}

fn write_items<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "#[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for UniformVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write_items(f, v),
            Self::I8(v) => write_items(f, v),
            Self::U16(v) => write_items(f, v),
            Self::I16(v) => write_items(f, v),
            Self::U32(v) => write_items(f, v),
            Self::I32(v) => write_items(f, v),
            Self::U64(v) => write_items(f, v),
            Self::I64(v) => write_items(f, v),
            Self::F32(v) => write_items(f, v),
            Self::F64(v) => write_items(f, v),
            Self::C32(v) => write_items(f, v),
            Self::C64(v) => write_items(f, v),
        }
    }
}
