//! PMT value types.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use num_complex::{Complex32, Complex64};

use super::dict::PmtDict;
use super::uniform::{UniformElement, UniformVector};

/// A polymorphic message value, corresponding to the legacy wire kinds.
///
/// Values own their children; there is no sharing and no cycles. Equality is
/// structural, and `Hash` agrees with it (both float zeros hash alike).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Pmt {
    #[default]
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Complex(Complex64),
    /// An interned name. The wire carries raw bytes; only UTF-8 symbols can
    /// be represented here, and decoding any other bytes fails with
    /// [`DecodeError::InvalidSymbol`](crate::DecodeError::InvalidSymbol).
    Symbol(String),
    Pair(Box<Pmt>, Box<Pmt>),
    Vector(Vec<Pmt>),
    Tuple(Vec<Pmt>),
    Dict(PmtDict),
    Uniform(UniformVector),
}

impl Pmt {
    /// Builds a pair from `car` and `cdr`.
    pub fn cons(car: impl Into<Pmt>, cdr: impl Into<Pmt>) -> Self {
        Self::Pair(Box::new(car.into()), Box::new(cdr.into()))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }

    /// Short kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::UInt64(_) => "uint64",
            Self::Double(_) => "double",
            Self::Complex(_) => "complex",
            Self::Symbol(_) => "symbol",
            Self::Pair(..) => "pair",
            Self::Vector(_) => "vector",
            Self::Tuple(_) => "tuple",
            Self::Dict(_) => "dict",
            Self::Uniform(_) => "uniform vector",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any signed integer kind widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int32(i) => Some(i64::from(*i)),
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(car, cdr)` if this is a pair.
    pub fn as_pair(&self) -> Option<(&Pmt, &Pmt)> {
        match self {
            Self::Pair(car, cdr) => Some((car, cdr)),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&PmtDict> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_uniform(&self) -> Option<&UniformVector> {
        match self {
            Self::Uniform(v) => Some(v),
            _ => None,
        }
    }
}

// -- Convenience conversions --

impl From<()> for Pmt {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Pmt {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Pmt {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<i64> for Pmt {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<u64> for Pmt {
    fn from(u: u64) -> Self {
        Self::UInt64(u)
    }
}

/// Single precision promotes to the one legacy real kind.
impl From<f32> for Pmt {
    fn from(f: f32) -> Self {
        Self::Double(f64::from(f))
    }
}

impl From<f64> for Pmt {
    fn from(f: f64) -> Self {
        Self::Double(f)
    }
}

impl From<Complex32> for Pmt {
    fn from(c: Complex32) -> Self {
        Self::Complex(Complex64::new(f64::from(c.re), f64::from(c.im)))
    }
}

impl From<Complex64> for Pmt {
    fn from(c: Complex64) -> Self {
        Self::Complex(c)
    }
}

impl From<&str> for Pmt {
    fn from(s: &str) -> Self {
        Self::Symbol(s.to_owned())
    }
}

impl From<String> for Pmt {
    fn from(s: String) -> Self {
        Self::Symbol(s)
    }
}

impl From<Vec<Pmt>> for Pmt {
    fn from(v: Vec<Pmt>) -> Self {
        Self::Vector(v)
    }
}

impl From<PmtDict> for Pmt {
    fn from(d: PmtDict) -> Self {
        Self::Dict(d)
    }
}

impl From<UniformVector> for Pmt {
    fn from(v: UniformVector) -> Self {
        Self::Uniform(v)
    }
}

impl<T: UniformElement> From<Vec<T>> for Pmt {
    fn from(items: Vec<T>) -> Self {
        Self::Uniform(T::into_uniform(items))
    }
}

/// Hashes a float consistently with `==`: `0.0` and `-0.0` hash alike.
pub(super) fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    let bits = if value == 0.0 { 0 } else { value.to_bits() };
    state.write_u64(bits);
}

impl Hash for Pmt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int32(i) => i.hash(state),
            Self::Int64(i) => i.hash(state),
            Self::UInt64(u) => u.hash(state),
            Self::Double(d) => hash_f64(*d, state),
            Self::Complex(c) => {
                hash_f64(c.re, state);
                hash_f64(c.im, state);
            }
            Self::Symbol(s) => s.hash(state),
            Self::Pair(car, cdr) => {
                car.hash(state);
                cdr.hash(state);
            }
            Self::Vector(items) | Self::Tuple(items) => items.hash(state),
            Self::Dict(dict) => dict.hash(state),
            Self::Uniform(v) => v.hash(state),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Pmt], close: &str) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl fmt::Display for Pmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "()"),
            Self::Bool(true) => write!(f, "#t"),
            Self::Bool(false) => write!(f, "#f"),
            Self::Int32(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::UInt64(u) => write!(f, "{u}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Complex(c) => write!(f, "{c}"),
            Self::Symbol(s) => write!(f, "{s}"),
            Self::Pair(car, cdr) => write!(f, "({car} . {cdr})"),
            Self::Vector(items) => write_seq(f, "#[", items, "]"),
            Self::Tuple(items) => write_seq(f, "{", items, "}"),
            Self::Dict(dict) => {
                write!(f, "(")?;
                for (i, (k, v)) in dict.iter().rev().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({k} . {v})")?;
                }
                write!(f, ")")
            }
            Self::Uniform(v) => write!(f, "{v}"),
        }
    }
}
