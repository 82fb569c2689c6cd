//! Legacy PMT tag byte constants.

pub const TRUE: u8 = 0x00;
pub const FALSE: u8 = 0x01;
pub const SYMBOL: u8 = 0x02;
pub const INT32: u8 = 0x03;
pub const DOUBLE: u8 = 0x04;
pub const COMPLEX: u8 = 0x05;
pub const NULL: u8 = 0x06;
pub const PAIR: u8 = 0x07;
pub const VECTOR: u8 = 0x08;
pub const DICT: u8 = 0x09;
pub const UNIFORM_VECTOR: u8 = 0x0A;
pub const UINT64: u8 = 0x0B;
pub const TUPLE: u8 = 0x0C;
pub const INT64: u8 = 0x0D;

// Uniform vector header: element kind (1), count (4), pad count (1) + pad bytes.
pub const UNIFORM_PAD: [u8; 2] = [0x01, 0x00];

/// The closed set of value kinds a leading tag byte can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    True,
    False,
    Symbol,
    Int32,
    Double,
    Complex,
    Null,
    Pair,
    Vector,
    Dict,
    UniformVector,
    UInt64,
    Tuple,
    Int64,
}

impl Tag {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            TRUE => Self::True,
            FALSE => Self::False,
            SYMBOL => Self::Symbol,
            INT32 => Self::Int32,
            DOUBLE => Self::Double,
            COMPLEX => Self::Complex,
            NULL => Self::Null,
            PAIR => Self::Pair,
            VECTOR => Self::Vector,
            DICT => Self::Dict,
            UNIFORM_VECTOR => Self::UniformVector,
            UINT64 => Self::UInt64,
            TUPLE => Self::Tuple,
            INT64 => Self::Int64,
            _ => return None,
        })
    }

    pub fn byte(self) -> u8 {
        match self {
            Self::True => TRUE,
            Self::False => FALSE,
            Self::Symbol => SYMBOL,
            Self::Int32 => INT32,
            Self::Double => DOUBLE,
            Self::Complex => COMPLEX,
            Self::Null => NULL,
            Self::Pair => PAIR,
            Self::Vector => VECTOR,
            Self::Dict => DICT,
            Self::UniformVector => UNIFORM_VECTOR,
            Self::UInt64 => UINT64,
            Self::Tuple => TUPLE,
            Self::Int64 => INT64,
        }
    }
}
