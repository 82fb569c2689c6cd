//! PMT value model: scalars, compounds, dictionaries and uniform vectors.

mod dict;
mod uniform;
mod value;

pub use dict::PmtDict;
pub use num_complex::{Complex, Complex32, Complex64};
pub use uniform::{ElementKind, UniformElement, UniformVector};
pub use value::Pmt;
