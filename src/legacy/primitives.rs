//! Big-endian read/write primitives.
//!
//! Integers are written most significant byte first. Floats travel as the
//! big-endian form of their IEEE 754 bit pattern. Complex numbers are two
//! consecutive floats of the element width, real part first.
//!
//! Readers do not bounds-check; callers verify `remaining()` first.

use bytes::{Buf, BufMut};

use crate::types::{Complex32, Complex64, UniformElement};

pub fn put_complex32(buf: &mut impl BufMut, value: Complex32) {
    buf.put_f32(value.re);
    buf.put_f32(value.im);
}

pub fn get_complex32(buf: &mut impl Buf) -> Complex32 {
    let re = buf.get_f32();
    let im = buf.get_f32();
    Complex32::new(re, im)
}

pub fn put_complex64(buf: &mut impl BufMut, value: Complex64) {
    buf.put_f64(value.re);
    buf.put_f64(value.im);
}

pub fn get_complex64(buf: &mut impl Buf) -> Complex64 {
    let re = buf.get_f64();
    let im = buf.get_f64();
    Complex64::new(re, im)
}

/// A uniform vector element with a fixed-width big-endian wire form.
pub trait WireElement: UniformElement {
    fn put_be(self, buf: &mut impl BufMut);

    fn get_be(buf: &mut impl Buf) -> Self;
}

macro_rules! wire_element {
    ($($ty:ty => $put:ident, $get:ident);* $(;)?) => {
        $(
            impl WireElement for $ty {
                fn put_be(self, buf: &mut impl BufMut) {
                    buf.$put(self);
                }

                fn get_be(buf: &mut impl Buf) -> Self {
                    buf.$get()
                }
            }
        )*
    };
}

wire_element! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16, get_u16;
    i16 => put_i16, get_i16;
    u32 => put_u32, get_u32;
    i32 => put_i32, get_i32;
    u64 => put_u64, get_u64;
    i64 => put_i64, get_i64;
    f32 => put_f32, get_f32;
    f64 => put_f64, get_f64;
}

impl WireElement for Complex32 {
    fn put_be(self, buf: &mut impl BufMut) {
        put_complex32(buf, self);
    }

    fn get_be(buf: &mut impl Buf) -> Self {
        get_complex32(buf)
    }
}

impl WireElement for Complex64 {
    fn put_be(self, buf: &mut impl BufMut) {
        put_complex64(buf, self);
    }

    fn get_be(buf: &mut impl Buf) -> Self {
        get_complex64(buf)
    }
}

/// Writes every element in order.
pub fn put_elements<T: WireElement>(buf: &mut impl BufMut, items: &[T]) {
    for &item in items {
        item.put_be(buf);
    }
}

/// Reads `count` elements. The caller has checked `count * T::KIND.width()` bytes remain.
pub fn get_elements<T: WireElement>(buf: &mut impl Buf, count: usize) -> Vec<T> {
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::get_be(buf));
    }
    items
}
