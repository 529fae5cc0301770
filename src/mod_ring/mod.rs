//! Ring of integers modulo an odd number.
//!
//! Supplies the field arithmetic for both the curve base field (mod `p`) and
//! the scalar field (mod `n`).

mod element;
mod ring;
mod ring_ref;
mod uint_exp;
mod uint_mont;

pub use self::{
    element::{ModRingElement, ModRingElementRef},
    ring::ModRing,
    ring_ref::{RingRef, RingRefExt},
    uint_exp::UintExp,
    uint_mont::UintMont,
};
