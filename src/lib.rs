//! SIDH-based proof of knowledge and Fiat-Shamir signatures.
//!
//! This library implements the arithmetic stack needed to prove
//! knowledge of a secret 2^a-isogeny between supersingular Montgomery
//! curves: a prime field with Montgomery multiplication, its quadratic
//! extension, x-only ("Kummer line") curve arithmetic, isogeny chains
//! computed along precomputed optimal strategies, and a two-dimensional
//! Pohlig-Hellman solver over a twisted Edwards model. On top of that,
//! it provides SIDH key exchange for both sides (Alice with the 2^a
//! torsion, Bob with the 3^b torsion), a single-round proof of knowledge
//! of an SIDH private key (commit, challenge, respond, verify), and a
//! signature scheme obtained by the Fiat-Shamir transform over as many
//! rounds as the security level in bits.
//!
//! The prime is selected at compile time with one of the `p377` (the
//! default), `p503` or `p751` features; the parameter module for that
//! prime is re-exported as `params`. All other modules are written
//! against the names that `params` exports, so that there is no runtime
//! branching on the parameter set.
//!
//! # Usage
//!
//! The library is `no_std`. With the default `std` feature (or with
//! `alloc`), the signature functions are available; the field, curve,
//! isogeny, SIDH and single-round proof functions work in core-only
//! builds. The `parallel` feature uses `rayon` to run the independent
//! signature rounds concurrently; results are identical to those of the
//! sequential code.
//!
//! # Conventions
//!
//! Functions that handle secret data are constant-time, unless explicitly
//! documented otherwise. In order to avoid unwanted side-channel leaks,
//! Booleans are avoided in low-level code: functions that return or use
//! a potentially secret Boolean value use the `u32` type, with 0xFFFFFFFF
//! meaning "true" and 0x00000000 meaning "false". Protocol-level
//! functions report failures through the `Error` type.
//!
//! Algebraic operations on field elements are performed with the usual
//! operators (e.g. `+`). Functions that modify the object on which they
//! are called have a name in `set_*()` (e.g. `x.set_square()` squares
//! `x` in place, while `x.square()` returns the square as a new value).
//!
//! Randomness is always provided explicitly as an exclusively owned
//! `xof::Xof` stream.

#![no_std]

#[cfg(all(feature = "alloc", not(feature = "std")))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

#[cfg(all(feature = "alloc", not(feature = "std")))]
pub(crate) use alloc::vec::Vec;

#[cfg(feature = "std")]
pub(crate) use std::vec::Vec;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

macro_rules! static_assert {
    ($condition:expr) => {
        let _ = &[()][1 - ($condition) as usize];
    }
}

// Arithmetic operators for a field type with `set_add()`, `set_sub()`,
// `set_mul()`, `set_div()` and `set_neg()`; all combinations of values
// and references are covered.
macro_rules! field_ops {
    ($t:ty) => {
        field_ops!(@bin $t, Add, add, AddAssign, add_assign, set_add);
        field_ops!(@bin $t, Sub, sub, SubAssign, sub_assign, set_sub);
        field_ops!(@bin $t, Mul, mul, MulAssign, mul_assign, set_mul);
        field_ops!(@bin $t, Div, div, DivAssign, div_assign, set_div);

        impl core::ops::Neg for $t {
            type Output = $t;
            #[inline(always)]
            fn neg(mut self) -> $t {
                self.set_neg();
                self
            }
        }

        impl core::ops::Neg for &$t {
            type Output = $t;
            #[inline(always)]
            fn neg(self) -> $t {
                -*self
            }
        }
    };
    (@bin $t:ty, $tr:ident, $f:ident, $tra:ident, $fa:ident, $set:ident) => {
        impl core::ops::$tr<$t> for $t {
            type Output = $t;
            #[inline(always)]
            fn $f(mut self, rhs: $t) -> $t {
                self.$set(&rhs);
                self
            }
        }

        impl core::ops::$tr<&$t> for $t {
            type Output = $t;
            #[inline(always)]
            fn $f(mut self, rhs: &$t) -> $t {
                self.$set(rhs);
                self
            }
        }

        impl core::ops::$tr<$t> for &$t {
            type Output = $t;
            #[inline(always)]
            fn $f(self, rhs: $t) -> $t {
                let mut r = *self;
                r.$set(&rhs);
                r
            }
        }

        impl core::ops::$tr<&$t> for &$t {
            type Output = $t;
            #[inline(always)]
            fn $f(self, rhs: &$t) -> $t {
                let mut r = *self;
                r.$set(rhs);
                r
            }
        }

        impl core::ops::$tra<$t> for $t {
            #[inline(always)]
            fn $fa(&mut self, rhs: $t) {
                self.$set(&rhs);
            }
        }

        impl core::ops::$tra<&$t> for $t {
            #[inline(always)]
            fn $fa(&mut self, rhs: &$t) {
                self.$set(rhs);
            }
        }
    };
}

pub mod backend;
pub mod error;
pub mod xof;

#[cfg(feature = "p751")]
#[path = "params/p751.rs"]
pub mod params;

#[cfg(all(feature = "p503", not(feature = "p751")))]
#[path = "params/p503.rs"]
pub mod params;

#[cfg(not(any(feature = "p503", feature = "p751")))]
#[path = "params/p377.rs"]
pub mod params;

pub mod field;
pub mod scalar;
pub mod curve;
pub mod isogeny;
pub mod edwards;
pub mod sidh;
pub mod pok;

#[cfg(feature = "alloc")]
pub mod signature;

pub use error::{Error, Result};
