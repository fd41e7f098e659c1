//! Architecture-specific implementations of the base field.
//!
//! Only a 64-bit backend is provided. The field type for the selected
//! prime is generated by the `define_gfp!` macro from the modulus words
//! declared in the parameter module; the generated type has the
//! following properties:
//!
//!  - An instance encapsulates a field element, internally kept in
//!    Montgomery representation and always fully reduced.
//!
//!  - The constant values `Self::ZERO` and `Self::ONE` contain the
//!    elements of value 0 and 1, respectively; a few other small
//!    constants (`TWO`, `THREE`, `FOUR`, `SIX`, `MINUS_ONE`) are also
//!    provided.
//!
//!  - Usual arithmetic operators can be used on field elements (`+`, `-`,
//!    `*`, `/`, and the compound assignments `+=`, `-=`, `*=` and `/=`).
//!    Division by zero is tolerated, and yields zero (regardless of the
//!    dividend). Operators can use both the raw types, and references
//!    thereof.
//!
//!  - Functions `set_cond()`, `select()` and `cswap()` follow the
//!    usual convention of control values equal to 0xFFFFFFFF (true)
//!    or 0x00000000 (false); they are constant-time.
//!
//!  - Function `equals(self, rhs: Self) -> u32` returns 0xFFFFFFFF
//!    if `self` and `rhs` represent the same value, or 0x00000000
//!    otherwise. Function `iszero(self) -> u32` is a specialized
//!    subcase that compares `self` with zero.
//!
//!  - Function `is_square(self) -> u32` applies Euler's criterion. It
//!    reports zero as a non-square.
//!
//!  - Function `encode(self)` encodes an element over exactly `ENC_LEN`
//!    bytes (unsigned little-endian, canonical). `decode()` and
//!    `decode_ct()` reject non-canonical inputs; `decode_reduce()`
//!    reduces arbitrary input modulo p.
//!
//!  - Function `sample()` draws a uniform element from an extendable
//!    output function by rejection sampling.

#[cfg(not(target_pointer_width = "64"))]
compile_error!("only the 64-bit backend is implemented");

#[macro_use]
pub mod w64;

pub(crate) use w64::gfp::{define_gfp, define_gfp_tests};
