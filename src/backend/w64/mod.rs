// 64-bit word primitives, shared by the field macro (gfp) and the
// scalar code.

#[macro_use]
pub mod gfp;

// u64::carrying_add() and u64::borrowing_sub() would fit here, but are
// not stable yet. Carries and borrows are 0 or 1.

/// (x + y + c) mod 2^64, with the outgoing carry.
#[cfg(target_arch = "x86_64")]
#[allow(unused_unsafe)]
#[inline(always)]
pub(crate) fn addcarry_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let mut d = 0u64;
    // SAFETY: ADX/ADC is baseline on x86_64.
    let cc = unsafe { core::arch::x86_64::_addcarry_u64(c, x, y, &mut d) };
    (d, cc)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) const fn addcarry_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let (d, c1) = x.overflowing_add(y);
    let (d, c2) = d.overflowing_add(c as u64);
    (d, (c1 | c2) as u8)
}

/// (x - y - c) mod 2^64, with the outgoing borrow.
#[cfg(target_arch = "x86_64")]
#[allow(unused_unsafe)]
#[inline(always)]
pub(crate) fn subborrow_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let mut d = 0u64;
    // SAFETY: SBB is baseline on x86_64.
    let cc = unsafe { core::arch::x86_64::_subborrow_u64(c, x, y, &mut d) };
    (d, cc)
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) const fn subborrow_u64(x: u64, y: u64, c: u8) -> (u64, u8) {
    let (d, b1) = x.overflowing_sub(y);
    let (d, b2) = d.overflowing_sub(c as u64);
    (d, (b1 | b2) as u8)
}

/// x*y + z as (lo, hi); never overflows.
#[inline(always)]
pub(crate) const fn umull_add(x: u64, y: u64, z: u64) -> (u64, u64) {
    let t = (x as u128) * (y as u128) + (z as u128);
    (t as u64, (t >> 64) as u64)
}

/// x*y + z1 + z2 as (lo, hi); never overflows.
#[inline(always)]
pub(crate) const fn umull_add2(x: u64, y: u64, z1: u64, z2: u64) -> (u64, u64) {
    let t = (x as u128) * (y as u128) + (z1 as u128) + (z2 as u128);
    (t as u64, (t >> 64) as u64)
}

/// All-ones if the top bit of x is set, zero otherwise.
#[inline(always)]
pub(crate) const fn sgnw(x: u64) -> u64 {
    ((x as i64) >> 63) as u64
}
