//! Fixed-width integers for private keys and discrete logarithms.
//!
//! A `Scalar` is an unsigned integer over `SCALAR_WORDS` 64-bit limbs,
//! wide enough for values modulo 2^a (Alice) or 3^b (Bob), with some
//! extra room for intermediate computations. Arithmetic wraps modulo
//! 2^(64*SCALAR_WORDS) and reports the carry or borrow. Operations are
//! constant-time unless their name ends in `_vartime`.

use crate::backend::w64::{addcarry_u64, subborrow_u64, umull_add, sgnw};
use crate::params::{SCALAR_WORDS, EXPONENT_BOB};

/// Encoded length of a scalar, in bytes.
pub const SCALAR_BYTES: usize = 8 * SCALAR_WORDS;

/// A non-modular integer with some constant-time operations.
#[derive(Clone, Copy, Debug)]
pub struct Scalar([u64; SCALAR_WORDS]);

impl Scalar {

    pub const ZERO: Self = Self([0; SCALAR_WORDS]);
    pub const ONE: Self = Self::const_small(1);

    /// 3^(b-1), the bound on ephemeral proof scalars.
    pub const POW3_B_MINUS_1: Self = Self::const_pow3(EXPONENT_BOB - 1);

    /// 3^b, the order of Bob's torsion subgroup.
    pub const POW3_B: Self = Self::const_pow3(EXPONENT_BOB);

    #[inline(always)]
    pub const fn w64le(x: [u64; SCALAR_WORDS]) -> Self {
        Self(x)
    }

    #[inline(always)]
    pub fn to_w64le(self) -> [u64; SCALAR_WORDS] {
        self.0
    }

    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self::const_small(x)
    }

    /// Decodes an integer from up to `SCALAR_BYTES` bytes (unsigned
    /// little-endian). Shorter inputs are zero-extended. `None` is
    /// returned if the input is too long.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() > SCALAR_BYTES {
            return None;
        }
        let mut x = Self::ZERO;
        for (i, b) in buf.iter().enumerate() {
            x.0[i >> 3] |= (*b as u64) << ((i & 7) << 3);
        }
        Some(x)
    }

    /// Encodes this integer over `SCALAR_BYTES` bytes (unsigned
    /// little-endian).
    pub fn encode(self) -> [u8; SCALAR_BYTES] {
        let mut d = [0u8; SCALAR_BYTES];
        for i in 0..SCALAR_WORDS {
            d[(8 * i)..(8 * i + 8)].copy_from_slice(&self.0[i].to_le_bytes());
        }
        d
    }

    /// Adds `b` to this value; the carry (0 or 1) is returned.
    #[inline]
    pub fn set_add(&mut self, b: &Self) -> u32 {
        let mut cc = 0;
        for i in 0..SCALAR_WORDS {
            (self.0[i], cc) = addcarry_u64(self.0[i], b.0[i], cc);
        }
        cc as u32
    }

    #[inline(always)]
    pub fn add(self, b: &Self) -> Self {
        let mut r = self;
        r.set_add(b);
        r
    }

    /// Subtracts `b` from this value; the borrow (0 or 1) is returned.
    #[inline]
    pub fn set_sub(&mut self, b: &Self) -> u32 {
        let mut cc = 0;
        for i in 0..SCALAR_WORDS {
            (self.0[i], cc) = subborrow_u64(self.0[i], b.0[i], cc);
        }
        cc as u32
    }

    #[inline(always)]
    pub fn sub(self, b: &Self) -> Self {
        let mut r = self;
        r.set_sub(b);
        r
    }

    /// Multiplies this value by a small integer (truncated).
    #[inline]
    pub fn set_mul_small(&mut self, k: u64) {
        let mut hi = 0;
        for i in 0..SCALAR_WORDS {
            (self.0[i], hi) = umull_add(self.0[i], k, hi);
        }
    }

    #[inline(always)]
    pub fn mul_small(self, k: u64) -> Self {
        let mut r = self;
        r.set_mul_small(k);
        r
    }

    /// Shifts left by one bit (the top bit is dropped).
    #[inline]
    pub fn set_shl1(&mut self) {
        for i in (1..SCALAR_WORDS).rev() {
            self.0[i] = (self.0[i] << 1) | (self.0[i - 1] >> 63);
        }
        self.0[0] <<= 1;
    }

    /// Shifts right by one bit.
    #[inline]
    pub fn set_shr1(&mut self) {
        for i in 0..(SCALAR_WORDS - 1) {
            self.0[i] = (self.0[i] >> 1) | (self.0[i + 1] << 63);
        }
        self.0[SCALAR_WORDS - 1] >>= 1;
    }

    /// Gets bit `i` (0 or 1).
    #[inline(always)]
    pub fn bit(self, i: usize) -> u32 {
        ((self.0[i >> 6] >> (i & 63)) & 1) as u32
    }

    /// Returns 0xFFFFFFFF if this value is lower than `b`, 0x00000000
    /// otherwise.
    #[inline]
    pub fn lt(self, b: &Self) -> u32 {
        let mut cc = 0;
        for i in 0..SCALAR_WORDS {
            (_, cc) = subborrow_u64(self.0[i], b.0[i], cc);
        }
        (cc as u32).wrapping_neg()
    }

    #[inline]
    pub fn equals(self, b: &Self) -> u32 {
        let mut r = 0;
        for i in 0..SCALAR_WORDS {
            r |= self.0[i] ^ b.0[i];
        }
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    #[inline]
    pub fn iszero(self) -> u32 {
        self.equals(&Self::ZERO)
    }

    /// Returns 0xFFFFFFFF if this value is odd, 0x00000000 otherwise.
    #[inline(always)]
    pub fn isodd(self) -> u32 {
        sgnw(self.0[0] << 63) as u32
    }

    #[inline]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        for i in 0..SCALAR_WORDS {
            self.0[i] ^= cw & (self.0[i] ^ a.0[i]);
        }
    }

    #[inline]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    /// Gets the bit length of this value (0 for zero). This function is
    /// not constant-time.
    pub fn bitlen_vartime(self) -> usize {
        for i in (0..SCALAR_WORDS).rev() {
            if self.0[i] != 0 {
                return 64 * i + 64 - (self.0[i].leading_zeros() as usize);
            }
        }
        0
    }

    // =================================================================
    // Compile-time helpers.

    const fn const_small(x: u64) -> Self {
        let mut d = [0u64; SCALAR_WORDS];
        d[0] = x;
        Self(d)
    }

    const fn const_pow3(e: usize) -> Self {
        let mut d = [0u64; SCALAR_WORDS];
        d[0] = 1;
        let mut k = 0;
        while k < e {
            let mut hi = 0u128;
            let mut i = 0;
            while i < SCALAR_WORDS {
                let z = (d[i] as u128) * 3 + hi;
                d[i] = z as u64;
                hi = z >> 64;
                i += 1;
            }
            k += 1;
        }
        Self(d)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use num_bigint::BigUint;
    use crate::params::SUBGROUP_ORDER_BITS_BOB;

    fn to_big(x: &Scalar) -> BigUint {
        BigUint::from_bytes_le(&x.encode())
    }

    fn mkrnd(bx: u64) -> Scalar {
        use sha2::{Sha512, Digest};

        let mut sh = Sha512::new();
        sh.update(bx.to_le_bytes());
        let v = sh.finalize();
        Scalar::decode(&v[..SCALAR_BYTES.min(64)]).unwrap()
    }

    #[test]
    fn powers_of_three() {
        let p3 = BigUint::from(3u32).pow(EXPONENT_BOB as u32);
        assert!(to_big(&Scalar::POW3_B) == p3);
        assert!(to_big(&Scalar::POW3_B_MINUS_1) * 3u32 == p3);
        assert!(Scalar::POW3_B.bitlen_vartime() == SUBGROUP_ORDER_BITS_BOB);
    }

    #[test]
    fn arithmetic() {
        let modw = BigUint::from(1u32) << (64 * SCALAR_WORDS);
        for i in 0..50 {
            let a = mkrnd(2 * i);
            let b = mkrnd(2 * i + 1);
            let za = to_big(&a);
            let zb = to_big(&b);

            let mut c = a;
            let cc = c.set_add(&b);
            let zc = &za + &zb;
            assert!(to_big(&c) == &zc % &modw);
            assert!((cc == 1) == (zc >= modw));

            let mut c = a;
            let cc = c.set_sub(&b);
            assert!((cc == 1) == (za < zb));
            assert!(a.lt(&b) == if za < zb { 0xFFFFFFFF } else { 0 });
            assert!(to_big(&c) == (&za + &modw - &zb) % &modw);

            assert!(to_big(&a.mul_small(3)) == (&za * 3u32) % &modw);

            let mut c = a;
            c.set_shl1();
            assert!(to_big(&c) == (&za << 1) % &modw);
            let mut c = a;
            c.set_shr1();
            assert!(to_big(&c) == (&za >> 1));

            for j in [0, 1, 63, 64, 100] {
                assert!(a.bit(j) == (((&za >> j) & BigUint::from(1u32)) == BigUint::from(1u32)) as u32);
            }
            assert!(a.isodd() == if a.bit(0) == 1 { 0xFFFFFFFF } else { 0 });
            assert!(a.bitlen_vartime() == za.bits() as usize);

            assert!(a.equals(&a) == 0xFFFFFFFF);
            assert!(a.equals(&b) == 0);
            assert!(Scalar::select(&a, &b, 0xFFFFFFFF).equals(&b) == 0xFFFFFFFF);
            assert!(Scalar::select(&a, &b, 0).equals(&a) == 0xFFFFFFFF);
        }
        assert!(Scalar::ZERO.iszero() == 0xFFFFFFFF);
        assert!(Scalar::ZERO.bitlen_vartime() == 0);
        assert!(Scalar::ONE.bitlen_vartime() == 1);
    }

    #[test]
    fn encoding() {
        let a = mkrnd(77);
        let buf = a.encode();
        assert!(Scalar::decode(&buf).unwrap().equals(&a) == 0xFFFFFFFF);
        let short = Scalar::decode(&[0x01, 0x02]).unwrap();
        assert!(short.equals(&Scalar::from_u64(0x0201)) == 0xFFFFFFFF);
        assert!(Scalar::decode(&[0u8; SCALAR_BYTES + 1]).is_none());
    }
}
