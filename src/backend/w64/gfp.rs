#[macro_export]
macro_rules! define_gfp { ($typename:ident, $fieldparams:ident, $submod:ident) => {
    // The 'use' clauses stay local to the generated sub-module.
    pub use $submod::$typename;
    mod $submod {

    use $crate::backend::w64::{addcarry_u64, subborrow_u64, umull_add, umull_add2};
    use $crate::xof::Xof;
    use super::$fieldparams;

    /// Element of the base field GF(p), in Montgomery representation
    /// (the internal value is x*R mod p, with R = 2^(64*N)).
    #[derive(Clone, Copy, Debug)]
    pub struct $typename([u64; $typename::N]);

    impl $typename {
        /// Number of 64-bit limbs.
        pub const N: usize = Self::limb_count();

        /// Exact bit length of the modulus.
        pub const BITLEN: usize = Self::modulus_bits();

        /// Element encoded length, in bytes.
        pub const ENC_LEN: usize = (Self::BITLEN + 7) >> 3;

        /// Modulus (little-endian order, 64-bit limbs).
        pub const MODULUS: [u64; Self::N] = Self::modulus_limbs();

        /// p - 2 (inversion exponent).
        pub const EXP_INV: [u64; Self::N] = Self::modulus_minus_shr(2, 0);

        /// (p - 1)/2 (Euler criterion exponent).
        pub const EXP_LEGENDRE: [u64; Self::N] = Self::modulus_minus_shr(1, 1);

        /// (p - 3)/4 (square root exponent, for p = 3 mod 4).
        pub const EXP_SQRT: [u64; Self::N] = Self::modulus_minus_shr(3, 2);

        // -1/p mod 2^64, R mod p and R^2 mod p.
        const P0I: u64 = Self::neg_inv64(Self::MODULUS[0]);
        const R: Self = Self(Self::pow2(64 * Self::N));
        const R2: Self = Self(Self::pow2(128 * Self::N));

        // 2^64, as a field element.
        pub(crate) const W64: Self = Self(Self::pow2(64 * Self::N + 64));

        pub const ZERO: Self = Self([0u64; Self::N]);
        pub const ONE: Self = Self::R;
        pub const TWO: Self = Self::const_small(2);
        pub const THREE: Self = Self::const_small(3);
        pub const FOUR: Self = Self::const_small(4);
        pub const SIX: Self = Self::const_small(6);
        pub const MINUS_ONE: Self = Self::const_neg(Self::R);

        /// Builds an element from its integer value, as 64-bit limbs in
        /// little-endian order; usable in constant expressions. Values
        /// not lower than p are implicitly reduced.
        pub const fn w64le(x: [u64; Self::N]) -> Self {
            Self::const_mmul(Self(x), Self::R2)
        }

        /// Builds an element from its Montgomery representation, which
        /// must be lower than p. Precomputed tables use this format.
        pub const fn from_montgomery_w64le(x: [u64; Self::N]) -> Self {
            Self(x)
        }

        /// Gets the Montgomery representation (x*R mod p).
        #[inline(always)]
        pub fn to_montgomery_w64le(self) -> [u64; Self::N] {
            self.0
        }

        /// Runtime version of `w64le()`.
        #[inline(always)]
        pub fn from_w64le(x: [u64; Self::N]) -> Self {
            let mut r = Self(x);
            r.set_mul(&Self::R2);
            r
        }

        /// Gets the integer value (0 to p-1) as 64-bit limbs.
        #[inline(always)]
        pub fn to_w64le(self) -> [u64; Self::N] {
            let mut r = self;
            r.set_montyred();
            r.0
        }

        #[inline(always)]
        pub fn from_u64(x: u64) -> Self {
            let mut d = [0u64; Self::N];
            d[0] = x;
            Self::from_w64le(d)
        }

        // Adds `m & p` to this value; returns the carry.
        #[inline(always)]
        fn add_masked_modulus(&mut self, m: u64) -> u8 {
            let mut cc = 0;
            for i in 0..Self::N {
                (self.0[i], cc) = addcarry_u64(self.0[i], m & Self::MODULUS[i], cc);
            }
            cc
        }

        #[inline]
        fn set_add(&mut self, rhs: &Self) {
            let mut c1 = 0;
            for i in 0..Self::N {
                (self.0[i], c1) = addcarry_u64(self.0[i], rhs.0[i], c1);
            }
            let mut c2 = 0;
            for i in 0..Self::N {
                (self.0[i], c2) = subborrow_u64(self.0[i], Self::MODULUS[i], c2);
            }
            // The subtraction is undone if the sum was lower than p.
            let m = ((c2 as u64) & !(c1 as u64)).wrapping_neg();
            self.add_masked_modulus(m);
        }

        #[inline]
        fn set_sub(&mut self, rhs: &Self) {
            let mut c = 0;
            for i in 0..Self::N {
                (self.0[i], c) = subborrow_u64(self.0[i], rhs.0[i], c);
            }
            self.add_masked_modulus((c as u64).wrapping_neg());
        }

        #[inline]
        pub fn set_neg(&mut self) {
            let x = *self;
            *self = Self::ZERO;
            self.set_sub(&x);
        }

        #[inline]
        pub fn set_cond(&mut self, a: &Self, ctl: u32) {
            let cw = ((ctl as i32) as i64) as u64;
            for i in 0..Self::N {
                self.0[i] ^= cw & (self.0[i] ^ a.0[i]);
            }
        }

        #[inline]
        pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
            let mut r = *a0;
            r.set_cond(a1, ctl);
            r
        }

        #[inline]
        pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
            let cw = ((ctl as i32) as i64) as u64;
            for i in 0..Self::N {
                let t = cw & (a.0[i] ^ b.0[i]);
                a.0[i] ^= t;
                b.0[i] ^= t;
            }
        }

        // Montgomery reduction: x -> x/R mod p, for x < p.
        fn set_montyred(&mut self) {
            for _ in 0..Self::N {
                let f = self.0[0].wrapping_mul(Self::P0I);
                let (_, mut cc) = umull_add(f, Self::MODULUS[0], self.0[0]);
                for i in 1..Self::N {
                    (self.0[i - 1], cc) = umull_add2(f, Self::MODULUS[i], self.0[i], cc);
                }
                self.0[Self::N - 1] = cc;
            }
        }

        // Montgomery multiplication (CIOS, interleaved reduction).
        fn set_mul(&mut self, rhs: &Self) {
            let mut t = [0u64; $typename::N];
            let mut top = 0;
            for i in 0..Self::N {
                let f = rhs.0[i];
                let (lo, mut c1) = umull_add(f, self.0[0], t[0]);
                let g = lo.wrapping_mul(Self::P0I);
                let (_, mut c2) = umull_add(g, Self::MODULUS[0], lo);
                for j in 1..Self::N {
                    let (d, h1) = umull_add2(f, self.0[j], t[j], c1);
                    let (d, h2) = umull_add2(g, Self::MODULUS[j], d, c2);
                    t[j - 1] = d;
                    c1 = h1;
                    c2 = h2;
                }
                (t[Self::N - 1], top) = addcarry_u64(c1, c2, top);
            }

            // t < 2*p: conditional subtraction of p.
            let mut b = 0;
            for i in 0..Self::N {
                (t[i], b) = subborrow_u64(t[i], Self::MODULUS[i], b);
            }
            self.0 = t;
            self.add_masked_modulus((top as u64).wrapping_sub(b as u64));
        }

        #[inline(always)]
        pub fn set_square(&mut self) {
            let x = *self;
            self.set_mul(&x);
        }

        #[inline(always)]
        pub fn square(self) -> Self {
            let mut r = self;
            r.set_square();
            r
        }

        /// Squares this value `n` times.
        pub fn set_xsquare(&mut self, n: u32) {
            for _ in 0..n {
                self.set_square();
            }
        }

        /// Halves this value (p is added first if the value is odd).
        #[inline]
        pub fn set_half(&mut self) {
            let cc = self.add_masked_modulus((self.0[0] & 1).wrapping_neg());
            for i in 0..(Self::N - 1) {
                self.0[i] = (self.0[i] >> 1) | (self.0[i + 1] << 63);
            }
            self.0[Self::N - 1] = (self.0[Self::N - 1] >> 1) | ((cc as u64) << 63);
        }

        #[inline(always)]
        pub fn half(self) -> Self {
            let mut r = self;
            r.set_half();
            r
        }

        #[inline(always)]
        pub fn set_mul2(&mut self) {
            let r = *self;
            self.set_add(&r);
        }

        #[inline(always)]
        pub fn mul2(self) -> Self {
            let mut r = self;
            r.set_mul2();
            r
        }

        #[inline(always)]
        pub fn set_mul4(&mut self) {
            self.set_mul2();
            self.set_mul2();
        }

        #[inline(always)]
        pub fn mul4(self) -> Self {
            let mut r = self;
            r.set_mul4();
            r
        }

        /// Raises this value to the power `e` (little-endian limbs). The
        /// exponent is public; the base may be secret.
        pub fn set_modpow_pubexp(&mut self, e: &[u64; Self::N]) {
            let mut win = [Self::ONE; 16];
            win[1] = *self;
            for k in 2..16 {
                win[k] = win[k - 1] * win[1];
            }
            let mut r = Self::ONE;
            let mut started = false;
            for nib in (0..(16 * Self::N)).rev() {
                let c = ((e[nib >> 4] >> ((nib & 15) << 2)) & 0x0F) as usize;
                if started {
                    r.set_xsquare(4);
                }
                if c != 0 {
                    r.set_mul(&win[c]);
                    started = true;
                }
            }
            *self = r;
        }

        #[inline(always)]
        pub fn modpow_pubexp(self, e: &[u64; Self::N]) -> Self {
            let mut r = self;
            r.set_modpow_pubexp(e);
            r
        }

        /// Inverts this value (x^(p-2)); zero yields zero.
        pub fn set_invert(&mut self) {
            self.set_modpow_pubexp(&Self::EXP_INV);
        }

        #[inline(always)]
        pub fn invert(self) -> Self {
            let mut r = self;
            r.set_invert();
            r
        }

        #[inline(always)]
        fn set_div(&mut self, y: &Self) {
            self.set_mul(&y.invert());
        }

        /// Returns 0xFFFFFFFF for a non-zero square, 0x00000000
        /// otherwise (zero included).
        pub fn is_square(self) -> u32 {
            self.modpow_pubexp(&Self::EXP_LEGENDRE).equals(Self::ONE)
        }

        #[inline]
        pub fn equals(self, rhs: Self) -> u32 {
            let mut r = 0;
            for i in 0..Self::N {
                r |= self.0[i] ^ rhs.0[i];
            }
            ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
        }

        #[inline]
        pub fn iszero(self) -> u32 {
            self.equals(Self::ZERO)
        }

        /// Encodes this value over `ENC_LEN` bytes (unsigned little-endian,
        /// canonical).
        pub fn encode(self) -> [u8; Self::ENC_LEN] {
            let x = self.to_w64le();
            let mut d = [0u8; Self::ENC_LEN];
            for (i, c) in d.chunks_mut(8).enumerate() {
                let n = c.len();
                c.copy_from_slice(&x[i].to_le_bytes()[..n]);
            }
            d
        }

        // Reads up to 8*N bytes as an integer, without reduction or
        // conversion.
        fn raw_limbs(buf: &[u8]) -> [u64; $typename::N] {
            let mut d = [0u64; Self::N];
            for (i, c) in buf.chunks(8).enumerate() {
                let mut w = [0u8; 8];
                w[..c.len()].copy_from_slice(c);
                d[i] = u64::from_le_bytes(w);
            }
            d
        }

        // 0xFFFFFFFF if the integer x is lower than p.
        #[inline]
        fn limbs_below_modulus(x: &[u64; $typename::N]) -> u32 {
            let mut b = 0;
            for i in 0..Self::N {
                (_, b) = subborrow_u64(x[i], Self::MODULUS[i], b);
            }
            (b as u32).wrapping_neg()
        }

        /// Decodes a canonical encoding: exactly `ENC_LEN` bytes, with a
        /// value lower than p. On failure, zero and 0x00000000 are
        /// returned. Only the input length may leak.
        pub fn decode_ct(buf: &[u8]) -> (Self, u32) {
            if buf.len() != Self::ENC_LEN {
                return (Self::ZERO, 0);
            }
            let d = Self::raw_limbs(buf);
            let ok = Self::limbs_below_modulus(&d);
            let mut x = Self(d);
            x.set_cond(&Self::ZERO, !ok);
            x.set_mul(&Self::R2);
            (x, ok)
        }

        /// Decodes a canonical encoding; `None` on failure.
        #[inline(always)]
        pub fn decode(buf: &[u8]) -> Option<Self> {
            let (x, ok) = Self::decode_ct(buf);
            if ok != 0 {
                Some(x)
            } else {
                None
            }
        }

        /// Interprets arbitrary bytes as an unsigned little-endian
        /// integer, reduced modulo p.
        pub fn decode_reduce(buf: &[u8]) -> Self {
            let mut r = Self::ZERO;
            let mut f = Self::ONE;
            for c in buf.chunks(8) {
                let mut w = [0u8; 8];
                w[..c.len()].copy_from_slice(c);
                r += Self::from_u64(u64::from_le_bytes(w)) * f;
                f *= Self::W64;
            }
            r
        }

        /// Samples a uniform element by rejection: `ENC_LEN` bytes are
        /// drawn, truncated to the modulus length, and kept if lower
        /// than p. A draw is rejected with probability below 1/2.
        pub fn sample(xof: &mut Xof) -> Self {
            let top_mask = 0xFFu8 >> (8 * Self::ENC_LEN - Self::BITLEN);
            let mut buf = [0u8; Self::ENC_LEN];
            loop {
                xof.squeeze(&mut buf);
                buf[Self::ENC_LEN - 1] &= top_mask;
                let d = Self::raw_limbs(&buf);
                if Self::limbs_below_modulus(&d) != 0 {
                    // Uniform below p is uniform as a Montgomery value.
                    return Self(d);
                }
            }
        }

        // =================================================================
        // Compile-time helpers.

        const fn limb_count() -> usize {
            let m = &$fieldparams::MODULUS;
            let mut n = m.len();
            while m[n - 1] == 0 {
                n -= 1;
            }
            n
        }

        const fn modulus_limbs() -> [u64; Self::N] {
            let mut d = [0u64; Self::N];
            let mut i = 0;
            while i < Self::N {
                d[i] = $fieldparams::MODULUS[i];
                i += 1;
            }
            d
        }

        const fn modulus_bits() -> usize {
            64 * Self::N - ($fieldparams::MODULUS[Self::N - 1].leading_zeros() as usize)
        }

        // (p - k) >> s, with k lower than the low limb of p, and s < 64.
        const fn modulus_minus_shr(k: u64, s: u32) -> [u64; Self::N] {
            let mut d = Self::modulus_limbs();
            d[0] -= k;
            let mut i = 0;
            while s > 0 && i < Self::N {
                let next = if i + 1 < Self::N { d[i + 1] } else { 0 };
                d[i] = (d[i] >> s) | (next << (64 - s));
                i += 1;
            }
            d
        }

        // -1/x mod 2^64, for an odd x (Newton iteration).
        const fn neg_inv64(x: u64) -> u64 {
            let mut y = x;
            let mut i = 0;
            while i < 6 {
                y = y.wrapping_mul(2u64.wrapping_sub(x.wrapping_mul(y)));
                i += 1;
            }
            y.wrapping_neg()
        }

        // x - p if x >= p, x otherwise; x < 2^(64*N+1), with the top
        // bit given separately.
        const fn const_reduce_once(x: [u64; Self::N], top: u64) -> [u64; Self::N] {
            let mut d = [0u64; Self::N];
            let mut b = 0u128;
            let mut i = 0;
            while i < Self::N {
                let z = (x[i] as u128).wrapping_sub(Self::MODULUS[i] as u128)
                    .wrapping_sub(b);
                d[i] = z as u64;
                b = (z >> 127) as u128;
                i += 1;
            }
            if top == 0 && b != 0 { x } else { d }
        }

        // 2^n mod p, by doubling (n > 0).
        const fn pow2(n: usize) -> [u64; Self::N] {
            let mut d = [0u64; Self::N];
            d[0] = 1;
            let mut k = 0;
            while k < n {
                let mut top = 0;
                let mut i = 0;
                while i < Self::N {
                    let w = d[i];
                    d[i] = (w << 1) | top;
                    top = w >> 63;
                    i += 1;
                }
                d = Self::const_reduce_once(d, top);
                k += 1;
            }
            d
        }

        const fn const_neg(a: Self) -> Self {
            let mut d = [0u64; Self::N];
            let mut b = 0u128;
            let mut i = 0;
            while i < Self::N {
                let z = (Self::MODULUS[i] as u128).wrapping_sub(a.0[i] as u128)
                    .wrapping_sub(b);
                d[i] = z as u64;
                b = (z >> 127) as u128;
                i += 1;
            }
            Self(d)
        }

        // Montgomery multiplication, operand scanning with a
        // double-width accumulator.
        const fn const_mmul(a: Self, b: Self) -> Self {
            let mut t = [0u64; Self::N];
            let mut top = 0u64;
            let mut i = 0;
            while i < Self::N {
                let mut cc = 0u128;
                let mut j = 0;
                while j < Self::N {
                    let z = (a.0[j] as u128) * (b.0[i] as u128)
                        + (t[j] as u128) + cc;
                    t[j] = z as u64;
                    cc = z >> 64;
                    j += 1;
                }
                let z = (top as u128) + cc;
                let hi = z as u64;
                let hi2 = (z >> 64) as u64;

                let f = t[0].wrapping_mul(Self::P0I);
                let mut cc = ((f as u128) * (Self::MODULUS[0] as u128)
                    + (t[0] as u128)) >> 64;
                let mut j = 1;
                while j < Self::N {
                    let z = (f as u128) * (Self::MODULUS[j] as u128)
                        + (t[j] as u128) + cc;
                    t[j - 1] = z as u64;
                    cc = z >> 64;
                    j += 1;
                }
                let z = (hi as u128) + cc;
                t[Self::N - 1] = z as u64;
                top = hi2 + ((z >> 64) as u64);
                i += 1;
            }
            Self(Self::const_reduce_once(t, top))
        }

        const fn const_small(x: u64) -> Self {
            let mut d = [0u64; Self::N];
            d[0] = x;
            Self::const_mmul(Self(d), Self::R2)
        }
    }

    field_ops!($typename);

    } // sub-module

} } // End of macro: define_gfp

pub use define_gfp;

// ========================================================================

#[macro_export]
macro_rules! define_gfp_tests { ($typename:ident, $submod:ident) => {

    #[cfg(test)]
    mod $submod {

    use super::$typename;
    use num_bigint::BigUint;

    fn modulus() -> BigUint {
        let mut buf = [0u8; 8 * $typename::N];
        for (i, w) in $typename::MODULUS.iter().enumerate() {
            buf[(8 * i)..(8 * i + 8)].copy_from_slice(&w.to_le_bytes());
        }
        BigUint::from_bytes_le(&buf)
    }

    fn big(x: $typename) -> BigUint {
        BigUint::from_bytes_le(&x.encode())
    }

    // Checks all operations on the values decoded (with reduction) from
    // two byte strings.
    fn check_gf_ops(va: &[u8], vb: &[u8]) {
        let p = modulus();
        let a = $typename::decode_reduce(va);
        let b = $typename::decode_reduce(vb);
        let za = BigUint::from_bytes_le(va) % &p;
        let zb = BigUint::from_bytes_le(vb) % &p;
        assert!(big(a) == za);
        assert!(big(b) == zb);

        assert!(big(a + b) == (&za + &zb) % &p);
        assert!(big(a - b) == (&p + &za - &zb) % &p);
        assert!(big(-a) == (&p - &za) % &p);
        assert!(big(a * b) == (&za * &zb) % &p);
        assert!(big(a.square()) == (&za * &za) % &p);
        assert!(big(a.mul4()) == (&za << 2) % &p);
        assert!((big(a.half()) << 1) % &p == za);

        let (e, ok) = $typename::decode_ct(va);
        if ok != 0 {
            assert!(ok == 0xFFFFFFFF);
            assert!(e.encode()[..] == va[..]);
        } else {
            assert!(e.iszero() == 0xFFFFFFFF);
        }

        assert!($typename::from_w64le(a.to_w64le()).equals(a) == 0xFFFFFFFF);

        if zb == BigUint::from(0u32) {
            assert!((a / b).iszero() == 0xFFFFFFFF);
        } else {
            assert!(((a / b) * b).equals(a) == 0xFFFFFFFF);
            assert!((b * b.invert()).equals($typename::ONE) == 0xFFFFFFFF);
            let e = $typename::EXP_LEGENDRE;
            let legendre = b.modpow_pubexp(&e);
            assert!(big(legendre) == zb.modpow(&((&p - 1u32) >> 1), &p));
        }
    }

    fn mkrndv(vv: &mut [u8], bx: u64) {
        use sha2::{Sha512, Digest};

        for (j, c) in vv.chunks_mut(64).enumerate() {
            let mut sh = Sha512::new();
            sh.update(bx.to_le_bytes());
            sh.update((j as u64).to_le_bytes());
            let n = c.len();
            c.copy_from_slice(&sh.finalize()[..n]);
        }
    }

    #[test]
    fn field_ops() {
        let zero = [0u8; $typename::ENC_LEN];
        let ones = [0xFFu8; $typename::ENC_LEN];
        check_gf_ops(&zero, &zero);
        check_gf_ops(&ones, &ones);
        assert!($typename::decode_reduce(&zero).is_square() == 0);

        let mut va = [0u8; 2 * $typename::ENC_LEN];
        let mut vb = [0u8; $typename::ENC_LEN];
        for i in 0..100 {
            mkrndv(&mut va, 2 * i);
            mkrndv(&mut vb, 2 * i + 1);
            check_gf_ops(&va[..$typename::ENC_LEN], &vb);
            check_gf_ops(&va, &vb[..(i as usize % $typename::ENC_LEN)]);

            // p = 3 mod 4, hence -1 is a non-residue.
            let s = $typename::decode_reduce(&va).square();
            assert!(s.is_square() == 0xFFFFFFFF);
            assert!((-s).is_square() == 0);
        }
    }

    #[test]
    fn constants() {
        assert!(big($typename::ONE) == BigUint::from(1u32));
        assert!(big($typename::SIX) == BigUint::from(6u32));
        assert!(($typename::ONE + $typename::ONE).equals($typename::TWO) == 0xFFFFFFFF);
        assert!(($typename::TWO + $typename::ONE).equals($typename::THREE) == 0xFFFFFFFF);
        assert!($typename::ONE.mul4().equals($typename::FOUR) == 0xFFFFFFFF);
        assert!(($typename::MINUS_ONE + $typename::ONE).iszero() == 0xFFFFFFFF);
        assert!($typename::from_u64(6).equals($typename::SIX) == 0xFFFFFFFF);
        assert!(big($typename::W64) == BigUint::from(1u32) << 64);
        assert!(modulus().bits() as usize == $typename::BITLEN);
        assert!(($typename::MODULUS[0] & 3) == 3);
    }

    #[test]
    fn sample() {
        let mut xof = $crate::xof::Xof::from_seed(b"field sampling");
        let mut prev = $typename::ZERO;
        for _ in 0..50 {
            let x = $typename::sample(&mut xof);
            assert!($typename::decode(&x.encode()).unwrap().equals(x) == 0xFFFFFFFF);
            assert!(x.equals(prev) == 0);
            prev = x;
        }
    }

    #[test]
    fn decode_rejects_modulus() {
        let p = modulus();
        let mut buf = [0u8; $typename::ENC_LEN];
        buf.copy_from_slice(&p.to_bytes_le());
        assert!($typename::decode(&buf).is_none());
        assert!($typename::decode(&buf[1..]).is_none());
        buf[0] -= 1;
        assert!($typename::decode(&buf).unwrap().equals($typename::MINUS_ONE) == 0xFFFFFFFF);
    }

    } // end of module

} } // End of macro: define_gfp_tests

pub use define_gfp_tests;
