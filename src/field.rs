//! Finite fields.
//!
//! The base field GF(p) is the `Fp` type generated for the selected
//! parameter set (see `params`). Since p = 3 mod 4, the quadratic
//! extension GF(p^2) is built as GF(p)[i] with i^2 = -1; this is the
//! `Fp2` type defined here. All curve arithmetic is performed over
//! `Fp2`.

use crate::params::QUADRATIC_FIELD_BYTES;
use crate::xof::Xof;

pub use crate::params::Fp;

/// Element of GF(p^2), i.e. `re + i*im` with `re` and `im` in GF(p).
#[derive(Clone, Copy, Debug)]
pub struct Fp2 {
    re: Fp,
    im: Fp,
}

impl Fp2 {

    pub const ZERO: Self = Self { re: Fp::ZERO, im: Fp::ZERO };
    pub const ONE: Self = Self { re: Fp::ONE, im: Fp::ZERO };
    pub const TWO: Self = Self { re: Fp::TWO, im: Fp::ZERO };
    pub const SIX: Self = Self { re: Fp::SIX, im: Fp::ZERO };
    pub const MINUS_ONE: Self = Self { re: Fp::MINUS_ONE, im: Fp::ZERO };

    /// Encoded length, in bytes (real part, then imaginary part).
    pub const ENC_LEN: usize = QUADRATIC_FIELD_BYTES;

    /// Builds an element from its real and imaginary parts.
    pub const fn new(re: Fp, im: Fp) -> Self {
        Self { re, im }
    }

    /// Lifts a base field element.
    pub const fn from_fp(re: Fp) -> Self {
        Self { re, im: Fp::ZERO }
    }

    /// Gets the real and imaginary parts.
    #[inline(always)]
    pub fn parts(self) -> (Fp, Fp) {
        (self.re, self.im)
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.re.set_neg();
        self.im.set_neg();
    }

    /// Replaces this value with its conjugate (`re - i*im`).
    #[inline(always)]
    pub fn set_conjugate(&mut self) {
        self.im.set_neg();
    }

    #[inline(always)]
    pub fn conjugate(self) -> Self {
        let mut r = self;
        r.set_conjugate();
        r
    }

    // Karatsuba: three base field multiplications.
    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        let z0 = self.re * rhs.re;
        let z1 = self.im * rhs.im;
        let z2 = (self.re + self.im) * (rhs.re + rhs.im);
        self.re = z0 - z1;
        self.im = z2 - z0 - z1;
    }

    /// Multiplies this value by an element of the base field.
    #[inline(always)]
    pub fn set_mul_fp(&mut self, rhs: &Fp) {
        self.re *= rhs;
        self.im *= rhs;
    }

    #[inline(always)]
    pub fn mul_fp(self, rhs: &Fp) -> Self {
        let mut r = self;
        r.set_mul_fp(rhs);
        r
    }

    /// Squares this value (two base field multiplications).
    #[inline]
    pub fn set_square(&mut self) {
        let t = self.re * self.im;
        self.re = (self.re + self.im) * (self.re - self.im);
        self.im = t.mul2();
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

    #[inline(always)]
    pub fn set_half(&mut self) {
        self.re.set_half();
        self.im.set_half();
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    #[inline(always)]
    pub fn set_mul2(&mut self) {
        self.re.set_mul2();
        self.im.set_mul2();
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    #[inline(always)]
    pub fn set_mul4(&mut self) {
        self.re.set_mul4();
        self.im.set_mul4();
    }

    #[inline(always)]
    pub fn mul4(self) -> Self {
        let mut r = self;
        r.set_mul4();
        r
    }

    /// Gets the norm `re^2 + im^2` (an element of GF(p)).
    #[inline(always)]
    pub fn norm(self) -> Fp {
        self.re.square() + self.im.square()
    }

    /// Inverts this value; zero is mapped to zero. The inverse is
    /// `conj(x) / norm(x)`, hence a single base field inversion.
    pub fn set_invert(&mut self) {
        let n = self.norm().invert();
        self.re *= n;
        self.im *= -n;
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

    /// Inverts all the elements of a slice, with a single field
    /// inversion (Montgomery's trick). Zero values are left unchanged.
    pub fn batch_invert(xx: &mut [Self]) {
        // We use batches of 8 elements, which allows a stack-allocated
        // buffer; callers invert only a few values at a time.
        let n = xx.len();
        let mut i = 0;
        while i < n {
            let blen = if (n - i) > 8 { 8 } else { n - i };
            let mut tt = [Self::ZERO; 8];
            tt[0] = xx[i];
            let zz0 = tt[0].iszero();
            tt[0].set_cond(&Self::ONE, zz0);
            for j in 1..blen {
                tt[j] = xx[i + j];
                tt[j].set_cond(&Self::ONE, tt[j].iszero());
                tt[j] *= tt[j - 1];
            }
            let mut k = tt[blen - 1].invert();
            for j in (1..blen).rev() {
                let mut x = xx[i + j];
                let zz = x.iszero();
                x.set_cond(&Self::ONE, zz);
                xx[i + j].set_cond(&(k * tt[j - 1]), !zz);
                k *= x;
            }
            xx[i].set_cond(&k, !zz0);
            i += blen;
        }
    }

    /// Raises this value to the power `e` (public exponent, given as
    /// base field limbs, little-endian).
    pub fn set_modpow_pubexp(&mut self, e: &[u64; Fp::N]) {
        let mut win = [Self::ONE; 16];
        win[1] = *self;
        for k in 2..16 {
            win[k] = win[k - 1] * win[1];
        }
        let mut r = Self::ONE;
        let mut started = false;
        for nib in (0..(16 * Fp::N)).rev() {
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
    pub fn modpow_pubexp(self, e: &[u64; Fp::N]) -> Self {
        let mut r = self;
        r.set_modpow_pubexp(e);
        r
    }

    /// Square root test and extraction.
    ///
    /// Returned values are `(s, 0xFFFFFFFF)` with `s^2 = self` if this
    /// value is a square (zero included, with root zero), or
    /// `(_, 0x00000000)` otherwise. Which of the two roots is returned
    /// is not specified. This function is constant-time.
    pub fn is_square(self) -> (Self, u32) {
        // With t = a^((p-3)/4) and alpha = t^2*a = a^((p-1)/2):
        //  - a is a non-square iff alpha*conj(alpha) = -1;
        //  - if alpha = -1, then a root is i*a^((p+1)/4);
        //  - otherwise, a root is (1 + alpha)^((p-1)/2) * a^((p+1)/4).
        let t = self.modpow_pubexp(&Fp::EXP_SQRT);
        let alpha = t.square() * self;
        let x0 = t * self;

        let nonsq = (alpha * alpha.conjugate()).equals(Self::MINUS_ONE);

        let x1 = Self { re: -x0.im, im: x0.re };
        let mut r = (alpha + Self::ONE).modpow_pubexp(&Fp::EXP_LEGENDRE) * x0;
        r.set_cond(&x1, alpha.equals(Self::MINUS_ONE));
        (r, !nonsq)
    }

    #[inline]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        self.re.set_cond(&a.re, ctl);
        self.im.set_cond(&a.im, ctl);
    }

    #[inline]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    #[inline]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        Fp::cswap(&mut a.re, &mut b.re, ctl);
        Fp::cswap(&mut a.im, &mut b.im, ctl);
    }

    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        self.re.equals(rhs.re) & self.im.equals(rhs.im)
    }

    #[inline]
    pub fn iszero(self) -> u32 {
        self.re.iszero() & self.im.iszero()
    }

    /// Encodes this value: real part, then imaginary part, each in
    /// canonical unsigned little-endian format.
    pub fn encode(self) -> [u8; Self::ENC_LEN] {
        let mut d = [0u8; Self::ENC_LEN];
        d[..Fp::ENC_LEN].copy_from_slice(&self.re.encode());
        d[Fp::ENC_LEN..].copy_from_slice(&self.im.encode());
        d
    }

    /// Decodes a value. Both halves must be canonical; on failure, zero
    /// and 0x00000000 are returned.
    pub fn decode_ct(buf: &[u8]) -> (Self, u32) {
        if buf.len() != Self::ENC_LEN {
            return (Self::ZERO, 0);
        }
        let (re, r1) = Fp::decode_ct(&buf[..Fp::ENC_LEN]);
        let (im, r2) = Fp::decode_ct(&buf[Fp::ENC_LEN..]);
        let r = r1 & r2;
        let mut x = Self { re, im };
        x.set_cond(&Self::ZERO, !r);
        (x, r)
    }

    /// Decodes a value, returning `None` on failure.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (x, r) = Self::decode_ct(buf);
        if r != 0 {
            Some(x)
        } else {
            None
        }
    }

    /// Samples a uniform element (real part first).
    pub fn sample(xof: &mut Xof) -> Self {
        let re = Fp::sample(xof);
        let im = Fp::sample(xof);
        Self { re, im }
    }
}

field_ops!(Fp2);
