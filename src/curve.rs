//! x-only arithmetic on Montgomery curves.
//!
//! Curves are Montgomery curves `y^2 = x^3 + A*x^2 + x` over GF(p^2).
//! Points are handled on the Kummer line, i.e. as projective (X:Z)
//! pairs with x = X/Z; a point and its opposite share the same
//! representation, and Z = 0 is the point at infinity.
//!
//! The curve coefficient is kept in one of two projective forms,
//! depending on the operation:
//!
//!  - `AliceCurve` stores (A+2C : 4C); it drives doublings and the
//!    2-isogeny and 4-isogeny formulas.
//!
//!  - `BobCurve` stores (A+2C : A-2C); it drives triplings and the
//!    3-isogeny formulas.
//!
//! Conversions to and from the affine coefficient A cost one inversion.
//!
//! Aliasing: all point functions take their inputs by reference or by
//! value and return new values, so an output may always overwrite one
//! of the inputs. The in-place `set_*()` variants read all the operand
//! coordinates before writing any of them.

#![allow(non_snake_case)]

use crate::error::{Error, Result};
use crate::field::{Fp, Fp2};
use crate::params::{CANONICAL_BASIS_TABLE, EXPONENT_ALICE, EXPONENT_BOB};
use crate::scalar::Scalar;

/// A point on the Kummer line of a Montgomery curve.
#[derive(Clone, Copy, Debug)]
pub struct XPoint {
    pub(crate) X: Fp2,
    pub(crate) Z: Fp2,
}

/// Projective curve coefficient (A+2C : 4C).
#[derive(Clone, Copy, Debug)]
pub struct AliceCurve {
    pub(crate) A24p: Fp2,
    pub(crate) C24: Fp2,
}

/// Projective curve coefficient (A+2C : A-2C).
#[derive(Clone, Copy, Debug)]
pub struct BobCurve {
    pub(crate) A24p: Fp2,
    pub(crate) A24m: Fp2,
}

impl XPoint {

    /// The point at infinity.
    pub const INFINITY: Self = Self { X: Fp2::ONE, Z: Fp2::ZERO };

    /// Builds a point from projective coordinates.
    pub const fn new(X: Fp2, Z: Fp2) -> Self {
        Self { X, Z }
    }

    /// Builds a point from an affine x coordinate.
    pub const fn from_x(x: Fp2) -> Self {
        Self { X: x, Z: Fp2::ONE }
    }

    /// Gets the projective coordinates (X, Z).
    pub fn coords(self) -> (Fp2, Fp2) {
        (self.X, self.Z)
    }

    /// Gets the affine x coordinate (zero for the point at infinity).
    pub fn to_x(self) -> Fp2 {
        self.X / self.Z
    }

    /// Returns 0xFFFFFFFF for the point at infinity, 0x00000000
    /// otherwise.
    #[inline]
    pub fn is_infinity(self) -> u32 {
        self.Z.iszero()
    }

    /// Compares two points (up to sign).
    #[inline]
    pub fn equals(self, rhs: &Self) -> u32 {
        (self.X * rhs.Z).equals(rhs.X * self.Z)
    }

    /// Compares this point with an affine x coordinate (no inversion).
    #[inline]
    pub fn equals_x(self, x: &Fp2) -> u32 {
        self.X.equals(x * self.Z)
    }

    #[inline]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        self.X.set_cond(&a.X, ctl);
        self.Z.set_cond(&a.Z, ctl);
    }

    /// Exchanges `a` and `b` if `ctl` is 0xFFFFFFFF; `ctl` must be
    /// 0xFFFFFFFF or 0x00000000.
    #[inline]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        Fp2::cswap(&mut a.X, &mut b.X, ctl);
        Fp2::cswap(&mut a.Z, &mut b.Z, ctl);
    }

    /// Doubles this point (4M+2S).
    pub fn set_xdbl(&mut self, curve: &AliceCurve) {
        let t0 = (self.X - self.Z).square();
        let mut t1 = (self.X + self.Z).square();
        let Z = curve.C24 * t0;
        self.X = Z * t1;
        t1 -= t0;
        let t0 = curve.A24p * t1;
        self.Z = (Z + t0) * t1;
    }

    #[inline(always)]
    pub fn xdbl(self, curve: &AliceCurve) -> Self {
        let mut r = self;
        r.set_xdbl(curve);
        r
    }

    /// Doubles this point `n` times.
    pub fn set_xdbl_n(&mut self, n: usize, curve: &AliceCurve) {
        for _ in 0..n {
            self.set_xdbl(curve);
        }
    }

    #[inline(always)]
    pub fn xdbl_n(self, n: usize, curve: &AliceCurve) -> Self {
        let mut r = self;
        r.set_xdbl_n(n, curve);
        r
    }

    /// Triples this point (7M+5S).
    pub fn set_xtpl(&mut self, curve: &BobCurve) {
        let t0 = self.X - self.Z;
        let t2 = t0.square();
        let t1 = self.X + self.Z;
        let t3 = t1.square();
        let t4 = t1 + t0;
        let t0 = t1 - t0;
        let t1 = t4.square() - t3 - t2;
        let X = t3 * curve.A24p;
        let t3 = X * t3;
        let Z = t2 * curve.A24m;
        let t2 = t2 * Z;
        let t3 = t2 - t3;
        let t2 = X - Z;
        let t1 = t2 * t1;
        self.X = (t3 + t1).square() * t4;
        self.Z = (t3 - t1).square() * t0;
    }

    #[inline(always)]
    pub fn xtpl(self, curve: &BobCurve) -> Self {
        let mut r = self;
        r.set_xtpl(curve);
        r
    }

    /// Triples this point `n` times.
    pub fn set_xtpl_n(&mut self, n: usize, curve: &BobCurve) {
        for _ in 0..n {
            self.set_xtpl(curve);
        }
    }

    #[inline(always)]
    pub fn xtpl_n(self, n: usize, curve: &BobCurve) -> Self {
        let mut r = self;
        r.set_xtpl_n(n, curve);
        r
    }

    /// Differential addition: computes x(P+Q) from x(P), x(Q) and
    /// x(P-Q).
    pub fn x_add(P: &Self, Q: &Self, PmQ: &Self) -> Self {
        let t0 = P.X + P.Z;
        let t1 = (Q.X - Q.Z) * t0;
        let t0 = P.X - P.Z;
        let t2 = (Q.X + Q.Z) * t0;
        Self {
            X: PmQ.Z * (t1 + t2).square(),
            Z: PmQ.X * (t1 - t2).square(),
        }
    }

    /// Combined doubling and differential addition: `P` is replaced
    /// with [2]P, and `Q` with P+Q. The difference P-Q is provided in
    /// `PmQ`; `a24` is (A+2)/4.
    fn xdbladd(P: &mut Self, Q: &mut Self, PmQ: &Self, a24: &Fp2) {
        let t0 = P.X + P.Z;
        let t1 = P.X - P.Z;
        let XP = t0.square();
        let t2 = Q.X - Q.Z;
        let XQ = Q.Z + Q.X;
        let t0 = t2 * t0;
        let ZP = t1.square();
        let t1 = t1 * XQ;
        let t2 = XP - ZP;
        P.X = XP * ZP;
        let XQ = a24 * t2;
        let ZQ = t0 - t1;
        P.Z = (XQ + ZP) * t2;
        let XQ = t0 + t1;
        Q.Z = PmQ.X * ZQ.square();
        Q.X = PmQ.Z * XQ.square();
    }
}

impl AliceCurve {

    /// Converts an affine coefficient A into (A+2 : 4).
    pub fn from_a(A: &Fp2) -> Self {
        Self { A24p: A + Fp2::TWO, C24: Fp2::ONE.mul4() }
    }

    /// Gets the affine coefficient A.
    pub fn to_a(self) -> Fp2 {
        (self.A24p.mul2() - self.C24).mul2() / self.C24
    }

    /// Converts to the (A+2C : A-2C) form.
    pub fn to_bob(self) -> BobCurve {
        BobCurve { A24p: self.A24p, A24m: self.A24p - self.C24 }
    }

    /// Compares with an affine coefficient (no inversion).
    pub fn equals_a(self, A: &Fp2) -> u32 {
        (self.A24p.mul2() - self.C24).mul2().equals(self.C24 * A)
    }

    /// Computes the j-invariant of the curve:
    /// j = 256*(A^2 - 3*C^2)^3 / (C^4*(A^2 - 4*C^2)).
    pub fn j_invariant(self) -> Fp2 {
        let a = (self.A24p.mul2() - self.C24).mul2();
        let mut t1 = self.C24.square();
        let j = a.square();
        let mut t0 = j - t1.mul2();
        t0 -= t1;
        let mut j = t0 - t1;
        t1.set_square();
        j *= t1;
        t0.set_mul4();
        let t1 = t0.square();
        t0 *= t1;
        t0.set_mul4();
        t0 / j
    }
}

impl BobCurve {

    /// Converts an affine coefficient A into (A+2 : A-2).
    pub fn from_a(A: &Fp2) -> Self {
        Self { A24p: A + Fp2::TWO, A24m: A - Fp2::TWO }
    }

    /// Gets the affine coefficient A.
    pub fn to_a(self) -> Fp2 {
        (self.A24p + self.A24m).mul2() / (self.A24p - self.A24m)
    }

    /// Converts to the (A+2C : 4C) form.
    pub fn to_alice(self) -> AliceCurve {
        AliceCurve { A24p: self.A24p, C24: self.A24p - self.A24m }
    }

    /// Compares with an affine coefficient (no inversion).
    pub fn equals_a(self, A: &Fp2) -> u32 {
        (self.A24p + self.A24m).mul2().equals((self.A24p - self.A24m) * A)
    }
}

/// Three-point ladder: computes x(P + [k]Q) from the affine x
/// coordinates of P, Q and P-Q, on the curve of coefficient A. Only the
/// `bits` low bits of `k` are used. This function is constant-time
/// (for a given `bits`).
pub fn three_point_ladder(xP: &Fp2, xQ: &Fp2, xPmQ: &Fp2,
    k: &Scalar, bits: usize, A: &Fp2) -> XPoint
{
    let a24 = (A + Fp2::TWO).half().half();
    let mut R0 = XPoint::from_x(*xQ);
    let mut R2 = XPoint::from_x(*xPmQ);
    let mut R1 = XPoint::from_x(*xP);

    // R1 and R2 are swapped whenever the scalar bit changes, not on
    // the bit value itself; the final swap undoes the pending state.
    let mut prev = 0u32;
    for i in 0..bits {
        let bit = k.bit(i);
        let swap = (bit ^ prev).wrapping_neg();
        prev = bit;
        XPoint::cswap(&mut R1, &mut R2, swap);
        XPoint::xdbladd(&mut R0, &mut R2, &R1, &a24);
    }
    XPoint::cswap(&mut R1, &mut R2, prev.wrapping_neg());
    R1
}

/// Plain Montgomery ladder: computes [k]P, using the `bits` low bits
/// of k (the bit of index `bits-1` must be set, unless `bits` is 0).
/// This function is not constant-time.
pub fn x_only_ladder_vartime(P: &XPoint, k: &Scalar, bits: usize, A: &Fp2) -> XPoint {
    if bits == 0 {
        return XPoint::INFINITY;
    }
    let curve = AliceCurve::from_a(A);
    let mut x0 = *P;
    let mut x1 = P.xdbl(&curve);
    for i in (0..(bits - 1)).rev() {
        if k.bit(i) == 0 {
            x1 = XPoint::x_add(&x0, &x1, P);
            x0.set_xdbl(&curve);
        } else {
            x0 = XPoint::x_add(&x0, &x1, P);
            x1.set_xdbl(&curve);
        }
    }
    x0
}

/// Computes x([c]P + [d]Q) from the affine x coordinates of P, Q and
/// P-Q, with a binary-GCD-like double-base chain. The point at infinity
/// is returned if both c and d are zero. This function is not
/// constant-time; c and d must be public.
pub fn two_dimensional_mul_vartime(xP: &Fp2, xQ: &Fp2, xPmQ: &Fp2,
    c: &Scalar, d: &Scalar, A: &Fp2) -> XPoint
{
    let curve = AliceCurve::from_a(A);
    let mut s0 = *c;
    let mut s1 = *d;
    let mut x0 = XPoint::from_x(*xP);
    let mut x1 = XPoint::from_x(*xQ);
    let mut x2 = XPoint::from_x(*xPmQ);

    // Invariant: the target is [s0]x0 + [s1]x1, and x2 = x0 - x1.
    while s0.iszero() == 0 {
        if s1.lt(&s0) != 0 {
            core::mem::swap(&mut s0, &mut s1);
            core::mem::swap(&mut x0, &mut x1);
        }
        let mut t = s0;
        t.set_shl1();
        t.set_shl1();
        if t.lt(&s1) == 0 {
            // s1 <= 4*s0
            s1.set_sub(&s0);
            let t = XPoint::x_add(&x1, &x0, &x2);
            x2 = x0;
            x0 = t;
        } else if (s0.isodd() ^ s1.isodd()) == 0 {
            s1.set_sub(&s0);
            s1.set_shr1();
            x0 = XPoint::x_add(&x1, &x0, &x2);
            x1.set_xdbl(&curve);
        } else if s1.isodd() == 0 {
            s1.set_shr1();
            x2 = XPoint::x_add(&x1, &x2, &x0);
            x1.set_xdbl(&curve);
        } else {
            s0.set_shr1();
            x2 = XPoint::x_add(&x0, &x2, &x1);
            x0.set_xdbl(&curve);
        }
    }

    if s1.iszero() != 0 {
        return XPoint::INFINITY;
    }

    // Remove the common power of two.
    while s1.isodd() == 0 {
        s1.set_shr1();
        x1.set_xdbl(&curve);
    }
    if Scalar::ONE.lt(&s1) != 0 {
        x1 = x_only_ladder_vartime(&x1, &s1, s1.bitlen_vartime(), A);
    }
    x1
}

/// Recovers the curve coefficient from the affine x coordinates of a
/// basis {P, Q, P-Q}:
/// A = (1 - xP*xQ - xP*xR - xQ*xR)^2 / (4*xP*xQ*xR) - xP - xQ - xR.
pub fn curve_from_points(xP: &Fp2, xQ: &Fp2, xR: &Fp2) -> Fp2 {
    let s = xP + xQ;
    let t = xP * xQ;
    let n = (t + xR * s - Fp2::ONE).square();
    let d = (t * xR).mul4();
    n / d - (s + xR)
}

/// Normalizes three points to affine x coordinates, with a single
/// inversion.
pub fn normalize3(pts: &[XPoint; 3]) -> [Fp2; 3] {
    let mut zz = [pts[0].Z, pts[1].Z, pts[2].Z];
    Fp2::batch_invert(&mut zz);
    [pts[0].X * zz[0], pts[1].X * zz[1], pts[2].X * zz[2]]
}

/// Checks that a point has full order 3^b on the curve of coefficient
/// A. The 2-power cofactor is cleared from `P` in place; the returned
/// values are [3^(b-1)]P and 0xFFFFFFFF if that point is not the point
/// at infinity (0x00000000 otherwise).
pub(crate) fn is_full_order_bob(P: &mut XPoint, A: &Fp2) -> (XPoint, u32) {
    P.set_xdbl_n(EXPONENT_ALICE, &AliceCurve::from_a(A));
    let P3 = P.xtpl_n(EXPONENT_BOB - 1, &BobCurve::from_a(A));
    (P3, !P3.is_infinity())
}

/// Elligator 2 map: with u a non-square and `r2` = r^2, returns the
/// candidate point of x coordinate -A/(1 + u*r^2), and whether it lies
/// on the curve (otherwise, the returned point is the one of x
/// coordinate -A*u*r^2/(1 + u*r^2), on the curve). Inputs are public.
fn elligator2(u: &Fp2, r2: &Fp2, A: &Fp2) -> (XPoint, bool) {
    let ur2 = u * r2;
    let x_prime = A * ur2;
    let s = A + x_prime;
    let Z = Fp2::ONE + ur2;
    let y = s * (A * x_prime - Z.square());

    // y is a square in GF(p^2) iff its norm is a square in GF(p).
    if y.norm().is_square() != 0 {
        (XPoint::new(-A, Z), true)
    } else {
        (XPoint::new(-x_prime, Z), false)
    }
}

/// Computes x(P-Q) for the Elligator 2 pair P = (xP : z),
/// Q = (u*r^2*xP : z), with u = u'^2.
fn elligator2_difference(xP: &Fp2, xQ: &Fp2, z: &Fp2, u_prime: &Fp2, r: &Fp2, A: &Fp2) -> XPoint {
    let t = (u_prime * r + Fp2::ONE).square();
    let x2 = xP.square();
    let z2 = z.square();
    let x = x2 * xP + A * x2 * z + xP * z2;
    XPoint::new(x * t, z * (xQ - xP).square())
}

/// Deterministic basis of the 3^b-torsion of the curve of coefficient
/// A, in projective coordinates {P, Q, P-Q}.
///
/// Candidates come from the Elligator 2 map, with r = t + i for the
/// values t of the table selected by the quadratic character of A; the
/// first candidate pair whose points P, Q and P-Q all have full order
/// 3^b, and with [3^(b-1)]P != [3^(b-1)]Q, is returned. This function is
/// not constant-time; A must be public.
pub fn canonical_basis_projective(A: &Fp2) -> Result<[XPoint; 3]> {
    let u_prime = Fp2::new(Fp::ONE, Fp::ONE);
    let u = u_prime.square();
    let (_, qr) = A.is_square();
    let table = &CANONICAL_BASIS_TABLE[(qr & 1) as usize];

    for (j, t) in table.iter().enumerate() {
        let r = Fp2::new(Fp::from_u64(*t as u64), Fp::ONE);
        let r2 = r.square();
        let (mut P, on_curve) = elligator2(&u, &r2, A);
        if !on_curve {
            continue;
        }
        let mut Q = XPoint::new(u * r2 * P.X, P.Z);
        let mut PmQ = elligator2_difference(&P.X, &Q.X, &P.Z, &u_prime, &r, A);

        let (P3, ok) = is_full_order_bob(&mut P, A);
        if ok == 0 {
            log::debug!("canonical basis: entry {} rejected (P order)", j);
            continue;
        }
        let (Q3, ok) = is_full_order_bob(&mut Q, A);
        if ok == 0 {
            log::debug!("canonical basis: entry {} rejected (Q order)", j);
            continue;
        }
        let (_, ok) = is_full_order_bob(&mut PmQ, A);
        if ok == 0 {
            log::debug!("canonical basis: entry {} rejected (P-Q order)", j);
            continue;
        }
        if P3.equals(&Q3) != 0 {
            log::debug!("canonical basis: entry {} rejected (dependent)", j);
            continue;
        }
        log::debug!("canonical basis: entry {} selected", j);
        return Ok([P, Q, PmQ]);
    }
    Err(Error::BasisNotFound)
}

/// Deterministic basis of the 3^b-torsion, as affine x coordinates of
/// {P, Q, P-Q} (see `canonical_basis_projective()`).
pub fn canonical_basis(A: &Fp2) -> Result<[Fp2; 3]> {
    Ok(normalize3(&canonical_basis_projective(A)?))
}

/// Given the affine point (xP, yP), and the x coordinates of Q and
/// P-Q, returns the y coordinate of Q as a fraction (yQ, zQ), i.e.
/// y(Q) = yQ/zQ.
pub fn recover_y(xP: &Fp2, yP: &Fp2, xQ: &Fp2, xPmQ: &Fp2, A: &Fp2) -> (Fp2, Fp2) {
    let A2 = A.mul2();
    let t = (xP * xQ + Fp2::ONE) * (xP + xQ + A2);
    let s = (xP - xQ).square() * xPmQ + A2;
    (s - t, yP.mul2())
}

/// Computes y^2 = x^3 + A*x^2 + x.
pub fn curve_rhs(x: &Fp2, A: &Fp2) -> Fp2 {
    ((x + A) * x + Fp2::ONE) * x
}
