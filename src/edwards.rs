//! Twisted Edwards model and two-dimensional Pohlig-Hellman.
//!
//! The Montgomery curve y^2 = x^3 + A*x^2 + x is birationally
//! equivalent to the twisted Edwards curve a*u^2 + v^2 = 1 + d*u^2*v^2
//! with a = A + 2 and d = A - 2, through u = x/y and v = (x-1)/(x+1).
//! Unlike the Kummer line, the Edwards model keeps the sign of points,
//! which is what the discrete logarithm computation needs.
//!
//! Points use projective coordinates (X:Y:Z), with u = X/Z and v = Y/Z;
//! the neutral point is (0:1:1). Curve parameters are not constants, so
//! operations take the curve as an explicit parameter instead of going
//! through the arithmetic operator traits.

#![allow(non_snake_case)]

use crate::curve::XPoint;
use crate::field::Fp2;
use crate::isogeny::{traverse, Walk};
use crate::params::{EXPONENT_BOB, ISOGENIES_BOB, STRATEGY_POHLIG_HELLMAN};
use crate::scalar::Scalar;

/// A twisted Edwards curve a*u^2 + v^2 = 1 + d*u^2*v^2.
#[derive(Clone, Copy, Debug)]
pub struct EdwardsCurve {
    pub(crate) a: Fp2,
    pub(crate) d: Fp2,
}

impl EdwardsCurve {

    /// Gets the Edwards curve for the Montgomery curve of coefficient A.
    pub fn from_montgomery(A: &Fp2) -> Self {
        Self { a: A + Fp2::TWO, d: A - Fp2::TWO }
    }
}

/// A point on a twisted Edwards curve, in projective coordinates.
#[derive(Clone, Copy, Debug)]
pub struct EdPoint {
    pub(crate) X: Fp2,
    pub(crate) Y: Fp2,
    pub(crate) Z: Fp2,
}

impl EdPoint {

    /// The neutral point.
    pub const NEUTRAL: Self = Self { X: Fp2::ZERO, Y: Fp2::ONE, Z: Fp2::ONE };

    /// Maps the affine Montgomery point (x, y) to the Edwards model.
    /// The point must not be a point of order 1 or 2.
    pub fn from_montgomery(x: &Fp2, y: &Fp2) -> Self {
        Self {
            X: (x + Fp2::ONE) * x,
            Y: (x - Fp2::ONE) * y,
            Z: (x + Fp2::ONE) * y,
        }
    }

    /// Maps the Montgomery point (x, y/z) to the Edwards model.
    pub fn from_montgomery_mixed(x: &Fp2, y: &Fp2, z: &Fp2) -> Self {
        Self {
            X: (x + Fp2::ONE) * x * z,
            Y: (x - Fp2::ONE) * y,
            Z: (x + Fp2::ONE) * y,
        }
    }

    /// Maps this point back to the Kummer line of the Montgomery curve.
    /// The neutral point yields the point at infinity.
    pub fn to_montgomery_x(self) -> XPoint {
        XPoint::new(self.Z + self.Y, self.Z - self.Y)
    }

    /// Adds another point to this point (in place).
    pub fn set_add(&mut self, rhs: &Self, curve: &EdwardsCurve) {
        let A = self.Z * rhs.Z;
        let B = A.square();
        let C = self.X * rhs.X;
        let D = self.Y * rhs.Y;
        let E = curve.d * C * D;
        let F = B - E;
        let G = B + E;
        let X = (self.X + self.Y) * (rhs.X + rhs.Y) - C - D;
        self.X = A * F * X;
        self.Y = A * G * (D - curve.a * C);
        self.Z = F * G;
    }

    #[inline(always)]
    pub fn add(self, rhs: &Self, curve: &EdwardsCurve) -> Self {
        let mut r = self;
        r.set_add(rhs, curve);
        r
    }

    /// Subtracts another point from this point (in place).
    #[inline]
    pub fn set_sub(&mut self, rhs: &Self, curve: &EdwardsCurve) {
        self.set_add(&rhs.neg(), curve);
    }

    /// Doubles this point (in place).
    pub fn set_double(&mut self, curve: &EdwardsCurve) {
        let B = (self.X + self.Y).square();
        let C = self.X.square();
        let D = self.Y.square();
        let E = curve.a * C;
        let F = E + D;
        let J = F - self.Z.square().mul2();
        self.X = (B - C - D) * J;
        self.Y = F * (E - D);
        self.Z = F * J;
    }

    #[inline(always)]
    pub fn double(self, curve: &EdwardsCurve) -> Self {
        let mut r = self;
        r.set_double(curve);
        r
    }

    /// Triples this point (in place).
    pub fn set_triple(&mut self, curve: &EdwardsCurve) {
        let YY = self.Y.square();
        let aXX = curve.a * self.X.square();
        let Ap = YY + aXX;
        let B = (self.Z.square().mul2() - Ap).mul2();
        let xB = aXX * B;
        let yB = YY * B;
        let AA = Ap * (YY - aXX);
        let F = AA - yB;
        let G = AA + xB;
        self.X = self.X * (yB + AA) * F;
        self.Y = self.Y * (xB - AA) * G;
        self.Z = self.Z * F * G;
    }

    #[inline(always)]
    pub fn triple(self, curve: &EdwardsCurve) -> Self {
        let mut r = self;
        r.set_triple(curve);
        r
    }

    #[inline(always)]
    pub fn set_neg(&mut self) {
        self.X.set_neg();
    }

    #[inline(always)]
    pub fn neg(self) -> Self {
        let mut r = self;
        r.set_neg();
        r
    }

    #[inline]
    pub fn set_cond(&mut self, P: &Self, ctl: u32) {
        self.X.set_cond(&P.X, ctl);
        self.Y.set_cond(&P.Y, ctl);
        self.Z.set_cond(&P.Z, ctl);
    }

    #[inline(always)]
    pub fn select(P0: &Self, P1: &Self, ctl: u32) -> Self {
        let mut P = *P0;
        P.set_cond(P1, ctl);
        P
    }

    /// Compares two points for equality.
    #[inline]
    pub fn equals(self, rhs: &Self) -> u32 {
        (self.X * rhs.Z).equals(rhs.X * self.Z)
        & (self.Y * rhs.Z).equals(rhs.Y * self.Z)
    }

    /// Compares this point with `rhs` and with `-rhs`; the two returned
    /// masks are 0xFFFFFFFF when the respective equality holds.
    #[inline]
    pub fn equal_or_negative(self, rhs: &Self) -> (u32, u32) {
        let s = rhs.X * self.Z;
        let t = rhs.Z * self.X;
        let v = (rhs.Y * self.Z).equals(rhs.Z * self.Y);
        (s.equals(t) & v, (-s).equals(t) & v)
    }

    /// Returns 0xFFFFFFFF for the neutral point, 0x00000000 otherwise.
    #[inline]
    pub fn isneutral(self) -> u32 {
        self.X.iszero() & self.Y.equals(self.Z)
    }
}

// One base-3 digit for each coordinate, as masks (a digit is 0 when
// neither of its masks is set).
struct Digits {
    c1: u32,
    c2: u32,
    d1: u32,
    d2: u32,
}

impl Digits {

    // Computes [c]P + [d]Q for the digits (c, d).
    fn combine(&self, P: &EdPoint, Q: &EdPoint, curve: &EdwardsCurve) -> EdPoint {
        let mut S = EdPoint::select(&EdPoint::NEUTRAL, P, self.c1);
        S.set_cond(&P.double(curve), self.c2);
        let mut T = EdPoint::select(&EdPoint::NEUTRAL, Q, self.d1);
        T.set_cond(&Q.double(curve), self.d2);
        S.add(&T, curve)
    }
}

struct PohligHellman {
    curve: EdwardsCurve,
    // [3^i]P and [3^i]Q for i = 0 to b-1.
    P_mul: [EdPoint; EXPONENT_BOB],
    Q_mul: [EdPoint; EXPONENT_BOB],
    // [3^(b-1)] multiples of P, Q, P+Q and P+2Q.
    table: [EdPoint; 4],
    monomial: Scalar,
    c: Scalar,
    d: Scalar,
}

impl PohligHellman {

    // Identifies a point of order dividing 3 against the table.
    fn digits(&self, R: &EdPoint) -> Digits {
        let (p0, n0) = self.table[0].equal_or_negative(R);
        let (p1, n1) = self.table[1].equal_or_negative(R);
        let (p2, n2) = self.table[2].equal_or_negative(R);
        let (p3, n3) = self.table[3].equal_or_negative(R);
        Digits {
            c1: p0 | p2 | p3,
            c2: n0 | n2 | n3,
            d1: p1 | p2 | n3,
            d2: n1 | n2 | p3,
        }
    }
}

impl Walk for PohligHellman {

    type Point = EdPoint;

    fn descend(&mut self, p: &mut EdPoint, steps: usize) {
        for _ in 0..steps {
            p.set_triple(&self.curve);
        }
    }

    fn step(&mut self, row: usize, kernel: &EdPoint,
        stack: &mut [EdPoint], indexes: &[usize])
    {
        let dg = self.digits(kernel);

        let m = self.monomial;
        let m2 = m.add(&m);
        self.c.set_add(&Scalar::select(&Scalar::ZERO, &m, dg.c1));
        self.c.set_add(&Scalar::select(&Scalar::ZERO, &m2, dg.c2));
        self.d.set_add(&Scalar::select(&Scalar::ZERO, &m, dg.d1));
        self.d.set_add(&Scalar::select(&Scalar::ZERO, &m2, dg.d2));

        // Remove the known part from the pending multiples.
        for (T, idx) in stack.iter_mut().zip(indexes.iter()) {
            let k = row - 1 + idx;
            let S = dg.combine(&self.P_mul[k], &self.Q_mul[k], &self.curve);
            T.set_sub(&S, &self.curve);
        }

        self.monomial.set_mul_small(3);
    }
}

/// Computes (c, d) such that K = [c]P + [d]Q, where P and Q are a basis
/// of the 3^b-torsion. The returned values are lower than 3^b.
///
/// The digits of c and d are recovered from the top, by reducing the
/// remainder down to order 3 and comparing it with the combinations of
/// [3^(b-1)]P and [3^(b-1)]Q; the successive multiples of K are obtained
/// along an optimal strategy. This function is constant-time.
pub fn two_dimensional_pohlig_hellman(K: &EdPoint, P: &EdPoint, Q: &EdPoint,
    curve: &EdwardsCurve) -> (Scalar, Scalar)
{
    let mut P_mul = [*P; EXPONENT_BOB];
    let mut Q_mul = [*Q; EXPONENT_BOB];
    for i in 1..EXPONENT_BOB {
        P_mul[i] = P_mul[i - 1].triple(curve);
        Q_mul[i] = Q_mul[i - 1].triple(curve);
    }
    let P3 = P_mul[EXPONENT_BOB - 1];
    let Q3 = Q_mul[EXPONENT_BOB - 1];
    let PQ3 = P3.add(&Q3, curve);
    let PQQ3 = PQ3.add(&Q3, curve);

    let mut w = PohligHellman {
        curve: *curve,
        P_mul,
        Q_mul,
        table: [P3, Q3, PQ3, PQQ3],
        monomial: Scalar::ONE,
        c: Scalar::ZERO,
        d: Scalar::ZERO,
    };
    traverse(&mut w, K, &STRATEGY_POHLIG_HELLMAN, ISOGENIES_BOB);
    (w.c, w.d)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::curve::{canonical_basis, curve_rhs, recover_y,
        two_dimensional_mul_vartime, BobCurve};
    use crate::params::{GENERATORS_BOB, MASK_BOB, SECRET_KEY_BYTES_BOB};
    use crate::xof::Xof;

    fn affine(x: &Fp2, A: &Fp2) -> EdPoint {
        let (y, ok) = curve_rhs(x, A).is_square();
        assert!(ok == 0xFFFFFFFF);
        EdPoint::from_montgomery(x, &y)
    }

    // Random integer modulo 3^b.
    fn rand_mod3b(xof: &mut Xof) -> Scalar {
        let mut buf = [0u8; SECRET_KEY_BYTES_BOB];
        xof.squeeze(&mut buf);
        buf[SECRET_KEY_BYTES_BOB - 1] &= MASK_BOB;
        let mut k = Scalar::decode(&buf).unwrap();
        if k.lt(&Scalar::POW3_B) == 0 {
            k.set_sub(&Scalar::POW3_B);
        }
        k
    }

    #[test]
    fn group_law() {
        let A = Fp2::SIX;
        let curve = EdwardsCurve::from_montgomery(&A);
        let P = affine(&GENERATORS_BOB[0], &A);
        let Q = affine(&GENERATORS_BOB[1], &A);

        let P2 = P.double(&curve);
        assert!(P2.equals(&P.add(&P, &curve)) == 0xFFFFFFFF);
        let P3 = P.triple(&curve);
        assert!(P3.equals(&P2.add(&P, &curve)) == 0xFFFFFFFF);
        assert!(P.add(&EdPoint::NEUTRAL, &curve).equals(&P) == 0xFFFFFFFF);
        assert!(P.add(&P.neg(), &curve).isneutral() == 0xFFFFFFFF);
        assert!(P.isneutral() == 0);

        let PQ = P.add(&Q, &curve);
        assert!(PQ.add(&Q.neg(), &curve).equals(&P) == 0xFFFFFFFF);
        let (e, n) = P.equal_or_negative(&P);
        assert!(e == 0xFFFFFFFF && n == 0);
        let (e, n) = P.equal_or_negative(&P.neg());
        assert!(e == 0 && n == 0xFFFFFFFF);
        let (e, n) = P.equal_or_negative(&Q);
        assert!(e == 0 && n == 0);

        // Consistency with the Kummer line.
        let bob = BobCurve::from_a(&A);
        let xP = XPoint::from_x(GENERATORS_BOB[0]);
        assert!(P.to_montgomery_x().equals(&xP) == 0xFFFFFFFF);
        assert!(P3.to_montgomery_x().equals(&xP.xtpl(&bob)) == 0xFFFFFFFF);

        // P has order 3^b.
        let mut T = P;
        for _ in 0..(EXPONENT_BOB - 1) {
            T.set_triple(&curve);
        }
        assert!(T.isneutral() == 0);
        T.set_triple(&curve);
        assert!(T.isneutral() == 0xFFFFFFFF);
    }

    #[test]
    fn mixed_map() {
        let A = Fp2::SIX;
        let mut xof = Xof::from_seed(b"edwards mixed");
        let x = GENERATORS_BOB[2];
        let (y, _) = curve_rhs(&x, &A).is_square();
        let z = Fp2::sample(&mut xof);
        let P1 = EdPoint::from_montgomery(&x, &y);
        let P2 = EdPoint::from_montgomery_mixed(&x, &(y * z), &z);
        assert!(P1.equals(&P2) == 0xFFFFFFFF);
    }

    #[test]
    fn pohlig_hellman() {
        let A = Fp2::SIX;
        let curve = EdwardsCurve::from_montgomery(&A);
        let [xP, xQ, xR] = canonical_basis(&A).unwrap();
        let (yP, ok) = curve_rhs(&xP, &A).is_square();
        assert!(ok == 0xFFFFFFFF);
        let (yQ, zQ) = recover_y(&xP, &yP, &xQ, &xR, &A);
        let P = EdPoint::from_montgomery(&xP, &yP);
        let Q = EdPoint::from_montgomery_mixed(&xQ, &yQ, &zQ);

        let mut xof = Xof::from_seed(b"pohlig-hellman");
        for i in 0..3 {
            let mut c = rand_mod3b(&mut xof);
            let mut d = rand_mod3b(&mut xof);
            match i {
                0 => d = Scalar::ZERO,
                1 => c = Scalar::ZERO,
                _ => { }
            }
            let xK = two_dimensional_mul_vartime(&xP, &xQ, &xR, &c, &d, &A).to_x();
            let K = affine(&xK, &A);
            let (c2, d2) = two_dimensional_pohlig_hellman(&K, &P, &Q, &curve);
            assert!(c2.lt(&Scalar::POW3_B) == 0xFFFFFFFF);
            assert!(d2.lt(&Scalar::POW3_B) == 0xFFFFFFFF);
            match i {
                0 => assert!(d2.iszero() == 0xFFFFFFFF && c2.iszero() == 0),
                1 => assert!(c2.iszero() == 0xFFFFFFFF && d2.iszero() == 0),
                _ => assert!(c2.iszero() == 0 && d2.iszero() == 0),
            }

            // The solution is (c, d) or (-c, -d).
            let neg = |x: &Scalar| {
                if x.iszero() != 0 { *x } else { Scalar::POW3_B.sub(x) }
            };
            let direct = c2.equals(&c) & d2.equals(&d);
            let opposite = c2.equals(&neg(&c)) & d2.equals(&neg(&d));
            assert!((direct | opposite) == 0xFFFFFFFF);

            let K2 = two_dimensional_mul_vartime(&xP, &xQ, &xR, &c2, &d2, &A);
            assert!(K2.equals_x(&xK) == 0xFFFFFFFF);
        }
    }
}
