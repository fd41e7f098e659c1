//! Isogenies between Montgomery curves.
//!
//! This module implements the small-degree isogeny formulas (degree 2,
//! 3 and 4) on the Kummer line, and their composition into isogenies of
//! degree 2^a (Alice) and 3^b (Bob). Long chains are computed along an
//! optimal strategy: the kernel generator is repeatedly multiplied down
//! to the next small-order kernel, and the intermediate multiples are
//! kept on a stack so that later kernels are obtained by pushing them
//! through the isogenies computed so far. A strategy is a precomputed
//! sequence of step lengths (one per internal node of the traversal
//! tree).
//!
//! The traversal itself is implemented once, in `traverse()`, over the
//! `Walk` trait; the trait implementations provide the multiplication
//! and the per-leaf processing (isogeny computation and evaluation of
//! the tracked points, or Pohlig-Hellman digit extraction).

#![allow(non_snake_case)]

use crate::curve::{AliceCurve, BobCurve, XPoint};
use crate::field::Fp2;
use crate::params::{EXPONENT_ALICE, ISOGENIES_ALICE, ISOGENIES_BOB, STRATEGY_ALICE, STRATEGY_BOB};

/// Capacity of the traversal stack; every shipped strategy stays well
/// below it.
pub(crate) const STACK_DEPTH: usize = 16;

/// A strategy-driven walk.
///
/// Points of type `Point` are multiples of the initial kernel generator
/// (or their images through the isogenies computed so far). A point at
/// index `i` has been multiplied by l^i, where l is the degree of one
/// step (4 for Alice, 3 for Bob).
pub(crate) trait Walk {

    type Point: Copy;

    /// Multiplies a point by l^steps.
    fn descend(&mut self, p: &mut Self::Point, steps: usize);

    /// Hook invoked once, when the first leaf is reached and before it
    /// is processed.
    fn prelude(&mut self, _kernel: &mut Self::Point, _stack: &mut [Self::Point]) { }

    /// Processes the leaf of row `row` (1-based). The stacked points
    /// and their indexes are provided; the stack is empty for the last
    /// row.
    fn step(&mut self, row: usize, kernel: &Self::Point,
        stack: &mut [Self::Point], indexes: &[usize]);
}

/// Runs a walk of `n` steps along the provided strategy, which must
/// contain `n - 1` entries. The strategy is public; the running time
/// does not depend on the point values.
pub(crate) fn traverse<W: Walk>(w: &mut W, kernel: &W::Point, strategy: &[u8], n: usize) {
    let mut stack = [*kernel; STACK_DEPTH];
    let mut indexes = [0usize; STACK_DEPTH];
    let mut depth = 0;
    let mut pos = 0;
    let mut index = 0;
    let mut R = *kernel;

    for row in 1..n {
        while index < n - row {
            stack[depth] = R;
            indexes[depth] = index;
            depth += 1;
            let s = strategy[pos] as usize;
            pos += 1;
            w.descend(&mut R, s);
            index += s;
        }
        if row == 1 {
            w.prelude(&mut R, &mut stack[..depth]);
        }
        w.step(row, &R, &mut stack[..depth], &indexes[..depth]);

        depth -= 1;
        R = stack[depth];
        index = indexes[depth];
    }
    w.step(n, &R, &mut [], &[]);
}

/// Computes the codomain of the 2-isogeny of kernel `S` (S must have
/// order 2 and not be (0,0)).
pub fn two_isogeny(S: &XPoint) -> AliceCurve {
    let C24 = S.Z.square();
    AliceCurve { A24p: C24 - S.X.square(), C24 }
}

/// Evaluates the 2-isogeny of kernel `S` on point `P`.
pub fn two_isogeny_eval(P: &XPoint, S: &XPoint) -> XPoint {
    let t0 = (S.X + S.Z) * (P.X - P.Z);
    let t1 = (S.X - S.Z) * (P.X + P.Z);
    XPoint::new((t0 + t1) * P.X, (t0 - t1) * P.Z)
}

/// A 4-isogeny, as its three evaluation coefficients.
#[derive(Clone, Copy, Debug)]
pub struct FourIsogeny {
    c0: Fp2,
    c1: Fp2,
    c2: Fp2,
}

impl FourIsogeny {

    /// Computes the 4-isogeny of kernel `K` (order 4, with [2]K not
    /// equal to (0,0)); the codomain curve is returned along with the
    /// isogeny.
    pub fn new(K: &XPoint) -> (AliceCurve, Self) {
        let c1 = K.X - K.Z;
        let c2 = K.X + K.Z;
        let c0 = K.Z.square().mul2();
        let C24 = c0.square();
        let c0 = c0.mul2();
        let A24p = K.X.square().mul2().square();
        (AliceCurve { A24p, C24 }, Self { c0, c1, c2 })
    }

    /// Evaluates this isogeny on a point, in place.
    pub fn set_eval(&self, P: &mut XPoint) {
        let t0 = P.X + P.Z;
        let t1 = P.X - P.Z;
        let X = t0 * self.c1;
        let Z = t1 * self.c2;
        let t0 = self.c0 * (t0 * t1);
        let t1 = (X + Z).square();
        let Z = (X - Z).square();
        P.X = (t1 + t0) * t1;
        P.Z = (Z - t0) * Z;
    }

    #[inline(always)]
    pub fn eval(&self, P: &XPoint) -> XPoint {
        let mut r = *P;
        self.set_eval(&mut r);
        r
    }
}

/// A 3-isogeny, as its two evaluation coefficients.
#[derive(Clone, Copy, Debug)]
pub struct ThreeIsogeny {
    c0: Fp2,
    c1: Fp2,
}

impl ThreeIsogeny {

    /// Computes the 3-isogeny of kernel `K` (order 3); the codomain
    /// curve is returned along with the isogeny.
    pub fn new(K: &XPoint) -> (BobCurve, Self) {
        let c0 = K.X - K.Z;
        let t0 = c0.square();
        let c1 = K.X + K.Z;
        let t1 = c1.square();
        let t3 = K.X.mul2().square();
        let t2 = t3 - t0;
        let t3 = t3 - t1;
        let t4 = t1 + (t0 + t3).mul2();
        let A24m = t2 * t4;
        let t4 = t0 + (t1 + t2).mul2();
        let A24p = t3 * t4;
        (BobCurve { A24p, A24m }, Self { c0, c1 })
    }

    /// Evaluates this isogeny on a point, in place.
    pub fn set_eval(&self, P: &mut XPoint) {
        let t0 = self.c0 * (P.X + P.Z);
        let t1 = self.c1 * (P.X - P.Z);
        let t2 = (t0 + t1).square();
        let t0 = (t1 - t0).square();
        P.X *= t2;
        P.Z *= t0;
    }

    #[inline(always)]
    pub fn eval(&self, P: &XPoint) -> XPoint {
        let mut r = *P;
        self.set_eval(&mut r);
        r
    }
}

struct AliceWalk<'a> {
    curve: AliceCurve,
    points: &'a mut [XPoint],
}

impl Walk for AliceWalk<'_> {

    type Point = XPoint;

    fn descend(&mut self, p: &mut XPoint, steps: usize) {
        p.set_xdbl_n(2 * steps, &self.curve);
    }

    // With an odd exponent, the chain starts with a single 2-isogeny.
    fn prelude(&mut self, kernel: &mut XPoint, stack: &mut [XPoint]) {
        if (EXPONENT_ALICE & 1) == 0 {
            return;
        }
        let S = kernel.xdbl_n(2, &self.curve);
        self.curve = two_isogeny(&S);
        for P in stack.iter_mut().chain(self.points.iter_mut()) {
            *P = two_isogeny_eval(P, &S);
        }
        *kernel = two_isogeny_eval(kernel, &S);
    }

    fn step(&mut self, _row: usize, kernel: &XPoint,
        stack: &mut [XPoint], _indexes: &[usize])
    {
        let (curve, phi) = FourIsogeny::new(kernel);
        self.curve = curve;
        for P in stack.iter_mut().chain(self.points.iter_mut()) {
            phi.set_eval(P);
        }
    }
}

struct BobWalk<'a> {
    curve: BobCurve,
    points: &'a mut [XPoint],
}

impl Walk for BobWalk<'_> {

    type Point = XPoint;

    fn descend(&mut self, p: &mut XPoint, steps: usize) {
        p.set_xtpl_n(steps, &self.curve);
    }

    fn step(&mut self, _row: usize, kernel: &XPoint,
        stack: &mut [XPoint], _indexes: &[usize])
    {
        let (curve, phi) = ThreeIsogeny::new(kernel);
        self.curve = curve;
        for P in stack.iter_mut().chain(self.points.iter_mut()) {
            phi.set_eval(P);
        }
    }
}

/// Computes the 2^a-isogeny of kernel generated by `K` (of order
/// exactly 2^a) from the provided curve. The curve is replaced with the
/// codomain, and all points in `points` are replaced with their images
/// (`points` may be empty). This function is constant-time.
pub fn isogeny_alice(curve: &mut AliceCurve, K: &XPoint, points: &mut [XPoint]) {
    let mut w = AliceWalk { curve: *curve, points };
    traverse(&mut w, K, &STRATEGY_ALICE, ISOGENIES_ALICE);
    *curve = w.curve;
}

/// Computes the 3^b-isogeny of kernel generated by `K` (of order
/// exactly 3^b) from the provided curve. The curve is replaced with the
/// codomain, and all points in `points` are replaced with their images
/// (`points` may be empty). This function is constant-time.
pub fn isogeny_bob(curve: &mut BobCurve, K: &XPoint, points: &mut [XPoint]) {
    let mut w = BobWalk { curve: *curve, points };
    traverse(&mut w, K, &STRATEGY_BOB, ISOGENIES_BOB);
    *curve = w.curve;
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::curve::{curve_from_points, normalize3, three_point_ladder};
    use crate::params::{EXPONENT_BOB, GENERATORS_ALICE, GENERATORS_BOB,
        STRATEGY_POHLIG_HELLMAN, SUBGROUP_ORDER_BITS_ALICE, SUBGROUP_ORDER_BITS_BOB};
    use crate::scalar::Scalar;
    use crate::xof::Xof;

    // Walk over bare indexes, checking the traversal bookkeeping.
    struct Shadow {
        n: usize,
        descents: usize,
        rows: usize,
        max_depth: usize,
    }

    impl Walk for Shadow {
        type Point = usize;

        fn descend(&mut self, p: &mut usize, steps: usize) {
            self.descents += 1;
            *p += steps;
        }

        fn step(&mut self, row: usize, kernel: &usize,
            stack: &mut [usize], indexes: &[usize])
        {
            // The leaf of row r sits at depth n - r.
            assert!(*kernel == self.n - row);
            assert!(stack.len() == indexes.len());
            for i in 0..stack.len() {
                assert!(stack[i] == indexes[i]);
            }
            self.rows += 1;
            self.max_depth = core::cmp::max(self.max_depth, stack.len());
        }
    }

    fn check_strategy(strategy: &[u8], n: usize) {
        let mut sh = Shadow { n, descents: 0, rows: 0, max_depth: 0 };
        traverse(&mut sh, &0, strategy, n);
        assert!(sh.descents == strategy.len());
        assert!(sh.rows == n);
        assert!(sh.max_depth <= STACK_DEPTH);
    }

    #[test]
    fn strategies() {
        check_strategy(&STRATEGY_ALICE, ISOGENIES_ALICE);
        check_strategy(&STRATEGY_BOB, ISOGENIES_BOB);
        check_strategy(&STRATEGY_POHLIG_HELLMAN, ISOGENIES_BOB);
    }

    #[test]
    fn kernel_collapse() {
        let A = Fp2::SIX;

        // 4-isogeny from [2^(a-2)]PA.
        let curve = AliceCurve::from_a(&A);
        let PA = XPoint::from_x(GENERATORS_ALICE[0]);
        let K4 = PA.xdbl_n(EXPONENT_ALICE - 2, &curve);
        let (img, phi) = FourIsogeny::new(&K4);
        assert!(phi.eval(&K4).is_infinity() == 0xFFFFFFFF);
        let T = phi.eval(&PA).xdbl_n(EXPONENT_ALICE - 3, &img);
        assert!(T.is_infinity() == 0);
        assert!(T.xdbl(&img).is_infinity() == 0xFFFFFFFF);

        // 2-isogeny from [2^(a-1)]PA.
        let S = K4.xdbl(&curve);
        let img = two_isogeny(&S);
        assert!(two_isogeny_eval(&S, &S).is_infinity() == 0xFFFFFFFF);
        let T = two_isogeny_eval(&PA, &S).xdbl_n(EXPONENT_ALICE - 2, &img);
        assert!(T.is_infinity() == 0);
        assert!(T.xdbl(&img).is_infinity() == 0xFFFFFFFF);

        // 3-isogeny from [3^(b-1)]PB.
        let curve = BobCurve::from_a(&A);
        let PB = XPoint::from_x(GENERATORS_BOB[0]);
        let K3 = PB.xtpl_n(EXPONENT_BOB - 1, &curve);
        let (img, phi) = ThreeIsogeny::new(&K3);
        assert!(phi.eval(&K3).is_infinity() == 0xFFFFFFFF);
        let T = phi.eval(&PB).xtpl_n(EXPONENT_BOB - 2, &img);
        assert!(T.is_infinity() == 0);
        assert!(T.xtpl(&img).is_infinity() == 0xFFFFFFFF);
    }

    #[test]
    fn chain_alice() {
        let A = Fp2::SIX;
        let mut xof = Xof::from_seed(b"isogeny chain alice");
        let mut buf = [0u8; crate::params::SECRET_KEY_BYTES_ALICE];
        xof.squeeze(&mut buf);
        let k = Scalar::decode(&buf).unwrap();
        let [xP, xQ, xR] = GENERATORS_ALICE;
        let K = three_point_ladder(&xP, &xQ, &xR, &k, SUBGROUP_ORDER_BITS_ALICE, &A);

        let mut pts = GENERATORS_BOB.map(XPoint::from_x);
        let mut c1 = AliceCurve::from_a(&A);
        isogeny_alice(&mut c1, &K, &mut pts);
        let mut c2 = AliceCurve::from_a(&A);
        isogeny_alice(&mut c2, &K, &mut []);

        let A1 = c1.to_a();
        assert!(c2.equals_a(&A1) == 0xFFFFFFFF);
        assert!(AliceCurve::from_a(&A).equals_a(&A1) == 0);
        let [x0, x1, x2] = normalize3(&pts);
        assert!(curve_from_points(&x0, &x1, &x2).equals(A1) == 0xFFFFFFFF);

        // The image of the kernel is the point at infinity.
        let mut c3 = AliceCurve::from_a(&A);
        let mut kk = [K];
        isogeny_alice(&mut c3, &K, &mut kk);
        assert!(kk[0].is_infinity() == 0xFFFFFFFF);
    }

    #[test]
    fn chain_bob() {
        let A = Fp2::SIX;
        let mut xof = Xof::from_seed(b"isogeny chain bob");
        let mut buf = [0u8; crate::params::SECRET_KEY_BYTES_BOB];
        xof.squeeze(&mut buf);
        buf[buf.len() - 1] &= crate::params::MASK_BOB;
        let k = Scalar::decode(&buf).unwrap();
        let [xP, xQ, xR] = GENERATORS_BOB;
        let K = three_point_ladder(&xP, &xQ, &xR, &k, SUBGROUP_ORDER_BITS_BOB, &A);

        let mut pts = GENERATORS_ALICE.map(XPoint::from_x);
        let mut c1 = BobCurve::from_a(&A);
        isogeny_bob(&mut c1, &K, &mut pts);
        let mut c2 = BobCurve::from_a(&A);
        isogeny_bob(&mut c2, &K, &mut []);

        let A1 = c1.to_a();
        assert!(c2.equals_a(&A1) == 0xFFFFFFFF);
        let [x0, x1, x2] = normalize3(&pts);
        assert!(curve_from_points(&x0, &x1, &x2).equals(A1) == 0xFFFFFFFF);

        // Images of the 2^a-torsion keep their full order.
        let img = c1.to_alice();
        let T = XPoint::from_x(x0).xdbl_n(EXPONENT_ALICE - 1, &img);
        assert!(T.is_infinity() == 0);
        assert!(T.xdbl(&img).is_infinity() == 0xFFFFFFFF);
    }
}
