//! Proof of knowledge of an SIDH private key (Alice side).
//!
//! One round works as follows. The prover draws an ephemeral 3^b-isogeny
//! psi from the starting curve E0, and pushes its secret kernel through
//! it; this yields the curve E2 = psi(E0) and the kernel of phi', the
//! image of the secret 2^a-isogeny on E2. The commitment is E2 together
//! with the image, by phi', of the canonical 3^b-torsion basis of E2;
//! the image basis implies the curve E3 = phi'(E2). The prover keeps an
//! `Insight` with the kernels of phi' and of the dual of psi.
//!
//! For a challenge bit 0, the prover reveals the decomposition (c, d)
//! of the dual kernel over the canonical basis of E2, which lets the
//! verifier walk back to E0 from E2, and to the public key curve from
//! E3. For a challenge bit 1, the prover reveals the kernel of phi',
//! which lets the verifier recompute the commitment. Revealing both
//! answers for the same commitment would leak the private key: the
//! insight must never leave the prover.

#![allow(non_snake_case)]

use crate::curve::{canonical_basis, curve_rhs, recover_y, three_point_ladder,
    two_dimensional_mul_vartime, AliceCurve, BobCurve, XPoint};
use crate::edwards::{two_dimensional_pohlig_hellman, EdPoint, EdwardsCurve};
use crate::error::{Error, Result};
use crate::field::Fp2;
use crate::isogeny::{isogeny_alice, isogeny_bob};
use crate::params::{EXPONENT_ALICE, EXPONENT_BOB, FIELD_BYTES, GENERATORS_ALICE,
    GENERATORS_BOB, MASK_BOB, QUADRATIC_FIELD_BYTES, SECRET_KEY_BYTES_BOB,
    SECURITY_BITS, SUBGROUP_ORDER_BITS_BOB};
use crate::scalar::{Scalar, SCALAR_BYTES};
use crate::sidh::{AlicePrivateKey, PublicKey, PUBLIC_KEY_BYTES, STARTING_CURVE};
use crate::xof::{shake256, Xof};

/// Length of an encoded commitment {E2, P3, Q3, P3-Q3}, in bytes.
pub const COMMITMENT_BYTES: usize = QUADRATIC_FIELD_BYTES + PUBLIC_KEY_BYTES;

/// Length of an encoded insight {ker phi', ker dual(psi), E2, P2, Q2,
/// P2-Q2}, in bytes.
pub const INSIGHT_BYTES: usize = 2 * QUADRATIC_FIELD_BYTES + COMMITMENT_BYTES;

/// Length of an encoded response, in bytes.
pub const RESPONSE_BYTES: usize = QUADRATIC_FIELD_BYTES;

/// Length of a challenge string (one bit per round), in bytes.
pub const CHALLENGE_BYTES: usize = SECURITY_BITS / 8;

/// Length of a statement (message digest and public key), in bytes.
pub const STATEMENT_BYTES: usize = CHALLENGE_BYTES + PUBLIC_KEY_BYTES;

/// Separator between the commitments and the statement in the
/// challenge hash input.
const CHALLENGE_SEPARATOR: u8 = 0xFF;

/// The public part of a round: the curve E2 and the image basis on E3.
#[derive(Clone, Copy, Debug)]
pub struct Commitment {
    pub(crate) curve: Fp2,
    pub(crate) image: PublicKey,
}

impl Commitment {

    /// Gets the coefficient of the intermediate curve E2.
    pub fn curve(&self) -> Fp2 {
        self.curve
    }

    /// Gets the image of the canonical basis of E2, on E3.
    pub fn image(&self) -> PublicKey {
        self.image
    }

    pub fn encode(&self) -> [u8; COMMITMENT_BYTES] {
        let mut d = [0u8; COMMITMENT_BYTES];
        d[..QUADRATIC_FIELD_BYTES].copy_from_slice(&self.curve.encode());
        d[QUADRATIC_FIELD_BYTES..].copy_from_slice(&self.image.encode());
        d
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != COMMITMENT_BYTES {
            return Err(Error::InvalidEncoding);
        }
        let curve = Fp2::decode(&buf[..QUADRATIC_FIELD_BYTES])
            .ok_or(Error::InvalidEncoding)?;
        let image = PublicKey::decode(&buf[QUADRATIC_FIELD_BYTES..])?;
        Ok(Self { curve, image })
    }
}

/// The secret part of a round, kept by the prover until the challenge
/// is known.
#[derive(Clone, Copy, Debug)]
pub struct Insight {
    pub(crate) kernel_phi: Fp2,
    pub(crate) kernel_psi_dual: Fp2,
    pub(crate) curve: Fp2,
    pub(crate) basis: PublicKey,
}

impl Insight {

    pub fn encode(&self) -> [u8; INSIGHT_BYTES] {
        const Q: usize = QUADRATIC_FIELD_BYTES;
        let mut d = [0u8; INSIGHT_BYTES];
        d[..Q].copy_from_slice(&self.kernel_phi.encode());
        d[Q..(2 * Q)].copy_from_slice(&self.kernel_psi_dual.encode());
        d[(2 * Q)..(3 * Q)].copy_from_slice(&self.curve.encode());
        d[(3 * Q)..].copy_from_slice(&self.basis.encode());
        d
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        const Q: usize = QUADRATIC_FIELD_BYTES;
        if buf.len() != INSIGHT_BYTES {
            return Err(Error::InvalidEncoding);
        }
        let f = |i: usize| Fp2::decode(&buf[(i * Q)..((i + 1) * Q)])
            .ok_or(Error::InvalidEncoding);
        Ok(Self {
            kernel_phi: f(0)?,
            kernel_psi_dual: f(1)?,
            curve: f(2)?,
            basis: PublicKey::decode(&buf[(3 * Q)..])?,
        })
    }
}

/// The answer to a challenge bit.
#[derive(Clone, Copy, Debug)]
pub enum Response {
    /// Challenge 0: scalars (c, d), both lower than 3^b, such that
    /// [c]P2 + [d]Q2 generates the kernel of the dual of psi.
    Decomposition(Scalar, Scalar),

    /// Challenge 1: affine x coordinate of the kernel generator of phi'.
    Kernel(Fp2),
}

impl Response {

    /// Gets the challenge bit this response answers.
    pub fn challenge(&self) -> bool {
        matches!(self, Response::Kernel(_))
    }

    /// Encodes this response. A decomposition is written as c and d in
    /// unsigned little-endian convention, each in its own half of the
    /// output, with zero padding.
    pub fn encode(&self) -> [u8; RESPONSE_BYTES] {
        static_assert!(SCALAR_BYTES <= FIELD_BYTES);
        let mut d = [0u8; RESPONSE_BYTES];
        match self {
            Response::Decomposition(c, dd) => {
                d[..SCALAR_BYTES].copy_from_slice(&c.encode());
                d[FIELD_BYTES..(FIELD_BYTES + SCALAR_BYTES)]
                    .copy_from_slice(&dd.encode());
            }
            Response::Kernel(x) => {
                d.copy_from_slice(&x.encode());
            }
        }
        d
    }

    /// Decodes a response to the challenge bit `bit`. Scalars must be
    /// lower than 3^b, with zero padding; a kernel coordinate must be
    /// canonical.
    pub fn decode(buf: &[u8], bit: bool) -> Result<Self> {
        if buf.len() != RESPONSE_BYTES {
            return Err(Error::InvalidEncoding);
        }
        if bit {
            let x = Fp2::decode(buf).ok_or(Error::InvalidEncoding)?;
            return Ok(Response::Kernel(x));
        }
        let half = |j: usize| -> Result<Scalar> {
            let h = &buf[(j * FIELD_BYTES)..((j + 1) * FIELD_BYTES)];
            if h[SCALAR_BYTES..].iter().any(|b| *b != 0) {
                return Err(Error::InvalidEncoding);
            }
            let s = Scalar::decode(&h[..SCALAR_BYTES])
                .ok_or(Error::InvalidEncoding)?;
            if s.lt(&Scalar::POW3_B) == 0 {
                return Err(Error::InvalidEncoding);
            }
            Ok(s)
        };
        Ok(Response::Decomposition(half(0)?, half(1)?))
    }
}

// 0xFFFFFFFF if a == b, 0x00000000 otherwise.
#[inline(always)]
fn eq_u8(a: u8, b: u8) -> u32 {
    let x = (a ^ b) as u32;
    ((x | x.wrapping_neg()) >> 31).wrapping_sub(1)
}

/// Draws an ephemeral scalar k uniformly below 3^(b-1), along with a
/// selector in 0..4 which picks the shape of the ephemeral kernel.
pub(crate) fn sample_ephemeral(xof: &mut Xof) -> (Scalar, u8) {
    let mut buf = [0u8; SECRET_KEY_BYTES_BOB + 1];
    loop {
        xof.squeeze(&mut buf);
        buf[SECRET_KEY_BYTES_BOB - 1] &= MASK_BOB;
        let sel = buf[SECRET_KEY_BYTES_BOB] & 0x03;
        if let Some(k) = Scalar::decode(&buf[..SECRET_KEY_BYTES_BOB]) {
            if k.lt(&Scalar::POW3_B_MINUS_1) != 0 {
                return (k, sel);
            }
        }
    }
}

/// Computes a commitment for a new round, and the matching insight.
///
/// The ephemeral kernel is P + [t*3^(b-1) + k]Q for a selector t in
/// {0, 1, 2}, or Q + [3k]P for selector 3, with {P, Q} the public
/// 3^b-torsion generators; the choice is made with constant-time
/// selections. The canonical basis search works on E2, which is
/// published.
pub fn commit(sk: &AlicePrivateKey, xof: &mut Xof) -> Result<(Commitment, Insight)> {
    let (k, sel) = sample_ephemeral(xof);
    let t1 = Scalar::POW3_B_MINUS_1.add(&k);
    let t2 = Scalar::POW3_B_MINUS_1.add(&t1);
    let k3 = k.mul_small(3);
    let mut s = k;
    s.set_cond(&t1, eq_u8(sel, 1));
    s.set_cond(&t2, eq_u8(sel, 2));
    s.set_cond(&k3, eq_u8(sel, 3));
    let [mut xP, mut xQ, xR] = GENERATORS_BOB;
    Fp2::cswap(&mut xP, &mut xQ, eq_u8(sel, 3));

    // The image of the second basis point generates the dual kernel.
    let K_psi = three_point_ladder(&xP, &xQ, &xR, &s,
        SUBGROUP_ORDER_BITS_BOB, &STARTING_CURVE);
    let K_phi = sk.kernel(&GENERATORS_ALICE, &STARTING_CURVE);
    let mut curve = BobCurve::from_a(&STARTING_CURVE);
    let mut pts = [K_phi, XPoint::from_x(xQ)];
    isogeny_bob(&mut curve, &K_psi, &mut pts);
    let mut zz = [pts[0].Z, pts[1].Z];
    Fp2::batch_invert(&mut zz);
    let kernel_phi = pts[0].X * zz[0];
    let kernel_psi_dual = pts[1].X * zz[1];

    let A = curve.to_a();
    let basis = canonical_basis(&A)?;
    let mut image = basis.map(XPoint::from_x);
    isogeny_alice(&mut AliceCurve::from_a(&A), &XPoint::from_x(kernel_phi), &mut image);

    Ok((
        Commitment { curve: A, image: PublicKey::from_points(&image) },
        Insight {
            kernel_phi,
            kernel_psi_dual,
            curve: A,
            basis: PublicKey::from_basis(basis),
        },
    ))
}

/// Builds the statement bound to a challenge: the SHAKE256 digest of
/// the message (truncated to `CHALLENGE_BYTES`), then the encoded
/// public key.
pub fn statement(message: &[u8], pk: &PublicKey) -> [u8; STATEMENT_BYTES] {
    let mut st = [0u8; STATEMENT_BYTES];
    shake256(&[message], &mut st[..CHALLENGE_BYTES]);
    st[CHALLENGE_BYTES..].copy_from_slice(&pk.encode());
    st
}

/// Computes the challenge string over the concatenated encoded
/// commitments and a statement. Round `i` uses bit `i` (see
/// `challenge_bit()`).
pub fn challenge(commitments: &[u8], statement: &[u8]) -> [u8; CHALLENGE_BYTES] {
    let mut ch = [0u8; CHALLENGE_BYTES];
    shake256(&[commitments, &[CHALLENGE_SEPARATOR], statement], &mut ch);
    ch
}

/// Gets the challenge bit for round `i`.
#[inline(always)]
pub fn challenge_bit(ch: &[u8; CHALLENGE_BYTES], i: usize) -> bool {
    ((ch[i >> 3] >> (i & 7)) & 1) != 0
}

/// Decomposes the point of x coordinate `xK` over the 3^b-torsion basis
/// {P, Q, P-Q} of the curve of coefficient A: returns (c, d), lower than
/// 3^b, such that x([c]P + [d]Q) = xK. This fails with
/// `Error::NotSquare` if x(P) or xK is not the x coordinate of a point
/// of the curve over GF(p^2).
pub fn decompose(xK: &Fp2, basis: &[Fp2; 3], A: &Fp2) -> Result<(Scalar, Scalar)> {
    let [xP, xQ, xR] = basis;
    let (yP, ok) = curve_rhs(xP, A).is_square();
    if ok == 0 {
        return Err(Error::NotSquare);
    }
    let (yQ, zQ) = recover_y(xP, &yP, xQ, xR, A);
    let (yK, ok) = curve_rhs(xK, A).is_square();
    if ok == 0 {
        return Err(Error::NotSquare);
    }
    let P = EdPoint::from_montgomery(xP, &yP);
    let Q = EdPoint::from_montgomery_mixed(xQ, &yQ, &zQ);
    let K = EdPoint::from_montgomery(xK, &yK);
    Ok(two_dimensional_pohlig_hellman(&K, &P, &Q, &EdwardsCurve::from_montgomery(A)))
}

/// Answers the challenge bit `bit` for a round.
pub fn respond(insight: &Insight, bit: bool) -> Result<Response> {
    if bit {
        return Ok(Response::Kernel(insight.kernel_phi));
    }
    let (c, d) = decompose(&insight.kernel_psi_dual,
        &insight.basis.basis, &insight.curve)?;
    Ok(Response::Decomposition(c, d))
}

// Checks that P has order exactly 3^b.
fn has_order_3b(P: &XPoint, curve: &BobCurve) -> bool {
    let T = P.xtpl_n(EXPONENT_BOB - 1, curve);
    T.is_infinity() == 0 && T.xtpl(curve).is_infinity() != 0
}

// Checks that P has order exactly 2^a.
fn has_order_2a(P: &XPoint, curve: &AliceCurve) -> bool {
    let T = P.xdbl_n(EXPONENT_ALICE - 1, curve);
    T.is_infinity() == 0 && T.xdbl(curve).is_infinity() != 0
}

// Walks from the curve of coefficient `from`, along the 3^b-isogeny of
// kernel [c]P + [d]Q, and checks that the codomain is `to`.
fn check_dual_walk(basis: &[Fp2; 3], c: &Scalar, d: &Scalar,
    from: &Fp2, to: &Fp2) -> bool
{
    let [xP, xQ, xR] = basis;
    let K = two_dimensional_mul_vartime(xP, xQ, xR, c, d, from);
    let mut curve = BobCurve::from_a(from);
    if !has_order_3b(&K, &curve) {
        return false;
    }
    isogeny_bob(&mut curve, &K, &mut []);
    curve.equals_a(to) != 0
}

/// Verifies one round: `response` must answer the challenge bit `bit`
/// for `commitment`, with regard to the public key `pk`. This function
/// is not constant-time (all inputs are public).
pub fn verify(commitment: &Commitment, response: &Response,
    pk: &PublicKey, bit: bool) -> Result<()>
{
    let E2 = commitment.curve;
    let basis2 = canonical_basis(&E2)?;
    let E3 = commitment.image.curve();

    match (response, bit) {
        (Response::Decomposition(c, d), false) => {
            if !check_dual_walk(&basis2, c, d, &E2, &STARTING_CURVE) {
                log::debug!("pok: dual kernel on E2 does not lead to E0");
                return Err(Error::InvalidProof);
            }
            if !check_dual_walk(&commitment.image.basis, c, d, &E3, &pk.curve()) {
                log::debug!("pok: dual kernel on E3 does not lead to the public curve");
                return Err(Error::InvalidProof);
            }
            Ok(())
        }
        (Response::Kernel(x), true) => {
            let K = XPoint::from_x(*x);
            let mut curve = AliceCurve::from_a(&E2);
            if !has_order_2a(&K, &curve) {
                log::debug!("pok: revealed kernel is not of order 2^a");
                return Err(Error::InvalidProof);
            }
            let mut pts = basis2.map(XPoint::from_x);
            isogeny_alice(&mut curve, &K, &mut pts);
            if curve.equals_a(&E3) == 0 {
                log::debug!("pok: revealed kernel does not lead to E3");
                return Err(Error::InvalidProof);
            }
            let mut r = 0xFFFFFFFF;
            for (P, x) in pts.iter().zip(commitment.image.basis.iter()) {
                r &= P.equals_x(x);
            }
            if r == 0 {
                log::debug!("pok: image basis mismatch");
                return Err(Error::InvalidProof);
            }
            Ok(())
        }
        _ => {
            log::debug!("pok: response does not match the challenge bit");
            Err(Error::InvalidProof)
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn setup(seed: &[u8]) -> (AlicePrivateKey, PublicKey, Xof) {
        let mut xof = Xof::from_seed(seed);
        let sk = AlicePrivateKey::generate(&mut xof);
        let pk = sk.public_key();
        (sk, pk, xof)
    }

    #[test]
    fn ephemeral_sampling() {
        let mut xof = Xof::from_seed(b"pok ephemeral");
        let mut seen = [false; 4];
        for _ in 0..64 {
            let (k, sel) = sample_ephemeral(&mut xof);
            assert!(k.lt(&Scalar::POW3_B_MINUS_1) == 0xFFFFFFFF);
            assert!(sel < 4);
            seen[sel as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert!(eq_u8(3, 3) == 0xFFFFFFFF);
        assert!(eq_u8(3, 2) == 0);
        assert!(eq_u8(0, 0x80) == 0);
    }

    #[test]
    fn both_challenges() {
        let (sk, pk, mut xof) = setup(b"pok both challenges");
        for _ in 0..2 {
            let (cm, ins) = commit(&sk, &mut xof).unwrap();
            let r0 = respond(&ins, false).unwrap();
            let r1 = respond(&ins, true).unwrap();
            assert!(!r0.challenge());
            assert!(r1.challenge());
            assert!(verify(&cm, &r0, &pk, false).is_ok());
            assert!(verify(&cm, &r1, &pk, true).is_ok());

            // Responses go through their encoding.
            let r0 = Response::decode(&r0.encode(), false).unwrap();
            let r1 = Response::decode(&r1.encode(), true).unwrap();
            let cm = Commitment::decode(&cm.encode()).unwrap();
            assert!(verify(&cm, &r0, &pk, false).is_ok());
            assert!(verify(&cm, &r1, &pk, true).is_ok());

            // Answers to the wrong bit are rejected.
            assert!(verify(&cm, &r0, &pk, true) == Err(Error::InvalidProof));
            assert!(verify(&cm, &r1, &pk, false) == Err(Error::InvalidProof));
        }
    }

    #[test]
    fn tampered() {
        let (sk, pk, mut xof) = setup(b"pok tampered");
        let (cm, ins) = commit(&sk, &mut xof).unwrap();

        if let Response::Decomposition(c, d) = respond(&ins, false).unwrap() {
            let c2 = c.add(&Scalar::ONE);
            let bad = Response::Decomposition(c2, d);
            assert!(verify(&cm, &bad, &pk, false) == Err(Error::InvalidProof));
        } else {
            panic!("expected a decomposition");
        }

        let bad = Response::Kernel(ins.kernel_psi_dual);
        assert!(verify(&cm, &bad, &pk, true) == Err(Error::InvalidProof));

        // Another key: the dual walk from E3 misses the public curve.
        let (_, pk2, _) = setup(b"pok tampered, other key");
        let r0 = respond(&ins, false).unwrap();
        assert!(verify(&cm, &r0, &pk2, false) == Err(Error::InvalidProof));
    }

    #[test]
    fn decomposition() {
        let (sk, _, mut xof) = setup(b"pok decomposition");
        let (_, ins) = commit(&sk, &mut xof).unwrap();
        let (c, d) = decompose(&ins.kernel_psi_dual, &ins.basis.basis, &ins.curve).unwrap();
        let [xP, xQ, xR] = ins.basis.basis;
        let K = two_dimensional_mul_vartime(&xP, &xQ, &xR, &c, &d, &ins.curve);
        assert!(K.equals_x(&ins.kernel_psi_dual) == 0xFFFFFFFF);

        // An x coordinate on the quadratic twist has no point.
        let mut x = Fp2::ONE;
        loop {
            if curve_rhs(&x, &ins.curve).is_square().1 == 0 {
                break;
            }
            x = x + Fp2::ONE;
        }
        assert!(matches!(decompose(&x, &ins.basis.basis, &ins.curve),
            Err(Error::NotSquare)));
    }

    #[test]
    fn encodings() {
        let (sk, _, mut xof) = setup(b"pok encodings");
        let (cm, ins) = commit(&sk, &mut xof).unwrap();

        let buf = cm.encode();
        assert!(Commitment::decode(&buf).unwrap().encode() == buf);
        assert!(Commitment::decode(&buf[1..]).is_err());
        let buf = ins.encode();
        assert!(Insight::decode(&buf).unwrap().encode()[..] == buf[..]);
        assert!(Insight::decode(&buf[..INSIGHT_BYTES - 1]).is_err());

        // Scalars must be lower than 3^b, and padding must be zero.
        let mut buf = [0u8; RESPONSE_BYTES];
        buf[..SCALAR_BYTES].copy_from_slice(&Scalar::POW3_B.encode());
        assert!(matches!(Response::decode(&buf, false), Err(Error::InvalidEncoding)));
        let mut buf = [0u8; RESPONSE_BYTES];
        buf[FIELD_BYTES - 1] = 1;
        assert!(Response::decode(&buf, false).is_err());
        assert!(Response::decode(&buf, true).is_ok());
        assert!(Response::decode(&[0xFFu8; RESPONSE_BYTES], true).is_err());
    }

    #[test]
    fn challenges() {
        let (_, pk, _) = setup(b"pok challenges");
        let st1 = statement(b"message 1", &pk);
        let st2 = statement(b"message 2", &pk);
        assert!(st1[CHALLENGE_BYTES..] == pk.encode()[..]);
        let cm = [0x5Au8; COMMITMENT_BYTES];
        let c1 = challenge(&cm, &st1);
        assert!(c1 == challenge(&cm, &st1));
        assert!(c1 != challenge(&cm, &st2));
        assert!(c1 != challenge(&cm[1..], &st1));

        let mut n = 0;
        for i in 0..SECURITY_BITS {
            n += challenge_bit(&c1, i) as usize;
        }
        assert!(n > 0 && n < SECURITY_BITS);
    }
}
