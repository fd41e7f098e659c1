//! SIDH key exchange, for both sides.
//!
//! Alice works in the 2^a-torsion: her private key k defines the kernel
//! PA + [k]QA of a 2^a-isogeny from the starting curve (A = 6). Bob
//! does the same in the 3^b-torsion. A public key is the image of the
//! other side's generators {P, Q, P-Q} through the private isogeny,
//! given as three affine x coordinates; the codomain curve is implied
//! by the points and recovered with `curve_from_points()`. The shared
//! secret is the coefficient A of the curve reached by applying one's
//! private isogeny to the peer's curve; both sides obtain the same
//! value.
//!
//! Private keys are encoded in unsigned little-endian convention, over
//! `SECRET_KEY_BYTES_ALICE` or `SECRET_KEY_BYTES_BOB` bytes; the top
//! bits above the side mask must be zero.

#![allow(non_snake_case)]

use crate::curve::{curve_from_points, normalize3, three_point_ladder, AliceCurve, BobCurve, XPoint};
use crate::error::{Error, Result};
use crate::field::Fp2;
use crate::isogeny::{isogeny_alice, isogeny_bob};
use crate::params::{GENERATORS_ALICE, GENERATORS_BOB, MASK_ALICE, MASK_BOB,
    QUADRATIC_FIELD_BYTES, SECRET_KEY_BYTES_ALICE, SECRET_KEY_BYTES_BOB,
    SUBGROUP_ORDER_BITS_ALICE, SUBGROUP_ORDER_BITS_BOB};
use crate::scalar::Scalar;
use crate::xof::Xof;

/// Length of an encoded public key, in bytes.
pub const PUBLIC_KEY_BYTES: usize = 3 * QUADRATIC_FIELD_BYTES;

/// The coefficient of the starting curve y^2 = x^3 + 6*x^2 + x.
pub const STARTING_CURVE: Fp2 = Fp2::SIX;

/// An SIDH public key: affine x coordinates of a torsion basis
/// {P, Q, P-Q} on the public curve.
#[derive(Clone, Copy, Debug)]
pub struct PublicKey {
    pub(crate) basis: [Fp2; 3],
}

impl PublicKey {

    /// Builds a public key from affine x coordinates.
    pub fn from_basis(basis: [Fp2; 3]) -> Self {
        Self { basis }
    }

    /// Builds a public key from projective points (one inversion).
    pub fn from_points(pts: &[XPoint; 3]) -> Self {
        Self { basis: normalize3(pts) }
    }

    /// Gets the basis x coordinates {P, Q, P-Q}.
    pub fn basis(&self) -> [Fp2; 3] {
        self.basis
    }

    /// Gets the coefficient A of the curve on which the basis lies.
    pub fn curve(&self) -> Fp2 {
        let [xP, xQ, xR] = &self.basis;
        curve_from_points(xP, xQ, xR)
    }

    /// Encodes this key over `PUBLIC_KEY_BYTES` bytes.
    pub fn encode(&self) -> [u8; PUBLIC_KEY_BYTES] {
        let mut d = [0u8; PUBLIC_KEY_BYTES];
        for (i, x) in self.basis.iter().enumerate() {
            d[(i * QUADRATIC_FIELD_BYTES)..((i + 1) * QUADRATIC_FIELD_BYTES)]
                .copy_from_slice(&x.encode());
        }
        d
    }

    /// Decodes a public key. The input must have length exactly
    /// `PUBLIC_KEY_BYTES` and hold canonically encoded field elements.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != PUBLIC_KEY_BYTES {
            return Err(Error::InvalidEncoding);
        }
        let mut basis = [Fp2::ZERO; 3];
        for (x, chunk) in basis.iter_mut().zip(buf.chunks_exact(QUADRATIC_FIELD_BYTES)) {
            *x = Fp2::decode(chunk).ok_or(Error::InvalidEncoding)?;
        }
        Ok(Self { basis })
    }
}

/// An SIDH shared secret: the coefficient of the shared curve.
#[derive(Clone, Copy, Debug)]
pub struct SharedSecret(Fp2);

impl SharedSecret {

    /// Gets the shared curve coefficient.
    pub fn curve(&self) -> Fp2 {
        self.0
    }

    /// Gets the j-invariant of the shared curve.
    pub fn j_invariant(&self) -> Fp2 {
        AliceCurve::from_a(&self.0).j_invariant()
    }

    pub fn encode(&self) -> [u8; QUADRATIC_FIELD_BYTES] {
        self.0.encode()
    }

    pub fn equals(&self, rhs: &Self) -> u32 {
        self.0.equals(rhs.0)
    }
}

// Draws a private scalar of `len` bytes, with the top byte masked.
fn sample_key(xof: &mut Xof, len: usize, mask: u8) -> Scalar {
    let mut buf = [0u8; crate::scalar::SCALAR_BYTES];
    xof.squeeze(&mut buf[..len]);
    buf[len - 1] &= mask;
    Scalar::decode(&buf).unwrap_or(Scalar::ZERO)
}

fn decode_key(buf: &[u8], len: usize, mask: u8) -> Result<Scalar> {
    if buf.len() != len || (buf[len - 1] & !mask) != 0 {
        return Err(Error::InvalidEncoding);
    }
    Scalar::decode(buf).ok_or(Error::InvalidEncoding)
}

/// Alice's private key (2^a side).
#[derive(Clone, Copy, Debug)]
pub struct AlicePrivateKey {
    pub(crate) k: Scalar,
}

impl AlicePrivateKey {

    /// Generates a new private key from the provided stream.
    pub fn generate(xof: &mut Xof) -> Self {
        Self { k: sample_key(xof, SECRET_KEY_BYTES_ALICE, MASK_ALICE) }
    }

    /// Gets the secret kernel generator P + [k]Q, for the 2^a-torsion
    /// basis {P, Q, P-Q} of the curve of coefficient A.
    pub fn kernel(&self, basis: &[Fp2; 3], A: &Fp2) -> XPoint {
        let [xP, xQ, xR] = basis;
        three_point_ladder(xP, xQ, xR, &self.k, SUBGROUP_ORDER_BITS_ALICE, A)
    }

    /// Computes the public key: the image of Bob's generators through
    /// the secret isogeny.
    pub fn public_key(&self) -> PublicKey {
        let K = self.kernel(&GENERATORS_ALICE, &STARTING_CURVE);
        let mut curve = AliceCurve::from_a(&STARTING_CURVE);
        let mut pts = GENERATORS_BOB.map(XPoint::from_x);
        isogeny_alice(&mut curve, &K, &mut pts);
        PublicKey::from_points(&pts)
    }

    /// Computes the shared secret with Bob's public key.
    pub fn agree(&self, peer: &PublicKey) -> SharedSecret {
        let A = peer.curve();
        let K = self.kernel(&peer.basis, &A);
        let mut curve = AliceCurve::from_a(&A);
        isogeny_alice(&mut curve, &K, &mut []);
        SharedSecret(curve.to_a())
    }

    pub fn encode(&self) -> [u8; SECRET_KEY_BYTES_ALICE] {
        let mut d = [0u8; SECRET_KEY_BYTES_ALICE];
        d.copy_from_slice(&self.k.encode()[..SECRET_KEY_BYTES_ALICE]);
        d
    }

    /// Decodes a private key; the length must be exactly
    /// `SECRET_KEY_BYTES_ALICE` and the masked bits must be zero.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Ok(Self { k: decode_key(buf, SECRET_KEY_BYTES_ALICE, MASK_ALICE)? })
    }
}

/// Bob's private key (3^b side).
#[derive(Clone, Copy, Debug)]
pub struct BobPrivateKey {
    pub(crate) k: Scalar,
}

impl BobPrivateKey {

    /// Generates a new private key from the provided stream.
    pub fn generate(xof: &mut Xof) -> Self {
        Self { k: sample_key(xof, SECRET_KEY_BYTES_BOB, MASK_BOB) }
    }

    /// Gets the secret kernel generator P + [k]Q, for the 3^b-torsion
    /// basis {P, Q, P-Q} of the curve of coefficient A.
    pub fn kernel(&self, basis: &[Fp2; 3], A: &Fp2) -> XPoint {
        let [xP, xQ, xR] = basis;
        three_point_ladder(xP, xQ, xR, &self.k, SUBGROUP_ORDER_BITS_BOB, A)
    }

    /// Computes the public key: the image of Alice's generators through
    /// the secret isogeny.
    pub fn public_key(&self) -> PublicKey {
        let K = self.kernel(&GENERATORS_BOB, &STARTING_CURVE);
        let mut curve = BobCurve::from_a(&STARTING_CURVE);
        let mut pts = GENERATORS_ALICE.map(XPoint::from_x);
        isogeny_bob(&mut curve, &K, &mut pts);
        PublicKey::from_points(&pts)
    }

    /// Computes the shared secret with Alice's public key.
    pub fn agree(&self, peer: &PublicKey) -> SharedSecret {
        let A = peer.curve();
        let K = self.kernel(&peer.basis, &A);
        let mut curve = BobCurve::from_a(&A);
        isogeny_bob(&mut curve, &K, &mut []);
        SharedSecret(curve.to_a())
    }

    pub fn encode(&self) -> [u8; SECRET_KEY_BYTES_BOB] {
        let mut d = [0u8; SECRET_KEY_BYTES_BOB];
        d.copy_from_slice(&self.k.encode()[..SECRET_KEY_BYTES_BOB]);
        d
    }

    /// Decodes a private key; the length must be exactly
    /// `SECRET_KEY_BYTES_BOB` and the masked bits must be zero.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Ok(Self { k: decode_key(buf, SECRET_KEY_BYTES_BOB, MASK_BOB)? })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::field::Fp;

    #[test]
    fn agreement() {
        let mut xof = Xof::from_seed(b"sidh agreement");
        for _ in 0..2 {
            let ska = AlicePrivateKey::generate(&mut xof);
            let skb = BobPrivateKey::generate(&mut xof);
            let pka = ska.public_key();
            let pkb = skb.public_key();
            let ssa = ska.agree(&pkb);
            let ssb = skb.agree(&pka);
            assert!(ssa.equals(&ssb) == 0xFFFFFFFF);
            assert!(ssa.encode() == ssb.encode());
            assert!(ssa.j_invariant().equals(ssb.j_invariant()) == 0xFFFFFFFF);
            assert!(pka.curve().equals(STARTING_CURVE) == 0);
        }
    }

    #[test]
    fn deterministic_keygen() {
        let mut x1 = Xof::from_seed(b"sidh keygen");
        let mut x2 = x1.clone();
        let k1 = AlicePrivateKey::generate(&mut x1);
        let k2 = AlicePrivateKey::generate(&mut x2);
        assert!(k1.encode() == k2.encode());
        assert!(k1.public_key().encode() == k2.public_key().encode());
        let k3 = AlicePrivateKey::generate(&mut x1);
        assert!(k1.encode() != k3.encode());
    }

    #[test]
    fn encodings() {
        let mut xof = Xof::from_seed(b"sidh encodings");
        let ska = AlicePrivateKey::generate(&mut xof);
        let buf = ska.encode();
        assert!((buf[SECRET_KEY_BYTES_ALICE - 1] & !MASK_ALICE) == 0);
        let ska2 = AlicePrivateKey::decode(&buf).unwrap();
        assert!(ska2.k.equals(&ska.k) == 0xFFFFFFFF);
        let mut bad = buf;
        bad[SECRET_KEY_BYTES_ALICE - 1] |= !MASK_ALICE;
        assert!(AlicePrivateKey::decode(&bad).is_err());
        assert!(AlicePrivateKey::decode(&buf[1..]).is_err());

        let skb = BobPrivateKey::generate(&mut xof);
        let buf = skb.encode();
        assert!(BobPrivateKey::decode(&buf).unwrap().k.equals(&skb.k) == 0xFFFFFFFF);
        let mut bad = buf;
        bad[SECRET_KEY_BYTES_BOB - 1] |= 0x80;
        assert!(BobPrivateKey::decode(&bad).is_err());

        let pk = skb.public_key();
        let enc = pk.encode();
        let pk2 = PublicKey::decode(&enc).unwrap();
        assert!(pk2.encode() == enc);
        assert!(pk2.curve().equals(pk.curve()) == 0xFFFFFFFF);
        assert!(PublicKey::decode(&enc[1..]).is_err());

        // A coordinate equal to the modulus is not canonical.
        let mut bad = enc;
        let m = Fp::MODULUS;
        for i in 0..crate::params::FIELD_BYTES {
            bad[i] = (m[i >> 3] >> ((i & 7) << 3)) as u8;
        }
        assert!(PublicKey::decode(&bad).is_err());
    }
}
