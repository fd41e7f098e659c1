//! Signatures from the proof of knowledge (Fiat-Shamir transform).
//!
//! A signature consists of `SECURITY_BITS` independent proof rounds
//! over the same key pair. All commitments are computed first; the
//! challenge bits are then obtained by hashing the concatenated encoded
//! commitments with the statement (message digest and public key), and
//! each round is answered with the response to its bit.
//!
//! Encoded signature layout: all commitments in round order, then all
//! responses in round order. The total length is `SIGNATURE_BYTES`.
//!
//! Each round draws its randomness from its own stream, forked from
//! the caller's stream before any round starts; with the `parallel`
//! feature, rounds run on the rayon thread pool and the output is
//! identical to the sequential one.

use crate::error::{Error, Result};
use crate::params::{SECRET_KEY_BYTES_ALICE, SECURITY_BITS};
use crate::pok::{self, challenge, challenge_bit, commit, respond, statement,
    Commitment, Insight, Response, COMMITMENT_BYTES, RESPONSE_BYTES};
use crate::sidh::{AlicePrivateKey, PublicKey};
use crate::xof::Xof;
use crate::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Length of an encoded signing key, in bytes.
pub const SECRET_KEY_BYTES: usize = SECRET_KEY_BYTES_ALICE;

/// Length of an encoded signature, in bytes.
pub const SIGNATURE_BYTES: usize = (COMMITMENT_BYTES + RESPONSE_BYTES) * SECURITY_BITS;

const COMMITMENTS_LEN: usize = COMMITMENT_BYTES * SECURITY_BITS;

/// An encoded signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {

    /// Gets the encoded signature.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Takes an encoded signature. Only the length is checked at this
    /// point; the contents are validated by `verify()`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() != SIGNATURE_BYTES {
            return Err(Error::InvalidEncoding);
        }
        Ok(Self(buf.to_vec()))
    }

    fn commitment_bytes(&self, i: usize) -> &[u8] {
        &self.0[(i * COMMITMENT_BYTES)..((i + 1) * COMMITMENT_BYTES)]
    }

    fn response_bytes(&self, i: usize) -> &[u8] {
        let off = COMMITMENTS_LEN + i * RESPONSE_BYTES;
        &self.0[off..(off + RESPONSE_BYTES)]
    }
}

/// Generates a new key pair from the provided stream.
pub fn keygen(xof: &mut Xof) -> (AlicePrivateKey, PublicKey) {
    let sk = AlicePrivateKey::generate(xof);
    let pk = sk.public_key();
    (sk, pk)
}

#[cfg(not(feature = "parallel"))]
fn commit_rounds(sk: &AlicePrivateKey, streams: &mut [Xof])
    -> Result<Vec<(Commitment, Insight)>>
{
    streams.iter_mut().map(|xof| commit(sk, xof)).collect()
}

#[cfg(feature = "parallel")]
fn commit_rounds(sk: &AlicePrivateKey, streams: &mut [Xof])
    -> Result<Vec<(Commitment, Insight)>>
{
    streams.par_iter_mut().map(|xof| commit(sk, xof)).collect()
}

#[cfg(not(feature = "parallel"))]
fn respond_rounds(rounds: &[(Commitment, Insight)], ch: &[u8; pok::CHALLENGE_BYTES])
    -> Result<Vec<Response>>
{
    rounds.iter().enumerate()
        .map(|(i, (_, ins))| respond(ins, challenge_bit(ch, i)))
        .collect()
}

#[cfg(feature = "parallel")]
fn respond_rounds(rounds: &[(Commitment, Insight)], ch: &[u8; pok::CHALLENGE_BYTES])
    -> Result<Vec<Response>>
{
    rounds.par_iter().enumerate()
        .map(|(i, (_, ins))| respond(ins, challenge_bit(ch, i)))
        .collect()
}

/// Signs a non-empty message with the key pair (sk, pk). The stream
/// provides the randomness for all rounds.
pub fn sign(sk: &AlicePrivateKey, pk: &PublicKey, message: &[u8],
    xof: &mut Xof) -> Result<Signature>
{
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }
    let mut streams: Vec<Xof> = (0..SECURITY_BITS).map(|_| xof.fork()).collect();
    let rounds = commit_rounds(sk, &mut streams)?;
    log::trace!("signature: {} commitments computed", rounds.len());

    let mut sig = vec![0u8; SIGNATURE_BYTES];
    for (i, (cm, _)) in rounds.iter().enumerate() {
        sig[(i * COMMITMENT_BYTES)..((i + 1) * COMMITMENT_BYTES)]
            .copy_from_slice(&cm.encode());
    }
    let ch = challenge(&sig[..COMMITMENTS_LEN], &statement(message, pk));

    let responses = respond_rounds(&rounds, &ch)?;
    log::trace!("signature: {} responses computed", responses.len());
    for (i, r) in responses.iter().enumerate() {
        let off = COMMITMENTS_LEN + i * RESPONSE_BYTES;
        sig[off..(off + RESPONSE_BYTES)].copy_from_slice(&r.encode());
    }
    Ok(Signature(sig))
}

fn verify_round(sig: &Signature, pk: &PublicKey,
    ch: &[u8; pok::CHALLENGE_BYTES], i: usize) -> Result<()>
{
    let bit = challenge_bit(ch, i);
    let cm = Commitment::decode(sig.commitment_bytes(i))?;
    let r = Response::decode(sig.response_bytes(i), bit)?;
    pok::verify(&cm, &r, pk, bit).map_err(|e| {
        log::debug!("signature: round {} rejected ({})", i, e);
        e
    })
}

/// Verifies a signature on a non-empty message. All rounds must pass.
pub fn verify(pk: &PublicKey, message: &[u8], sig: &Signature) -> Result<()> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }
    let ch = challenge(&sig.0[..COMMITMENTS_LEN], &statement(message, pk));

    #[cfg(feature = "parallel")]
    let r = (0..SECURITY_BITS).into_par_iter()
        .try_for_each(|i| verify_round(sig, pk, &ch, i));

    #[cfg(not(feature = "parallel"))]
    let r = (0..SECURITY_BITS)
        .try_for_each(|i| verify_round(sig, pk, &ch, i));

    log::trace!("signature: verification over {} rounds done", SECURITY_BITS);
    r
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn sign_verify() {
        let mut xof = Xof::from_seed(b"signature keygen");
        let (sk, pk) = keygen(&mut xof);
        let msg = b"sample message";
        let sig = sign(&sk, &pk, msg, &mut xof).unwrap();
        assert!(sig.to_bytes().len() == SIGNATURE_BYTES);
        assert!(verify(&pk, msg, &sig).is_ok());

        let sig2 = Signature::from_bytes(sig.to_bytes()).unwrap();
        assert!(sig2 == sig);
        assert!(verify(&pk, msg, &sig2).is_ok());

        // Altered message.
        assert!(verify(&pk, b"sample messagf", &sig).is_err());

        // Altered commitment and response bytes.
        for off in [0, COMMITMENTS_LEN + 3, SIGNATURE_BYTES - RESPONSE_BYTES] {
            let mut buf = sig.to_bytes().to_vec();
            buf[off] ^= 0x01;
            let bad = Signature::from_bytes(&buf).unwrap();
            assert!(verify(&pk, msg, &bad).is_err());
        }

        // Another public key.
        let (_, pk2) = keygen(&mut xof);
        assert!(verify(&pk2, msg, &sig).is_err());

        assert!(Signature::from_bytes(&sig.to_bytes()[1..]) == Err(Error::InvalidEncoding));
    }

    #[test]
    fn empty_message() {
        let mut xof = Xof::from_seed(b"signature empty");
        let (sk, pk) = keygen(&mut xof);
        assert!(sign(&sk, &pk, b"", &mut xof) == Err(Error::EmptyMessage));
        let sig = Signature::from_bytes(&vec![0u8; SIGNATURE_BYTES]).unwrap();
        assert!(verify(&pk, b"", &sig) == Err(Error::EmptyMessage));
    }

    #[test]
    fn malformed_signatures() {
        let mut xof = Xof::from_seed(b"signature malformed");
        let (_, pk) = keygen(&mut xof);
        let mut rnd = vec![0u8; SIGNATURE_BYTES];
        xof.squeeze(&mut rnd);
        for buf in [vec![0x00u8; SIGNATURE_BYTES], vec![0xFFu8; SIGNATURE_BYTES], rnd] {
            let sig = Signature::from_bytes(&buf).unwrap();
            assert!(verify(&pk, b"m", &sig).is_err());
        }
        assert!(Signature::from_bytes(&[0u8; 3]) == Err(Error::InvalidEncoding));
    }

    #[test]
    fn deterministic() {
        let (sk1, pk1) = keygen(&mut Xof::from_seed(b"signature seed"));
        let (sk2, pk2) = keygen(&mut Xof::from_seed(b"signature seed"));
        assert!(sk1.encode() == sk2.encode());
        assert!(pk1.encode() == pk2.encode());

        let s1 = sign(&sk1, &pk1, b"m", &mut Xof::from_seed(b"rounds")).unwrap();
        let s2 = sign(&sk1, &pk1, b"m", &mut Xof::from_seed(b"rounds")).unwrap();
        assert!(s1 == s2);
    }
}
