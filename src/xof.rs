//! Extendable output function.
//!
//! All randomness consumed by this crate (private keys, ephemeral proof
//! scalars) and all hashing (Fiat-Shamir challenges, message digests)
//! go through SHAKE256. The `Xof` type is an exclusively owned stream:
//! it is passed explicitly as `&mut Xof` to every function that needs
//! randomness. Independent sub-streams can be derived with `fork()`,
//! which is how parallel signature rounds get their own randomness.

use sha3::{Shake256, Shake256Reader, digest::{Update, ExtendableOutput, XofReader}};
use super::{CryptoRng, RngCore, RngError};

/// Domain separation byte for forked streams.
const FORK_DOMAIN: u8 = 0x01;

/// A SHAKE256 output stream.
#[derive(Clone)]
pub struct Xof {
    reader: Shake256Reader,
}

impl Xof {

    /// Creates a stream by absorbing the provided seed.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self::from_parts(&[seed])
    }

    /// Creates a stream by absorbing the concatenation of several
    /// byte strings.
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let mut sh = Shake256::default();
        for p in parts {
            sh.update(p);
        }
        Self { reader: sh.finalize_xof() }
    }

    /// Creates a stream seeded with 32 bytes obtained from the provided
    /// cryptographically secure RNG.
    pub fn from_rng<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Fills `out` with the next bytes of the stream.
    #[inline]
    pub fn squeeze(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }

    /// Derives a new, independent stream. The parent stream advances by
    /// 32 bytes; the child is seeded with these bytes and a domain
    /// separation byte, so that it never outputs the same bytes as the
    /// parent.
    pub fn fork(&mut self) -> Self {
        let mut seed = [0u8; 32];
        self.squeeze(&mut seed);
        Self::from_parts(&[&[FORK_DOMAIN], &seed])
    }
}

impl RngCore for Xof {

    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.squeeze(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.squeeze(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.squeeze(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.squeeze(dest);
        Ok(())
    }
}

impl CryptoRng for Xof {}

/// Computes SHAKE256 over the concatenation of `parts`, and fills `out`
/// with the first output bytes.
pub fn shake256(parts: &[&[u8]], out: &mut [u8]) {
    Xof::from_parts(parts).squeeze(out);
}
