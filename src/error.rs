//! Error type.
//!
//! Low-level arithmetic keeps the usual convention of returning `u32`
//! masks (0xFFFFFFFF for true, 0x00000000 for false) so that secret
//! data does not influence control flow; the protocol-level functions
//! (key decoding, proof responses and verification, signatures) convert
//! these outcomes into the `Error` type defined here.

/// Failures reported by the protocol functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required square root does not exist. When computing a proof
    /// response, this means that the prover state is invalid.
    #[error("value is not a square")]
    NotSquare,

    /// None of the entries of the canonical basis table yielded a
    /// basis of the 3-torsion of the curve.
    #[error("no canonical basis found for the curve")]
    BasisNotFound,

    /// A byte string has the wrong length, contains a non-canonical
    /// field element, or an out-of-range scalar.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// Signing and verification require a non-empty message.
    #[error("empty message")]
    EmptyMessage,

    /// A verification equation does not hold.
    #[error("invalid proof")]
    InvalidProof,
}

/// Result type for all fallible operations of this crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {

    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn display() {
        use std::string::ToString;

        assert!(Error::NotSquare.to_string() == "value is not a square");
        assert!(Error::EmptyMessage.to_string() == "empty message");
        assert!(Error::InvalidProof != Error::InvalidEncoding);
    }
}
