//! Parameters for SIDHp377: p = 2^191*3^117 - 1.
//!
//! The 2-power exponent is odd, hence Alice's isogeny starts with a
//! single 2-isogeny before the chain of 4-isogenies.

use crate::backend::{define_gfp, define_gfp_tests};
use crate::field::Fp2;

struct FpParams;
impl FpParams {
    const MODULUS: [u64; 6] = [
        0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0x7FFFFFFFFFFFFFFF,
        0x0B46D546BC2A5699, 0xA879CC6988CE7CF5, 0x015B702E0C542196,
    ];
}

define_gfp!(Fp, FpParams, fpmod);
define_gfp_tests!(Fp, tests_fpmod);

/// Name of this parameter set.
pub const NAME: &str = "p377";

/// Security level in bits. This is also the number of proof rounds in
/// a signature.
pub const SECURITY_BITS: usize = 128;

/// Length of an encoded base field element, in bytes.
pub const FIELD_BYTES: usize = Fp::ENC_LEN;

/// Length of an encoded GF(p^2) element, in bytes.
pub const QUADRATIC_FIELD_BYTES: usize = 2 * FIELD_BYTES;

/// Half the field size, rounded up; it sets the scalar width.
pub const SUBGROUP_ORDER_BITS: usize = 189;

/// Number of 64-bit limbs in a scalar.
pub const SCALAR_WORDS: usize = (SUBGROUP_ORDER_BITS + 63) / 64;

// Alice: isogenies of degree 2^a.

pub const EXPONENT_ALICE: usize = 191;
pub const SUBGROUP_ORDER_BITS_ALICE: usize = 191;
pub const SECRET_KEY_BYTES_ALICE: usize = (SUBGROUP_ORDER_BITS_ALICE + 7) / 8;

/// Mask for the top byte of an Alice private key.
pub const MASK_ALICE: u8 = 0x7F;

/// Number of 4-isogenies in Alice's chain (an odd exponent adds one
/// leading 2-isogeny).
pub const ISOGENIES_ALICE: usize = 95;

pub const STRATEGY_ALICE: [u8; ISOGENIES_ALICE - 1] = [
    38, 26, 15, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2,
    1, 1, 7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1,
    11, 7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 4,
    3, 2, 1, 1, 1, 1, 2, 1, 1, 17, 9, 5, 3, 2, 1, 1,
    1, 1, 2, 1, 1, 1, 4, 2, 1, 1, 1, 2, 1, 1, 8, 4,
    2, 1, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
];

/// Alice's public generators on E0 (A = 6), in Montgomery representation.
pub const GENERATORS_ALICE: [Fp2; 3] = [
    // x(P)
    Fp2::new(
        m([
            0x8AE392AA8312F880, 0xDB7F6BA38CC56011, 0x896F67240AD52C67,
            0x21B9C0BD6C0584FF, 0xF064B97DDD0B2BD4, 0x0102EA98B786D4CC,
        ]),
        m([
            0x583DE90ED3D09845, 0x131B1BDFBBE25620, 0x054B16A62F3D59F1,
            0x1C3A458EEFFD4A0B, 0x1FBC000608BE1F7A, 0x00225F4BEEF34209,
        ])),
    // x(Q)
    Fp2::new(
        m([
            0x8AA130E98FE00DE5, 0x6B54CC5A0A538778, 0x46D96D4F04F6605D,
            0x069A3CAB971973AE, 0x8923D0F2112DA219, 0x0085C1C47AD21A2A,
        ]),
        m([
            0x50981EA202812D84, 0x61883F048CF1682A, 0x2DBC9EC88567E391,
            0xD5E238E99DD189E7, 0x1BFE095BC910EA7D, 0x00203E87957453EB,
        ])),
    // x(P-Q)
    Fp2::new(
        m([
            0x296CA63890082DB3, 0x02E16D4D70C2C55A, 0xD4B8FE9CB9481E99,
            0xF95F9798C3BECDFB, 0x71B3A2D8A38CB84B, 0x0118DD7682525B04,
        ]),
        m([
            0xF64DD26CEC6E9DF5, 0xBC02B5979FF4F94C, 0x5D8B16849129DE49,
            0xE44435C64BEFB9E9, 0x1077D183B5A4727B, 0x0019A2DF755CF268,
        ])),
];

// Bob: isogenies of degree 3^b.

pub const EXPONENT_BOB: usize = 117;
pub const SUBGROUP_ORDER_BITS_BOB: usize = 186;
pub const SECRET_KEY_BYTES_BOB: usize = (SUBGROUP_ORDER_BITS_BOB + 7) / 8;

/// Mask for the top byte of a Bob private key.
pub const MASK_BOB: u8 = 0x01;

/// Number of 3-isogenies in Bob's chain.
pub const ISOGENIES_BOB: usize = 117;

pub const STRATEGY_BOB: [u8; ISOGENIES_BOB - 1] = [
    54, 31, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2,
    1, 1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 15, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 23,
    15, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
    7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 9, 6,
    4, 2, 1, 1, 2, 1, 1, 2, 2, 1, 1, 1, 4, 2, 1, 1,
    1, 2, 1, 1,
];

/// Tripling strategy for the two-dimensional Pohlig-Hellman solver.
pub const STRATEGY_POHLIG_HELLMAN: [u8; ISOGENIES_BOB - 1] = [
    67, 30, 12, 5, 2, 1, 3, 1, 2, 1, 7, 3, 1, 2, 1, 4,
    2, 1, 2, 1, 1, 17, 8, 3, 1, 2, 1, 5, 2, 1, 3, 1,
    2, 1, 9, 5, 2, 1, 3, 1, 2, 1, 5, 2, 1, 1, 3, 1,
    2, 1, 39, 16, 7, 3, 1, 2, 1, 4, 2, 1, 2, 1, 1, 9,
    4, 2, 1, 2, 1, 1, 5, 2, 1, 1, 3, 1, 2, 1, 22, 9,
    5, 2, 1, 3, 1, 2, 1, 5, 2, 1, 1, 3, 1, 2, 1, 13,
    5, 2, 1, 1, 3, 1, 2, 1, 8, 3, 1, 2, 1, 5, 2, 1,
    3, 1, 2, 1,
];

/// Bob's public generators on E0 (A = 6), in Montgomery representation.
pub const GENERATORS_BOB: [Fp2; 3] = [
    // x(P)
    Fp2::new(
        m([
            0x436424EE3C9446F8, 0xB013A914D96E976D, 0x30C376697D926658,
            0xE99792AFAA115E68, 0x935421EF522A946B, 0x0032474AECB8799E,
        ]),
        m([
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
        ])),
    // x(Q)
    Fp2::new(
        m([
            0x5EDE445E538850BC, 0x5BA7DAD976595394, 0xF01F46B8519CD118,
            0x9DFA5CB5B40775A1, 0xC7E535F99811B56B, 0x0025BF8D8B00A170,
        ]),
        m([
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
        ])),
    // x(P-Q)
    Fp2::new(
        m([
            0xA35AA9C8EA887C42, 0xE5A1BF165361C81A, 0x719BB1C6D6C727C7,
            0x348590861EB46882, 0xB57273062A50C238, 0x002C53E0163A1C34,
        ]),
        m([
            0xF12E87A9F00803D8, 0x49C966997253584C, 0x58BBD82219B363ED,
            0x6232DFE1A85929F5, 0xC85434A71BF3CC30, 0x005DE7FAB257510D,
        ])),
];

/// Candidate values t for the canonical basis search; the Elligator 2
/// input is r = t + i. The first row is used when the curve coefficient
/// is a non-square in GF(p^2), the second when it is a square.
pub const CANONICAL_BASIS_TABLE: [[u16; 32]; 2] = [
    [
        1, 2, 5, 8, 11, 13, 14, 18, 20, 24, 25, 27, 28, 29, 30, 31,
        32, 34, 37, 41, 43, 45, 46, 48, 51, 52, 53, 57, 58, 59, 63, 65,
    ],
    [
        3, 4, 6, 7, 9, 10, 12, 15, 16, 17, 19, 21, 22, 23, 26, 33,
        35, 36, 38, 39, 40, 42, 44, 47, 49, 50, 54, 55, 56, 60, 61, 62,
    ],
];

const fn m(x: [u64; 6]) -> Fp {
    Fp::from_montgomery_w64le(x)
}

#[cfg(test)]
mod tests {

    use super::*;

    // R mod p and R^2 mod p, as listed with the curve parameters.
    const MONTGOMERY_ONE: [u64; 6] = [
        0x00000000000000BC, 0x0000000000000000, 0x0000000000000000,
        0xB7FB600DD0E86746, 0x468DE27F885C3C0B, 0x00D99E2EF237555C,
    ];
    const MONTGOMERY_R2: [u64; 6] = [
        0x826E131D3839C923, 0x54892C7B7D73E7F7, 0x3F8957D221B867A3,
        0xD1217CD71D03BB94, 0xDCCBFB71E3AE5457, 0x00FCC56B6CD4B219,
    ];

    #[test]
    fn montgomery_constants() {
        assert!(Fp::ONE.to_montgomery_w64le() == MONTGOMERY_ONE);
        // Stored R^2 is R when read back out of Montgomery representation.
        assert!(Fp::from_montgomery_w64le(MONTGOMERY_R2).to_w64le() == MONTGOMERY_ONE);
    }

    #[test]
    fn sizes() {
        assert!(Fp::BITLEN == 377);
        assert!(FIELD_BYTES == 48);
        assert!(SECRET_KEY_BYTES_ALICE == 24);
        assert!(SECRET_KEY_BYTES_BOB == 24);
        assert!(SCALAR_WORDS == 3);
        assert!(8 * SCALAR_WORDS >= SECRET_KEY_BYTES_ALICE);
        assert!(8 * SCALAR_WORDS >= SECRET_KEY_BYTES_BOB);
        // A scalar fits in each half of a response slot.
        assert!(8 * SCALAR_WORDS <= FIELD_BYTES);
        assert!(ISOGENIES_ALICE == EXPONENT_ALICE / 2);
        assert!(ISOGENIES_BOB == EXPONENT_BOB);
    }

    #[test]
    fn generators_are_reduced() {
        for g in GENERATORS_ALICE.iter().chain(GENERATORS_BOB.iter()) {
            let (re, im) = g.parts();
            for x in [re, im] {
                let (y, ok) = Fp::decode_ct(&x.encode());
                assert!(ok == 0xFFFFFFFF);
                assert!(y.equals(x) == 0xFFFFFFFF);
            }
        }
        // Bob's x(P) and x(Q) are in GF(p).
        assert!(GENERATORS_BOB[0].parts().1.iszero() == 0xFFFFFFFF);
        assert!(GENERATORS_BOB[1].parts().1.iszero() == 0xFFFFFFFF);
    }
}

