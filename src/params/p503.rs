//! Parameters for SIDHp503: p = 2^250*3^159 - 1.

use crate::backend::{define_gfp, define_gfp_tests};
use crate::field::Fp2;

struct FpParams;
impl FpParams {
    const MODULUS: [u64; 8] = [
        0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xABFFFFFFFFFFFFFF,
        0x13085BDA2211E7A0, 0x1B9BF6C87B7E7DAF, 0x6045C6BDDA77A4D0, 0x004066F541811E1E,
    ];
}

define_gfp!(Fp, FpParams, fpmod);
define_gfp_tests!(Fp, tests_fpmod);

/// Name of this parameter set.
pub const NAME: &str = "p503";

/// Security level in bits. This is also the number of proof rounds in
/// a signature.
pub const SECURITY_BITS: usize = 160;

/// Length of an encoded base field element, in bytes.
pub const FIELD_BYTES: usize = Fp::ENC_LEN;

/// Length of an encoded GF(p^2) element, in bytes.
pub const QUADRATIC_FIELD_BYTES: usize = 2 * FIELD_BYTES;

/// Half the field size, rounded up; it sets the scalar width.
pub const SUBGROUP_ORDER_BITS: usize = 252;

/// Number of 64-bit limbs in a scalar.
pub const SCALAR_WORDS: usize = (SUBGROUP_ORDER_BITS + 63) / 64;

// Alice: isogenies of degree 2^a.

pub const EXPONENT_ALICE: usize = 250;
pub const SUBGROUP_ORDER_BITS_ALICE: usize = 250;
pub const SECRET_KEY_BYTES_ALICE: usize = (SUBGROUP_ORDER_BITS_ALICE + 7) / 8;

/// Mask for the top byte of an Alice private key.
pub const MASK_ALICE: u8 = 0x03;

/// Number of 4-isogenies in Alice's chain (an odd exponent adds one
/// leading 2-isogeny).
pub const ISOGENIES_ALICE: usize = 125;

pub const STRATEGY_ALICE: [u8; ISOGENIES_ALICE - 1] = [
    61, 32, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2,
    1, 1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
    29, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
    13, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
    5, 4, 2, 1, 1, 2, 1, 1, 2, 1, 1, 1,
];

/// Alice's public generators on E0 (A = 6), in Montgomery representation.
pub const GENERATORS_ALICE: [Fp2; 3] = [
    // x(P)
    Fp2::new(
        m([
            0x5D083011589AD893, 0xADFD8D2CB67D0637, 0x330C9AC34FFB6361, 0xF0D47489A2E805A2,
            0x27E2789259C6B8DC, 0x63866A2C121931B9, 0x8D4C65A7137DCF44, 0x003A183AE5967B3F,
        ]),
        m([
            0x7E3541B8C96D1519, 0xD3ADAEEC0D61A26C, 0xC0A2219CE7703DD9, 0xFF3E46658FCDBC52,
            0xD5B38DEAE6E196FF, 0x1AAC826364956D58, 0xEC9F4875B9A5F27A, 0x001B0B475AB99843,
        ])),
    // x(Q)
    Fp2::new(
        m([
            0x4D83695107D03BAD, 0x221F3299005E2FCF, 0x78E6AE22F30DECF2, 0x6D982DB5111253E4,
            0x504C80A8AB4526A8, 0xEFD0C3AA210BB024, 0xCB77483501DC6FCF, 0x001052544A96BDF3,
        ]),
        m([
            0x0D74FE3402BCAE47, 0xDF5B8CDA832D8AED, 0xB86BCF06E4BD837E, 0x892A2933A0FA1F63,
            0x9F88FC67B6CCB461, 0x822926EA9DDA3AC8, 0xEAC8DDE5855425ED, 0x000618FE6DA37A80,
        ])),
    // x(P-Q)
    Fp2::new(
        m([
            0x1D9D32D2DC877C17, 0x5517CD8F71D5B02B, 0x395AFB8F6B60C117, 0x3AE31AC85F9098C8,
            0x5F5341C198450848, 0xF8C609DBEA435C6A, 0xD832BC7EDC7BA5E4, 0x002AD98AA6968BF5,
        ]),
        m([
            0xC466CAB0F73C2E5B, 0x7B1817148FB2CF9C, 0x873E87C099E470A0, 0xBB17AC6D17A7BAC1,
            0xA146FDCD0F2E2A58, 0x88B311E9CEAB6201, 0x37604CF5C7951757, 0x0006804071C74BF9,
        ])),
];

// Bob: isogenies of degree 3^b.

pub const EXPONENT_BOB: usize = 159;
pub const SUBGROUP_ORDER_BITS_BOB: usize = 253;
pub const SECRET_KEY_BYTES_BOB: usize = (SUBGROUP_ORDER_BITS_BOB + 7) / 8;

/// Mask for the top byte of a Bob private key.
pub const MASK_BOB: u8 = 0x0F;

/// Number of 3-isogenies in Bob's chain.
pub const ISOGENIES_BOB: usize = 159;

pub const STRATEGY_BOB: [u8; ISOGENIES_BOB - 1] = [
    71, 38, 21, 13, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1,
    2, 1, 1, 5, 4, 2, 1, 1, 2, 1, 1, 2, 1, 1, 1, 9,
    5, 3, 2, 1, 1, 1, 1, 2, 1, 1, 1, 4, 2, 1, 1, 1,
    2, 1, 1, 17, 9, 5, 3, 2, 1, 1, 1, 1, 2, 1, 1, 1,
    4, 2, 1, 1, 1, 2, 1, 1, 8, 4, 2, 1, 1, 1, 2, 1,
    1, 4, 2, 1, 1, 2, 1, 1, 33, 17, 9, 5, 3, 2, 1, 1,
    1, 1, 2, 1, 1, 1, 4, 2, 1, 1, 1, 2, 1, 1, 8, 4,
    2, 1, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1, 16, 8,
    4, 2, 1, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1, 8,
    4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
];

/// Tripling strategy for the two-dimensional Pohlig-Hellman solver.
pub const STRATEGY_POHLIG_HELLMAN: [u8; ISOGENIES_BOB - 1] = [
    93, 38, 16, 7, 3, 1, 2, 1, 4, 2, 1, 2, 1, 1, 9, 4,
    2, 1, 2, 1, 1, 5, 2, 1, 1, 3, 1, 2, 1, 22, 9, 4,
    2, 1, 2, 1, 1, 5, 2, 1, 1, 3, 1, 2, 1, 13, 5, 2,
    1, 1, 3, 1, 2, 1, 8, 3, 1, 2, 1, 5, 2, 1, 3, 1,
    2, 1, 55, 22, 9, 4, 2, 1, 2, 1, 1, 5, 2, 1, 1, 3,
    1, 2, 1, 13, 5, 2, 1, 1, 3, 1, 2, 1, 8, 3, 1, 2,
    1, 5, 2, 1, 3, 1, 2, 1, 33, 13, 5, 2, 1, 1, 3, 1,
    2, 1, 8, 3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 20, 8,
    3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 12, 5, 2, 1, 3,
    1, 2, 1, 7, 3, 1, 2, 1, 4, 2, 1, 2, 1, 1,
];

/// Bob's public generators on E0 (A = 6), in Montgomery representation.
pub const GENERATORS_BOB: [Fp2; 3] = [
    // x(P)
    Fp2::new(
        m([
            0xDF630FC5FB2468DB, 0xC30C5541C102040E, 0x3CDC9987B76511FC, 0xF54B5A09353D0CDD,
            0x3ADBA8E00703C42F, 0x8253F9303DDC95D0, 0x62D30778763ABFD7, 0x001CD00FB581CD55,
        ]),
        m([
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
        ])),
    // x(Q)
    Fp2::new(
        m([
            0x2E3457A12B429261, 0x311F94E89627DCF8, 0x5B71C98FD1DB73F6, 0x3671DB7DCFC21541,
            0xB6D1484C9FE0CF4F, 0x19CD110717356E35, 0xF4F9FB00AC9919DF, 0x0035BC124D38A70B,
        ]),
        m([
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
        ])),
    // x(P-Q)
    Fp2::new(
        m([
            0x2E08BB99413D2952, 0xD3021467CD088D72, 0x21017AF859752245, 0x26314ED8FFD9DE5C,
            0x4AF43C73344B6686, 0xCFA1F91149DF0993, 0xF327A95365587A89, 0x000DBF54E03D3906,
        ]),
        m([
            0x03E03FF342F5F304, 0x993D604D7B4B6E56, 0x80412F4D9280E71F, 0x0FFDC9EF990B3982,
            0xE584E64C51604931, 0x1374F42AC8B0BBD7, 0x07D5BC37DFA41A5F, 0x00396CCFD61FD34C,
        ])),
];

/// Candidate values t for the canonical basis search; the Elligator 2
/// input is r = t + i. The first row is used when the curve coefficient
/// is a non-square in GF(p^2), the second when it is a square.
pub const CANONICAL_BASIS_TABLE: [[u16; 32]; 2] = [
    [
        1, 2, 5, 7, 8, 10, 11, 12, 13, 14, 15, 16, 17, 20, 21, 23,
        25, 26, 28, 31, 33, 35, 42, 44, 47, 49, 51, 54, 57, 63, 67, 68,
    ],
    [
        3, 4, 6, 9, 18, 19, 22, 24, 27, 29, 30, 32, 34, 36, 37, 38,
        39, 40, 41, 43, 45, 46, 48, 50, 52, 53, 55, 56, 58, 59, 60, 61,
    ],
];

const fn m(x: [u64; 8]) -> Fp {
    Fp::from_montgomery_w64le(x)
}

#[cfg(test)]
mod tests {

    use super::*;

    // R mod p and R^2 mod p, as listed with the curve parameters.
    const MONTGOMERY_ONE: [u64; 8] = [
        0x00000000000003F9, 0x0000000000000000, 0x0000000000000000, 0xB400000000000000,
        0x63CB1A6EA6DED2B4, 0x51689D8D667EB37D, 0x8ACD77C71AB24142, 0x0026FBAEC60F5953,
    ];
    const MONTGOMERY_R2: [u64; 8] = [
        0x5289A0CF641D011F, 0x9B88257189FED2B9, 0xA3B365D58DC8F17A, 0x5BC57AB6EFF168EC,
        0x9E51998BD84D4423, 0xBF8999CBAC3B5695, 0x46E9127BCE14CDB6, 0x003F6CFCE8B81771,
    ];

    #[test]
    fn montgomery_constants() {
        assert!(Fp::ONE.to_montgomery_w64le() == MONTGOMERY_ONE);
        // Stored R^2 is R when read back out of Montgomery representation.
        assert!(Fp::from_montgomery_w64le(MONTGOMERY_R2).to_w64le() == MONTGOMERY_ONE);
    }

    #[test]
    fn sizes() {
        assert!(Fp::BITLEN == 503);
        assert!(FIELD_BYTES == 63);
        assert!(SECRET_KEY_BYTES_ALICE == 32);
        assert!(SECRET_KEY_BYTES_BOB == 32);
        assert!(SCALAR_WORDS == 4);
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

