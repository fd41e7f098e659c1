//! Parameters for SIDHp751: p = 2^372*3^239 - 1.

use crate::backend::{define_gfp, define_gfp_tests};
use crate::field::Fp2;

struct FpParams;
impl FpParams {
    const MODULUS: [u64; 12] = [
        0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFFFFFFFFFF, 0xEEAFFFFFFFFFFFFF, 0xE3EC968549F878A8, 0xDA959B1A13F7CC76,
        0x084E9867D6EBE876, 0x8562B5045CB25748, 0x0E12909F97BADC66, 0x00006FE5D541F71C,
    ];
}

define_gfp!(Fp, FpParams, fpmod);
define_gfp_tests!(Fp, tests_fpmod);

/// Name of this parameter set.
pub const NAME: &str = "p751";

/// Security level in bits. This is also the number of proof rounds in
/// a signature.
pub const SECURITY_BITS: usize = 256;

/// Length of an encoded base field element, in bytes.
pub const FIELD_BYTES: usize = Fp::ENC_LEN;

/// Length of an encoded GF(p^2) element, in bytes.
pub const QUADRATIC_FIELD_BYTES: usize = 2 * FIELD_BYTES;

/// Half the field size, rounded up; it sets the scalar width.
pub const SUBGROUP_ORDER_BITS: usize = 376;

/// Number of 64-bit limbs in a scalar.
pub const SCALAR_WORDS: usize = (SUBGROUP_ORDER_BITS + 63) / 64;

// Alice: isogenies of degree 2^a.

pub const EXPONENT_ALICE: usize = 372;
pub const SUBGROUP_ORDER_BITS_ALICE: usize = 372;
pub const SECRET_KEY_BYTES_ALICE: usize = (SUBGROUP_ORDER_BITS_ALICE + 7) / 8;

/// Mask for the top byte of an Alice private key.
pub const MASK_ALICE: u8 = 0x0F;

/// Number of 4-isogenies in Alice's chain (an odd exponent adds one
/// leading 2-isogeny).
pub const ISOGENIES_ALICE: usize = 186;

pub const STRATEGY_ALICE: [u8; ISOGENIES_ALICE - 1] = [
    80, 48, 27, 15, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1,
    2, 1, 1, 7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1,
    1, 12, 7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1,
    5, 3, 2, 1, 1, 1, 1, 2, 1, 1, 1, 21, 12, 7, 4, 2,
    1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 5, 3, 2, 1, 1,
    1, 1, 2, 1, 1, 1, 9, 5, 3, 2, 1, 1, 1, 1, 2, 1,
    1, 1, 4, 2, 1, 1, 1, 2, 1, 1, 33, 20, 12, 7, 4, 2,
    1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 5, 3, 2, 1, 1,
    1, 1, 2, 1, 1, 1, 8, 5, 3, 2, 1, 1, 1, 1, 2, 1,
    1, 1, 4, 2, 1, 1, 2, 1, 1, 16, 8, 4, 2, 1, 1, 1,
    2, 1, 1, 4, 2, 1, 1, 2, 1, 1, 8, 4, 2, 1, 1, 2,
    1, 1, 4, 2, 1, 1, 2, 1, 1,
];

/// Alice's public generators on E0 (A = 6), in Montgomery representation.
pub const GENERATORS_ALICE: [Fp2; 3] = [
    // x(P)
    Fp2::new(
        m([
            0x884F46B74000BAA8, 0xBA52630F939DEC20, 0xC16FB97BA714A04D, 0x082536745B1AB3DB,
            0x1117157F446F9E82, 0xD2F27D621A018490, 0x6B24AB523D544BCD, 0x9307D6AA2EA85C94,
            0xE1A096729528F20F, 0x896446F868F3255C, 0x2401D996B1BFF8A5, 0x00000EF8786A5C0A,
        ]),
        m([
            0xAEB78B3B96F59394, 0xAB26681E29C90B74, 0xE520AC30FDC4ACF1, 0x870AAAE3A4B8111B,
            0xF875BDB738D64EFF, 0x50109A7ECD7ED6BC, 0x4CC64848FF0C56FB, 0xE617CB6C519102C9,
            0x9C74B3835921E609, 0xC91DDAE4A35A7146, 0x7FC82A155C1B9129, 0x0000214FA6B980B3,
        ])),
    // x(Q)
    Fp2::new(
        m([
            0x0F93CC38680A8CA9, 0x762E733822E7FED7, 0xE549F005AC0ADB67, 0x94A71FDD2C43A4ED,
            0xD48645C2B04721C5, 0x432DA1FE4D4CA4DC, 0xBC99655FAA7A80E8, 0xB2C6D502BCFD4823,
            0xEE92F40CA2EC8BDB, 0x7B074132EFB6D16C, 0x3340B46FA38A7633, 0x0000215749657F6C,
        ]),
        m([
            0xECFF375BF3079F4C, 0xFBFE74B043E80EF3, 0x17376CBE3C5C7AD1, 0xC06327A7E29CDBF2,
            0x2111649C438BF3D4, 0xC1F9298261BA2E97, 0x1F9FECE869CFD1C2, 0x01A39B4FC9346D62,
            0x147CD1D3E82A3C9F, 0xDE84E9D249E533EE, 0x1C48A5ADFB7C578D, 0x000061ACA0B82E1D,
        ])),
    // x(P-Q)
    Fp2::new(
        m([
            0x1600C525D41059F1, 0xA596899A0A1D83F7, 0x6BFDEED6D2B23F35, 0x5C7E707270C23910,
            0x276CA1A4E8369411, 0xB193651A602925A0, 0x243D239F1CA1F04A, 0x543DC6DA457860AD,
            0xCDA590F325181DE9, 0xD3AB7ACFDA80B395, 0x6C97468580FDDF7B, 0x0000352A3E5C4C77,
        ]),
        m([
            0x9B794F9FD1CC3EE8, 0xDB32E40A9B2FD23E, 0x26192A2542E42B67, 0xA18E94FCA045BCE7,
            0x96DC1BC38E7CDA2D, 0x9A1D91B752487DE2, 0xCC63763987436DA3, 0x1316717AACCC551D,
            0xC4C368A4632AFE72, 0x4B6EA85C9CCD5710, 0x7A12CAD582C7BC9A, 0x00001C7E240149BF,
        ])),
];

// Bob: isogenies of degree 3^b.

pub const EXPONENT_BOB: usize = 239;
pub const SUBGROUP_ORDER_BITS_BOB: usize = 379;
pub const SECRET_KEY_BYTES_BOB: usize = (SUBGROUP_ORDER_BITS_BOB + 7) / 8;

/// Mask for the top byte of a Bob private key.
pub const MASK_BOB: u8 = 0x03;

/// Number of 3-isogenies in Bob's chain.
pub const ISOGENIES_BOB: usize = 239;

pub const STRATEGY_BOB: [u8; ISOGENIES_BOB - 1] = [
    112, 63, 32, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1,
    2, 1, 1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2,
    1, 1, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2,
    1, 1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 31, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2,
    1, 1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 15, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 49,
    31, 16, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1,
    1, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
    15, 8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1,
    7, 4, 2, 1, 1, 2, 1, 1, 3, 2, 1, 1, 1, 1, 21, 12,
    8, 4, 2, 1, 1, 2, 1, 1, 4, 2, 1, 1, 2, 1, 1, 5,
    3, 2, 1, 1, 1, 1, 2, 1, 1, 1, 9, 5, 3, 2, 1, 1,
    1, 1, 2, 1, 1, 1, 4, 2, 1, 1, 1, 2, 1, 1,
];

/// Tripling strategy for the two-dimensional Pohlig-Hellman solver.
pub const STRATEGY_POHLIG_HELLMAN: [u8; ISOGENIES_BOB - 1] = [
    144, 56, 22, 9, 5, 2, 1, 3, 1, 2, 1, 5, 2, 1, 1, 3,
    1, 2, 1, 13, 5, 2, 1, 1, 3, 1, 2, 1, 8, 3, 1, 2,
    1, 5, 2, 1, 3, 1, 2, 1, 34, 13, 5, 2, 1, 1, 3, 1,
    2, 1, 8, 3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 21, 8,
    3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 13, 5, 2, 1, 3,
    1, 2, 1, 8, 3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 88,
    34, 13, 5, 2, 1, 1, 3, 1, 2, 1, 8, 3, 1, 2, 1, 5,
    2, 1, 3, 1, 2, 1, 21, 8, 3, 1, 2, 1, 5, 2, 1, 3,
    1, 2, 1, 13, 5, 2, 1, 3, 1, 2, 1, 8, 3, 1, 2, 1,
    5, 2, 1, 3, 1, 2, 1, 54, 21, 8, 3, 1, 2, 1, 5, 2,
    1, 3, 1, 2, 1, 13, 5, 2, 1, 3, 1, 2, 1, 8, 3, 1,
    2, 1, 5, 2, 1, 3, 1, 2, 1, 33, 13, 5, 2, 1, 3, 1,
    2, 1, 8, 3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 20, 8,
    3, 1, 2, 1, 5, 2, 1, 3, 1, 2, 1, 12, 5, 2, 1, 3,
    1, 2, 1, 7, 3, 1, 2, 1, 4, 2, 1, 2, 1, 1,
];

/// Bob's public generators on E0 (A = 6), in Montgomery representation.
pub const GENERATORS_BOB: [Fp2; 3] = [
    // x(P)
    Fp2::new(
        m([
            0x85691AAF4015F88C, 0x7478C5B8C36E9631, 0x7EF2A185DE4DD6E2, 0x943BBEE46BEB9DC7,
            0x1A3EC62798792D22, 0x791BC4B084B31D69, 0x03DBE6522CEA17C4, 0x04749AA65D665D83,
            0x3D52B5C45EF450F3, 0x0B4219848E36947D, 0xA4CF7070466BDE27, 0x0000334B1FA6D193,
        ]),
        m([
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
        ])),
    // x(Q)
    Fp2::new(
        m([
            0x8E7CB3FA53211340, 0xD67CE54F7A05EEE0, 0xFDDC2C8BCE46FC38, 0x08587FAE3110DF1E,
            0xD6B8246FA22B058B, 0x4DAC3ACC905A5DBD, 0x51D0BF2FADCED3E8, 0xE5A2406DF6484425,
            0x907F177584F671B8, 0x4738A2FFCCED051C, 0x2B0067B4177E4853, 0x00002806AC948D3D,
        ]),
        m([
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
            0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
        ])),
    // x(P-Q)
    Fp2::new(
        m([
            0xB56457016D1D6D1C, 0x03DECCB38F39C491, 0xDFB910AC8A559452, 0xA9D0F17D1FF24883,
            0x8562BBAF515C248C, 0x249B2A6DDB1CB67D, 0x3131AF96FB46835C, 0xE10258398480C3E1,
            0xEAB5E2B872D4FAB1, 0xB71E63875FAEB1DF, 0xF8384D4F13757CF6, 0x0000361EC9B09912,
        ]),
        m([
            0x58C967899ED16EF4, 0x81998376DC622A4B, 0x3D1C1DCFE0B12681, 0x9347DEBB953E1730,
            0x9ABB344D3A82C2D7, 0xE4881BD2820552B2, 0x0037247923D90266, 0x2E3156EDB157E5A5,
            0xF86A46A7506823F7, 0x8FE5523A7B7F1CFC, 0xFA3CFFA38372F67B, 0x0000692DCE85FFBD,
        ])),
];

/// Candidate values t for the canonical basis search; the Elligator 2
/// input is r = t + i. The first row is used when the curve coefficient
/// is a non-square in GF(p^2), the second when it is a square.
pub const CANONICAL_BASIS_TABLE: [[u16; 32]; 2] = [
    [
        2, 5, 8, 9, 10, 12, 13, 18, 19, 21, 22, 23, 28, 30, 31, 34,
        35, 36, 41, 42, 43, 44, 45, 48, 49, 53, 54, 55, 60, 61, 63, 66,
    ],
    [
        1, 3, 4, 6, 7, 11, 14, 15, 16, 17, 20, 24, 25, 26, 27, 29,
        32, 33, 37, 38, 39, 40, 46, 47, 50, 51, 52, 56, 57, 58, 59, 62,
    ],
];

const fn m(x: [u64; 12]) -> Fp {
    Fp::from_montgomery_w64le(x)
}
