#![allow(non_snake_case)]

mod util;
use util::core_cycles;

use sidh_pok::field::Fp2;
use sidh_pok::params::{NAME, GENERATORS_ALICE, GENERATORS_BOB, SUBGROUP_ORDER_BITS_ALICE};
use sidh_pok::curve::{three_point_ladder, AliceCurve, XPoint};
use sidh_pok::isogeny::isogeny_alice;
use sidh_pok::scalar::Scalar;
use sidh_pok::sidh::{AlicePrivateKey, BobPrivateKey, STARTING_CURVE};
use sidh_pok::{pok, signature};
use sidh_pok::xof::Xof;

fn seeded() -> Xof {
    Xof::from_seed(&core_cycles().to_le_bytes())
}

// Runs `f` `n` times per sample, over `samples` samples; returns the
// median cost of one call.
fn measure<F: FnMut()>(samples: usize, n: usize, mut f: F) -> f64 {
    let mut tt = vec![0u64; samples];
    for i in 0..samples {
        let begin = core_cycles();
        for _ in 0..n {
            f();
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    (tt[tt.len() >> 1] as f64) / (n as f64)
}

fn bench_fp2_mul() -> (f64, u8) {
    let mut xof = seeded();
    let mut x = Fp2::sample(&mut xof);
    let y = Fp2::sample(&mut xof);
    let v = measure(100, 1000, || { x *= y; });
    (v, x.encode()[0])
}

fn bench_fp2_invert() -> (f64, u8) {
    let mut x = Fp2::sample(&mut seeded());
    let v = measure(100, 100, || { x = x.invert() + Fp2::ONE; });
    (v, x.encode()[0])
}

fn bench_fp2_is_square() -> (f64, u8) {
    let mut x = Fp2::sample(&mut seeded());
    let v = measure(100, 100, || {
        let (r, _) = x.is_square();
        x = r + Fp2::ONE;
    });
    (v, x.encode()[0])
}

fn bench_ladder() -> (f64, u8) {
    let sk = AlicePrivateKey::generate(&mut seeded());
    let k = Scalar::decode(&sk.encode()).unwrap_or(Scalar::ONE);
    let [xP, xQ, xR] = GENERATORS_ALICE;
    let mut b = 0u8;
    let v = measure(100, 10, || {
        let K = three_point_ladder(&xP, &xQ, &xR, &k,
            SUBGROUP_ORDER_BITS_ALICE, &STARTING_CURVE);
        b ^= K.to_x().encode()[0];
    });
    (v, b)
}

fn bench_isogeny_alice() -> (f64, u8) {
    let sk = AlicePrivateKey::generate(&mut seeded());
    let K = sk.kernel(&GENERATORS_ALICE, &STARTING_CURVE);
    let mut b = 0u8;
    let v = measure(20, 1, || {
        let mut curve = AliceCurve::from_a(&STARTING_CURVE);
        let mut pts = GENERATORS_BOB.map(XPoint::from_x);
        isogeny_alice(&mut curve, &K, &mut pts);
        b ^= curve.to_a().encode()[0] ^ pts[0].to_x().encode()[0];
    });
    (v, b)
}

fn bench_keygen_alice() -> (f64, u8) {
    let mut xof = seeded();
    let mut b = 0u8;
    let v = measure(20, 1, || {
        let sk = AlicePrivateKey::generate(&mut xof);
        b ^= sk.public_key().encode()[0];
    });
    (v, b)
}

fn bench_keygen_bob() -> (f64, u8) {
    let mut xof = seeded();
    let mut b = 0u8;
    let v = measure(20, 1, || {
        let sk = BobPrivateKey::generate(&mut xof);
        b ^= sk.public_key().encode()[0];
    });
    (v, b)
}

fn bench_pok_round() -> (f64, f64, u8) {
    let mut xof = seeded();
    let sk = AlicePrivateKey::generate(&mut xof);
    let pk = sk.public_key();
    let mut b = 0u8;
    let mut bit = false;
    let v1 = measure(20, 1, || {
        if let Ok((cm, ins)) = pok::commit(&sk, &mut xof) {
            if let Ok(r) = pok::respond(&ins, bit) {
                b ^= cm.encode()[0] ^ r.encode()[0];
            }
        }
        bit = !bit;
    });
    let (cm, ins) = match pok::commit(&sk, &mut xof) {
        Ok(x) => x,
        Err(_) => return (v1, 0.0, b),
    };
    let rr = [pok::respond(&ins, false), pok::respond(&ins, true)];
    let v2 = measure(20, 1, || {
        for (i, r) in rr.iter().enumerate() {
            if let Ok(r) = r {
                b ^= pok::verify(&cm, r, &pk, i == 1).is_ok() as u8;
            }
        }
    });
    (v1, v2 / 2.0, b)
}

fn bench_signature() -> (f64, f64, u8) {
    let mut xof = seeded();
    let (sk, pk) = signature::keygen(&mut xof);
    let mut msg = [0u8; 32];
    xof.squeeze(&mut msg);
    let mut b = 0u8;
    let mut last = None;
    let v1 = measure(5, 1, || {
        if let Ok(sig) = signature::sign(&sk, &pk, &msg, &mut xof) {
            b ^= sig.to_bytes()[0];
            last = Some(sig);
        }
    });
    let sig = match last {
        Some(s) => s,
        None => return (v1, 0.0, b),
    };
    let v2 = measure(5, 1, || {
        b ^= signature::verify(&pk, &msg, &sig).is_ok() as u8;
    });
    (v1, v2, b)
}

fn main() {
    let mut bx = 0u8;

    println!("Parameter set: {}", NAME);
    let (v, x) = bench_fp2_mul();
    bx ^= x;
    println!("GF(p^2) mul:                   {:13.2}", v);
    let (v, x) = bench_fp2_invert();
    bx ^= x;
    println!("GF(p^2) invert:                {:13.2}", v);
    let (v, x) = bench_fp2_is_square();
    bx ^= x;
    println!("GF(p^2) is_square:             {:13.2}", v);
    let (v, x) = bench_ladder();
    bx ^= x;
    println!("three-point ladder (Alice):    {:13.2}", v);
    let (v, x) = bench_isogeny_alice();
    bx ^= x;
    println!("2^a-isogeny, 3 points:         {:13.2}", v);
    let (v, x) = bench_keygen_alice();
    bx ^= x;
    println!("key generation (Alice):        {:13.2}", v);
    let (v, x) = bench_keygen_bob();
    bx ^= x;
    println!("key generation (Bob):          {:13.2}", v);
    let (v1, v2, x) = bench_pok_round();
    bx ^= x;
    println!("PoK commit + respond:          {:13.2}", v1);
    println!("PoK verify:                    {:13.2}", v2);
    let (v1, v2, x) = bench_signature();
    bx ^= x;
    println!("signature sign:                {:13.2}", v1);
    println!("signature verify:              {:13.2}", v2);

    println!("{}", bx);
}
