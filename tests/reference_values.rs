//! Values and derivatives against 30-digit reference values across every regime.

use approx::assert_relative_eq;
use coulomb_wave::barrier::turning_point;
use coulomb_wave::{coulomb, coulomb_f, coulomb_g};

/// `(L, eta, rho, F, F', G, G')`.
const REFERENCE: [(i32, f64, f64, f64, f64, f64, f64); 24] = [
    (0, 0.0, 1.0, 0.84147098480789651, 0.54030230586813972, 0.54030230586813972, -0.84147098480789651),
    (0, 1.0, 0.5, 0.083154045350220233, 0.22693874616222788, 3.1060069279548875, -3.5491560387199242),
    (0, -1.0, 2.0, -0.59021266338988234, -0.88134561967307116, -0.60470812296393262, 0.79131332418819011),
    (1, 2.0, 1.0, 0.011353080388012423, 0.03055897962385843, 19.325723484708502, -36.062953473559297),
    (3, -0.5, 2.5, 0.39323521248674467, 0.45214362977553, 1.51086219447061, -0.80581105974103729),
    (0, 5.0, 3.0, 0.001882936638103695, 0.0031076628724309131, 173.54088084000178, -244.66752541845143),
    (2, 10.0, 6.0, 5.8161887007642821e-6, 9.5572416963786783e-6, 5.4341961465042671e+4, -8.2638436397383691e+4),
    (0, 20.0, 10.0, 8.0470483954937426e-12, 1.4208861913450764e-11, 3.5866777156780807e+10, -6.0938358016262862e+10),
    (5, 3.0, 4.0, 0.0061261949564213259, 0.010290946898350068, 53.004058698083256, -74.195818085181837),
    (10, 1.0, 3.0, 2.7581904354902424e-6, 1.0003914764799129e-5, 5.2531602553846528e+4, -1.7202522330865854e+5),
    (0, 1.0, 10.0, 0.47756081586257404, 0.841143106041319, 0.94287424265378087, -0.43325964789243423),
    (3, -2.0, 8.0, 0.69975681018914415, 0.71133363540235356, 0.61894908117598729, -0.79987888907697249),
    (5, 0.5, 20.0, -0.61864675627952917, 0.77673204879128185, 0.828288039648439, 0.57648751950039872),
    (4, -10.0, 12.0, -0.098474920927727939, -1.2521507779956713, -0.78702322951707895, 0.14753249581369327),
    (8, 2.0, 9.0, 0.32357032942799784, 0.23242815568201914, 2.7248799007765851, -1.1331730905478029),
    (2, 1.0, 60.0, 0.32694126726807235, -0.93770677862075888, -0.95450491447096321, -0.32101873327509268),
    (0, -3.0, 100.0, 0.96223881187814447, -0.21919572996693123, -0.21303422670206468, -0.99071435843394794),
    (10, 5.0, 120.0, 1.0146912609992957, 0.13203484129678019, 0.1387242733662315, -0.96747020528716254),
    (0, 0.1, 150.0, -0.98959178425495566, 0.14610805327128644, 0.14620335062954953, 0.98893152573469983),
    (6, 4.0, 7.0, 0.033437080543248501, 0.036690489273434695, 15.095057224266679, -13.343119602026577),
    (20, 0.0, 5.0, 2.7138633803966042e-11, 1.1078479626150564e-10, 4.6339757015287717e+9, -1.7931114349398524e+10),
    (15, -5.0, 1.5, 2.4037288879945648e-12, 2.4765002145672483e-11, 2.0895462393792809e+10, -2.0073970546049097e+11),
    (1, 50.0, 30.0, 2.8077945134979862e-24, 4.324539215251202e-24, 1.1652031561402226e+23, -1.766879033949183e+23),
    (0, -20.0, 0.3, -0.023016387903753279, 3.3623921045404535, 0.29395586013343281, 0.50421190555513807),
];

/// Error scale: the envelope `|F| + |G|` where the functions oscillate, the
/// value itself in the tunneling region.
fn scale(l: i32, eta: f64, rho: f64, value: f64, envelope: f64) -> f64 {
    if rho >= turning_point(f64::from(l), eta) {
        envelope
    } else {
        value.abs()
    }
}

#[test]
fn pairs_match_reference_values() {
    for &(l, eta, rho, f, f_prime, g, g_prime) in &REFERENCE {
        let pair = coulomb(l, eta, rho).unwrap();
        let envelope = f.abs() + g.abs();
        let envelope_prime = f_prime.abs() + g_prime.abs();
        let checks = [
            (pair.first_value(), f, envelope),
            (pair.second_value(), g, envelope),
            (pair.first_derivative(), f_prime, envelope_prime),
            (pair.second_derivative(), g_prime, envelope_prime),
        ];
        for (computed, expected, envelope) in checks {
            let error = (computed - expected).abs() / scale(l, eta, rho, expected, envelope);
            assert!(
                error < 1e-11,
                "L = {l}, eta = {eta}, rho = {rho}: {computed} vs {expected} (error {error:e})"
            );
        }
    }
}

#[test]
fn single_functions_match_reference_values() {
    for &(l, eta, rho, f, _, g, _) in &REFERENCE {
        let envelope = f.abs() + g.abs();
        let computed_f = coulomb_f(l, eta, rho).unwrap();
        let computed_g = coulomb_g(l, eta, rho).unwrap();
        assert!((computed_f - f).abs() < 1e-11 * scale(l, eta, rho, f, envelope));
        assert!((computed_g - g).abs() < 1e-11 * scale(l, eta, rho, g, envelope));
    }
}

#[test]
fn deep_tunneling_keeps_nearly_full_precision() {
    // F_1(50, 30) ~ 3e-24 and G_1(50, 30) ~ 1e23, far inside the turning point near 100.
    let pair = coulomb(1, 50.0, 30.0).unwrap();
    assert_relative_eq!(pair.first_value(), 2.807_794_513_497_986_2e-24, max_relative = 1e-11);
    assert_relative_eq!(pair.second_value(), 1.165_203_156_140_222_6e23, max_relative = 1e-11);
}
