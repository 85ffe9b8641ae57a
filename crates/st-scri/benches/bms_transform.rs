// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spiral_config::BmsSettings;
use st_scri::{Modes, Scri, SuperMomenta, ThreeVector, Waveform};
use st_sphere::{mode_index, n_modes};

fn random_waveform(ell_max: usize, spin: i32, seed: u64) -> Waveform {
    let mut rng = StdRng::seed_from_u64(seed);
    let amps: Vec<Complex64> = (0..n_modes(ell_max))
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let t = (0..64).map(|i| 0.25 * i as f64).collect();
    Waveform::from_fn(t, ell_max, |ell, m, t| {
        if (ell as i32) < spin.abs() {
            Complex64::new(0.0, 0.0)
        } else {
            amps[mode_index(ell, m)] * Complex64::from_polar(1.0, 0.4 * t)
        }
    })
    .expect("valid waveform")
}

fn random_scri(ell_max: usize, seed: u64) -> Scri {
    let spins = [2, 1, 0, -1, -2, 2];
    let w: Vec<Waveform> = spins
        .iter()
        .enumerate()
        .map(|(i, &s)| random_waveform(ell_max, s, seed + i as u64))
        .collect();
    Scri::from_waveforms(&w[0], &w[1], &w[2], &w[3], &w[4], &w[5]).expect("consistent inputs")
}

fn bench_scri_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("scri_bms_transformation");
    group.sample_size(10);
    let settings = BmsSettings::default();
    let v = ThreeVector::new(0.05, 0.0, -0.1);

    for &ell_max in &[2usize, 4] {
        let scri = random_scri(ell_max, 42);
        let mut data = vec![Complex64::new(0.0, 0.0); n_modes(ell_max)];
        data[mode_index(2, 1)] = Complex64::new(0.05, -0.02);
        let delta = Modes::new(0, data).expect("valid delta");

        group.bench_with_input(BenchmarkId::new("ell_max", ell_max), &scri, |b, scri| {
            b.iter(|| {
                let out = scri
                    .bms_transformation_with_settings(black_box(8.0), &v, &delta, &settings)
                    .expect("transformation succeeds");
                black_box(out)
            })
        });
    }
    group.finish();
}

fn bench_moreschi_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("moreschi_iteration");
    group.sample_size(10);
    let settings = BmsSettings::default();

    let scri = random_scri(2, 7);
    let sm = SuperMomenta::from_scri(&scri).expect("supermomenta");
    let mut shifted = sm.psi().to_vec();
    for psi in shifted.iter_mut() {
        let mut data = psi.values().to_vec();
        data[0] += Complex64::new(10.0 * (4.0 * PI).sqrt(), 0.0);
        *psi = Modes::new(0, data).expect("valid supermomentum");
    }
    let sm = SuperMomenta::new(sm.t().to_vec(), shifted).expect("supermomenta");

    group.bench_function("ell_max_2", |b| {
        b.iter(|| {
            let mut one_over_k = Modes::new(0, vec![Complex64::new((4.0 * PI).sqrt(), 0.0)])
                .expect("valid conformal factor");
            let mut delta = Modes::zeros(0, 2);
            sm.moreschi_iteration_with_settings(&mut one_over_k, &mut delta, &settings)
                .expect("Moreschi step");
            black_box((one_over_k, delta))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_scri_transform, bench_moreschi_step);
criterion_main!(benches);
