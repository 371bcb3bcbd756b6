//! # Steering Law Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use steer_lib::{
    loc::Pose,
    ref_gen::RefState,
    steer_ctrl::{Params, PhaseSpaceSteering, SteeringLaw},
};

fn steer_law_benchmark(c: &mut Criterion) {
    // ---- Build the law and a representative tracking state ----

    let law = PhaseSpaceSteering::new(Params {
        k_psi: 2.0,
        k_v: 0.5,
        omega_cmd_sat_rads: 1.5,
        phase_space_slope: 1.2,
    });

    let pose = Pose::new(0.3, -0.2, 0.15);

    let ref_state = RefState {
        x_des_m: 0.5,
        y_des_m: 0.1,
        psi_des_rad: 0.2,
        rho_des_m: 2.5,
        v_des_ms: 0.5,
    };

    c.bench_function("PhaseSpaceSteering::compute_velocities", |b| {
        b.iter(|| law.compute_velocities(black_box(&pose), black_box(&ref_state)))
    });
}

criterion_group!(benches, steer_law_benchmark);
criterion_main!(benches);
