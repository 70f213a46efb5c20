//! # Drive Kinematics Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use robot_lib::{
    drive_ctrl::{arcade, curvature, tank, DriveCtrl, Drivetrain},
    periodic::Periodic,
    sim::{PhysicsEngine, SimParams},
    motor::SimMotor,
};

fn kinematics_benchmark(c: &mut Criterion) {
    // Sweep of demands covering saturated and unsaturated cases
    let demands: Vec<(f64, f64)> = (0..21)
        .flat_map(|i| (0..21).map(move |j| (i as f64 / 10.0 - 1.0, j as f64 / 10.0 - 1.0)))
        .collect();

    c.bench_function("arcade", |b| {
        b.iter(|| {
            for &(s, r) in demands.iter() {
                black_box(arcade(black_box(s), black_box(r), true));
            }
        })
    });

    c.bench_function("tank", |b| {
        b.iter(|| {
            for &(l, r) in demands.iter() {
                black_box(tank(black_box(l), black_box(r), true));
            }
        })
    });

    c.bench_function("curvature", |b| {
        b.iter(|| {
            for &(s, r) in demands.iter() {
                black_box(curvature(black_box(s), black_box(r), false));
            }
        })
    });
}

fn drive_cycle_benchmark(c: &mut Criterion) {
    let left = SimMotor::new();
    let right = SimMotor::new();

    let mut drive = DriveCtrl::new(Box::new(left.clone()), Box::new(right.clone()));
    let mut physics = PhysicsEngine::new(
        SimParams::default(), true, Box::new(left), Box::new(right)
    );

    // One cycle of teleop driving and simulation
    c.bench_function("DriveCtrl + PhysicsEngine cycle", |b| {
        b.iter(|| {
            drive.arcade_drive(black_box(0.6), black_box(0.2), false);
            drive.periodic();
            black_box(physics.update_sim(0.02));
        })
    });
}

criterion_group!(benches, kinematics_benchmark, drive_cycle_benchmark);
criterion_main!(benches);
