use bitflip_qec::{BitFlipCorrector, Config};

extern crate bitflip_qec;

fn main() {
    divan::main();
}

#[divan::bench(args = [0, 1, 2])]
fn correct(error_qubit: i64) {
    let corrector = BitFlipCorrector::new(Config {
        shots: 1024,
        seed: Some(1),
    });
    let correction = corrector.correct(divan::black_box(error_qubit)).unwrap();
    assert_eq!(correction.outcome.shots(), 1024);
}

#[divan::bench(args = [100, 1_000, 10_000, 100_000])]
fn sample_shots(shots: usize) {
    let corrector = BitFlipCorrector::new(Config {
        shots,
        seed: Some(1),
    });
    divan::black_box(corrector.correct(0).unwrap());
}
