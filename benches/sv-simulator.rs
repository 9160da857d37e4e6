use bitflip_qec::{Circuit, evaluate};

extern crate bitflip_qec;

fn main() {
    divan::main();
}

/// Hadamard on qubit 0 followed by a CNOT ladder
fn ghz_ladder(n_qubits: usize) -> Circuit {
    let mut circ = Circuit::new(n_qubits).hadamard(0).unwrap();
    for q in 1..n_qubits {
        circ = circ.cnot(q - 1, q).unwrap();
    }
    circ.measure_all()
}

#[divan::bench(
    args = [2, 4, 6, 8, 10, 12, 14, 16],
    sample_count = 10,
)]
fn evaluate_ghz(n_qubits: usize) {
    let circ = ghz_ladder(n_qubits);
    let state = evaluate(&circ).unwrap();
    assert!((state.norm_sqr() - 1.0).abs() < 1e-4);
}
