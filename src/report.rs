use std::collections::BTreeMap;

use serde::Serialize;

use crate::bitflip::Correction;

/// Serialisable view of a `Correction` for external renderers
#[derive(Debug, Serialize)]
pub struct CorrectionReport {
    pub error_qubit: usize,
    pub n_qubits: usize,
    /// Instructions in circuit order, e.g. `cx q[0], q[3]`
    pub circuit: Vec<String>,
    pub qasm: String,
    /// `[re, im]` per basis state, qubit 0 is the least significant bit
    pub statevector: Vec<[f32; 2]>,
    pub probabilities: BTreeMap<String, f32>,
    pub shots: usize,
    pub counts: BTreeMap<String, usize>,
    /// `[x, y, z]` per qubit
    pub bloch: Vec<[f32; 3]>,
}

impl From<&Correction> for CorrectionReport {
    fn from(c: &Correction) -> Self {
        Self {
            error_qubit: c.error_qubit.index(),
            n_qubits: c.circuit.n_qubits(),
            circuit: c
                .circuit
                .instructions()
                .iter()
                .map(ToString::to_string)
                .collect(),
            qasm: c.circuit.to_qasm(),
            statevector: c.state.amplitudes().iter().map(|a| [a.re, a.im]).collect(),
            probabilities: c.probabilities.as_map().clone(),
            shots: c.outcome.shots(),
            counts: c.outcome.counts().clone(),
            bloch: c.bloch.iter().map(|b| [b.x, b.y, b.z]).collect(),
        }
    }
}
