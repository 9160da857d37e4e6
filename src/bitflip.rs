//! Three-qubit bit-flip code with one syndrome ancilla
//!
//! Qubits 0..=2 hold data, qubit 3 is the ancilla. The circuit encodes
//! qubit 0 in superposition, flips one data qubit, runs syndrome
//! extraction and correction, then reads out every qubit.

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, instrument};

use crate::{
    circuit::{Circuit, CircuitError},
    config::Config,
    measurement::{MeasurementError, MeasurementOutcome, Probabilities},
    simulator::{BuildSimulator, RunnableSimulator},
    state::{BlochVector, QuantumState},
    sv_simulator::{SVError, SVSimulator},
};

pub const N_QUBITS: usize = 4;
pub const DATA_QUBITS: usize = 3;
pub const ANCILLA: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum BitFlipError {
    #[error("Qubit index {0} is not a data qubit, expected 0, 1 or 2")]
    InvalidQubitIndex(i64),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Simulator(#[from] SVError),
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

/// Data qubit chosen to receive the bit flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorQubit(usize);

impl ErrorQubit {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for ErrorQubit {
    type Error = BitFlipError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match usize::try_from(value) {
            Ok(index) if index < DATA_QUBITS => Ok(Self(index)),
            _ => Err(BitFlipError::InvalidQubitIndex(value)),
        }
    }
}

/// Everything a presentation layer needs from one run
#[derive(Debug, Clone)]
pub struct Correction {
    pub error_qubit: ErrorQubit,
    pub circuit: Circuit,
    pub state: QuantumState,
    pub probabilities: Probabilities,
    pub outcome: MeasurementOutcome,
    /// One entry per qubit, data qubit 0 first
    pub bloch: Vec<BlochVector>,
}

impl Correction {
    /// Bloch vector of the encoded data qubit after correction
    pub fn corrected_qubit(&self) -> Option<BlochVector> {
        self.bloch.first().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BitFlipCorrector {
    config: Config,
}

impl BitFlipCorrector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encode, flip `error_qubit`, extract the syndrome and correct
    ///
    /// All gates come before the single read-out of every qubit
    pub fn build_circuit(error_qubit: ErrorQubit) -> Result<Circuit, CircuitError> {
        let circuit = Circuit::new(N_QUBITS)
            // Encode
            .hadamard(0)?
            .cnot(0, ANCILLA)?
            // Error
            .x(error_qubit.index())?
            // Syndrome extraction
            .cnot(0, 1)?
            .cnot(0, 2)?
            .toffoli(2, 1, ANCILLA)?
            // Correction
            .cnot(0, 1)?
            .cnot(1, 2)?
            .measure_all();

        Ok(circuit)
    }

    #[instrument(skip(self), fields(shots = self.config.shots))]
    pub fn correct(&self, error_qubit: i64) -> Result<Correction, BitFlipError> {
        let error_qubit = ErrorQubit::try_from(error_qubit)?;

        let simulator = SVSimulator::build(Self::build_circuit(error_qubit)?)?;
        let state = simulator.final_state();
        debug!(%state, "evaluated circuit");

        let probabilities = Probabilities::exact(&state);
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let outcome = MeasurementOutcome::sample(&state, self.config.shots, &mut rng)?;
        debug!(counts = ?outcome.counts(), "sampled outcome");

        let bloch = state.bloch_vectors();

        Ok(Correction {
            error_qubit,
            circuit: simulator.into_circuit(),
            state,
            probabilities,
            outcome,
            bloch,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_1_SQRT_2;

    use super::*;
    use crate::{
        cart,
        ext::equal_c,
        gate::{Gate, GateType},
        instruction::Instruction,
    };

    fn seeded(shots: usize) -> BitFlipCorrector {
        BitFlipCorrector::new(Config {
            shots,
            seed: Some(17),
        })
    }

    #[test]
    fn final_state_is_normalized() {
        let corrector = seeded(64);
        for q in 0..3 {
            let correction = corrector.correct(q).unwrap();
            assert!((correction.state.norm_sqr() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn normalized_after_every_instruction() {
        for q in 0..3i64 {
            let circuit = BitFlipCorrector::build_circuit(ErrorQubit::try_from(q).unwrap()).unwrap();
            let trace = SVSimulator::build(circuit).unwrap().trace();

            // Eight gates and the read-out
            assert_eq!(trace.len(), 9);
            for (pc, s) in trace.iter().enumerate() {
                assert!(
                    (s.norm_sqr() - 1.0).abs() < 1e-5,
                    "error on qubit {q}, norm {} after instruction {pc}",
                    s.norm_sqr()
                );
            }
        }
    }

    #[test]
    fn invalid_indices() {
        let corrector = seeded(64);
        for q in [3, -1, 4, i64::MAX, i64::MIN] {
            assert!(matches!(
                corrector.correct(q),
                Err(BitFlipError::InvalidQubitIndex(i)) if i == q
            ));
        }
    }

    #[test]
    fn deterministic_state() {
        let corrector = BitFlipCorrector::default();
        let a = corrector.correct(0).unwrap();
        let b = corrector.correct(0).unwrap();
        assert_eq!(a.state.amplitudes(), b.state.amplitudes());
    }

    #[test]
    fn expected_final_states() {
        let corrector = seeded(16);
        let cases = [(0, [0b1000, 0b1101]), (1, [0b0110, 0b1011]), (2, [0b0100, 0b1001])];

        for (q, expected) in cases {
            let state = corrector.correct(q).unwrap().state;
            assert_eq!(state.support(1e-6), expected.to_vec(), "error on qubit {q}");
            for idx in expected {
                let amp = state.amplitude(idx).unwrap();
                assert!(equal_c(amp, cart!(FRAC_1_SQRT_2), 1e-5));
            }
        }
    }

    #[test]
    fn circuit_layout_for_qubit_1() {
        let circuit = BitFlipCorrector::build_circuit(ErrorQubit::try_from(1i64).unwrap()).unwrap();
        let instructions = circuit.instructions();

        assert_eq!(circuit.gates_before_measurement(), 8);
        assert_eq!(circuit.gate_count(), 8);
        assert_eq!(instructions[0], Instruction::Gate(Gate::hadamard(0).unwrap()));
        assert_eq!(instructions[1], Instruction::Gate(Gate::cnot(0, 3).unwrap()));
        assert_eq!(instructions[2], Instruction::Gate(Gate::x(1).unwrap()));
        assert!(matches!(instructions.last(), Some(Instruction::Measurement(q)) if q.count() == 4));

        let error_position = instructions
            .iter()
            .position(|i| {
                matches!(i, Instruction::Gate(g)
                    if g.get_type() == GateType::X && g.get_controls().is_empty())
            })
            .unwrap();
        assert_eq!(error_position, 2);
    }

    #[test]
    fn sampling_converges() {
        let few = seeded(100).correct(0).unwrap();
        let many = seeded(100_000).correct(0).unwrap();

        assert_eq!(few.probabilities, many.probabilities);
        assert!((many.probabilities.get("1000") - 0.5).abs() < 1e-5);
        assert!((many.probabilities.get("1101") - 0.5).abs() < 1e-5);
        assert!(few.outcome.total_variation(&few.probabilities) < 0.25);
        assert!(many.outcome.total_variation(&many.probabilities) < 0.01);
        assert_eq!(many.outcome.count("1000") + many.outcome.count("1101"), 100_000);
    }

    #[test]
    fn bloch_vectors_after_correction() {
        let correction = seeded(16).correct(0).unwrap();
        let b = &correction.bloch;
        assert_eq!(b.len(), 4);

        // Qubits 0 and 2 are entangled with the rest of the register
        assert!(b[0].length() < 1e-5);
        assert!(b[2].length() < 1e-5);
        assert!((b[1].z - 1.0).abs() < 1e-5);
        assert!((b[3].z + 1.0).abs() < 1e-5);
        assert_eq!(correction.corrected_qubit(), Some(b[0]));
    }

    #[test]
    fn shots_from_config() {
        let correction = seeded(37).correct(2).unwrap();
        assert_eq!(correction.outcome.shots(), 37);
        assert_eq!(correction.error_qubit.index(), 2);
    }
}
