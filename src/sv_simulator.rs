use nalgebra::{Complex, DMatrix, DVector};
use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};
use tracing::trace;

use crate::{
    circuit::Circuit,
    gate::{Gate, QBits},
    instruction::Instruction,
    simulator::{BuildSimulator, RunnableSimulator},
    state::QuantumState,
};

/// Widest register the dense state vector will allocate
pub const MAX_SV_QUBITS: usize = 20;

pub struct SVExecutor<'a> {
    state: QuantumState,
    circuit: &'a Circuit,
    pc: usize,
}

impl<'a> SVExecutor<'a> {
    /// Step forward one instruction in the circuit
    pub fn step(&mut self) -> Option<&QuantumState> {
        let circuit = self.circuit;
        let inst = circuit.instructions().get(self.pc)?;
        self.apply_instruction(inst);
        trace!(pc = self.pc, instruction = %inst, "applied instruction");

        self.pc += 1;

        Some(&self.state)
    }

    /// Run the entire circuit
    pub fn step_all(&mut self) -> &Self {
        while self.step().is_some() {}
        self
    }

    /// Index of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Samples a basis state from the current state vector
    /// without modifying it
    pub fn get_collapsed_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SVError> {
        let dist = WeightedIndex::new(self.state.probabilities())?;
        Ok(dist.sample(rng))
    }

    /// Get current state of the quantum system
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    pub fn into_state(self) -> QuantumState {
        self.state
    }

    /// Basis indices the gate mixes when every target bit of `base` is 0
    ///
    /// Offset bit `j` lands on the `j`:th target qubit, so the order
    /// matches the rows of the gate matrix
    fn block_indices(base: usize, targets: &[usize]) -> Vec<usize> {
        (0..1usize << targets.len())
            .map(|offset| {
                targets
                    .iter()
                    .enumerate()
                    .fold(base, |idx, (j, &qubit)| idx | (((offset >> j) & 1) << qubit))
            })
            .collect()
    }

    fn gate(&mut self, gate: &Gate) {
        let control_mask = gate.get_control_bits().get_bitstring();
        let target_bits: QBits = gate.get_target_bits();
        let target_mask = target_bits.get_bitstring();
        let targets = target_bits.get_indices();
        let u: DMatrix<Complex<f32>> = gate.matrix();

        let amplitudes = self.state.amplitudes_mut();
        let bases = (0..amplitudes.len())
            .filter(|i| i & target_mask == 0 && i & control_mask == control_mask);

        for base in bases {
            let block = Self::block_indices(base, &targets);
            let before = DVector::from_iterator(block.len(), block.iter().map(|&i| amplitudes[i]));
            let after = &u * before;

            for (&i, amp) in block.iter().zip(after.iter()) {
                amplitudes[i] = *amp;
            }
        }
    }

    fn apply_instruction(&mut self, inst: &Instruction) {
        match inst {
            Instruction::Gate(gate) => self.gate(gate),
            // Read-out is deferred: sampling happens on the final state
            Instruction::Measurement(_) => {}
        }
    }
}

pub struct SVSimulator {
    circuit: Circuit,
}

impl TryFrom<Circuit> for SVSimulator {
    type Error = SVError;

    fn try_from(value: Circuit) -> Result<Self, Self::Error> {
        if value.n_qubits() > MAX_SV_QUBITS {
            return Err(SVError::TooManyQubits {
                n_qubits: value.n_qubits(),
                max: MAX_SV_QUBITS,
            });
        }
        Ok(Self { circuit: value })
    }
}

impl RunnableSimulator for SVSimulator {
    type SampleError = SVError;

    fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SVError> {
        self.get_executor().step_all().get_collapsed_state(rng)
    }

    fn final_state(&self) -> QuantumState {
        let mut executor = self.get_executor();
        executor.step_all();
        executor.into_state()
    }
}

impl SVSimulator {
    pub fn get_executor(&self) -> SVExecutor<'_> {
        SVExecutor {
            state: QuantumState::zero(self.circuit.n_qubits()),
            circuit: &self.circuit,
            pc: 0,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// State after each instruction, in circuit order
    pub fn trace(&self) -> Vec<QuantumState> {
        let mut executor = self.get_executor();
        let mut states = Vec::with_capacity(self.circuit.instructions().len());
        while let Some(state) = executor.step() {
            states.push(state.clone());
        }
        states
    }
}

/// Evaluates a circuit from |00..0> to its final state
pub fn evaluate(circuit: &Circuit) -> Result<QuantumState, SVError> {
    Ok(SVSimulator::build(circuit.clone())?.final_state())
}

#[derive(Debug, thiserror::Error)]
pub enum SVError {
    #[error("{n_qubits} qubits exceed the state vector limit of {max}")]
    TooManyQubits { n_qubits: usize, max: usize },
    #[error("State cannot be sampled: {0}")]
    Sampling(#[from] rand::distr::weighted::Error),
}
