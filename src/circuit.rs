use std::fmt::Write;

use crate::{
    gate::{Gate, GateError, QBits},
    instruction::Instruction,
};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CircuitError {
    #[error("Qubit {qubit} does not exist in a {n_qubits} qubit circuit")]
    QubitOutOfRange { qubit: usize, n_qubits: usize },
    #[error(transparent)]
    Gate(#[from] GateError),
}

pub type CircuitResult<T> = Result<T, CircuitError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    instructions: Vec<Instruction>,
    n_qubits: usize,
}

impl Circuit {
    pub fn new(n_qubits: usize) -> Self {
        Circuit {
            instructions: Vec::<Instruction>::default(),
            n_qubits,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Number of gate instructions, measurements excluded
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Gates applied before the first measurement
    pub fn gates_before_measurement(&self) -> usize {
        self.instructions
            .iter()
            .take_while(|i| i.is_gate())
            .count()
    }

    fn check(&self, qubits: QBits) -> CircuitResult<()> {
        match qubits.highest() {
            Some(qubit) if qubit >= self.n_qubits => Err(CircuitError::QubitOutOfRange {
                qubit,
                n_qubits: self.n_qubits,
            }),
            _ => Ok(()),
        }
    }

    /// Appends an already built gate
    pub fn gate(mut self, gate: Gate) -> CircuitResult<Self> {
        self.check(gate.qubits())?;
        self.instructions.push(Instruction::Gate(gate));
        Ok(self)
    }

    // Functions for extending with a single gate below

    pub fn x(self, target: usize) -> CircuitResult<Self> {
        self.gate(Gate::x(target)?)
    }

    pub fn hadamard(self, target: usize) -> CircuitResult<Self> {
        self.gate(Gate::hadamard(target)?)
    }

    pub fn cnot(self, control: usize, target: usize) -> CircuitResult<Self> {
        self.gate(Gate::cnot(control, target)?)
    }

    pub fn toffoli(self, control1: usize, control2: usize, target: usize) -> CircuitResult<Self> {
        self.gate(Gate::toffoli(control1, control2, target)?)
    }

    pub fn measure(mut self, qubits: &[usize]) -> CircuitResult<Self> {
        if let Some(&qubit) = qubits.iter().find(|&&q| q >= self.n_qubits) {
            return Err(CircuitError::QubitOutOfRange {
                qubit,
                n_qubits: self.n_qubits,
            });
        }
        self.instructions
            .push(Instruction::Measurement(QBits::from_indices(qubits)));
        Ok(self)
    }

    pub fn measure_all(mut self) -> Self {
        self.instructions
            .push(Instruction::Measurement(QBits::all(self.n_qubits)));
        self
    }

    /// OpenQASM 2.0 program for the circuit
    ///
    /// Measurements write into a `meas` register of the same width
    /// as the quantum register
    pub fn to_qasm(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "OPENQASM 2.0;");
        let _ = writeln!(out, "include \"qelib1.inc\";");
        let _ = writeln!(out, "qreg q[{}];", self.n_qubits);
        let _ = writeln!(out, "creg meas[{}];", self.n_qubits);

        for inst in &self.instructions {
            match inst {
                Instruction::Gate(gate) => {
                    let _ = writeln!(out, "{gate};");
                }
                Instruction::Measurement(qbits) => {
                    for q in qbits.get_indices() {
                        let _ = writeln!(out, "measure q[{q}] -> meas[{q}];");
                    }
                }
            }
        }

        out
    }
}
