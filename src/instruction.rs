use std::fmt::Display;

use crate::gate::{Gate, QBits};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Gate(Gate),
    /// Read-out of the given qubits into classical bits of the same index
    Measurement(QBits),
}

impl Instruction {
    pub fn is_gate(&self) -> bool {
        matches!(self, Instruction::Gate(_))
    }

    /// Every qubit the instruction touches
    pub fn qubits(&self) -> QBits {
        match self {
            Instruction::Gate(gate) => gate.qubits(),
            Instruction::Measurement(qbits) => *qbits,
        }
    }
}

impl From<Gate> for Instruction {
    fn from(gate: Gate) -> Self {
        Instruction::Gate(gate)
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Gate(gate) => write!(f, "{gate}"),
            Instruction::Measurement(qbits) => {
                write!(f, "measure")?;
                for (i, q) in qbits.get_indices().into_iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}q[{q}]")?;
                }
                Ok(())
            }
        }
    }
}
