use std::{f32::consts::FRAC_1_SQRT_2, fmt::Display};

use nalgebra::{Complex, DMatrix};

use crate::cart;

/// Largest qubit index a `QBits` mask can address
pub const MAX_QUBITS: usize = usize::BITS as usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct QBits(usize);

impl QBits {
    /// Specify qubits from bitstring
    pub fn from_bitstring(bits: usize) -> Self {
        Self(bits)
    }

    /// Specify qubits from a list of indices
    ///
    /// Indices at or above `MAX_QUBITS` are ignored, callers
    /// are expected to validate before building a mask
    pub fn from_indices<'a, I>(indices: I) -> Self
    where
        I: IntoIterator<Item = &'a usize>,
    {
        let mut bits = 0;
        for &i in indices {
            if i < MAX_QUBITS {
                bits |= 1 << i;
            }
        }
        Self(bits)
    }

    /// Mask of the `n` lowest qubits
    pub fn all(n_qubits: usize) -> Self {
        if n_qubits >= MAX_QUBITS {
            Self(usize::MAX)
        } else {
            Self((1 << n_qubits) - 1)
        }
    }

    pub fn get_bitstring(&self) -> usize {
        self.0
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, qubit: usize) -> bool {
        qubit < MAX_QUBITS && (self.0 >> qubit) & 1 == 1
    }

    pub fn overlaps(&self, other: QBits) -> bool {
        self.0 & other.0 != 0
    }

    /// Highest qubit index in the mask
    pub fn highest(&self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(MAX_QUBITS - 1 - self.0.leading_zeros() as usize)
        }
    }

    pub fn get_indices(&self) -> Vec<usize> {
        let mut bits = self.0;
        let mut vec = Vec::new();
        let mut index = 0;

        while bits != 0 {
            if bits & 1 == 1 {
                vec.push(index);
            }
            bits >>= 1;
            index += 1;
        }

        vec
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateType {
    X,
    H,
}

impl GateType {
    pub fn arity(&self) -> usize {
        match self {
            Self::X | Self::H => 1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Gate {0:?} expects {1} target(s), got {2}")]
    InvalidTargets(GateType, usize, usize),
    #[error("Qubit {0} is listed more than once")]
    RepeatedQubit(usize),
    #[error("Qubit index {0} is out of range")]
    QubitOutOfRange(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    ty: GateType,
    controls: QBits,
    targets: QBits,
}

impl Gate {
    #[rustfmt::skip]
    pub const PAULI_X_DATA: [Complex<f32>; 4] = [
        cart!(0.0), cart!(1.0),
        cart!(1.0), cart!(0.0),
    ];

    #[rustfmt::skip]
    pub const HADAMARD_DATA: [Complex<f32>; 4] = [
        cart!(FRAC_1_SQRT_2, 0.0), cart!(FRAC_1_SQRT_2, 0.0),
        cart!(FRAC_1_SQRT_2, 0.0), cart!(-FRAC_1_SQRT_2, 0.0),
    ];

    pub fn new(ty: GateType, controls: &[usize], targets: &[usize]) -> Result<Self, GateError> {
        if targets.len() != ty.arity() {
            return Err(GateError::InvalidTargets(ty, ty.arity(), targets.len()));
        }

        let mut seen = QBits::default();
        for &q in controls.iter().chain(targets) {
            if q >= MAX_QUBITS {
                return Err(GateError::QubitOutOfRange(q));
            }
            if seen.contains(q) {
                return Err(GateError::RepeatedQubit(q));
            }
            seen = QBits(seen.0 | 1 << q);
        }

        Ok(Self {
            ty,
            controls: QBits::from_indices(controls),
            targets: QBits::from_indices(targets),
        })
    }

    pub fn hadamard(target: usize) -> Result<Self, GateError> {
        Self::new(GateType::H, &[], &[target])
    }

    pub fn x(target: usize) -> Result<Self, GateError> {
        Self::new(GateType::X, &[], &[target])
    }

    pub fn cnot(control: usize, target: usize) -> Result<Self, GateError> {
        Self::new(GateType::X, &[control], &[target])
    }

    pub fn toffoli(control1: usize, control2: usize, target: usize) -> Result<Self, GateError> {
        Self::new(GateType::X, &[control1, control2], &[target])
    }

    pub fn get_type(&self) -> GateType {
        self.ty
    }

    pub fn get_control_bits(&self) -> QBits {
        self.controls
    }

    pub fn get_target_bits(&self) -> QBits {
        self.targets
    }

    pub fn get_controls(&self) -> Vec<usize> {
        self.get_control_bits().get_indices()
    }

    pub fn get_targets(&self) -> Vec<usize> {
        self.get_target_bits().get_indices()
    }

    /// Every qubit the gate touches
    pub fn qubits(&self) -> QBits {
        QBits(self.controls.0 | self.targets.0)
    }

    /// The uncontrolled matrix acting on the targets
    pub fn matrix(&self) -> DMatrix<Complex<f32>> {
        let data = match self.ty {
            GateType::X => &Self::PAULI_X_DATA,
            GateType::H => &Self::HADAMARD_DATA,
        };

        DMatrix::from_row_slice(2, 2, data)
    }

    /// OpenQASM 2.0 mnemonic
    pub fn mnemonic(&self) -> &'static str {
        match (self.ty, self.controls.count()) {
            (GateType::H, 0) => "h",
            (GateType::H, _) => "ch",
            (GateType::X, 0) => "x",
            (GateType::X, 1) => "cx",
            (GateType::X, 2) => "ccx",
            (GateType::X, _) => "mcx",
        }
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        let qubits = self.get_controls().into_iter().chain(self.get_targets());
        for (i, q) in qubits.enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}q[{q}]")?;
        }
        Ok(())
    }
}
