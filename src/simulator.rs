use rand::Rng;

use crate::{circuit::Circuit, state::QuantumState};

/// Construction of a simulator for one circuit
///
/// Blanket implemented for every `TryFrom<Circuit>` type,
/// so simulators only write the conversion and get `build`
/// with the conversion error as `E`.
pub trait BuildSimulator: Sized {
    type E: std::error::Error;

    fn build(circuit: Circuit) -> Result<Self, Self::E>;
}

impl<T, E> BuildSimulator for T
where
    T: TryFrom<Circuit, Error = E>,
    E: std::error::Error,
{
    type E = E;

    fn build(circuit: Circuit) -> Result<Self, Self::E> {
        Self::try_from(circuit)
    }
}

/// Whole-circuit evaluation from |00..0>
///
/// Each call starts over, the simulator itself keeps no state.
pub trait RunnableSimulator {
    type SampleError: std::error::Error;

    /// Runs the circuit and samples one basis state from the result
    fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, Self::SampleError>;
    fn final_state(&self) -> QuantumState;
}
