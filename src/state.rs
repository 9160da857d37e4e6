use std::fmt::Display;

use nalgebra::{Complex, DVector};

use crate::{cart, ext::bitstring};

/// Amplitudes over the 2^n computational basis states
///
/// Bit `k` of a basis index is the value of qubit `k`
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    amplitudes: DVector<Complex<f32>>,
    n_qubits: usize,
}

/// Bloch-sphere coordinates of a single qubit
///
/// Taken from the qubit's reduced density matrix, so an entangled
/// qubit has a vector shorter than one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlochVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl BlochVector {
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Display for BlochVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:+.3}, {:+.3}, {:+.3}) |r| = {:.3}",
            self.x,
            self.y,
            self.z,
            self.length()
        )
    }
}

impl QuantumState {
    /// The all-zero state |00..0>
    pub fn zero(n_qubits: usize) -> Self {
        let mut amplitudes = DVector::from_element(1 << n_qubits, cart!(0.0));
        amplitudes[0] = cart!(1.0);
        Self {
            amplitudes,
            n_qubits,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn amplitudes(&self) -> &DVector<Complex<f32>> {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut DVector<Complex<f32>> {
        &mut self.amplitudes
    }

    pub fn amplitude(&self, index: usize) -> Option<Complex<f32>> {
        self.amplitudes.get(index).copied()
    }

    /// Sum of squared magnitudes, one for a valid state
    pub fn norm_sqr(&self) -> f32 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    pub fn probabilities(&self) -> impl Iterator<Item = f32> + '_ {
        self.amplitudes.iter().map(|c| c.norm_sqr())
    }

    /// Basis states with probability above `threshold`
    pub fn support(&self, threshold: f32) -> Vec<usize> {
        self.probabilities()
            .enumerate()
            .filter(|(_, p)| *p > threshold)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn bloch_vector(&self, qubit: usize) -> Option<BlochVector> {
        if qubit >= self.n_qubits {
            return None;
        }
        let mask = 1 << qubit;

        // rho_10 = sum over the rest of the register of conj(a_i0) * a_i1
        let mut rho_10 = cart!(0.0);
        let mut p0 = 0.0;
        let mut p1 = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if i & mask == 0 {
                p0 += amp.norm_sqr();
                rho_10 += amp.conj() * self.amplitudes[i | mask];
            } else {
                p1 += amp.norm_sqr();
            }
        }

        Some(BlochVector {
            x: 2.0 * rho_10.re,
            y: 2.0 * rho_10.im,
            z: p0 - p1,
        })
    }

    pub fn bloch_vectors(&self) -> Vec<BlochVector> {
        (0..self.n_qubits)
            .filter_map(|q| self.bloch_vector(q))
            .collect()
    }
}

impl From<QuantumState> for DVector<Complex<f32>> {
    fn from(state: QuantumState) -> Self {
        state.amplitudes
    }
}

impl Display for QuantumState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() <= f32::EPSILON {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "({:.3}{:+.3}i)|{}>", amp.re, amp.im, bitstring(i, self.n_qubits))?;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
