use std::collections::{BTreeMap, BTreeSet};

use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};

use crate::{ext::bitstring, state::QuantumState};

/// Probabilities below this are treated as zero
pub const PROBABILITY_THRESHOLD: f32 = 1e-9;

/// Conventional number of shots for a histogram
pub const DEFAULT_SHOTS: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum MeasurementError {
    #[error("At least one shot is needed to sample a state")]
    NoShots,
    #[error("State cannot be sampled: {0}")]
    Distribution(#[from] rand::distr::weighted::Error),
}

/// Exact outcome probabilities of a state, keyed by bitstring
#[derive(Debug, Clone, PartialEq)]
pub struct Probabilities(BTreeMap<String, f32>);

impl Probabilities {
    pub fn exact(state: &QuantumState) -> Self {
        let n = state.n_qubits();
        Self(
            state
                .probabilities()
                .enumerate()
                .filter(|(_, p)| *p > PROBABILITY_THRESHOLD)
                .map(|(i, p)| (bitstring(i, n), p))
                .collect(),
        )
    }

    pub fn get(&self, bitstring: &str) -> f32 {
        self.0.get(bitstring).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, f32> {
        &self.0
    }
}

/// Histogram of sampled outcomes, keyed by bitstring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementOutcome {
    shots: usize,
    counts: BTreeMap<String, usize>,
}

impl MeasurementOutcome {
    /// Draws `shots` independent read-outs of every qubit
    pub fn sample<R: Rng + ?Sized>(
        state: &QuantumState,
        shots: usize,
        rng: &mut R,
    ) -> Result<Self, MeasurementError> {
        if shots == 0 {
            return Err(MeasurementError::NoShots);
        }

        let dist = WeightedIndex::new(state.probabilities())?;
        let mut by_index = BTreeMap::<usize, usize>::new();
        for _ in 0..shots {
            *by_index.entry(dist.sample(rng)).or_insert(0) += 1;
        }

        let n = state.n_qubits();
        Ok(Self {
            shots,
            counts: by_index
                .into_iter()
                .map(|(i, count)| (bitstring(i, n), count))
                .collect(),
        })
    }

    pub fn shots(&self) -> usize {
        self.shots
    }

    pub fn count(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    pub fn frequency(&self, bitstring: &str) -> f32 {
        self.count(bitstring) as f32 / self.shots as f32
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Largest count of any outcome
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Total variation distance between the sampled frequencies
    /// and an exact distribution
    pub fn total_variation(&self, exact: &Probabilities) -> f32 {
        let keys: BTreeSet<&str> = self
            .counts
            .keys()
            .map(String::as_str)
            .chain(exact.iter().map(|(k, _)| k))
            .collect();

        0.5 * keys
            .into_iter()
            .map(|k| (self.frequency(k) - exact.get(k)).abs())
            .sum::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{circuit::Circuit, sv_simulator::evaluate};

    fn bell() -> QuantumState {
        let circ = Circuit::new(2)
            .hadamard(0)
            .and_then(|c| c.cnot(0, 1))
            .unwrap();
        evaluate(&circ).unwrap()
    }

    #[test]
    fn exact_probabilities() {
        let probs = Probabilities::exact(&bell());
        assert_eq!(probs.len(), 2);
        assert!((probs.get("00") - 0.5).abs() < 1e-5);
        assert!((probs.get("11") - 0.5).abs() < 1e-5);
        assert_eq!(probs.get("01"), 0.0);
    }

    #[test]
    fn sampling_stays_on_support() {
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = MeasurementOutcome::sample(&bell(), DEFAULT_SHOTS, &mut rng).unwrap();

        assert_eq!(outcome.shots(), DEFAULT_SHOTS);
        assert_eq!(outcome.count("00") + outcome.count("11"), DEFAULT_SHOTS);
        assert_eq!(outcome.count("10"), 0);
        assert!(outcome.max_count() >= DEFAULT_SHOTS / 2);
    }

    #[test]
    fn seeded_sampling_repeats() {
        let state = bell();
        let a = MeasurementOutcome::sample(&state, 500, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = MeasurementOutcome::sample(&state, 500, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_shots() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            MeasurementOutcome::sample(&bell(), 0, &mut rng),
            Err(MeasurementError::NoShots)
        ));
    }

    #[test]
    fn total_variation_shrinks_with_shots() {
        let state = bell();
        let exact = Probabilities::exact(&state);
        let mut rng = StdRng::seed_from_u64(2024);

        let few = MeasurementOutcome::sample(&state, 100, &mut rng).unwrap();
        let many = MeasurementOutcome::sample(&state, 100_000, &mut rng).unwrap();

        assert!(few.total_variation(&exact) < 0.25);
        assert!(many.total_variation(&exact) < 0.01);
    }
}
