use std::collections::{BTreeMap, HashMap};

use rand::{Rng, RngCore};

use bonheur_db::models::DrawRecord;

use super::{Method, Predictor};
use crate::config::BaggingParams;
use crate::top_k;

/// "Random Forest" : vote de fréquence sur des rééchantillonnages avec remise.
pub struct BaggingPredictor {
    params: BaggingParams,
}

impl BaggingPredictor {
    pub fn new(params: BaggingParams) -> Self {
        Self { params }
    }

    fn sample_size(&self, len: usize) -> usize {
        let ratio = (len as f64 * self.params.sample_ratio).floor() as usize;
        ratio.max(self.params.min_sample)
    }
}

impl Default for BaggingPredictor {
    fn default() -> Self {
        Self::new(BaggingParams::default())
    }
}

impl Predictor for BaggingPredictor {
    fn method(&self) -> Method {
        Method::RandomForest
    }

    fn predict(&self, draws: &[DrawRecord], k: usize, rng: &mut dyn RngCore) -> Vec<u8> {
        if draws.is_empty() {
            return Vec::new();
        }

        let size = self.sample_size(draws.len());
        let mut votes: BTreeMap<u8, f64> = BTreeMap::new();

        for _ in 0..self.params.trees {
            let mut freq: BTreeMap<u8, f64> = BTreeMap::new();
            for _ in 0..size {
                let draw = &draws[rng.random_range(0..draws.len())];
                for &n in &draw.winning {
                    *freq.entry(n).or_insert(0.0) += 1.0;
                }
            }
            for n in top_k(freq, self.params.votes_per_tree) {
                *votes.entry(n).or_insert(0.0) += 1.0;
            }
        }

        log::debug!("bagging : {} arbres, échantillons de {}", self.params.trees, size);
        top_k(votes, k)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("trees".to_string(), self.params.trees as f64),
            ("sample_ratio".to_string(), self.params.sample_ratio),
            ("votes_per_tree".to_string(), self.params.votes_per_tree as f64),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_seeded_reproducible() {
        let model = BaggingPredictor::default();
        let draws = make_test_draws(60);
        let a = model.predict(&draws, 5, &mut StdRng::seed_from_u64(42));
        let b = model.predict(&draws, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_distinct_numbers_in_range() {
        let model = BaggingPredictor::default();
        let draws = make_test_draws(30);
        let result = model.predict(&draws, 5, &mut StdRng::seed_from_u64(7));
        let mut sorted = result.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), result.len());
        assert!(result.iter().all(|&n| (1..=90).contains(&n)));
    }

    #[test]
    fn test_constant_history() {
        let draws: Vec<DrawRecord> = (0..12)
            .map(|i| DrawRecord {
                draw_name: "Fortune".to_string(),
                date: format!("2024-03-{:02}", i + 1),
                winning: [10, 20, 30, 40, 50],
                machine: None,
            })
            .collect();
        let model = BaggingPredictor::default();
        let result = model.predict(&draws, 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(result, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_sample_size_floor() {
        let model = BaggingPredictor::default();
        assert_eq!(model.sample_size(5), 10);
        assert_eq!(model.sample_size(100), 60);
        assert_eq!(model.sample_size(101), 60);
    }

    #[test]
    fn test_empty_history() {
        let model = BaggingPredictor::default();
        assert!(model.predict(&[], 5, &mut StdRng::seed_from_u64(0)).is_empty());
    }
}
