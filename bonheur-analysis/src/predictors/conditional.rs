use std::collections::{BTreeMap, HashMap};

use rand::RngCore;

use bonheur_db::models::DrawRecord;

use super::{Method, Predictor};
use crate::top_k;

/// "Bayesian" : transitions historiques dont le tirage de départ ressemble au dernier tirage.
#[derive(Default)]
pub struct ConditionalPredictor;

impl ConditionalPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Poids matches² / (i + 1) reporté sur les numéros de draws[i]
    /// quand draws[i + 1] partage `matches` numéros avec draws[0].
    pub fn scores(&self, draws: &[DrawRecord]) -> BTreeMap<u8, f64> {
        let mut scores = BTreeMap::new();
        let Some(last) = draws.first() else {
            return scores;
        };

        for (i, pair) in draws.windows(2).enumerate() {
            let (current, previous) = (&pair[0], &pair[1]);
            let matches = previous.winning.iter().filter(|&&n| last.contains(n)).count();
            if matches == 0 {
                continue;
            }
            let weight = (matches * matches) as f64 / (i + 1) as f64;
            for &n in &current.winning {
                *scores.entry(n).or_insert(0.0) += weight;
            }
        }
        scores
    }
}

impl Predictor for ConditionalPredictor {
    fn method(&self) -> Method {
        Method::Bayesian
    }

    fn predict(&self, draws: &[DrawRecord], k: usize, _rng: &mut dyn RngCore) -> Vec<u8> {
        if draws.len() < 2 {
            return Vec::new();
        }
        top_k(self.scores(draws), k)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn draw(winning: [u8; 5]) -> DrawRecord {
        DrawRecord {
            draw_name: "Prestige".to_string(),
            date: "2024-01-01".to_string(),
            winning,
            machine: None,
        }
    }

    #[test]
    fn test_needs_two_draws() {
        let model = ConditionalPredictor::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(model.predict(&[], 5, &mut rng).is_empty());
        assert!(model.predict(&[draw([1, 2, 3, 4, 5])], 5, &mut rng).is_empty());
    }

    #[test]
    fn test_quadratic_weight_and_decay() {
        let draws = vec![
            draw([1, 2, 3, 4, 5]),
            draw([10, 11, 12, 13, 14]),
            draw([1, 2, 20, 21, 22]),
            draw([30, 31, 32, 33, 34]),
            draw([1, 40, 41, 42, 43]),
        ];
        let scores = ConditionalPredictor::new().scores(&draws);
        // i = 1 : draws[2] partage 2 numéros → 4 / 2 sur draws[1]
        assert!((scores[&10] - 2.0).abs() < 1e-12);
        // i = 3 : draws[4] partage 1 numéro → 1 / 4 sur draws[3]
        assert!((scores[&30] - 0.25).abs() < 1e-12);
        // i = 0 : draws[1] ne partage rien
        assert!(!scores.contains_key(&1));
        assert!(!scores.contains_key(&20));
    }

    #[test]
    fn test_ranking() {
        let draws = vec![
            draw([1, 2, 3, 4, 5]),
            draw([10, 11, 12, 13, 14]),
            draw([1, 2, 20, 21, 22]),
            draw([30, 31, 32, 33, 34]),
            draw([1, 40, 41, 42, 43]),
        ];
        let result = ConditionalPredictor::new().predict(&draws, 5, &mut StdRng::seed_from_u64(0));
        assert_eq!(result, vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_deterministic() {
        let draws = make_test_draws(80);
        let model = ConditionalPredictor::new();
        let a = model.predict(&draws, 5, &mut StdRng::seed_from_u64(1));
        let b = model.predict(&draws, 5, &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
    }
}
