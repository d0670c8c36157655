use std::collections::{BTreeMap, HashMap};

use rand::RngCore;

use bonheur_db::models::DrawRecord;

use super::{Method, Predictor};
use crate::config::SequenceParams;
use crate::top_k;

/// Pondération temporelle : poids 1 / (1 + decay·t) pour le tirage d'indice t.
pub struct TimeDecayPredictor {
    params: SequenceParams,
}

impl TimeDecayPredictor {
    pub fn new(params: SequenceParams) -> Self {
        Self { params }
    }

    pub fn weights(&self, draws: &[DrawRecord]) -> BTreeMap<u8, f64> {
        let mut weights = BTreeMap::new();
        for (t, draw) in draws.iter().take(self.params.window).enumerate() {
            let w = 1.0 / (1.0 + self.params.decay * t as f64);
            for &n in &draw.winning {
                *weights.entry(n).or_insert(0.0) += w;
            }
        }
        weights
    }
}

impl Default for TimeDecayPredictor {
    fn default() -> Self {
        Self::new(SequenceParams::default())
    }
}

impl Predictor for TimeDecayPredictor {
    fn method(&self) -> Method {
        Method::NeuralNetwork
    }

    fn predict(&self, draws: &[DrawRecord], k: usize, _rng: &mut dyn RngCore) -> Vec<u8> {
        top_k(self.weights(draws), k)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("window".to_string(), self.params.window as f64),
            ("decay".to_string(), self.params.decay),
        ])
    }
}
