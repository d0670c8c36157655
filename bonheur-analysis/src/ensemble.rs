use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use bonheur_db::models::DrawRecord;

use crate::config::AnalysisConfig;
use crate::predictors::bagging::BaggingPredictor;
use crate::predictors::conditional::ConditionalPredictor;
use crate::predictors::neural::neural_predictor;
use crate::predictors::rules::RulePredictor;
use crate::predictors::{Method, Predictor};
use crate::top_k;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub method: Method,
    pub numbers: Vec<u8>,
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(method: Method, numbers: Vec<u8>) -> Self {
        Self { method, numbers, confidence: method.confidence() }
    }
}

/// Rang i (0 = meilleur) d'une liste de méthode : (k - i) × multiplicateur.
/// Les entrées sans multiplicateur (l'hybride) sont ignorées.
pub fn combine(results: &[PredictionResult], k: usize) -> Vec<u8> {
    let mut scores: BTreeMap<u8, f64> = BTreeMap::new();
    for result in results {
        let Some(weight) = result.method.ensemble_weight() else {
            continue;
        };
        for (i, &n) in result.numbers.iter().take(k).enumerate() {
            *scores.entry(n).or_insert(0.0) += (k - i) as f64 * weight;
        }
    }
    top_k(scores, k)
}

pub struct HybridEnsemble {
    pub predictors: Vec<Box<dyn Predictor>>,
    pub min_history: usize,
    pub top_k: usize,
}

impl HybridEnsemble {
    pub fn new(predictors: Vec<Box<dyn Predictor>>, min_history: usize, top_k: usize) -> Self {
        Self { predictors, min_history, top_k }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        let predictors: Vec<Box<dyn Predictor>> = vec![
            Box::new(BaggingPredictor::new(config.bagging.clone())),
            Box::new(RulePredictor::new(config.rules.clone())),
            neural_predictor(config.neural_backend, &config.network, &config.sequence),
            Box::new(ConditionalPredictor::new()),
        ];
        Self::new(predictors, config.min_history, config.top_k)
    }

    /// Une entrée par méthode puis l'hybride. Vide si l'historique est trop court.
    /// draws[0] = tirage le plus récent.
    pub fn generate(&self, draws: &[DrawRecord], rng: &mut dyn RngCore) -> Vec<PredictionResult> {
        if draws.len() < self.min_history {
            log::info!(
                "{} tirages, {} requis : pas de prédiction",
                draws.len(),
                self.min_history
            );
            return Vec::new();
        }

        let mut results: Vec<PredictionResult> = self
            .predictors
            .iter()
            .map(|p| {
                let numbers = p.predict(draws, self.top_k, rng);
                log::debug!("{} : {:?}", p.method().label(), numbers);
                PredictionResult::new(p.method(), numbers)
            })
            .collect();

        let hybrid = combine(&results, self.top_k);
        results.push(PredictionResult::new(Method::Hybrid, hybrid));
        results
    }
}

pub fn generate_predictions(
    draws: &[DrawRecord],
    config: &AnalysisConfig,
    rng: &mut dyn RngCore,
) -> Vec<PredictionResult> {
    HybridEnsemble::from_config(config).generate(draws, rng)
}

/// Liste de candidats d'une méthode, si présente.
pub fn numbers_for(results: &[PredictionResult], method: Method) -> Option<&[u8]> {
    results.iter().find(|r| r.method == method).map(|r| r.numbers.as_slice())
}
