use std::collections::HashMap;

use anyhow::Result;
use rand::RngCore;

use bonheur_db::models::DrawRecord;
use bonheur_nn::config::NetConfig;
use bonheur_nn::encoding::{INPUT_DIM, encode_numbers, top_numbers};
use bonheur_nn::network::{FeedForward, Sample};

use super::sequence::TimeDecayPredictor;
use super::{Method, Predictor};
use crate::config::{NeuralBackend, SequenceParams};

/// Historique minimal pour entraîner le réseau.
const MIN_TRAINING_DRAWS: usize = 10;

/// Réseau entraîné à prédire le tirage suivant à partir du précédent.
/// Retombe sur la pondération temporelle si l'historique est trop court.
pub struct FeedForwardPredictor {
    config: NetConfig,
    fallback: TimeDecayPredictor,
}

impl FeedForwardPredictor {
    pub fn new(config: NetConfig, fallback: SequenceParams) -> Self {
        Self {
            config,
            fallback: TimeDecayPredictor::new(fallback),
        }
    }

    fn train_and_run(&self, draws: &[DrawRecord], k: usize, rng: &mut dyn RngCore) -> Result<Vec<u8>> {
        // Du plus ancien au plus récent
        let window: Vec<&DrawRecord> = draws.iter().take(self.config.training_window).rev().collect();
        let samples: Vec<Sample> = window
            .windows(2)
            .map(|pair| Sample {
                input: encode_numbers(&pair[0].winning),
                target: encode_numbers(&pair[1].winning),
            })
            .collect();

        let mut sizes = vec![INPUT_DIM];
        sizes.extend(&self.config.hidden_layers);
        sizes.push(INPUT_DIM);

        let mut net = FeedForward::new(&sizes, rng)?;
        let report = net.train(&samples, &self.config)?;
        log::debug!(
            "réseau : {} échantillons, {} itérations, erreur={:.4}",
            samples.len(),
            report.iterations,
            report.error
        );

        let output = net.run(&encode_numbers(&draws[0].winning))?;
        Ok(top_numbers(&output, k))
    }
}

impl Default for FeedForwardPredictor {
    fn default() -> Self {
        Self::new(NetConfig::default(), SequenceParams::default())
    }
}

impl Predictor for FeedForwardPredictor {
    fn method(&self) -> Method {
        Method::NeuralNetwork
    }

    fn predict(&self, draws: &[DrawRecord], k: usize, rng: &mut dyn RngCore) -> Vec<u8> {
        if draws.len() < MIN_TRAINING_DRAWS {
            return self.fallback.predict(draws, k, rng);
        }
        match self.train_and_run(draws, k, rng) {
            Ok(numbers) => numbers,
            Err(e) => {
                log::warn!("réseau indisponible, pondération temporelle utilisée : {:#}", e);
                self.fallback.predict(draws, k, rng)
            }
        }
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("learning_rate".to_string(), self.config.learning_rate),
            ("momentum".to_string(), self.config.momentum),
            ("iterations".to_string(), self.config.iterations as f64),
            ("training_window".to_string(), self.config.training_window as f64),
        ])
    }
}

/// Emplacement "Neural Network" sans modèle : aucun candidat.
pub struct DisabledPredictor;

impl Predictor for DisabledPredictor {
    fn method(&self) -> Method {
        Method::NeuralNetwork
    }

    fn predict(&self, _draws: &[DrawRecord], _k: usize, _rng: &mut dyn RngCore) -> Vec<u8> {
        Vec::new()
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::new()
    }
}

/// Construit l'implémentation "Neural Network" choisie.
pub fn neural_predictor(backend: NeuralBackend, net: &NetConfig, sequence: &SequenceParams) -> Box<dyn Predictor> {
    match backend {
        NeuralBackend::TimeDecay => Box::new(TimeDecayPredictor::new(sequence.clone())),
        NeuralBackend::FeedForward => Box::new(FeedForwardPredictor::new(net.clone(), sequence.clone())),
        NeuralBackend::Disabled => Box::new(DisabledPredictor),
    }
}
