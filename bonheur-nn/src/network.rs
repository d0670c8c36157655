use anyhow::{Result, bail};
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, RngCore};

use crate::config::{NetConfig, TrainReport};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Perceptron multicouche à activations sigmoïdes, entraîné par rétropropagation
/// échantillon par échantillon avec momentum.
pub struct FeedForward {
    weights: Vec<Array2<f64>>,
    biases: Vec<Array1<f64>>,
    changes: Vec<Array2<f64>>,
}

pub struct Sample {
    pub input: Array1<f64>,
    pub target: Array1<f64>,
}

impl FeedForward {
    /// `sizes` = [entrée, cachées..., sortie]. Poids initiaux uniformes dans [-0.2, 0.2).
    pub fn new(sizes: &[usize], rng: &mut dyn RngCore) -> Result<Self> {
        if sizes.len() < 2 || sizes.iter().any(|&s| s == 0) {
            bail!("Architecture invalide : {:?}", sizes);
        }

        let mut weights = Vec::with_capacity(sizes.len() - 1);
        let mut biases = Vec::with_capacity(sizes.len() - 1);
        let mut changes = Vec::with_capacity(sizes.len() - 1);

        for pair in sizes.windows(2) {
            let (n_in, n_out) = (pair[0], pair[1]);
            weights.push(Array2::from_shape_fn((n_out, n_in), |_| rng.random::<f64>() * 0.4 - 0.2));
            biases.push(Array1::from_shape_fn(n_out, |_| rng.random::<f64>() * 0.4 - 0.2));
            changes.push(Array2::zeros((n_out, n_in)));
        }

        Ok(Self { weights, biases, changes })
    }

    pub fn input_dim(&self) -> usize {
        self.weights[0].ncols()
    }

    pub fn output_dim(&self) -> usize {
        self.weights[self.weights.len() - 1].nrows()
    }

    /// Activations de chaque couche, entrée comprise.
    fn forward(&self, input: &Array1<f64>) -> Vec<Array1<f64>> {
        let mut activations = Vec::with_capacity(self.weights.len() + 1);
        activations.push(input.clone());
        for (w, b) in self.weights.iter().zip(self.biases.iter()) {
            let prev = &activations[activations.len() - 1];
            let next = (w.dot(prev) + b).mapv(sigmoid);
            activations.push(next);
        }
        activations
    }

    pub fn run(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        if input.len() != self.input_dim() {
            bail!("Entrée de dimension {} (attendu {})", input.len(), self.input_dim());
        }
        let mut activations = self.forward(input);
        Ok(activations.pop().unwrap_or_default())
    }

    fn train_sample(&mut self, sample: &Sample, learning_rate: f64, momentum: f64) -> f64 {
        let activations = self.forward(&sample.input);
        let n_layers = self.weights.len();
        let output = &activations[n_layers];

        let errors = &sample.target - output;
        let mse = errors.mapv(|e| e * e).sum() / errors.len() as f64;

        // Deltas de la couche de sortie vers l'entrée
        let mut delta = &errors * &output.mapv(|o| o * (1.0 - o));
        for layer in (0..n_layers).rev() {
            let prev = &activations[layer];
            let next_delta = if layer > 0 {
                let back = self.weights[layer].t().dot(&delta);
                Some(back * prev.mapv(|a| a * (1.0 - a)))
            } else {
                None
            };

            let gradient = delta
                .view()
                .insert_axis(Axis(1))
                .dot(&prev.view().insert_axis(Axis(0)));
            let change = gradient * learning_rate + &self.changes[layer] * momentum;
            self.weights[layer] += &change;
            self.changes[layer] = change;
            self.biases[layer].scaled_add(learning_rate, &delta);

            if let Some(d) = next_delta {
                delta = d;
            }
        }

        mse
    }

    pub fn train(&mut self, samples: &[Sample], config: &NetConfig) -> Result<TrainReport> {
        if samples.is_empty() {
            bail!("Aucun échantillon d'entraînement");
        }
        for s in samples {
            if s.input.len() != self.input_dim() || s.target.len() != self.output_dim() {
                bail!(
                    "Échantillon de dimensions {}→{} (attendu {}→{})",
                    s.input.len(),
                    s.target.len(),
                    self.input_dim(),
                    self.output_dim()
                );
            }
        }

        let mut error = f64::MAX;
        let mut iterations = 0;
        while iterations < config.iterations && error > config.error_threshold {
            let total: f64 = samples
                .iter()
                .map(|s| self.train_sample(s, config.learning_rate, config.momentum))
                .sum();
            error = total / samples.len() as f64;
            iterations += 1;
        }

        log::debug!("réseau entraîné : {} itérations, erreur={:.4}", iterations, error);
        Ok(TrainReport { iterations, error })
    }
}
