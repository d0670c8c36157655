use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    pub momentum: f64,
    pub iterations: usize,
    /// Erreur quadratique moyenne en dessous de laquelle l'entraînement s'arrête.
    pub error_threshold: f64,
    /// Nombre de tirages récents utilisés comme jeu d'entraînement.
    pub training_window: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![10, 10],
            learning_rate: 0.3,
            momentum: 0.1,
            iterations: 100,
            error_threshold: 0.02,
            training_window: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub iterations: usize,
    pub error: f64,
}
