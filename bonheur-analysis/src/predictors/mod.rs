pub mod bagging;
pub mod conditional;
pub mod neural;
pub mod rules;
pub mod sequence;

use std::collections::HashMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use bonheur_db::models::DrawRecord;

/// Méthode de prédiction, avec le libellé et la confiance affichés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    RandomForest,
    DecisionTree,
    NeuralNetwork,
    Bayesian,
    Hybrid,
}

impl Method {
    pub const BASE: [Method; 4] = [
        Method::RandomForest,
        Method::DecisionTree,
        Method::NeuralNetwork,
        Method::Bayesian,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Method::RandomForest => "Random Forest",
            Method::DecisionTree => "Decision Tree",
            Method::NeuralNetwork => "Neural Network",
            Method::Bayesian => "Bayesian Analysis",
            Method::Hybrid => "Hybrid",
        }
    }

    /// Constante fixe par méthode, indépendante des données.
    pub fn confidence(&self) -> f64 {
        match self {
            Method::RandomForest => 0.75,
            Method::DecisionTree => 0.68,
            Method::NeuralNetwork => 0.72,
            Method::Bayesian => 0.82,
            Method::Hybrid => 0.91,
        }
    }

    /// Multiplicateur dans la combinaison hybride ; `None` pour l'hybride lui-même.
    pub fn ensemble_weight(&self) -> Option<f64> {
        match self {
            Method::RandomForest => Some(1.0),
            Method::DecisionTree => Some(0.8),
            Method::NeuralNetwork => Some(1.2),
            Method::Bayesian => Some(1.5),
            Method::Hybrid => None,
        }
    }
}

pub trait Predictor: Send + Sync {
    fn method(&self) -> Method;
    /// draws[0] = tirage le plus récent. Retourne au plus `k` numéros, le plus favorable en premier.
    fn predict(&self, draws: &[DrawRecord], k: usize, rng: &mut dyn RngCore) -> Vec<u8>;
    fn params(&self) -> HashMap<String, f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_constants() {
        assert_eq!(Method::RandomForest.confidence(), 0.75);
        assert_eq!(Method::DecisionTree.confidence(), 0.68);
        assert_eq!(Method::NeuralNetwork.confidence(), 0.72);
        assert_eq!(Method::Bayesian.confidence(), 0.82);
        assert_eq!(Method::Hybrid.confidence(), 0.91);
    }

    #[test]
    fn test_only_base_methods_weighted() {
        for m in Method::BASE {
            assert!(m.ensemble_weight().is_some());
        }
        assert_eq!(Method::Hybrid.ensemble_weight(), None);
        assert_eq!(Method::Bayesian.label(), "Bayesian Analysis");
    }
}
