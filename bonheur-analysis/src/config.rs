use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bonheur_nn::config::NetConfig;

/// Historique minimal avant de générer des prédictions.
pub const MIN_HISTORY: usize = 10;
/// Taille des listes de candidats.
pub const TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaggingParams {
    pub trees: usize,
    pub sample_ratio: f64,
    pub min_sample: usize,
    pub votes_per_tree: usize,
}

impl Default for BaggingParams {
    fn default() -> Self {
        Self {
            trees: 10,
            sample_ratio: 0.6,
            min_sample: 10,
            votes_per_tree: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleParams {
    pub hot_gap: usize,
    pub hot_ratio: f64,
    pub hot_bonus: f64,
    pub due_ratio: f64,
    pub due_bonus: f64,
    pub cold_gap: usize,
    pub cold_penalty: f64,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            hot_gap: 5,
            hot_ratio: 0.1,
            hot_bonus: 10.0,
            due_ratio: 0.05,
            due_bonus: 15.0,
            cold_gap: 30,
            cold_penalty: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceParams {
    pub window: usize,
    pub decay: f64,
}

impl Default for SequenceParams {
    fn default() -> Self {
        Self { window: 30, decay: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegularityParams {
    pub window: usize,
    pub min_occurrences: usize,
    pub max_gaps: usize,
    /// Écart-type maximal (exclu) pour qu'un numéro soit jugé régulier.
    pub threshold: f64,
}

impl Default for RegularityParams {
    fn default() -> Self {
        Self {
            window: 200,
            min_occurrences: 3,
            max_gaps: 5,
            threshold: 2.5,
        }
    }
}

/// Implémentation du modèle "Neural Network".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeuralBackend {
    #[default]
    TimeDecay,
    FeedForward,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_history: usize,
    pub top_k: usize,
    pub bagging: BaggingParams,
    pub rules: RuleParams,
    pub sequence: SequenceParams,
    pub regularity: RegularityParams,
    pub neural_backend: NeuralBackend,
    pub network: NetConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_history: MIN_HISTORY,
            top_k: TOP_K,
            bagging: BaggingParams::default(),
            rules: RuleParams::default(),
            sequence: SequenceParams::default(),
            regularity: RegularityParams::default(),
            neural_backend: NeuralBackend::default(),
            network: NetConfig::default(),
        }
    }
}

/// Charge la configuration ; un fichier absent donne la configuration par défaut.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        log::debug!("pas de fichier {:?}, configuration par défaut", path);
        return Ok(AnalysisConfig::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: AnalysisConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    Ok(config)
}

pub fn save_config(config: &AnalysisConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}
