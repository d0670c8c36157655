use std::collections::HashMap;

use rand::RngCore;

use bonheur_db::models::DrawRecord;

use super::{Method, Predictor};
use crate::config::RuleParams;
use crate::stats::{NumberStat, compute_stats};
use crate::top_k;

/// "Decision Tree" : règles fixes sur l'écart actuel et la fréquence.
pub struct RulePredictor {
    params: RuleParams,
}

impl RulePredictor {
    pub fn new(params: RuleParams) -> Self {
        Self { params }
    }

    /// Score d'un numéro. Un numéro jamais sorti ne déclenche aucune règle.
    pub fn score(&self, stat: &NumberStat, total_draws: usize) -> f64 {
        let Some(gap) = stat.last_seen else {
            return 0.0;
        };
        if total_draws == 0 {
            return 0.0;
        }
        let p = &self.params;
        let gap = gap as f64;
        let freq_ratio = stat.frequency as f64 / total_draws as f64;
        let avg_gap = total_draws as f64 / stat.frequency.max(1) as f64;

        let mut score = 0.0;
        if gap < p.hot_gap as f64 && freq_ratio > p.hot_ratio {
            score += p.hot_bonus;
        }
        if gap > avg_gap && gap < avg_gap * 2.0 && freq_ratio > p.due_ratio {
            score += p.due_bonus;
        }
        if gap > p.cold_gap as f64 {
            score -= p.cold_penalty;
        }
        score
    }
}

impl Default for RulePredictor {
    fn default() -> Self {
        Self::new(RuleParams::default())
    }
}

impl Predictor for RulePredictor {
    fn method(&self) -> Method {
        Method::DecisionTree
    }

    fn predict(&self, draws: &[DrawRecord], k: usize, _rng: &mut dyn RngCore) -> Vec<u8> {
        if draws.is_empty() {
            return Vec::new();
        }
        let stats = compute_stats(draws);
        top_k(stats.iter().map(|s| (s.number, self.score(s, draws.len()))), k)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("hot_gap".to_string(), self.params.hot_gap as f64),
            ("hot_bonus".to_string(), self.params.hot_bonus),
            ("due_bonus".to_string(), self.params.due_bonus),
            ("cold_gap".to_string(), self.params.cold_gap as f64),
            ("cold_penalty".to_string(), self.params.cold_penalty),
        ])
    }
}
