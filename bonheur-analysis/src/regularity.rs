use bonheur_db::models::{DrawRecord, POOL_SIZE};

use crate::config::RegularityParams;

/// Régularité du cycle de sortie d'un numéro.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularityStat {
    pub number: u8,
    /// Écarts entre sorties consécutives, du plus récent au plus ancien.
    pub gaps: Vec<usize>,
    /// Écart moyen, arrondi à 0.1.
    pub avg_gap: f64,
    /// Écart-type (population) des écarts, arrondi à 0.01. 0 = parfaitement régulier.
    pub consistency: f64,
    /// Tirages restants avant la prochaine sortie attendue ; <= 0 signifie en retard.
    pub next_expected_in: i64,
}

impl RegularityStat {
    pub fn is_overdue(&self) -> bool {
        self.next_expected_in <= 0
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn analyze_regularity(draws: &[DrawRecord]) -> Vec<RegularityStat> {
    analyze_regularity_with(draws, &RegularityParams::default())
}

/// Numéros au cycle stable sur la fenêtre récente, du plus régulier au moins régulier.
pub fn analyze_regularity_with(draws: &[DrawRecord], params: &RegularityParams) -> Vec<RegularityStat> {
    let window = &draws[..params.window.min(draws.len())];
    let mut results = Vec::new();

    for number in 1..=POOL_SIZE {
        let appearances: Vec<usize> = window
            .iter()
            .enumerate()
            .filter(|(_, d)| d.contains(number))
            .map(|(i, _)| i)
            .collect();

        if appearances.len() < params.min_occurrences.max(2) {
            continue;
        }

        let gaps: Vec<usize> = appearances
            .windows(2)
            .map(|w| w[1] - w[0])
            .take(params.max_gaps)
            .collect();
        if gaps.is_empty() {
            continue;
        }

        let n = gaps.len() as f64;
        let mean = gaps.iter().sum::<usize>() as f64 / n;
        let variance = gaps.iter().map(|&g| (g as f64 - mean).powi(2)).sum::<f64>() / n;
        let consistency = round_to(variance.sqrt(), 2);

        // Le seuil s'applique à la valeur publiée
        if consistency >= params.threshold {
            continue;
        }

        let current_gap = appearances[0] as i64;
        results.push(RegularityStat {
            number,
            gaps,
            avg_gap: round_to(mean, 1),
            consistency,
            next_expected_in: mean.round() as i64 - current_gap,
        });
    }

    results.sort_by(|a, b| {
        a.consistency
            .partial_cmp(&b.consistency)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.number.cmp(&b.number))
    });
    results
}
