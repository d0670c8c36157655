use bonheur_db::models::{DrawRecord, LOW_HIGH_SPLIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternStat {
    pub even: u32,
    pub odd: u32,
    /// Numéros de 1 à 45.
    pub low: u32,
    /// Numéros de 46 à 90.
    pub high: u32,
    /// Somme moyenne d'un tirage, arrondie à l'entier.
    pub avg_sum: u32,
}

impl PatternStat {
    /// Part de numéros pairs, en pourcentage arrondi.
    pub fn even_percent(&self) -> u32 {
        percent(self.even, self.even + self.odd)
    }

    pub fn low_percent(&self) -> u32 {
        percent(self.low, self.low + self.high)
    }
}

fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Parité, moitié basse/haute et somme moyenne sur la tranche donnée.
/// Aucun fenêtrage ici : l'appelant découpe la période.
pub fn compute_patterns(draws: &[DrawRecord]) -> PatternStat {
    if draws.is_empty() {
        return PatternStat::default();
    }

    let mut stat = PatternStat::default();
    let mut sum_total = 0u64;

    for draw in draws {
        for &n in &draw.winning {
            if n % 2 == 0 {
                stat.even += 1;
            } else {
                stat.odd += 1;
            }
            if n <= LOW_HIGH_SPLIT {
                stat.low += 1;
            } else {
                stat.high += 1;
            }
            sum_total += n as u64;
        }
    }

    stat.avg_sum = (sum_total as f64 / draws.len() as f64).round() as u32;
    stat
}
