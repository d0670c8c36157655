use bonheur_db::models::{DrawRecord, POOL_SIZE};

use crate::affinity::{DayAffinity, compute_day_affinity};
use crate::ensemble::{PredictionResult, numbers_for};
use crate::predictors::Method;
use crate::stats::{NumberStat, find_stat};

/// Nombre de partenaires affichés par la fiche numéro.
pub const CONSULT_PARTNERS: usize = 5;

/// Fiche de consultation d'un numéro.
#[derive(Debug, Clone)]
pub struct Consultation {
    pub stat: NumberStat,
    pub top_partners: Vec<(u8, u32)>,
    pub top_next_partners: Vec<(u8, u32)>,
    pub affinity: Vec<DayAffinity>,
    pub in_hybrid: bool,
    pub in_bayesian: bool,
}

impl Consultation {
    /// Jour de la semaine où le numéro sort le plus, s'il est déjà sorti.
    pub fn best_day(&self) -> Option<&DayAffinity> {
        self.affinity
            .iter()
            .filter(|a| a.count > 0)
            .fold(None, |best: Option<&DayAffinity>, a| match best {
                Some(b) if b.count >= a.count => Some(b),
                _ => Some(a),
            })
    }
}

/// `None` si `target` est hors de 1-90.
pub fn consult(
    draws: &[DrawRecord],
    stats: &[NumberStat],
    predictions: &[PredictionResult],
    target: u8,
) -> Option<Consultation> {
    if !(1..=POOL_SIZE).contains(&target) {
        return None;
    }

    let stat = find_stat(stats, target)
        .cloned()
        .unwrap_or_else(|| NumberStat::empty(target));
    let listed = |method| numbers_for(predictions, method).is_some_and(|n| n.contains(&target));

    Some(Consultation {
        top_partners: stat.top_partners(CONSULT_PARTNERS),
        top_next_partners: stat.top_next_partners(CONSULT_PARTNERS),
        affinity: compute_day_affinity(draws, target),
        in_hybrid: listed(Method::Hybrid),
        in_bayesian: listed(Method::Bayesian),
        stat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use chrono::Weekday;

    fn draw(date: &str, winning: [u8; 5]) -> DrawRecord {
        DrawRecord {
            draw_name: "Reveil".to_string(),
            date: date.to_string(),
            winning,
            machine: None,
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(consult(&[], &[], &[], 0).is_none());
        assert!(consult(&[], &[], &[], 91).is_none());
    }

    #[test]
    fn test_unknown_number_zero_state() {
        let c = consult(&[], &[], &[], 42).unwrap();
        assert_eq!(c.stat, NumberStat::empty(42));
        assert!(c.top_partners.is_empty());
        assert!(c.best_day().is_none());
        assert!(!c.in_hybrid && !c.in_bayesian);
    }

    #[test]
    fn test_full_consultation() {
        let draws = vec![
            draw("2024-01-08", [7, 1, 2, 3, 4]),  // lundi
            draw("2024-01-02", [7, 1, 20, 21, 22]), // mardi
            draw("2024-01-01", [7, 1, 30, 31, 32]), // lundi
        ];
        let stats = compute_stats(&draws);
        let predictions = vec![
            PredictionResult::new(Method::Bayesian, vec![7, 9]),
            PredictionResult::new(Method::Hybrid, vec![1, 2]),
        ];
        let c = consult(&draws, &stats, &predictions, 7).unwrap();
        assert_eq!(c.stat.frequency, 3);
        assert_eq!(c.top_partners[0], (1, 3));
        assert_eq!(c.top_partners.len(), 5);
        assert_eq!(c.best_day().map(|a| a.weekday), Some(Weekday::Mon));
        assert!(c.in_bayesian);
        assert!(!c.in_hybrid);
    }
}
