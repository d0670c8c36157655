pub mod affinity;
pub mod config;
pub mod consult;
pub mod ensemble;
pub mod patterns;
pub mod predictors;
pub mod regularity;
pub mod stats;

use bonheur_db::models::{DrawRecord, PICK_COUNT};

/// Les `k` meilleurs numéros : score décroissant, puis numéro croissant.
pub fn top_k<I>(scores: I, k: usize) -> Vec<u8>
where
    I: IntoIterator<Item = (u8, f64)>,
{
    let mut ranked: Vec<(u8, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    ranked.into_iter().take(k).map(|(n, _)| n).collect()
}

/// Tirages déterministes, du plus récent au plus ancien.
pub fn make_test_draws(n: usize) -> Vec<DrawRecord> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default();
    (0..n)
        .map(|i| {
            let base = (i * 7) % 90;
            let pick = |offset: usize| -> [u8; PICK_COUNT] {
                std::array::from_fn(|k| ((base + offset + k * 17) % 90 + 1) as u8)
            };
            let date = start - chrono::Duration::days(i as i64);
            DrawRecord {
                draw_name: "Reveil".to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                winning: pick(0),
                machine: if i % 2 == 0 { Some(pick(3)) } else { None },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonheur_db::models::validate_record;

    #[test]
    fn test_top_k_tie_break() {
        let ranked = top_k(vec![(9, 1.0), (3, 2.0), (5, 1.0), (1, 0.5)], 3);
        assert_eq!(ranked, vec![3, 5, 9]);
    }

    #[test]
    fn test_top_k_short_input() {
        assert_eq!(top_k(vec![(4, -1.0), (2, -1.0)], 5), vec![2, 4]);
        assert!(top_k(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_make_test_draws_valid() {
        let draws = make_test_draws(120);
        assert_eq!(draws.len(), 120);
        assert_eq!(draws[0].date, "2024-06-30");
        assert_eq!(draws[1].date, "2024-06-29");
        for d in &draws {
            validate_record(d).unwrap();
        }
        assert!(draws[0].machine.is_some());
        assert!(draws[1].machine.is_none());
    }
}
