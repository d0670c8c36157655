use chrono::{Datelike, NaiveDate, Weekday};

use bonheur_db::models::DrawRecord;
use bonheur_db::schedule::french_day;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAffinity {
    pub weekday: Weekday,
    pub count: u32,
}

impl DayAffinity {
    pub fn day(&self) -> &'static str {
        french_day(self.weekday)
    }
}

/// Nombre de sorties de `target` par jour de la semaine, du lundi au dimanche.
/// Les dates illisibles sont ignorées.
pub fn compute_day_affinity(draws: &[DrawRecord], target: u8) -> Vec<DayAffinity> {
    let mut counts = [0u32; 7];

    for draw in draws.iter().filter(|d| d.contains(target)) {
        match NaiveDate::parse_from_str(&draw.date, "%Y-%m-%d") {
            Ok(date) => counts[date.weekday().num_days_from_monday() as usize] += 1,
            Err(e) => log::debug!("date ignorée '{}' ({}): {}", draw.date, draw.draw_name, e),
        }
    }

    WEEK.iter()
        .zip(counts)
        .map(|(&weekday, count)| DayAffinity { weekday, count })
        .collect()
}
