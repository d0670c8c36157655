use std::collections::BTreeMap;

use bonheur_db::models::{DrawRecord, POOL_SIZE};

/// Statistiques d'un numéro sur une liste de tirages (plus récent en premier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberStat {
    pub number: u8,
    pub frequency: u32,
    /// Indice de la dernière sortie ; `None` si le numéro n'est jamais sorti.
    pub last_seen: Option<usize>,
    /// Numéros sortis dans le même tirage.
    pub partners: BTreeMap<u8, u32>,
    /// Numéros sortis au tirage suivant (chronologiquement).
    pub next_partners: BTreeMap<u8, u32>,
}

impl NumberStat {
    pub fn empty(number: u8) -> Self {
        Self {
            number,
            frequency: 0,
            last_seen: None,
            partners: BTreeMap::new(),
            next_partners: BTreeMap::new(),
        }
    }

    pub fn top_partners(&self, k: usize) -> Vec<(u8, u32)> {
        top_counts(&self.partners, k)
    }

    pub fn top_next_partners(&self, k: usize) -> Vec<(u8, u32)> {
        top_counts(&self.next_partners, k)
    }
}

fn top_counts(map: &BTreeMap<u8, u32>, k: usize) -> Vec<(u8, u32)> {
    let mut entries: Vec<(u8, u32)> = map.iter().map(|(&n, &c)| (n, c)).collect();
    // Tri stable : à compte égal, l'ordre croissant des numéros est conservé
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(k);
    entries
}

/// Calcule fréquence, dernière sortie et partenaires des 90 numéros.
/// `draws[0]` = tirage le plus récent. Résultat trié par fréquence décroissante,
/// puis par numéro croissant.
pub fn compute_stats(draws: &[DrawRecord]) -> Vec<NumberStat> {
    let mut stats: Vec<NumberStat> = (1..=POOL_SIZE).map(NumberStat::empty).collect();

    for (idx, draw) in draws.iter().enumerate() {
        for &n in &draw.winning {
            let Some(stat) = stats.get_mut((n as usize).wrapping_sub(1)) else {
                continue;
            };
            stat.frequency += 1;
            if stat.last_seen.is_none() {
                stat.last_seen = Some(idx);
            }

            for &partner in &draw.winning {
                if partner != n {
                    *stat.partners.entry(partner).or_insert(0) += 1;
                }
            }

            // draws[idx - 1] est le tirage qui a suivi celui-ci
            if idx > 0 {
                for &next in &draws[idx - 1].winning {
                    *stat.next_partners.entry(next).or_insert(0) += 1;
                }
            }
        }
    }

    stats.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    stats
}

/// Recherche la statistique d'un numéro dans une liste déjà calculée.
pub fn find_stat(stats: &[NumberStat], number: u8) -> Option<&NumberStat> {
    stats.iter().find(|s| s.number == number)
}

/// Numéros au plus long écart actuel. Les numéros jamais sortis viennent en dernier.
pub fn overdue_numbers(stats: &[NumberStat], k: usize) -> Vec<&NumberStat> {
    let mut sorted: Vec<&NumberStat> = stats.iter().collect();
    sorted.sort_by(|a, b| b.last_seen.cmp(&a.last_seen).then(a.number.cmp(&b.number)));
    sorted.truncate(k);
    sorted
}

/// Cellule de la carte thermique : intensité = fréquence / fréquence maximale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub number: u8,
    pub frequency: u32,
    pub intensity: f64,
}

/// Carte thermique des 90 numéros, dans l'ordre numérique.
pub fn heatmap(stats: &[NumberStat]) -> Vec<HeatCell> {
    let max = stats.iter().map(|s| s.frequency).max().unwrap_or(0).max(1);
    let mut cells: Vec<HeatCell> = stats
        .iter()
        .map(|s| HeatCell {
            number: s.number,
            frequency: s.frequency,
            intensity: s.frequency as f64 / max as f64,
        })
        .collect();
    cells.sort_by_key(|c| c.number);
    cells
}
