use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::import::ImportResult;
use bonheur_analysis::consult::Consultation;
use bonheur_analysis::ensemble::PredictionResult;
use bonheur_analysis::patterns::PatternStat;
use bonheur_analysis::regularity::RegularityStat;
use bonheur_analysis::stats::{HeatCell, NumberStat};
use bonheur_db::models::DrawRecord;
use bonheur_db::schedule::{DaySchedule, french_day};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Couleur d'une boule selon sa dizaine.
pub fn ball_color(n: u8) -> Color {
    match n {
        1..=9 => Color::White,
        10..=19 => Color::DarkBlue,
        20..=29 => Color::DarkGreen,
        30..=39 => Color::Blue,
        40..=49 => Color::DarkYellow,
        50..=59 => Color::Magenta,
        60..=69 => Color::Yellow,
        70..=79 => Color::Grey,
        80..=90 => Color::Red,
        _ => Color::DarkGrey,
    }
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn format_last_seen(stat: &NumberStat) -> String {
    match stat.last_seen {
        Some(gap) => gap.to_string(),
        None => "jamais".to_string(),
    }
}

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Tirage", "Gagnants", "Machine"]);
    for draw in draws {
        let machine = draw
            .machine
            .map(|m| format_numbers(&m))
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            draw.date.clone(),
            draw.draw_name.clone(),
            format_numbers(&draw.winning),
            machine,
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Mis à jour        : {}", result.updated);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_schedule(days: &[DaySchedule]) {
    let mut table = new_table(vec!["Jour", "Heure", "Tirage"]);
    for day in days {
        for slot in day.slots {
            table.add_row(vec![french_day(day.weekday), slot.time, slot.name]);
        }
    }
    println!("{table}");
}

pub fn display_patterns(patterns: &PatternStat) {
    println!("── Tendances ──");
    println!(
        "  Pairs / Impairs : {} / {} ({}% pairs)",
        patterns.even,
        patterns.odd,
        patterns.even_percent()
    );
    println!(
        "  Bas / Hauts     : {} / {} ({}% entre 1 et 45)",
        patterns.low,
        patterns.high,
        patterns.low_percent()
    );
    println!("  Somme moyenne   : {}", patterns.avg_sum);
}

pub fn display_frequencies(stats: &[NumberStat], limit: usize) {
    println!("\n── Numéros les plus fréquents ──");
    let mut table = new_table(vec!["Numéro", "Fréquence", "Dernière sortie"]);
    for stat in stats.iter().take(limit) {
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)).fg(ball_color(stat.number)),
            Cell::new(stat.frequency),
            Cell::new(format_last_seen(stat)),
        ]);
    }
    println!("{table}");
}

pub fn display_overdue(overdue: &[&NumberStat]) {
    println!("\n── Numéros en retard ──");
    let mut table = new_table(vec!["Numéro", "Tirages sans sortie", "Fréquence"]);
    for stat in overdue {
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)).fg(ball_color(stat.number)),
            Cell::new(format_last_seen(stat)).fg(Color::Red),
            Cell::new(stat.frequency),
        ]);
    }
    println!("{table}");
}

fn heat_color(intensity: f64) -> Color {
    if intensity > 0.75 {
        Color::DarkBlue
    } else if intensity > 0.5 {
        Color::Blue
    } else if intensity > 0.25 {
        Color::Cyan
    } else {
        Color::Grey
    }
}

/// Grille 9 × 10 des fréquences.
pub fn display_heatmap(cells: &[HeatCell]) {
    println!("\n── Carte thermique (fréquence) ──");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    for row in cells.chunks(10) {
        table.add_row(row.iter().map(|c| {
            Cell::new(format!("{:2}:{}", c.number, c.frequency)).fg(heat_color(c.intensity))
        }));
    }
    println!("{table}");
}

pub fn display_regularity(stats: &[RegularityStat]) {
    if stats.is_empty() {
        println!("Aucun numéro régulier sur la période.");
        return;
    }

    println!("\n⏱  Numéros réguliers\n");
    let mut table = new_table(vec!["Numéro", "Écarts récents", "Écart moyen", "Régularité", "Prochaine sortie"]);
    for stat in stats {
        let gaps = stat
            .gaps
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let next = if stat.is_overdue() {
            Cell::new(format!("en retard ({})", stat.next_expected_in)).fg(Color::Red)
        } else {
            Cell::new(format!("dans {} tirages", stat.next_expected_in)).fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)).fg(ball_color(stat.number)),
            Cell::new(gaps),
            Cell::new(format!("{:.1}", stat.avg_gap)),
            Cell::new(format!("{:.2}", stat.consistency)),
            next,
        ]);
    }
    println!("{table}");
}

pub fn display_predictions(results: &[PredictionResult], favorites: &[u8]) {
    if results.is_empty() {
        println!("Pas assez de tirages pour générer des prédictions.");
        return;
    }

    println!("\n🎯 Prédictions\n");
    let mut table = new_table(vec!["Méthode", "Numéros", "Confiance"]);
    for result in results {
        let numbers = if result.numbers.is_empty() {
            "—".to_string()
        } else {
            result
                .numbers
                .iter()
                .map(|n| {
                    if favorites.contains(n) {
                        format!("{:2}★", n)
                    } else {
                        format!("{:2}", n)
                    }
                })
                .collect::<Vec<_>>()
                .join(" - ")
        };
        table.add_row(vec![
            Cell::new(result.method.label()),
            Cell::new(numbers),
            Cell::new(format!("{:.0}%", result.confidence * 100.0)),
        ]);
    }
    println!("{table}");
}

pub fn display_consultation(c: &Consultation) {
    let number = c.stat.number;
    println!("\n🔎 Numéro {}\n", number);
    println!("  Fréquence       : {}", c.stat.frequency);
    println!("  Dernière sortie : {}", format_last_seen(&c.stat));
    if c.in_hybrid {
        println!("  ✔ Présent dans la prédiction hybride");
    }
    if c.in_bayesian {
        println!("  ✔ Présent dans l'analyse bayésienne");
    }

    println!("\n── Sort avec ──");
    display_partner_table(&c.top_partners);
    println!("\n── Suivi au tirage suivant par ──");
    display_partner_table(&c.top_next_partners);

    println!("\n── Affinité par jour ──");
    let mut table = new_table(vec!["Jour", "Sorties"]);
    let best = c.best_day().map(|a| a.weekday);
    for a in &c.affinity {
        let cell = Cell::new(a.count);
        let cell = if Some(a.weekday) == best { cell.fg(Color::Green) } else { cell };
        table.add_row(vec![Cell::new(a.day()), cell]);
    }
    println!("{table}");
}

fn display_partner_table(partners: &[(u8, u32)]) {
    if partners.is_empty() {
        println!("  Aucune donnée.");
        return;
    }
    let mut table = new_table(vec!["Numéro", "Fois"]);
    for &(n, count) in partners {
        table.add_row(vec![Cell::new(format!("{:2}", n)).fg(ball_color(n)), Cell::new(count)]);
    }
    println!("{table}");
}

pub fn display_favorites(favorites: &[u8]) {
    if favorites.is_empty() {
        println!("Aucun favori.");
        return;
    }
    println!("★ Favoris : {}", format_numbers(favorites));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_color_by_decade() {
        assert_eq!(ball_color(5), Color::White);
        assert_eq!(ball_color(15), Color::DarkBlue);
        assert_eq!(ball_color(80), Color::Red);
        assert_eq!(ball_color(90), Color::Red);
        assert_eq!(ball_color(0), Color::DarkGrey);
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 45, 90]), " 3 - 45 - 90");
        assert_eq!(format_numbers(&[]), "");
    }

    #[test]
    fn test_heat_color_thresholds() {
        assert_eq!(heat_color(1.0), Color::DarkBlue);
        assert_eq!(heat_color(0.6), Color::Blue);
        assert_eq!(heat_color(0.0), Color::Grey);
    }
}
