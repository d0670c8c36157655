mod display;
mod import;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use bonheur_analysis::config::{AnalysisConfig, load_config, save_config};
use bonheur_analysis::consult::consult;
use bonheur_analysis::ensemble::generate_predictions;
use bonheur_analysis::patterns::compute_patterns;
use bonheur_analysis::regularity::analyze_regularity_with;
use bonheur_analysis::stats::{compute_stats, heatmap, overdue_numbers};
use bonheur_db::db::{
    clear_draws, count_draws, db_path, delete_draw, draw_names, fetch_all_draws, fetch_draws,
    fetch_favorites, migrate, open_db, toggle_favorite, upsert_draw,
};
use bonheur_db::models::{
    AnalysisMode, DrawFilter, DrawRecord, POOL_SIZE, normalize_date, parse_numbers,
};
use bonheur_db::rusqlite::Connection;
use bonheur_db::schedule::{
    DRAW_SCHEDULE, DaySchedule, is_known_draw, parse_french_day, slots_for, suggest_draw_name,
};

use crate::display::{
    display_consultation, display_draws, display_favorites, display_frequencies, display_heatmap,
    display_import_summary, display_overdue, display_patterns, display_predictions,
    display_regularity, display_schedule,
};

/// Nombre de numéros en retard affichés.
const OVERDUE_COUNT: usize = 7;

#[derive(Parser)]
#[command(name = "bonheur", about = "Analyseur de tirages Loto Bonheur")]
struct Cli {
    /// Fichier de configuration de l'analyse (JSON)
    #[arg(long, global = true, default_value = "bonheur.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Sélection des tirages analysés.
#[derive(clap::Args, Debug, Clone)]
struct Selection {
    /// Nom du tirage (ex: Reveil). Tous les tirages si absent.
    #[arg(short, long)]
    draw: Option<String>,

    /// Analyser les numéros machine au lieu des numéros gagnants
    #[arg(short, long)]
    machine: bool,
}

impl Selection {
    fn mode(&self) -> AnalysisMode {
        if self.machine { AnalysisMode::Machine } else { AnalysisMode::Winning }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Importer des tirages (CSV séparé par ';' ou sauvegarde JSON)
    Import {
        /// Chemin vers le fichier
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Exporter tous les tirages en JSON
    Export {
        /// Fichier de sortie
        #[arg(short, long, default_value = "bonheur_backup.json")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les tirages enregistrés
    List {
        #[command(flatten)]
        selection: Selection,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,

        /// Seulement les tirages contenant ce numéro
        #[arg(short, long)]
        number: Option<u8>,

        /// Seulement les tirages de cette année (AAAA)
        #[arg(short, long)]
        year: Option<String>,
    },

    /// Ajouter ou corriger un tirage manuellement
    Add,

    /// Supprimer un tirage
    Delete {
        /// Nom du tirage
        #[arg(short, long)]
        draw: String,

        /// Date (JJ/MM/AAAA ou AAAA-MM-JJ)
        #[arg(long)]
        date: String,
    },

    /// Supprimer tous les tirages
    Clear,

    /// Afficher le programme des tirages
    Schedule {
        /// Jour (ex: lundi). Toute la semaine si absent.
        #[arg(long)]
        day: Option<String>,
    },

    /// Statistiques : tendances, fréquences, retards, carte thermique
    Stats {
        #[command(flatten)]
        selection: Selection,

        /// Nombre de tirages récents analysés (tous si absent)
        #[arg(short, long)]
        period: Option<usize>,
    },

    /// Numéros au cycle de sortie régulier
    Regularity {
        #[command(flatten)]
        selection: Selection,
    },

    /// Fiche détaillée d'un numéro
    Consult {
        /// Numéro consulté (1-90)
        number: u8,

        #[command(flatten)]
        selection: Selection,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Prédire le prochain tirage
    Predict {
        #[command(flatten)]
        selection: Selection,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Afficher ou modifier les numéros favoris
    Favorites {
        /// Ajoute le numéro s'il est absent, le retire sinon
        #[arg(short, long)]
        toggle: Option<u8>,
    },

    /// Afficher la configuration, ou l'écrire avec ses valeurs par défaut
    Config {
        /// Écrit la configuration par défaut dans ce fichier
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("BONHEUR_LOG", "warn")).init();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::Export { file } => cmd_export(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { selection, last, number, year } => cmd_list(&conn, &selection, last, number, year),
        Command::Add => cmd_add(&conn),
        Command::Delete { draw, date } => cmd_delete(&conn, &draw, &date),
        Command::Clear => cmd_clear(&conn),
        Command::Schedule { day } => cmd_schedule(day.as_deref()),
        Command::Stats { selection, period } => cmd_stats(&conn, &selection, period),
        Command::Regularity { selection } => {
            let config = load_config(&cli.config)?;
            cmd_regularity(&conn, &selection, &config)
        }
        Command::Consult { number, selection, seed } => {
            let config = load_config(&cli.config)?;
            cmd_consult(&conn, number, &selection, &config, seed)
        }
        Command::Predict { selection, seed } => {
            let config = load_config(&cli.config)?;
            cmd_predict(&conn, &selection, &config, seed)
        }
        Command::Favorites { toggle } => cmd_favorites(&conn, toggle),
        Command::Config { output } => cmd_config(&cli.config, output.as_deref()),
    }
}

fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Tirages bruts de la sélection, du plus récent au plus ancien. `None` si rien à analyser.
fn load_draws(conn: &Connection, selection: &Selection) -> Result<Option<Vec<DrawRecord>>> {
    if count_draws(conn, None)? == 0 {
        println!("Base vide. Lancez d'abord : bonheur import --file <fichier>");
        return Ok(None);
    }

    let draws = match &selection.draw {
        Some(name) => {
            if !is_known_draw(name) {
                match suggest_draw_name(name) {
                    Some(known) => log::warn!("tirage '{}' absent du programme, vouliez-vous dire '{}' ?", name, known),
                    None => log::warn!("tirage '{}' absent du programme", name),
                }
            }
            let draws = fetch_draws(conn, name)?;
            if draws.is_empty() {
                let known = draw_names(conn)?;
                println!("Aucun tirage '{}'. Tirages enregistrés : {}", name, known.join(", "));
                return Ok(None);
            }
            draws
        }
        None => fetch_all_draws(conn)?,
    };
    Ok(Some(draws))
}

/// Liste de travail de l'analyse (numéros machine substitués en mode machine).
fn load_working_set(conn: &Connection, selection: &Selection) -> Result<Option<Vec<DrawRecord>>> {
    let Some(draws) = load_draws(conn, selection)? else {
        return Ok(None);
    };
    let draws = selection.mode().working_set(&draws);
    if draws.is_empty() {
        println!("Aucun tirage avec numéros machine pour cette sélection.");
        return Ok(None);
    }
    log::info!("{} tirages chargés ({})", draws.len(), selection.mode().label());
    Ok(Some(draws))
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_file(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(conn: &Connection, file: &Path) -> Result<()> {
    let n = import::export_json(conn, file)?;
    println!("{} tirages exportés vers {}", n, file.display());
    Ok(())
}

fn cmd_list(
    conn: &Connection,
    selection: &Selection,
    last: usize,
    number: Option<u8>,
    year: Option<String>,
) -> Result<()> {
    let Some(draws) = load_draws(conn, selection)? else {
        return Ok(());
    };
    // Tirages complets : les colonnes Gagnants et Machine restent fidèles
    let filter = DrawFilter { mode: selection.mode(), number, year };
    let filtered = filter.apply(&draws);
    println!("{} tirages correspondants ({})", filtered.len(), selection.mode().label());
    display_draws(&filtered[..last.min(filtered.len())]);
    Ok(())
}

fn cmd_delete(conn: &Connection, draw: &str, date: &str) -> Result<()> {
    let date = normalize_date(date)?;
    if delete_draw(conn, draw, &date)? {
        log::info!("tirage {} du {} supprimé", draw, date);
        println!("Tirage supprimé.");
    } else {
        println!("Aucun tirage {} le {}.", draw, date);
    }
    Ok(())
}

fn cmd_clear(conn: &Connection) -> Result<()> {
    let n = count_draws(conn, None)?;
    let confirm = prompt(&format!("Supprimer les {} tirages ? (o/n) : ", n))?;
    if confirm.to_lowercase() == "o" {
        let removed = clear_draws(conn)?;
        log::info!("{} tirages supprimés", removed);
        println!("{} tirages supprimés.", removed);
    } else {
        println!("Suppression annulée.");
    }
    Ok(())
}

fn cmd_schedule(day: Option<&str>) -> Result<()> {
    match day {
        Some(raw) => {
            let Some(weekday) = parse_french_day(raw) else {
                bail!("Jour inconnu : '{}'", raw);
            };
            display_schedule(&[DaySchedule { weekday, slots: slots_for(weekday) }]);
        }
        None => display_schedule(DRAW_SCHEDULE),
    }
    Ok(())
}

fn cmd_stats(conn: &Connection, selection: &Selection, period: Option<usize>) -> Result<()> {
    let Some(draws) = load_working_set(conn, selection)? else {
        return Ok(());
    };
    let window = period.unwrap_or(draws.len()).min(draws.len());
    let slice = &draws[..window];

    println!("\n📊 Statistiques sur les {} derniers tirages ({})\n", window, selection.mode().label());
    let stats = compute_stats(slice);
    display_patterns(&compute_patterns(slice));
    display_frequencies(&stats, 10);
    display_overdue(&overdue_numbers(&stats, OVERDUE_COUNT));
    display_heatmap(&heatmap(&stats));
    Ok(())
}

fn cmd_regularity(conn: &Connection, selection: &Selection, config: &AnalysisConfig) -> Result<()> {
    let Some(draws) = load_working_set(conn, selection)? else {
        return Ok(());
    };
    display_regularity(&analyze_regularity_with(&draws, &config.regularity));
    Ok(())
}

fn cmd_consult(
    conn: &Connection,
    number: u8,
    selection: &Selection,
    config: &AnalysisConfig,
    seed: Option<u64>,
) -> Result<()> {
    if !(1..=POOL_SIZE).contains(&number) {
        bail!("Numéro {} hors limites (1-{})", number, POOL_SIZE);
    }
    let Some(draws) = load_working_set(conn, selection)? else {
        return Ok(());
    };

    let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(date_seed));
    let stats = compute_stats(&draws);
    let predictions = generate_predictions(&draws, config, &mut rng);
    let Some(consultation) = consult(&draws, &stats, &predictions, number) else {
        bail!("Numéro {} hors limites (1-{})", number, POOL_SIZE);
    };
    display_consultation(&consultation);
    Ok(())
}

fn cmd_predict(conn: &Connection, selection: &Selection, config: &AnalysisConfig, seed: Option<u64>) -> Result<()> {
    let Some(draws) = load_working_set(conn, selection)? else {
        return Ok(());
    };

    let seed = seed.unwrap_or_else(date_seed);
    log::info!("seed = {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let predictions = generate_predictions(&draws, config, &mut rng);
    let favorites = fetch_favorites(conn)?;
    display_predictions(&predictions, &favorites);
    Ok(())
}

fn cmd_favorites(conn: &Connection, toggle: Option<u8>) -> Result<()> {
    let favorites = match toggle {
        Some(n) => {
            if !(1..=POOL_SIZE).contains(&n) {
                bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
            }
            toggle_favorite(conn, n)?
        }
        None => fetch_favorites(conn)?,
    };
    display_favorites(&favorites);
    Ok(())
}

fn cmd_config(path: &Path, output: Option<&Path>) -> Result<()> {
    match output {
        Some(out) => {
            save_config(&AnalysisConfig::default(), out)?;
            println!("Configuration par défaut écrite dans {}", out.display());
        }
        None => {
            let config = load_config(path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_name = prompt("Nom du tirage (ex: Reveil) : ")?;
    if !is_known_draw(&draw_name) {
        log::warn!("tirage '{}' absent du programme", draw_name);
    }
    let date = normalize_date(&prompt("Date (JJ/MM/AAAA) : ")?)?;

    let winning = prompt_numbers("5 numéros gagnants (1-90) : ")?;
    let machine_input = prompt("5 numéros machine (vide si aucun) : ")?;
    let machine = if machine_input.is_empty() {
        None
    } else {
        Some(parse_numbers(&machine_input)?)
    };

    let draw = DrawRecord { draw_name, date, winning, machine };

    println!("\nTirage à enregistrer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'enregistrement ? (o/n) : ")?;
    if confirm.to_lowercase() == "o" {
        if upsert_draw(conn, &draw)? {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Tirage existant mis à jour.");
        }
    } else {
        println!("Enregistrement annulé.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_numbers(msg: &str) -> Result<[u8; 5]> {
    loop {
        let input = prompt(msg)?;
        match parse_numbers(&input) {
            Ok(numbers) => return Ok(numbers),
            Err(e) => println!("{}. Réessayez.", e),
        }
    }
}
