use std::path::Path;

use anyhow::{Context, Result};
use bonheur_db::rusqlite::Connection;

use bonheur_db::db::{fetch_all_draws, upsert_draw};
use bonheur_db::models::{DrawRecord, normalize_date};

#[derive(Debug, Default)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub updated: u32,
    pub errors: u32,
}

impl ImportResult {
    fn record(&mut self, line: u32, outcome: Result<bool>) {
        match outcome {
            Ok(true) => self.inserted += 1,
            Ok(false) => self.updated += 1,
            Err(e) => {
                log::warn!("ligne {} ignorée : {:#}", line, e);
                self.errors += 1;
            }
        }
    }
}

fn parse_numbers_at(record: &csv::StringRecord, start: usize) -> Result<[u8; 5]> {
    let mut numbers = [0u8; 5];
    for (k, slot) in numbers.iter_mut().enumerate() {
        let idx = start + k;
        let s = record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))?;
        *slot = s
            .parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))?;
    }
    Ok(numbers)
}

/// `nom;date;g1;g2;g3;g4;g5[;m1;m2;m3;m4;m5]`
fn parse_record(record: &csv::StringRecord) -> Result<DrawRecord> {
    let draw_name = record
        .get(0)
        .map(|s| s.trim().to_string())
        .context("Nom de tirage manquant")?;
    let raw_date = record.get(1).context("Date manquante")?;
    let date = normalize_date(raw_date)?;
    let winning = parse_numbers_at(record, 2)?;

    let has_machine = record.iter().skip(7).any(|s| !s.trim().is_empty());
    let machine = if has_machine {
        Some(parse_numbers_at(record, 7)?)
    } else {
        None
    };

    Ok(DrawRecord { draw_name, date, winning, machine })
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();
    for record_result in reader.records() {
        result.total_records += 1;
        let outcome = record_result
            .context("Ligne illisible")
            .and_then(|record| parse_record(&record))
            .and_then(|draw| upsert_draw(&tx, &draw));
        result.record(result.total_records, outcome);
    }

    tx.commit().context("Échec du commit")?;
    log::info!(
        "import CSV {:?} : {} insérés, {} mis à jour, {} erreurs",
        path,
        result.inserted,
        result.updated,
        result.errors
    );
    Ok(result)
}

/// Sauvegarde JSON : tableau de `{draw_name, date, gagnants, machine?}`.
pub fn import_json(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let draws: Vec<DrawRecord> = serde_json::from_str(&json)
        .with_context(|| format!("Sauvegarde JSON invalide : {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();
    for draw in &draws {
        result.total_records += 1;
        result.record(result.total_records, upsert_draw(&tx, draw));
    }

    tx.commit().context("Échec du commit")?;
    log::info!("import JSON {:?} : {} tirages", path, result.total_records);
    Ok(result)
}

pub fn import_file(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        import_json(conn, path)
    } else {
        import_csv(conn, path)
    }
}

/// Retourne le nombre de tirages exportés.
pub fn export_json(conn: &Connection, path: &Path) -> Result<usize> {
    let draws = fetch_all_draws(conn)?;
    let json = serde_json::to_string_pretty(&draws)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    log::info!("export JSON {:?} : {} tirages", path, draws.len());
    Ok(draws.len())
}
