use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::models::{DrawRecord, validate_record};
use crate::schedule::sort_newest_first;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_name  TEXT NOT NULL,
    date       TEXT NOT NULL,
    win_1      INTEGER NOT NULL,
    win_2      INTEGER NOT NULL,
    win_3      INTEGER NOT NULL,
    win_4      INTEGER NOT NULL,
    win_5      INTEGER NOT NULL,
    machine_1  INTEGER,
    machine_2  INTEGER,
    machine_3  INTEGER,
    machine_4  INTEGER,
    machine_5  INTEGER,
    PRIMARY KEY (draw_name, date)
);
CREATE INDEX IF NOT EXISTS idx_draws_date ON draws (date);
CREATE TABLE IF NOT EXISTS favorites (
    number INTEGER PRIMARY KEY
);
";

const SELECT_COLUMNS: &str = "draw_name, date, win_1, win_2, win_3, win_4, win_5,
    machine_1, machine_2, machine_3, machine_4, machine_5";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("bonheur.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<DrawRecord> {
    let machine: [Option<u8>; 5] = [
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
    ];
    let machine = match machine {
        [Some(a), Some(b), Some(c), Some(d), Some(e)] => Some([a, b, c, d, e]),
        _ => None,
    };
    Ok(DrawRecord {
        draw_name: row.get(0)?,
        date: row.get(1)?,
        winning: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
        ],
        machine,
    })
}

/// Insère ou remplace un tirage (clé : nom + date).
/// Retourne `true` si le tirage n'existait pas encore.
pub fn upsert_draw(conn: &Connection, draw: &DrawRecord) -> Result<bool> {
    validate_record(draw)?;

    let existed: bool = conn
        .query_row(
            "SELECT 1 FROM draws WHERE draw_name = ?1 AND date = ?2",
            rusqlite::params![draw.draw_name, draw.date],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    let m = draw.machine.map(|m| m.map(Some)).unwrap_or([None; 5]);
    conn.execute(
        "INSERT OR REPLACE INTO draws (draw_name, date, win_1, win_2, win_3, win_4, win_5,
            machine_1, machine_2, machine_3, machine_4, machine_5)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            draw.draw_name,
            draw.date,
            draw.winning[0],
            draw.winning[1],
            draw.winning[2],
            draw.winning[3],
            draw.winning[4],
            m[0],
            m[1],
            m[2],
            m[3],
            m[4],
        ],
    ).context("Échec de l'insertion")?;

    log::debug!("tirage {} du {} enregistré (nouveau={})", draw.draw_name, draw.date, !existed);
    Ok(!existed)
}

/// Tirages d'un créneau, du plus récent au plus ancien.
pub fn fetch_draws(conn: &Connection, draw_name: &str) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM draws WHERE draw_name = ?1 ORDER BY date DESC"
    ))?;
    let draws = stmt
        .query_map([draw_name], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tous les créneaux confondus, du plus récent au plus ancien (date puis heure du créneau).
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM draws ORDER BY date DESC"
    ))?;
    let mut draws = stmt
        .query_map([], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    sort_newest_first(&mut draws);
    Ok(draws)
}

pub fn delete_draw(conn: &Connection, draw_name: &str, date: &str) -> Result<bool> {
    let changed = conn
        .execute(
            "DELETE FROM draws WHERE draw_name = ?1 AND date = ?2",
            rusqlite::params![draw_name, date],
        )
        .context("Échec de la suppression")?;
    Ok(changed > 0)
}

pub fn count_draws(conn: &Connection, draw_name: Option<&str>) -> Result<u32> {
    let count: u32 = match draw_name {
        Some(name) => conn.query_row(
            "SELECT COUNT(*) FROM draws WHERE draw_name = ?1",
            [name],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?,
    };
    Ok(count)
}

pub fn draw_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT draw_name FROM draws ORDER BY draw_name")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

pub fn clear_draws(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM draws", []).context("Échec du nettoyage")?;
    Ok(removed)
}

pub fn fetch_favorites(conn: &Connection) -> Result<Vec<u8>> {
    let mut stmt = conn.prepare("SELECT number FROM favorites ORDER BY number")?;
    let favorites = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(favorites)
}

/// Ajoute ou retire un favori, puis retourne la liste triée.
pub fn toggle_favorite(conn: &Connection, number: u8) -> Result<Vec<u8>> {
    let removed = conn.execute("DELETE FROM favorites WHERE number = ?1", [number])?;
    if removed == 0 {
        conn.execute("INSERT INTO favorites (number) VALUES (?1)", [number])?;
    }
    fetch_favorites(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(name: &str, date: &str) -> DrawRecord {
        DrawRecord {
            draw_name: name.to_string(),
            date: date.to_string(),
            winning: [1, 2, 3, 4, 5],
            machine: None,
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn, None).unwrap(), 0);

        upsert_draw(&conn, &test_draw("Reveil", "2024-01-01")).unwrap();
        upsert_draw(&conn, &test_draw("Etoile", "2024-01-01")).unwrap();
        assert_eq!(count_draws(&conn, None).unwrap(), 2);
        assert_eq!(count_draws(&conn, Some("Reveil")).unwrap(), 1);
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let conn = memory_db();

        assert!(upsert_draw(&conn, &test_draw("Reveil", "2024-01-01")).unwrap());

        let mut edited = test_draw("Reveil", "2024-01-01");
        edited.winning = [10, 20, 30, 40, 50];
        edited.machine = Some([11, 21, 31, 41, 51]);
        assert!(!upsert_draw(&conn, &edited).unwrap());

        let draws = fetch_draws(&conn, "Reveil").unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0], edited);
    }

    #[test]
    fn test_upsert_rejects_invalid_numbers() {
        let conn = memory_db();
        let mut bad = test_draw("Reveil", "2024-01-01");
        bad.winning = [1, 1, 2, 3, 4];
        assert!(upsert_draw(&conn, &bad).is_err());
        assert_eq!(count_draws(&conn, None).unwrap(), 0);
    }

    #[test]
    fn test_fetch_order_newest_first() {
        let conn = memory_db();

        upsert_draw(&conn, &test_draw("Reveil", "2024-01-01")).unwrap();
        upsert_draw(&conn, &test_draw("Reveil", "2024-01-05")).unwrap();
        upsert_draw(&conn, &test_draw("Reveil", "2024-01-03")).unwrap();
        upsert_draw(&conn, &test_draw("Etoile", "2024-01-04")).unwrap();

        let draws = fetch_draws(&conn, "Reveil").unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date, "2024-01-05");
        assert_eq!(draws[1].date, "2024-01-03");
        assert_eq!(draws[2].date, "2024-01-01");

        assert_eq!(fetch_all_draws(&conn).unwrap().len(), 4);
        assert_eq!(draw_names(&conn).unwrap(), vec!["Etoile", "Reveil"]);
    }

    #[test]
    fn test_fetch_all_orders_same_day_by_slot_time() {
        let conn = memory_db();
        // Lundi : Reveil 09:00, Akwaba 16:00, Digital 23h 23:00
        let mut reveil = test_draw("Reveil", "2024-01-01");
        reveil.winning = [1, 2, 3, 4, 5];
        let mut akwaba = test_draw("Akwaba", "2024-01-01");
        akwaba.winning = [11, 12, 13, 14, 15];
        let mut late = test_draw("Digital 23h", "2024-01-01");
        late.winning = [21, 22, 23, 24, 25];
        for d in [&reveil, &akwaba, &late] {
            upsert_draw(&conn, d).unwrap();
        }
        upsert_draw(&conn, &test_draw("Etoile", "2023-12-31")).unwrap();

        let names: Vec<String> = fetch_all_draws(&conn)
            .unwrap()
            .into_iter()
            .map(|d| d.draw_name)
            .collect();
        assert_eq!(names, vec!["Digital 23h", "Akwaba", "Reveil", "Etoile"]);
    }

    #[test]
    fn test_delete_and_clear() {
        let conn = memory_db();
        upsert_draw(&conn, &test_draw("Reveil", "2024-01-01")).unwrap();
        upsert_draw(&conn, &test_draw("Reveil", "2024-01-02")).unwrap();

        assert!(delete_draw(&conn, "Reveil", "2024-01-01").unwrap());
        assert!(!delete_draw(&conn, "Reveil", "2024-01-01").unwrap());
        assert_eq!(count_draws(&conn, None).unwrap(), 1);

        assert_eq!(clear_draws(&conn).unwrap(), 1);
        assert_eq!(count_draws(&conn, None).unwrap(), 0);
    }

    #[test]
    fn test_toggle_favorite() {
        let conn = memory_db();
        assert_eq!(toggle_favorite(&conn, 42).unwrap(), vec![42]);
        assert_eq!(toggle_favorite(&conn, 7).unwrap(), vec![7, 42]);
        assert_eq!(toggle_favorite(&conn, 42).unwrap(), vec![7]);
        assert_eq!(fetch_favorites(&conn).unwrap(), vec![7]);
    }
}
