use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable.
pub const POOL_SIZE: u8 = 90;
/// Nombre de numéros par tirage (gagnants comme machine).
pub const PICK_COUNT: usize = 5;
/// Limite haute de la moitié basse (1-45) ; 46-90 forment la moitié haute.
pub const LOW_HIGH_SPLIT: u8 = 45;

/// Un tirage historique pour un créneau nommé.
///
/// Les champs sérialisés reprennent le format de sauvegarde JSON de
/// l'application d'origine (`gagnants`, `machine`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub draw_name: String,
    /// Date ISO `YYYY-MM-DD`.
    pub date: String,
    #[serde(rename = "gagnants")]
    pub winning: [u8; 5],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<[u8; 5]>,
}

impl DrawRecord {
    pub fn contains(&self, number: u8) -> bool {
        self.winning.contains(&number)
    }
}

/// Jeu de numéros analysé : gagnants ou numéros machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    #[default]
    Winning,
    Machine,
}

impl AnalysisMode {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Winning => "Tirage Gagnant",
            AnalysisMode::Machine => "Machine",
        }
    }

    /// Construit la liste de travail. En mode machine, seuls les tirages qui
    /// ont des numéros machine sont gardés, et ceux-ci remplacent les gagnants.
    pub fn working_set(&self, draws: &[DrawRecord]) -> Vec<DrawRecord> {
        draws
            .iter()
            .filter_map(|d| {
                self.numbers(d).map(|numbers| DrawRecord {
                    draw_name: d.draw_name.clone(),
                    date: d.date.clone(),
                    winning: numbers,
                    machine: None,
                })
            })
            .collect()
    }

    /// Numéros analysés pour ce tirage ; `None` en mode machine sans numéros machine.
    pub fn numbers(&self, draw: &DrawRecord) -> Option<[u8; 5]> {
        match self {
            AnalysisMode::Winning => Some(draw.winning),
            AnalysisMode::Machine => draw.machine,
        }
    }
}

/// Filtres de la vue "Données".
#[derive(Debug, Clone, Default)]
pub struct DrawFilter {
    /// Jeu de numéros sur lequel portent `number` et la présence du tirage.
    pub mode: AnalysisMode,
    pub number: Option<u8>,
    /// Préfixe d'année sur 4 chiffres, ex. "2024".
    pub year: Option<String>,
}

impl DrawFilter {
    pub fn matches(&self, draw: &DrawRecord) -> bool {
        let Some(numbers) = self.mode.numbers(draw) else {
            return false;
        };
        if let Some(n) = self.number {
            if !numbers.contains(&n) {
                return false;
            }
        }
        match &self.year {
            Some(year) if year.len() == 4 => draw.date.starts_with(year.as_str()),
            _ => true,
        }
    }

    pub fn apply(&self, draws: &[DrawRecord]) -> Vec<DrawRecord> {
        draws.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}

pub fn validate_numbers(numbers: &[u8; 5]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

pub fn validate_date(date: &str) -> Result<()> {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        bail!("Date invalide : '{}' (attendu AAAA-MM-JJ)", date);
    }
    Ok(())
}

pub fn validate_record(draw: &DrawRecord) -> Result<()> {
    if draw.draw_name.trim().is_empty() {
        bail!("Nom de tirage vide");
    }
    validate_date(&draw.date)?;
    validate_numbers(&draw.winning)?;
    if let Some(machine) = &draw.machine {
        validate_numbers(machine)?;
    }
    Ok(())
}

/// Normalise une date saisie en `JJ/MM/AAAA` ou `AAAA-MM-JJ` vers le format ISO.
pub fn normalize_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('/').collect();
    let iso = if parts.len() == 3 {
        format!("{}-{:0>2}-{:0>2}", parts[2], parts[1], parts[0])
    } else {
        raw.to_string()
    };
    validate_date(&iso)?;
    Ok(iso)
}

/// Découpe une saisie libre ("1, 2 - 3 4,5") en exactement 5 numéros.
pub fn parse_numbers(input: &str) -> Result<[u8; 5]> {
    let nums: Vec<u8> = input
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|e| anyhow::anyhow!("Numéro illisible dans '{}': {}", input, e))?;
    if nums.len() != PICK_COUNT {
        bail!("Attendu {} numéros, reçu {}", PICK_COUNT, nums.len());
    }
    let arr = [nums[0], nums[1], nums[2], nums[3], nums[4]];
    validate_numbers(&arr)?;
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, winning: [u8; 5], machine: Option<[u8; 5]>) -> DrawRecord {
        DrawRecord {
            draw_name: "Reveil".to_string(),
            date: date.to_string(),
            winning,
            machine,
        }
    }

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5]).is_ok());
        assert!(validate_numbers(&[90, 89, 46, 45, 1]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert!(validate_numbers(&[0, 2, 3, 4, 5]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 91]).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert!(validate_numbers(&[7, 7, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("15/01/2024").is_err());
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("15/01/2024").unwrap(), "2024-01-15");
        assert_eq!(normalize_date("5/1/2024").unwrap(), "2024-01-05");
        assert_eq!(normalize_date("2024-01-15").unwrap(), "2024-01-15");
        assert!(normalize_date("hier").is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_numbers("1, 2 - 3 4,5").unwrap(), [1, 2, 3, 4, 5]);
        assert!(parse_numbers("1 2 3 4").is_err());
        assert!(parse_numbers("1 2 3 4 x").is_err());
        assert!(parse_numbers("1 2 3 4 4").is_err());
    }

    #[test]
    fn test_machine_mode_swaps_and_filters() {
        let draws = vec![
            record("2024-01-02", [1, 2, 3, 4, 5], Some([10, 20, 30, 40, 50])),
            record("2024-01-01", [6, 7, 8, 9, 10], None),
        ];
        let machine = AnalysisMode::Machine.working_set(&draws);
        assert_eq!(machine.len(), 1);
        assert_eq!(machine[0].winning, [10, 20, 30, 40, 50]);
        assert_eq!(machine[0].date, "2024-01-02");

        let winning = AnalysisMode::Winning.working_set(&draws);
        assert_eq!(winning, draws);
    }

    #[test]
    fn test_filter_by_number_and_year() {
        let draws = vec![
            record("2024-03-02", [1, 2, 3, 4, 5], None),
            record("2023-12-30", [1, 7, 8, 9, 10], None),
            record("2023-12-29", [11, 12, 13, 14, 15], None),
        ];
        let by_number = DrawFilter { number: Some(1), ..DrawFilter::default() }.apply(&draws);
        assert_eq!(by_number.len(), 2);

        let by_year = DrawFilter { year: Some("2023".to_string()), ..DrawFilter::default() }.apply(&draws);
        assert_eq!(by_year.len(), 2);

        let both = DrawFilter { number: Some(1), year: Some("2023".to_string()), ..DrawFilter::default() }.apply(&draws);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].date, "2023-12-30");

        // Une année incomplète est ignorée, comme dans la vue d'origine
        let partial = DrawFilter { year: Some("20".to_string()), ..DrawFilter::default() }.apply(&draws);
        assert_eq!(partial.len(), 3);
    }

    #[test]
    fn test_machine_filter_keeps_full_record() {
        let draws = vec![
            record("2024-01-03", [1, 2, 3, 4, 5], Some([10, 20, 30, 40, 50])),
            record("2024-01-02", [10, 11, 12, 13, 14], Some([60, 61, 62, 63, 64])),
            record("2024-01-01", [10, 7, 8, 9, 6], None),
        ];
        let filter = DrawFilter { mode: AnalysisMode::Machine, number: Some(10), year: None };
        let listed = filter.apply(&draws);
        assert_eq!(listed.len(), 1);
        // Le tirage affiché garde ses gagnants et ses numéros machine
        assert_eq!(listed[0].winning, [1, 2, 3, 4, 5]);
        assert_eq!(listed[0].machine, Some([10, 20, 30, 40, 50]));

        let all_machine = DrawFilter { mode: AnalysisMode::Machine, ..DrawFilter::default() }.apply(&draws);
        assert_eq!(all_machine.len(), 2);
        assert_eq!(DrawFilter { number: Some(10), ..DrawFilter::default() }.apply(&draws).len(), 2);
    }

    #[test]
    fn test_json_backup_format() {
        let draw = record("2024-01-02", [1, 2, 3, 4, 5], None);
        let json = serde_json::to_string(&draw).unwrap();
        assert!(json.contains("\"gagnants\":[1,2,3,4,5]"));
        assert!(!json.contains("machine"));

        let parsed: DrawRecord = serde_json::from_str(
            r#"{"draw_name":"Etoile","date":"2024-02-05","gagnants":[5,4,3,2,1],"machine":[9,8,7,6,60]}"#,
        )
        .unwrap();
        assert_eq!(parsed.machine, Some([9, 8, 7, 6, 60]));
    }
}
