use std::cmp::Reverse;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::DrawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSlot {
    pub time: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DaySchedule {
    pub weekday: Weekday,
    pub slots: &'static [DrawSlot],
}

const fn slot(time: &'static str, name: &'static str) -> DrawSlot {
    DrawSlot { time, name }
}

/// Programme hebdomadaire des tirages, lundi en premier.
pub const DRAW_SCHEDULE: &[DaySchedule] = &[
    DaySchedule {
        weekday: Weekday::Mon,
        slots: &[
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "Reveil"),
            slot("13:00", "Etoile"),
            slot("16:00", "Akwaba"),
            slot("18:15", "Monday Special"),
            slot("21:00", "Digital 21h"),
            slot("22:00", "Digital 22h"),
            slot("23:00", "Digital 23h"),
        ],
    },
    DaySchedule {
        weekday: Weekday::Tue,
        slots: &[
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "La Matinale"),
            slot("13:00", "Emergence"),
            slot("16:00", "Sika"),
            slot("18:15", "Lucky Tuesday"),
            slot("21:00", "Digital 21h"),
            slot("22:00", "Digital 22h"),
            slot("23:00", "Digital 23h"),
        ],
    },
    DaySchedule {
        weekday: Weekday::Wed,
        slots: &[
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "Premiere Heure"),
            slot("13:00", "Fortune"),
            slot("16:00", "Baraka"),
            slot("18:15", "Midweek"),
            slot("21:00", "Digital 21h"),
            slot("22:00", "Digital 22h"),
            slot("23:00", "Digital 23h"),
        ],
    },
    DaySchedule {
        weekday: Weekday::Thu,
        slots: &[
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "Kado"),
            slot("13:00", "Privilege"),
            slot("16:00", "Monni"),
            slot("18:15", "Fortune Thursday"),
            slot("21:00", "Digital 21h"),
            slot("22:00", "Digital 22h"),
            slot("23:00", "Digital 23h"),
        ],
    },
    DaySchedule {
        weekday: Weekday::Fri,
        slots: &[
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "Cash"),
            slot("13:00", "Solution"),
            slot("16:00", "Wari"),
            slot("18:15", "Friday Bonanza"),
            slot("21:00", "Digital 21h"),
            slot("22:00", "Digital 22h"),
            slot("23:00", "Digital 23h"),
        ],
    },
    DaySchedule {
        weekday: Weekday::Sat,
        slots: &[
            slot("01:00", "Special Weekend 1h"),
            slot("03:00", "Special Weekend 3h"),
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "Soutra"),
            slot("13:00", "Diamant"),
            slot("16:00", "Moaye"),
            slot("18:15", "National"),
            slot("21:00", "Digital 21h"),
        ],
    },
    DaySchedule {
        weekday: Weekday::Sun,
        slots: &[
            slot("01:00", "Special Weekend 1h"),
            slot("03:00", "Special Weekend 3h"),
            slot("07:00", "Digital Reveil 7h"),
            slot("08:00", "Digital Reveil 8h"),
            slot("09:00", "Benediction"),
            slot("13:00", "Prestige"),
            slot("16:00", "Awale"),
            slot("18:15", "Espoir"),
            slot("21:00", "Digital 21h"),
        ],
    },
];

/// Libellé français d'un jour, tel qu'affiché dans l'application.
pub fn french_day(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Lundi",
        Weekday::Tue => "Mardi",
        Weekday::Wed => "Mercredi",
        Weekday::Thu => "Jeudi",
        Weekday::Fri => "Vendredi",
        Weekday::Sat => "Samedi",
        Weekday::Sun => "Dimanche",
    }
}

pub fn parse_french_day(input: &str) -> Option<Weekday> {
    match input.trim().to_lowercase().as_str() {
        "lundi" | "lun" => Some(Weekday::Mon),
        "mardi" | "mar" => Some(Weekday::Tue),
        "mercredi" | "mer" => Some(Weekday::Wed),
        "jeudi" | "jeu" => Some(Weekday::Thu),
        "vendredi" | "ven" => Some(Weekday::Fri),
        "samedi" | "sam" => Some(Weekday::Sat),
        "dimanche" | "dim" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn slots_for(weekday: Weekday) -> &'static [DrawSlot] {
    DRAW_SCHEDULE
        .iter()
        .find(|d| d.weekday == weekday)
        .map(|d| d.slots)
        .unwrap_or(&[])
}

/// Tous les noms de créneaux, triés et sans doublons.
pub fn all_draw_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = DRAW_SCHEDULE
        .iter()
        .flat_map(|d| d.slots.iter().map(|s| s.name))
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

pub fn is_known_draw(name: &str) -> bool {
    DRAW_SCHEDULE
        .iter()
        .any(|d| d.slots.iter().any(|s| s.name == name))
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Nom du programme équivalent à une saisie approximative (casse, espaces).
pub fn suggest_draw_name(input: &str) -> Option<&'static str> {
    let wanted = normalize_name(input);
    all_draw_names()
        .into_iter()
        .find(|name| normalize_name(name) == wanted)
}

/// Heure du créneau `name` le jour de `date` (AAAA-MM-JJ), si le programme la connaît.
pub fn slot_time(date: &str, name: &str) -> Option<&'static str> {
    let weekday = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?.weekday();
    slots_for(weekday)
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.time)
}

/// Ordre chronologique inverse de tirages de créneaux mélangés : date, puis heure
/// du créneau. Le même jour, un créneau hors programme passe après les autres.
pub fn sort_newest_first(draws: &mut [DrawRecord]) {
    draws.sort_by_cached_key(|d| {
        (
            Reverse(d.date.clone()),
            Reverse(slot_time(&d.date, &d.draw_name)),
            d.draw_name.clone(),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_covers_week() {
        assert_eq!(DRAW_SCHEDULE.len(), 7);
        assert_eq!(DRAW_SCHEDULE[0].weekday, Weekday::Mon);
        assert_eq!(DRAW_SCHEDULE[6].weekday, Weekday::Sun);
        for day in DRAW_SCHEDULE {
            assert_eq!(day.slots.len(), 9, "{:?}", day.weekday);
        }
    }

    #[test]
    fn test_slots_for_day() {
        let saturday = slots_for(Weekday::Sat);
        assert_eq!(saturday[0], slot("01:00", "Special Weekend 1h"));
        assert!(saturday.iter().any(|s| s.name == "National"));
    }

    #[test]
    fn test_all_draw_names_unique() {
        let names = all_draw_names();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
        assert!(names.contains(&"Digital 21h"));
        assert_eq!(names.iter().filter(|n| **n == "Digital 21h").count(), 1);
    }

    #[test]
    fn test_is_known_draw() {
        assert!(is_known_draw("Fortune Thursday"));
        assert!(!is_known_draw("fortune thursday"));
        assert!(!is_known_draw("Loto Inconnu"));
    }

    #[test]
    fn test_suggest_draw_name() {
        assert_eq!(suggest_draw_name("fortune thursday"), Some("Fortune Thursday"));
        assert_eq!(suggest_draw_name("DIGITAL21H"), Some("Digital 21h"));
        assert_eq!(suggest_draw_name("Loto Inconnu"), None);
    }

    #[test]
    fn test_slot_time() {
        // 2024-01-01 est un lundi
        assert_eq!(slot_time("2024-01-01", "Akwaba"), Some("16:00"));
        assert_eq!(slot_time("2024-01-01", "Loto Inconnu"), None);
        assert_eq!(slot_time("pas-une-date", "Akwaba"), None);
    }

    #[test]
    fn test_sort_by_date_then_slot_time() {
        let draw = |name: &str, date: &str| DrawRecord {
            draw_name: name.to_string(),
            date: date.to_string(),
            winning: [1, 2, 3, 4, 5],
            machine: None,
        };
        let mut draws = vec![
            draw("Akwaba", "2024-01-01"),
            draw("Inconnu", "2024-01-01"),
            draw("Reveil", "2024-01-02"),
            draw("Digital 23h", "2024-01-01"),
            draw("Reveil", "2024-01-01"),
        ];
        sort_newest_first(&mut draws);
        let order: Vec<(&str, &str)> = draws
            .iter()
            .map(|d| (d.date.as_str(), d.draw_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2024-01-02", "Reveil"),
                ("2024-01-01", "Digital 23h"),
                ("2024-01-01", "Akwaba"),
                ("2024-01-01", "Reveil"),
                ("2024-01-01", "Inconnu"),
            ]
        );
    }

    #[test]
    fn test_french_day_roundtrip() {
        for day in DRAW_SCHEDULE {
            assert_eq!(parse_french_day(french_day(day.weekday)), Some(day.weekday));
        }
        assert_eq!(parse_french_day("funday"), None);
    }
}
