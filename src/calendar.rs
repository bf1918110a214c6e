use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Vrai si la date tombe un samedi ou un dimanche.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Jours fériés français, fixes et fêtes mobiles, 2024-2027.
/// Une entrée par fête et par année couverte.
const FRENCH_HOLIDAYS: &[&str] = &[
    // 2024
    "2024-01-01", "2024-04-01", "2024-05-01", "2024-05-08", "2024-05-09",
    "2024-05-20", "2024-07-14", "2024-08-15", "2024-11-01", "2024-11-11",
    "2024-12-25",
    // 2025
    "2025-01-01", "2025-04-21", "2025-05-01", "2025-05-08", "2025-05-29",
    "2025-06-09", "2025-07-14", "2025-08-15", "2025-11-01", "2025-11-11",
    "2025-12-25",
    // 2026
    "2026-01-01", "2026-04-06", "2026-05-01", "2026-05-08", "2026-05-14",
    "2026-05-25", "2026-07-14", "2026-08-15", "2026-11-01", "2026-11-11",
    "2026-12-25",
    // 2027
    "2027-01-01", "2027-03-29", "2027-05-01", "2027-05-06", "2027-05-08",
    "2027-05-17", "2027-07-14", "2027-08-15", "2027-11-01", "2027-11-11",
    "2027-12-25",
];

/// Ensemble fixe de jours fériés, pré-rempli à la construction.
///
/// Les dates hors de l'ensemble sont des jours ordinaires — limitation
/// assumée : une année non couverte n'a aucun férié reconnu.
#[derive(Debug, Clone)]
pub struct HolidaySet {
    dates: HashSet<NaiveDate>,
}

impl HolidaySet {
    /// Jours fériés français 2024-2027.
    pub fn default_fr() -> Self {
        Self::from_dates(
            FRENCH_HOLIDAYS
                .iter()
                .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        )
    }

    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Default for HolidaySet {
    fn default() -> Self {
        Self::default_fr()
    }
}

/// Vrai si la date appartient à l'ensemble des jours fériés.
pub fn is_holiday(date: NaiveDate, holidays: &HolidaySet) -> bool {
    holidays.contains(date)
}

/// Itère toutes les dates de `start` à `end` inclus, en ordre croissant,
/// un jour d'écart. Fini ; chaque appel repart de `start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Normalise une date en forme canonique `YYYY-MM-DD`.
/// Accepte la forme canonique ou un horodatage RFC3339.
pub fn normalize_date(raw: &str) -> Result<String> {
    Ok(parse_date_lenient(raw)?.format("%Y-%m-%d").to_string())
}

/// Variante typée de [`normalize_date`].
pub fn parse_date_lenient(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    bail!("invalid date/datetime: {raw}")
}
