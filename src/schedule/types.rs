use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Ligne du planning généré. Un jour à N lieux produit N lignes consécutives;
/// seule la première porte `is_first_sub_row` et `sub_row_span = N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub day: String,
    pub topic: String,
    pub verse: String,
    pub sharing1_location: String,
    pub sub_row_location: String,
    pub sharing2_staff: String,
    pub sharing3_staff: String,
    pub sharing4_staff: String,
    pub is_first_sub_row: bool,
    pub sub_row_span: usize,
}

/// Langue des libellés de jour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayLabels {
    #[default]
    Tamil,
    English,
}

const ENGLISH_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const TAMIL_DAYS: [&str; 7] = [
    "ஞாயிறு",
    "திங்கள்",
    "செவ்வாய்",
    "புதன்",
    "வியாழன்",
    "வெள்ளி",
    "சனி",
];

impl DayLabels {
    pub fn label(self, weekday: Weekday) -> &'static str {
        let idx = weekday.num_days_from_sunday() as usize;
        match self {
            Self::Tamil => TAMIL_DAYS[idx],
            Self::English => ENGLISH_DAYS[idx],
        }
    }
}

/// Options de génération (présentation uniquement, la rotation n'en dépend pas)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleOptions {
    pub day_labels: DayLabels,
    /// Aucun membre ne correspond au rôle.
    pub not_available: String,
    /// Jour sans règle exploitable.
    pub unassigned: String,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            day_labels: DayLabels::Tamil,
            not_available: "N/A".to_string(),
            unassigned: "-".to_string(),
        }
    }
}
