use crate::catalog::CatalogError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifiant fort pour Location
    LocationId
);
string_id!(
    /// Identifiant fort pour Staff
    StaffId
);
string_id!(TopicId);
string_id!(VerseId);

/// Lieu (site physique ou administratif)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Jamais retenu pour la rotation, mais reste valide ailleurs.
    #[serde(default)]
    pub excluded_from_schedule: bool,
}

impl Location {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: LocationId::random(),
            name: name.into(),
            excluded_from_schedule: false,
        }
    }
}

/// Catégorie de personnel (ensemble fermé).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffCategory {
    Permanent,
    Contractual,
    Regional,
    #[serde(rename = "MIS")]
    Mis,
    #[serde(rename = "PSDB")]
    Psdb,
    Associate,
    Accountant,
}

impl StaffCategory {
    /// Résout un libellé libre (CSV, saisie) vers une catégorie connue.
    pub fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "permanent"
            | "blockintegrator"
            | "federationcoordinator"
            | "blockintegratorfederationcoordinator"
            | "blockintegrator/federationcoordinator" => Some(Self::Permanent),
            "contractual" => Some(Self::Contractual),
            "regional" => Some(Self::Regional),
            "mis" => Some(Self::Mis),
            "psdb" => Some(Self::Psdb),
            "associate" => Some(Self::Associate),
            "accountant" => Some(Self::Accountant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StaffStatus {
    #[default]
    Working,
    #[serde(rename = "Not Working")]
    NotWorking,
    #[serde(rename = "Long Leave")]
    LongLeave,
}

impl StaffStatus {
    pub fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "working" => Some(Self::Working),
            "notworking" => Some(Self::NotWorking),
            "longleave" => Some(Self::LongLeave),
            _ => None,
        }
    }
}

/// Membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub location_id: LocationId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_location_ids: Vec<LocationId>,
    pub category: StaffCategory,
    #[serde(default)]
    pub status: StaffStatus,
}

impl Staff {
    pub fn new<N: Into<String>>(name: N, location_id: LocationId, category: StaffCategory) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
            location_id,
            additional_location_ids: Vec::new(),
            category,
            status: StaffStatus::Working,
        }
    }

    pub fn is_working(&self) -> bool {
        self.status == StaffStatus::Working
    }

    /// Lieu principal ou responsabilité additionnelle.
    pub fn is_at(&self, location: &LocationId) -> bool {
        &self.location_id == location || self.additional_location_ids.contains(location)
    }
}

/// Thème de discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
}

impl Topic {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: TopicId::random(),
            name: name.into(),
        }
    }
}

/// Verset cité, rattaché à un thème (le lien n'intervient pas dans la rotation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub id: VerseId,
    pub topic_id: TopicId,
    pub text: String,
}

impl Verse {
    pub fn new<T: Into<String>>(topic_id: TopicId, text: T) -> Self {
        Self {
            id: VerseId::random(),
            topic_id,
            text: text.into(),
        }
    }
}

/// Jour ouvrable pouvant porter une règle de partage. Le dimanche n'existe pas ici.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SharingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl SharingDay {
    pub const ALL: [SharingDay; 6] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(Self::Monday),
            Weekday::Tue => Some(Self::Tuesday),
            Weekday::Wed => Some(Self::Wednesday),
            Weekday::Thu => Some(Self::Thursday),
            Weekday::Fri => Some(Self::Friday),
            Weekday::Sat => Some(Self::Saturday),
            Weekday::Sun => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for SharingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SharingDay {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|d| {
                let name = d.name().to_ascii_lowercase();
                name == wanted || name[..3] == wanted
            })
            .ok_or_else(|| CatalogError::UnknownDay(s.to_string()))
    }
}

/// Règle jour → lieux, dans l'ordre d'affichage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingRule {
    pub day: SharingDay,
    #[serde(default)]
    pub location_ids: Vec<LocationId>,
}

/// Mois cible (mois indexé à partir de 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    year_start: NaiveDate,
    first: NaiveDate,
    last: NaiveDate,
}

impl Period {
    /// Crée une période en validant l'année et le mois (`month0` dans 0..=11).
    pub fn new(year: i32, month0: u32) -> Result<Self, CatalogError> {
        if month0 > 11 {
            return Err(CatalogError::InvalidMonth(month0));
        }
        let year_start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CatalogError::InvalidYear(year))?;
        let first =
            NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or(CatalogError::InvalidYear(year))?;
        let last = last_day_of_month(year, month0 + 1).ok_or(CatalogError::InvalidYear(year))?;
        Ok(Self {
            year_start,
            first,
            last,
        })
    }

    /// Variante à mois calendaire (1..=12), pratique côté CLI.
    pub fn from_calendar_month(year: i32, month: u32) -> Result<Self, CatalogError> {
        if !(1..=12).contains(&month) {
            return Err(CatalogError::InvalidMonth(month));
        }
        Self::new(year, month - 1)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }
    pub fn month0(&self) -> u32 {
        self.first.month0()
    }
    pub fn year_start(&self) -> NaiveDate {
        self.year_start
    }
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }
    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Clé du calendrier de congés: `année-mois0`.
    pub fn leave_key(&self) -> String {
        leave_key(self.year(), self.month0())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month0() + 1)
    }
}

/// Jours de congé par mois (`"année-mois0"` → numéros de jour).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveCalendar(BTreeMap<String, BTreeSet<u32>>);

impl LeaveCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Le jour figure-t-il dans les congés de son propre mois ?
    pub fn is_leave(&self, date: NaiveDate) -> bool {
        self.0
            .get(&leave_key(date.year(), date.month0()))
            .is_some_and(|days| days.contains(&date.day()))
    }

    pub fn days(&self, period: &Period) -> Vec<u32> {
        self.0
            .get(&period.leave_key())
            .map(|days| days.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn set_days<I>(&mut self, period: &Period, days: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut set = BTreeSet::new();
        for day in days {
            validate_leave_day(period, day)?;
            set.insert(day);
        }
        if set.is_empty() {
            self.0.remove(&period.leave_key());
        } else {
            self.0.insert(period.leave_key(), set);
        }
        Ok(())
    }

    /// Bascule un jour; renvoie `true` s'il est désormais en congé.
    pub fn toggle(&mut self, period: &Period, day: u32) -> Result<bool, CatalogError> {
        validate_leave_day(period, day)?;
        let key = period.leave_key();
        let days = self.0.entry(key.clone()).or_default();
        let now_leave = if days.remove(&day) {
            false
        } else {
            days.insert(day);
            true
        };
        if days.is_empty() {
            self.0.remove(&key);
        }
        Ok(now_leave)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validate_leave_day(period: &Period, day: u32) -> Result<(), CatalogError> {
    let date = period
        .first_day()
        .with_day(day)
        .filter(|d| period.contains(*d))
        .ok_or(CatalogError::InvalidDay(day))?;
    if date.weekday() == Weekday::Sun {
        return Err(CatalogError::SundayLeave(date));
    }
    Ok(())
}

fn leave_key(year: i32, month0: u32) -> String {
    format!("{year}-{month0}")
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next_first {
        Some(d) => d.pred_opt(),
        None if month == 12 => NaiveDate::from_ymd_opt(year, 12, 31),
        None => None,
    }
}

/// Normalise un libellé pour comparaison: minuscules, sans espaces, `_`, ni caractères invisibles.
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && !c.is_control() && !is_invisible(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

/// Instantané complet des données maîtres
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub verses: Vec<Verse>,
    #[serde(default)]
    pub sharing_rules: Vec<SharingRule>,
    #[serde(default)]
    pub leave_days: LeaveCalendar,
}

impl Catalog {
    pub fn find_location_by_id<'a>(&'a self, id: &LocationId) -> Option<&'a Location> {
        self.locations.iter().find(|l| &l.id == id)
    }
    pub fn find_location_by_name<'a>(&'a self, name: &str) -> Option<&'a Location> {
        let wanted = normalize_label(name);
        self.locations.iter().find(|l| normalize_label(&l.name) == wanted)
    }
    pub fn find_location_mut_by_id(&mut self, id: &LocationId) -> Option<&mut Location> {
        self.locations.iter_mut().find(|l| &l.id == id)
    }
    pub fn find_topic_by_name<'a>(&'a self, name: &str) -> Option<&'a Topic> {
        let wanted = normalize_label(name);
        self.topics.iter().find(|t| normalize_label(&t.name) == wanted)
    }
    /// Première règle déclarée pour ce jour.
    pub fn rule_for(&self, day: SharingDay) -> Option<&SharingRule> {
        self.sharing_rules.iter().find(|r| r.day == day)
    }
}
