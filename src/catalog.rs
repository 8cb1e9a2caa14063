use crate::model::{
    Catalog, Location, LocationId, Period, SharingDay, SharingRule, Staff, StaffId, Topic, TopicId,
    Verse, VerseId,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid month: {0}")]
    InvalidMonth(u32),
    #[error("year out of range: {0}")]
    InvalidYear(i32),
    #[error("invalid day of month: {0}")]
    InvalidDay(u32),
    #[error("sunday cannot be a leave day: {0}")]
    SundayLeave(NaiveDate),
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("unknown weekday: {0}")]
    UnknownDay(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Règle citant un lieu inexistant
    RuleUnknownLocation,
    /// Règle citant un lieu exclu du planning
    RuleExcludedLocation,
    /// Plusieurs règles pour le même jour (seule la première compte)
    DuplicateRule,
    StaffUnknownLocation,
    VerseUnknownTopic,
    /// Collection vide: le planning sera vide
    EmptyCollection,
}

#[derive(Debug, Clone)]
pub struct CatalogIssue {
    pub kind: IssueKind,
    pub subject: String,
    pub detail: String,
}

impl CatalogIssue {
    fn new(kind: IssueKind, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

impl Catalog {
    pub fn add_locations(&mut self, locations: Vec<Location>) {
        self.locations.extend(locations);
    }
    pub fn add_staff(&mut self, staff: Vec<Staff>) {
        self.staff.extend(staff);
    }
    pub fn add_topics(&mut self, topics: Vec<Topic>) {
        self.topics.extend(topics);
    }
    pub fn add_verses(&mut self, verses: Vec<Verse>) {
        self.verses.extend(verses);
    }

    /// Exclut (ou réintègre) un lieu de la rotation.
    pub fn set_excluded(&mut self, id: &LocationId, excluded: bool) -> Result<(), CatalogError> {
        let loc = self
            .find_location_mut_by_id(id)
            .ok_or_else(|| CatalogError::UnknownLocation(id.as_str().to_string()))?;
        loc.excluded_from_schedule = excluded;
        Ok(())
    }

    /// Remplace la règle du jour (une seule par jour). Une liste vide supprime la règle.
    pub fn set_rule(&mut self, day: SharingDay, location_ids: Vec<LocationId>) {
        self.sharing_rules.retain(|r| r.day != day);
        if location_ids.is_empty() {
            return;
        }
        self.sharing_rules.push(SharingRule { day, location_ids });
        self.sharing_rules.sort_by_key(|r| r.day);
    }

    pub fn clear_rule(&mut self, day: SharingDay) {
        self.sharing_rules.retain(|r| r.day != day);
    }

    pub fn toggle_leave(&mut self, period: &Period, day: u32) -> Result<bool, CatalogError> {
        self.leave_days.toggle(period, day)
    }

    /// Rapport d'intégrité; n'empêche jamais la génération.
    pub fn lint(&self) -> Vec<CatalogIssue> {
        let mut out = Vec::new();

        for (what, empty) in [
            ("locations", self.locations.is_empty()),
            ("staff", self.staff.is_empty()),
            ("topics", self.topics.is_empty()),
            ("verses", self.verses.is_empty()),
        ] {
            if empty {
                out.push(CatalogIssue::new(IssueKind::EmptyCollection, what, "no records"));
            }
        }

        let mut seen_days = HashSet::new();
        for rule in &self.sharing_rules {
            if !seen_days.insert(rule.day) {
                out.push(CatalogIssue::new(
                    IssueKind::DuplicateRule,
                    rule.day.name(),
                    "only the first rule for this day is used",
                ));
            }
            for id in &rule.location_ids {
                match self.find_location_by_id(id) {
                    None => out.push(CatalogIssue::new(
                        IssueKind::RuleUnknownLocation,
                        rule.day.name(),
                        id.as_str(),
                    )),
                    Some(loc) if loc.excluded_from_schedule => out.push(CatalogIssue::new(
                        IssueKind::RuleExcludedLocation,
                        rule.day.name(),
                        loc.name.as_str(),
                    )),
                    Some(_) => {}
                }
            }
        }

        for s in &self.staff {
            let ids = std::iter::once(&s.location_id).chain(s.additional_location_ids.iter());
            for id in ids {
                if self.find_location_by_id(id).is_none() {
                    out.push(CatalogIssue::new(
                        IssueKind::StaffUnknownLocation,
                        staff_subject(&s.id, &s.name),
                        id.as_str(),
                    ));
                }
            }
        }

        for v in &self.verses {
            if !self.topic_exists(&v.topic_id) {
                out.push(CatalogIssue::new(
                    IssueKind::VerseUnknownTopic,
                    verse_subject(&v.id),
                    v.topic_id.as_str(),
                ));
            }
        }

        out
    }

    pub fn topic_exists(&self, id: &TopicId) -> bool {
        self.topics.iter().any(|t| &t.id == id)
    }
}

fn staff_subject(id: &StaffId, name: &str) -> String {
    format!("{name} ({id})")
}

fn verse_subject(id: &VerseId) -> String {
    format!("verse {id}")
}
