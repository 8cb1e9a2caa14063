#![forbid(unsafe_code)]
//! Pakirvu — génération locale (sans BD) du planning mensuel de partage.
//!
//! - Catalogue en JSON, imports CSV.
//! - Rotation déterministe des thèmes, versets, lieux et assistants, rejouée depuis janvier.
//! - Jours non ouvrés: dimanches et congés par mois.
//! - Export CSV/JSON du planning ; le rendu tabulaire reste hors de la lib.

pub mod catalog;
pub mod io;
pub mod model;
pub mod schedule;
pub mod storage;

pub use catalog::{CatalogError, CatalogIssue, IssueKind};
pub use model::{
    Catalog, LeaveCalendar, Location, LocationId, Period, SharingDay, SharingRule, Staff,
    StaffCategory, StaffId, StaffStatus, Topic, TopicId, Verse, VerseId,
};
pub use schedule::{
    generate, generate_with_options, DayLabels, ScheduleCache, ScheduleOptions, ScheduleRow,
};
pub use storage::{JsonStorage, Storage};
