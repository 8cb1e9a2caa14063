//! Génération du planning mensuel.
//!
//! Chaque appel rejoue l'année depuis le 1er janvier afin que les curseurs de rotation
//! (thème, verset, lieu de partage-1, assistants par lieu) soient identiques quel que soit
//! le mois demandé. Seuls les jours du mois cible produisent des lignes.

mod assignment;
mod cache;
mod rotation;
mod selection;
mod types;
mod util;

pub use cache::ScheduleCache;
pub use types::{DayLabels, ScheduleOptions, ScheduleRow};

use crate::model::{Catalog, Period};

/// Génère le planning du mois avec les options par défaut. Ne renvoie jamais d'erreur:
/// un catalogue incomplet donne un planning vide ou des valeurs de remplacement.
pub fn generate(catalog: &Catalog, period: Period) -> Vec<ScheduleRow> {
    generate_with_options(catalog, period, &ScheduleOptions::default())
}

pub fn generate_with_options(
    catalog: &Catalog,
    period: Period,
    opts: &ScheduleOptions,
) -> Vec<ScheduleRow> {
    assignment::build_rows(catalog, period, opts)
}
