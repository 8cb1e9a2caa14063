use super::{generate_with_options, ScheduleOptions, ScheduleRow};
use crate::model::{Catalog, Period};

/// Mémoïse la dernière génération; ne rejoue l'année que si les entrées changent.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    key: Option<(Catalog, Period, ScheduleOptions)>,
    rows: Vec<ScheduleRow>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&mut self, catalog: &Catalog, period: Period, opts: &ScheduleOptions) -> &[ScheduleRow] {
        let fresh = matches!(
            &self.key,
            Some((c, p, o)) if c == catalog && *p == period && o == opts
        );
        if !fresh {
            self.rows = generate_with_options(catalog, period, opts);
            self.key = Some((catalog.clone(), period, opts.clone()));
        }
        &self.rows
    }

    pub fn is_cached(&self, catalog: &Catalog, period: Period, opts: &ScheduleOptions) -> bool {
        matches!(
            &self.key,
            Some((c, p, o)) if c == catalog && *p == period && o == opts
        )
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.rows.clear();
    }
}
