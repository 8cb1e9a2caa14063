use super::rotation::RotationState;
use super::selection::{associates, sharing2, sharing3, sharing4, staff_at};
use super::util::{is_admissible, replay_days, week_index};
use super::{ScheduleOptions, ScheduleRow};
use crate::model::{Catalog, Location, LocationId, Period, SharingDay, Staff};
use chrono::Datelike;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Lieu actif avec son personnel pré-filtré.
struct LocationPool<'a> {
    location: &'a Location,
    staff: Vec<&'a Staff>,
    associates: Vec<&'a Staff>,
}

pub(super) fn build_rows(catalog: &Catalog, period: Period, opts: &ScheduleOptions) -> Vec<ScheduleRow> {
    if catalog.locations.is_empty()
        || catalog.staff.is_empty()
        || catalog.topics.is_empty()
        || catalog.verses.is_empty()
    {
        debug!(%period, "empty catalog collection, nothing to schedule");
        return Vec::new();
    }

    let active: Vec<&Location> = catalog
        .locations
        .iter()
        .filter(|l| !l.excluded_from_schedule)
        .collect();
    if active.is_empty() {
        debug!(%period, "every location is excluded from the schedule");
        return Vec::new();
    }

    let mut primary_rotation = active.clone();
    primary_rotation.sort_by(|a, b| a.id.cmp(&b.id));

    let working: Vec<&Staff> = catalog.staff.iter().filter(|s| s.is_working()).collect();
    let mut pools: HashMap<&LocationId, LocationPool<'_>> = HashMap::new();
    for loc in active.iter().copied() {
        pools.entry(&loc.id).or_insert_with(|| {
            let staff = staff_at(&working, &loc.id);
            let associates = associates(&staff);
            LocationPool {
                location: loc,
                staff,
                associates,
            }
        });
    }

    debug!(%period, active = active.len(), working = working.len(), "replaying rotation from january");

    let mut state = RotationState::default();
    let mut rows = Vec::new();

    for date in replay_days(&period) {
        if !is_admissible(date, &catalog.leave_days) {
            trace!(%date, "skipped (sunday or leave)");
            continue;
        }

        let cursor = state.next_day(
            catalog.topics.len(),
            catalog.verses.len(),
            primary_rotation.len(),
        );
        let emit = period.contains(date);

        let day_pools: Vec<&LocationPool<'_>> = SharingDay::from_weekday(date.weekday())
            .and_then(|day| catalog.rule_for(day))
            .map(|rule| rule.location_ids.iter().filter_map(|id| pools.get(id)).collect())
            .unwrap_or_default();

        let template = emit.then(|| ScheduleRow {
            date,
            day: opts.day_labels.label(date.weekday()).to_string(),
            topic: catalog.topics[cursor.topic].name.clone(),
            verse: catalog.verses[cursor.verse].text.clone(),
            sharing1_location: primary_rotation[cursor.primary_location].name.clone(),
            sub_row_location: opts.unassigned.clone(),
            sharing2_staff: opts.unassigned.clone(),
            sharing3_staff: opts.unassigned.clone(),
            sharing4_staff: opts.unassigned.clone(),
            is_first_sub_row: true,
            sub_row_span: 1,
        });

        if day_pools.is_empty() {
            rows.extend(template);
            continue;
        }

        let week = week_index(date);
        let span = day_pools.len();
        for (idx, pool) in day_pools.into_iter().enumerate() {
            let s2 = sharing2(&pool.staff);
            let s3 = sharing3(&pool.staff, week);
            let s4 = sharing4(&pool.associates, state.next_assistant(&pool.location.id));

            if let Some(template) = &template {
                let name_or_na =
                    |s: Option<&Staff>| s.map_or_else(|| opts.not_available.clone(), |s| s.name.clone());
                rows.push(ScheduleRow {
                    sub_row_location: pool.location.name.clone(),
                    sharing2_staff: name_or_na(s2),
                    sharing3_staff: name_or_na(s3),
                    sharing4_staff: name_or_na(s4),
                    is_first_sub_row: idx == 0,
                    sub_row_span: span,
                    ..template.clone()
                });
            }
        }
    }

    debug!(%period, rows = rows.len(), "schedule generated");
    rows
}
