use crate::model::{LocationId, Staff, StaffCategory};

use StaffCategory::{Accountant, Mis, Permanent};

const SHARING2_PRIORITY: [StaffCategory; 3] = [Permanent, Accountant, Mis];
const SHARING3_EVEN_WEEK: [StaffCategory; 3] = [Accountant, Mis, Permanent];
const SHARING3_ODD_WEEK: [StaffCategory; 3] = [Mis, Accountant, Permanent];

/// Personnel en activité rattaché à un lieu (principal ou additionnel), dans l'ordre fourni.
pub(super) fn staff_at<'a>(working: &[&'a Staff], location: &LocationId) -> Vec<&'a Staff> {
    working.iter().copied().filter(|s| s.is_at(location)).collect()
}

/// Premier membre de la première catégorie trouvée, dans l'ordre de priorité.
fn first_by_priority<'a>(pool: &[&'a Staff], priority: &[StaffCategory]) -> Option<&'a Staff> {
    priority
        .iter()
        .find_map(|cat| pool.iter().copied().find(|s| s.category == *cat))
}

pub(super) fn sharing2<'a>(pool: &[&'a Staff]) -> Option<&'a Staff> {
    first_by_priority(pool, &SHARING2_PRIORITY)
}

/// Alterne selon la parité de la semaine du mois: semaine d'indice pair → comptable d'abord.
pub(super) fn sharing3<'a>(pool: &[&'a Staff], week_index: u32) -> Option<&'a Staff> {
    let priority = if week_index % 2 == 0 {
        &SHARING3_EVEN_WEEK
    } else {
        &SHARING3_ODD_WEEK
    };
    first_by_priority(pool, priority)
}

/// Associés du lieu, triés par identifiant croissant.
pub(super) fn associates<'a>(pool: &[&'a Staff]) -> Vec<&'a Staff> {
    let mut out: Vec<&Staff> = pool
        .iter()
        .copied()
        .filter(|s| s.category == StaffCategory::Associate)
        .collect();
    out.sort_by(|a, b| a.id.cmp(&b.id));
    out
}

pub(super) fn sharing4<'a>(associates: &[&'a Staff], cursor: usize) -> Option<&'a Staff> {
    if associates.is_empty() {
        return None;
    }
    Some(associates[cursor % associates.len()])
}
