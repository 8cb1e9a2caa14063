use crate::model::{LeaveCalendar, Period};
use chrono::{Datelike, NaiveDate, Weekday};

/// Du 1er janvier de l'année cible au dernier jour du mois cible, inclus.
pub(super) fn replay_days(period: &Period) -> impl Iterator<Item = NaiveDate> {
    let last = period.last_day();
    period
        .year_start()
        .iter_days()
        .take_while(move |d| *d <= last)
}

/// Ni dimanche, ni congé du mois auquel appartient le jour.
pub(super) fn is_admissible(date: NaiveDate, leave: &LeaveCalendar) -> bool {
    date.weekday() != Weekday::Sun && !leave.is_leave(date)
}

/// Semaine du mois, base 0: jours 1-7 → 0, 8-14 → 1, ...
pub(super) fn week_index(date: NaiveDate) -> u32 {
    date.day0() / 7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn replay_covers_year_to_date() {
        let period = Period::new(2025, 1).unwrap();
        let days: Vec<_> = replay_days(&period).collect();
        assert_eq!(days.len(), 31 + 28);
        assert_eq!(days.first(), Some(&date(2025, 1, 1)));
        assert_eq!(days.last(), Some(&date(2025, 2, 28)));
    }

    #[test]
    fn sunday_and_leave_are_skipped() {
        let mut leave = LeaveCalendar::new();
        leave.toggle(&Period::new(2025, 0).unwrap(), 7).unwrap();
        assert!(!is_admissible(date(2025, 1, 5), &leave)); // dimanche
        assert!(!is_admissible(date(2025, 1, 7), &leave));
        assert!(is_admissible(date(2025, 2, 7), &leave));
    }

    #[test]
    fn weeks_start_at_zero() {
        assert_eq!(week_index(date(2025, 3, 1)), 0);
        assert_eq!(week_index(date(2025, 3, 7)), 0);
        assert_eq!(week_index(date(2025, 3, 8)), 1);
        assert_eq!(week_index(date(2025, 3, 29)), 4);
    }
}
