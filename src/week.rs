use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Deserialize;

/// First day of the displayed week. Drives both the strip labels and the dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Seven consecutive days, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    days: [NaiveDate; 7],
}

impl Week {
    pub fn days(&self) -> &[NaiveDate; 7] {
        &self.days
    }

    #[cfg(test)]
    pub fn first_day(&self) -> NaiveDate {
        self.days[0]
    }

    #[cfg(test)]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Single-letter labels taken from the window's own weekdays.
    pub fn labels(&self) -> [&'static str; 7] {
        self.days.map(|d| day_letter(d.weekday()))
    }
}

fn day_letter(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "M",
        Weekday::Tue => "T",
        Weekday::Wed => "W",
        Weekday::Thu => "T",
        Weekday::Fri => "F",
        Weekday::Sat => "S",
        Weekday::Sun => "S",
    }
}

/// Returns the week containing `anchor`, starting on `start`.
///
/// `None` when part of that week lies outside chrono's date range.
pub fn week_window(anchor: NaiveDate, start: WeekStart) -> Option<Week> {
    let offset = (7 + anchor.weekday().num_days_from_monday()
        - start.weekday().num_days_from_monday())
        % 7;
    let first = anchor.checked_sub_days(Days::new(u64::from(offset)))?;
    let mut days = [first; 7];
    let mut day = first;
    for slot in days.iter_mut().skip(1) {
        day = day.succ_opt()?;
        *slot = day;
    }
    Some(Week { days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn window(anchor: NaiveDate, start: WeekStart) -> Week {
        week_window(anchor, start).expect("representable week")
    }

    #[test]
    fn monday_week_rolls_over_the_year() {
        // 2026-01-01 is a Thursday
        let week = window(ymd(2026, 1, 1), WeekStart::Monday);
        assert_eq!(week.first_day(), ymd(2025, 12, 29));
        assert_eq!(week.days()[6], ymd(2026, 1, 4));
        assert_eq!(week.labels(), ["M", "T", "W", "T", "F", "S", "S"]);
    }

    #[test]
    fn sunday_week_rolls_over_a_leap_february() {
        // 2024-03-01 is a Friday
        let week = window(ymd(2024, 3, 1), WeekStart::Sunday);
        assert_eq!(week.first_day(), ymd(2024, 2, 25));
        assert!(week.contains(ymd(2024, 2, 29)));
        assert_eq!(week.days()[6], ymd(2024, 3, 2));
        assert_eq!(week.labels(), ["S", "M", "T", "W", "T", "F", "S"]);
    }

    #[test]
    fn anchor_on_start_day_begins_the_window() {
        let monday = ymd(2026, 10, 12);
        assert_eq!(window(monday, WeekStart::Monday).first_day(), monday);
        let sunday = ymd(2026, 10, 18);
        assert_eq!(window(sunday, WeekStart::Sunday).first_day(), sunday);
        assert_eq!(window(sunday, WeekStart::Monday).days()[6], sunday);
    }

    #[test]
    fn weeks_at_the_calendar_limits_do_not_panic() {
        for start in [WeekStart::Monday, WeekStart::Sunday] {
            for n in 0..14 {
                for edge in [
                    NaiveDate::MAX.checked_sub_days(Days::new(n)),
                    NaiveDate::MIN.checked_add_days(Days::new(n)),
                ] {
                    let anchor = edge.expect("inside range");
                    if let Some(w) = week_window(anchor, start) {
                        assert!(w.contains(anchor));
                        assert_eq!(w.first_day().weekday(), start.weekday());
                    }
                }
            }
        }
        // MAX can close the week for at most one of the two conventions
        assert!([WeekStart::Monday, WeekStart::Sunday]
            .iter()
            .any(|s| week_window(NaiveDate::MAX, *s).is_none()));
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (-100_000i64..100_000)
            .prop_map(|offset| ymd(2000, 1, 1) + chrono::TimeDelta::days(offset))
    }

    fn any_start() -> impl Strategy<Value = WeekStart> {
        prop_oneof![Just(WeekStart::Monday), Just(WeekStart::Sunday)]
    }

    proptest! {
        #[test]
        fn window_is_seven_consecutive_days_containing_anchor(d in any_date(), start in any_start()) {
            let week = window(d, start);
            prop_assert!(week.contains(d));
            for pair in week.days().windows(2) {
                prop_assert_eq!(pair[0].succ_opt(), Some(pair[1]));
            }
            prop_assert_eq!(week.first_day().weekday(), start.weekday());
        }

        #[test]
        fn reanchoring_inside_the_window_is_stable(d in any_date(), start in any_start(), i in 0usize..7) {
            let week = window(d, start);
            prop_assert_eq!(window(week.days()[i], start), week);
        }

        #[test]
        fn labels_match_weekdays(d in any_date(), start in any_start()) {
            let week = window(d, start);
            for (day, label) in week.days().iter().zip(week.labels()) {
                prop_assert_eq!(day_letter(day.weekday()), label);
            }
        }
    }
}
