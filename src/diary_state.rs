use crate::diary_entry::DiaryEntry;
use crate::error::DiaryError;
use crate::week::{week_window, Week, WeekStart};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// In-memory diary: entries indexed by day, plus the day the user is looking at.
pub struct DiaryState {
    entries: BTreeMap<NaiveDate, Vec<DiaryEntry>>,
    selected_day: NaiveDate,
    week: Week,
    week_start: WeekStart,
}

impl DiaryState {
    pub fn new(today: NaiveDate, week_start: WeekStart) -> Result<Self, DiaryError> {
        let week = week_window(today, week_start)
            .ok_or_else(|| DiaryError::DateOutOfRange(format!("week of {today}")))?;
        Ok(DiaryState {
            entries: BTreeMap::new(),
            selected_day: today,
            week,
            week_start,
        })
    }

    /// Appends to the entry's own day, keeping insertion order.
    pub fn add_entry(&mut self, entry: DiaryEntry) {
        info!(date = %entry.date, emotion = %entry.emotion, "diary entry added");
        self.entries.entry(entry.date).or_default().push(entry);
    }

    pub fn delete_entry(&mut self, date: NaiveDate, index: usize) -> Result<DiaryEntry, DiaryError> {
        let day = self
            .entries
            .get_mut(&date)
            .filter(|day| index < day.len())
            .ok_or(DiaryError::EntryNotFound { date, index })?;
        let removed = day.remove(index);
        if day.is_empty() {
            self.entries.remove(&date);
        }
        info!(date = %date, id = %removed.id, "diary entry deleted");
        Ok(removed)
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[DiaryEntry] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_entries(&self, date: NaiveDate) -> bool {
        !self.entries_on(date).is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn selected_day(&self) -> NaiveDate {
        self.selected_day
    }

    pub fn current_week(&self) -> Week {
        self.week
    }

    /// Moves the selection, unless the week around `date` falls off the calendar.
    pub fn select_day(&mut self, date: NaiveDate) {
        match week_window(date, self.week_start) {
            Some(week) => {
                self.selected_day = date;
                self.week = week;
            }
            None => debug!(%date, "selection kept, week out of range"),
        }
    }

    pub fn select_today(&mut self, today: NaiveDate) {
        self.select_day(today);
    }

    pub fn select_previous_day(&mut self) {
        self.shift_back(1);
    }

    pub fn select_next_day(&mut self) {
        self.shift_forward(1);
    }

    pub fn select_previous_week(&mut self) {
        self.shift_back(7);
    }

    pub fn select_next_week(&mut self) {
        self.shift_forward(7);
    }

    fn shift_back(&mut self, days: u64) {
        if let Some(d) = self.selected_day.checked_sub_days(Days::new(days)) {
            self.select_day(d);
        }
    }

    fn shift_forward(&mut self, days: u64) {
        if let Some(d) = self.selected_day.checked_add_days(Days::new(days)) {
            self.select_day(d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary_entry::EntryDraft;
    use crate::emotion::Emotion;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn state_on(day: NaiveDate) -> DiaryState {
        DiaryState::new(day, WeekStart::Monday).expect("representable week")
    }

    fn entry(date: NaiveDate, text: &str) -> DiaryEntry {
        DiaryEntry::new(date, text.to_string(), Emotion::Happy, None)
    }

    fn texts(state: &DiaryState, date: NaiveDate) -> Vec<&str> {
        state.entries_on(date).iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn appending_keeps_order_and_leaves_other_days_alone() {
        let d1 = ymd(2026, 10, 17);
        let d2 = ymd(2026, 10, 18);
        let mut state = state_on(d2);
        state.add_entry(entry(d1, "yesterday"));
        let before: Vec<DiaryEntry> = state.entries_on(d1).to_vec();

        state.add_entry(entry(d2, "first"));
        state.add_entry(entry(d2, "second"));

        assert_eq!(state.entries_on(d1), before.as_slice());
        assert_eq!(texts(&state, d2), ["first", "second"]);
        assert_eq!(state.entry_count(), 3);
    }

    #[test]
    fn every_entry_is_stored_under_its_own_date() {
        let mut state = state_on(ymd(2026, 1, 1));
        for day in 1..=5 {
            state.add_entry(entry(ymd(2026, 1, day), "x"));
            state.add_entry(entry(ymd(2026, 2, day), "y"));
        }
        for (date, entries) in &state.entries {
            assert!(entries.iter().all(|e| e.date == *date));
        }
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let day = ymd(2026, 10, 18);
        let mut state = state_on(day);
        for t in ["a", "b", "c", "d"] {
            state.add_entry(entry(day, t));
        }

        let removed = state.delete_entry(day, 1).unwrap();
        assert_eq!(removed.text, "b");
        assert_eq!(texts(&state, day), ["a", "c", "d"]);
    }

    #[test]
    fn delete_out_of_range_is_an_error() {
        let day = ymd(2026, 10, 18);
        let mut state = state_on(day);
        assert_eq!(
            state.delete_entry(day, 0),
            Err(DiaryError::EntryNotFound { date: day, index: 0 })
        );
        state.add_entry(entry(day, "only"));
        assert!(state.delete_entry(day, 1).is_err());
        assert_eq!(state.entry_count(), 1);
    }

    #[test]
    fn deleting_last_entry_empties_the_day() {
        let day = ymd(2026, 10, 18);
        let mut state = state_on(day);
        state.add_entry(entry(day, "only"));
        state.delete_entry(day, 0).unwrap();
        assert!(!state.has_entries(day));
        assert!(state.entries.is_empty());
    }

    #[test]
    fn submitted_form_lands_on_its_day() {
        let day = ymd(2026, 10, 18);
        let mut state = state_on(day);
        let mut draft = EntryDraft::new(day);
        for c in "Great day".chars() {
            draft.text.insert(c);
        }
        draft.submit(|e| state.add_entry(e));

        let saved = state.entries_on(day);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].emotion, Emotion::Happy);
        assert_eq!(saved[0].text, "Great day");
        assert_eq!(saved[0].date, day);
        assert!(saved[0].photo.is_none());
    }

    #[test]
    fn cancelled_form_leaves_the_day_unchanged() {
        let day = ymd(2026, 10, 18);
        let mut state = state_on(day);
        state.add_entry(entry(day, "kept"));
        let before = state.entries_on(day).to_vec();

        let mut draft = EntryDraft::new(day);
        draft.text.insert('x');
        draft.emotion = Emotion::Sad;
        drop(draft);

        assert_eq!(state.entries_on(day), before.as_slice());
    }

    #[test]
    fn navigation_moves_selection_and_week() {
        let mut state = state_on(ymd(2026, 10, 18));
        state.select_next_day();
        assert_eq!(state.selected_day(), ymd(2026, 10, 19));
        assert_eq!(state.current_week().first_day(), ymd(2026, 10, 19));

        state.select_previous_week();
        assert_eq!(state.selected_day(), ymd(2026, 10, 12));

        state.select_next_week();
        state.select_previous_day();
        assert_eq!(state.selected_day(), ymd(2026, 10, 18));

        state.select_day(ymd(2020, 2, 29));
        assert_eq!(state.current_week().first_day(), ymd(2020, 2, 24));
        state.select_today(ymd(2026, 10, 18));
        assert_eq!(state.selected_day(), ymd(2026, 10, 18));
    }

    #[test]
    fn navigation_stops_before_the_calendar_runs_out() {
        let near_end = NaiveDate::MAX.checked_sub_days(Days::new(20)).unwrap();
        let mut state = state_on(near_end);
        for _ in 0..10 {
            state.select_next_week();
            state.select_next_day();
        }
        let last = state.selected_day();
        assert!(last > near_end);
        assert!(state.current_week().contains(last));
        state.select_next_day();
        state.select_next_week();
        assert_eq!(state.selected_day(), last);

        let near_start = NaiveDate::MIN.checked_add_days(Days::new(20)).unwrap();
        let mut state = state_on(near_start);
        for _ in 0..10 {
            state.select_previous_week();
            state.select_previous_day();
        }
        assert!(state.current_week().contains(state.selected_day()));
    }

    #[test]
    fn new_rejects_a_day_whose_week_is_unrepresentable() {
        let unrepresentable = [WeekStart::Monday, WeekStart::Sunday]
            .into_iter()
            .find(|s| week_window(NaiveDate::MAX, *s).is_none())
            .expect("MAX ends at most one week convention");
        assert!(matches!(
            DiaryState::new(NaiveDate::MAX, unrepresentable),
            Err(DiaryError::DateOutOfRange(_))
        ));
    }
}
