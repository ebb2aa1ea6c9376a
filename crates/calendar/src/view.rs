//! Calendar screen state: visible layers, the displayed month and the
//! selected day.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventCategory};

/// Visible categories. All are on by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryToggles {
    visible: BTreeSet<EventCategory>,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            visible: EventCategory::ALL.into_iter().collect(),
        }
    }
}

impl CategoryToggles {
    pub fn is_visible(&self, category: EventCategory) -> bool {
        self.visible.contains(&category)
    }

    pub fn toggle(&mut self, category: EventCategory) {
        if !self.visible.remove(&category) {
            self.visible.insert(category);
        }
    }

    pub fn show_only(&mut self, category: EventCategory) {
        self.visible = BTreeSet::from([category]);
    }

    pub fn show_all(&mut self) {
        *self = Self::default();
    }
}

/// Events grouped by day, ascending. Order within a day is preserved.
pub fn group_by_day<'a, I>(events: I) -> BTreeMap<NaiveDate, Vec<&'a CalendarEvent>>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut days: BTreeMap<NaiveDate, Vec<&'a CalendarEvent>> = BTreeMap::new();
    for event in events {
        days.entry(event.day()).or_default().push(event);
    }
    days
}

/// Events grouped by category, for the per-layer legend counts.
pub fn group_by_category<'a, I>(events: I) -> BTreeMap<EventCategory, Vec<&'a CalendarEvent>>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut groups: BTreeMap<EventCategory, Vec<&'a CalendarEvent>> = BTreeMap::new();
    for event in events {
        groups.entry(event.category).or_default().push(event);
    }
    groups
}

/// One rendered month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthFrame<'a> {
    pub first_day: NaiveDate,
    /// Days with at least one visible event in the month.
    pub days: BTreeMap<NaiveDate, Vec<&'a CalendarEvent>>,
    /// Visible events on the selected day, if a day is selected.
    pub selected: Vec<&'a CalendarEvent>,
    pub visible_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarScreen {
    pub toggles: CategoryToggles,
    month: NaiveDate,
    selected_day: Option<NaiveDate>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl CalendarScreen {
    /// Screen showing the month containing `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            toggles: CategoryToggles::default(),
            month: first_of_month(today),
            selected_day: None,
        }
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    pub fn next_month(&mut self) {
        if let Some(m) = self.month.checked_add_months(Months::new(1)) {
            self.month = m;
        }
        self.selected_day = None;
    }

    pub fn prev_month(&mut self) {
        if let Some(m) = self.month.checked_sub_months(Months::new(1)) {
            self.month = m;
        }
        self.selected_day = None;
    }

    /// Select a day, moving to its month when needed.
    pub fn select_day(&mut self, day: NaiveDate) {
        self.month = first_of_month(day);
        self.selected_day = Some(day);
    }

    pub fn clear_selection(&mut self) {
        self.selected_day = None;
    }

    /// `[first, first of next month)`.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        let end = self
            .month
            .checked_add_months(Months::new(1))
            .unwrap_or_else(|| self.month + Days::new(31));
        (self.month, end)
    }

    pub fn frame<'a>(&self, events: &'a [CalendarEvent]) -> MonthFrame<'a> {
        let (start, end) = self.window();
        let visible = events.iter().filter(|e| {
            let day = e.day();
            self.toggles.is_visible(e.category) && day >= start && day < end
        });
        let days = group_by_day(visible);
        let selected = self
            .selected_day
            .and_then(|d| days.get(&d).cloned())
            .unwrap_or_default();
        let visible_count = days.values().map(Vec::len).sum();
        MonthFrame {
            first_day: self.month,
            days,
            selected,
            visible_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKey;
    use crate::source::SourceKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(source: SourceKind, id: &str, day: NaiveDate) -> CalendarEvent {
        let category = source.category();
        CalendarEvent {
            key: EventKey {
                source,
                id: id.into(),
            },
            title: id.into(),
            start: day.and_hms_opt(9, 0, 0).unwrap(),
            category,
            color: category.color(),
        }
    }

    fn events() -> Vec<CalendarEvent> {
        vec![
            event(SourceKind::Order, "o1", date(2024, 4, 30)),
            event(SourceKind::Order, "o2", date(2024, 5, 2)),
            event(SourceKind::CallLog, "c1", date(2024, 5, 2)),
            event(SourceKind::ProductionBatch, "b1", date(2024, 5, 31)),
            event(SourceKind::SupplierInvoice, "i1", date(2024, 6, 1)),
        ]
    }

    #[test]
    fn frame_is_limited_to_month_and_visible_layers() {
        let all = events();
        let mut screen = CalendarScreen::new(date(2024, 5, 17));
        let frame = screen.frame(&all);
        assert_eq!(frame.first_day, date(2024, 5, 1));
        assert_eq!(frame.visible_count, 3);
        assert_eq!(frame.days.len(), 2);

        screen.toggles.toggle(EventCategory::Calls);
        assert_eq!(screen.frame(&all).visible_count, 2);
        screen.toggles.show_only(EventCategory::Production);
        assert_eq!(screen.frame(&all).visible_count, 1);
        screen.toggles.show_all();
        assert_eq!(screen.frame(&all).visible_count, 3);
    }

    #[test]
    fn selected_day_lists_its_events() {
        let all = events();
        let mut screen = CalendarScreen::new(date(2024, 5, 17));
        screen.select_day(date(2024, 5, 2));
        let ids: Vec<&str> = screen
            .frame(&all)
            .selected
            .iter()
            .map(|e| e.key.id.as_str())
            .collect();
        assert_eq!(ids, vec!["o2", "c1"]);
    }

    #[test]
    fn month_navigation_clears_selection() {
        let all = events();
        let mut screen = CalendarScreen::new(date(2024, 5, 31));
        screen.select_day(date(2024, 5, 31));
        screen.next_month();
        assert_eq!(screen.month(), date(2024, 6, 1));
        assert!(screen.selected_day().is_none());
        assert_eq!(screen.frame(&all).visible_count, 1);
        screen.prev_month();
        screen.prev_month();
        assert_eq!(screen.window(), (date(2024, 4, 1), date(2024, 5, 1)));
    }

    #[test]
    fn selecting_a_day_in_another_month_moves_there() {
        let mut screen = CalendarScreen::new(date(2024, 5, 1));
        screen.select_day(date(2024, 12, 24));
        assert_eq!(screen.month(), date(2024, 12, 1));
    }

    #[test]
    fn category_grouping() {
        let all = events();
        let groups = group_by_category(&all);
        assert_eq!(groups[&EventCategory::Orders].len(), 2);
        assert_eq!(groups[&EventCategory::Payments].len(), 1);
        assert!(!groups.contains_key(&EventCategory::Inventory));
    }
}
