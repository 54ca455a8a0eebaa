//! Month view model for picking a day.
//!
//! A month is shown as a fixed 6x7 grid that starts on the Sunday on or before
//! the first of the month, so it always spills into the neighbouring months.

use chrono::{Datelike, Days, NaiveDate};

use crate::todo::{DateKey, TodoCollection};

pub const GRID_CELLS: usize = 42;

/// Marker shown on a day in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayIndicator {
    /// No todos on this day
    Empty,
    /// At least one todo is still open
    Pending,
    AllCompleted,
}

impl DayIndicator {
    pub fn for_date(todos: &TodoCollection, date: &DateKey) -> Self {
        if !todos.has_todos(date) {
            DayIndicator::Empty
        } else if todos.all_completed(date) {
            DayIndicator::AllCompleted
        } else {
            DayIndicator::Pending
        }
    }

    pub fn symbol(self) -> char {
        match self {
            DayIndicator::Empty => ' ',
            DayIndicator::Pending => '*',
            DayIndicator::AllCompleted => '+',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub indicator: DayIndicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthView {
    /// Returns None for an out-of-range month.
    pub fn build(todos: &TodoCollection, year: i32, month: u32) -> Option<Self> {
        let days = month_grid(year, month)?
            .into_iter()
            .map(|date| CalendarDay {
                date,
                in_month: date.month() == month && date.year() == year,
                indicator: DayIndicator::for_date(todos, &DateKey::from(date)),
            })
            .collect();

        Some(Self { year, month, days })
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// The 42 dates shown for a month, Sunday first.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = first.weekday().num_days_from_sunday();
    let start = first.checked_sub_days(Days::new(u64::from(lead)))?;

    (0..GRID_CELLS as u64)
        .map(|offset| start.checked_add_days(Days::new(offset)))
        .collect()
}

/// Step `delta` months from (year, month), wrapping across years.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{TodoId, TodoItem};
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_starts_on_sunday_before_first() {
        // 2024-05-01 is a Wednesday.
        let grid = month_grid(2024, 5).unwrap();
        assert_eq!(grid.len(), GRID_CELLS);
        assert_eq!(grid[0], date(2024, 4, 28));
        assert_eq!(grid[0].weekday(), Weekday::Sun);
        assert_eq!(grid[3], date(2024, 5, 1));
        assert_eq!(grid[41], date(2024, 6, 8));
    }

    #[test]
    fn test_grid_when_first_is_sunday() {
        // 2024-09-01 is a Sunday.
        let grid = month_grid(2024, 9).unwrap();
        assert_eq!(grid[0], date(2024, 9, 1));
    }

    #[test]
    fn test_grid_invalid_month() {
        assert!(month_grid(2024, 13).is_none());
        assert!(month_grid(2024, 0).is_none());
    }

    #[test]
    fn test_shift_month_wraps() {
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 6, 0), (2024, 6));
        assert_eq!(shift_month(2024, 3, -15), (2022, 12));
    }

    #[test]
    fn test_day_indicator() {
        let key = DateKey::new("2024-05-10");
        let mut todos = TodoCollection::new();
        assert_eq!(DayIndicator::for_date(&todos, &key), DayIndicator::Empty);

        todos.push(key.clone(), TodoItem::new(TodoId(1), "A".to_string()));
        todos.push(key.clone(), TodoItem::new(TodoId(2), "B".to_string()));
        assert_eq!(DayIndicator::for_date(&todos, &key), DayIndicator::Pending);

        todos.find_mut(&key, TodoId(1)).unwrap().toggle();
        todos.find_mut(&key, TodoId(2)).unwrap().toggle();
        assert_eq!(DayIndicator::for_date(&todos, &key), DayIndicator::AllCompleted);
    }

    #[test]
    fn test_month_view_marks_days() {
        let mut todos = TodoCollection::new();
        todos.push(
            DateKey::new("2024-05-10"),
            TodoItem::new(TodoId(1), "A".to_string()),
        );

        let view = MonthView::build(&todos, 2024, 5).unwrap();
        assert_eq!(view.title(), "May 2024");
        assert_eq!(view.weeks().count(), 6);

        let tenth = view.days.iter().find(|d| d.date == date(2024, 5, 10)).unwrap();
        assert!(tenth.in_month);
        assert_eq!(tenth.indicator, DayIndicator::Pending);

        assert!(!view.days[0].in_month);
        let marked = view
            .days
            .iter()
            .filter(|d| d.indicator != DayIndicator::Empty)
            .count();
        assert_eq!(marked, 1);
    }
}
