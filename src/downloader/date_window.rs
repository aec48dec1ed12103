use crate::constants::DEFAULT_WINDOW_DAYS;
use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDate};

/// The date range handed to the transfer engine.
///
/// When `anchor` is `None`, `end` is `None` too and the window means "today,
/// looking back `day_count` days"; resolving "today" is left to the engine.
/// Otherwise `day_count` is the absolute day difference between `anchor` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub anchor: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub day_count: u64,
}

impl DateWindow {
    /// Inclusive `(earliest, latest)` calendar bounds of the window.
    ///
    /// `today` is only consulted when the window has no anchor.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let back = Duration::days(self.day_count as i64);
        match (self.anchor, self.end) {
            (Some(anchor), Some(end)) => (anchor.min(end), anchor.max(end)),
            (Some(anchor), None) => (anchor - back, anchor),
            (None, _) => (today - back, today),
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (earliest, latest) = self.bounds(today);
        earliest <= date && date <= latest
    }
}

/// Parses a strict `YYYY-MM-DD` literal into a calendar date.
///
/// `field` names the option the value came from and is reported in the error.
pub fn parse_date(field: &'static str, value: &str) -> AppResult<NaiveDate> {
    let malformed = || AppError::MalformedDate {
        field,
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(malformed());
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(malformed());
    }
    if !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return Err(malformed());
    }

    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

/// Resolves the optional `startday`/`endday` options into a [`DateWindow`].
///
/// Blank strings count as absent. The cases are checked in order:
///
/// 1. neither date: no anchor, no end, `day_count = 10`
/// 2. only `startday`: it becomes the window end, `anchor = startday + 10 days`
/// 3. only `endday`: [`AppError::InvalidCombination`]
/// 4. both: `anchor = startday`, `end = endday`, `day_count = |endday - startday|`
///
/// A `startday` later than `endday` is not rejected nor reordered; the day
/// count is still the absolute difference.
///
/// # Errors
///
/// Returns `MalformedDate` naming the field when a date is not a valid `YYYY-MM-DD`
/// calendar date, and `InvalidCombination` for case 3.
pub fn resolve_date_window(startday: Option<&str>, endday: Option<&str>) -> AppResult<DateWindow> {
    let startday = startday.map(str::trim).filter(|s| !s.is_empty());
    let endday = endday.map(str::trim).filter(|s| !s.is_empty());

    match (startday, endday) {
        (None, None) => Ok(DateWindow {
            anchor: None,
            end: None,
            day_count: DEFAULT_WINDOW_DAYS,
        }),
        (Some(start), None) => {
            let end = parse_date("startday", start)?;
            let anchor = end
                .checked_add_signed(Duration::days(DEFAULT_WINDOW_DAYS as i64))
                .ok_or_else(|| AppError::MalformedDate {
                    field: "startday",
                    value: start.to_string(),
                })?;
            Ok(DateWindow {
                anchor: Some(anchor),
                end: Some(end),
                day_count: DEFAULT_WINDOW_DAYS,
            })
        }
        (None, Some(_)) => Err(AppError::InvalidCombination(
            "<endday> cannot be used without <startday>".to_string(),
        )),
        (Some(start), Some(end)) => {
            let anchor = parse_date("startday", start)?;
            let end = parse_date("endday", end)?;
            Ok(DateWindow {
                anchor: Some(anchor),
                end: Some(end),
                day_count: (end - anchor).num_days().unsigned_abs(),
            })
        }
    }
}
