use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar month as `(year, month)`, month in `1..=12`.
///
/// # Examples
///
/// ```
/// use wis_scraper::Month;
///
/// let march = Month::new(2020, 3).unwrap();
/// assert_eq!(march.to_string(), "2020-03");
/// assert!(Month::new(2020, 13).is_none());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub(crate) i32, pub(crate) u32);

impl Month {
    /// `None` unless `month` is in `1..=12` and the month is a representable date.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::of)
    }

    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(date.year(), date.month())
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, self.1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        days_in_month(self.0, self.1)
            .and_then(|day| NaiveDate::from_ymd_opt(self.0, self.1, day))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(self) -> Self {
        if self.1 >= 12 {
            Self(self.0 + 1, 1)
        } else {
            Self(self.0, self.1 + 1)
        }
    }

    /// Every month from `start` through `end`, both inclusive.
    pub fn range(start: Month, end: Month) -> MonthRange {
        MonthRange {
            next: Some(start),
            end,
        }
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// Iterator returned by [`Month::range`].
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<Month>,
    end: Month,
}

impl Iterator for MonthRange {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let current = self.next.filter(|m| *m <= self.end)?;
        self.next = Some(current.next());
        Some(current)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}
