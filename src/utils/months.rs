//! Calendar month helpers
//!
//! Month arithmetic wraps across the year boundary (Dec + 1 = Jan), which is
//! what planting windows and growing-season sums need in both hemispheres.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

/// Short run of consecutive months (growing season, hint windows)
pub type MonthWindow = SmallVec<[Month; 8]>;

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number (January = 1)
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// 0-based index (January = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Month from its 1-based number, `None` outside 1..=12
    pub fn from_number(number: u32) -> Option<Self> {
        if (1..=12).contains(&number) {
            Some(Self::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    /// Month `delta` months away, wrapping around the year
    pub fn offset(self, delta: i32) -> Self {
        let idx = (self.index() as i32 + delta).rem_euclid(12);
        Self::ALL[idx as usize]
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn previous(self) -> Self {
        self.offset(-1)
    }

    /// Shortest distance in months between two months on the circular calendar
    pub fn circular_distance(self, other: Month) -> u32 {
        let forward = (other.index() as i32 - self.index() as i32).rem_euclid(12) as u32;
        forward.min(12 - forward)
    }

    /// Inclusive run of months from `start` to `end`, wrapping if `end < start`
    pub fn span(start: Month, end: Month) -> MonthWindow {
        let mut months = MonthWindow::new();
        let mut current = start;
        loop {
            months.push(current);
            if current == end {
                break;
            }
            current = current.next();
        }
        months
    }

    /// `self` followed by `following` further months
    pub fn window(self, following: u32) -> MonthWindow {
        (0..=following.min(11)).map(|i| self.offset(i as i32)).collect()
    }

    /// Number of days in a non-leap year
    pub fn days(self) -> u32 {
        match self {
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl From<chrono::Month> for Month {
    fn from(month: chrono::Month) -> Self {
        Self::ALL[month.number_from_month() as usize - 1]
    }
}
