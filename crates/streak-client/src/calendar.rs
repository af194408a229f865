//! Month navigation state for the dashboard grid.

use chrono::{Datelike, NaiveDate, Utc};

/// The dashboard's "current selected day" cursor. It names the displayed
/// month and the highlighted day; moving between months recomputes the day
/// count and clamps the selected day to it.
///
/// `month` is the human month 1–12; the zero-based index the API expects is
/// exposed through [`MonthCursor::api_month`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl MonthCursor {
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Zero-based month index used on the wire (0 = January).
    pub fn api_month(&self) -> u32 {
        self.month - 1
    }

    /// Number of days in the displayed month (accounting for leap years).
    pub fn days_in_month(&self) -> u32 {
        match self.month {
            2 => {
                if is_leap_year(self.year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
        self.clamp_day();
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        self.clamp_day();
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        *self = Self::from_date(date);
    }

    pub fn jump_to_today(&mut self) {
        *self = Self::today();
    }

    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    fn clamp_day(&mut self) {
        self.day = self.day.min(self.days_in_month());
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(year: i32, month: u32, day: u32) -> MonthCursor {
        MonthCursor { year, month, day }
    }

    #[test]
    fn prev_from_january_wraps_the_year() {
        let mut c = cursor(2025, 1, 15);
        c.prev_month();
        assert_eq!(c, cursor(2024, 12, 15));
    }

    #[test]
    fn next_from_december_wraps_the_year() {
        let mut c = cursor(2024, 12, 15);
        c.next_month();
        assert_eq!(c, cursor(2025, 1, 15));
    }

    #[test]
    fn day_clamps_to_shorter_months() {
        let mut c = cursor(2025, 1, 31);
        c.next_month();
        assert_eq!(c, cursor(2025, 2, 28));

        let mut c = cursor(2024, 1, 31);
        c.next_month();
        assert_eq!(c, cursor(2024, 2, 29)); // leap year
    }

    #[test]
    fn day_counts_cover_every_month_shape() {
        assert_eq!(cursor(2025, 1, 1).days_in_month(), 31);
        assert_eq!(cursor(2025, 4, 1).days_in_month(), 30);
        assert_eq!(cursor(2025, 2, 1).days_in_month(), 28);
        assert_eq!(cursor(2024, 2, 1).days_in_month(), 29);
        assert_eq!(cursor(2000, 2, 1).days_in_month(), 29);
        assert_eq!(cursor(1900, 2, 1).days_in_month(), 28);
    }

    #[test]
    fn wire_month_is_zero_based() {
        assert_eq!(cursor(2024, 3, 1).api_month(), 2);
        assert_eq!(cursor(2024, 1, 1).api_month(), 0);
        assert_eq!(cursor(2024, 12, 1).api_month(), 11);
    }

    #[test]
    fn jump_to_resets_all_fields() {
        let mut c = cursor(2024, 3, 1);
        c.jump_to(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        assert_eq!(c, cursor(2026, 8, 6));
    }
}
