//! Permalink Value Object
//!
//! `/{yyyy}/{mon}/{dd}/{slug}/` with a lower-case English month
//! abbreviation. The date is the calendar day (UTC) the entry was published.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

use crate::domain::value_object::slug::Slug;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalink {
    pub date: NaiveDate,
    pub slug: Slug,
}

impl Permalink {
    pub fn new(date: NaiveDate, slug: Slug) -> Self {
        Self { date, slug }
    }

    /// Resolve path segments; `None` for anything that is not a real date
    /// or a valid slug
    pub fn parse(year: &str, month: &str, day: &str, slug: &str) -> Option<Self> {
        let year: i32 = year.parse().ok()?;
        let month = month.to_lowercase();
        let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
        let day: u32 = day.parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let slug = Slug::new(slug).ok()?;
        Some(Self { date, slug })
    }

    pub fn path(&self) -> String {
        format!(
            "/{:04}/{}/{:02}/{}/",
            self.date.year(),
            MONTHS[self.date.month0() as usize],
            self.date.day(),
            self.slug
        )
    }

    /// Half-open `[start, end)` covering the whole day
    pub fn day_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = self
            .date
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (start, end)
    }
}
