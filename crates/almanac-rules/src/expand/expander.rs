//! Expansion of a [`RecurrenceSpec`] through the `rrule` crate.
//!
//! The seed becomes `DTSTART` at midnight UTC. Occurrences are fetched from
//! the resulting `RRuleSet` a page at a time, each page bounded by `after`
//! (just past the last date yielded) and `before` (the end of the window).

use std::collections::VecDeque;

use almanac_core::constants::DEFAULT_MAX_OCCURRENCES;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta};
use rrule::{RRuleSet, Tz};

use crate::error::RulesResult;
use crate::model::RecurrenceSpec;

/// Dates fetched from the rule set per page.
const PAGE_SIZE: u16 = 256;

/// ## Summary
/// An inclusive date range `[from, to]`.
///
/// A window whose `to` precedes its `from` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    from: NaiveDate,
    to: NaiveDate,
}

impl Window {
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Window containing a single day.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Window from `from` to the last representable date.
    #[must_use]
    pub const fn starting(from: NaiveDate) -> Self {
        Self::new(from, NaiveDate::MAX)
    }

    #[must_use]
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// The same window ending no later than `end`.
    #[must_use]
    pub fn clipped_to(self, end: NaiveDate) -> Self {
        Self::new(self.from, self.to.min(end))
    }
}

/// ## Summary
/// A restartable expansion: every call to [`iter`](Self::iter) yields the
/// same occurrences from the beginning.
#[derive(Debug, Clone)]
pub struct Expansion {
    set: RRuleSet,
    window: Window,
    max_occurrences: usize,
}

impl Expansion {
    /// ## Summary
    /// Prepares the expansion of `spec` seeded on `seed` inside `window`.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if the rule set cannot be built.
    pub fn new(spec: &RecurrenceSpec, seed: NaiveDate, window: Window) -> RulesResult<Self> {
        tracing::trace!(
            rule = %spec,
            %seed,
            from = %window.from(),
            to = %window.to(),
            "Preparing expansion"
        );
        Ok(Self {
            set: spec.rrule_set(seed)?,
            window,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        })
    }

    /// Caps the number of occurrences each iteration yields.
    #[must_use]
    pub const fn with_max_occurrences(mut self, max: usize) -> Self {
        self.max_occurrences = max;
        self
    }

    #[must_use]
    pub fn iter(&self) -> Occurrences {
        Occurrences::new(self.set.clone(), self.window, self.max_occurrences)
    }
}

impl IntoIterator for &Expansion {
    type Item = NaiveDate;
    type IntoIter = Occurrences;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// ## Summary
/// Lazy, ascending occurrence dates of one expansion.
///
/// Every yielded date is on or after the seed and inside the window. Cloning
/// the iterator forks it at its current position.
#[derive(Debug, Clone)]
pub struct Occurrences {
    set: RRuleSet,
    window: Window,
    after: Option<DateTime<Tz>>,
    pending: VecDeque<NaiveDate>,
    remaining: usize,
    finished: bool,
}

impl Occurrences {
    fn new(set: RRuleSet, window: Window, max: usize) -> Self {
        let set = match end_of_day(window.to()) {
            Some(before) => set.before(before),
            None => set,
        };
        Self {
            set,
            window,
            // One second before midnight, so the first day of the window is
            // kept whether the bound is inclusive or not.
            after: start_of_day(window.from()).checked_sub_signed(TimeDelta::seconds(1)),
            pending: VecDeque::new(),
            remaining: max,
            finished: window.is_empty() || max == 0,
        }
    }

    /// Fetches the next page of dates from the rule set.
    fn fill_page(&mut self) {
        let limit = u16::try_from(self.remaining).map_or(PAGE_SIZE, |n| n.min(PAGE_SIZE));
        let page = match self.after {
            Some(after) => self.set.clone().after(after),
            None => self.set.clone(),
        };
        let result = page.all(limit);

        if result.dates.len() < usize::from(limit) {
            self.finished = true;
        }
        match result.dates.last() {
            Some(last) => self.after = last.checked_add_signed(TimeDelta::seconds(1)),
            None => self.finished = true,
        }
        if self.after.is_none() {
            self.finished = true;
        }

        let window = self.window;
        self.pending.extend(
            result
                .dates
                .iter()
                .map(DateTime::date_naive)
                .filter(|d| window.contains(*d)),
        );
        tracing::trace!(
            fetched = result.dates.len(),
            limited = result.limited,
            "Fetched occurrence page"
        );
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Some(date) = self.pending.pop_front() {
                self.remaining -= 1;
                return Some(date);
            }
            if self.finished {
                return None;
            }
            self.fill_page();
        }
        None
    }
}

impl std::iter::FusedIterator for Occurrences {}

fn start_of_day(date: NaiveDate) -> DateTime<Tz> {
    date.and_time(NaiveTime::MIN).and_utc().with_timezone(&Tz::UTC)
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Tz>> {
    let dt = date.and_hms_opt(23, 59, 59)?;
    Some(dt.and_utc().with_timezone(&Tz::UTC))
}

impl RecurrenceSpec {
    /// ## Summary
    /// Occurrences of this rule seeded on `seed` inside `window`, capped at
    /// the default occurrence limit.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if the rule set cannot be built.
    pub fn occurrences(&self, seed: NaiveDate, window: Window) -> RulesResult<Occurrences> {
        Ok(Expansion::new(self, seed, window)?.iter())
    }
}

/// ## Summary
/// Expands `spec` seeded on `seed` into the dates inside `window`.
///
/// ## Errors
/// Returns `InvalidRecurrence` if the rule set cannot be built.
pub fn expand(spec: &RecurrenceSpec, seed: NaiveDate, window: Window) -> RulesResult<Occurrences> {
    spec.occurrences(seed, window)
}

/// First occurrence strictly after `date`, if the rule produces one before
/// the calendar runs out.
///
/// ## Errors
/// Returns `InvalidRecurrence` if the rule set cannot be built.
pub fn next_occurrence_after(
    spec: &RecurrenceSpec,
    seed: NaiveDate,
    date: NaiveDate,
) -> RulesResult<Option<NaiveDate>> {
    let Some(from) = date.succ_opt() else {
        return Ok(None);
    };
    Ok(expand(spec, seed, Window::starting(from))?.next())
}

/// True if `date` is one of the rule's occurrences.
///
/// ## Errors
/// Returns `InvalidRecurrence` if the rule set cannot be built.
pub fn is_occurrence(spec: &RecurrenceSpec, seed: NaiveDate, date: NaiveDate) -> RulesResult<bool> {
    Ok(expand(spec, seed, Window::day(date))?.next() == Some(date))
}
