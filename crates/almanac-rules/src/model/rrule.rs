//! Conversions between a [`RecurrenceSpec`] and RFC 5545 RRULEs.
//!
//! Text is read through `rrule::RRule<Unvalidated>`. Only `FREQ`, `INTERVAL`
//! and `BYDAY` carry meaning here; `WKST` is accepted and ignored because
//! weeks always start on Monday. Any other rule part is rejected rather than
//! silently dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rrule::{NWeekday, RRule, RRuleSet, Tz, Unvalidated};

use super::{Frequency, MonthlyRule, NthDay, RecurrenceSpec, RepeatRule, Weekday};
use crate::error::{RulesError, RulesResult};

impl fmt::Display for RecurrenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("FREQ={}", self.frequency())];

        if self.interval() != 1 {
            parts.push(format!("INTERVAL={}", self.interval()));
        }

        match self.rule() {
            RepeatRule::Weekly(days) => {
                let s: Vec<_> = days.iter().map(ToString::to_string).collect();
                parts.push(format!("BYDAY={}", s.join(",")));
            }
            RepeatRule::Monthly(MonthlyRule::NthWeekday { nth, weekday }) => {
                parts.push(format!("BYDAY={}{weekday}", nth.ordinal()));
            }
            RepeatRule::Monthly(MonthlyRule::LastWeekday(weekday)) => {
                parts.push(format!("BYDAY=-1{weekday}"));
            }
            RepeatRule::Daily | RepeatRule::Yearly | RepeatRule::Monthly(MonthlyRule::DayOfMonth) => {}
        }

        write!(f, "{}", parts.join(";"))
    }
}

impl FromStr for RecurrenceSpec {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rrule(s)
    }
}

impl RecurrenceSpec {
    /// ## Summary
    /// The equivalent `rrule` crate rule, with Monday-start weeks.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if the interval does not fit the crate's
    /// 16-bit interval.
    pub fn to_rrule(&self) -> RulesResult<RRule<Unvalidated>> {
        let interval = u16::try_from(self.interval()).map_err(|err| {
            RulesError::InvalidRecurrence(format!("interval {}: {err}", self.interval()))
        })?;

        let rule = RRule::new(self.frequency().into())
            .interval(interval)
            .week_start(chrono::Weekday::Mon);

        Ok(match self.rule() {
            RepeatRule::Weekly(days) => rule.by_weekday(
                days.iter()
                    .map(|d| NWeekday::Every((*d).into()))
                    .collect(),
            ),
            RepeatRule::Monthly(MonthlyRule::NthWeekday { nth, weekday }) => {
                rule.by_weekday(vec![NWeekday::Nth(nth_ordinal(*nth), (*weekday).into())])
            }
            RepeatRule::Monthly(MonthlyRule::LastWeekday(weekday)) => {
                rule.by_weekday(vec![NWeekday::Nth(-1, (*weekday).into())])
            }
            RepeatRule::Daily | RepeatRule::Yearly | RepeatRule::Monthly(MonthlyRule::DayOfMonth) => {
                rule
            }
        })
    }

    /// ## Summary
    /// Builds the rule set seeded on `seed` at midnight UTC.
    ///
    /// Day-of-month and yearly rules take their day (and month) from the seed.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrence` if the `rrule` crate rejects the rule for
    /// this seed.
    pub fn rrule_set(&self, seed: NaiveDate) -> RulesResult<RRuleSet> {
        let dt_start = seed.and_time(NaiveTime::MIN).and_utc().with_timezone(&Tz::UTC);
        self.to_rrule()?
            .build(dt_start)
            .map_err(|err| RulesError::InvalidRecurrence(err.to_string()))
    }
}

const fn nth_ordinal(nth: NthDay) -> i16 {
    match nth {
        NthDay::First => 1,
        NthDay::Second => 2,
        NthDay::Third => 3,
        NthDay::Fourth => 4,
        NthDay::Fifth => 5,
    }
}

/// Parses RRULE text, with or without a leading `RRULE:`.
fn parse_rrule(s: &str) -> RulesResult<RecurrenceSpec> {
    let body = s.trim().to_ascii_uppercase();
    let body = body.strip_prefix("RRULE:").unwrap_or(&body);
    if body.is_empty() {
        return Err(RulesError::InvalidRRule("empty rule".to_string()));
    }

    let rule = body
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| RulesError::InvalidRRule(err.to_string()))?;
    reject_unsupported_parts(&rule)?;

    let freq = Frequency::try_from(rule.get_freq()).map_err(|freq| {
        RulesError::InvalidRRule(format!("unsupported frequency: {freq:?}"))
    })?;
    let by_day = rule.get_by_weekday();

    let repeat = match freq {
        Frequency::Daily | Frequency::Yearly if !by_day.is_empty() => {
            return Err(RulesError::InvalidRRule(format!(
                "BYDAY is not supported with FREQ={freq}"
            )));
        }
        Frequency::Daily => RepeatRule::Daily,
        Frequency::Yearly => RepeatRule::Yearly,
        Frequency::Weekly => weekly_rule(by_day)?,
        Frequency::Monthly => RepeatRule::Monthly(monthly_rule(by_day)?),
    };

    RecurrenceSpec::new(u32::from(rule.get_interval()), repeat)
        .map_err(|e| RulesError::InvalidRRule(e.to_string()))
}

fn reject_unsupported_parts(rule: &RRule<Unvalidated>) -> RulesResult<()> {
    let unsupported = [
        ("COUNT", rule.get_count().is_some()),
        ("UNTIL", rule.get_until().is_some()),
        ("BYSETPOS", !rule.get_by_set_pos().is_empty()),
        ("BYMONTH", !rule.get_by_month().is_empty()),
        ("BYMONTHDAY", !rule.get_by_month_day().is_empty()),
        ("BYYEARDAY", !rule.get_by_year_day().is_empty()),
        ("BYWEEKNO", !rule.get_by_week_no().is_empty()),
        ("BYHOUR", !rule.get_by_hour().is_empty()),
        ("BYMINUTE", !rule.get_by_minute().is_empty()),
        ("BYSECOND", !rule.get_by_second().is_empty()),
    ];
    match unsupported.iter().find(|(_, present)| *present) {
        Some((part, _)) => Err(RulesError::InvalidRRule(format!(
            "unsupported rule part: {part}"
        ))),
        None => Ok(()),
    }
}

fn weekly_rule(by_day: &[NWeekday]) -> RulesResult<RepeatRule> {
    if by_day.is_empty() {
        return Err(RulesError::InvalidRRule(
            "weekly rule needs BYDAY".to_string(),
        ));
    }
    by_day
        .iter()
        .map(|day| match day {
            NWeekday::Every(weekday) => Ok(Weekday::from(*weekday)),
            NWeekday::Nth(..) => Err(RulesError::InvalidRRule(
                "weekly BYDAY entries cannot carry ordinals".to_string(),
            )),
        })
        .collect::<RulesResult<_>>()
        .map(RepeatRule::Weekly)
}

fn monthly_rule(by_day: &[NWeekday]) -> RulesResult<MonthlyRule> {
    match by_day {
        [] => Ok(MonthlyRule::DayOfMonth),
        [NWeekday::Nth(-1, weekday)] => Ok(MonthlyRule::LastWeekday((*weekday).into())),
        [NWeekday::Nth(n, weekday)] => {
            let nth = u32::try_from(*n)
                .ok()
                .and_then(NthDay::from_ordinal)
                .ok_or_else(|| {
                    RulesError::InvalidRRule(format!("unsupported monthly ordinal: {n}"))
                })?;
            Ok(MonthlyRule::NthWeekday {
                nth,
                weekday: (*weekday).into(),
            })
        }
        _ => Err(RulesError::InvalidRRule(
            "monthly BYDAY must be a single weekday with an ordinal".to_string(),
        )),
    }
}
