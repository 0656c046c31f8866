//! Rules for the two monthly repeat styles: "nth weekday" and "last weekday".

use serde_json::Value;

use super::errors::{Rule, ValidationErrors};
use crate::model::{NthDay, Weekday};
use crate::request::{JsonRequest, params};

/// ## Summary
/// Validates `repeatsOnNthDayOfMonth` / `repeatsOnLastWeekdayOfMonth`.
///
/// Either field may be null. Supplying both is an error on the last-weekday
/// field, recorded alongside any range errors. A usable nth value also needs
/// `repeatsOnDay` to say which weekday.
pub(crate) fn validate_nth_day_of_month(errors: &mut ValidationErrors, request: &JsonRequest) {
    let nth = request.extract_int(params::REPEATS_ON_NTH_DAY_OF_MONTH);
    let last = request.extract_int(params::REPEATS_ON_LAST_WEEKDAY_OF_MONTH);

    let nth_ok = !errors
        .parameter(params::REPEATS_ON_NTH_DAY_OF_MONTH, &nth)
        .ignore_if_null()
        .in_range_of::<NthDay>()
        .is_done()
        && nth.value().is_some();

    errors
        .parameter(params::REPEATS_ON_LAST_WEEKDAY_OF_MONTH, &last)
        .ignore_if_null()
        .in_range_of::<Weekday>();

    if !nth.is_missing() && !last.is_missing() {
        errors.add(
            params::REPEATS_ON_LAST_WEEKDAY_OF_MONTH,
            last.raw().cloned().unwrap_or(Value::Null),
            Rule::MutuallyExclusive {
                other: params::REPEATS_ON_NTH_DAY_OF_MONTH,
            },
        );
    }

    if nth_ok {
        let day = request.extract_int(params::REPEATS_ON_DAY);
        errors
            .parameter(params::REPEATS_ON_DAY, &day)
            .not_null()
            .in_range_of::<Weekday>();
    }
}
