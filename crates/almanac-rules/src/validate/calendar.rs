//! Business rules for calendar create and update requests.

use almanac_core::config::{CalendarRulesConfig, ExpansionConfig, ReminderOffsetCheck, Settings};
use almanac_core::constants::CALENDAR_RESOURCE;

use super::errors::{Rule, ValidationErrors};
use super::monthly::validate_nth_day_of_month;
use crate::error::RulesResult;
use crate::model::{
    CalendarEvent, Changes, CodedValue, EntityType, Frequency, RecurrenceSpec, RemindBy, Weekday,
};
use crate::parse;
use crate::request::{JsonRequest, params};

/// Whether a request creates a calendar or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mandatory fields must be present.
    Create,
    /// Only fields present in the request are checked.
    Update,
}

impl Mode {
    const fn is_create(self) -> bool {
        matches!(self, Self::Create)
    }
}

/// ## Summary
/// Validates and parses calendar requests.
///
/// Validation collects every rule violation in the request before failing,
/// so a caller sees all problems at once.
#[derive(Debug, Clone, Default)]
pub struct CalendarValidator {
    rules: CalendarRulesConfig,
    expansion: ExpansionConfig,
}

impl CalendarValidator {
    #[must_use]
    pub const fn new(rules: CalendarRulesConfig, expansion: ExpansionConfig) -> Self {
        Self { rules, expansion }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.calendar.clone(), settings.expansion.clone())
    }

    #[must_use]
    pub const fn rules(&self) -> &CalendarRulesConfig {
        &self.rules
    }

    #[must_use]
    pub const fn max_occurrences(&self) -> usize {
        self.expansion.max_occurrences
    }

    /// ## Summary
    /// Parses a body and rejects unknown keys.
    ///
    /// ## Errors
    /// Returns `MalformedRequest` or `UnsupportedParameter`.
    pub fn request(&self, body: &str) -> RulesResult<JsonRequest> {
        let request = JsonRequest::from_body(body, &self.rules)?;
        request.check_for_unsupported_parameters(params::SUPPORTED_PARAMETERS)?;
        Ok(request)
    }

    /// ## Summary
    /// Validates a calendar creation request.
    ///
    /// ## Errors
    /// Returns `MalformedRequest`, `UnsupportedParameter`, or
    /// `ValidationFailed` with every violated rule.
    #[tracing::instrument(skip_all, fields(mode = "create"))]
    pub fn validate_for_create(&self, body: &str) -> RulesResult<()> {
        let request = self.request(body)?;
        self.validate(&request, Mode::Create)
    }

    /// ## Summary
    /// Validates a calendar update request. Only supplied fields are checked.
    ///
    /// ## Errors
    /// Returns `MalformedRequest`, `UnsupportedParameter`, or
    /// `ValidationFailed` with every violated rule.
    #[tracing::instrument(skip_all, fields(mode = "update"))]
    pub fn validate_for_update(&self, body: &str) -> RulesResult<()> {
        let request = self.request(body)?;
        self.validate(&request, Mode::Update)
    }

    /// ## Summary
    /// Runs every rule for `mode` against an already-parsed request.
    ///
    /// ## Errors
    /// Returns `ValidationFailed` carrying every violation.
    pub fn validate(&self, request: &JsonRequest, mode: Mode) -> RulesResult<()> {
        let errors = self.check(request, mode);
        if errors.is_empty() {
            tracing::debug!("Calendar request is valid");
        } else {
            tracing::debug!(count = errors.len(), "Calendar request failed validation");
        }
        errors.into_result()
    }

    /// ## Summary
    /// Builds an event from a creation request without running the business
    /// rules.
    ///
    /// ## Errors
    /// Returns `MalformedRequest` or `UnsupportedParameter` for an unusable
    /// body, `ValidationFailed` if a mandatory field cannot be read, and
    /// `InvalidRecurrence` if the repeat fields do not form a recurrence.
    pub fn parse(&self, body: &str) -> RulesResult<CalendarEvent> {
        let request = self.request(body)?;
        parse::event_from_request(&request)
    }

    /// ## Summary
    /// Validates a creation request and builds the event.
    ///
    /// ## Errors
    /// As [`validate_for_create`](Self::validate_for_create), then as
    /// [`parse`](Self::parse).
    #[tracing::instrument(skip_all)]
    pub fn command_for_create(&self, body: &str) -> RulesResult<CalendarEvent> {
        let request = self.request(body)?;
        self.validate(&request, Mode::Create)?;
        let event = parse::event_from_request(&request)?;
        tracing::debug!(title = %event.title, repeating = event.repeating, "Calendar parsed");
        Ok(event)
    }

    /// ## Summary
    /// Validates an update request and applies it to `event`.
    ///
    /// `event` is unchanged unless the whole update succeeds.
    ///
    /// ## Errors
    /// As [`validate_for_update`](Self::validate_for_update), then as
    /// [`CalendarEvent::apply_update`].
    #[tracing::instrument(skip_all)]
    pub fn apply_update(&self, event: &mut CalendarEvent, body: &str) -> RulesResult<Changes> {
        let request = self.request(body)?;
        self.validate(&request, Mode::Update)?;
        let update = parse::update_from_request(&request)?;
        event.apply_update(update)
    }

    fn check(&self, request: &JsonRequest, mode: Mode) -> ValidationErrors {
        let mut errors = ValidationErrors::new(CALENDAR_RESOURCE);
        let checked = |name: &str| mode.is_create() || request.parameter_exists(name);

        if !mode.is_create() {
            check_reschedule(&mut errors, request);
        }

        if checked(params::TITLE) {
            let title = request.extract_string(params::TITLE);
            errors
                .parameter(params::TITLE, &title)
                .not_blank()
                .not_exceeding_length_of(self.rules.title_max_length);
        }

        if request.parameter_exists(params::DESCRIPTION) {
            let description = request.extract_string(params::DESCRIPTION);
            errors
                .parameter(params::DESCRIPTION, &description)
                .ignore_if_null()
                .not_exceeding_length_of(self.rules.description_max_length);
        }

        if request.parameter_exists(params::LOCATION) {
            let location = request.extract_string(params::LOCATION);
            errors
                .parameter(params::LOCATION, &location)
                .ignore_if_null()
                .not_exceeding_length_of(self.rules.location_max_length);
        }

        let start_date = request.extract_date(params::START_DATE);
        if checked(params::START_DATE) {
            errors.parameter(params::START_DATE, &start_date).not_null().well_formed();
        }

        if request.parameter_exists(params::END_DATE) {
            let end_date = request.extract_date(params::END_DATE);
            let done = errors
                .parameter(params::END_DATE, &end_date)
                .not_null()
                .well_formed()
                .is_done();
            if let (false, Some(start), Some(end)) = (done, start_date.value(), end_date.value()) {
                if end < start {
                    errors.add(
                        params::END_DATE,
                        end_date.raw().cloned().unwrap_or_default(),
                        Rule::BeforeStartDate,
                    );
                }
            }
        }

        if request.parameter_exists(params::DURATION) {
            let duration = request.extract_int(params::DURATION);
            errors
                .parameter(params::DURATION, &duration)
                .ignore_if_null()
                .well_formed();
        }

        if checked(params::TYPE_ID) {
            let type_id = request.extract_int(params::TYPE_ID);
            errors
                .parameter(params::TYPE_ID, &type_id)
                .not_null()
                .in_range_of::<EntityType>();
        }

        if request.parameter_exists(params::REPEATING) {
            let repeating = request.extract_bool(params::REPEATING);
            errors
                .parameter(params::REPEATING, &repeating)
                .not_null()
                .well_formed();
            if repeating.value() == Some(&true) {
                check_recurrence(&mut errors, request, mode);
            }
        }

        if request.parameter_exists(params::REMIND_BY_ID) {
            let remind_by = request.extract_int(params::REMIND_BY_ID);
            errors
                .parameter(params::REMIND_BY_ID, &remind_by)
                .ignore_if_null()
                .in_range_of::<RemindBy>();
        }

        let require_positive = mode.is_create()
            || self.rules.reminder_offsets_on_update == ReminderOffsetCheck::Positive;
        for name in [params::FIRST_REMINDER_OFFSET, params::SECOND_REMINDER_OFFSET] {
            if request.parameter_exists(name) {
                let offset = request.extract_int(name);
                let mut check = errors.parameter(name, &offset);
                check.ignore_if_null().well_formed();
                if require_positive {
                    check.integer_greater_than_zero();
                }
            }
        }

        if request.parameter_exists(params::MEETING_TIME) {
            let meeting_time = request.extract_time(params::MEETING_TIME);
            errors
                .parameter(params::MEETING_TIME, &meeting_time)
                .ignore_if_null()
                .well_formed();
        }

        errors
    }
}

fn check_recurrence(errors: &mut ValidationErrors, request: &JsonRequest, mode: Mode) {
    let frequency = request.extract_int(params::FREQUENCY);
    errors
        .parameter(params::FREQUENCY, &frequency)
        .not_null()
        .in_range_of::<Frequency>();

    if request.parameter_exists(params::INTERVAL) {
        let interval = request.extract_int(params::INTERVAL);
        errors
            .parameter(params::INTERVAL, &interval)
            .not_null()
            .integer_greater_than_zero()
            .in_min_max_range(1, i64::from(RecurrenceSpec::MAX_INTERVAL));
    }

    match frequency.value().and_then(|n| Frequency::from_int(*n)) {
        Some(Frequency::Weekly) => {
            if mode.is_create() || request.parameter_exists(params::REPEATS_ON_DAY) {
                let days = request.extract_int_list(params::REPEATS_ON_DAY);
                errors
                    .parameter(params::REPEATS_ON_DAY, &days)
                    .not_empty()
                    .each_in_range_of::<Weekday>();
            }
        }
        Some(Frequency::Monthly) => validate_nth_day_of_month(errors, request),
        _ => {}
    }
}

fn check_reschedule(errors: &mut ValidationErrors, request: &JsonRequest) {
    let reschedule = if request.parameter_exists(params::RESCHEDULE_BASED_ON_MEETING_DATES) {
        let flag = request.extract_bool(params::RESCHEDULE_BASED_ON_MEETING_DATES);
        errors
            .parameter(params::RESCHEDULE_BASED_ON_MEETING_DATES, &flag)
            .not_null()
            .well_formed();
        flag.value() == Some(&true)
    } else {
        false
    };

    for name in [params::PRESENT_MEETING_DATE, params::NEW_MEETING_DATE] {
        if reschedule || request.parameter_exists(name) {
            let date = request.extract_date(name);
            errors.parameter(name, &date).not_null().well_formed();
        }
    }
}
