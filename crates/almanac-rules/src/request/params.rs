//! Calendar request parameter names.

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const LOCATION: &str = "location";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const DURATION: &str = "duration";
pub const TYPE_ID: &str = "typeId";
pub const REPEATING: &str = "repeating";
pub const FREQUENCY: &str = "frequency";
pub const INTERVAL: &str = "interval";
pub const REPEATS_ON_DAY: &str = "repeatsOnDay";
pub const REPEATS_ON_NTH_DAY_OF_MONTH: &str = "repeatsOnNthDayOfMonth";
pub const REPEATS_ON_LAST_WEEKDAY_OF_MONTH: &str = "repeatsOnLastWeekdayOfMonth";
pub const REMIND_BY_ID: &str = "remindById";
pub const FIRST_REMINDER_OFFSET: &str = "firstReminderOffset";
pub const SECOND_REMINDER_OFFSET: &str = "secondReminderOffset";
pub const MEETING_TIME: &str = "meetingTime";
pub const RESCHEDULE_BASED_ON_MEETING_DATES: &str = "rescheduleBasedOnMeetingDates";
pub const PRESENT_MEETING_DATE: &str = "presentMeetingDate";
pub const NEW_MEETING_DATE: &str = "newMeetingDate";
pub const LOCALE: &str = "locale";
pub const DATE_FORMAT: &str = "dateFormat";
pub const TIME_FORMAT: &str = "timeFormat";

/// Every key a calendar create or update request may carry.
pub const SUPPORTED_PARAMETERS: &[&str] = &[
    TITLE,
    DESCRIPTION,
    LOCATION,
    START_DATE,
    END_DATE,
    DURATION,
    TYPE_ID,
    REPEATING,
    FREQUENCY,
    INTERVAL,
    REPEATS_ON_DAY,
    REPEATS_ON_NTH_DAY_OF_MONTH,
    REPEATS_ON_LAST_WEEKDAY_OF_MONTH,
    REMIND_BY_ID,
    FIRST_REMINDER_OFFSET,
    SECOND_REMINDER_OFFSET,
    MEETING_TIME,
    RESCHEDULE_BASED_ON_MEETING_DATES,
    PRESENT_MEETING_DATE,
    NEW_MEETING_DATE,
    LOCALE,
    DATE_FORMAT,
    TIME_FORMAT,
];
