use axum::http::StatusCode;
use chrono::NaiveDate;
use kinder_api::middleware::error_handling::map_error;
use kinder_core::{conflict::ConflictKind, errors::ScheduleError};
use rstest::rstest;
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[rstest]
#[case::inverted_range(ScheduleError::InvalidRange { start: day(9), end: day(1) }, StatusCode::BAD_REQUEST)]
#[case::past_start(ScheduleError::PastStartDate { start: day(1), today: day(2) }, StatusCode::BAD_REQUEST)]
#[case::beyond_class_end(ScheduleError::BeyondClassEndDate { end: day(9), class_end: day(8) }, StatusCode::BAD_REQUEST)]
#[case::no_weekdays(ScheduleError::NoMatchingWeekdays, StatusCode::BAD_REQUEST)]
#[case::missing_field(ScheduleError::MissingField("slot_id"), StatusCode::BAD_REQUEST)]
#[case::validation(ScheduleError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case::empty_pattern(ScheduleError::EmptyPattern, StatusCode::UNPROCESSABLE_ENTITY)]
#[case::no_directives(ScheduleError::NoDirectives, StatusCode::UNPROCESSABLE_ENTITY)]
#[case::conflict(ScheduleError::Conflict(ConflictKind::TeacherDoubleBooked), StatusCode::CONFLICT)]
#[case::not_found(ScheduleError::NotFound("gone".into()), StatusCode::NOT_FOUND)]
#[case::unknown_class(ScheduleError::UnknownClass(Uuid::nil()), StatusCode::NOT_FOUND)]
#[case::transport(ScheduleError::Transport(eyre::eyre!("reset")), StatusCode::BAD_GATEWAY)]
#[case::database(ScheduleError::Database(eyre::eyre!("boom")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: ScheduleError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[test]
fn test_internal_error_is_server_error() {
    let error = ScheduleError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(map_error(error).status(), StatusCode::INTERNAL_SERVER_ERROR);
}
