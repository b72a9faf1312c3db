use kinder_core::{
    conflict::ConflictKind,
    errors::ScheduleError,
    models::calendar::BulkDirective,
    reconcile::BulkReconciler,
};
use kinder_db::{backend::effective_teacher, mock::MockBackend};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

#[rstest]
#[case::requested_wins(Some(1), Some(2), Ok(1))]
#[case::homeroom_fallback(None, Some(2), Ok(2))]
#[case::nobody(None, None, Err(ConflictKind::MissingHomeroomTeacher))]
fn test_effective_teacher(
    #[case] requested: Option<u128>,
    #[case] homeroom: Option<u128>,
    #[case] expected: Result<u128, ConflictKind>,
) {
    let result = effective_teacher(
        requested.map(Uuid::from_u128),
        homeroom.map(Uuid::from_u128),
    );

    assert_eq!(result, expected.map(Uuid::from_u128));
}

#[tokio::test]
async fn test_unreachable_slot_catalog_is_a_transport_error() {
    let mut backend = MockBackend::new();
    backend
        .expect_time_slots()
        .times(1)
        .returning(|| Err(eyre::eyre!("connection refused")));
    backend.expect_bulk_upsert().never();
    let directive = BulkDirective {
        class_id: Uuid::new_v4(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        slot_id: Uuid::new_v4(),
        activity_id: None,
        teacher_id: None,
        delete: true,
    };

    let result = BulkReconciler::new(&backend, &backend)
        .submit(&[directive])
        .await;

    assert!(matches!(result, Err(ScheduleError::Transport(_))));
}
