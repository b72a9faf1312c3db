use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use kinder_core::{
    errors::ScheduleResult,
    models::{
        activity::{Activity, CreateActivityRequest},
        calendar::{BulkDirective, BulkWriteReport, CalendarEntry, EntryAssignment},
        class::{ClassSummary, Teacher},
        time_slot::{CreateTimeSlotRequest, TimeSlot},
    },
    store::{CalendarStore, CatalogAdmin, ScheduleDirectory, StoreError},
};

// Mock backend for testing
mock! {
    pub Backend {}

    #[async_trait]
    impl ScheduleDirectory for Backend {
        async fn time_slots(&self) -> eyre::Result<Vec<TimeSlot>>;

        async fn activities(&self) -> eyre::Result<Vec<Activity>>;

        async fn teachers(&self) -> eyre::Result<Vec<Teacher>>;

        async fn find_class(&self, class_id: Uuid) -> eyre::Result<Option<ClassSummary>>;

        async fn class_end_date(&self, class_id: Uuid) -> eyre::Result<Option<NaiveDate>>;

        async fn template_week_entries(
            &self,
            class_id: Uuid,
            week_start: NaiveDate,
        ) -> eyre::Result<Vec<CalendarEntry>>;
    }

    #[async_trait]
    impl CalendarStore for Backend {
        async fn bulk_upsert(&self, directives: &[BulkDirective]) -> eyre::Result<BulkWriteReport>;

        async fn upsert_entry(
            &self,
            assignment: &EntryAssignment,
        ) -> Result<CalendarEntry, StoreError>;
    }

    #[async_trait]
    impl CatalogAdmin for Backend {
        async fn create_time_slot(&self, request: &CreateTimeSlotRequest) -> ScheduleResult<TimeSlot>;

        async fn update_time_slot(&self, slot: &TimeSlot) -> ScheduleResult<TimeSlot>;

        async fn delete_time_slot(&self, id: Uuid) -> eyre::Result<bool>;

        async fn create_activity(&self, request: &CreateActivityRequest) -> eyre::Result<Activity>;

        async fn update_activity(&self, activity: &Activity) -> eyre::Result<Activity>;

        async fn delete_activity(&self, id: Uuid) -> eyre::Result<bool>;
    }
}
