use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create activities table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            requires_outdoor BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create teachers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            specialization VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create classes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            end_date DATE NULL,
            homeroom_teacher_id UUID NULL REFERENCES teachers(id) ON DELETE SET NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create calendar_entries table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS calendar_entries (
            class_id UUID NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            slot_id UUID NOT NULL REFERENCES time_slots(id) ON DELETE CASCADE,
            activity_id UUID NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
            teacher_id UUID NULL REFERENCES teachers(id) ON DELETE SET NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (class_id, date, slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Several statements at once; only the simple query protocol accepts that.
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_time_slots_start_time ON time_slots(start_time);
        CREATE INDEX IF NOT EXISTS idx_calendar_entries_class_date ON calendar_entries(class_id, date);
        CREATE INDEX IF NOT EXISTS idx_calendar_entries_teacher_date ON calendar_entries(teacher_id, date);
        CREATE INDEX IF NOT EXISTS idx_classes_homeroom_teacher_id ON classes(homeroom_teacher_id);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
