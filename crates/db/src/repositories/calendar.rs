use crate::models::DbCalendarEntry;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

/// Entries of one class with `start <= date <= end`, ordered by date.
pub async fn get_entries_in_range(
    pool: &Pool<Postgres>,
    class_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DbCalendarEntry>> {
    let entries = sqlx::query_as::<_, DbCalendarEntry>(
        r#"
        SELECT e.class_id, e.date, e.slot_id, e.activity_id, e.teacher_id, e.updated_at
        FROM calendar_entries e
        JOIN time_slots s ON s.id = e.slot_id
        WHERE e.class_id = $1 AND e.date BETWEEN $2 AND $3 AND e.activity_id IS NOT NULL
        ORDER BY e.date ASC, s.start_time ASC
        "#,
    )
    .bind(class_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Holds `teacher_id`'s bookings on `date` until the surrounding transaction
/// ends, so an overlap check and the write after it see the same bookings.
pub async fn lock_teacher_day<'e, E>(executor: E, teacher_id: Uuid, date: NaiveDate) -> Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("teacher:{}:{}", teacher_id, date))
        .execute(executor)
        .await?;

    Ok(())
}

/// Whether `teacher_id` already teaches another class during
/// `[start_time, end_time)` on `date`.
pub async fn teacher_has_overlap<'e, E>(
    executor: E,
    teacher_id: Uuid,
    date: NaiveDate,
    class_id: Uuid,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let overlaps = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM calendar_entries e
            JOIN time_slots s ON s.id = e.slot_id
            WHERE e.teacher_id = $1
              AND e.date = $2
              AND e.class_id <> $3
              AND e.activity_id IS NOT NULL
              AND s.start_time < $5
              AND s.end_time > $4
        );
        "#,
    )
    .bind(teacher_id)
    .bind(date)
    .bind(class_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(executor)
    .await?;

    Ok(overlaps)
}

pub async fn upsert_entry<'e, E>(
    executor: E,
    class_id: Uuid,
    date: NaiveDate,
    slot_id: Uuid,
    activity_id: Uuid,
    teacher_id: Uuid,
) -> Result<DbCalendarEntry>
where
    E: Executor<'e, Database = Postgres>,
{
    let now = Utc::now();

    let entry = sqlx::query_as::<_, DbCalendarEntry>(
        r#"
        INSERT INTO calendar_entries (class_id, date, slot_id, activity_id, teacher_id, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (class_id, date, slot_id)
        DO UPDATE SET activity_id = $4, teacher_id = $5, updated_at = $6
        RETURNING class_id, date, slot_id, activity_id, teacher_id, updated_at
        "#,
    )
    .bind(class_id)
    .bind(date)
    .bind(slot_id)
    .bind(activity_id)
    .bind(teacher_id)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(entry)
}

/// Deleting a key that holds nothing is not an error.
pub async fn delete_entry(
    pool: &Pool<Postgres>,
    class_id: Uuid,
    date: NaiveDate,
    slot_id: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM calendar_entries
        WHERE class_id = $1 AND date = $2 AND slot_id = $3
        "#,
    )
    .bind(class_id)
    .bind(date)
    .bind(slot_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
