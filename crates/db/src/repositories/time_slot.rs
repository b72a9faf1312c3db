use crate::models::DbTimeSlot;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

/// Serializes slot catalog writes until the surrounding transaction ends.
pub async fn lock_time_slots<'e, E>(executor: E) -> Result<()>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended('time_slots', 0))")
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn create_time_slot<'e, E>(
    executor: E,
    name: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbTimeSlot>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        INSERT INTO time_slots (id, name, start_time, end_time, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, start_time, end_time, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slots<'e, E>(executor: E) -> Result<Vec<DbTimeSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, name, start_time, end_time, created_at
        FROM time_slots
        ORDER BY start_time ASC, id ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(time_slots)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, name, start_time, end_time, created_at
        FROM time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

pub async fn update_time_slot<'e, E>(
    executor: E,
    id: Uuid,
    name: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Option<DbTimeSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        UPDATE time_slots
        SET name = $2, start_time = $3, end_time = $4
        WHERE id = $1
        RETURNING id, name, start_time, end_time, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(start_time)
    .bind(end_time)
    .fetch_optional(executor)
    .await?;

    Ok(time_slot)
}

/// Removing a slot cascades to the calendar entries that used it.
pub async fn delete_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
