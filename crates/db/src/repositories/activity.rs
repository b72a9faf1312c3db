use crate::models::DbActivity;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_activity(
    pool: &Pool<Postgres>,
    name: &str,
    description: &str,
    requires_outdoor: bool,
) -> Result<DbActivity> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let activity = sqlx::query_as::<_, DbActivity>(
        r#"
        INSERT INTO activities (id, name, description, requires_outdoor, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, requires_outdoor, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(requires_outdoor)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(activity)
}

pub async fn get_activities(pool: &Pool<Postgres>) -> Result<Vec<DbActivity>> {
    let activities = sqlx::query_as::<_, DbActivity>(
        r#"
        SELECT id, name, description, requires_outdoor, created_at
        FROM activities
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(activities)
}

pub async fn update_activity(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: &str,
    description: &str,
    requires_outdoor: bool,
) -> Result<Option<DbActivity>> {
    let activity = sqlx::query_as::<_, DbActivity>(
        r#"
        UPDATE activities
        SET name = $2, description = $3, requires_outdoor = $4
        WHERE id = $1
        RETURNING id, name, description, requires_outdoor, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(requires_outdoor)
    .fetch_optional(pool)
    .await?;

    Ok(activity)
}

pub async fn delete_activity(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM activities
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
