use crate::models::DbClass;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_class_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbClass>> {
    tracing::debug!("Getting class by id: {}", id);

    let class = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT id, name, end_date, homeroom_teacher_id, created_at
        FROM classes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if class.is_none() {
        tracing::debug!("Class not found: id={}", id);
    }

    Ok(class)
}
