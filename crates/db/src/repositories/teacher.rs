use crate::models::DbTeacher;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_teachers(pool: &Pool<Postgres>) -> Result<Vec<DbTeacher>> {
    let teachers = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, specialization, created_at
        FROM teachers
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(teachers)
}
