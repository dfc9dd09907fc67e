//! Job descriptions: created once, looked up for ranking.

use sqlx::SqlitePool;

use crate::models::job::JobDescriptionRow;

pub async fn create_job(pool: &SqlitePool, title: &str, jd_text: &str) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO job_descriptions (title, jd_text) VALUES (?, ?)")
        .bind(title)
        .bind(jd_text)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_job(pool: &SqlitePool, job_id: i64) -> Result<Option<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>("SELECT * FROM job_descriptions WHERE id = ?")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn test_create_then_find() {
        let pool = memory_pool().await;
        let id = create_job(&pool, "Backend Engineer", "Rust and SQL")
            .await
            .unwrap();
        let job = find_job(&pool, id).await.unwrap().unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.jd_text, "Rust and SQL");
    }

    #[tokio::test]
    async fn test_unknown_job_is_none() {
        let pool = memory_pool().await;
        assert!(find_job(&pool, 42).await.unwrap().is_none());
    }
}
