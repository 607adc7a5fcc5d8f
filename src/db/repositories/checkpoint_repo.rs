//! Checkpoint repository

use sqlx::PgConnection;

use crate::{error::AppResult, models::Checkpoint};

/// Repository for checkpoint database operations
pub struct CheckpointRepository;

impl CheckpointRepository {
    /// Create checkpoint
    pub async fn create(conn: &mut PgConnection, checkpoint: &Checkpoint) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO checkpoints (problem_id, checkpoint_id, is_exactly_match, score, input, output)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(checkpoint.problem_id)
        .bind(checkpoint.checkpoint_id)
        .bind(checkpoint.is_exactly_match)
        .bind(checkpoint.score)
        .bind(&checkpoint.input)
        .bind(&checkpoint.output)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Get checkpoints for problem
    pub async fn find_by_problem(conn: &mut PgConnection, problem_id: i64) -> AppResult<Vec<Checkpoint>> {
        let checkpoints = sqlx::query_as::<_, Checkpoint>(
            r#"SELECT * FROM checkpoints WHERE problem_id = $1 ORDER BY checkpoint_id"#,
        )
        .bind(problem_id)
        .fetch_all(conn)
        .await?;

        Ok(checkpoints)
    }

    /// Delete all checkpoints of a problem
    pub async fn delete_by_problem(conn: &mut PgConnection, problem_id: i64) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM checkpoints WHERE problem_id = $1"#)
            .bind(problem_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Count checkpoints across all problems
    pub async fn count(conn: &mut PgConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM checkpoints"#)
            .fetch_one(conn)
            .await?;

        Ok(count)
    }
}
