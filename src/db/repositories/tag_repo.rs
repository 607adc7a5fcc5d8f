//! Problem tag repository

use sqlx::PgConnection;

use crate::{error::AppResult, models::ProblemTag};

/// Repository for tag database operations
pub struct TagRepository;

impl TagRepository {
    /// Create a new tag
    pub async fn create(conn: &mut PgConnection, slug: &str, name: &str) -> AppResult<ProblemTag> {
        let tag = sqlx::query_as::<_, ProblemTag>(
            r#"
            INSERT INTO problem_tags (problem_tag_slug, problem_tag_name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(name)
        .fetch_one(conn)
        .await?;

        Ok(tag)
    }

    /// Find tag by slug
    pub async fn find_by_slug(conn: &mut PgConnection, slug: &str) -> AppResult<Option<ProblemTag>> {
        let tag = sqlx::query_as::<_, ProblemTag>(
            r#"SELECT * FROM problem_tags WHERE problem_tag_slug = $1"#,
        )
        .bind(slug)
        .fetch_optional(conn)
        .await?;

        Ok(tag)
    }

    /// Get tags related to a problem
    pub async fn find_by_problem(conn: &mut PgConnection, problem_id: i64) -> AppResult<Vec<ProblemTag>> {
        let tags = sqlx::query_as::<_, ProblemTag>(
            r#"
            SELECT t.* FROM problem_tags t
            INNER JOIN problem_tag_relationships r ON r.problem_tag_id = t.problem_tag_id
            WHERE r.problem_id = $1
            ORDER BY t.problem_tag_id
            "#,
        )
        .bind(problem_id)
        .fetch_all(conn)
        .await?;

        Ok(tags)
    }

    /// Relate a problem to a tag
    pub async fn create_relationship(
        conn: &mut PgConnection,
        problem_id: i64,
        problem_tag_id: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO problem_tag_relationships (problem_id, problem_tag_id) VALUES ($1, $2)"#,
        )
        .bind(problem_id)
        .bind(problem_tag_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Delete every tag relationship of a problem
    pub async fn delete_relationships(conn: &mut PgConnection, problem_id: i64) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM problem_tag_relationships WHERE problem_id = $1"#)
            .bind(problem_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
