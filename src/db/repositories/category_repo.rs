//! Problem category repository

use sqlx::PgConnection;

use crate::{error::AppResult, models::ProblemCategory};

/// Repository for category database operations
pub struct CategoryRepository;

impl CategoryRepository {
    /// Find category by slug
    pub async fn find_by_slug(conn: &mut PgConnection, slug: &str) -> AppResult<Option<ProblemCategory>> {
        let category = sqlx::query_as::<_, ProblemCategory>(
            r#"SELECT * FROM problem_categories WHERE problem_category_slug = $1"#,
        )
        .bind(slug)
        .fetch_optional(conn)
        .await?;

        Ok(category)
    }

    /// Get categories related to a problem
    pub async fn find_by_problem(conn: &mut PgConnection, problem_id: i64) -> AppResult<Vec<ProblemCategory>> {
        let categories = sqlx::query_as::<_, ProblemCategory>(
            r#"
            SELECT c.* FROM problem_categories c
            INNER JOIN problem_category_relationships r
                ON r.problem_category_id = c.problem_category_id
            WHERE r.problem_id = $1
            ORDER BY c.problem_category_id
            "#,
        )
        .bind(problem_id)
        .fetch_all(conn)
        .await?;

        Ok(categories)
    }

    /// List all categories
    pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<ProblemCategory>> {
        let categories = sqlx::query_as::<_, ProblemCategory>(
            r#"SELECT * FROM problem_categories ORDER BY problem_category_id"#,
        )
        .fetch_all(conn)
        .await?;

        Ok(categories)
    }

    /// Relate a problem to a category (NULL when the category is absent)
    pub async fn create_relationship(
        conn: &mut PgConnection,
        problem_id: i64,
        problem_category_id: Option<i32>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO problem_category_relationships (problem_id, problem_category_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(problem_id)
        .bind(problem_category_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Delete every category relationship of a problem
    pub async fn delete_relationships(conn: &mut PgConnection, problem_id: i64) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM problem_category_relationships WHERE problem_id = $1"#)
            .bind(problem_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
