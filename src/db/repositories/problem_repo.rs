//! Problem repository

use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::{NewProblem, Problem},
};

/// ILIKE pattern matching `keyword` literally anywhere in the name
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Repository for problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Create a new problem, returning its identifier
    pub async fn create(conn: &mut PgConnection, problem: &NewProblem) -> AppResult<i64> {
        let problem_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO problems (
                is_public, problem_name, time_limit, memory_limit, description,
                hint, input_format, output_format, sample_input, sample_output
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING problem_id
            "#,
        )
        .bind(problem.is_public)
        .bind(&problem.problem_name)
        .bind(problem.time_limit)
        .bind(problem.memory_limit)
        .bind(&problem.description)
        .bind(&problem.hint)
        .bind(&problem.input_format)
        .bind(&problem.output_format)
        .bind(&problem.sample_input)
        .bind(&problem.sample_output)
        .fetch_one(conn)
        .await?;

        Ok(problem_id)
    }

    /// Find problem by ID
    pub async fn find_by_id(conn: &mut PgConnection, problem_id: i64) -> AppResult<Option<Problem>> {
        let problem =
            sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE problem_id = $1"#)
                .bind(problem_id)
                .fetch_optional(conn)
                .await?;

        Ok(problem)
    }

    /// Overwrite every field of an existing problem
    pub async fn update(conn: &mut PgConnection, problem: &Problem) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE problems
            SET
                is_public = $2,
                problem_name = $3,
                time_limit = $4,
                memory_limit = $5,
                description = $6,
                hint = $7,
                input_format = $8,
                output_format = $9,
                sample_input = $10,
                sample_output = $11
            WHERE problem_id = $1
            "#,
        )
        .bind(problem.problem_id)
        .bind(problem.is_public)
        .bind(&problem.problem_name)
        .bind(problem.time_limit)
        .bind(problem.memory_limit)
        .bind(&problem.description)
        .bind(&problem.hint)
        .bind(&problem.input_format)
        .bind(&problem.output_format)
        .bind(&problem.sample_input)
        .bind(&problem.sample_output)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Delete problem; checkpoints and relationships cascade
    pub async fn delete(conn: &mut PgConnection, problem_id: i64) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM problems WHERE problem_id = $1"#)
            .bind(problem_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// List problems from `offset` (an identifier) on, keyset-paginated
    pub async fn list(
        conn: &mut PgConnection,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Problem>> {
        let search_pattern = keyword.map(contains_pattern);

        let problems = sqlx::query_as::<_, Problem>(
            r#"
            SELECT p.* FROM problems p
            WHERE
                p.problem_id >= $1
                AND ($2::text IS NULL OR p.problem_name ILIKE $2 ESCAPE '\')
                AND ($3::int = 0 OR EXISTS (
                    SELECT 1 FROM problem_category_relationships r
                    WHERE r.problem_id = p.problem_id AND r.problem_category_id = $3
                ))
                AND (NOT $4 OR p.is_public = true)
            ORDER BY p.problem_id
            LIMIT $5
            "#,
        )
        .bind(offset)
        .bind(&search_pattern)
        .bind(problem_category_id)
        .bind(is_public_only)
        .bind(limit)
        .fetch_all(conn)
        .await?;

        Ok(problems)
    }

    /// Count problems matching the listing filters
    pub async fn count_filtered(
        conn: &mut PgConnection,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
    ) -> AppResult<i64> {
        let search_pattern = keyword.map(contains_pattern);

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM problems p
            WHERE
                ($1::text IS NULL OR p.problem_name ILIKE $1 ESCAPE '\')
                AND ($2::int = 0 OR EXISTS (
                    SELECT 1 FROM problem_category_relationships r
                    WHERE r.problem_id = p.problem_id AND r.problem_category_id = $2
                ))
                AND (NOT $3 OR p.is_public = true)
            "#,
        )
        .bind(&search_pattern)
        .bind(problem_category_id)
        .bind(is_public_only)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    /// Smallest problem identifier
    pub async fn lower_bound(conn: &mut PgConnection) -> AppResult<i64> {
        let bound: i64 = sqlx::query_scalar(r#"SELECT COALESCE(MIN(problem_id), 0) FROM problems"#)
            .fetch_one(conn)
            .await?;

        Ok(bound)
    }

    /// Largest identifier within one page starting at `offset`
    pub async fn upper_bound_with_limit(
        conn: &mut PgConnection,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<i64> {
        let bound: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(page.problem_id), 0) FROM (
                SELECT problem_id FROM problems
                WHERE problem_id >= $1 AND (NOT $2 OR is_public = true)
                ORDER BY problem_id
                LIMIT $3
            ) page
            "#,
        )
        .bind(offset)
        .bind(is_public_only)
        .bind(limit)
        .fetch_one(conn)
        .await?;

        Ok(bound)
    }

    /// Count total problems
    pub async fn count(conn: &mut PgConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM problems"#)
            .fetch_one(conn)
            .await?;

        Ok(count)
    }
}
