//! PostgreSQL-backed gateways
//!
//! Every unit of work is one database transaction; the mappers delegate to
//! the repositories on that transaction's connection.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    db::{
        gateway::{
            CheckpointMapper, Database, ProblemCategoryMapper, ProblemMapper, ProblemTagMapper,
            UnitOfWork,
        },
        repositories::{CategoryRepository, CheckpointRepository, ProblemRepository, TagRepository},
    },
    error::AppResult,
    models::{Checkpoint, NewProblem, Problem, ProblemCategory, ProblemTag},
};

/// Database handle over a connection pool
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// One open transaction
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Database for PgDatabase {
    type Work = PgUnitOfWork;

    async fn begin(&self) -> AppResult<PgUnitOfWork> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork { tx })
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl ProblemMapper for PgUnitOfWork {
    async fn get_problem(&mut self, problem_id: i64) -> AppResult<Option<Problem>> {
        ProblemRepository::find_by_id(&mut self.tx, problem_id).await
    }

    async fn get_problems_using_filters(
        &mut self,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Problem>> {
        ProblemRepository::list(
            &mut self.tx,
            keyword,
            problem_category_id,
            is_public_only,
            offset,
            limit,
        )
        .await
    }

    async fn get_number_of_problems_using_filters(
        &mut self,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
    ) -> AppResult<i64> {
        ProblemRepository::count_filtered(&mut self.tx, keyword, problem_category_id, is_public_only)
            .await
    }

    async fn get_lower_bound_of_problems(&mut self) -> AppResult<i64> {
        ProblemRepository::lower_bound(&mut self.tx).await
    }

    async fn get_upper_bound_of_problems_with_limit(
        &mut self,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<i64> {
        ProblemRepository::upper_bound_with_limit(&mut self.tx, is_public_only, offset, limit).await
    }

    async fn create_problem(&mut self, problem: &NewProblem) -> AppResult<i64> {
        ProblemRepository::create(&mut self.tx, problem).await
    }

    async fn update_problem(&mut self, problem: &Problem) -> AppResult<()> {
        ProblemRepository::update(&mut self.tx, problem).await
    }

    async fn delete_problem(&mut self, problem_id: i64) -> AppResult<()> {
        ProblemRepository::delete(&mut self.tx, problem_id).await
    }

    async fn get_number_of_problems(&mut self) -> AppResult<i64> {
        ProblemRepository::count(&mut self.tx).await
    }
}

#[async_trait]
impl CheckpointMapper for PgUnitOfWork {
    async fn get_checkpoints_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<Checkpoint>> {
        CheckpointRepository::find_by_problem(&mut self.tx, problem_id).await
    }

    async fn create_checkpoint(&mut self, checkpoint: &Checkpoint) -> AppResult<()> {
        CheckpointRepository::create(&mut self.tx, checkpoint).await
    }

    async fn delete_checkpoint(&mut self, problem_id: i64) -> AppResult<()> {
        CheckpointRepository::delete_by_problem(&mut self.tx, problem_id).await
    }

    async fn get_number_of_checkpoints(&mut self) -> AppResult<i64> {
        CheckpointRepository::count(&mut self.tx).await
    }
}

#[async_trait]
impl ProblemCategoryMapper for PgUnitOfWork {
    async fn get_problem_category_using_category_slug(
        &mut self,
        problem_category_slug: &str,
    ) -> AppResult<Option<ProblemCategory>> {
        CategoryRepository::find_by_slug(&mut self.tx, problem_category_slug).await
    }

    async fn get_problem_categories_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemCategory>> {
        CategoryRepository::find_by_problem(&mut self.tx, problem_id).await
    }

    async fn get_problem_categories(&mut self) -> AppResult<Vec<ProblemCategory>> {
        CategoryRepository::list(&mut self.tx).await
    }

    async fn create_problem_category_relationship(
        &mut self,
        problem_id: i64,
        problem_category: Option<&ProblemCategory>,
    ) -> AppResult<()> {
        let problem_category_id = problem_category.map(|c| c.problem_category_id);
        CategoryRepository::create_relationship(&mut self.tx, problem_id, problem_category_id).await
    }

    async fn delete_problem_category_relationship(&mut self, problem_id: i64) -> AppResult<()> {
        CategoryRepository::delete_relationships(&mut self.tx, problem_id).await
    }
}

#[async_trait]
impl ProblemTagMapper for PgUnitOfWork {
    async fn get_problem_tag_using_tag_slug(
        &mut self,
        problem_tag_slug: &str,
    ) -> AppResult<Option<ProblemTag>> {
        TagRepository::find_by_slug(&mut self.tx, problem_tag_slug).await
    }

    async fn get_problem_tag_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemTag>> {
        TagRepository::find_by_problem(&mut self.tx, problem_id).await
    }

    async fn create_problem_tag(
        &mut self,
        problem_tag_slug: &str,
        problem_tag_name: &str,
    ) -> AppResult<ProblemTag> {
        TagRepository::create(&mut self.tx, problem_tag_slug, problem_tag_name).await
    }

    async fn create_problem_tag_relationship(
        &mut self,
        problem_id: i64,
        problem_tag: &ProblemTag,
    ) -> AppResult<()> {
        TagRepository::create_relationship(&mut self.tx, problem_id, problem_tag.problem_tag_id)
            .await
    }

    async fn delete_problem_tag_relationship(&mut self, problem_id: i64) -> AppResult<()> {
        TagRepository::delete_relationships(&mut self.tx, problem_id).await
    }
}
