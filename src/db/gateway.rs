//! Persistence gateways
//!
//! Each mapper is a capability interface over one table family. A
//! [`UnitOfWork`] bundles all four behind a single transaction; a
//! [`Database`] hands out units of work.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Checkpoint, NewProblem, Problem, ProblemCategory, ProblemTag},
};

/// Access to problem rows
#[async_trait]
pub trait ProblemMapper: Send {
    /// Fetch one problem
    async fn get_problem(&mut self, problem_id: i64) -> AppResult<Option<Problem>>;

    /// List problems with identifiers from `offset` on, matching every filter.
    ///
    /// A `problem_category_id` of 0 disables the category filter.
    async fn get_problems_using_filters(
        &mut self,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Problem>>;

    /// Count problems matching every filter
    async fn get_number_of_problems_using_filters(
        &mut self,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
    ) -> AppResult<i64>;

    /// Smallest problem identifier, 0 when there are none
    async fn get_lower_bound_of_problems(&mut self) -> AppResult<i64>;

    /// Largest identifier among the first `limit` problems from `offset` on
    async fn get_upper_bound_of_problems_with_limit(
        &mut self,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<i64>;

    /// Insert a problem and return its assigned identifier
    async fn create_problem(&mut self, problem: &NewProblem) -> AppResult<i64>;

    async fn update_problem(&mut self, problem: &Problem) -> AppResult<()>;

    /// Delete a problem together with everything that hangs off it
    async fn delete_problem(&mut self, problem_id: i64) -> AppResult<()>;

    async fn get_number_of_problems(&mut self) -> AppResult<i64>;
}

/// Access to checkpoint rows
#[async_trait]
pub trait CheckpointMapper: Send {
    /// Checkpoints of one problem, ordered by ordinal
    async fn get_checkpoints_using_problem_id(&mut self, problem_id: i64)
        -> AppResult<Vec<Checkpoint>>;

    async fn create_checkpoint(&mut self, checkpoint: &Checkpoint) -> AppResult<()>;

    /// Delete every checkpoint of one problem
    async fn delete_checkpoint(&mut self, problem_id: i64) -> AppResult<()>;

    async fn get_number_of_checkpoints(&mut self) -> AppResult<i64>;
}

/// Access to categories and their problem relationships
#[async_trait]
pub trait ProblemCategoryMapper: Send {
    async fn get_problem_category_using_category_slug(
        &mut self,
        problem_category_slug: &str,
    ) -> AppResult<Option<ProblemCategory>>;

    /// Categories related to one problem, ordered by identifier
    async fn get_problem_categories_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemCategory>>;

    async fn get_problem_categories(&mut self) -> AppResult<Vec<ProblemCategory>>;

    /// Relate a problem to a category.
    ///
    /// An absent category is stored as a relationship to nothing.
    async fn create_problem_category_relationship(
        &mut self,
        problem_id: i64,
        problem_category: Option<&ProblemCategory>,
    ) -> AppResult<()>;

    /// Remove every category relationship of one problem
    async fn delete_problem_category_relationship(&mut self, problem_id: i64) -> AppResult<()>;
}

/// Access to tags and their problem relationships
#[async_trait]
pub trait ProblemTagMapper: Send {
    async fn get_problem_tag_using_tag_slug(
        &mut self,
        problem_tag_slug: &str,
    ) -> AppResult<Option<ProblemTag>>;

    /// Tags related to one problem, ordered by identifier
    async fn get_problem_tag_using_problem_id(&mut self, problem_id: i64)
        -> AppResult<Vec<ProblemTag>>;

    /// Insert a tag; fails with `AlreadyExists` when the slug is taken
    async fn create_problem_tag(
        &mut self,
        problem_tag_slug: &str,
        problem_tag_name: &str,
    ) -> AppResult<ProblemTag>;

    async fn create_problem_tag_relationship(
        &mut self,
        problem_id: i64,
        problem_tag: &ProblemTag,
    ) -> AppResult<()>;

    /// Remove every tag relationship of one problem
    async fn delete_problem_tag_relationship(&mut self, problem_id: i64) -> AppResult<()>;
}

/// Every gateway behind one transaction
///
/// Dropping a unit of work without committing discards its writes.
#[async_trait]
pub trait UnitOfWork:
    ProblemMapper + CheckpointMapper + ProblemCategoryMapper + ProblemTagMapper + Send + Sized
{
    async fn commit(self) -> AppResult<()>;

    async fn rollback(self) -> AppResult<()>;
}

/// Source of units of work
#[async_trait]
pub trait Database: Send + Sync {
    type Work: UnitOfWork;

    async fn begin(&self) -> AppResult<Self::Work>;
}
