//! Problem service
//!
//! Validates problem forms and keeps a problem's checkpoints, categories and
//! tags in step with it. Every public operation runs inside exactly one unit
//! of work: it commits when the operation succeeds and rolls back otherwise.

use std::collections::HashSet;

use crate::{
    constants::{NO_CATEGORY_FILTER, UNCATEGORIZED_SLUG},
    db::{
        CheckpointMapper, Database, ProblemCategoryMapper, ProblemMapper, ProblemTagMapper,
        UnitOfWork,
    },
    error::AppResult,
    models::{
        Checkpoint, NewProblem, Problem, ProblemCategory, ProblemChecks, ProblemForm,
        ProblemOutcome, ProblemTag, TestCase,
    },
    utils::{check_problem, slugify, split_scores},
};

/// Problem service for business logic
#[derive(Debug, Clone)]
pub struct ProblemService<D> {
    db: D,
}

impl<D: Database> ProblemService<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    /// Get a reference to the backing database
    pub fn database(&self) -> &D {
        &self.db
    }

    /// Smallest problem identifier, the first index of the listing
    pub async fn get_first_index_of_problems(&self) -> AppResult<i64> {
        let mut work = self.db.begin().await?;
        let result = work.get_lower_bound_of_problems().await;
        finish(work, result).await
    }

    /// Largest identifier of the page of `limit` problems starting at `offset`
    ///
    /// A negative `limit` is treated as an empty page.
    pub async fn get_last_index_of_problems(
        &self,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<i64> {
        let mut work = self.db.begin().await?;
        let result = work
            .get_upper_bound_of_problems_with_limit(is_public_only, offset, limit.max(0))
            .await;
        finish(work, result).await
    }

    /// Get problem by ID
    pub async fn get_problem(&self, problem_id: i64) -> AppResult<Option<Problem>> {
        let mut work = self.db.begin().await?;
        let result = work.get_problem(problem_id).await;
        finish(work, result).await
    }

    /// List problems from identifier `offset` on.
    ///
    /// An unknown category slug disables the category filter and a negative
    /// `limit` lists nothing.
    pub async fn get_problems_using_filters(
        &self,
        offset: i64,
        keyword: Option<&str>,
        problem_category_slug: Option<&str>,
        is_public_only: bool,
        limit: i64,
    ) -> AppResult<Vec<Problem>> {
        let mut work = self.db.begin().await?;
        let result = match resolve_category_id(&mut work, problem_category_slug).await {
            Ok(problem_category_id) => {
                work.get_problems_using_filters(
                    non_empty(keyword),
                    problem_category_id,
                    is_public_only,
                    offset,
                    limit.max(0),
                )
                .await
            }
            Err(err) => Err(err),
        };
        finish(work, result).await
    }

    /// Count problems under the same filters as [`Self::get_problems_using_filters`]
    pub async fn get_number_of_problems_using_filters(
        &self,
        keyword: Option<&str>,
        problem_category_slug: Option<&str>,
        is_public_only: bool,
    ) -> AppResult<i64> {
        let mut work = self.db.begin().await?;
        let result = match resolve_category_id(&mut work, problem_category_slug).await {
            Ok(problem_category_id) => {
                work.get_number_of_problems_using_filters(
                    non_empty(keyword),
                    problem_category_id,
                    is_public_only,
                )
                .await
            }
            Err(err) => Err(err),
        };
        finish(work, result).await
    }

    pub async fn get_problem_categories_using_problem_id(
        &self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemCategory>> {
        let mut work = self.db.begin().await?;
        let result = work.get_problem_categories_using_problem_id(problem_id).await;
        finish(work, result).await
    }

    pub async fn get_problem_tags_using_problem_id(
        &self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemTag>> {
        let mut work = self.db.begin().await?;
        let result = work.get_problem_tag_using_problem_id(problem_id).await;
        finish(work, result).await
    }

    /// List every category
    pub async fn get_problem_categories(&self) -> AppResult<Vec<ProblemCategory>> {
        let mut work = self.db.begin().await?;
        let result = work.get_problem_categories().await;
        finish(work, result).await
    }

    /// Count all problems, public or not
    pub async fn get_number_of_problems(&self) -> AppResult<i64> {
        let mut work = self.db.begin().await?;
        let result = work.get_number_of_problems().await;
        finish(work, result).await
    }

    /// Count all checkpoints, private problems included
    pub async fn get_number_of_checkpoints(&self) -> AppResult<i64> {
        let mut work = self.db.begin().await?;
        let result = work.get_number_of_checkpoints().await;
        finish(work, result).await
    }

    pub async fn get_checkpoints_using_problem_id(
        &self,
        problem_id: i64,
    ) -> AppResult<Vec<Checkpoint>> {
        let mut work = self.db.begin().await?;
        let result = work.get_checkpoints_using_problem_id(problem_id).await;
        finish(work, result).await
    }

    /// Create a problem with its checkpoints, categories and tags.
    ///
    /// A form that fails validation is reported in the outcome and nothing
    /// is written.
    pub async fn create_problem(&self, form: &ProblemForm) -> AppResult<ProblemOutcome> {
        let problem = form.to_new_problem();
        let mut outcome = ProblemOutcome::for_creation(check_problem(&problem));
        if !outcome.successful {
            tracing::debug!("Problem creation rejected: {:?}", outcome.checks);
            return Ok(outcome);
        }

        let mut work = self.db.begin().await?;
        let result = insert_problem(&mut work, &problem, form).await;
        let problem_id = finish(work, result).await?;

        tracing::info!("Created problem: {}", problem_id);
        outcome.problem_id = Some(problem_id);
        Ok(outcome)
    }

    /// Edit an existing problem, replacing its checkpoints, categories and tags
    pub async fn edit_problem(
        &self,
        problem_id: i64,
        form: &ProblemForm,
    ) -> AppResult<ProblemOutcome> {
        let checks = check_problem(&form.to_new_problem());

        let mut work = self.db.begin().await?;
        let result = replace_problem(&mut work, problem_id, checks, form).await;
        let outcome = finish(work, result).await?;

        if outcome.successful {
            tracing::info!("Edited problem: {}", problem_id);
        } else {
            tracing::debug!(
                "Edit of problem {} rejected (exists: {:?}): {:?}",
                problem_id,
                outcome.problem_exists,
                outcome.checks
            );
        }
        Ok(outcome)
    }

    /// Delete problem
    pub async fn delete_problem(&self, problem_id: i64) -> AppResult<()> {
        let mut work = self.db.begin().await?;
        let result = work.delete_problem(problem_id).await;
        finish(work, result).await?;

        tracing::info!("Deleted problem: {}", problem_id);
        Ok(())
    }
}

/// Commit on success, roll back on failure
async fn finish<W: UnitOfWork, T>(work: W, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            work.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = work.rollback().await {
                tracing::warn!("Rollback failed after {}: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

fn non_empty(keyword: Option<&str>) -> Option<&str> {
    keyword.filter(|k| !k.is_empty())
}

async fn resolve_category_id<W: ProblemCategoryMapper>(
    work: &mut W,
    problem_category_slug: Option<&str>,
) -> AppResult<i32> {
    let Some(slug) = problem_category_slug else {
        return Ok(NO_CATEGORY_FILTER);
    };

    Ok(work
        .get_problem_category_using_category_slug(slug)
        .await?
        .map_or(NO_CATEGORY_FILTER, |c| c.problem_category_id))
}

async fn insert_problem<W: UnitOfWork>(
    work: &mut W,
    problem: &NewProblem,
    form: &ProblemForm,
) -> AppResult<i64> {
    let payload = form.decode_payload()?;

    let problem_id = work.create_problem(problem).await?;
    create_checkpoints(work, problem_id, &payload.test_cases, form.is_exactly_match).await?;
    create_problem_categories(work, problem_id, &payload.category_slugs).await?;
    create_problem_tags(work, problem_id, &payload.tag_names).await?;

    Ok(problem_id)
}

async fn replace_problem<W: UnitOfWork>(
    work: &mut W,
    problem_id: i64,
    checks: ProblemChecks,
    form: &ProblemForm,
) -> AppResult<ProblemOutcome> {
    let problem_exists = work.get_problem(problem_id).await?.is_some();
    let outcome = ProblemOutcome::for_edit(checks, problem_exists);
    if !outcome.successful {
        return Ok(outcome);
    }

    let payload = form.decode_payload()?;

    work.update_problem(&form.to_new_problem().with_id(problem_id))
        .await?;

    work.delete_checkpoint(problem_id).await?;
    create_checkpoints(work, problem_id, &payload.test_cases, form.is_exactly_match).await?;

    work.delete_problem_category_relationship(problem_id).await?;
    create_problem_categories(work, problem_id, &payload.category_slugs).await?;

    work.delete_problem_tag_relationship(problem_id).await?;
    create_problem_tags(work, problem_id, &payload.tag_names).await?;

    Ok(outcome)
}

/// Persist one checkpoint per test case, in submission order
async fn create_checkpoints<W: CheckpointMapper>(
    work: &mut W,
    problem_id: i64,
    test_cases: &[TestCase],
    is_exactly_match: bool,
) -> AppResult<()> {
    let scores = split_scores(test_cases.len());

    for (index, (test_case, score)) in test_cases.iter().zip(scores).enumerate() {
        let checkpoint = Checkpoint {
            problem_id,
            checkpoint_id: index as i32,
            is_exactly_match,
            score,
            input: test_case.input.clone(),
            output: test_case.output.clone(),
        };
        work.create_checkpoint(&checkpoint).await?;
    }
    Ok(())
}

/// Relate the problem to each category, or to `uncategorized` when none is given
async fn create_problem_categories<W: ProblemCategoryMapper>(
    work: &mut W,
    problem_id: i64,
    category_slugs: &[String],
) -> AppResult<()> {
    let fallback = [UNCATEGORIZED_SLUG.to_string()];
    let slugs = if category_slugs.is_empty() {
        &fallback[..]
    } else {
        category_slugs
    };

    for slug in slugs {
        let category = work.get_problem_category_using_category_slug(slug).await?;
        if category.is_none() {
            tracing::warn!("Problem {} refers to unknown category: {}", problem_id, slug);
        }
        work.create_problem_category_relationship(problem_id, category.as_ref())
            .await?;
    }
    Ok(())
}

/// Relate the problem to each tag, creating missing tags on the way
async fn create_problem_tags<W: ProblemTagMapper>(
    work: &mut W,
    problem_id: i64,
    tag_names: &[String],
) -> AppResult<()> {
    let mut linked_slugs = HashSet::new();

    for name in tag_names {
        let slug = slugify(name);
        let tag = match work.get_problem_tag_using_tag_slug(&slug).await? {
            Some(tag) => tag,
            None => work.create_problem_tag(&slug, name).await?,
        };

        // Distinct names may share a slug, e.g. "Hello World" and "Hello-World"
        if linked_slugs.insert(slug) {
            work.create_problem_tag_relationship(problem_id, &tag).await?;
        }
    }
    Ok(())
}
