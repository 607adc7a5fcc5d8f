//! In-memory gateways
//!
//! Mirrors the PostgreSQL schema's observable behavior: identifier
//! sequences, unique tag slugs, unique tag relationships, cascading problem
//! deletes and listing order. A unit of work holds the store lock for its
//! whole lifetime and edits a private copy of the tables, so uncommitted
//! writes are never visible and a dropped unit of work rolls back.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    constants::{NO_CATEGORY_FILTER, UNCATEGORIZED_NAME, UNCATEGORIZED_SLUG},
    db::gateway::{
        CheckpointMapper, Database, ProblemCategoryMapper, ProblemMapper, ProblemTagMapper,
        UnitOfWork,
    },
    error::{AppError, AppResult},
    models::{Checkpoint, NewProblem, Problem, ProblemCategory, ProblemTag},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    problems: BTreeMap<i64, Problem>,
    problem_seq: i64,
    checkpoints: BTreeMap<(i64, i32), Checkpoint>,
    categories: BTreeMap<i32, ProblemCategory>,
    category_seq: i32,
    /// `(problem_id, problem_category_id)`, duplicates allowed
    category_links: Vec<(i64, Option<i32>)>,
    tags: BTreeMap<i64, ProblemTag>,
    tag_seq: i64,
    tag_links: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn insert_category(&mut self, slug: &str, name: &str) {
        self.category_seq += 1;
        self.categories.insert(
            self.category_seq,
            ProblemCategory {
                problem_category_id: self.category_seq,
                problem_category_slug: slug.to_string(),
                problem_category_name: name.to_string(),
            },
        );
    }

    fn ensure_problem(&self, problem_id: i64) -> AppResult<()> {
        if self.problems.contains_key(&problem_id) {
            Ok(())
        } else {
            Err(AppError::Database(format!(
                "foreign key violation: problem {} does not exist",
                problem_id
            )))
        }
    }

    fn filtered(&self, keyword: Option<&str>, problem_category_id: i32, is_public_only: bool) -> Vec<&Problem> {
        let needle = keyword.map(str::to_lowercase);

        self.problems
            .values()
            .filter(|p| !is_public_only || p.is_public)
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.problem_name.to_lowercase().contains(n))
            })
            .filter(|p| {
                problem_category_id == NO_CATEGORY_FILTER
                    || self
                        .category_links
                        .iter()
                        .any(|&(pid, cid)| pid == p.problem_id && cid == Some(problem_category_id))
            })
            .collect()
    }
}

/// Process-local database, cheap to clone and shared between clones
#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
    writes: Arc<AtomicU64>,
    fail_after: Arc<AtomicU64>,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDatabase {
    /// Empty store holding only the `uncategorized` category
    pub fn new() -> Self {
        Self::with_categories(&[])
    }

    /// Store seeded with `uncategorized` followed by the given `(slug, name)` categories
    pub fn with_categories(categories: &[(&str, &str)]) -> Self {
        let mut tables = Tables::default();
        tables.insert_category(UNCATEGORIZED_SLUG, UNCATEGORIZED_NAME);
        for (slug, name) in categories {
            tables.insert_category(slug, name);
        }

        Self {
            tables: Arc::new(Mutex::new(tables)),
            writes: Arc::new(AtomicU64::new(0)),
            fail_after: Arc::new(AtomicU64::new(u64::MAX)),
        }
    }

    /// Number of mutating gateway calls made so far, committed or not
    #[cfg(test)]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every mutating call fail once `writes` more have been made
    #[cfg(test)]
    pub fn fail_writes_after(&self, writes: u64) {
        let threshold = self.write_count().saturating_add(writes);
        self.fail_after.store(threshold, Ordering::SeqCst);
    }
}

/// Unit of work over a [`MemoryDatabase`]
pub struct MemoryUnitOfWork {
    committed: OwnedMutexGuard<Tables>,
    working: Tables,
    writes: Arc<AtomicU64>,
    fail_after: Arc<AtomicU64>,
}

impl MemoryUnitOfWork {
    fn record_write(&self) -> AppResult<()> {
        let performed = self.writes.fetch_add(1, Ordering::SeqCst);
        if performed >= self.fail_after.load(Ordering::SeqCst) {
            return Err(AppError::Database("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Work = MemoryUnitOfWork;

    async fn begin(&self) -> AppResult<MemoryUnitOfWork> {
        let committed = self.tables.clone().lock_owned().await;
        let working = committed.clone();

        Ok(MemoryUnitOfWork {
            committed,
            working,
            writes: self.writes.clone(),
            fail_after: self.fail_after.clone(),
        })
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(mut self) -> AppResult<()> {
        *self.committed = self.working;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ProblemMapper for MemoryUnitOfWork {
    async fn get_problem(&mut self, problem_id: i64) -> AppResult<Option<Problem>> {
        Ok(self.working.problems.get(&problem_id).cloned())
    }

    async fn get_problems_using_filters(
        &mut self,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Problem>> {
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(self
            .working
            .filtered(keyword, problem_category_id, is_public_only)
            .into_iter()
            .filter(|p| p.problem_id >= offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_number_of_problems_using_filters(
        &mut self,
        keyword: Option<&str>,
        problem_category_id: i32,
        is_public_only: bool,
    ) -> AppResult<i64> {
        let count = self
            .working
            .filtered(keyword, problem_category_id, is_public_only)
            .len();
        Ok(count as i64)
    }

    async fn get_lower_bound_of_problems(&mut self) -> AppResult<i64> {
        Ok(self.working.problems.keys().next().copied().unwrap_or(0))
    }

    async fn get_upper_bound_of_problems_with_limit(
        &mut self,
        is_public_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<i64> {
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(self
            .working
            .problems
            .range(offset..)
            .map(|(_, p)| p)
            .filter(|p| !is_public_only || p.is_public)
            .take(limit)
            .map(|p| p.problem_id)
            .last()
            .unwrap_or(0))
    }

    async fn create_problem(&mut self, problem: &NewProblem) -> AppResult<i64> {
        self.record_write()?;

        self.working.problem_seq += 1;
        let problem_id = self.working.problem_seq;
        self.working
            .problems
            .insert(problem_id, problem.clone().with_id(problem_id));
        Ok(problem_id)
    }

    async fn update_problem(&mut self, problem: &Problem) -> AppResult<()> {
        self.record_write()?;

        if let Some(existing) = self.working.problems.get_mut(&problem.problem_id) {
            *existing = problem.clone();
        }
        Ok(())
    }

    async fn delete_problem(&mut self, problem_id: i64) -> AppResult<()> {
        self.record_write()?;

        let tables = &mut self.working;
        tables.problems.remove(&problem_id);
        tables.checkpoints.retain(|&(pid, _), _| pid != problem_id);
        tables.category_links.retain(|&(pid, _)| pid != problem_id);
        tables.tag_links.retain(|&(pid, _)| pid != problem_id);
        Ok(())
    }

    async fn get_number_of_problems(&mut self) -> AppResult<i64> {
        Ok(self.working.problems.len() as i64)
    }
}

#[async_trait]
impl CheckpointMapper for MemoryUnitOfWork {
    async fn get_checkpoints_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<Checkpoint>> {
        Ok(self
            .working
            .checkpoints
            .range((problem_id, i32::MIN)..=(problem_id, i32::MAX))
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn create_checkpoint(&mut self, checkpoint: &Checkpoint) -> AppResult<()> {
        self.record_write()?;
        self.working.ensure_problem(checkpoint.problem_id)?;

        let key = (checkpoint.problem_id, checkpoint.checkpoint_id);
        if self.working.checkpoints.contains_key(&key) {
            return Err(AppError::AlreadyExists(format!(
                "checkpoint {} of problem {}",
                checkpoint.checkpoint_id, checkpoint.problem_id
            )));
        }
        self.working.checkpoints.insert(key, checkpoint.clone());
        Ok(())
    }

    async fn delete_checkpoint(&mut self, problem_id: i64) -> AppResult<()> {
        self.record_write()?;

        self.working
            .checkpoints
            .retain(|&(pid, _), _| pid != problem_id);
        Ok(())
    }

    async fn get_number_of_checkpoints(&mut self) -> AppResult<i64> {
        Ok(self.working.checkpoints.len() as i64)
    }
}

#[async_trait]
impl ProblemCategoryMapper for MemoryUnitOfWork {
    async fn get_problem_category_using_category_slug(
        &mut self,
        problem_category_slug: &str,
    ) -> AppResult<Option<ProblemCategory>> {
        Ok(self
            .working
            .categories
            .values()
            .find(|c| c.problem_category_slug == problem_category_slug)
            .cloned())
    }

    async fn get_problem_categories_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemCategory>> {
        let mut categories: Vec<ProblemCategory> = self
            .working
            .category_links
            .iter()
            .filter(|&&(pid, _)| pid == problem_id)
            .filter_map(|&(_, cid)| cid.and_then(|id| self.working.categories.get(&id)))
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.problem_category_id);
        Ok(categories)
    }

    async fn get_problem_categories(&mut self) -> AppResult<Vec<ProblemCategory>> {
        Ok(self.working.categories.values().cloned().collect())
    }

    async fn create_problem_category_relationship(
        &mut self,
        problem_id: i64,
        problem_category: Option<&ProblemCategory>,
    ) -> AppResult<()> {
        self.record_write()?;
        self.working.ensure_problem(problem_id)?;

        let problem_category_id = problem_category.map(|c| c.problem_category_id);
        self.working
            .category_links
            .push((problem_id, problem_category_id));
        Ok(())
    }

    async fn delete_problem_category_relationship(&mut self, problem_id: i64) -> AppResult<()> {
        self.record_write()?;

        self.working
            .category_links
            .retain(|&(pid, _)| pid != problem_id);
        Ok(())
    }
}

#[async_trait]
impl ProblemTagMapper for MemoryUnitOfWork {
    async fn get_problem_tag_using_tag_slug(
        &mut self,
        problem_tag_slug: &str,
    ) -> AppResult<Option<ProblemTag>> {
        Ok(self
            .working
            .tags
            .values()
            .find(|t| t.problem_tag_slug == problem_tag_slug)
            .cloned())
    }

    async fn get_problem_tag_using_problem_id(
        &mut self,
        problem_id: i64,
    ) -> AppResult<Vec<ProblemTag>> {
        Ok(self
            .working
            .tag_links
            .iter()
            .filter(|&&(pid, _)| pid == problem_id)
            .filter_map(|(_, tid)| self.working.tags.get(tid).cloned())
            .collect())
    }

    async fn create_problem_tag(
        &mut self,
        problem_tag_slug: &str,
        problem_tag_name: &str,
    ) -> AppResult<ProblemTag> {
        self.record_write()?;

        let taken = self
            .working
            .tags
            .values()
            .any(|t| t.problem_tag_slug == problem_tag_slug);
        if taken {
            return Err(AppError::AlreadyExists(format!("tag {}", problem_tag_slug)));
        }

        self.working.tag_seq += 1;
        let tag = ProblemTag {
            problem_tag_id: self.working.tag_seq,
            problem_tag_slug: problem_tag_slug.to_string(),
            problem_tag_name: problem_tag_name.to_string(),
        };
        self.working.tags.insert(tag.problem_tag_id, tag.clone());
        Ok(tag)
    }

    async fn create_problem_tag_relationship(
        &mut self,
        problem_id: i64,
        problem_tag: &ProblemTag,
    ) -> AppResult<()> {
        self.record_write()?;
        self.working.ensure_problem(problem_id)?;

        if !self
            .working
            .tag_links
            .insert((problem_id, problem_tag.problem_tag_id))
        {
            return Err(AppError::AlreadyExists(format!(
                "tag {} of problem {}",
                problem_tag.problem_tag_slug, problem_id
            )));
        }
        Ok(())
    }

    async fn delete_problem_tag_relationship(&mut self, problem_id: i64) -> AppResult<()> {
        self.record_write()?;

        self.working.tag_links.retain(|&(pid, _)| pid != problem_id);
        Ok(())
    }
}
