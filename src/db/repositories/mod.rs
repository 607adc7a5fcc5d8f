//! Database repositories
//!
//! Repositories handle all direct database interactions. They take a bare
//! connection so callers decide which transaction they run in.

pub mod category_repo;
pub mod checkpoint_repo;
pub mod problem_repo;
pub mod tag_repo;

pub use category_repo::CategoryRepository;
pub use checkpoint_repo::CheckpointRepository;
pub use problem_repo::ProblemRepository;
pub use tag_repo::TagRepository;
