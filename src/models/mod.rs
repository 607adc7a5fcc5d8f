//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod category;
pub mod checkpoint;
pub mod form;
pub mod outcome;
pub mod problem;
pub mod tag;

pub use category::*;
pub use checkpoint::*;
pub use form::*;
pub use outcome::*;
pub use problem::*;
pub use tag::*;
