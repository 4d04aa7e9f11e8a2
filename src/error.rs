use crate::models::Category;
use thiserror::Error;

pub type MixResult<T> = Result<T, MixError>;

/// Hard failures of the mix normalizer.
///
/// Constraint violations triggered by user input (locked target, lock ceiling,
/// a value above the slider's reachable maximum) are not errors; they come back
/// as [`crate::mix::MixOutcome::Unchanged`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("duplicate category in mix: {0}")]
    DuplicateCategory(Category),

    #[error("invalid share for {category}: {value}")]
    InvalidShare { category: Category, value: f64 },

    #[error("a mix needs at least one category")]
    EmptySet,

    #[error("invalid mix configuration: {0}")]
    InvalidConfig(String),
}
