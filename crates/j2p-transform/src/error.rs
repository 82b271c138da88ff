//! Translation-failure error type (§7.2).
//!
//! Internal transform/emit functions return `Result<T, TransformError>` and
//! propagate with `?`; [`crate::generate`] is the single point that turns an
//! `Err` into `GenerateResult::Err`. No `catch_unwind` is used anywhere in
//! this crate: a failure is a value, not a panic to be caught.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("class declaration is missing a name")]
    MissingClassName,
}
