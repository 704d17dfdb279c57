//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid requests.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("please provide a target for {0}")]
    EmptyTarget(String),
}
