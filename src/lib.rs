//! Pharmacy Franchise Portal Client
//!
//! Client-side core of the branch/HQ ordering portal.
//!
//! ## Features
//! - Order and return carts with merge-by-product semantics
//! - Credit guard against the branch credit ceiling
//! - Order/return submission flow
//! - Typed REST client with token refresh
//! - HQ catalogue, stock, notice board and branch account endpoints
//! - Form validation for signup, password and profile requests

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod persistence;
pub mod submission;
pub mod validation;

pub use api::{ApiError, HttpPortalClient};
pub use config::{ConfigError, PortalConfig};
pub use domain::aggregates::{CartLineItem, CreditPosition, OrderCart, ReturnCart, ReturnLineItem, Session};
pub use domain::value_objects::Won;
pub use persistence::{CartPersistence, JsonFilePersistence, PersistenceError};
pub use submission::{SubmissionError, SubmissionFlow, SubmissionState};

/// Failure of a session-level operation such as a profile edit.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("not signed in")]
    NotSignedIn,
}

pub type Result<T> = std::result::Result<T, PortalError>;
