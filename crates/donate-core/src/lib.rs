//! Core domain models for donate
//!
//! This crate contains:
//! - Error types shared by every crate in the workspace
//! - Domain models (Platform, SensitiveKeys, AnonymousId, Survey)
//! - The consent gate and the file naming convention

pub mod consent;
pub mod error;
pub mod naming;
pub mod platform;
pub mod sensitive;
pub mod survey;

pub use consent::{Consent, ConsentSet};
pub use error::{Error, Result};
pub use naming::{AnonymousId, redacted_file_name, survey_file_name};
pub use platform::Platform;
pub use sensitive::{CollisionPolicy, DEFAULT_MAX_DEPTH, SensitiveKeys};
pub use survey::{MovementAnswer, ProtestAnswer, Survey, SurveyChoice};
