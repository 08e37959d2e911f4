#![forbid(unsafe_code)]

//! # Ceremony Master
//!
//! Runs certification ceremonies: an applicant's request is captured through
//! a schema-driven form, a panel of reviewers rates it one after another, the
//! ratings are summarized into a rank, and a certificate is stored as YAML.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ceremony::{Ceremony, CeremonyRunner, Config, ScriptedInput, YamlStore};
//!
//! fn main() -> ceremony::Result<()> {
//!     let config = Config::builtin()?;
//!     let store = YamlStore::new("certificates");
//!     let ceremony = Ceremony::new(config.schema)?;
//!
//!     let mut runner =
//!         CeremonyRunner::new(ceremony, ScriptedInput::default(), &store, "designer.png".into());
//!     let outcome = runner.run()?;
//!     println!("interrupted: {}", outcome.interrupted);
//!     Ok(())
//! }
//! ```

pub mod ceremony;
pub mod certificate;
pub mod commands;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod form;
pub mod input;
pub mod schema;
pub mod summary;
pub mod telemetry;

// Re-exports
pub use ceremony::{Application, Ceremony, CeremonyRunner, Effect, Phase, RunOutcome};
pub use certificate::{
    Certificate, CertificateAssembler, CertificateRenderer, CertificateStore, MarkdownRenderer,
    YamlStore,
};
pub use config::{AppPaths, Config};
pub use error::{CeremonyError, ConfigurationError, PersistenceError, Result, ValidationError};
pub use evaluation::{EvaluationSequencer, Results, Reviewer};
pub use form::{FieldValue, FormBuilder, RuntimeForm};
pub use input::{InputEvent, InputSource, ScriptedInput, TerminalInput};
pub use schema::{FieldDescriptor, FieldType, GroupDescriptor, Schema, SkillLevel};
pub use summary::{resolve_rank, Aggregator, GroupStatistics, Summary};
