//! Forms
//!
//! Schema-driven runtime forms: typed fields with validators, a per-form
//! value store, and the form lifecycle.

mod builder;
mod field;
mod runtime;
mod store;

pub use builder::FormBuilder;
pub use field::{rating_label, FieldKind, RuntimeField, RATING_SCALE};
pub use runtime::{FormOutcome, FormState, RuntimeForm, RuntimeGroup, MAX_WIDTH};
pub use store::{FieldValue, ValueStore};
