//! Built-in default schema, embedded at compile time.

use crate::error::Result;

use super::Schema;

const BUILTIN_SCHEMA: &str = include_str!("../../defaults/ceremony.defaults.yaml");

/// Parse the built-in cake-certification schema
pub fn builtin_schema() -> Result<Schema> {
    let schema: Schema = serde_yaml::from_str(BUILTIN_SCHEMA)?;
    schema.validate()?;
    Ok(schema)
}
