use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::JavelinConfig;

/// JSON schema for `javelin.toml`, for editor validation.
pub fn json_schema() -> RootSchema {
    schema_for!(JavelinConfig)
}

pub fn json_schema_string() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json_schema())
}
