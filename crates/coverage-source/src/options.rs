//! Options controlling how a source file is indexed.

use crate::SourceError;
use serde::{Deserialize, Serialize};

/// The parser used to resolve `t8 ignore` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// ECMAScript modules and scripts.
    #[serde(alias = "js")]
    EcmaScript,
    /// TypeScript, as accepted by typescript-estree based tooling.
    #[serde(alias = "ts", alias = "tsestree")]
    TypeScript,
}

/// Per-file indexing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceOptions {
    /// Bytes a module-wrapping harness prepended to the executed source.
    pub wrapper_length: u32,
    /// Parser for syntax-level ignore directives. `None` disables them.
    pub parser: Option<ParserKind>,
}

impl SourceOptions {
    /// Creates options with the given wrapper length and no parser.
    pub fn new(wrapper_length: u32) -> Self {
        Self {
            wrapper_length,
            parser: None,
        }
    }

    /// Enables syntax-level ignore directives with the given parser.
    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Decodes options from JSON.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json).map_err(|e| SourceError::InvalidOptions {
            message: e.to_string(),
        })
    }
}
