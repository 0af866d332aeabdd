use crate::Result;
use crate::digest::Digest;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, digest: &Digest) -> Result<String> {
        convert_to_json(digest, &self.config)
    }
}

/// Serialize a digest. The `kind` field is `"article"` or `"error"`;
/// keywords are an array so their ranking survives.
pub fn convert_to_json(digest: &Digest, config: &JsonConfig) -> Result<String> {
    if config.pretty {
        Ok(serde_json::to_string_pretty(digest)?)
    } else {
        Ok(serde_json::to_string(digest)?)
    }
}
