//! JSON rendering for conversions.

use crate::error::{Error, Result};
use crate::model::Conversion;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a conversion to JSON.
pub fn to_json(conversion: &Conversion, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(conversion),
        JsonFormat::Compact => serde_json::to_string(conversion),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
