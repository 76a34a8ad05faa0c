//! Shared adapter for turning raw oracle replies into typed JSON.
//!
//! Models routinely wrap structured output in markdown code fences even
//! when told not to. Every call-site funnels its reply through
//! `parse_oracle_json` so fence stripping happens in exactly one place and
//! failure collapses to the single `OracleError::MalformedResponse` kind.

use serde::de::DeserializeOwned;

use super::OracleError;

/// Strip a surrounding markdown code fence, if any, and return the inner
/// payload. A bare reply passes through trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the fence's info string ("json", "JSON", empty, ...).
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the oracle reply as `T`, tolerating code-fence wrapping and
/// nothing else.
pub fn parse_oracle_json<T: DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    let payload = strip_code_fences(raw);
    serde_json::from_str(payload).map_err(|err| OracleError::MalformedResponse(err.to_string()))
}
