//! JSON I/O handling for CLI
//!
//! - Input: one JSON object via stdin (may span lines)
//! - Output: one JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut content = String::new();
    io::stdin().lock().read_to_string(&mut content)?;
    parse_request(&content)
}

/// Parse request text; blank input is an error
pub fn parse_request(content: &str) -> CliResult<Value> {
    if content.trim().is_empty() {
        return Err(CliError::invalid_request("Empty input"));
    }
    Ok(serde_json::from_str(content)?)
}

/// Success envelope
pub fn ok_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a prepared envelope to stdout
pub fn write_envelope(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    #[test]
    fn test_parse_request() {
        let value = parse_request("{\n  \"limit\": 3\n}").unwrap();
        assert_eq!(value["limit"], 3);
    }

    #[test]
    fn test_parse_empty_request() {
        let err = parse_request("   \n").unwrap_err();
        assert_eq!(err.code(), CliErrorCode::InvalidRequest);
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(ok_envelope(json!(1))["status"], "ok");
        let err = error_envelope("KEYPLAN_PLAN_NO_ACCESS_PATH", "nope");
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "KEYPLAN_PLAN_NO_ACCESS_PATH");
    }
}
