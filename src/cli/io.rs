//! JSON output for the CLI
//!
//! - Output: one JSON object per command on stdout
//! - Success responses are wrapped as `{"status": "ok", "data": ...}`

use std::io::Write;

use serde::Serialize;

use super::errors::CliResult;

/// Write a success response
pub fn write_response<W: Write, T: Serialize>(out: &mut W, data: &T) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data,
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_response_envelope() {
        let mut buf = Vec::new();
        write_response(&mut buf, &serde_json::json!({"id": 1})).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["id"], 1);
    }
}
