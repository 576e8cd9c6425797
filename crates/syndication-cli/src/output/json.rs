use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the full envelope to stdout, newline terminated.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut out, value)
        .map_err(|e| e.to_string())
        .and_then(|()| writeln!(out).map_err(|e| e.to_string()));
    if let Err(e) = written {
        eprintln!("JSON serialization error: {}", e);
    }
}
