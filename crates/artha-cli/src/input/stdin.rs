use serde_json::Value;
use std::io::{self, Read};

/// Piped input larger than this is rejected rather than buffered.
const MAX_STDIN_BYTES: u64 = 8 * 1024 * 1024;

/// Read JSON from stdin when data is being piped.
/// Returns None if stdin is a TTY or the pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    read_bounded(io::stdin().lock(), MAX_STDIN_BYTES)
}

fn read_bounded<R: Read>(
    reader: R,
    limit: u64,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader.take(limit + 1).read_to_string(&mut buffer)?;
    if buffer.len() as u64 > limit {
        return Err(format!("piped input exceeds {limit} bytes; use --input <file>").into());
    }

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    log::debug!("read {} bytes of input from stdin", trimmed.len());
    Ok(Some(serde_json::from_str(trimmed)?))
}
