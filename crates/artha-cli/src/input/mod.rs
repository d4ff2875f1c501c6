pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a typed input from `--input`, falling back to piped stdin.
///
/// Returns `None` when neither is available, so the caller can build the
/// input from command-line flags instead.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_structured(path)?));
    }
    if let Some(data) = stdin::read_stdin()? {
        return Ok(Some(serde_json::from_value(data)?));
    }
    Ok(None)
}
