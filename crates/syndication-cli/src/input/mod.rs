pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use tracing::debug;

/// Load a typed request from `--input`, falling back to piped stdin JSON.
///
/// `Ok(None)` means neither source supplied a document and the caller
/// should build the request from flags.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        debug!(path, "reading input document");
        return Ok(Some(file::read_input(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => {
            debug!("reading input from stdin");
            Ok(Some(serde_json::from_value(data)?))
        }
        None => Ok(None),
    }
}
