pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// JSON request from `--input` if given, else from piped stdin.
pub fn request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(file::read_json(path)?)),
        None => stdin::read_stdin(),
    }
}
