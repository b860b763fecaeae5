use std::io::ErrorKind;
use std::path::Path;

use super::ExtractionError;

pub(super) fn read_utf8(path: &Path) -> Result<String, ExtractionError> {
    std::fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::InvalidData => ExtractionError::Encoding,
        _ => ExtractionError::Io(error),
    })
}
