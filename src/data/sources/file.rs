//! Rate snapshot read from a saved `latest.json` file

use super::{RateSource, RatesDocument};
use crate::data::fx::RateTable;
use crate::error::{GamePlanError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads rates from a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileRateSource {
    path: PathBuf,
    name: String,
}

impl FileRateSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file {}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RateSource for FileRateSource {
    fn fetch(&self) -> Result<RateTable> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            GamePlanError::RateUnavailable(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        RatesDocument::from_json(&text)
            .and_then(RatesDocument::into_table)
            .map_err(|e| GamePlanError::RateUnavailable(format!("{}: {}", self.path.display(), e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fx::RateProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fetch_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"rates": {{"USD": 1, "GBP": 0.8}}}}"#).unwrap();

        let source = FileRateSource::new(file.path());
        let table = source.fetch().unwrap();
        assert_eq!(table.len(), 2);
        assert!(source.name().starts_with("file "));
    }

    #[test]
    fn test_missing_file_is_rate_unavailable() {
        let source = FileRateSource::new("/definitely/not/here/latest.json");
        assert!(matches!(source.fetch(), Err(GamePlanError::RateUnavailable(_))));

        let provider = RateProvider::load(&source);
        assert!(!provider.is_ready());
    }

    #[test]
    fn test_invalid_json_is_rate_unavailable() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let source = FileRateSource::new(file.path());
        assert!(matches!(source.fetch(), Err(GamePlanError::RateUnavailable(_))));
    }
}
