use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader;
use super::model::VehicleDataset;
use super::Result;

// ---------------------------------------------------------------------------
// DatasetCache – memoized loading keyed by source path
// ---------------------------------------------------------------------------

/// Write-once cache of loaded datasets, keyed by canonicalized source path.
///
/// The first `get_or_load` for a source reads and parses the file; every
/// later call for the same source returns the shared `Arc` without touching
/// disk. Entries are never invalidated within the process lifetime, and the
/// process is single-threaded, so no locking is needed.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<VehicleDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `path`, loading it on first access.
    /// A failed load caches nothing, so a fixed file can be retried.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<VehicleDataset>> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if let Some(dataset) = self.entries.get(&key) {
            return Ok(dataset.clone());
        }

        let dataset = Arc::new(loader::load_file(path)?);
        self.entries.insert(key, dataset.clone());
        Ok(dataset)
    }

    /// Number of distinct sources loaded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::super::DataError;
    use super::*;

    const SAMPLE_CSV: &str = "\
price,model_year,condition,odometer,type,days_listed,date_posted
10000,2012,good,120000,suv,19,2018-06-23
20000,2017,excellent,40000,sedan,30,2019-01-07
";

    #[test]
    fn second_load_returns_shared_dataset() {
        let mut tmp = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{SAMPLE_CSV}").unwrap();

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(tmp.path()).unwrap();
        let second = cache.get_or_load(tmp.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = DatasetCache::new();
        let missing = Path::new("definitely_not_here.csv");
        assert!(matches!(
            cache.get_or_load(missing),
            Err(DataError::Unavailable { .. })
        ));
        assert!(cache.is_empty());
    }
}
