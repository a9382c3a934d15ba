use crate::model::location::{Coordinates, SavedLocation};
use crate::prelude::{LineError, StoreError, StoreResult};
use crate::store::codec::{format_line, parse_line};
use crate::telemetry::log::LogManager;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Result of a load that keeps track of the lines it had to drop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub locations: Vec<SavedLocation>,
    /// One-based line numbers paired with the reason they were skipped.
    pub skipped: Vec<(usize, LineError)>,
}

/// What a save request ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SavedLocation),
    EmptyName,
    LocationUnknown,
}

/// Append-only store of named locations backed by a flat text file.
///
/// The file is the single source of truth: callers reload it for every
/// render instead of caching the list. One writer is assumed; appends are
/// not locked.
pub struct LocationStore {
    path: PathBuf,
    logger: LogManager,
}

impl LocationStore {
    pub const DEFAULT_FILE: &'static str = "saved_locations.txt";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: LogManager::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> StoreResult<Vec<SavedLocation>> {
        Ok(self.load_report()?.locations)
    }

    /// Reads every line of the backing file. A missing file is an empty
    /// store; malformed lines are skipped and reported.
    pub fn load_report(&self) -> StoreResult<LoadReport> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.logger.record(&format!(
                    "{} does not exist yet, no saved locations",
                    self.path.display()
                ));
                return Ok(LoadReport::default());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let mut report = LoadReport::default();
        for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let raw = raw.map_err(|source| self.io_error(source))?;
            let parsed = String::from_utf8(raw)
                .map_err(|_| LineError::InvalidUtf8)
                .and_then(|line| parse_line(&line));
            match parsed {
                Ok(location) => report.locations.push(location),
                Err(err @ LineError::TooFewFields(_)) => report.skipped.push((index + 1, err)),
                Err(err) => {
                    self.logger.warn(&format!(
                        "skipping {} line {}: {}",
                        self.path.display(),
                        index + 1,
                        err
                    ));
                    report.skipped.push((index + 1, err));
                }
            }
        }

        self.logger.record(&format!(
            "loaded {} saved locations from {}",
            report.locations.len(),
            self.path.display()
        ));
        Ok(report)
    }

    /// Writes one line at the end of the backing file, creating it first if
    /// needed.
    pub fn append(&self, location: &SavedLocation) -> StoreResult<()> {
        if location.name.contains(|c: char| c == '\n' || c == '\r') {
            return Err(StoreError::InvalidName(location.name.clone()));
        }
        if location.coordinates().is_none() {
            return Err(StoreError::InvalidCoordinates {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(format_line(location).as_bytes())
            .map_err(|source| self.io_error(source))?;

        self.logger.record(&format!(
            "saved {:?} at {}, {}",
            location.name, location.latitude, location.longitude
        ));
        Ok(())
    }

    /// Saves the current location under `name`.
    ///
    /// Blank names and an unknown location leave the file untouched.
    pub fn save(&self, name: &str, current: Option<Coordinates>) -> StoreResult<SaveOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(SaveOutcome::EmptyName);
        }
        let Some(coordinates) = current else {
            return Ok(SaveOutcome::LocationUnknown);
        };

        let location = SavedLocation::at(coordinates, name);
        self.append(&location)?;
        Ok(SaveOutcome::Saved(location))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> LocationStore {
        LocationStore::new(dir.path().join(LocationStore::DEFAULT_FILE))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn append_to_missing_file_writes_exact_line() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .append(&SavedLocation::new(10.0, 20.0, "Home"))
            .unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "10.0,20.0,Home\n"
        );
    }

    #[test]
    fn appended_record_loads_last() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "40.7,-74.0,New York,NY\n").unwrap();

        let office = SavedLocation::new(51.5074, -0.1278, "Office");
        store.append(&office).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "New York,NY");
        assert_eq!(loaded.last(), Some(&office));
    }

    #[test]
    fn short_lines_are_skipped_and_loading_continues() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "1.0,2.0\n\n3.0,4.0,Beach\n").unwrap();

        let report = store.load_report().unwrap();
        assert_eq!(report.locations, vec![SavedLocation::new(3.0, 4.0, "Beach")]);
        assert_eq!(
            report.skipped,
            vec![
                (1, LineError::TooFewFields(2)),
                (2, LineError::TooFewFields(1))
            ]
        );
    }

    #[test]
    fn non_numeric_line_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "abc,2.0,Broken\n5.0,6.0,Park\n").unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![SavedLocation::new(5.0, 6.0, "Park")]);
    }

    #[test]
    fn invalid_utf8_line_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            b"1.0,2.0,Good\n3.0,4.0,Bad\xff\n5.0,6.0,AlsoGood\n".as_slice(),
        )
        .unwrap();

        let report = store.load_report().unwrap();
        assert_eq!(
            report.locations,
            vec![
                SavedLocation::new(1.0, 2.0, "Good"),
                SavedLocation::new(5.0, 6.0, "AlsoGood")
            ]
        );
        assert_eq!(report.skipped, vec![(2, LineError::InvalidUtf8)]);
    }

    #[test]
    fn reload_and_reappend_reproduces_the_file() {
        let dir = TempDir::new().unwrap();
        let source = store_in(&dir);
        let contents = "40.7,-74.0,New York,NY\n-22.9068,-43.1729,Rio de Janeiro\n0.5,1.5,\n";
        fs::write(source.path(), contents).unwrap();

        let copy = LocationStore::new(dir.path().join("copy.txt"));
        for location in source.load().unwrap() {
            copy.append(&location).unwrap();
        }
        assert_eq!(fs::read_to_string(copy.path()).unwrap(), contents);
    }

    #[test]
    fn blank_name_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "1.0,2.0,Existing\n").unwrap();
        let before = fs::read(store.path()).unwrap();
        let here = Coordinates::new(3.0, 4.0);

        assert_eq!(store.save("", here).unwrap(), SaveOutcome::EmptyName);
        assert_eq!(store.save("   \t", here).unwrap(), SaveOutcome::EmptyName);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn unknown_location_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(
            store.save("Home", None).unwrap(),
            SaveOutcome::LocationUnknown
        );
        assert!(!store.path().exists());
    }

    #[test]
    fn save_trims_the_name() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let outcome = store.save("  Home  ", Coordinates::new(10.0, 20.0)).unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Saved(SavedLocation::new(10.0, 20.0, "Home"))
        );
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "10.0,20.0,Home\n"
        );
    }

    #[test]
    fn line_breaks_in_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store
            .append(&SavedLocation::new(1.0, 2.0, "two\nlines"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn nested_store_path_is_created_on_append() {
        let dir = TempDir::new().unwrap();
        let store = LocationStore::new(dir.path().join("data/bookmarks/saved.txt"));
        store
            .append(&SavedLocation::new(-1.0, -2.0, "Deep"))
            .unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
