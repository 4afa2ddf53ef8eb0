//! Puzzle input files on local disk

use crate::error::InputError;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of puzzle inputs
///
/// Directory structure: `{dir}/day{day:02}.txt`
pub struct InputStore {
    dir: PathBuf,
}

impl InputStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the input path for a specific day
    pub fn path_for(&self, day: u8) -> PathBuf {
        self.dir.join(format!("day{day:02}.txt"))
    }

    /// Check if the input file exists
    pub fn contains(&self, day: u8) -> bool {
        self.path_for(day).is_file()
    }

    /// Read the day's input
    pub fn load(&self, day: u8) -> Result<String, InputError> {
        let path = self.path_for(day);
        if !path.exists() {
            return Err(InputError::Missing { day, path });
        }
        read_input_file(&path)
    }
}

/// Read an input file given explicitly on the command line
pub fn read_input_file(path: &Path) -> Result<String, InputError> {
    let input = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", input.len(), path.display());
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_format() {
        let store = InputStore::new(PathBuf::from("inputs"));
        assert_eq!(store.path_for(7), PathBuf::from("inputs/day07.txt"));
        assert_eq!(store.path_for(25), PathBuf::from("inputs/day25.txt"));
    }

    #[test]
    fn test_load() {
        let temp = TempDir::new().unwrap();
        let store = InputStore::new(temp.path().to_path_buf());

        assert!(!store.contains(10));
        assert!(matches!(
            store.load(10),
            Err(InputError::Missing { day: 10, .. })
        ));

        let input = "16\n10\n15\n";
        fs::write(store.path_for(10), input).unwrap();
        assert!(store.contains(10));
        assert_eq!(store.load(10).unwrap(), input);
    }

    #[test]
    fn test_directory_in_place_of_file() {
        let temp = TempDir::new().unwrap();
        let store = InputStore::new(temp.path().to_path_buf());
        fs::create_dir(store.path_for(3)).unwrap();

        assert!(!store.contains(3));
        assert!(matches!(store.load(3), Err(InputError::Read { .. })));
    }

    #[test]
    fn test_read_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.txt");
        assert!(read_input_file(&path).is_err());
        fs::write(&path, "1 + 2").unwrap();
        assert_eq!(read_input_file(&path).unwrap(), "1 + 2");
    }
}
