//! The in-memory contents of a SARC archive

use indexmap::{map, IndexMap};

use crate::error::{Error, FileNotFoundError, Result};

/// Ordered mapping of file names to their data.
///
/// The order of insertion is the order in which files are written into an archive, and reading an
/// archive restores the order of its node table. Names are unique; their hashes are not
/// considered. Two archives are only equal if they hold the same files in the same order.
///
/// ```
/// let mut data = nx_sarc::ArchiveData::new();
/// data.insert("Model/Test.bfres", b"FRES".to_vec());
/// data.insert("Test.byml", b"YB".to_vec());
///
/// assert_eq!(data.names().collect::<Vec<_>>(), ["Model/Test.bfres", "Test.byml"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveData {
    files: IndexMap<String, Vec<u8>>,
}

impl ArchiveData {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty archive with room for `capacity` files
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of files in the archive
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether this archive contains no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Insert a file, replacing the data of an existing file with the same name.
    ///
    /// A replaced file keeps its position. Returns the previous data if there was any.
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) -> Option<Vec<u8>> {
        self.files.insert(name.into(), data)
    }

    /// Append a new file, failing if the name is already taken
    pub fn add(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<()> {
        match self.files.entry(name.into()) {
            map::Entry::Occupied(entry) => Err(Error::DuplicateName(entry.key().clone())),
            map::Entry::Vacant(entry) => {
                entry.insert(data);
                Ok(())
            }
        }
    }

    /// Remove a file, keeping the order of the remaining files
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.shift_remove(name)
    }

    /// Rename a file. The renamed file moves to the end of the archive.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        if from == to {
            return match self.files.contains_key(from) {
                true => Ok(()),
                false => Err(FileNotFoundError::Name(from.to_owned()).into()),
            };
        }
        if self.files.contains_key(&to) {
            return Err(Error::DuplicateName(to));
        }

        let data = self
            .files
            .shift_remove(from)
            .ok_or_else(|| FileNotFoundError::Name(from.to_owned()))?;
        self.files.insert(to, data);
        Ok(())
    }

    /// Get the data of a file by name
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// Whether a file with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Get the position of a file by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.files.get_index_of(name)
    }

    /// Get the name and data of the file at `index`
    pub fn get_index(&self, index: usize) -> Option<(&str, &[u8])> {
        self.files
            .get_index(index)
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }

    /// Iterate over the file names in archive order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Iterate over the files in archive order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &[u8])> {
        self.files
            .iter()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }
}

impl PartialEq for ArchiveData {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for ArchiveData {}

impl IntoIterator for ArchiveData {
    type Item = (String, Vec<u8>);
    type IntoIter = map::IntoIter<String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<u8>)> for ArchiveData {
    fn from_iter<I: IntoIterator<Item = (N, Vec<u8>)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(name, data)| (name.into(), data))
                .collect(),
        }
    }
}

impl<N: Into<String>> Extend<(N, Vec<u8>)> for ArchiveData {
    fn extend<I: IntoIterator<Item = (N, Vec<u8>)>>(&mut self, iter: I) {
        self.files
            .extend(iter.into_iter().map(|(name, data)| (name.into(), data)));
    }
}
