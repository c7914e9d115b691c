use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};
use tracing::{debug, info, instrument};

use crate::{
    error::Error,
    record::{DirectoryEntry, DIRECTORY_ENTRY_LEN},
};

/// The contents of `QSOPCTDIR.DAT`: directory entries, back to back
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectoryFile {
    entries: Vec<DirectoryEntry>,
}

impl DirectoryFile {
    /// Creates an empty directory file
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry
    pub fn push(&mut self, entry: DirectoryEntry) {
        self.entries.push(entry);
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries, in file order
    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Highest sequence number among the entries
    #[must_use]
    pub fn last_sequence(&self) -> Option<u32> {
        self.entries.iter().filter_map(DirectoryEntry::sequence).max()
    }

    /// Serializes every entry
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|e| e.as_bytes().iter().copied())
            .collect()
    }

    /// Writes every entry to `w`
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer
    pub fn write_to(&self, mut w: impl Write) -> Result<(), Error> {
        for entry in &self.entries {
            w.write_all(entry.as_bytes())?;
        }
        w.flush()?;
        Ok(())
    }

    /// Reads entries from `r`
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDirectory`] if the data is not a whole number of entries,
    /// or any error from the underlying reader
    pub fn from_reader(mut r: impl Read) -> Result<Self, Error> {
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;
        if data.len() % DIRECTORY_ENTRY_LEN != 0 {
            return Err(Error::MalformedDirectory {
                len: data.len(),
                entry_len: DIRECTORY_ENTRY_LEN,
            });
        }
        let entries: Vec<_> = data
            .chunks_exact(DIRECTORY_ENTRY_LEN)
            .filter_map(DirectoryEntry::from_slice)
            .collect();
        debug!("Read {} directory entries", entries.len());
        Ok(Self { entries })
    }

    /// Reads a directory file from disk
    ///
    /// # Errors
    ///
    /// See [`Self::from_reader`]
    #[instrument(skip_all, fields(path = %filename.as_ref().display()))]
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(filename)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Writes the directory file to disk, replacing any previous contents
    ///
    /// # Errors
    ///
    /// This will error if unable to open and/or write to the provided filename
    #[instrument(skip_all, fields(path = %filename.as_ref().display()))]
    pub fn into_file(&self, filename: impl AsRef<Path>) -> Result<(), Error> {
        let f = File::options()
            .create(true)
            .write(true)
            .truncate(true)
            .open(filename)?;
        self.write_to(BufWriter::new(f))?;
        info!("Wrote {} directory entries", self.len());
        Ok(())
    }
}

impl Extend<DirectoryEntry> for DirectoryFile {
    fn extend<T: IntoIterator<Item = DirectoryEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
