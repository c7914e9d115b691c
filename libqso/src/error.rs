use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libqso` errors
///
/// Every variant is fatal for a batch: the log files cannot represent any of these inline.
pub enum Error {
    /// Error returned if a fixed-width field is given a non-ASCII value
    #[error("{field} contains non-ASCII characters: {value:?}")]
    NonAscii {
        /// name of the field being encoded
        field: &'static str,
        /// the offending value
        value: String,
    },
    /// Error returned if the output directory does not exist
    #[error("output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),
    /// Error returned if an existing directory file is not a whole number of entries
    #[error("directory file length {len} is not a multiple of the {entry_len} byte entry length")]
    MalformedDirectory {
        /// length of the file read
        len: usize,
        /// expected entry length
        entry_len: usize,
    },
    /// Error returned if a FAT slot offset does not fit in 24 bits
    #[error("FAT slot {index} offset does not fit in 24 bits")]
    FatOverflow {
        /// 0-based slot index
        index: usize,
    },
    /// Error returned if a photo would need a sequence number of more than six digits
    #[error("sequence number {sequence} does not fit in a picture file name")]
    SequenceOverflow {
        /// the sequence number that would have been used
        sequence: u32,
    },
    /// Error returned if neither a file nor a directory was given to a batch
    #[error("no input file or directory given")]
    NoInput,
    /// Underlying i/o error
    #[error("i/o error")]
    Io(#[from] std::io::Error),
}
