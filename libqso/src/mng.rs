use bon::Builder;
use std::io::Write;

use crate::error::Error;

/// Length of the encoded management header
pub const MANAGEMENT_LEN: usize = 32;

const PAD: u8 = 0xFF;
const PAD_AFTER_MESSAGES: usize = 14;
const PAD_AFTER_GROUPS: usize = 12;

/// The contents of `QSOMNG.DAT`
///
/// ```
/// let header = libqso::ManagementHeader::builder().photos(3).build();
/// let bytes = header.to_bytes();
/// assert_eq!(&bytes[16..18], &[0x00, 0x03]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Builder)]
pub struct ManagementHeader {
    /// Number of stored messages
    #[builder(default)]
    pub messages: u16,
    /// Number of stored photos
    #[builder(default)]
    pub photos: u16,
    /// Number of stored groups
    #[builder(default)]
    pub groups: u16,
}

impl ManagementHeader {
    /// Big-endian counts with `0xFF` padding
    #[must_use]
    pub fn to_bytes(&self) -> [u8; MANAGEMENT_LEN] {
        let mut out = [PAD; MANAGEMENT_LEN];
        out[0..2].copy_from_slice(&self.messages.to_be_bytes());
        let photos = 2 + PAD_AFTER_MESSAGES;
        out[photos..photos + 2].copy_from_slice(&self.photos.to_be_bytes());
        out[photos + 2..photos + 4].copy_from_slice(&self.groups.to_be_bytes());
        debug_assert_eq!(photos + 4 + PAD_AFTER_GROUPS, MANAGEMENT_LEN);
        out
    }

    /// Writes the header to `w`
    ///
    /// # Errors
    ///
    /// Any error from the underlying writer
    pub fn write_to(&self, mut w: impl Write) -> Result<(), Error> {
        w.write_all(&self.to_bytes())?;
        w.flush()?;
        Ok(())
    }
}
