use std::io::Write;

use crate::error::Error;

/// Status byte of every slot
pub const FAT_STATUS: u8 = 0x40;
/// Distance between consecutive slot offsets
///
/// Always one directory entry, regardless of the thumbnail sizes.
pub const FAT_SLOT_STRIDE: usize = 0x80;
/// Length of one slot
pub const FAT_SLOT_LEN: usize = 4;

const MAX_OFFSET: usize = 0x00FF_FFFF;

/// Encodes slot `index` (0-based): the status byte followed by a 24-bit big-endian offset
///
/// # Errors
///
/// [`Error::FatOverflow`] if the offset does not fit in 24 bits
pub fn fat_slot(index: usize) -> Result<[u8; FAT_SLOT_LEN], Error> {
    let offset = index
        .checked_mul(FAT_SLOT_STRIDE)
        .filter(|&o| o <= MAX_OFFSET)
        .ok_or(Error::FatOverflow { index })?;
    let offset = u32::try_from(offset).map_err(|_| Error::FatOverflow { index })?;
    let [_, hi, mid, lo] = offset.to_be_bytes();
    Ok([FAT_STATUS, hi, mid, lo])
}

/// Encodes a FAT with `count` slots
///
/// # Errors
///
/// See [`fat_slot`]
pub fn fat_bytes(count: usize) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(count * FAT_SLOT_LEN);
    for index in 0..count {
        out.extend_from_slice(&fat_slot(index)?);
    }
    Ok(out)
}

/// Writes a FAT with `count` slots to `w`
///
/// # Errors
///
/// See [`fat_slot`], or any error from the underlying writer
pub fn write_fat(count: usize, mut w: impl Write) -> Result<(), Error> {
    w.write_all(&fat_bytes(count)?)?;
    w.flush()?;
    Ok(())
}
