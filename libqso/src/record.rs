use bon::Builder;
use chrono::{NaiveDateTime, TimeDelta};
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::{
    context::BatchContext,
    date::write_date,
    error::Error,
    field::{write_ascii_field, write_blank},
    gps::{encode_gps, GpsTags},
};

/// Length of one encoded directory entry
pub const DIRECTORY_ENTRY_LEN: usize = 0x80;

const HEAD: [u8; 4] = [0x00; 4];
const NODE_ID_LEN: usize = 5;
const DESTINATION: &str = "ALL";
const DESTINATION_LEN: usize = 10;
const GAP_AFTER_DESTINATION: usize = 6;
/// Width of the radio id field
pub const RADIO_ID_LEN: usize = 5;
/// Width of the callsign field
pub const CALLSIGN_LEN: usize = 16;
/// Width of the description field
pub const DESCRIPTION_LEN: usize = 11;
const GAP_AFTER_DESCRIPTION: usize = 5;
/// Width of the picture file name field
pub const FILENAME_LEN: usize = 16;
const TAIL_LEN: usize = 8;

// offsets used when reading entries back
const SIZE_OFFSET: usize = 80;
const FILENAME_OFFSET: usize = SIZE_OFFSET + 4;
const SEQUENCE_LEN: usize = 6;

/// Highest sequence number that fits the six digits of a picture file name
pub const MAX_SEQUENCE: u32 = 999_999;

/// Name of the thumbnail for the `seq`th photo of a batch
///
/// `H` + the first five characters of the radio id + a six digit sequence number.
/// A radio id shorter than five characters is used as-is.
///
/// ```
/// assert_eq!(libqso::picture_filename("E0Spx", 1), "HE0Spx000001.jpg");
/// ```
#[must_use]
pub fn picture_filename(radio_id: &str, seq: u32) -> String {
    let prefix: String = radio_id.chars().take(RADIO_ID_LEN).collect();
    format!("H{prefix}{seq:06}.jpg")
}

/// A single processed photo, ready to become a [`DirectoryEntry`]
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct PhotoRecord {
    /// Where the photo was read from
    #[builder(into)]
    pub source: PathBuf,
    /// Capture time from the photo's metadata
    pub taken: Option<NaiveDateTime>,
    /// GPS tags from the photo's metadata
    pub gps: Option<GpsTags>,
    /// Byte size of the written thumbnail
    pub thumbnail_size: u32,
    /// 1-based position in the batch
    pub sequence: u32,
    /// Thumbnail file name, see [`picture_filename`]
    #[builder(into)]
    pub filename: String,
}

/// Basename of the source, as written to the description field
pub(crate) fn description(source: &Path) -> String {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One encoded record of `QSOPCTDIR.DAT`
#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryEntry([u8; DIRECTORY_ENTRY_LEN]);

impl DirectoryEntry {
    /// Encodes a photo record.
    ///
    /// The session is taken to have started an hour before `now` and to end at `now`;
    /// photos without a capture time are stamped with `now`.
    ///
    /// # Errors
    ///
    /// [`Error::NonAscii`] if the callsign, radio id, description or file name
    /// cannot be encoded
    pub fn build(
        record: &PhotoRecord,
        ctx: &BatchContext,
        now: NaiveDateTime,
    ) -> Result<Self, Error> {
        let mut buf = Vec::with_capacity(DIRECTORY_ENTRY_LEN);
        buf.extend_from_slice(&HEAD);
        write_blank(&mut buf, NODE_ID_LEN);
        write_ascii_field(&mut buf, "destination", DESTINATION, DESTINATION_LEN)?;
        write_blank(&mut buf, GAP_AFTER_DESTINATION);
        write_ascii_field(&mut buf, "radio id", &ctx.radio_id, RADIO_ID_LEN)?;
        write_ascii_field(&mut buf, "callsign", &ctx.callsign, CALLSIGN_LEN)?;
        write_date(&mut buf, &(now - TimeDelta::hours(1)));
        write_date(&mut buf, &now);
        write_date(&mut buf, &record.taken.unwrap_or(now));
        write_ascii_field(
            &mut buf,
            "description",
            &description(&record.source),
            DESCRIPTION_LEN,
        )?;
        write_blank(&mut buf, GAP_AFTER_DESCRIPTION);
        buf.extend_from_slice(&record.thumbnail_size.to_be_bytes());
        write_ascii_field(&mut buf, "file name", &record.filename, FILENAME_LEN)?;
        buf.extend_from_slice(&encode_gps(record.gps.as_ref()));
        write_blank(&mut buf, TAIL_LEN);

        trace!("Encoded entry {} for {}", record.sequence, record.filename);
        Self::from_slice(&buf).ok_or(Error::MalformedDirectory {
            len: buf.len(),
            entry_len: DIRECTORY_ENTRY_LEN,
        })
    }

    /// Wraps raw entry bytes, returns [`None`] if `bytes` is not exactly one entry long
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    /// The encoded bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIRECTORY_ENTRY_LEN] {
        &self.0
    }

    /// The thumbnail file name, without padding
    #[must_use]
    pub fn filename(&self) -> String {
        String::from_utf8_lossy(&self.0[FILENAME_OFFSET..FILENAME_OFFSET + FILENAME_LEN])
            .trim_end()
            .to_owned()
    }

    /// The sequence number encoded in the file name, if it has one
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        let name = self.filename();
        let stem = name.strip_suffix(".jpg")?;
        stem.get(stem.len().checked_sub(SEQUENCE_LEN)?..)?.parse().ok()
    }

    /// The thumbnail byte size
    #[must_use]
    pub fn thumbnail_size(&self) -> u32 {
        let mut size = [0; 4];
        size.copy_from_slice(&self.0[SIZE_OFFSET..FILENAME_OFFSET]);
        u32::from_be_bytes(size)
    }
}

impl std::fmt::Debug for DirectoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryEntry")
            .field("filename", &self.filename())
            .field("thumbnail_size", &self.thumbnail_size())
            .finish_non_exhaustive()
    }
}
