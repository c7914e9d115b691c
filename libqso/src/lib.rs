//! # libqso
//!
//!
//! This library provides datatypes and i/o functionality for the picture log written by
//! Yaesu System Fusion radios and gateways (`QSOLOG/QSOPCTDIR.DAT`, `QSOLOG/QSOPCTFAT.DAT` and
//! `QSOLOG/QSOMNG.DAT`), so that photographs taken with an ordinary camera can be copied onto a
//! radio's memory card as if they had been received over the air.
//!
//! The library only deals with the log files. Decoding, shrinking and annotating the photos is left to an
//! implementation of [`PhotoProcessor`] (the `ysfpic` binary provides one built on the `image` crate).
//!
//! ### Format
//!
//! There is no public description of these files. The layout implemented here is the one the radios accept:
//!
//! - `QSOPCTDIR.DAT` holds one 128 byte [`DirectoryEntry`] per photo. Text fields are fixed-width,
//!   space padded 7-bit ASCII; dates are six bytes of two-digit packed decimal ([`bcd`]);
//!   the thumbnail size is a big-endian `u32`.
//! - `QSOPCTFAT.DAT` holds one 4 byte slot per photo: `0x40` and a 24-bit big-endian offset into the
//!   directory file ([`fat_slot`]).
//! - `QSOMNG.DAT` holds the message, photo and group counts ([`ManagementHeader`]).
//!
//! ### Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use libqso::{BatchContext, DirectoryEntry, PhotoRecord, picture_filename};
//!
//! fn main() -> Result<(), libqso::Error> {
//!     let ctx = BatchContext::builder()
//!         .callsign("G4TJC")
//!         .radio_id("E0Spx")
//!         .output_dir("out")
//!         .build();
//!     let record = PhotoRecord::builder()
//!         .source("photos/stile.jpg")
//!         .thumbnail_size(12_345)
//!         .sequence(1)
//!         .filename(picture_filename(&ctx.radio_id, 1))
//!         .build();
//!     let now = NaiveDate::from_ymd_opt(2024, 5, 4)
//!         .and_then(|d| d.and_hms_opt(13, 37, 0))
//!         .expect("valid date");
//!     let entry = DirectoryEntry::build(&record, &ctx, now)?;
//!     assert_eq!(entry.filename(), "HE0Spx000001.jpg");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod batch;
mod context;
mod date;
mod dir;
mod dump;
mod error;
mod fat;
mod field;
mod gps;
mod mng;
mod record;

pub use batch::{
    list_photos, Batch, BatchState, BatchSummary, Clock, FixedClock, PhotoMetadata,
    PhotoProcessor, SystemClock,
};
pub use context::{
    BatchContext, Overlay, OverlayColour, DIRECTORY_FILE, FAT_FILE, LOG_DIR, MANAGEMENT_FILE,
    PHOTO_DIR,
};
pub use date::{bcd, encode_date, write_date, DATE_LEN};
pub use dir::DirectoryFile;
pub use dump::hexdump;
pub use error::Error;
pub use fat::{fat_bytes, fat_slot, write_fat, FAT_SLOT_LEN, FAT_SLOT_STRIDE, FAT_STATUS};
pub use field::{ascii_field, write_ascii_field, write_blank, FILL};
pub use gps::{encode_gps, GpsTags, GPS_FIELD_LEN};
pub use mng::{ManagementHeader, MANAGEMENT_LEN};
pub use record::{
    picture_filename, DirectoryEntry, PhotoRecord, CALLSIGN_LEN, DESCRIPTION_LEN,
    DIRECTORY_ENTRY_LEN, FILENAME_LEN, MAX_SEQUENCE, RADIO_ID_LEN,
};
