use bon::Builder;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::{
    error::Error,
    field::ascii_field,
    record::{CALLSIGN_LEN, RADIO_ID_LEN},
};

/// Sub-directory of the output directory holding the log files
pub const LOG_DIR: &str = "QSOLOG";
/// Sub-directory of the output directory holding the thumbnails
pub const PHOTO_DIR: &str = "PHOTO";
/// Directory file name
pub const DIRECTORY_FILE: &str = "QSOPCTDIR.DAT";
/// FAT file name
pub const FAT_FILE: &str = "QSOPCTFAT.DAT";
/// Management file name
pub const MANAGEMENT_FILE: &str = "QSOMNG.DAT";

/// Named colours accepted for overlay text
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Display, VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OverlayColour {
    /// `#ffffff`
    #[default]
    White,
    /// `#000000`
    Black,
    /// `#ff0000`
    Red,
    /// `#00ff00`
    Green,
    /// `#0000ff`
    Blue,
    /// `#ffff00`
    Yellow,
    /// `#00ffff`
    Cyan,
    /// `#ff00ff`
    Magenta,
    /// `#ffa500`
    Orange,
}

impl OverlayColour {
    /// The colour as an RGB triple
    #[must_use]
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::White => [0xff, 0xff, 0xff],
            Self::Black => [0x00, 0x00, 0x00],
            Self::Red => [0xff, 0x00, 0x00],
            Self::Green => [0x00, 0xff, 0x00],
            Self::Blue => [0x00, 0x00, 0xff],
            Self::Yellow => [0xff, 0xff, 0x00],
            Self::Cyan => [0x00, 0xff, 0xff],
            Self::Magenta => [0xff, 0x00, 0xff],
            Self::Orange => [0xff, 0xa5, 0x00],
        }
    }
}

/// Text drawn onto every thumbnail of a batch
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Overlay {
    /// The text to draw
    #[builder(into)]
    pub text: String,
    /// Text colour
    #[builder(default)]
    pub colour: OverlayColour,
}

/// Everything a batch needs to know that does not come from the photos themselves
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct BatchContext {
    /// Operator callsign, written to every directory entry
    #[builder(into)]
    pub callsign: String,
    /// Radio id, written to every directory entry and used in thumbnail names
    #[builder(into)]
    pub radio_id: String,
    /// Root of the output tree (`QSOLOG/` and `PHOTO/` live below it)
    #[builder(into)]
    pub output_dir: PathBuf,
    /// Optional text overlay
    pub overlay: Option<Overlay>,
    /// Continue an existing log instead of starting from scratch
    #[builder(default)]
    pub update: bool,
}

impl BatchContext {
    /// Checks the fields that go into every entry, so that a bad callsign fails
    /// before any photo is touched
    ///
    /// # Errors
    ///
    /// [`Error::NonAscii`] if the callsign or radio id cannot be encoded
    pub fn validate(&self) -> Result<(), Error> {
        ascii_field("callsign", &self.callsign, CALLSIGN_LEN)?;
        ascii_field("radio id", &self.radio_id, RADIO_ID_LEN)?;
        Ok(())
    }

    /// `<output>/QSOLOG`
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.output_dir.join(LOG_DIR)
    }

    /// `<output>/PHOTO`
    #[must_use]
    pub fn photo_dir(&self) -> PathBuf {
        self.output_dir.join(PHOTO_DIR)
    }

    /// Path of one of the log files, e.g. [`DIRECTORY_FILE`]
    #[must_use]
    pub fn log_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.log_dir().join(name)
    }
}
