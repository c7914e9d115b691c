use ab_glyph::FontVec;
use std::{fs, path::PathBuf};
use tracing::{debug, info, trace};

/// Fonts tried, in order, when no font is given on the command line
pub const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Somewhere a font might be loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A TrueType/OpenType file on disk
    File(PathBuf),
    /// Font data already in memory
    Bytes(Vec<u8>),
}

impl FontSource {
    fn load(&self) -> Option<FontVec> {
        let data = match self {
            Self::File(path) => match fs::read(path) {
                Ok(data) => data,
                Err(e) => {
                    trace!("Font {} not readable: {e}", path.display());
                    return None;
                }
            },
            Self::Bytes(data) => data.clone(),
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => Some(font),
            Err(e) => {
                debug!("Invalid font data: {e}");
                None
            }
        }
    }
}

/// The fallback chain: `preferred` first, then [`SYSTEM_FONTS`]
#[must_use]
pub fn font_chain(preferred: Option<PathBuf>) -> Vec<FontSource> {
    preferred
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
        .map(FontSource::File)
        .collect()
}

/// Loads the first font of `sources` that can be read and parsed
#[must_use]
pub fn load_first(sources: &[FontSource]) -> Option<FontVec> {
    sources.iter().find_map(|source| {
        let font = source.load()?;
        if let FontSource::File(path) = source {
            info!("Using font {}", path.display());
        }
        Some(font)
    })
}
