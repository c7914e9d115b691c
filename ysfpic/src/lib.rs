use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{Exif, In, Tag, Value};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use libqso::{
    Batch, BatchContext, BatchSummary, GpsTags, Overlay, PhotoMetadata, PhotoProcessor,
};
use std::{
    fs::{self, File},
    io::BufReader,
    path::Path,
};
use tracing::{debug, instrument, warn};

pub mod fonts;

use fonts::{load_first, FontSource};

/// Thumbnails are shrunk to fit inside this box
pub const THUMBNAIL_WIDTH: u32 = 320;
/// See [`THUMBNAIL_WIDTH`]
pub const THUMBNAIL_HEIGHT: u32 = 240;

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const OVERLAY_MARGIN: i32 = 4;

/// [`PhotoProcessor`] built on the `image` crate
pub struct ImageProcessor {
    font: Option<FontVec>,
}

impl ImageProcessor {
    /// Creates a processor drawing overlays with the first loadable font of `fonts`
    #[must_use]
    pub fn new(fonts: &[FontSource]) -> Self {
        Self {
            font: load_first(fonts),
        }
    }

    /// Creates a processor that cannot draw overlays
    #[must_use]
    pub const fn without_font() -> Self {
        Self { font: None }
    }

    fn draw_overlay(&self, img: &mut RgbImage, overlay: &Overlay) {
        let Some(font) = self.font.as_ref() else {
            warn!("No usable font, skipping overlay {:?}", overlay.text);
            return;
        };
        #[allow(clippy::cast_precision_loss)]
        let scale = PxScale::from((img.height() as f32 / 10.0).max(12.0));
        let (_, text_height) = text_size(scale, font, &overlay.text);
        let y = i32::try_from(img.height())
            .unwrap_or(i32::MAX)
            .saturating_sub(i32::try_from(text_height).unwrap_or(i32::MAX))
            .saturating_sub(OVERLAY_MARGIN);
        debug!("Drawing overlay {:?} at y={y}", overlay.text);
        draw_text_mut(
            img,
            Rgb(overlay.colour.rgb()),
            OVERLAY_MARGIN,
            y.max(0),
            scale,
            font,
            &overlay.text,
        );
    }
}

/// Parses an EXIF `DateTimeOriginal` value
#[must_use]
pub fn parse_exif_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim_end_matches('\0').trim(), EXIF_DATE_FORMAT).ok()
}

fn ascii_tag(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => values
            .first()
            .map(|v| String::from_utf8_lossy(v).into_owned()),
        _ => None,
    }
}

fn dms_tag(exif: &Exif, tag: Tag) -> Option<[f64; 3]> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(v) if v.len() >= 3 => {
            Some([v[0].to_f64(), v[1].to_f64(), v[2].to_f64()])
        }
        _ => None,
    }
}

fn gps_tags(exif: &Exif) -> Option<GpsTags> {
    let tags = GpsTags {
        latitude_ref: ascii_tag(exif, Tag::GPSLatitudeRef),
        latitude: dms_tag(exif, Tag::GPSLatitude),
        longitude_ref: ascii_tag(exif, Tag::GPSLongitudeRef),
        longitude: dms_tag(exif, Tag::GPSLongitude),
    };
    (tags != GpsTags::default()).then_some(tags)
}

/// Capture time and GPS tags of a parsed EXIF block
///
/// Any GPS tag that is present gives [`Some`] GPS tags, even if others are missing.
#[must_use]
pub fn metadata_from_exif(exif: &Exif) -> PhotoMetadata {
    PhotoMetadata {
        taken: ascii_tag(exif, Tag::DateTimeOriginal).and_then(|s| parse_exif_date(&s)),
        gps: gps_tags(exif),
    }
}

fn read_exif(source: &Path) -> Result<Option<Exif>> {
    let file = File::open(source).with_context(|| format!("open {}", source.display()))?;
    match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => Ok(Some(exif)),
        Err(e) => {
            debug!("No EXIF data in {}: {e}", source.display());
            Ok(None)
        }
    }
}

impl PhotoProcessor for ImageProcessor {
    #[instrument(skip(self))]
    fn metadata(&self, source: &Path) -> Result<PhotoMetadata> {
        let Some(exif) = read_exif(source)? else {
            return Ok(PhotoMetadata::default());
        };
        let metadata = metadata_from_exif(&exif);
        if metadata.taken.is_none() {
            debug!("No capture time in {}", source.display());
        }
        Ok(metadata)
    }

    #[instrument(skip(self, overlay))]
    fn write_thumbnail(
        &self,
        source: &Path,
        dest: &Path,
        overlay: Option<&Overlay>,
    ) -> Result<u32> {
        let img = image::open(source).with_context(|| format!("decode {}", source.display()))?;
        debug!("Read {}x{} image", img.width(), img.height());

        let img = if img.width() > THUMBNAIL_WIDTH || img.height() > THUMBNAIL_HEIGHT {
            img.thumbnail(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT)
        } else {
            img
        };
        let mut rgb = img.to_rgb8();
        if let Some(overlay) = overlay {
            self.draw_overlay(&mut rgb, overlay);
        }

        rgb.save_with_format(dest, ImageFormat::Jpeg)
            .with_context(|| format!("write thumbnail {}", dest.display()))?;
        let len = fs::metadata(dest)?.len();
        u32::try_from(len).with_context(|| format!("thumbnail of {len} bytes is too large"))
    }
}

/// Copies the given photos into the picture log below [`BatchContext::output_dir`]
///
/// # Errors
///
/// Errors on anything that stops the whole batch, see [`libqso::Error`].
/// Photos that cannot be decoded are skipped and listed in the summary.
#[instrument(skip(ctx, fonts))]
pub fn copy_photos(
    ctx: &BatchContext,
    file: Option<&Path>,
    dir: Option<&Path>,
    fonts: &[FontSource],
) -> Result<BatchSummary> {
    let processor = if ctx.overlay.is_some() {
        ImageProcessor::new(fonts)
    } else {
        ImageProcessor::without_font()
    };
    let summary = Batch::new(ctx, processor)?.run(file, dir)?;
    Ok(summary)
}
