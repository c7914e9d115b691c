use std::fmt::Write;
use tracing::{debug, warn};

/// Width of the encoded GPS field
pub const GPS_FIELD_LEN: usize = 20;

/// GPS tags as read from a photo's EXIF block
///
/// Each tag is optional, a photo may carry any subset of them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpsTags {
    /// `GPSLatitudeRef`, usually `N` or `S`
    pub latitude_ref: Option<String>,
    /// `GPSLatitude` as (degrees, minutes, seconds)
    pub latitude: Option<[f64; 3]>,
    /// `GPSLongitudeRef`, usually `E` or `W`
    pub longitude_ref: Option<String>,
    /// `GPSLongitude` as (degrees, minutes, seconds)
    pub longitude: Option<[f64; 3]>,
}

impl GpsTags {
    /// Creates a fully populated tag set
    #[must_use]
    pub fn new(
        latitude_ref: impl Into<String>,
        latitude: [f64; 3],
        longitude_ref: impl Into<String>,
        longitude: [f64; 3],
    ) -> Self {
        Self {
            latitude_ref: Some(latitude_ref.into()),
            latitude: Some(latitude),
            longitude_ref: Some(longitude_ref.into()),
            longitude: Some(longitude),
        }
    }
}

/// Truncates toward zero, refusing anything that cannot be written in `max` digits
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn component(value: f64, max: u32) -> Option<u32> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let truncated = value.trunc();
    (truncated <= f64::from(max)).then_some(truncated as u32)
}

// hemisphere + DDD + MM + SSss
fn write_coordinate(buf: &mut String, reference: &str, dms: [f64; 3]) -> Option<()> {
    let hemisphere = reference.chars().next().filter(char::is_ascii_graphic)?;
    let degrees = component(dms[0], 999)?;
    let minutes = component(dms[1], 99)?;
    let hundredths = component(dms[2] * 100.0, 9999)?;
    write!(buf, "{hemisphere}{degrees:03}{minutes:02}{hundredths:04}").ok()
}

fn format_gps(tags: &GpsTags) -> Option<String> {
    let mut out = String::with_capacity(GPS_FIELD_LEN);
    write_coordinate(&mut out, tags.latitude_ref.as_deref()?, tags.latitude?)?;
    write_coordinate(&mut out, tags.longitude_ref.as_deref()?, tags.longitude?)?;
    debug_assert_eq!(out.len(), GPS_FIELD_LEN);
    Some(out)
}

/// Encodes the GPS field of a directory entry
///
/// The field is `N0513036000...` style: hemisphere, 3 digit degrees, 2 digit minutes
/// and 4 digit hundredths of seconds, for latitude then longitude.
///
/// Missing or unrepresentable tags give a field of spaces; this is never an error.
#[must_use]
pub fn encode_gps(tags: Option<&GpsTags>) -> [u8; GPS_FIELD_LEN] {
    let mut out = [b' '; GPS_FIELD_LEN];
    let Some(tags) = tags else {
        debug!("No GPS tags, writing blank GPS field");
        return out;
    };
    match format_gps(tags) {
        Some(s) => out.copy_from_slice(s.as_bytes()),
        None => warn!("Incomplete or invalid GPS tags, writing blank GPS field: {tags:?}"),
    }
    out
}
