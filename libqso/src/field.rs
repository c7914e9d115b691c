use crate::error::Error;

/// Fill byte for every padded or blank field
pub const FILL: u8 = b' ';

/// Encodes `value` into exactly `width` bytes, left-justified.
///
/// Shorter values are padded with [`FILL`], longer ones are truncated.
///
/// # Errors
///
/// Returns [`Error::NonAscii`] if `value` holds anything outside 7-bit ASCII,
/// since the log format has no way to carry multi-byte characters.
pub fn ascii_field(field: &'static str, value: &str, width: usize) -> Result<Vec<u8>, Error> {
    if !value.is_ascii() {
        return Err(Error::NonAscii {
            field,
            value: value.to_owned(),
        });
    }
    let mut out: Vec<u8> = value.bytes().take(width).collect();
    out.resize(width, FILL);
    Ok(out)
}

/// Appends the encoded field to `buf`
///
/// # Errors
///
/// See [`ascii_field`]
pub fn write_ascii_field(
    buf: &mut Vec<u8>,
    field: &'static str,
    value: &str,
    width: usize,
) -> Result<(), Error> {
    buf.extend(ascii_field(field, value, width)?);
    Ok(())
}

/// Appends `width` fill bytes to `buf`
pub fn write_blank(buf: &mut Vec<u8>, width: usize) {
    buf.resize(buf.len() + width, FILL);
}
