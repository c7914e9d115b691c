use chrono::{Datelike, Timelike};

/// Number of bytes an encoded date occupies
pub const DATE_LEN: usize = 6;

/// Packs a value into the two-digit decimal byte used by the log files.
///
/// The value is first reduced modulo 100, so out of range values wrap silently.
/// `bcd(59) == 0x59`
#[must_use]
pub const fn bcd(value: u32) -> u8 {
    let v = value % 100;
    // v < 100, so the result is at most 0x99
    #[allow(clippy::cast_possible_truncation)]
    let packed = ((v % 10) + 16 * (v / 10)) as u8;
    packed
}

/// Encodes a timestamp as `[year, month, day, hour, minute, second]`, each through [`bcd`]
///
/// Only the year within the century is kept.
#[must_use]
pub fn encode_date<T: Datelike + Timelike>(when: &T) -> [u8; DATE_LEN] {
    // negative years wrap like any other out of range value
    let year = when.year().rem_euclid(100).unsigned_abs();
    [
        bcd(year),
        bcd(when.month()),
        bcd(when.day()),
        bcd(when.hour()),
        bcd(when.minute()),
        bcd(when.second()),
    ]
}

/// Appends the encoded timestamp to `buf`
pub fn write_date<T: Datelike + Timelike>(buf: &mut Vec<u8>, when: &T) {
    buf.extend_from_slice(&encode_date(when));
}
