use chrono::{NaiveDate, NaiveDateTime};
use libqso::{
    picture_filename, BatchContext, DirectoryEntry, DirectoryFile, Error, GpsTags, PhotoRecord,
    DIRECTORY_ENTRY_LEN,
};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid test date")
}

fn context() -> BatchContext {
    BatchContext::builder()
        .callsign("G4TJC")
        .radio_id("E0Spx")
        .output_dir("out")
        .build()
}

fn record(seq: u32) -> PhotoRecord {
    PhotoRecord::builder()
        .source("/photos/StileExif.JPG")
        .taken(at(2019, 8, 17, 10, 4, 59))
        .gps(GpsTags::new(
            "N",
            [51.0, 30.0, 36.0],
            "W",
            [0.0, 7.0, 12.0],
        ))
        .thumbnail_size(0x0001_2345)
        .sequence(seq)
        .filename(picture_filename("E0Spx", seq))
        .build()
}

#[test]
fn entry_layout() -> anyhow::Result<()> {
    let now = at(2024, 5, 4, 0, 30, 0);
    let entry = DirectoryEntry::build(&record(1), &context(), now)?;
    let b = entry.as_bytes();
    assert_eq!(b.len(), DIRECTORY_ENTRY_LEN);

    assert_eq!(&b[0..4], &[0, 0, 0, 0]);
    assert_eq!(&b[4..9], b"     ");
    assert_eq!(&b[9..19], b"ALL       ");
    assert_eq!(&b[19..25], b"      ");
    assert_eq!(&b[25..30], b"E0Spx");
    assert_eq!(&b[30..46], b"G4TJC           ");
    // session start is an hour earlier, crossing midnight
    assert_eq!(&b[46..52], &[0x24, 0x05, 0x03, 0x23, 0x30, 0x00]);
    assert_eq!(&b[52..58], &[0x24, 0x05, 0x04, 0x00, 0x30, 0x00]);
    assert_eq!(&b[58..64], &[0x19, 0x08, 0x17, 0x10, 0x04, 0x59]);
    assert_eq!(&b[64..75], b"StileExif.J");
    assert_eq!(&b[75..80], b"     ");
    assert_eq!(&b[80..84], &[0x00, 0x01, 0x23, 0x45]);
    assert_eq!(&b[84..100], b"HE0Spx000001.jpg");
    assert_eq!(&b[100..120], b"N051303600W000071200");
    assert_eq!(&b[120..128], b"        ");

    assert_eq!(entry.filename(), "HE0Spx000001.jpg");
    assert_eq!(entry.sequence(), Some(1));
    assert_eq!(entry.thumbnail_size(), 0x0001_2345);
    Ok(())
}

#[test]
fn missing_metadata_uses_defaults() -> anyhow::Result<()> {
    let now = at(2024, 5, 4, 13, 37, 0);
    let record = PhotoRecord::builder()
        .source("short.jpg")
        .thumbnail_size(10)
        .sequence(1)
        .filename(picture_filename("E0Spx", 1))
        .build();
    let entry = DirectoryEntry::build(&record, &context(), now)?;
    let b = entry.as_bytes();
    assert_eq!(&b[58..64], &b[52..58]);
    assert_eq!(&b[64..75], b"short.jpg  ");
    assert_eq!(&b[100..120], &[b' '; 20]);
    Ok(())
}

#[test]
fn short_and_long_radio_ids_keep_the_layout() -> anyhow::Result<()> {
    let now = at(2024, 5, 4, 13, 37, 0);
    for radio_id in ["AB", "E0SpxTOOLONG"] {
        let ctx = BatchContext::builder()
            .callsign("G4TJC")
            .radio_id(radio_id)
            .output_dir("out")
            .build();
        let mut record = record(12);
        record.filename = picture_filename(radio_id, 12);
        let entry = DirectoryEntry::build(&record, &ctx, now)?;
        assert_eq!(entry.as_bytes().len(), DIRECTORY_ENTRY_LEN);
        assert_eq!(&entry.as_bytes()[30..35], b"G4TJC");
        assert_eq!(entry.sequence(), Some(12));
    }
    Ok(())
}

#[test]
fn building_twice_is_identical() -> anyhow::Result<()> {
    let now = at(2024, 5, 4, 13, 37, 0);
    let first = DirectoryEntry::build(&record(3), &context(), now)?;
    let second = DirectoryEntry::build(&record(3), &context(), now)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn non_ascii_callsign_is_fatal() {
    let ctx = BatchContext::builder()
        .callsign("G4TJČ")
        .radio_id("E0Spx")
        .output_dir("out")
        .build();
    let now = at(2024, 5, 4, 13, 37, 0);
    assert!(matches!(
        DirectoryEntry::build(&record(1), &ctx, now),
        Err(Error::NonAscii {
            field: "callsign",
            ..
        })
    ));
    assert!(ctx.validate().is_err());
}

#[test]
fn directory_file_reads_back() -> anyhow::Result<()> {
    let now = at(2024, 5, 4, 13, 37, 0);
    let mut dir = DirectoryFile::new();
    for seq in 1..=3 {
        dir.push(DirectoryEntry::build(&record(seq), &context(), now)?);
    }
    let bytes = dir.to_bytes();
    assert_eq!(bytes.len(), 3 * DIRECTORY_ENTRY_LEN);

    let read = DirectoryFile::from_reader(bytes.as_slice())?;
    assert_eq!(read, dir);
    assert_eq!(read.last_sequence(), Some(3));

    let truncated = DirectoryFile::from_reader(&bytes[..200]);
    assert!(matches!(
        truncated,
        Err(Error::MalformedDirectory { len: 200, .. })
    ));
    Ok(())
}
