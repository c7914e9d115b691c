use chrono::NaiveDate;
use exif::{experimental::Writer, Field, In, Rational, Tag, Value};
use image::{ImageFormat, Rgb, RgbImage};
use libqso::{
    encode_gps, BatchContext, GpsTags, PhotoProcessor, DIRECTORY_FILE, LOG_DIR, PHOTO_DIR,
};
use mktemp::Temp;
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};
use ysfpic::{copy_photos, metadata_from_exif, ImageProcessor};

fn ascii(tag: Tag, value: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![value.as_bytes().to_vec()]),
    }
}

fn dms(tag: Tag, [d, m, s]: [u32; 3]) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![
            Rational { num: d, denom: 1 },
            Rational { num: m, denom: 1 },
            Rational { num: s, denom: 1 },
        ]),
    }
}

/// N 51°30'36" / W 0°7'12", taken 2019-08-17 10:04:59
fn stile_fields() -> Vec<Field> {
    vec![
        ascii(Tag::DateTimeOriginal, "2019:08:17 10:04:59"),
        ascii(Tag::GPSLatitudeRef, "N"),
        dms(Tag::GPSLatitude, [51, 30, 36]),
        ascii(Tag::GPSLongitudeRef, "W"),
        dms(Tag::GPSLongitude, [0, 7, 12]),
    ]
}

fn tiff(fields: &[Field]) -> anyhow::Result<Vec<u8>> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false)?;
    Ok(buf.into_inner())
}

/// A JPEG with `tiff` stored in an APP1 segment right after the start of image marker
fn jpeg_with_exif(dir: &Path, name: &str, tiff: &[u8]) -> anyhow::Result<PathBuf> {
    let img = RgbImage::from_pixel(640, 480, Rgb([0x20, 0x60, 0xa0]));
    let mut jpeg = Cursor::new(Vec::new());
    img.write_to(&mut jpeg, ImageFormat::Jpeg)?;
    let jpeg = jpeg.into_inner();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let segment_len = u16::try_from(2 + 6 + tiff.len())?;
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);

    let path = dir.join(name);
    fs::write(&path, out)?;
    Ok(path)
}

fn stile_gps() -> GpsTags {
    GpsTags::new("N", [51.0, 30.0, 36.0], "W", [0.0, 7.0, 12.0])
}

#[test]
fn gps_and_capture_time_from_raw_exif() -> anyhow::Result<()> {
    let exif = exif::Reader::new().read_raw(tiff(&stile_fields())?)?;
    let metadata = metadata_from_exif(&exif);

    let taken = NaiveDate::from_ymd_opt(2019, 8, 17).and_then(|d| d.and_hms_opt(10, 4, 59));
    assert_eq!(metadata.taken, taken);
    assert_eq!(metadata.gps, Some(stile_gps()));
    assert_eq!(&encode_gps(metadata.gps.as_ref()), b"N051303600W000071200");
    Ok(())
}

#[test]
fn partial_gps_tags_are_kept_but_encode_blank() -> anyhow::Result<()> {
    let fields = [
        ascii(Tag::GPSLatitudeRef, "S"),
        dms(Tag::GPSLatitude, [33, 52, 4]),
    ];
    let exif = exif::Reader::new().read_raw(tiff(&fields)?)?;
    let metadata = metadata_from_exif(&exif);

    assert_eq!(metadata.taken, None);
    let gps = metadata.gps.expect("latitude tags were written");
    assert_eq!(gps.latitude_ref.as_deref(), Some("S"));
    assert_eq!(gps.latitude, Some([33.0, 52.0, 4.0]));
    assert_eq!(gps.longitude_ref, None);
    assert_eq!(gps.longitude, None);
    assert_eq!(encode_gps(Some(&gps)), [b' '; 20]);
    Ok(())
}

#[test]
fn exif_without_gps_has_no_gps_tags() -> anyhow::Result<()> {
    let fields = [ascii(Tag::DateTimeOriginal, "2021:01:02 03:04:05")];
    let exif = exif::Reader::new().read_raw(tiff(&fields)?)?;
    let metadata = metadata_from_exif(&exif);
    assert!(metadata.taken.is_some());
    assert_eq!(metadata.gps, None);
    Ok(())
}

#[test]
fn processor_reads_exif_from_jpeg() -> anyhow::Result<()> {
    let tmp = Temp::new_dir()?;
    let root: &Path = tmp.as_ref();
    let photo = jpeg_with_exif(root, "StileExif.JPG", &tiff(&stile_fields())?)?;

    let metadata = ImageProcessor::without_font().metadata(&photo)?;
    assert_eq!(metadata.gps, Some(stile_gps()));
    assert!(metadata.taken.is_some());
    Ok(())
}

#[test]
fn exif_reaches_the_directory_entry() -> anyhow::Result<()> {
    let tmp = Temp::new_dir()?;
    let root: &Path = tmp.as_ref();
    let photo = jpeg_with_exif(root, "StileExif.JPG", &tiff(&stile_fields())?)?;
    let out = root.join("card");
    fs::create_dir(&out)?;

    let ctx = BatchContext::builder()
        .callsign("G4TJC")
        .radio_id("E0Spx")
        .output_dir(&out)
        .build();
    let summary = copy_photos(&ctx, Some(photo.as_path()), None, &[])?;
    assert_eq!(summary.written, 1);
    assert!(out.join(PHOTO_DIR).join("HE0Spx000001.jpg").is_file());

    let dir = fs::read(out.join(LOG_DIR).join(DIRECTORY_FILE))?;
    assert_eq!(&dir[58..64], &[0x19, 0x08, 0x17, 0x10, 0x04, 0x59]);
    assert_eq!(&dir[64..75], b"StileExif.J");
    assert_eq!(&dir[100..120], b"N051303600W000071200");
    Ok(())
}
