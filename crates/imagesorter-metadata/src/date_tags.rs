// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EXIF date/time tags — DateTime (0x0132), DateTimeOriginal (0x9003) and
// DateTimeDigitized (0x9004).
//
// Reading goes through `kamadak-exif`, which parses every container format we
// care about (JPEG, TIFF, PNG, WebP, HEIF). Writing goes through `little_exif`,
// which rewrites the EXIF segment and leaves the image data alone. On PNG the
// writer stores a `zTXt` raw profile the reader cannot see, so reads fall back
// to `little_exif` whenever no EXIF container is found.

use std::io::Cursor;
use std::path::Path;

use ::exif::{In, Tag, Value};
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use tracing::{debug, info, instrument};

use imagesorter_core::error::{Result, SorterError};
use imagesorter_core::types::ExifTimestamps;

/// Set all three EXIF date/time tags of the image at `path` to `value`.
///
/// The container is recognised from the file contents, not its name. Other
/// tags already present in the file are kept. A file without an EXIF segment
/// gets a fresh one; a file whose EXIF segment cannot be parsed is left
/// untouched and reported as an error. The string is stored verbatim; callers
/// are expected to pass the EXIF `YYYY:MM:DD HH:MM:SS` form.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_exif_date_time(path: &Path, value: &str) -> Result<()> {
    let mut bytes = std::fs::read(path).map_err(|e| SorterError::from_io(path, e))?;

    let format = FileExtension::auto_detect(&mut Cursor::new(&bytes)).ok_or_else(|| {
        SorterError::Exif(format!("unrecognised image format: {}", path.display()))
    })?;

    let mut metadata = existing_metadata(&bytes, format).map_err(|detail| {
        SorterError::Exif(format!(
            "existing EXIF data in {} is unreadable: {detail}",
            path.display()
        ))
    })?;

    metadata.set_tag(ExifTag::ModifyDate(value.to_owned()));
    metadata.set_tag(ExifTag::DateTimeOriginal(value.to_owned()));
    metadata.set_tag(ExifTag::CreateDate(value.to_owned()));

    metadata.write_to_vec(&mut bytes, format).map_err(|e| {
        SorterError::Exif(format!(
            "failed to save EXIF data to {}: {}",
            path.display(),
            e
        ))
    })?;
    std::fs::write(path, &bytes).map_err(|e| SorterError::from_io(path, e))?;

    info!(value, ?format, "EXIF date/time tags written");
    Ok(())
}

/// The metadata to extend: what the file already carries, or an empty block
/// when it has none. A present but broken EXIF segment is an error.
fn existing_metadata(
    bytes: &Vec<u8>,
    format: FileExtension,
) -> std::result::Result<Metadata, String> {
    if !matches!(
        format,
        FileExtension::JPEG
            | FileExtension::PNG { .. }
            | FileExtension::TIFF
            | FileExtension::WEBP
            | FileExtension::HEIF
    ) {
        return Ok(Metadata::new_from_vec(bytes, format).unwrap_or_else(|_| Metadata::new()));
    }

    match parse_container(bytes) {
        Ok(_) => Metadata::new_from_vec(bytes, format).map_err(|e| e.to_string()),
        // PNG text-chunk profiles are invisible to the reader but not to the writer.
        Err(::exif::Error::NotFound(_)) => match Metadata::new_from_vec(bytes, format) {
            Ok(metadata) => Ok(metadata),
            Err(e) => {
                debug!(error = %e, "no EXIF segment, starting from empty metadata");
                Ok(Metadata::new())
            }
        },
        Err(e) => Err(e.to_string()),
    }
}

/// Read the three EXIF date/time tags of the file at `path`.
///
/// Only a failure to open or read the file is an error. A file without EXIF
/// data, or in a format that carries no EXIF container, yields a record whose
/// fields are all `None`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_exif_timestamps(path: &Path) -> Result<ExifTimestamps> {
    let bytes = std::fs::read(path).map_err(|e| SorterError::from_io(path, e))?;

    let timestamps = match parse_container(&bytes) {
        Ok(exif) => ExifTimestamps {
            date_time: ascii_tag(&exif, Tag::DateTime),
            date_time_original: ascii_tag(&exif, Tag::DateTimeOriginal),
            date_time_digitized: ascii_tag(&exif, Tag::DateTimeDigitized),
        },
        Err(::exif::Error::Io(e)) => return Err(SorterError::from_io(path, e)),
        Err(::exif::Error::NotFound(container)) => {
            debug!(container, "no EXIF container, checking embedded text profile");
            text_profile_timestamps(&bytes)
        }
        Err(e) => {
            debug!(error = %e, "no EXIF data");
            ExifTimestamps::default()
        }
    };
    debug!(?timestamps, "EXIF date/time tags read");
    Ok(timestamps)
}

fn parse_container(bytes: &[u8]) -> std::result::Result<::exif::Exif, ::exif::Error> {
    ::exif::Reader::new().read_from_container(&mut Cursor::new(bytes))
}

/// First ASCII component of a primary-image tag; empty strings count as absent.
fn ascii_tag(exif: &::exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').to_owned())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Date tags stored where only the writer looks, such as the PNG `zTXt`
/// raw profile.
fn text_profile_timestamps(bytes: &Vec<u8>) -> ExifTimestamps {
    let Some(format) = FileExtension::auto_detect(&mut Cursor::new(bytes)) else {
        return ExifTimestamps::default();
    };
    match Metadata::new_from_vec(bytes, format) {
        Ok(metadata) => ExifTimestamps {
            date_time: string_tag(&metadata, &ExifTag::ModifyDate(String::new())),
            date_time_original: string_tag(&metadata, &ExifTag::DateTimeOriginal(String::new())),
            date_time_digitized: string_tag(&metadata, &ExifTag::CreateDate(String::new())),
        },
        Err(e) => {
            debug!(error = %e, "no embedded EXIF profile");
            ExifTimestamps::default()
        }
    }
}

fn string_tag(metadata: &Metadata, tag: &ExifTag) -> Option<String> {
    metadata
        .get_tag(tag)
        .find_map(|found| match found {
            ExifTag::ModifyDate(s) | ExifTag::DateTimeOriginal(s) | ExifTag::CreateDate(s) => {
                Some(s.trim_end_matches('\0').to_owned())
            }
            _ => None,
        })
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const STAMP: &str = "2021:06:15 10:30:00";

    /// Encode a small solid-colour JPEG with no EXIF segment.
    fn jpeg_fixture(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(16, 16, image::Rgb([200, 120, 40]))
            .save(&path)
            .expect("encode fixture");
        path
    }

    #[test]
    fn fresh_jpeg_has_no_date_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = jpeg_fixture(dir.path(), "photo.jpg");

        let ts = read_exif_timestamps(&path).expect("read");
        assert!(ts.is_empty());
    }

    #[test]
    fn write_then_read_returns_the_same_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = jpeg_fixture(dir.path(), "photo.jpg");

        write_exif_date_time(&path, STAMP).expect("write");
        assert_eq!(read_exif_timestamps(&path).unwrap(), ExifTimestamps::uniform(STAMP));
    }

    #[test]
    fn writing_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = jpeg_fixture(dir.path(), "photo.jpg");

        write_exif_date_time(&path, STAMP).unwrap();
        let once = read_exif_timestamps(&path).unwrap();
        write_exif_date_time(&path, STAMP).unwrap();
        let twice = read_exif_timestamps(&path).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice, ExifTimestamps::uniform(STAMP));
    }

    #[test]
    fn rewrite_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = jpeg_fixture(dir.path(), "photo.jpg");

        write_exif_date_time(&path, "1999:12:31 23:59:59").unwrap();
        write_exif_date_time(&path, STAMP).unwrap();
        assert_eq!(read_exif_timestamps(&path).unwrap(), ExifTimestamps::uniform(STAMP));
    }

    #[test]
    fn other_tags_survive_a_date_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = jpeg_fixture(dir.path(), "photo.jpg");

        let mut metadata = Metadata::new();
        metadata.set_tag(ExifTag::ImageDescription("beach".to_owned()));
        metadata.write_to_file(&path).unwrap();

        write_exif_date_time(&path, STAMP).unwrap();

        let exif = parse_container(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(ascii_tag(&exif, Tag::ImageDescription).as_deref(), Some("beach"));
    }

    #[test]
    fn png_dates_read_back_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenshot.png");
        image::RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]))
            .save(&path)
            .expect("encode fixture");

        assert!(read_exif_timestamps(&path).unwrap().is_empty());
        write_exif_date_time(&path, STAMP).expect("write");
        assert_eq!(read_exif_timestamps(&path).unwrap(), ExifTimestamps::uniform(STAMP));

        write_exif_date_time(&path, "2022:01:01 00:00:00").expect("rewrite");
        assert_eq!(
            read_exif_timestamps(&path).unwrap(),
            ExifTimestamps::uniform("2022:01:01 00:00:00")
        );
    }

    #[test]
    fn format_comes_from_contents_not_name() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = jpeg_fixture(dir.path(), "photo.jpg");
        let bare = dir.path().join("IMG_0002");
        std::fs::rename(&jpeg, &bare).unwrap();

        write_exif_date_time(&bare, STAMP).expect("write");
        assert_eq!(read_exif_timestamps(&bare).unwrap(), ExifTimestamps::uniform(STAMP));
    }

    #[test]
    fn broken_exif_segment_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = jpeg_fixture(dir.path(), "photo.jpg");

        // APP1 with the Exif header but no valid TIFF structure behind it.
        let original = std::fs::read(&path).unwrap();
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(b"garbage!garbage!");
        let len = u16::try_from(payload.len() + 2).unwrap().to_be_bytes();
        let mut corrupt = original[..2].to_vec();
        corrupt.extend_from_slice(&[0xFF, 0xE1, len[0], len[1]]);
        corrupt.extend_from_slice(&payload);
        corrupt.extend_from_slice(&original[2..]);
        std::fs::write(&path, &corrupt).unwrap();

        assert!(matches!(
            write_exif_date_time(&path, STAMP),
            Err(SorterError::Exif(_))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), corrupt);
    }

    #[test]
    fn missing_file_is_an_error_for_both_directions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.jpg");

        assert!(matches!(
            read_exif_timestamps(&path),
            Err(SorterError::FileNotFound(_))
        ));
        assert!(matches!(
            write_exif_date_time(&path, STAMP),
            Err(SorterError::FileNotFound(_))
        ));
    }

    #[test]
    fn non_image_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image at all").unwrap();

        assert!(read_exif_timestamps(&path).unwrap().is_empty());
    }

    #[test]
    fn non_image_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image at all").unwrap();

        assert!(write_exif_date_time(&path, STAMP).is_err());
    }
}
