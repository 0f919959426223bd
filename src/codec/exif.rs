//! # EXIF 读取
//!
//! 从 NEF (TIFF 容器) 中读取 EXIF，并重写为只含主 IFD 描述字段的紧凑 TIFF 块，
//! 以便放入 JPEG 的 APP1 段。
//!
//! ## 依赖关系
//! - 被 `codec/converter.rs` 使用
//! - 使用 `kamadak-exif` crate

use crate::codec::{ExifError, ExifReader};

use exif::experimental::Writer;
use exif::{In, Reader, Value};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::debug;

/// 不复制到输出的标签：指针、条带/分块布局、原始图像描述、MakerNote
const SKIPPED_TAGS: &[u16] = &[
    0x0100, // ImageWidth
    0x0101, // ImageLength
    0x0102, // BitsPerSample
    0x0103, // Compression
    0x0106, // PhotometricInterpretation
    0x0111, // StripOffsets
    0x0115, // SamplesPerPixel
    0x0116, // RowsPerStrip
    0x0117, // StripByteCounts
    0x011C, // PlanarConfiguration
    0x0144, // TileOffsets
    0x0145, // TileByteCounts
    0x014A, // SubIFDs
    0x0201, // JPEGInterchangeFormat
    0x0202, // JPEGInterchangeFormatLength
    0x8769, // ExifIFDPointer
    0x8825, // GPSInfoIFDPointer
    0x927C, // MakerNote
    0xA005, // InteropIFDPointer
];

/// 基于 `kamadak-exif` 的 EXIF 读取器
#[derive(Debug, Default, Clone, Copy)]
pub struct KamadakExifReader;

impl ExifReader for KamadakExifReader {
    fn read_exif(&self, path: &Path) -> Result<Option<Vec<u8>>, ExifError> {
        let file = File::open(path).map_err(|e| ExifError(e.to_string()))?;
        let mut reader = BufReader::new(file);

        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(ExifError(e.to_string())),
        };

        let mut writer = Writer::new();
        let mut count = 0usize;
        for field in exif.fields() {
            if field.ifd_num != In::PRIMARY
                || SKIPPED_TAGS.contains(&field.tag.number())
                || matches!(field.value, Value::Unknown(..))
            {
                continue;
            }
            writer.push_field(field);
            count += 1;
        }

        if count == 0 {
            return Ok(None);
        }

        let mut buf = Cursor::new(Vec::new());
        writer
            .write(&mut buf, exif.little_endian())
            .map_err(|e| ExifError(e.to_string()))?;

        let blob = buf.into_inner();
        debug!(
            "Extracted {} EXIF fields ({} bytes) from {}",
            count,
            blob.len(),
            path.display()
        );
        Ok(Some(blob))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ImageJpegEncoder, JpegEncoder, PixelBuffer};
    use exif::{Field, Rational, Tag};

    /// 只含 EXIF 字段的 TIFF 文件
    fn write_tiff(path: &Path, fields: &[Field]) {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, true).unwrap();
        std::fs::write(path, buf.into_inner()).unwrap();
    }

    fn field(tag: Tag, value: Value) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        }
    }

    #[test]
    fn test_descriptive_fields_survive_jpeg_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DSC_0001.NEF");
        write_tiff(
            &path,
            &[
                field(Tag::ImageWidth, Value::Long(vec![8])),
                field(Tag::Make, Value::Ascii(vec![b"NIKON CORPORATION".to_vec()])),
                field(
                    Tag::ExposureTime,
                    Value::Rational(vec![Rational { num: 1, denom: 250 }]),
                ),
                field(
                    Tag::DateTimeOriginal,
                    Value::Ascii(vec![b"2024:01:02 03:04:05".to_vec()]),
                ),
            ],
        );

        let blob = KamadakExifReader.read_exif(&path).unwrap().unwrap();
        let pixels = PixelBuffer::new(8, 8, vec![128; 8 * 8 * 3]);
        let jpeg = ImageJpegEncoder.encode(&pixels, 90, Some(&blob)).unwrap();

        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(jpeg))
            .unwrap();

        let make = exif.get_field(Tag::Make, In::PRIMARY).unwrap();
        assert!(matches!(&make.value, Value::Ascii(v) if v[0] == b"NIKON CORPORATION"));

        let exposure = exif.get_field(Tag::ExposureTime, In::PRIMARY).unwrap();
        assert!(matches!(
            &exposure.value,
            Value::Rational(v) if v[0].num == 1 && v[0].denom == 250
        ));

        let taken = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY).unwrap();
        assert!(matches!(&taken.value, Value::Ascii(v) if v[0] == b"2024:01:02 03:04:05"));

        // 原始图像的布局字段不随 JPEG 输出
        assert!(exif.get_field(Tag::ImageWidth, In::PRIMARY).is_none());
    }

    #[test]
    fn test_layout_only_tiff_has_no_exif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.tif");
        write_tiff(
            &path,
            &[
                field(Tag::ImageWidth, Value::Long(vec![8])),
                field(Tag::ImageLength, Value::Long(vec![8])),
            ],
        );

        assert_eq!(KamadakExifReader.read_exif(&path).unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = KamadakExifReader.read_exif(&dir.path().join("missing.nef"));
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_file_is_not_exif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.nef");
        std::fs::write(&path, b"definitely not a tiff container").unwrap();

        // 非 TIFF 数据要么报错要么无 EXIF，但绝不返回数据块
        let result = KamadakExifReader.read_exif(&path);
        assert!(!matches!(result, Ok(Some(_))));
    }
}
