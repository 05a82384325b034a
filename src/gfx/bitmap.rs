use std::{
    io::{self, ErrorKind, Read, Seek, SeekFrom},
    str,
};

use crate::{math::Vector4, util};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BitmapFormat {
    BgraU8,
    RgbaU8,
}

impl Default for BitmapFormat {
    #[inline]
    fn default() -> BitmapFormat {
        BitmapFormat::BgraU8
    }
}

impl BitmapFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        4
    }
}

/// A single-level, 32-bit image stored top row first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Bitmap {
    format: BitmapFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGBA pixels. Fails when `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> io::Result<Bitmap> {
        Bitmap::from_raw(BitmapFormat::RgbaU8, width, height, data)
    }

    pub fn from_raw(format: BitmapFormat, width: u32, height: u32, data: Vec<u8>) -> io::Result<Bitmap> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if width == 0 || height == 0 || data.len() != expected {
            return util::io_err(
                ErrorKind::InvalidData,
                format!(
                    "A {}x{} bitmap needs {} bytes of pixel data, found {}",
                    width,
                    height,
                    expected,
                    data.len()
                ),
            );
        }
        Ok(Bitmap {
            format,
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn format(&self) -> BitmapFormat {
        self.format
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for a bitmap with no pixels, such as `Bitmap::default()`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reverse the row order in place.
    pub fn flip_rows(&mut self) {
        let stride = self.bytes_per_row();
        let rows = self.height as usize;
        for top in 0..rows / 2 {
            let bottom = rows - 1 - top;
            let (head, tail) = self.data.split_at_mut(bottom * stride);
            head[top * stride..(top + 1) * stride].swap_with_slice(&mut tail[..stride]);
        }
    }

    /// The pixel at column `x` and row `y` as normalized RGBA, whatever the storage order.
    pub fn texel(&self, x: u32, y: u32) -> Vector4 {
        let x = x.min(self.width.saturating_sub(1)) as usize;
        let y = y.min(self.height.saturating_sub(1)) as usize;
        let start = y * self.bytes_per_row() + x * self.format.bytes_per_pixel();
        let p = match self.data.get(start..start + 4) {
            Some(p) => p,
            None => return Vector4::new(0.0, 0.0, 0.0, 1.0),
        };
        let (r, g, b, a) = match self.format {
            BitmapFormat::BgraU8 => (p[2], p[1], p[0], p[3]),
            BitmapFormat::RgbaU8 => (p[0], p[1], p[2], p[3]),
        };
        Vector4::new(r as f32, g as f32, b as f32, a as f32) * (1.0 / 255.0)
    }

    /// The pixels converted to RGBA order.
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.format {
            BitmapFormat::RgbaU8 => self.data.clone(),
            BitmapFormat::BgraU8 => self
                .data
                .chunks_exact(4)
                .flat_map(|p| [p[2], p[1], p[0], p[3]].to_vec())
                .collect(),
        }
    }
}

bitflags::bitflags! {
    struct PixelFormatFlags: u32 {
        const ALPHA_PIXELS = 0x00000001;
        const ALPHA = 0x00000002;
        const FOUR_CHARACTER_CODE = 0x00000004;
        const RGB = 0x00000040;
        const YUV = 0x00000200;
        const LUMINANCE = 0x00020000;
    }
}

/// Reads uncompressed 32-bit DDS images.
#[derive(Debug, Default)]
pub struct BitmapReader {}

/// Largest width or height accepted from a DDS header.
pub const MAX_DIMENSION: u32 = 16384;

impl BitmapReader {
    pub fn read<R: Read + Seek>(&mut self, reader: &mut R) -> io::Result<Bitmap> {
        reader.seek(SeekFrom::Start(0x00))?;

        let expected_magic = u32::from_le_bytes([b'D', b'D', b'S', b' ']);
        let magic = util::read_u32(reader)?;
        if magic != expected_magic {
            return util::io_err(
                ErrorKind::InvalidData,
                format!(
                    "Expected a 'DDS ' ({:04X}) instead found {:04X}",
                    expected_magic, magic
                ),
            );
        }

        reader.seek(SeekFrom::Start(0x0C))?;
        let height = util::read_u32(reader)?;
        let width = util::read_u32(reader)?;

        reader.seek(SeekFrom::Start(0x50))?;
        let format_flags_bytes = util::read_u32(reader)?;
        let format_flags = PixelFormatFlags::from_bits(format_flags_bytes).ok_or_else(|| {
            util::invalid_data(format!(
                "Unsupported DDS pixel format ({:04X}). The file is probably malformed",
                format_flags_bytes
            ))
        })?;
        let four_character_code_bytes = util::read_u32(reader)?.to_le_bytes();
        let rgb_bit_count = util::read_u32(reader)?;

        if format_flags.contains(PixelFormatFlags::FOUR_CHARACTER_CODE) {
            return util::io_err(
                ErrorKind::InvalidData,
                format!(
                    "Compressed DDS images are not supported ({})",
                    str::from_utf8(&four_character_code_bytes).unwrap_or("????")
                ),
            );
        }
        if !format_flags.contains(PixelFormatFlags::RGB) || rgb_bit_count != 32 {
            return util::io_err(
                ErrorKind::InvalidData,
                format!(
                    "Only 32-bit RGB pixel formats are supported. Image pixels are {}-bit",
                    rgb_bit_count
                ),
            );
        }

        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return util::io_err(
                ErrorKind::InvalidData,
                format!(
                    "Image size {}x{} is outside 1x1 to {}x{}",
                    width, height, MAX_DIMENSION, MAX_DIMENSION
                ),
            );
        }

        reader.seek(SeekFrom::Start(0x80))?;
        let linear_size = width as usize * height as usize * 4;
        let mut data = vec![0u8; linear_size];
        reader.read_exact(&mut data).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Expected {} bytes of {}x{} pixel data: {}", linear_size, width, height, err),
            )
        })?;
        Bitmap::from_raw(BitmapFormat::BgraU8, width, height, data)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn dds(width: u32, height: u32, flags: u32, bits: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 0x80];
        bytes[0..4].copy_from_slice(b"DDS ");
        bytes[0x04..0x08].copy_from_slice(&124u32.to_le_bytes());
        bytes[0x0C..0x10].copy_from_slice(&height.to_le_bytes());
        bytes[0x10..0x14].copy_from_slice(&width.to_le_bytes());
        bytes[0x4C..0x50].copy_from_slice(&32u32.to_le_bytes());
        bytes[0x50..0x54].copy_from_slice(&flags.to_le_bytes());
        bytes[0x58..0x5C].copy_from_slice(&bits.to_le_bytes());
        bytes.extend_from_slice(pixels);
        bytes
    }

    #[test]
    fn reads_bgra_dds() {
        let pixels = [
            0x00, 0x00, 0xFF, 0xFF, // red
            0xFF, 0x00, 0x00, 0xFF, // blue
        ];
        let bytes = dds(1, 2, 0x41, 32, &pixels);
        let bitmap = BitmapReader::default().read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(BitmapFormat::BgraU8, bitmap.format());
        assert_eq!((1, 2), (bitmap.width(), bitmap.height()));
        assert_eq!(Vector4::new(1.0, 0.0, 0.0, 1.0), bitmap.texel(0, 0));
        assert_eq!(Vector4::new(0.0, 0.0, 1.0, 1.0), bitmap.texel(0, 1));
        assert_eq!(vec![0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0xFF], bitmap.to_rgba8());
    }

    #[test]
    fn rejects_bad_files() {
        let mut reader = BitmapReader::default();

        let mut bad_magic = dds(1, 1, 0x41, 32, &[0; 4]);
        bad_magic[0] = b'X';
        let err = reader.read(&mut Cursor::new(bad_magic)).unwrap_err();
        assert_eq!(ErrorKind::InvalidData, err.kind());

        let compressed = dds(4, 4, 0x04, 0, &[0; 8]);
        assert!(reader.read(&mut Cursor::new(compressed)).is_err());

        let rgb24 = dds(1, 1, 0x40, 24, &[0; 3]);
        assert!(reader.read(&mut Cursor::new(rgb24)).is_err());

        let truncated = dds(2, 2, 0x41, 32, &[0; 7]);
        assert!(reader.read(&mut Cursor::new(truncated)).is_err());
    }

    #[test]
    fn rejects_huge_and_empty_headers() {
        let mut reader = BitmapReader::default();

        // Far more pixel data than any machine could allocate.
        let huge = dds(u32::MAX / 2, u32::MAX / 2, 0x41, 32, &[0; 4]);
        let err = reader.read(&mut Cursor::new(huge)).unwrap_err();
        assert_eq!(ErrorKind::InvalidData, err.kind());

        let too_wide = dds(MAX_DIMENSION + 1, 1, 0x41, 32, &[0; 4]);
        assert!(reader.read(&mut Cursor::new(too_wide)).is_err());

        let empty = dds(0, 4, 0x41, 32, &[]);
        assert!(reader.read(&mut Cursor::new(empty)).is_err());
    }

    #[test]
    fn empty_bitmap_texel_is_black() {
        let bitmap = Bitmap::default();
        assert!(bitmap.is_empty());
        assert_eq!(Vector4::new(0.0, 0.0, 0.0, 1.0), bitmap.texel(0, 0));
    }

    #[test]
    fn flips_rows() {
        let mut bitmap = Bitmap::from_rgba8(
            1,
            3,
            vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3],
        )
        .unwrap();
        bitmap.flip_rows();
        assert_eq!(&[3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1], bitmap.data());
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 4]).is_err());
    }
}
