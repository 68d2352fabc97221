//! TGA parser: true-color and true-color-RLE images, normalized to a
//! top-left origin with RGBA-first channel order.
//!
//! Color-mapped and right-to-left images are rejected; both are fatal for
//! the file being converted, never for the batch.

use std::{
    fs,
    io::{Cursor, Read},
    path::Path,
};

use byteorder::{LittleEndian, ReadBytesExt};
use corelib::{CompileError, CompileResult};

use crate::texture::PixelBuffer;

/// Image types at or above this value store run-length encoded pixels.
const RLE_IMAGE_TYPE: u8 = 9;

/// Load a TGA image from a file path.
pub fn load_tga_from_path(path: impl AsRef<Path>) -> CompileResult<PixelBuffer> {
    let bytes = fs::read(path.as_ref())?;
    let buffer = load_tga_from_bytes(&bytes)?;
    log::debug!(
        "decoded {}x{} ({} bpp) from {}",
        buffer.width,
        buffer.height,
        buffer.bytes_per_pixel,
        path.as_ref().display()
    );
    Ok(buffer)
}

/// Decode a TGA image from raw file bytes.
pub fn load_tga_from_bytes(bytes: &[u8]) -> CompileResult<PixelBuffer> {
    let mut cursor = Cursor::new(bytes);
    let header = TgaHeader::read(&mut cursor)?;

    if header.color_map_type != 0 {
        return Err(CompileError::UnsupportedColorMap);
    }
    let bytes_per_pixel = header.bytes_per_pixel()?;

    // The image id field carries no pixel data.
    cursor.set_position(cursor.position() + u64::from(header.id_length));

    let pixel_count = usize::from(header.width) * usize::from(header.height);
    let mut data = if header.image_type >= RLE_IMAGE_TYPE {
        decode_rle(&mut cursor, pixel_count, bytes_per_pixel as usize)?
    } else {
        let mut data = vec![0u8; pixel_count * bytes_per_pixel as usize];
        cursor.read_exact(&mut data)?;
        data
    };

    swap_pixel_bytes(&mut data, bytes_per_pixel as usize);

    let mut buffer = PixelBuffer::new(
        u32::from(header.width),
        u32::from(header.height),
        bytes_per_pixel,
        data,
    );
    normalize_origin(&mut buffer, header.descriptor)?;
    Ok(buffer)
}

/// The fixed 18-byte TGA file header, little-endian.
#[derive(Debug, Clone, Copy)]
struct TgaHeader {
    id_length: u8,
    color_map_type: u8,
    image_type: u8,
    width: u16,
    height: u16,
    pixel_depth: u8,
    descriptor: u8,
}

impl TgaHeader {
    fn read(cursor: &mut Cursor<&[u8]>) -> CompileResult<Self> {
        let id_length = cursor.read_u8()?;
        let color_map_type = cursor.read_u8()?;
        let image_type = cursor.read_u8()?;
        let _color_map_first_entry = cursor.read_u16::<LittleEndian>()?;
        let _color_map_length = cursor.read_u16::<LittleEndian>()?;
        let _color_map_entry_size = cursor.read_u8()?;
        let _x_origin = cursor.read_u16::<LittleEndian>()?;
        let _y_origin = cursor.read_u16::<LittleEndian>()?;
        let width = cursor.read_u16::<LittleEndian>()?;
        let height = cursor.read_u16::<LittleEndian>()?;
        let pixel_depth = cursor.read_u8()?;
        let descriptor = cursor.read_u8()?;

        Ok(Self {
            id_length,
            color_map_type,
            image_type,
            width,
            height,
            pixel_depth,
            descriptor,
        })
    }

    fn bytes_per_pixel(&self) -> CompileResult<u32> {
        match self.pixel_depth {
            8 => Ok(1),
            16 => Ok(2),
            24 => Ok(3),
            32 => Ok(4),
            other => Err(CompileError::UnsupportedPixelDepth(
                u32::from(other).div_ceil(8),
            )),
        }
    }
}

/// Decode RLE packets until `pixel_count` pixels have been produced.
///
/// Bit 7 of the packet header selects a run packet (one pixel repeated
/// `(header & 0x7F) + 1` times) or a raw packet (that many literal pixels).
fn decode_rle(
    cursor: &mut Cursor<&[u8]>,
    pixel_count: usize,
    bytes_per_pixel: usize,
) -> CompileResult<Vec<u8>> {
    let total = pixel_count * bytes_per_pixel;
    let mut out = Vec::with_capacity(total);
    let mut run_pixel = [0u8; 4];

    while out.len() < total {
        let packet = cursor.read_u8()?;
        let count = usize::from(packet & 0x7F) + 1;

        if packet & 0x80 != 0 {
            let pixel = &mut run_pixel[..bytes_per_pixel];
            cursor.read_exact(pixel)?;
            for _ in 0..count {
                out.extend_from_slice(pixel);
            }
        } else {
            let start = out.len();
            out.resize(start + count * bytes_per_pixel, 0);
            cursor.read_exact(&mut out[start..])?;
        }
    }

    // A final run packet may overshoot the pixel count.
    out.truncate(total);
    Ok(out)
}

/// BGR(A) → RGB(A) for 3/4-byte pixels; 2-byte pixels swap their two bytes.
/// Single-channel pixels are left as stored.
fn swap_pixel_bytes(data: &mut [u8], bytes_per_pixel: usize) {
    match bytes_per_pixel {
        3 | 4 => {
            for pixel in data.chunks_exact_mut(bytes_per_pixel) {
                pixel.swap(0, 2);
            }
        }
        2 => {
            for pixel in data.chunks_exact_mut(2) {
                pixel.swap(0, 1);
            }
        }
        _ => {}
    }
}

/// Descriptor bits 4-5 encode the stored origin. Bottom-origin images get
/// their rows reversed so row 0 ends up at the top; right-to-left storage
/// is unsupported.
fn normalize_origin(buffer: &mut PixelBuffer, descriptor: u8) -> CompileResult<()> {
    let origin = descriptor >> 4;
    if origin & 0x1 != 0 {
        return Err(CompileError::UnsupportedMirroring);
    }

    if origin & 0x2 == 0 {
        let row_len = buffer.row_len();
        let height = buffer.height as usize;
        for row in 0..height / 2 {
            let top = row * row_len;
            let bottom = (height - 1 - row) * row_len;
            for offset in 0..row_len {
                buffer.data.swap(top + offset, bottom + offset);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP_LEFT: u8 = 0x20;

    fn tga_bytes(
        width: u16,
        height: u16,
        pixel_depth: u8,
        image_type: u8,
        descriptor: u8,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut bytes = vec![0u8; 18];
        bytes[2] = image_type;
        bytes[12..14].copy_from_slice(&width.to_le_bytes());
        bytes[14..16].copy_from_slice(&height.to_le_bytes());
        bytes[16] = pixel_depth;
        bytes[17] = descriptor;
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn uncompressed_pixels_are_channel_swapped() {
        // One BGRA pixel; decoded buffer must read RGBA.
        let bytes = tga_bytes(1, 1, 32, 2, TOP_LEFT, &[10, 20, 30, 40]);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        assert_eq!(buffer.data, vec![30, 20, 10, 40]);
        assert_eq!((buffer.width, buffer.height, buffer.bytes_per_pixel), (1, 1, 4));
    }

    #[test]
    fn two_byte_pixels_swap_their_bytes() {
        let bytes = tga_bytes(2, 1, 16, 2, TOP_LEFT, &[1, 2, 3, 4]);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        assert_eq!(buffer.data, vec![2, 1, 4, 3]);
    }

    #[test]
    fn bottom_origin_rows_are_reversed() {
        // 1x2, 24-bit, descriptor 0 = bottom-left origin. Source rows
        // bottom-to-top; decoded row 0 must equal the source's last row.
        let payload = [1, 1, 1, 2, 2, 2];
        let bytes = tga_bytes(1, 2, 24, 2, 0x00, &payload);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        assert_eq!(buffer.data, vec![2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn top_origin_rows_are_unchanged() {
        let payload = [1, 1, 1, 2, 2, 2];
        let bytes = tga_bytes(1, 2, 24, 2, TOP_LEFT, &payload);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        assert_eq!(buffer.data, vec![1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn rle_mixed_packets_roundtrip() {
        // 4x1 grayscale: run of 3 times 7, then one literal 9.
        let payload = [0x82, 7, 0x00, 9];
        let bytes = tga_bytes(4, 1, 8, 10, TOP_LEFT, &payload);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        assert_eq!(buffer.data, vec![7, 7, 7, 9]);
    }

    #[test]
    fn rle_multibyte_pixels_roundtrip() {
        // 3x1 BGR: raw packet with two pixels, then a run of one.
        let payload = [0x01, 1, 2, 3, 4, 5, 6, 0x80, 7, 8, 9];
        let bytes = tga_bytes(3, 1, 24, 10, TOP_LEFT, &payload);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        // Channel swap applies after decompression.
        assert_eq!(buffer.data, vec![3, 2, 1, 6, 5, 4, 9, 8, 7]);
        assert_eq!(buffer.data.len(), 3 * 3);
    }

    #[test]
    fn image_id_field_is_skipped() {
        let mut bytes = tga_bytes(1, 1, 32, 2, TOP_LEFT, &[]);
        bytes[0] = 3; // id length
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        bytes.extend_from_slice(&[10, 20, 30, 40]);
        let buffer = load_tga_from_bytes(&bytes).expect("decode");
        assert_eq!(buffer.data, vec![30, 20, 10, 40]);
    }

    #[test]
    fn color_mapped_images_are_rejected() {
        let mut bytes = tga_bytes(1, 1, 32, 1, TOP_LEFT, &[0; 4]);
        bytes[1] = 1; // color-map type
        let err = load_tga_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedColorMap));
    }

    #[test]
    fn mirrored_images_are_rejected() {
        let bytes = tga_bytes(1, 1, 32, 2, 0x30, &[0; 4]);
        let err = load_tga_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedMirroring));
    }

    #[test]
    fn unknown_pixel_depth_is_rejected() {
        let bytes = tga_bytes(1, 1, 15, 2, TOP_LEFT, &[0; 2]);
        let err = load_tga_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedPixelDepth(2)));
    }

    #[test]
    fn truncated_payload_is_an_io_error() {
        let bytes = tga_bytes(2, 2, 32, 2, TOP_LEFT, &[0; 7]);
        let err = load_tga_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CompileError::Io(_)));
    }
}
