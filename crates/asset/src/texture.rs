//! CPU-side pixel data produced by the image parsers.

/// Decoded image in normalized form: top-left origin, RGBA-first channel
/// order, tightly packed rows.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, bytes_per_pixel: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * bytes_per_pixel) as usize,
            "pixel data size does not match dimensions"
        );
        Self {
            width,
            height,
            bytes_per_pixel,
            data,
        }
    }

    /// Length of one row in bytes.
    pub fn row_len(&self) -> usize {
        (self.width * self.bytes_per_pixel) as usize
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width * self.height * self.bytes_per_pixel) as usize
    }
}
