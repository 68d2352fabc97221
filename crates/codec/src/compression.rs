//! Compression strategies for the texture compiler.
//!
//! `PassThrough` stores the decoded pixels verbatim. `BlockCompressed` walks
//! the image in 4×4-texel blocks and delegates the per-block bit-packing to
//! an injected encoder, so a BC1 packer can be plugged in without touching
//! the container or header logic.

use asset::texture::PixelBuffer;
use corelib::{CompileError, CompileResult};

use crate::dds::{DdsHeader, DxgiFormat, ResourceDimension};

/// Strategy interface: payload encoding plus the container header that
/// describes it.
pub trait Compression {
    fn compress(&self, image: &PixelBuffer) -> CompileResult<Vec<u8>>;
    fn header(&self, image: &PixelBuffer) -> CompileResult<DdsHeader>;
}

/// Uncompressed RGBA8 output, optionally tagged as sRGB.
#[derive(Clone, Copy, Debug)]
pub struct PassThrough {
    pub srgb: bool,
}

impl PassThrough {
    pub fn new(srgb: bool) -> Self {
        Self { srgb }
    }

    fn format(&self, image: &PixelBuffer) -> CompileResult<DxgiFormat> {
        match image.bytes_per_pixel {
            4 if self.srgb => Ok(DxgiFormat::Rgba8UnormSrgb),
            4 => Ok(DxgiFormat::Rgba8Unorm),
            other => Err(CompileError::UnsupportedPixelDepth(other)),
        }
    }
}

impl Compression for PassThrough {
    fn compress(&self, image: &PixelBuffer) -> CompileResult<Vec<u8>> {
        Ok(image.data.clone())
    }

    fn header(&self, image: &PixelBuffer) -> CompileResult<DdsHeader> {
        Ok(DdsHeader {
            width: image.width,
            height: image.height,
            bytes_per_pixel: image.bytes_per_pixel,
            format: self.format(image)?,
            dimension: ResourceDimension::Texture2d,
            mip_map_count: 0,
            compressed: false,
        })
    }
}

/// Texel blocks are 4×4 pixels.
pub const BLOCK_DIM: u32 = 4;

/// One tile handed to a [`BlockEncoder`]. Texels outside the image (partial
/// edge blocks) are zero; `width`/`height` give the covered extent.
#[derive(Clone, Copy, Debug)]
pub struct TexelBlock {
    pub texels: [[u8; 4]; 16],
    pub width: u32,
    pub height: u32,
}

/// Per-block bit-packing, kept injectable: the tiling walk is fixed, the
/// packing algorithm is not.
pub trait BlockEncoder {
    /// DXGI tag of the packed output.
    fn format(&self, srgb: bool) -> DxgiFormat;

    /// Pack one block into its compressed bytes.
    fn encode_block(&self, block: &TexelBlock) -> Vec<u8>;
}

/// Block-compressed output over an injected per-block encoder.
#[derive(Clone, Copy, Debug)]
pub struct BlockCompressed<E> {
    pub srgb: bool,
    pub encoder: E,
}

impl<E: BlockEncoder> BlockCompressed<E> {
    pub fn new(srgb: bool, encoder: E) -> Self {
        Self { srgb, encoder }
    }
}

impl<E: BlockEncoder> Compression for BlockCompressed<E> {
    fn compress(&self, image: &PixelBuffer) -> CompileResult<Vec<u8>> {
        if image.bytes_per_pixel != 4 {
            return Err(CompileError::UnsupportedPixelDepth(image.bytes_per_pixel));
        }

        let blocks_x = image.width.div_ceil(BLOCK_DIM);
        let blocks_y = image.height.div_ceil(BLOCK_DIM);

        let mut payload = Vec::new();
        for block_y in 0..blocks_y {
            for block_x in 0..blocks_x {
                let block = gather_block(image, block_x * BLOCK_DIM, block_y * BLOCK_DIM);
                payload.extend_from_slice(&self.encoder.encode_block(&block));
            }
        }
        Ok(payload)
    }

    fn header(&self, image: &PixelBuffer) -> CompileResult<DdsHeader> {
        if image.bytes_per_pixel != 4 {
            return Err(CompileError::UnsupportedPixelDepth(image.bytes_per_pixel));
        }
        Ok(DdsHeader {
            width: image.width,
            height: image.height,
            bytes_per_pixel: image.bytes_per_pixel,
            format: self.encoder.format(self.srgb),
            dimension: ResourceDimension::Texture2d,
            mip_map_count: 0,
            compressed: true,
        })
    }
}

fn gather_block(image: &PixelBuffer, x0: u32, y0: u32) -> TexelBlock {
    let mut texels = [[0u8; 4]; 16];
    let width = (image.width - x0).min(BLOCK_DIM);
    let height = (image.height - y0).min(BLOCK_DIM);

    for dy in 0..height {
        for dx in 0..width {
            let offset = (((y0 + dy) * image.width + (x0 + dx)) * 4) as usize;
            texels[(dy * BLOCK_DIM + dx) as usize]
                .copy_from_slice(&image.data[offset..offset + 4]);
        }
    }

    TexelBlock {
        texels,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        PixelBuffer::new(width, height, 4, data)
    }

    #[test]
    fn pass_through_payload_is_verbatim() {
        let image = gradient_image(2, 2);
        let strategy = PassThrough::new(true);
        assert_eq!(strategy.compress(&image).unwrap(), image.data);

        let header = strategy.header(&image).unwrap();
        assert_eq!(header.format, DxgiFormat::Rgba8UnormSrgb);
        assert_eq!(header.mip_map_count, 0);
        assert!(!header.compressed);
    }

    #[test]
    fn pass_through_linear_format() {
        let image = gradient_image(2, 2);
        let header = PassThrough::new(false).header(&image).unwrap();
        assert_eq!(header.format, DxgiFormat::Rgba8Unorm);
    }

    #[test]
    fn pass_through_rejects_narrow_pixels() {
        let image = PixelBuffer::new(2, 1, 3, vec![0; 6]);
        let err = PassThrough::new(true).header(&image).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedPixelDepth(3)));
    }

    /// Emits each block's covered extent so the tiling walk is observable.
    struct ExtentProbe;

    impl BlockEncoder for ExtentProbe {
        fn format(&self, srgb: bool) -> DxgiFormat {
            assert!(srgb);
            DxgiFormat::Bc1Unorm
        }

        fn encode_block(&self, block: &TexelBlock) -> Vec<u8> {
            vec![block.width as u8, block.height as u8]
        }
    }

    #[test]
    fn tiling_covers_partial_edge_blocks() {
        // 5x6 → 2x2 blocks; the right column is 1 wide, the bottom row 2 tall.
        let image = gradient_image(5, 6);
        let strategy = BlockCompressed::new(true, ExtentProbe);

        let payload = strategy.compress(&image).unwrap();
        assert_eq!(payload, vec![4, 4, 1, 4, 4, 2, 1, 2]);

        let header = strategy.header(&image).unwrap();
        assert_eq!(header.format, DxgiFormat::Bc1Unorm);
        assert!(header.compressed);
    }

    #[test]
    fn gathered_texels_match_the_source() {
        let image = gradient_image(5, 6);
        let block = gather_block(&image, 4, 4);
        assert_eq!((block.width, block.height), (1, 2));
        assert_eq!(block.texels[0], [4, 4, 0, 255]);
        assert_eq!(block.texels[4], [4, 5, 0, 255]);
        // Uncovered texels stay zero.
        assert_eq!(block.texels[1], [0, 0, 0, 0]);
        assert_eq!(block.texels[15], [0, 0, 0, 0]);
    }
}
