//! DDS container writer.
//!
//! Emits the 4-byte magic, the legacy 124-byte header with its embedded
//! 32-byte pixel-format block, and the 20-byte DX10 extension, followed by
//! the raw payload. Computed fields (magic, sizes, dimensions, format and
//! dimension enums) are bit-exact at their standard offsets; fields this
//! writer does not compute (pitch, depth, caps2) stay zero.

use std::io::{self, Write};

use bitflags::bitflags;
use byteorder::{LittleEndian, WriteBytesExt};

/// `"DDS "`, stored little-endian at offset 0.
pub const DDS_MAGIC: u32 = 0x2053_4444;

/// File offset of the DX10 extension block.
pub const DX10_EXTENSION_OFFSET: usize = 128;

const HEADER_SIZE: u32 = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;
const FOUR_CC_DX10: [u8; 4] = *b"DX10";

/// DXGI format tags understood by the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum DxgiFormat {
    Rgba8Unorm = 28,
    Rgba8UnormSrgb = 29,
    Bc1Unorm = 71,
}

/// D3D resource dimension tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ResourceDimension {
    Texture1d = 2,
    Texture2d = 3,
    Texture3d = 4,
}

bitflags! {
    struct HeaderFlags: u32 {
        const CAPS = 0x1;
        const HEIGHT = 0x2;
        const WIDTH = 0x4;
        const PIXEL_FORMAT = 0x1000;
        const MIP_MAP_COUNT = 0x20000;
    }
}

bitflags! {
    struct PixelFormatFlags: u32 {
        const ALPHA_PIXELS = 0x2;
        const FOUR_CC = 0x4;
        const RGB = 0x40;
    }
}

bitflags! {
    struct CapsFlags: u32 {
        const COMPLEX = 0x8;
        const TEXTURE = 0x1000;
        const MIP_MAP = 0x400000;
    }
}

/// Everything needed to emit the fixed 148 bytes ahead of the payload.
#[derive(Clone, Copy, Debug)]
pub struct DdsHeader {
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
    pub format: DxgiFormat,
    pub dimension: ResourceDimension,
    pub mip_map_count: u32,
    pub compressed: bool,
}

impl DdsHeader {
    fn header_flags(&self) -> HeaderFlags {
        let mut flags = HeaderFlags::CAPS
            | HeaderFlags::HEIGHT
            | HeaderFlags::WIDTH
            | HeaderFlags::PIXEL_FORMAT;
        if self.mip_map_count > 0 {
            flags |= HeaderFlags::MIP_MAP_COUNT;
        }
        flags
    }

    fn pixel_format_flags(&self) -> PixelFormatFlags {
        let mut flags = if self.compressed {
            PixelFormatFlags::FOUR_CC
        } else {
            PixelFormatFlags::RGB
        };
        if self.bytes_per_pixel == 4 {
            flags |= PixelFormatFlags::ALPHA_PIXELS;
        }
        flags
    }

    fn caps_flags(&self) -> CapsFlags {
        let mut flags = CapsFlags::TEXTURE;
        if self.mip_map_count > 0 {
            flags |= CapsFlags::COMPLEX | CapsFlags::MIP_MAP;
        }
        flags
    }

    /// The legacy channel masks are informational only once the DX10
    /// extension names the real format; each is emitted only when the pixel
    /// is wide enough to carry the channel.
    fn channel_masks(&self) -> [u32; 4] {
        let masks = [0xff00_0000, 0x00ff_0000, 0x0000_ff00, 0x0000_00ff];
        let mut out = [0u32; 4];
        for (channel, mask) in masks.into_iter().enumerate() {
            if self.bytes_per_pixel > channel as u32 {
                out[channel] = mask;
            }
        }
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(DDS_MAGIC)?;

        writer.write_u32::<LittleEndian>(HEADER_SIZE)?;
        writer.write_u32::<LittleEndian>(self.header_flags().bits())?;
        writer.write_u32::<LittleEndian>(self.height)?;
        writer.write_u32::<LittleEndian>(self.width)?;
        writer.write_u32::<LittleEndian>(0)?; // pitch
        writer.write_u32::<LittleEndian>(0)?; // depth
        writer.write_u32::<LittleEndian>(self.mip_map_count)?;
        writer.write_all(&[0u8; 44])?; // reserved

        // Embedded pixel-format block, file offset 76.
        writer.write_u32::<LittleEndian>(PIXEL_FORMAT_SIZE)?;
        writer.write_u32::<LittleEndian>(self.pixel_format_flags().bits())?;
        writer.write_all(&FOUR_CC_DX10)?;
        writer.write_u32::<LittleEndian>(0)?; // RGB bit count
        for mask in self.channel_masks() {
            writer.write_u32::<LittleEndian>(mask)?;
        }

        writer.write_u32::<LittleEndian>(self.caps_flags().bits())?;
        writer.write_all(&[0u8; 16])?; // caps2..caps4, reserved

        // DX10 extension, file offset 128.
        writer.write_u32::<LittleEndian>(self.format as u32)?;
        writer.write_u32::<LittleEndian>(self.dimension as u32)?;
        writer.write_u32::<LittleEndian>(0)?; // misc flags (cubemap)
        writer.write_u32::<LittleEndian>(0)?; // array size
        writer.write_u32::<LittleEndian>(0)?; // misc flags 2

        Ok(())
    }
}

/// Emit a complete DDS artifact: header blocks followed by the payload.
pub fn write_dds<W: Write>(writer: &mut W, header: &DdsHeader, payload: &[u8]) -> io::Result<()> {
    header.write_to(writer)?;
    writer.write_all(payload)
}
