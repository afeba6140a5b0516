/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::yuv_support::ChromaSampling;
use crate::PixelError;

/// External pixel layouts, the discriminant is the numeric tag carried in
/// stream metadata.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit 4:2:2, Y0 U Y1 V
    Yuyv = 0,
    /// 8-bit 4:2:2, U Y0 V Y1
    Uyvy = 1,
    /// 8-bit 4:2:2, Y0 V Y1 U
    Yvyu = 2,
    /// 10-bit 4:2:2, six pixels in four little endian words
    V210 = 3,
    /// 16-bit little endian 4:2:2, Y0 U Y1 V
    Yu64 = 4,
    /// 16-bit little endian 4:2:2, U Y0 V Y1
    Uyvy16 = 5,
    /// 10-bit CbYCrY split into a 2-bit section followed by an 8-bit section
    Avid2_8 = 6,
    /// CbYCrY as signed 2.14 fixed point
    Avid2_14 = 7,
    /// CbYCrY, 10-bit values in the top bits of 16-bit words
    Avid10_6 = 8,
    /// 8-bit 4:2:0, luma plane then interleaved UV plane
    Nv12 = 9,
    /// 8-bit 4:2:0, luma plane then V plane then U plane
    Yv12 = 10,
    /// 8-bit B G R
    Rgb24 = 11,
    /// 8-bit B G R and opaque alpha
    Rgb32 = 12,
    /// 8-bit B G R A
    Rgba32 = 13,
    /// 16-bit little endian R G B
    Rgb48 = 14,
    /// 16-bit little endian R G B A
    Rgba64 = 15,
    /// 16-bit little endian B G R A
    Bgra64 = 16,
    /// 16-bit big endian A R G B
    B64a = 17,
    /// 10-bit R G B in a little endian word, R in the low bits
    Rg30 = 18,
    /// 10-bit R G B with 2-bit alpha, R in the low bits
    Ab10 = 19,
    /// 10-bit R G B with 2-bit alpha, B in the low bits
    Ar10 = 20,
    /// 10-bit R G B in a big endian word, B in the low bits
    R210 = 21,
    /// 10-bit R G B in a big endian word, two padding bits at the bottom
    Dpx0 = 22,
    /// 16-bit R G B, channels grouped in blocks of eight pixels
    RgbPlanar8 = 23,
    /// 16-bit R G B A, channels grouped in blocks of eight pixels
    RgbaPlanar8 = 24,
    /// Signed 13-bit R G B, white at 8191
    Wp13 = 25,
    /// Signed 13-bit R G B A
    W13a = 26,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 27] = [
        PixelFormat::Yuyv,
        PixelFormat::Uyvy,
        PixelFormat::Yvyu,
        PixelFormat::V210,
        PixelFormat::Yu64,
        PixelFormat::Uyvy16,
        PixelFormat::Avid2_8,
        PixelFormat::Avid2_14,
        PixelFormat::Avid10_6,
        PixelFormat::Nv12,
        PixelFormat::Yv12,
        PixelFormat::Rgb24,
        PixelFormat::Rgb32,
        PixelFormat::Rgba32,
        PixelFormat::Rgb48,
        PixelFormat::Rgba64,
        PixelFormat::Bgra64,
        PixelFormat::B64a,
        PixelFormat::Rg30,
        PixelFormat::Ab10,
        PixelFormat::Ar10,
        PixelFormat::R210,
        PixelFormat::Dpx0,
        PixelFormat::RgbPlanar8,
        PixelFormat::RgbaPlanar8,
        PixelFormat::Wp13,
        PixelFormat::W13a,
    ];
}

impl TryFrom<u32> for PixelFormat {
    type Error = PixelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PixelFormat::ALL
            .get(value as usize)
            .copied()
            .ok_or(PixelError::UnknownPixelFormat(value))
    }
}

impl From<PixelFormat> for u32 {
    fn from(value: PixelFormat) -> Self {
        value as u32
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WordOrder {
    Little,
    Big,
    /// Packed 32-bit words stored with all four bytes reversed
    ByteSwapped32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    Yuv,
    Rgb,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormatAlpha {
    None,
    /// Alpha slot present but always written fully opaque
    Opaque,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PixelFormatDescriptor {
    pub channels: u32,
    pub bit_depth: u32,
    pub word_order: WordOrder,
    pub sampling: ChromaSampling,
    pub family: FormatFamily,
    pub alpha: FormatAlpha,
    /// Pixel count every region width and offset must be a multiple of
    pub period: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum PackedLayout {
    Interleaved,
    /// 2-bit section of `stride / 4` bytes per row, then an 8-bit section
    SplitLsbMsb,
    /// Luma section, then one interleaved or two separate chroma sections
    Planar420 { chroma_planes: usize },
}

/// One contiguous run of rows inside a packed buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct PackedSection {
    pub(crate) pitch: usize,
    pub(crate) rows: usize,
    /// Meaningful bytes at the start of each row
    pub(crate) row_bytes: usize,
}

impl PackedSection {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.pitch * self.rows
    }
}

impl PixelFormat {
    pub const fn descriptor(self) -> PixelFormatDescriptor {
        use PixelFormat::*;
        let (family, channels, bit_depth, alpha) = match self {
            Yuyv | Uyvy | Yvyu | Nv12 | Yv12 => (FormatFamily::Yuv, 3, 8, FormatAlpha::None),
            V210 | Avid2_8 | Avid10_6 => (FormatFamily::Yuv, 3, 10, FormatAlpha::None),
            Yu64 | Uyvy16 | Avid2_14 => (FormatFamily::Yuv, 3, 16, FormatAlpha::None),
            Rgb24 => (FormatFamily::Rgb, 3, 8, FormatAlpha::None),
            Rgb32 => (FormatFamily::Rgb, 4, 8, FormatAlpha::Opaque),
            Rgba32 => (FormatFamily::Rgb, 4, 8, FormatAlpha::Linear),
            Rgb48 | RgbPlanar8 => (FormatFamily::Rgb, 3, 16, FormatAlpha::None),
            Rgba64 | Bgra64 | B64a | RgbaPlanar8 => (FormatFamily::Rgb, 4, 16, FormatAlpha::Linear),
            Rg30 | R210 | Dpx0 => (FormatFamily::Rgb, 3, 10, FormatAlpha::None),
            Ab10 | Ar10 => (FormatFamily::Rgb, 4, 10, FormatAlpha::Linear),
            Wp13 => (FormatFamily::Rgb, 3, 13, FormatAlpha::None),
            W13a => (FormatFamily::Rgb, 4, 13, FormatAlpha::Linear),
        };
        let word_order = match self {
            B64a => WordOrder::Big,
            R210 | Dpx0 => WordOrder::ByteSwapped32,
            _ => WordOrder::Little,
        };
        let sampling = match self {
            Nv12 | Yv12 => ChromaSampling::Yuv420,
            _ => match family {
                FormatFamily::Yuv => ChromaSampling::Yuv422,
                FormatFamily::Rgb => ChromaSampling::Yuv444,
            },
        };
        let period = match self {
            V210 => 6,
            _ => match family {
                FormatFamily::Yuv => 2,
                FormatFamily::Rgb => 1,
            },
        };
        PixelFormatDescriptor {
            channels,
            bit_depth,
            word_order,
            sampling,
            family,
            alpha,
            period,
        }
    }

    /// Meaningful bytes of one row in the primary section.
    pub const fn row_bytes(self, width: usize) -> usize {
        use PixelFormat::*;
        match self {
            Yuyv | Uyvy | Yvyu | Avid2_8 => width * 2,
            V210 => width.div_ceil(6) * 16,
            Yu64 | Uyvy16 | Avid2_14 | Avid10_6 => width * 4,
            Nv12 | Yv12 => width,
            Rgb24 => width * 3,
            Rgb32 | Rgba32 | Rg30 | Ab10 | Ar10 | R210 | Dpx0 => width * 4,
            Rgb48 | Wp13 => width * 6,
            Rgba64 | Bgra64 | B64a | W13a => width * 8,
            RgbPlanar8 => width.div_ceil(8) * 8 * 3 * 2,
            RgbaPlanar8 => width.div_ceil(8) * 8 * 4 * 2,
        }
    }

    pub(crate) const fn packed_layout(self) -> PackedLayout {
        match self {
            PixelFormat::Avid2_8 => PackedLayout::SplitLsbMsb,
            PixelFormat::Nv12 => PackedLayout::Planar420 { chroma_planes: 1 },
            PixelFormat::Yv12 => PackedLayout::Planar420 { chroma_planes: 2 },
            _ => PackedLayout::Interleaved,
        }
    }

    /// Sections of a buffer holding `height` rows, in memory order
    pub(crate) fn sections(self, width: usize, stride: usize, height: usize) -> Vec<PackedSection> {
        let primary = PackedSection {
            pitch: stride,
            rows: height,
            row_bytes: self.row_bytes(width),
        };
        match self.packed_layout() {
            PackedLayout::Interleaved => vec![primary],
            PackedLayout::SplitLsbMsb => vec![
                PackedSection {
                    pitch: stride / 4,
                    rows: height,
                    row_bytes: (width * 2).div_ceil(4),
                },
                primary,
            ],
            PackedLayout::Planar420 { chroma_planes } => {
                let chroma_rows = height.div_ceil(2);
                let mut sections = vec![primary];
                if chroma_planes == 1 {
                    sections.push(PackedSection {
                        pitch: stride,
                        rows: chroma_rows,
                        row_bytes: width.div_ceil(2) * 2,
                    });
                } else {
                    for _ in 0..chroma_planes {
                        sections.push(PackedSection {
                            pitch: stride / 2,
                            rows: chroma_rows,
                            row_bytes: width.div_ceil(2),
                        });
                    }
                }
                sections
            }
        }
    }

    /// Smallest stride that holds one row of `width` pixels
    pub fn min_stride(self, width: usize) -> usize {
        match self.packed_layout() {
            PackedLayout::SplitLsbMsb => self.row_bytes(width).max(width.div_ceil(2) * 4),
            PackedLayout::Planar420 { chroma_planes: 2 } => width.div_ceil(2) * 2,
            _ => self.row_bytes(width),
        }
    }

    /// Total buffer length for `height` rows at `stride`
    pub fn buffer_len(self, width: usize, stride: usize, height: usize) -> usize {
        self.sections(width, stride, height)
            .iter()
            .map(|section| section.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for (tag, format) in PixelFormat::ALL.iter().enumerate() {
            assert_eq!(*format as u32, tag as u32);
            assert_eq!(PixelFormat::try_from(tag as u32), Ok(*format));
        }
        assert_eq!(
            PixelFormat::try_from(27),
            Err(PixelError::UnknownPixelFormat(27))
        );
        assert_eq!(
            PixelFormat::try_from(u32::MAX),
            Err(PixelError::UnknownPixelFormat(u32::MAX))
        );
    }

    #[test]
    fn test_periods() {
        assert_eq!(PixelFormat::V210.descriptor().period, 6);
        assert_eq!(PixelFormat::Yuyv.descriptor().period, 2);
        assert_eq!(PixelFormat::Nv12.descriptor().period, 2);
        assert_eq!(PixelFormat::Rgb24.descriptor().period, 1);
        assert_eq!(PixelFormat::Dpx0.descriptor().period, 1);
    }

    #[test]
    fn test_descriptor_channels_match_alpha() {
        for format in PixelFormat::ALL {
            let d = format.descriptor();
            match d.alpha {
                FormatAlpha::None => assert_eq!(d.channels, 3, "{:?}", format),
                FormatAlpha::Opaque | FormatAlpha::Linear => {
                    assert_eq!(d.channels, 4, "{:?}", format)
                }
            }
        }
        assert_eq!(PixelFormat::B64a.descriptor().word_order, WordOrder::Big);
        assert_eq!(
            PixelFormat::R210.descriptor().word_order,
            WordOrder::ByteSwapped32
        );
    }

    #[test]
    fn test_section_geometry() {
        assert_eq!(PixelFormat::V210.row_bytes(12), 32);
        assert_eq!(PixelFormat::Avid2_8.buffer_len(8, 16, 3), 4 * 3 + 16 * 3);
        assert_eq!(PixelFormat::Nv12.buffer_len(8, 8, 3), 8 * 3 + 8 * 2);
        assert_eq!(PixelFormat::Yv12.buffer_len(8, 8, 4), 8 * 4 + 2 * 4 * 2);
        assert_eq!(PixelFormat::RgbPlanar8.row_bytes(9), 96);
        for format in PixelFormat::ALL {
            let stride = format.min_stride(24);
            for section in format.sections(24, stride, 2) {
                assert!(section.pitch >= section.row_bytes, "{:?}", format);
            }
        }
    }
}
