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
use crate::avid_2_8::Avid28Codec;
use crate::bit_depth::RowNarrower;
use crate::images::{PackedRowMut, PackedRowRef};
use crate::pixel_format::PixelFormat;
use crate::rgb_ar30::Rgb10Codec;
use crate::rgb_packed::{RgbAlphaSlot, RgbPackedCodec, RgbWord};
use crate::rgb_planar8::RgbPlanar8Codec;
use crate::v210::V210Codec;
use crate::work_row::{RowLayout, WorkRow};
use crate::yuv_nv12::{Yuv420Chroma, Yuv420Codec};
use crate::yuv_support::{Rgb10Layout, Yuy2Description};
use crate::yuv_to_yuy2::{PackedYuv422Codec, Yuv422Encoding};

/// Moves rows between a packed layout and the working row.
///
/// Codecs hold no per-row state. `pack_row` writes `row.width` pixels, the
/// caller pads the row to the frame width first. `unpack_row` receives a row
/// already reset to [FormatCodec::layout] at the frame width.
pub(crate) trait FormatCodec: Sync {
    fn layout(&self) -> RowLayout;

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>);

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow);
}

impl PackedRowMut<'_> {
    #[inline]
    pub(crate) fn interleaved(&mut self) -> &mut [u8] {
        match self {
            PackedRowMut::Interleaved(row) => &mut row[..],
            _ => unreachable!("codec requires an interleaved row"),
        }
    }
}

impl<'a> PackedRowRef<'a> {
    #[inline]
    pub(crate) fn interleaved(&self) -> &'a [u8] {
        match *self {
            PackedRowRef::Interleaved(row) => row,
            _ => unreachable!("codec requires an interleaved row"),
        }
    }
}

static YUYV: PackedYuv422Codec = PackedYuv422Codec::new(Yuy2Description::YUYV, Yuv422Encoding::Bits8);
static UYVY: PackedYuv422Codec = PackedYuv422Codec::new(Yuy2Description::UYVY, Yuv422Encoding::Bits8);
static YVYU: PackedYuv422Codec = PackedYuv422Codec::new(Yuy2Description::YVYU, Yuv422Encoding::Bits8);
static YU64: PackedYuv422Codec = PackedYuv422Codec::new(Yuy2Description::YUYV, Yuv422Encoding::Bits16);
static UYVY16: PackedYuv422Codec =
    PackedYuv422Codec::new(Yuy2Description::UYVY, Yuv422Encoding::Bits16);
static AVID_2_14: PackedYuv422Codec =
    PackedYuv422Codec::new(Yuy2Description::UYVY, Yuv422Encoding::Signed2_14);
static AVID_10_6: PackedYuv422Codec =
    PackedYuv422Codec::new(Yuy2Description::UYVY, Yuv422Encoding::Bits10Msb);

static V210: V210Codec = V210Codec;
static AVID_2_8: Avid28Codec = Avid28Codec;

static NV12: Yuv420Codec = Yuv420Codec::new(Yuv420Chroma::Interleaved);
static YV12: Yuv420Codec = Yuv420Codec::new(Yuv420Chroma::PlanarVu);

static RGB24: RgbPackedCodec = RgbPackedCodec::new([2, 1, 0, 0], 3, RgbWord::U8, RgbAlphaSlot::None);
static RGB32: RgbPackedCodec = RgbPackedCodec::new([2, 1, 0, 3], 4, RgbWord::U8, RgbAlphaSlot::Opaque);
static RGBA32: RgbPackedCodec = RgbPackedCodec::new([2, 1, 0, 3], 4, RgbWord::U8, RgbAlphaSlot::Plane);
static RGB48: RgbPackedCodec =
    RgbPackedCodec::new([0, 1, 2, 0], 3, RgbWord::U16Le, RgbAlphaSlot::None);
static RGBA64: RgbPackedCodec =
    RgbPackedCodec::new([0, 1, 2, 3], 4, RgbWord::U16Le, RgbAlphaSlot::Plane);
static BGRA64: RgbPackedCodec =
    RgbPackedCodec::new([2, 1, 0, 3], 4, RgbWord::U16Le, RgbAlphaSlot::Plane);
static B64A: RgbPackedCodec =
    RgbPackedCodec::new([1, 2, 3, 0], 4, RgbWord::U16Be, RgbAlphaSlot::Plane);
static WP13: RgbPackedCodec =
    RgbPackedCodec::new([0, 1, 2, 0], 3, RgbWord::S13Le, RgbAlphaSlot::None);
static W13A: RgbPackedCodec =
    RgbPackedCodec::new([0, 1, 2, 3], 4, RgbWord::S13Le, RgbAlphaSlot::Plane);

static RG30: Rgb10Codec = Rgb10Codec::new(Rgb10Layout::Rg30);
static AB10: Rgb10Codec = Rgb10Codec::new(Rgb10Layout::Ab10);
static AR10: Rgb10Codec = Rgb10Codec::new(Rgb10Layout::Ar10);
static R210: Rgb10Codec = Rgb10Codec::new(Rgb10Layout::R210);
static DPX0: Rgb10Codec = Rgb10Codec::new(Rgb10Layout::Dpx0);

static RGB_PLANAR8: RgbPlanar8Codec = RgbPlanar8Codec::new(false);
static RGBA_PLANAR8: RgbPlanar8Codec = RgbPlanar8Codec::new(true);

/// Codec for `format`, total over [PixelFormat]
pub(crate) fn codec_for(format: PixelFormat) -> &'static dyn FormatCodec {
    match format {
        PixelFormat::Yuyv => &YUYV,
        PixelFormat::Uyvy => &UYVY,
        PixelFormat::Yvyu => &YVYU,
        PixelFormat::V210 => &V210,
        PixelFormat::Yu64 => &YU64,
        PixelFormat::Uyvy16 => &UYVY16,
        PixelFormat::Avid2_8 => &AVID_2_8,
        PixelFormat::Avid2_14 => &AVID_2_14,
        PixelFormat::Avid10_6 => &AVID_10_6,
        PixelFormat::Nv12 => &NV12,
        PixelFormat::Yv12 => &YV12,
        PixelFormat::Rgb24 => &RGB24,
        PixelFormat::Rgb32 => &RGB32,
        PixelFormat::Rgba32 => &RGBA32,
        PixelFormat::Rgb48 => &RGB48,
        PixelFormat::Rgba64 => &RGBA64,
        PixelFormat::Bgra64 => &BGRA64,
        PixelFormat::B64a => &B64A,
        PixelFormat::Rg30 => &RG30,
        PixelFormat::Ab10 => &AB10,
        PixelFormat::Ar10 => &AR10,
        PixelFormat::R210 => &R210,
        PixelFormat::Dpx0 => &DPX0,
        PixelFormat::RgbPlanar8 => &RGB_PLANAR8,
        PixelFormat::RgbaPlanar8 => &RGBA_PLANAR8,
        PixelFormat::Wp13 => &WP13,
        PixelFormat::W13a => &W13A,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_format::FormatFamily;

    #[test]
    fn test_codec_layout_matches_family() {
        for format in PixelFormat::ALL {
            let layout = codec_for(format).layout();
            match format.descriptor().family {
                FormatFamily::Yuv => assert_eq!(layout, RowLayout::Yuv422, "{:?}", format),
                FormatFamily::Rgb => assert_eq!(layout, RowLayout::Rgb, "{:?}", format),
            }
        }
    }
}
