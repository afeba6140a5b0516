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
use crate::built_coefficients::get_built_forward_transform;
use crate::chroma_resample::{downsample_row, upsample_row, ChromaDecimation};
use crate::kernels::RowKernels;
use crate::ycbcr_matrix::{correct_601_to_709_in_place, InverseMatrix};
use crate::yuv_support::ColorSpace;

pub(crate) const BLACK_LUMA: u16 = 16 << 8;
pub(crate) const NEUTRAL_CHROMA: u16 = 1 << 15;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Channel arrangement of a working row
pub(crate) enum RowLayout {
    /// Y at full width, Cb and Cr at half width
    Yuv422,
    Yuv444,
    Rgb,
}

impl RowLayout {
    #[inline]
    pub(crate) const fn is_yuv(self) -> bool {
        matches!(self, RowLayout::Yuv422 | RowLayout::Yuv444)
    }
}

/// One image row at working precision.
///
/// `c0`, `c1`, `c2` hold Y, Cb, Cr or R, G, B depending on the layout.
/// Alpha is always full width and opaque unless a loader provided it.
#[derive(Debug, Clone)]
pub(crate) struct WorkRow {
    pub(crate) layout: RowLayout,
    pub(crate) width: usize,
    /// Pixels that carry image content, the rest of the row is padding
    pub(crate) content_width: usize,
    pub(crate) c0: Vec<u16>,
    pub(crate) c1: Vec<u16>,
    pub(crate) c2: Vec<u16>,
    pub(crate) alpha: Vec<u16>,
    spare: [Vec<u16>; 3],
}

impl WorkRow {
    pub(crate) fn new(layout: RowLayout, width: usize) -> WorkRow {
        let mut row = WorkRow {
            layout,
            width: 0,
            content_width: 0,
            c0: Vec::new(),
            c1: Vec::new(),
            c2: Vec::new(),
            alpha: Vec::new(),
            spare: [Vec::new(), Vec::new(), Vec::new()],
        };
        row.reset(layout, width);
        row
    }

    #[inline]
    fn chroma_width_of(layout: RowLayout, width: usize) -> usize {
        match layout {
            RowLayout::Yuv422 => width.div_ceil(2),
            RowLayout::Yuv444 | RowLayout::Rgb => width,
        }
    }

    #[inline]
    pub(crate) fn chroma_width(&self) -> usize {
        Self::chroma_width_of(self.layout, self.width)
    }

    /// Resizes every channel for `layout`, contents are unspecified except
    /// alpha which becomes opaque
    pub(crate) fn reset(&mut self, layout: RowLayout, width: usize) {
        let chroma_width = Self::chroma_width_of(layout, width);
        self.layout = layout;
        self.width = width;
        self.content_width = width;
        self.c0.resize(width, 0);
        self.c1.resize(chroma_width, 0);
        self.c2.resize(chroma_width, 0);
        self.alpha.clear();
        self.alpha.resize(width, u16::MAX);
    }

    fn take_spares(&mut self, len: usize) -> [Vec<u16>; 3] {
        let mut spares = std::mem::take(&mut self.spare);
        for spare in spares.iter_mut() {
            spare.resize(len, 0);
        }
        spares
    }

    fn upsample_chroma(&mut self) {
        let [mut u, mut v, spare] = self.take_spares(self.width);
        upsample_row(&self.c1, &mut u);
        upsample_row(&self.c2, &mut v);
        let old_u = std::mem::replace(&mut self.c1, u);
        let old_v = std::mem::replace(&mut self.c2, v);
        self.spare = [old_u, old_v, spare];
        self.layout = RowLayout::Yuv444;
    }

    fn downsample_chroma(&mut self) {
        let chroma_width = self.width.div_ceil(2);
        let [mut u, mut v, spare] = self.take_spares(chroma_width);
        downsample_row(&self.c1, &mut u, ChromaDecimation::Average);
        downsample_row(&self.c2, &mut v, ChromaDecimation::Average);
        let old_u = std::mem::replace(&mut self.c1, u);
        let old_v = std::mem::replace(&mut self.c2, v);
        self.spare = [old_u, old_v, spare];
        self.layout = RowLayout::Yuv422;
    }

    fn swap_planes(&mut self, planes: [Vec<u16>; 3]) {
        let [c0, c1, c2] = planes;
        let old = [
            std::mem::replace(&mut self.c0, c0),
            std::mem::replace(&mut self.c1, c1),
            std::mem::replace(&mut self.c2, c2),
        ];
        self.spare = old;
    }

    fn yuv444_to_rgb(&mut self, color_space: ColorSpace, kernels: &dyn RowKernels) {
        let matrix = InverseMatrix::new(color_space);
        let [mut r, mut g, mut b] = self.take_spares(self.width);
        kernels.ycbcr_to_rgb(&self.c0, &self.c1, &self.c2, &mut r, &mut g, &mut b, &matrix);
        self.swap_planes([r, g, b]);
        self.layout = RowLayout::Rgb;
    }

    fn rgb_to_yuv444(&mut self, color_space: ColorSpace, kernels: &dyn RowKernels) {
        let transform = get_built_forward_transform(color_space);
        let [mut y, mut u, mut v] = self.take_spares(self.width);
        kernels.rgb_to_ycbcr(&self.c0, &self.c1, &self.c2, &mut y, &mut u, &mut v, transform);
        self.swap_planes([y, u, v]);
        self.layout = RowLayout::Yuv444;
    }

    /// Changes the layout in place, resampling chroma and applying the matrix
    /// as needed
    pub(crate) fn convert_to(
        &mut self,
        target: RowLayout,
        color_space: ColorSpace,
        kernels: &dyn RowKernels,
    ) {
        if self.layout == target {
            return;
        }
        if self.layout == RowLayout::Yuv422 {
            self.upsample_chroma();
        }
        match (self.layout, target) {
            (RowLayout::Yuv444, RowLayout::Rgb) => self.yuv444_to_rgb(color_space, kernels),
            (RowLayout::Rgb, RowLayout::Yuv444 | RowLayout::Yuv422) => {
                self.rgb_to_yuv444(color_space, kernels)
            }
            _ => {}
        }
        if target == RowLayout::Yuv422 && self.layout == RowLayout::Yuv444 {
            self.downsample_chroma();
        }
    }

    /// Extends the row to `width` with black, never shrinks it
    pub(crate) fn pad_to(&mut self, width: usize) {
        if width <= self.width {
            return;
        }
        let chroma_width = Self::chroma_width_of(self.layout, width);
        let (luma, chroma) = match self.layout {
            RowLayout::Yuv422 | RowLayout::Yuv444 => (BLACK_LUMA, NEUTRAL_CHROMA),
            RowLayout::Rgb => (0, 0),
        };
        self.c0.resize(width, luma);
        self.c1.resize(chroma_width, chroma);
        self.c2.resize(chroma_width, chroma);
        self.alpha.resize(width, 0);
        self.width = width;
    }

    /// Keeps `width` pixels starting at `x`; `x` is even for 4:2:2 rows
    pub(crate) fn crop(&mut self, x: usize, width: usize) {
        let chroma_x = match self.layout {
            RowLayout::Yuv422 => x / 2,
            RowLayout::Yuv444 | RowLayout::Rgb => x,
        };
        let chroma_width = Self::chroma_width_of(self.layout, width);
        self.c0.copy_within(x..x + width, 0);
        self.c0.truncate(width);
        self.alpha.copy_within(x..x + width, 0);
        self.alpha.truncate(width);
        self.c1.copy_within(chroma_x..chroma_x + chroma_width, 0);
        self.c1.truncate(chroma_width);
        self.c2.copy_within(chroma_x..chroma_x + chroma_width, 0);
        self.c2.truncate(chroma_width);
        self.width = width;
        self.content_width = width;
    }

    /// Channel by index, 0 to 2 are the colour channels and 3 is alpha
    pub(crate) fn channel(&self, index: usize) -> &[u16] {
        match index {
            0 => &self.c0,
            1 => &self.c1,
            2 => &self.c2,
            _ => &self.alpha,
        }
    }

    pub(crate) fn channel_mut(&mut self, index: usize) -> &mut [u16] {
        match index {
            0 => &mut self.c0,
            1 => &mut self.c1,
            2 => &mut self.c2,
            _ => &mut self.alpha,
        }
    }

    /// Applies the BT.601 to BT.709 correction, RGB rows are left untouched
    pub(crate) fn correct_601_to_709(&mut self) {
        if self.layout.is_yuv() {
            correct_601_to_709_in_place(&mut self.c0, &mut self.c1, &mut self.c2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::scalar_kernels;
    use crate::yuv_support::{ColorRange, ColorStandard};

    fn cs() -> ColorSpace {
        ColorSpace::new(ColorStandard::Bt709, ColorRange::ComputerGraphics)
    }

    #[test]
    fn test_422_round_trip_through_444_is_identity_for_flat_chroma() {
        let mut row = WorkRow::new(RowLayout::Yuv422, 7);
        row.c0.copy_from_slice(&[100, 200, 300, 400, 500, 600, 700]);
        row.c1.copy_from_slice(&[1000, 1000, 1000, 1000]);
        row.c2.copy_from_slice(&[2000, 2000, 2000, 2000]);
        row.convert_to(RowLayout::Yuv444, cs(), scalar_kernels());
        assert_eq!(row.c1.len(), 7);
        row.convert_to(RowLayout::Yuv422, cs(), scalar_kernels());
        assert_eq!(row.c0, vec![100, 200, 300, 400, 500, 600, 700]);
        assert_eq!(row.c1, vec![1000; 4]);
        assert_eq!(row.c2, vec![2000; 4]);
    }

    #[test]
    fn test_black_yuv_converts_to_black_rgb() {
        let mut row = WorkRow::new(RowLayout::Yuv422, 4);
        row.c0.fill(BLACK_LUMA);
        row.c1.fill(NEUTRAL_CHROMA);
        row.c2.fill(NEUTRAL_CHROMA);
        row.convert_to(RowLayout::Rgb, cs(), scalar_kernels());
        assert_eq!(row.layout, RowLayout::Rgb);
        assert!(row.c0.iter().chain(row.c1.iter()).chain(row.c2.iter()).all(|&v| v < 256));
        row.convert_to(RowLayout::Yuv422, cs(), scalar_kernels());
        assert_eq!(row.c1.len(), 2);
        assert!(row.c0.iter().all(|&v| v.abs_diff(BLACK_LUMA) <= 256));
    }

    #[test]
    fn test_pad_writes_black() {
        let mut row = WorkRow::new(RowLayout::Yuv422, 2);
        row.pad_to(6);
        assert_eq!(&row.c0[2..], &[BLACK_LUMA; 4]);
        assert_eq!(&row.c1[1..], &[NEUTRAL_CHROMA; 2]);
        assert_eq!(&row.alpha[2..], &[0; 4]);
        assert_eq!((row.width, row.content_width), (6, 2));

        let mut row = WorkRow::new(RowLayout::Rgb, 1);
        row.pad_to(3);
        assert_eq!(&row.c2[1..], &[0, 0]);
    }

    #[test]
    fn test_crop_shifts_chroma_by_half() {
        let mut row = WorkRow::new(RowLayout::Yuv422, 8);
        for (i, v) in row.c0.iter_mut().enumerate() {
            *v = i as u16;
        }
        for (i, v) in row.c1.iter_mut().enumerate() {
            *v = 10 + i as u16;
        }
        row.crop(2, 4);
        assert_eq!(row.c0, vec![2, 3, 4, 5]);
        assert_eq!(row.c1, vec![11, 12]);
        assert_eq!(row.width, 4);
    }
}
