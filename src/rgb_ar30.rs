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
#![forbid(unsafe_code)]

use crate::bit_depth::{widen, RowNarrower};
use crate::codec_table::FormatCodec;
use crate::images::{PackedRowMut, PackedRowRef};
use crate::numerics::swap32;
use crate::work_row::{RowLayout, WorkRow};
use crate::yuv_support::Rgb10Layout;

const MASK_10: u32 = 0x3FF;
const ALPHA_SHIFT: u32 = 30;

/// 10-bit RGB in one 32-bit word per pixel
#[derive(Debug, Copy, Clone)]
pub(crate) struct Rgb10Codec {
    layout: Rgb10Layout,
}

impl Rgb10Codec {
    pub(crate) const fn new(layout: Rgb10Layout) -> Self {
        Rgb10Codec { layout }
    }
}

impl Rgb10Layout {
    #[inline]
    pub(crate) fn pack(&self, r: u16, g: u16, b: u16, a: u16) -> u32 {
        let (r_shift, g_shift, b_shift) = self.shifts();
        let mut word = ((r as u32 & MASK_10) << r_shift)
            | ((g as u32 & MASK_10) << g_shift)
            | ((b as u32 & MASK_10) << b_shift);
        if self.has_alpha() {
            word |= (a as u32 & 3) << ALPHA_SHIFT;
        }
        if self.is_byte_swapped() {
            swap32(word)
        } else {
            word
        }
    }

    /// Returns `(r, g, b, a)` as stored, alpha is zero for layouts without it
    #[inline]
    pub(crate) fn unpack(&self, word: u32) -> (u16, u16, u16, u16) {
        let word = if self.is_byte_swapped() {
            swap32(word)
        } else {
            word
        };
        let (r_shift, g_shift, b_shift) = self.shifts();
        let a = if self.has_alpha() {
            (word >> ALPHA_SHIFT) as u16
        } else {
            0
        };
        (
            ((word >> r_shift) & MASK_10) as u16,
            ((word >> g_shift) & MASK_10) as u16,
            ((word >> b_shift) & MASK_10) as u16,
            a,
        )
    }
}

impl FormatCodec for Rgb10Codec {
    fn layout(&self) -> RowLayout {
        RowLayout::Rgb
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>) {
        let dst = dst.interleaved();
        let r = narrower.narrowed(&row.c0, 10);
        let g = narrower.narrowed(&row.c1, 10);
        let b = narrower.narrowed(&row.c2, 10);
        let a = if self.layout.has_alpha() {
            narrower.narrowed(&row.alpha, 2)
        } else {
            narrower.take_row(row.width)
        };
        for ((((dst, &r), &g), &b), &a) in dst
            .chunks_exact_mut(4)
            .zip(r.iter())
            .zip(g.iter())
            .zip(b.iter())
            .zip(a.iter())
        {
            dst.copy_from_slice(&self.layout.pack(r, g, b, a).to_le_bytes());
        }
        narrower.recycle([r, g, b, a]);
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let src = src.interleaved();
        let with_alpha = self.layout.has_alpha();
        for (x, src) in src.chunks_exact(4).take(row.width).enumerate() {
            let (r, g, b, a) = self
                .layout
                .unpack(u32::from_le_bytes([src[0], src[1], src[2], src[3]]));
            row.c0[x] = widen(r, 10);
            row.c1[x] = widen(g, 10);
            row.c2[x] = widen(b, 10);
            if with_alpha {
                row.alpha[x] = widen(a, 2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::NoDither;
    use crate::kernels::scalar_kernels;

    fn pack_one(layout: Rgb10Layout, r: u16, g: u16, b: u16) -> [u8; 4] {
        let mut row = WorkRow::new(RowLayout::Rgb, 1);
        row.c0[0] = r << 6;
        row.c1[0] = g << 6;
        row.c2[0] = b << 6;
        let mut bytes = [0u8; 4];
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, scalar_kernels());
        Rgb10Codec::new(layout).pack_row(&row, &mut PackedRowMut::Interleaved(&mut bytes), &mut narrower);
        bytes
    }

    #[test]
    fn test_r210_bytes_are_big_endian() {
        assert_eq!(pack_one(Rgb10Layout::R210, 0x3FF, 0, 0), [0x3F, 0xF0, 0x00, 0x00]);
        assert_eq!(pack_one(Rgb10Layout::R210, 0, 0, 0x3FF), [0x00, 0x00, 0x03, 0xFF]);
    }

    #[test]
    fn test_dpx0_bytes_are_big_endian() {
        assert_eq!(pack_one(Rgb10Layout::Dpx0, 0x3FF, 0, 0), [0xFF, 0xC0, 0x00, 0x00]);
        assert_eq!(pack_one(Rgb10Layout::Dpx0, 0, 0, 0x3FF), [0x00, 0x00, 0x0F, 0xFC]);
    }

    #[test]
    fn test_little_endian_layouts() {
        assert_eq!(pack_one(Rgb10Layout::Rg30, 0x3FF, 0, 0), [0xFF, 0x03, 0x00, 0x00]);
        // opaque row alpha lands in the top two bits
        assert_eq!(pack_one(Rgb10Layout::Ar10, 0, 0, 0x3FF), [0xFF, 0x03, 0x00, 0xC0]);
    }

    #[test]
    fn test_word_round_trip() {
        for layout in [
            Rgb10Layout::Rg30,
            Rgb10Layout::Ab10,
            Rgb10Layout::Ar10,
            Rgb10Layout::R210,
            Rgb10Layout::Dpx0,
        ] {
            let word = layout.pack(0x123, 0x2AB, 0x3CD, 2);
            let alpha = if layout.has_alpha() { 2 } else { 0 };
            assert_eq!(layout.unpack(word), (0x123, 0x2AB, 0x3CD, alpha), "{:?}", layout);
        }
    }
}
