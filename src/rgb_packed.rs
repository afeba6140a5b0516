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

use crate::bit_depth::{rescale_signed, widen, RowNarrower, WORKING_BIT_DEPTH};
use crate::codec_table::FormatCodec;
use crate::images::{PackedRowMut, PackedRowRef};
use crate::work_row::{RowLayout, WorkRow};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Storage of one channel value
pub(crate) enum RgbWord {
    U8,
    U16Le,
    U16Be,
    /// Signed 13-bit value in a little endian `i16`, white at 8191
    S13Le,
}

impl RgbWord {
    #[inline]
    const fn size(self) -> usize {
        match self {
            RgbWord::U8 => 1,
            RgbWord::U16Le | RgbWord::U16Be | RgbWord::S13Le => 2,
        }
    }

    #[inline]
    const fn bit_depth(self) -> u32 {
        match self {
            RgbWord::U8 => 8,
            RgbWord::U16Le | RgbWord::U16Be => 16,
            RgbWord::S13Le => 13,
        }
    }

    #[inline]
    fn store(self, dst: &mut [u8], v: u16) {
        match self {
            RgbWord::U8 => dst[0] = v as u8,
            RgbWord::U16Le | RgbWord::S13Le => dst.copy_from_slice(&v.to_le_bytes()),
            RgbWord::U16Be => dst.copy_from_slice(&v.to_be_bytes()),
        }
    }

    #[inline]
    fn load(self, src: &[u8]) -> u16 {
        match self {
            RgbWord::U8 => widen(src[0] as u16, 8),
            RgbWord::U16Le => u16::from_le_bytes([src[0], src[1]]),
            RgbWord::U16Be => u16::from_be_bytes([src[0], src[1]]),
            RgbWord::S13Le => rescale_signed(
                i16::from_le_bytes([src[0], src[1]]),
                13,
                WORKING_BIT_DEPTH,
                0,
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// What the fourth channel slot holds
pub(crate) enum RgbAlphaSlot {
    None,
    /// Written fully opaque, ignored when read
    Opaque,
    /// Carries the row alpha
    Plane,
}

/// Interleaved RGB codec parameterized by channel order and word type
#[derive(Debug, Copy, Clone)]
pub(crate) struct RgbPackedCodec {
    /// Slot of R, G, B and A within a pixel
    positions: [usize; 4],
    channels: usize,
    word: RgbWord,
    alpha: RgbAlphaSlot,
}

impl RgbPackedCodec {
    pub(crate) const fn new(
        positions: [usize; 4],
        channels: usize,
        word: RgbWord,
        alpha: RgbAlphaSlot,
    ) -> Self {
        RgbPackedCodec {
            positions,
            channels,
            word,
            alpha,
        }
    }
}

impl FormatCodec for RgbPackedCodec {
    fn layout(&self) -> RowLayout {
        RowLayout::Rgb
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>) {
        let dst = dst.interleaved();
        let bits = self.word.bit_depth();
        let size = self.word.size();
        let r = narrower.narrowed(&row.c0, bits);
        let g = narrower.narrowed(&row.c1, bits);
        let b = narrower.narrowed(&row.c2, bits);
        let a = match self.alpha {
            RgbAlphaSlot::Plane => narrower.narrowed(&row.alpha, bits),
            RgbAlphaSlot::Opaque => {
                let mut a = narrower.take_row(row.width);
                a[..row.content_width].fill(((1u32 << bits) - 1) as u16);
                a
            }
            RgbAlphaSlot::None => narrower.take_row(0),
        };
        let [pr, pg, pb, pa] = self.positions;

        for (x, pixel) in dst
            .chunks_exact_mut(self.channels * size)
            .take(row.width)
            .enumerate()
        {
            self.word.store(&mut pixel[pr * size..(pr + 1) * size], r[x]);
            self.word.store(&mut pixel[pg * size..(pg + 1) * size], g[x]);
            self.word.store(&mut pixel[pb * size..(pb + 1) * size], b[x]);
            if let Some(&a) = a.get(x) {
                self.word.store(&mut pixel[pa * size..(pa + 1) * size], a);
            }
        }
        narrower.recycle([r, g, b, a]);
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let src = src.interleaved();
        let size = self.word.size();
        let [pr, pg, pb, pa] = self.positions;
        let with_alpha = self.alpha == RgbAlphaSlot::Plane;

        for (x, pixel) in src
            .chunks_exact(self.channels * size)
            .take(row.width)
            .enumerate()
        {
            row.c0[x] = self.word.load(&pixel[pr * size..]);
            row.c1[x] = self.word.load(&pixel[pg * size..]);
            row.c2[x] = self.word.load(&pixel[pb * size..]);
            if with_alpha {
                row.alpha[x] = self.word.load(&pixel[pa * size..]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::NoDither;
    use crate::kernels::scalar_kernels;

    fn pack(codec: &RgbPackedCodec, row: &WorkRow, bytes: &mut [u8]) {
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, scalar_kernels());
        codec.pack_row(row, &mut PackedRowMut::Interleaved(bytes), &mut narrower);
    }

    fn sample_row() -> WorkRow {
        let mut row = WorkRow::new(RowLayout::Rgb, 1);
        row.c0[0] = 0x1100;
        row.c1[0] = 0x2200;
        row.c2[0] = 0x3300;
        row.alpha[0] = 0x4400;
        row
    }

    #[test]
    fn test_bgr_byte_order() {
        let mut bytes = [0u8; 4];
        pack(
            &RgbPackedCodec::new([2, 1, 0, 3], 4, RgbWord::U8, RgbAlphaSlot::Opaque),
            &sample_row(),
            &mut bytes,
        );
        assert_eq!(bytes, [0x33, 0x22, 0x11, 0xFF]);
        pack(
            &RgbPackedCodec::new([2, 1, 0, 3], 4, RgbWord::U8, RgbAlphaSlot::Plane),
            &sample_row(),
            &mut bytes,
        );
        assert_eq!(bytes, [0x33, 0x22, 0x11, 0x44]);
    }

    #[test]
    fn test_opaque_alpha_stops_at_padding() {
        let mut row = sample_row();
        row.pad_to(3);
        let mut bytes = [0xAAu8; 12];
        pack(
            &RgbPackedCodec::new([2, 1, 0, 3], 4, RgbWord::U8, RgbAlphaSlot::Opaque),
            &row,
            &mut bytes,
        );
        assert_eq!(bytes[..4], [0x33, 0x22, 0x11, 0xFF]);
        assert_eq!(bytes[4..], [0u8; 8]);
    }

    #[test]
    fn test_big_endian_argb() {
        let mut bytes = [0u8; 8];
        pack(
            &RgbPackedCodec::new([1, 2, 3, 0], 4, RgbWord::U16Be, RgbAlphaSlot::Plane),
            &sample_row(),
            &mut bytes,
        );
        assert_eq!(bytes, [0x44, 0x00, 0x11, 0x00, 0x22, 0x00, 0x33, 0x00]);
    }

    #[test]
    fn test_signed_13_bit_white_and_negative() {
        let codec = RgbPackedCodec::new([0, 1, 2, 0], 3, RgbWord::S13Le, RgbAlphaSlot::None);
        let mut row = WorkRow::new(RowLayout::Rgb, 1);
        row.c0[0] = u16::MAX;
        row.c1[0] = 0;
        row.c2[0] = 0;
        let mut bytes = [0u8; 6];
        pack(&codec, &row, &mut bytes);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 8191);

        let negative = (-100i16).to_le_bytes();
        let bytes = [negative[0], negative[1], 0xFF, 0x1F, 0, 0];
        let mut back = WorkRow::new(RowLayout::Rgb, 1);
        codec.unpack_row(&PackedRowRef::Interleaved(&bytes), &mut back);
        assert_eq!(back.c0[0], 0);
        assert_eq!(back.c1[0], 8191 << 3);
        assert_eq!(back.alpha[0], u16::MAX);
    }
}
