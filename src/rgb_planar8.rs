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

use crate::bit_depth::RowNarrower;
use crate::codec_table::FormatCodec;
use crate::images::{PackedRowMut, PackedRowRef};
use crate::work_row::{RowLayout, WorkRow};

const GROUP: usize = 8;

/// 16-bit RGB(A) grouped per eight pixels: eight R words, eight G words,
/// eight B words and optionally eight A words, all little endian.
#[derive(Debug, Copy, Clone)]
pub(crate) struct RgbPlanar8Codec {
    with_alpha: bool,
}

impl RgbPlanar8Codec {
    pub(crate) const fn new(with_alpha: bool) -> Self {
        RgbPlanar8Codec { with_alpha }
    }

    #[inline]
    fn channels(&self) -> usize {
        if self.with_alpha {
            4
        } else {
            3
        }
    }
}

impl FormatCodec for RgbPlanar8Codec {
    fn layout(&self) -> RowLayout {
        RowLayout::Rgb
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, _: &mut RowNarrower<'_>) {
        let dst = dst.interleaved();
        let channels = self.channels();
        let planes = [&row.c0, &row.c1, &row.c2, &row.alpha];
        let groups = row.width.div_ceil(GROUP);

        for (group, dst) in dst
            .chunks_exact_mut(GROUP * 2 * channels)
            .take(groups)
            .enumerate()
        {
            let start = group * GROUP;
            for (plane, block) in planes.iter().zip(dst.chunks_exact_mut(GROUP * 2)) {
                for (i, word) in block.chunks_exact_mut(2).enumerate() {
                    // a trailing partial group is padded with zeros
                    let v = plane.get(start + i).copied().unwrap_or(0);
                    word.copy_from_slice(&v.to_le_bytes());
                }
            }
        }
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let src = src.interleaved();
        let channels = self.channels();
        let width = row.width;
        let groups = width.div_ceil(GROUP);
        let mut planes = [&mut row.c0, &mut row.c1, &mut row.c2, &mut row.alpha];

        for (group, src) in src
            .chunks_exact(GROUP * 2 * channels)
            .take(groups)
            .enumerate()
        {
            let start = group * GROUP;
            for (plane, block) in planes.iter_mut().zip(src.chunks_exact(GROUP * 2)) {
                for (i, word) in block.chunks_exact(2).enumerate() {
                    if let Some(dst) = plane.get_mut(start + i) {
                        *dst = u16::from_le_bytes([word[0], word[1]]);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::NoDither;
    use crate::kernels::scalar_kernels;

    #[test]
    fn test_partial_group_is_zero_filled() {
        let mut row = WorkRow::new(RowLayout::Rgb, 9);
        for (x, v) in row.c0.iter_mut().enumerate() {
            *v = 0x100 + x as u16;
        }
        row.c1.fill(0x2222);
        row.c2.fill(0x3333);
        let mut bytes = vec![0xAAu8; 96];
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, scalar_kernels());
        RgbPlanar8Codec::new(false).pack_row(&row, &mut PackedRowMut::Interleaved(&mut bytes), &mut narrower);

        let word = |i: usize| u16::from_le_bytes([bytes[i * 2], bytes[i * 2 + 1]]);
        assert_eq!(word(0), 0x100);
        assert_eq!(word(7), 0x107);
        assert_eq!(word(8), 0x2222);
        assert_eq!(word(16), 0x3333);
        assert_eq!(word(24), 0x108);
        assert!((25..32).all(|i| word(i) == 0));
        assert_eq!(word(32), 0x2222);

        let mut back = WorkRow::new(RowLayout::Rgb, 9);
        RgbPlanar8Codec::new(false).unpack_row(&PackedRowRef::Interleaved(&bytes), &mut back);
        assert_eq!(back.c0, row.c0);
        assert_eq!(back.c2, row.c2);
        assert!(back.alpha.iter().all(|&a| a == u16::MAX));
    }
}
