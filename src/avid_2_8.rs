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
use crate::work_row::{RowLayout, WorkRow};

/// 10-bit CbYCrY split in two sections.
///
/// The high eight bits of every sample go to the MSB section in sample order.
/// The low two bits go to the LSB section, four samples per byte with the
/// first sample in bits 7..6.
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct Avid28Codec;

#[inline]
const fn lsb_shift(sample: usize) -> usize {
    6 - 2 * (sample % 4)
}

fn interleave_cbycry(y: &[u16], u: &[u16], v: &[u16], samples: &mut [u16]) {
    for (((dst, y), &u), &v) in samples
        .chunks_exact_mut(4)
        .zip(y.chunks_exact(2))
        .zip(u.iter())
        .zip(v.iter())
    {
        dst.copy_from_slice(&[u, y[0], v, y[1]]);
    }
}

impl FormatCodec for Avid28Codec {
    fn layout(&self) -> RowLayout {
        RowLayout::Yuv422
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>) {
        let PackedRowMut::Split { lsb, msb } = dst else {
            unreachable!("codec requires a split row");
        };
        let y = narrower.narrowed(&row.c0, 10);
        let u = narrower.narrowed(&row.c1, 10);
        let v = narrower.narrowed(&row.c2, 10);
        let mut samples = narrower.take_row(row.width / 2 * 4);
        interleave_cbycry(&y, &u, &v, &mut samples);

        for (dst, &sample) in msb.iter_mut().zip(samples.iter()) {
            *dst = (sample >> 2) as u8;
        }
        for (dst, quad) in lsb.iter_mut().zip(samples.chunks(4)) {
            *dst = quad
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &s)| acc | (((s & 3) as u8) << lsb_shift(i)));
        }
        narrower.recycle([y, u, v, samples]);
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let PackedRowRef::Split { lsb, msb } = *src else {
            unreachable!("codec requires a split row");
        };
        let sample = |i: usize| -> u16 {
            let low = (lsb[i / 4] >> lsb_shift(i)) & 3;
            widen(((msb[i] as u16) << 2) | low as u16, 10)
        };
        for (pair, (y, (u, v))) in row
            .c0
            .chunks_exact_mut(2)
            .zip(row.c1.iter_mut().zip(row.c2.iter_mut()))
            .enumerate()
        {
            let base = pair * 4;
            *u = sample(base);
            y[0] = sample(base + 1);
            *v = sample(base + 2);
            y[1] = sample(base + 3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::NoDither;
    use crate::kernels::scalar_kernels;

    #[test]
    fn test_split_sections_layout() {
        let mut row = WorkRow::new(RowLayout::Yuv422, 2);
        // 10-bit codes Cb=0x3FF Y0=1 Cr=2 Y1=0x203
        row.c1[0] = 0x3FF << 6;
        row.c0[0] = 1 << 6;
        row.c2[0] = 2 << 6;
        row.c0[1] = 0x203 << 6;
        let mut lsb = [0u8; 1];
        let mut msb = [0u8; 4];
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, scalar_kernels());
        Avid28Codec.pack_row(
            &row,
            &mut PackedRowMut::Split {
                lsb: &mut lsb,
                msb: &mut msb,
            },
            &mut narrower,
        );
        assert_eq!(msb, [0xFF, 0x00, 0x00, 0x80]);
        assert_eq!(lsb, [0b11_01_10_11]);

        let mut back = WorkRow::new(RowLayout::Yuv422, 2);
        Avid28Codec.unpack_row(
            &PackedRowRef::Split {
                lsb: &lsb,
                msb: &msb,
            },
            &mut back,
        );
        assert_eq!(back.c0, row.c0);
        assert_eq!(back.c1, row.c1);
        assert_eq!(back.c2, row.c2);
    }
}
