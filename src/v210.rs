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

const MASK_10: u32 = 0x3FF;

/// 10-bit 4:2:2, six pixels in four little endian words
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct V210Codec;

/// Sample slots of one group, `(component, index)` per 10-bit field of each
/// word from the low bits up. Components are 0 for Y, 1 for Cb, 2 for Cr.
const GROUP_SLOTS: [[(usize, usize); 3]; 4] = [
    [(1, 0), (0, 0), (2, 0)],
    [(0, 1), (1, 1), (0, 2)],
    [(2, 1), (0, 3), (1, 2)],
    [(0, 4), (2, 2), (0, 5)],
];

impl FormatCodec for V210Codec {
    fn layout(&self) -> RowLayout {
        RowLayout::Yuv422
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>) {
        let dst = dst.interleaved();
        let planes = [
            narrower.narrowed(&row.c0, 10),
            narrower.narrowed(&row.c1, 10),
            narrower.narrowed(&row.c2, 10),
        ];
        for (group, dst) in dst.chunks_exact_mut(16).take(row.width / 6).enumerate() {
            for (slots, dst) in GROUP_SLOTS.iter().zip(dst.chunks_exact_mut(4)) {
                let mut word = 0u32;
                for (field, &(component, index)) in slots.iter().enumerate() {
                    let per_group = if component == 0 { 6 } else { 3 };
                    let sample = planes[component][group * per_group + index] as u32;
                    word |= (sample & MASK_10) << (field * 10);
                }
                dst.copy_from_slice(&word.to_le_bytes());
            }
        }
        narrower.recycle(planes);
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let src = src.interleaved();
        let groups = row.width / 6;
        for (group, src) in src.chunks_exact(16).take(groups).enumerate() {
            for (slots, src) in GROUP_SLOTS.iter().zip(src.chunks_exact(4)) {
                let word = u32::from_le_bytes([src[0], src[1], src[2], src[3]]);
                for (field, &(component, index)) in slots.iter().enumerate() {
                    let sample = widen(((word >> (field * 10)) & MASK_10) as u16, 10);
                    match component {
                        0 => row.c0[group * 6 + index] = sample,
                        1 => row.c1[group * 3 + index] = sample,
                        _ => row.c2[group * 3 + index] = sample,
                    }
                }
            }
        }
    }
}
