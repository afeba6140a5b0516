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

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Chroma arrangement of an 8-bit 4:2:0 layout
pub(crate) enum Yuv420Chroma {
    /// One plane, U and V interleaved
    Interleaved,
    /// V plane followed by U plane
    PlanarVu,
}

/// 8-bit 4:2:0 codec.
///
/// Rows are exchanged as 4:2:2. On pack a row carries a chroma destination
/// only when it is the row its chroma pair is decimated from; on unpack every
/// row reads the chroma row it belongs to.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Yuv420Codec {
    chroma: Yuv420Chroma,
}

impl Yuv420Codec {
    pub(crate) const fn new(chroma: Yuv420Chroma) -> Self {
        Yuv420Codec { chroma }
    }
}

impl FormatCodec for Yuv420Codec {
    fn layout(&self) -> RowLayout {
        RowLayout::Yuv422
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>) {
        let PackedRowMut::Planar { luma, chroma } = dst else {
            unreachable!("codec requires a planar row");
        };
        narrow_to_bytes(&row.c0, luma, narrower);
        let Some((first, second)) = chroma else {
            return;
        };
        let u = narrower.narrowed(&row.c1, 8);
        let v = narrower.narrowed(&row.c2, 8);
        match (self.chroma, second) {
            (Yuv420Chroma::Interleaved, _) => {
                for ((dst, &u), &v) in first.chunks_exact_mut(2).zip(u.iter()).zip(v.iter()) {
                    dst[0] = u as u8;
                    dst[1] = v as u8;
                }
            }
            (Yuv420Chroma::PlanarVu, Some(second)) => {
                for (dst, &v) in first.iter_mut().zip(v.iter()) {
                    *dst = v as u8;
                }
                for (dst, &u) in second.iter_mut().zip(u.iter()) {
                    *dst = u as u8;
                }
            }
            (Yuv420Chroma::PlanarVu, None) => unreachable!("planar chroma needs two planes"),
        }
        narrower.recycle([u, v]);
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let PackedRowRef::Planar {
            luma,
            chroma: (first, second),
        } = *src
        else {
            unreachable!("codec requires a planar row");
        };
        for (dst, &src) in row.c0.iter_mut().zip(luma.iter()) {
            *dst = widen(src as u16, 8);
        }
        match (self.chroma, second) {
            (Yuv420Chroma::PlanarVu, Some(second)) => {
                for (dst, &src) in row.c2.iter_mut().zip(first.iter()) {
                    *dst = widen(src as u16, 8);
                }
                for (dst, &src) in row.c1.iter_mut().zip(second.iter()) {
                    *dst = widen(src as u16, 8);
                }
            }
            _ => {
                for ((u, v), src) in row
                    .c1
                    .iter_mut()
                    .zip(row.c2.iter_mut())
                    .zip(first.chunks_exact(2))
                {
                    *u = widen(src[0] as u16, 8);
                    *v = widen(src[1] as u16, 8);
                }
            }
        }
    }
}

fn narrow_to_bytes(src: &[u16], dst: &mut [u8], narrower: &mut RowNarrower<'_>) {
    let narrowed = narrower.narrowed(src, 8);
    for (dst, &v) in dst.iter_mut().zip(narrowed.iter()) {
        *dst = v as u8;
    }
    narrower.recycle([narrowed]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::NoDither;
    use crate::kernels::scalar_kernels;

    #[test]
    fn test_yv12_stores_v_before_u() {
        let mut row = WorkRow::new(RowLayout::Yuv422, 4);
        row.c0.copy_from_slice(&[1 << 8, 2 << 8, 3 << 8, 4 << 8]);
        row.c1.copy_from_slice(&[10 << 8, 11 << 8]);
        row.c2.copy_from_slice(&[20 << 8, 21 << 8]);
        let mut luma = [0u8; 4];
        let mut v_plane = [0u8; 2];
        let mut u_plane = [0u8; 2];
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, scalar_kernels());
        let codec = Yuv420Codec::new(Yuv420Chroma::PlanarVu);
        codec.pack_row(
            &row,
            &mut PackedRowMut::Planar {
                luma: &mut luma,
                chroma: Some((&mut v_plane[..], Some(&mut u_plane[..]))),
            },
            &mut narrower,
        );
        assert_eq!(luma, [1, 2, 3, 4]);
        assert_eq!(v_plane, [20, 21]);
        assert_eq!(u_plane, [10, 11]);

        let mut back = WorkRow::new(RowLayout::Yuv422, 4);
        codec.unpack_row(
            &PackedRowRef::Planar {
                luma: &luma,
                chroma: (&v_plane[..], Some(&u_plane[..])),
            },
            &mut back,
        );
        assert_eq!(back.c1, row.c1);
        assert_eq!(back.c2, row.c2);
    }

    #[test]
    fn test_nv12_row_without_chroma_leaves_chroma_untouched() {
        let row = WorkRow::new(RowLayout::Yuv422, 2);
        let mut luma = [7u8; 2];
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, scalar_kernels());
        Yuv420Codec::new(Yuv420Chroma::Interleaved).pack_row(
            &row,
            &mut PackedRowMut::Planar {
                luma: &mut luma,
                chroma: None,
            },
            &mut narrower,
        );
        assert_eq!(luma, [0, 0]);
    }
}
