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
use crate::bit_depth::{widen, RowNarrower};
use crate::codec_table::FormatCodec;
use crate::images::{PackedRowMut, PackedRowRef};
use crate::kernels::is_aligned;
use crate::numerics::{clamp_u16, div_round};
use crate::work_row::{RowLayout, WorkRow};
use crate::yuv_support::Yuy2Description;

const LUMA_BLACK_16: i32 = 16 << 8;
const CHROMA_ZERO_16: i32 = 1 << 15;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Sample word of a packed 4:2:2 layout
pub(crate) enum Yuv422Encoding {
    /// One byte per sample
    Bits8,
    /// Little endian 16-bit words
    Bits16,
    /// Little endian signed 2.14 fixed point, luma scaled so 1.0 is white
    Signed2_14,
    /// Little endian 16-bit words, 10-bit value in bits 15..6
    Bits10Msb,
}

/// Interleaved 4:2:2 codec, two pixels per group of four samples
#[derive(Debug, Copy, Clone)]
pub(crate) struct PackedYuv422Codec {
    order: Yuy2Description,
    encoding: Yuv422Encoding,
}

impl PackedYuv422Codec {
    pub(crate) const fn new(order: Yuy2Description, encoding: Yuv422Encoding) -> Self {
        PackedYuv422Codec { order, encoding }
    }
}

#[inline]
pub(crate) fn luma_to_2_14(y: u16) -> i16 {
    div_round((y as i32 - LUMA_BLACK_16) * 64, 219).clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[inline]
pub(crate) fn luma_from_2_14(k: i16) -> u16 {
    clamp_u16(LUMA_BLACK_16 + ((k as i32 * 219 + 32) >> 6))
}

#[inline]
pub(crate) fn chroma_to_2_14(c: u16) -> i16 {
    div_round((c as i32 - CHROMA_ZERO_16) * 2, 7).clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[inline]
pub(crate) fn chroma_from_2_14(k: i16) -> u16 {
    clamp_u16(CHROMA_ZERO_16 + ((k as i32 * 7 + 1) >> 1))
}

fn store_words(dst: &mut [u8], order: Yuy2Description, y: &[u16], u: &[u16], v: &[u16]) {
    for (((dst, y), &u), &v) in dst
        .chunks_exact_mut(8)
        .zip(y.chunks_exact(2))
        .zip(u.iter())
        .zip(v.iter())
    {
        let mut words = [0u16; 4];
        words[order.get_first_y_position()] = y[0];
        words[order.get_second_y_position()] = y[1];
        words[order.get_u_position()] = u;
        words[order.get_v_position()] = v;
        for (dst, word) in dst.chunks_exact_mut(2).zip(words) {
            dst.copy_from_slice(&word.to_le_bytes());
        }
    }
}

fn load_words(src: &[u8], order: Yuy2Description, y: &mut [u16], u: &mut [u16], v: &mut [u16]) {
    for (((src, y), u), v) in src
        .chunks_exact(8)
        .zip(y.chunks_exact_mut(2))
        .zip(u.iter_mut())
        .zip(v.iter_mut())
    {
        let word = |position: usize| u16::from_le_bytes([src[position * 2], src[position * 2 + 1]]);
        y[0] = word(order.get_first_y_position());
        y[1] = word(order.get_second_y_position());
        *u = word(order.get_u_position());
        *v = word(order.get_v_position());
    }
}

impl PackedYuv422Codec {
    fn pack_8(&self, row: &WorkRow, dst: &mut [u8], narrower: &mut RowNarrower<'_>) {
        let kernels = narrower.kernels();
        let y = narrower.narrowed(&row.c0, 8);
        let u = narrower.narrowed(&row.c1, 8);
        let v = narrower.narrowed(&row.c2, 8);
        let dst = &mut dst[..row.width * 2];
        if is_aligned(dst.as_ptr(), kernels.alignment()) {
            kernels.pack_yuv422_8(&y, &u, &v, self.order, dst);
        } else {
            let aligned = narrower.aligned_bytes(dst.len());
            kernels.pack_yuv422_8(&y, &u, &v, self.order, aligned);
            dst.copy_from_slice(aligned);
        }
        narrower.recycle([y, u, v]);
    }

    fn unpack_8(&self, src: &[u8], row: &mut WorkRow) {
        let order = self.order;
        for (((src, y), u), v) in src
            .chunks_exact(4)
            .zip(row.c0.chunks_exact_mut(2))
            .zip(row.c1.iter_mut())
            .zip(row.c2.iter_mut())
        {
            y[0] = widen(src[order.get_first_y_position()] as u16, 8);
            y[1] = widen(src[order.get_second_y_position()] as u16, 8);
            *u = widen(src[order.get_u_position()] as u16, 8);
            *v = widen(src[order.get_v_position()] as u16, 8);
        }
    }
}

impl FormatCodec for PackedYuv422Codec {
    fn layout(&self) -> RowLayout {
        RowLayout::Yuv422
    }

    fn pack_row(&self, row: &WorkRow, dst: &mut PackedRowMut<'_>, narrower: &mut RowNarrower<'_>) {
        let dst = dst.interleaved();
        match self.encoding {
            Yuv422Encoding::Bits8 => self.pack_8(row, dst, narrower),
            Yuv422Encoding::Bits16 => store_words(dst, self.order, &row.c0, &row.c1, &row.c2),
            Yuv422Encoding::Signed2_14 => {
                let mut y = narrower.take_row(row.c0.len());
                let mut u = narrower.take_row(row.c1.len());
                let mut v = narrower.take_row(row.c2.len());
                for (dst, &src) in y.iter_mut().zip(row.c0.iter()) {
                    *dst = luma_to_2_14(src) as u16;
                }
                let chroma = u.iter_mut().zip(row.c1.iter());
                for (dst, &src) in chroma.chain(v.iter_mut().zip(row.c2.iter())) {
                    *dst = chroma_to_2_14(src) as u16;
                }
                store_words(dst, self.order, &y, &u, &v);
                narrower.recycle([y, u, v]);
            }
            Yuv422Encoding::Bits10Msb => {
                let mut y = narrower.narrowed(&row.c0, 10);
                let mut u = narrower.narrowed(&row.c1, 10);
                let mut v = narrower.narrowed(&row.c2, 10);
                for sample in y.iter_mut().chain(u.iter_mut()).chain(v.iter_mut()) {
                    *sample <<= 6;
                }
                store_words(dst, self.order, &y, &u, &v);
                narrower.recycle([y, u, v]);
            }
        }
    }

    fn unpack_row(&self, src: &PackedRowRef<'_>, row: &mut WorkRow) {
        let src = src.interleaved();
        if self.encoding == Yuv422Encoding::Bits8 {
            self.unpack_8(src, row);
            return;
        }
        load_words(src, self.order, &mut row.c0, &mut row.c1, &mut row.c2);
        match self.encoding {
            Yuv422Encoding::Signed2_14 => {
                for y in row.c0.iter_mut() {
                    *y = luma_from_2_14(*y as i16);
                }
                for c in row.c1.iter_mut().chain(row.c2.iter_mut()) {
                    *c = chroma_from_2_14(*c as i16);
                }
            }
            Yuv422Encoding::Bits10Msb => {
                for sample in row.c0.iter_mut().chain(row.c1.iter_mut()).chain(row.c2.iter_mut()) {
                    *sample = widen(*sample >> 6, 10);
                }
            }
            Yuv422Encoding::Bits8 | Yuv422Encoding::Bits16 => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_2_14_reference_points() {
        assert_eq!(luma_to_2_14(16 << 8), 0);
        assert_eq!(luma_to_2_14(235 << 8), 16384);
        assert_eq!(chroma_to_2_14(1 << 15), 0);
        assert_eq!(luma_from_2_14(16384), 235 << 8);
        assert_eq!(luma_from_2_14(i16::MIN), 0);
    }

    #[test]
    fn test_2_14_code_round_trip() {
        let mut rng = rand::rng();
        for _ in 0..10000 {
            let k: i16 = rng.random_range(-1000..9000);
            assert_eq!(luma_to_2_14(luma_from_2_14(k)), k);
            assert_eq!(chroma_to_2_14(chroma_from_2_14(k)), k);
        }
    }

    #[test]
    fn test_word_layout_follows_order() {
        let mut dst = [0u8; 8];
        store_words(&mut dst, Yuy2Description::UYVY, &[0x0102, 0x0304], &[0x0506], &[0x0708]);
        assert_eq!(dst, [0x06, 0x05, 0x02, 0x01, 0x08, 0x07, 0x04, 0x03]);
        let (mut y, mut u, mut v) = ([0u16; 2], [0u16; 1], [0u16; 1]);
        load_words(&dst, Yuy2Description::UYVY, &mut y, &mut u, &mut v);
        assert_eq!((y, u, v), ([0x0102, 0x0304], [0x0506], [0x0708]));
    }
}
