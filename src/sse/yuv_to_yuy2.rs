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
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::kernels::{is_aligned, pack_yuv422_8_scalar};
use crate::sse::_mm_loadu_epu16;
use crate::yuv_support::Yuy2Description;

pub(crate) const SSE_STORE_ALIGNMENT: usize = 16;

/// Packs 8-bit 4:2:2 samples into YUY2 family bytes.
///
/// Takes the vector path only when `dst` starts on a 16-byte boundary.
pub(crate) fn yuv_to_yuy2_sse(
    y: &[u16],
    u: &[u16],
    v: &[u16],
    order: Yuy2Description,
    dst: &mut [u8],
) {
    let width = y.len();
    let dst = &mut dst[..width * 2];
    if !is_aligned(dst.as_ptr(), SSE_STORE_ALIGNMENT) {
        pack_yuv422_8_scalar(y, u, v, order, dst);
        return;
    }
    let (u, v) = (&u[..width / 2], &v[..width / 2]);
    unsafe { yuv_to_yuy2_sse_impl(y, u, v, order, dst) }
}

#[target_feature(enable = "sse4.1")]
unsafe fn yuv_to_yuy2_sse_impl(
    y_plane: &[u16],
    u_plane: &[u16],
    v_plane: &[u16],
    yuy2_target: Yuy2Description,
    yuy2_store: &mut [u8],
) {
    let width = y_plane.len();
    let zeros = _mm_setzero_si128();

    let mut cx = 0usize;

    while cx + 16 <= width {
        let uv_x = cx / 2;
        let y_lo = _mm_loadu_epu16(y_plane.as_ptr().add(cx));
        let y_hi = _mm_loadu_epu16(y_plane.as_ptr().add(cx + 8));
        let u_vl = _mm_loadu_epu16(u_plane.as_ptr().add(uv_x));
        let v_vl = _mm_loadu_epu16(v_plane.as_ptr().add(uv_x));

        let y_pixels = _mm_packus_epi16(y_lo, y_hi);
        let u_pixels = _mm_packus_epi16(u_vl, zeros);
        let v_pixels = _mm_packus_epi16(v_vl, zeros);

        let (row0, row1) = match yuy2_target {
            Yuy2Description::YUYV => {
                let uv = _mm_unpacklo_epi8(u_pixels, v_pixels);
                (_mm_unpacklo_epi8(y_pixels, uv), _mm_unpackhi_epi8(y_pixels, uv))
            }
            Yuy2Description::UYVY => {
                let uv = _mm_unpacklo_epi8(u_pixels, v_pixels);
                (_mm_unpacklo_epi8(uv, y_pixels), _mm_unpackhi_epi8(uv, y_pixels))
            }
            Yuy2Description::YVYU => {
                let vu = _mm_unpacklo_epi8(v_pixels, u_pixels);
                (_mm_unpacklo_epi8(y_pixels, vu), _mm_unpackhi_epi8(y_pixels, vu))
            }
        };

        let dst_ptr = yuy2_store.as_mut_ptr().add(cx * 2);
        _mm_store_si128(dst_ptr as *mut __m128i, row0);
        _mm_store_si128(dst_ptr.add(16) as *mut __m128i, row1);

        cx += 16;
    }

    pack_yuv422_8_scalar(
        &y_plane[cx..],
        &u_plane[cx / 2..],
        &v_plane[cx / 2..],
        yuy2_target,
        &mut yuy2_store[cx * 2..],
    );
}
