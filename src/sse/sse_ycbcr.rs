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

use crate::built_coefficients::{MATRIX_PRECISION, MATRIX_PRESHIFT};
use crate::sse::{_mm_loadu_epu16, _mm_set1_pair_epi16, _mm_storeu_epu16, _mm_widen_epu16};
use crate::ycbcr_matrix::{rgb_to_ycbcr_scalar, ycbcr_to_rgb_scalar, InverseMatrix};
use crate::yuv_support::CbCrForwardTransform;

#[allow(clippy::too_many_arguments)]
pub(crate) fn sse_ycbcr_to_rgb_row(
    y: &[u16],
    u: &[u16],
    v: &[u16],
    r: &mut [u16],
    g: &mut [u16],
    b: &mut [u16],
    matrix: &InverseMatrix,
) {
    let width = y.len();
    let (u, v) = (&u[..width], &v[..width]);
    let (r, g, b) = (&mut r[..width], &mut g[..width], &mut b[..width]);
    unsafe { sse_ycbcr_to_rgb_row_impl(y, u, v, r, g, b, matrix) }
}

#[target_feature(enable = "sse4.1")]
unsafe fn sse_ycbcr_to_rgb_row_impl(
    y_plane: &[u16],
    u_plane: &[u16],
    v_plane: &[u16],
    r_plane: &mut [u16],
    g_plane: &mut [u16],
    b_plane: &mut [u16],
    matrix: &InverseMatrix,
) {
    const PRESHIFT: i32 = MATRIX_PRESHIFT;
    const PRECISION: i32 = MATRIX_PRECISION - MATRIX_PRESHIFT;
    let width = y_plane.len();
    let t = &matrix.transform;

    let v_luma_min = _mm_set1_epi16(matrix.luma_min as i16);
    let v_luma_max = _mm_set1_epi16(matrix.luma_max as i16);
    let v_chroma_min = _mm_set1_epi16(matrix.chroma_min as i16);
    let v_chroma_max = _mm_set1_epi16(matrix.chroma_max as i16);
    let y_corr = _mm_set1_epi16(matrix.y_bias as i16);
    let uv_corr = _mm_set1_epi16(i16::MIN);
    let zeros = _mm_setzero_si128();
    let rounding = _mm_set1_epi32(1 << (PRECISION - 1));

    let v_y_cr = _mm_set1_pair_epi16(t.y_coef, t.cr_coef);
    let v_y_cb = _mm_set1_pair_epi16(t.y_coef, t.cb_coef);
    let v_y_g1 = _mm_set1_pair_epi16(t.y_coef, -t.g_coeff_1);
    let v_g2 = _mm_set1_pair_epi16(-t.g_coeff_2, 0);

    let mut cx = 0usize;

    while cx + 8 <= width {
        let y_vl = _mm_loadu_epu16(y_plane.as_ptr().add(cx));
        let u_vl = _mm_loadu_epu16(u_plane.as_ptr().add(cx));
        let v_vl = _mm_loadu_epu16(v_plane.as_ptr().add(cx));

        let y_vl = _mm_min_epu16(_mm_max_epu16(y_vl, v_luma_min), v_luma_max);
        let u_vl = _mm_min_epu16(_mm_max_epu16(u_vl, v_chroma_min), v_chroma_max);
        let v_vl = _mm_min_epu16(_mm_max_epu16(v_vl, v_chroma_min), v_chroma_max);

        let y_values = _mm_srli_epi16::<PRESHIFT>(_mm_subs_epu16(y_vl, y_corr));
        let u_values = _mm_srai_epi16::<PRESHIFT>(_mm_sub_epi16(u_vl, uv_corr));
        let v_values = _mm_srai_epi16::<PRESHIFT>(_mm_sub_epi16(v_vl, uv_corr));

        let yv_lo = _mm_unpacklo_epi16(y_values, v_values);
        let yv_hi = _mm_unpackhi_epi16(y_values, v_values);
        let yu_lo = _mm_unpacklo_epi16(y_values, u_values);
        let yu_hi = _mm_unpackhi_epi16(y_values, u_values);
        let u0_lo = _mm_unpacklo_epi16(u_values, zeros);
        let u0_hi = _mm_unpackhi_epi16(u_values, zeros);

        let r_lo = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(_mm_madd_epi16(yv_lo, v_y_cr), rounding));
        let r_hi = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(_mm_madd_epi16(yv_hi, v_y_cr), rounding));
        let b_lo = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(_mm_madd_epi16(yu_lo, v_y_cb), rounding));
        let b_hi = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(_mm_madd_epi16(yu_hi, v_y_cb), rounding));
        let g_lo = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
            _mm_add_epi32(_mm_madd_epi16(yv_lo, v_y_g1), _mm_madd_epi16(u0_lo, v_g2)),
            rounding,
        ));
        let g_hi = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
            _mm_add_epi32(_mm_madd_epi16(yv_hi, v_y_g1), _mm_madd_epi16(u0_hi, v_g2)),
            rounding,
        ));

        _mm_storeu_epu16(r_plane.as_mut_ptr().add(cx), _mm_packus_epi32(r_lo, r_hi));
        _mm_storeu_epu16(g_plane.as_mut_ptr().add(cx), _mm_packus_epi32(g_lo, g_hi));
        _mm_storeu_epu16(b_plane.as_mut_ptr().add(cx), _mm_packus_epi32(b_lo, b_hi));

        cx += 8;
    }

    ycbcr_to_rgb_scalar(
        &y_plane[cx..],
        &u_plane[cx..],
        &v_plane[cx..],
        &mut r_plane[cx..],
        &mut g_plane[cx..],
        &mut b_plane[cx..],
        matrix,
    );
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn sse_rgb_to_ycbcr_row(
    r: &[u16],
    g: &[u16],
    b: &[u16],
    y: &mut [u16],
    u: &mut [u16],
    v: &mut [u16],
    transform: &CbCrForwardTransform<i32>,
) {
    let width = r.len();
    let (g, b) = (&g[..width], &b[..width]);
    let (y, u, v) = (&mut y[..width], &mut u[..width], &mut v[..width]);
    unsafe { sse_rgb_to_ycbcr_row_impl(r, g, b, y, u, v, transform) }
}

#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn sse_weighted_sum(
    r: (__m128i, __m128i),
    g: (__m128i, __m128i),
    b: (__m128i, __m128i),
    weights: (__m128i, __m128i, __m128i),
    bias: __m128i,
) -> __m128i {
    const PRECISION: i32 = MATRIX_PRECISION;
    let rounding = _mm_set1_epi32(1 << (PRECISION - 1));
    let sum_lo = _mm_add_epi32(
        _mm_add_epi32(_mm_mullo_epi32(r.0, weights.0), _mm_mullo_epi32(g.0, weights.1)),
        _mm_add_epi32(_mm_mullo_epi32(b.0, weights.2), rounding),
    );
    let sum_hi = _mm_add_epi32(
        _mm_add_epi32(_mm_mullo_epi32(r.1, weights.0), _mm_mullo_epi32(g.1, weights.1)),
        _mm_add_epi32(_mm_mullo_epi32(b.1, weights.2), rounding),
    );
    let lo = _mm_add_epi32(_mm_srai_epi32::<PRECISION>(sum_lo), bias);
    let hi = _mm_add_epi32(_mm_srai_epi32::<PRECISION>(sum_hi), bias);
    _mm_packus_epi32(lo, hi)
}

#[target_feature(enable = "sse4.1")]
unsafe fn sse_rgb_to_ycbcr_row_impl(
    r_plane: &[u16],
    g_plane: &[u16],
    b_plane: &[u16],
    y_plane: &mut [u16],
    u_plane: &mut [u16],
    v_plane: &mut [u16],
    transform: &CbCrForwardTransform<i32>,
) {
    let width = r_plane.len();

    let y_weights = (
        _mm_set1_epi32(transform.yr),
        _mm_set1_epi32(transform.yg),
        _mm_set1_epi32(transform.yb),
    );
    let cb_weights = (
        _mm_set1_epi32(transform.cb_r),
        _mm_set1_epi32(transform.cb_g),
        _mm_set1_epi32(transform.cb_b),
    );
    let cr_weights = (
        _mm_set1_epi32(transform.cr_r),
        _mm_set1_epi32(transform.cr_g),
        _mm_set1_epi32(transform.cr_b),
    );
    let y_bias = _mm_set1_epi32(transform.y_offset << 8);
    let uv_bias = _mm_set1_epi32(1 << 15);

    let mut cx = 0usize;

    while cx + 8 <= width {
        let r = _mm_widen_epu16(_mm_loadu_epu16(r_plane.as_ptr().add(cx)));
        let g = _mm_widen_epu16(_mm_loadu_epu16(g_plane.as_ptr().add(cx)));
        let b = _mm_widen_epu16(_mm_loadu_epu16(b_plane.as_ptr().add(cx)));

        let y = sse_weighted_sum(r, g, b, y_weights, y_bias);
        let cb = sse_weighted_sum(r, g, b, cb_weights, uv_bias);
        let cr = sse_weighted_sum(r, g, b, cr_weights, uv_bias);

        _mm_storeu_epu16(y_plane.as_mut_ptr().add(cx), y);
        _mm_storeu_epu16(u_plane.as_mut_ptr().add(cx), cb);
        _mm_storeu_epu16(v_plane.as_mut_ptr().add(cx), cr);

        cx += 8;
    }

    rgb_to_ycbcr_scalar(
        &r_plane[cx..],
        &g_plane[cx..],
        &b_plane[cx..],
        &mut y_plane[cx..],
        &mut u_plane[cx..],
        &mut v_plane[cx..],
        transform,
    );
}
