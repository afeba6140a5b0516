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

use crate::kernels::narrow_row_scalar;
use crate::sse::{_mm_loadu_epu16, _mm_storeu_epu16};

pub(crate) fn sse_narrow_row(src: &[u16], noise: &[u16], shift: u32, dst: &mut [u16]) {
    let width = src.len();
    let noise = &noise[..width];
    let dst = &mut dst[..width];
    unsafe { sse_narrow_row_impl(src, noise, shift, dst) }
}

#[target_feature(enable = "sse4.1")]
unsafe fn sse_narrow_row_impl(src: &[u16], noise: &[u16], shift: u32, dst: &mut [u16]) {
    let width = src.len();
    let v_shift = _mm_cvtsi32_si128(shift as i32);

    let mut cx = 0usize;

    while cx + 16 <= width {
        let s0 = _mm_loadu_epu16(src.as_ptr().add(cx));
        let s1 = _mm_loadu_epu16(src.as_ptr().add(cx + 8));
        let d0 = _mm_loadu_epu16(noise.as_ptr().add(cx));
        let d1 = _mm_loadu_epu16(noise.as_ptr().add(cx + 8));

        // Saturating add followed by the shift lands on the same clamp as the scalar path
        let v0 = _mm_srl_epi16(_mm_adds_epu16(s0, d0), v_shift);
        let v1 = _mm_srl_epi16(_mm_adds_epu16(s1, d1), v_shift);

        _mm_storeu_epu16(dst.as_mut_ptr().add(cx), v0);
        _mm_storeu_epu16(dst.as_mut_ptr().add(cx + 8), v1);
        cx += 16;
    }

    while cx + 8 <= width {
        let s0 = _mm_loadu_epu16(src.as_ptr().add(cx));
        let d0 = _mm_loadu_epu16(noise.as_ptr().add(cx));
        let v0 = _mm_srl_epi16(_mm_adds_epu16(s0, d0), v_shift);
        _mm_storeu_epu16(dst.as_mut_ptr().add(cx), v0);
        cx += 8;
    }

    narrow_row_scalar(&src[cx..], &noise[cx..], shift, &mut dst[cx..]);
}
