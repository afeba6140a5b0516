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

#[inline]
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn _mm_loadu_epu16(ptr: *const u16) -> __m128i {
    _mm_loadu_si128(ptr as *const __m128i)
}

#[inline]
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn _mm_storeu_epu16(ptr: *mut u16, v: __m128i) {
    _mm_storeu_si128(ptr as *mut __m128i, v)
}

#[inline]
#[target_feature(enable = "sse4.1")]
/// Broadcasts a pair of 16-bit multipliers for `_mm_madd_epi16` over interleaved lanes
pub(crate) unsafe fn _mm_set1_pair_epi16(first: i32, second: i32) -> __m128i {
    _mm_set1_epi32(((second & 0xFFFF) << 16) | (first & 0xFFFF))
}

#[inline]
#[target_feature(enable = "sse4.1")]
/// Widens unsigned 16-bit lanes into two registers of 32-bit lanes
pub(crate) unsafe fn _mm_widen_epu16(v: __m128i) -> (__m128i, __m128i) {
    (
        _mm_cvtepu16_epi32(v),
        _mm_cvtepu16_epi32(_mm_srli_si128::<8>(v)),
    )
}
