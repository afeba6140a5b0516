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
use crate::kernels::RowKernels;
use crate::sse::sse_narrow::sse_narrow_row;
use crate::sse::sse_ycbcr::{sse_rgb_to_ycbcr_row, sse_ycbcr_to_rgb_row};
use crate::sse::yuv_to_yuy2::{yuv_to_yuy2_sse, SSE_STORE_ALIGNMENT};
use crate::ycbcr_matrix::InverseMatrix;
use crate::yuv_support::{CbCrForwardTransform, Yuy2Description};

/// Kernels for CPUs with SSE4.1, only reachable after runtime detection.
pub(crate) struct Sse41Kernels;

static SSE41_KERNELS: Sse41Kernels = Sse41Kernels;

/// Callers must have confirmed SSE4.1 support
pub(crate) fn sse41_kernels() -> &'static dyn RowKernels {
    &SSE41_KERNELS
}

impl RowKernels for Sse41Kernels {
    fn name(&self) -> &'static str {
        "sse4.1"
    }

    fn alignment(&self) -> usize {
        SSE_STORE_ALIGNMENT
    }

    fn narrow(&self, src: &[u16], noise: &[u16], shift: u32, dst: &mut [u16]) {
        sse_narrow_row(src, noise, shift, dst);
    }

    fn ycbcr_to_rgb(
        &self,
        y: &[u16],
        u: &[u16],
        v: &[u16],
        r: &mut [u16],
        g: &mut [u16],
        b: &mut [u16],
        matrix: &InverseMatrix,
    ) {
        sse_ycbcr_to_rgb_row(y, u, v, r, g, b, matrix);
    }

    fn rgb_to_ycbcr(
        &self,
        r: &[u16],
        g: &[u16],
        b: &[u16],
        y: &mut [u16],
        u: &mut [u16],
        v: &mut [u16],
        transform: &CbCrForwardTransform<i32>,
    ) {
        sse_rgb_to_ycbcr_row(r, g, b, y, u, v, transform);
    }

    fn pack_yuv422_8(&self, y: &[u16], u: &[u16], v: &[u16], order: Yuy2Description, dst: &mut [u8]) {
        yuv_to_yuy2_sse(y, u, v, order, dst);
    }
}
