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
use crate::bit_depth::{narrow_with_dither, WORKING_BIT_DEPTH};
use crate::ycbcr_matrix::{rgb_to_ycbcr_scalar, ycbcr_to_rgb_scalar, InverseMatrix};
use crate::yuv_support::{CbCrForwardTransform, Yuy2Description};
use std::sync::OnceLock;

/// Row primitives with one implementation per instruction set.
///
/// Every implementation must be bit-identical to [ScalarKernels].
pub(crate) trait RowKernels: Send + Sync {
    fn name(&self) -> &'static str;

    /// Destination alignment `pack_yuv422_8` needs to take its fast path
    fn alignment(&self) -> usize {
        1
    }

    /// `dst = min((src + noise) >> shift, max)`, `shift` in `1..16`
    fn narrow(&self, src: &[u16], noise: &[u16], shift: u32, dst: &mut [u16]);

    #[allow(clippy::too_many_arguments)]
    fn ycbcr_to_rgb(
        &self,
        y: &[u16],
        u: &[u16],
        v: &[u16],
        r: &mut [u16],
        g: &mut [u16],
        b: &mut [u16],
        matrix: &InverseMatrix,
    );

    #[allow(clippy::too_many_arguments)]
    fn rgb_to_ycbcr(
        &self,
        r: &[u16],
        g: &[u16],
        b: &[u16],
        y: &mut [u16],
        u: &mut [u16],
        v: &mut [u16],
        transform: &CbCrForwardTransform<i32>,
    );

    /// Interleaves 8-bit 4:2:2 samples held in `u16` into packed bytes,
    /// `y.len()` must be even.
    fn pack_yuv422_8(&self, y: &[u16], u: &[u16], v: &[u16], order: Yuy2Description, dst: &mut [u8]);
}

pub(crate) struct ScalarKernels;

impl RowKernels for ScalarKernels {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn narrow(&self, src: &[u16], noise: &[u16], shift: u32, dst: &mut [u16]) {
        narrow_row_scalar(src, noise, shift, dst);
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
        ycbcr_to_rgb_scalar(y, u, v, r, g, b, matrix);
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
        rgb_to_ycbcr_scalar(r, g, b, y, u, v, transform);
    }

    fn pack_yuv422_8(&self, y: &[u16], u: &[u16], v: &[u16], order: Yuy2Description, dst: &mut [u8]) {
        pack_yuv422_8_scalar(y, u, v, order, dst);
    }
}

pub(crate) fn narrow_row_scalar(src: &[u16], noise: &[u16], shift: u32, dst: &mut [u16]) {
    let to_bits = WORKING_BIT_DEPTH - shift;
    for ((dst, &src), &noise) in dst.iter_mut().zip(src.iter()).zip(noise.iter()) {
        *dst = narrow_with_dither(src, to_bits, noise);
    }
}

pub(crate) fn pack_yuv422_8_scalar(
    y: &[u16],
    u: &[u16],
    v: &[u16],
    order: Yuy2Description,
    dst: &mut [u8],
) {
    for (((dst, y), &u), &v) in dst
        .chunks_exact_mut(4)
        .zip(y.chunks_exact(2))
        .zip(u.iter())
        .zip(v.iter())
    {
        dst[order.get_first_y_position()] = y[0] as u8;
        dst[order.get_second_y_position()] = y[1] as u8;
        dst[order.get_u_position()] = u as u8;
        dst[order.get_v_position()] = v as u8;
    }
}

static SCALAR_KERNELS: ScalarKernels = ScalarKernels;

pub(crate) fn scalar_kernels() -> &'static dyn RowKernels {
    &SCALAR_KERNELS
}

fn detect_kernels() -> &'static dyn RowKernels {
    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
    {
        if std::arch::is_x86_feature_detected!("sse4.1") {
            return crate::sse::sse41_kernels();
        }
    }
    scalar_kernels()
}

/// Kernels for this CPU, detected once per process
pub(crate) fn row_kernels() -> &'static dyn RowKernels {
    static SELECTED: OnceLock<&'static dyn RowKernels> = OnceLock::new();
    *SELECTED.get_or_init(|| {
        let kernels = detect_kernels();
        tracing::debug!(kernels = kernels.name(), "selected row kernels");
        kernels
    })
}

/// Byte row with a guaranteed 16-byte aligned start
#[derive(Default)]
pub(crate) struct AlignedScratch {
    storage: Vec<u128>,
}

impl AlignedScratch {
    pub(crate) fn bytes_mut(&mut self, len: usize) -> &mut [u8] {
        let words = len.div_ceil(std::mem::size_of::<u128>());
        if self.storage.len() < words {
            self.storage.resize(words, 0);
        }
        unsafe { std::slice::from_raw_parts_mut(self.storage.as_mut_ptr() as *mut u8, len) }
    }
}

#[inline]
pub(crate) fn is_aligned(ptr: *const u8, alignment: usize) -> bool {
    (ptr as usize) % alignment == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::built_coefficients::get_built_forward_transform;
    use crate::yuv_support::{ColorRange, ColorSpace, ColorStandard};
    use rand::Rng;

    fn random_row(len: usize) -> Vec<u16> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random()).collect()
    }

    fn color_spaces() -> Vec<ColorSpace> {
        let mut spaces = Vec::new();
        for standard in [ColorStandard::Bt601, ColorStandard::Bt709] {
            for range in [ColorRange::ComputerGraphics, ColorRange::VideoSystems] {
                spaces.push(ColorSpace::new(standard, range));
            }
        }
        spaces
    }

    #[test]
    fn test_selected_kernels_match_scalar_narrow() {
        let selected = row_kernels();
        let scalar = scalar_kernels();
        let mut rng = rand::rng();
        for width in [1usize, 7, 8, 63, 1920] {
            let src = random_row(width);
            for shift in [1u32, 3, 6, 8, 15] {
                let noise: Vec<u16> = (0..width)
                    .map(|_| rng.random_range(0..(1u16 << (shift - 1))))
                    .collect();
                let mut a = vec![0u16; width];
                let mut b = vec![0u16; width];
                selected.narrow(&src, &noise, shift, &mut a);
                scalar.narrow(&src, &noise, shift, &mut b);
                assert_eq!(a, b, "{} width {} shift {}", selected.name(), width, shift);
            }
        }
    }

    #[test]
    fn test_selected_kernels_match_scalar_matrix() {
        let selected = row_kernels();
        let scalar = scalar_kernels();
        for cs in color_spaces() {
            for width in [5usize, 16, 333] {
                let (c0, c1, c2) = (random_row(width), random_row(width), random_row(width));
                let matrix = InverseMatrix::new(cs);
                let mut fast = [vec![0u16; width], vec![0u16; width], vec![0u16; width]];
                let mut slow = [vec![0u16; width], vec![0u16; width], vec![0u16; width]];
                let [r, g, b] = &mut fast;
                selected.ycbcr_to_rgb(&c0, &c1, &c2, r, g, b, &matrix);
                let [r, g, b] = &mut slow;
                scalar.ycbcr_to_rgb(&c0, &c1, &c2, r, g, b, &matrix);
                assert_eq!(fast, slow, "{:?}", cs);

                let transform = get_built_forward_transform(cs);
                let [y, u, v] = &mut fast;
                selected.rgb_to_ycbcr(&c0, &c1, &c2, y, u, v, transform);
                let [y, u, v] = &mut slow;
                scalar.rgb_to_ycbcr(&c0, &c1, &c2, y, u, v, transform);
                assert_eq!(fast, slow, "{:?}", cs);
            }
        }
    }

    #[test]
    fn test_selected_kernels_match_scalar_packing() {
        let selected = row_kernels();
        let mut rng = rand::rng();
        for order in [
            Yuy2Description::YUYV,
            Yuy2Description::UYVY,
            Yuy2Description::YVYU,
        ] {
            for width in [2usize, 30, 32, 100] {
                let y: Vec<u16> = (0..width).map(|_| rng.random_range(0..256)).collect();
                let u: Vec<u16> = (0..width / 2).map(|_| rng.random_range(0..256)).collect();
                let v: Vec<u16> = (0..width / 2).map(|_| rng.random_range(0..256)).collect();
                let mut scratch = AlignedScratch::default();
                let fast = scratch.bytes_mut(width * 2);
                selected.pack_yuv422_8(&y, &u, &v, order, fast);
                let mut slow = vec![0u8; width * 2];
                pack_yuv422_8_scalar(&y, &u, &v, order, &mut slow);
                assert_eq!(fast, &slow[..], "{:?}", order);
            }
        }
    }

    #[test]
    fn test_aligned_scratch_is_aligned() {
        let mut scratch = AlignedScratch::default();
        for len in [1usize, 15, 16, 17, 4000] {
            let bytes = scratch.bytes_mut(len);
            assert_eq!(bytes.len(), len);
            assert!(is_aligned(bytes.as_ptr(), 16));
        }
    }

    #[test]
    fn test_scalar_yuyv_layout() {
        let mut dst = [0u8; 4];
        pack_yuv422_8_scalar(&[1, 2], &[3], &[4], Yuy2Description::YUYV, &mut dst);
        assert_eq!(dst, [1, 3, 2, 4]);
        pack_yuv422_8_scalar(&[1, 2], &[3], &[4], Yuy2Description::UYVY, &mut dst);
        assert_eq!(dst, [3, 1, 4, 2]);
        pack_yuv422_8_scalar(&[1, 2], &[3], &[4], Yuy2Description::YVYU, &mut dst);
        assert_eq!(dst, [1, 4, 2, 3]);
    }
}
