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
use crate::built_coefficients::{
    get_built_forward_transform, get_built_inverse_transform, CHROMA_CORRECTION_601_TO_709,
    CORRECTION_PRECISION, MATRIX_PRECISION, MATRIX_PRESHIFT,
};
use crate::kernels::row_kernels;
use crate::numerics::clamp_u16;
use crate::pixel_error::{check_row_len, PixelError};
use crate::yuv_support::{CbCrForwardTransform, CbCrInverseTransform, ColorRange, ColorSpace};

const CHROMA_BIAS: i32 = 1 << 15;

/// Inverse transform resolved for one color space at working precision
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct InverseMatrix {
    pub(crate) transform: CbCrInverseTransform<i32>,
    pub(crate) y_bias: u16,
    pub(crate) luma_min: u16,
    pub(crate) luma_max: u16,
    pub(crate) chroma_min: u16,
    pub(crate) chroma_max: u16,
}

impl InverseMatrix {
    pub(crate) fn new(color_space: ColorSpace) -> InverseMatrix {
        let transform = *get_built_inverse_transform(color_space);
        let (luma_min, luma_max, chroma_min, chroma_max) = match color_space.range {
            ColorRange::ComputerGraphics => (16u16 << 8, 235u16 << 8, 16u16 << 8, 240u16 << 8),
            ColorRange::VideoSystems => (0, u16::MAX, 0, u16::MAX),
        };
        InverseMatrix {
            transform,
            y_bias: (transform.y_offset << 8) as u16,
            luma_min,
            luma_max,
            chroma_min,
            chroma_max,
        }
    }
}

#[inline(always)]
pub(crate) fn ycbcr_to_rgb_pixel(y: u16, u: u16, v: u16, m: &InverseMatrix) -> (u16, u16, u16) {
    const ROUNDING: i32 = 1 << (MATRIX_PRECISION - MATRIX_PRESHIFT - 1);
    let t = &m.transform;
    let y = y.clamp(m.luma_min, m.luma_max).saturating_sub(m.y_bias) as i32 >> MATRIX_PRESHIFT;
    let u = (u.clamp(m.chroma_min, m.chroma_max) as i32 - CHROMA_BIAS) >> MATRIX_PRESHIFT;
    let v = (v.clamp(m.chroma_min, m.chroma_max) as i32 - CHROMA_BIAS) >> MATRIX_PRESHIFT;

    let luma = t.y_coef * y + ROUNDING;
    let r = (luma + t.cr_coef * v) >> (MATRIX_PRECISION - MATRIX_PRESHIFT);
    let g = (luma - t.g_coeff_1 * v - t.g_coeff_2 * u) >> (MATRIX_PRECISION - MATRIX_PRESHIFT);
    let b = (luma + t.cb_coef * u) >> (MATRIX_PRECISION - MATRIX_PRESHIFT);
    (clamp_u16(r), clamp_u16(g), clamp_u16(b))
}

#[inline(always)]
pub(crate) fn rgb_to_ycbcr_pixel(
    r: u16,
    g: u16,
    b: u16,
    t: &CbCrForwardTransform<i32>,
) -> (u16, u16, u16) {
    const ROUNDING: i32 = 1 << (MATRIX_PRECISION - 1);
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let y = ((t.yr * r + t.yg * g + t.yb * b + ROUNDING) >> MATRIX_PRECISION) + (t.y_offset << 8);
    let cb = ((t.cb_r * r + t.cb_g * g + t.cb_b * b + ROUNDING) >> MATRIX_PRECISION) + CHROMA_BIAS;
    let cr = ((t.cr_r * r + t.cr_g * g + t.cr_b * b + ROUNDING) >> MATRIX_PRECISION) + CHROMA_BIAS;
    (clamp_u16(y), clamp_u16(cb), clamp_u16(cr))
}

pub(crate) fn ycbcr_to_rgb_scalar(
    y: &[u16],
    u: &[u16],
    v: &[u16],
    r: &mut [u16],
    g: &mut [u16],
    b: &mut [u16],
    matrix: &InverseMatrix,
) {
    for (((((&y, &u), &v), r), g), b) in y
        .iter()
        .zip(u.iter())
        .zip(v.iter())
        .zip(r.iter_mut())
        .zip(g.iter_mut())
        .zip(b.iter_mut())
    {
        (*r, *g, *b) = ycbcr_to_rgb_pixel(y, u, v, matrix);
    }
}

pub(crate) fn rgb_to_ycbcr_scalar(
    r: &[u16],
    g: &[u16],
    b: &[u16],
    y: &mut [u16],
    u: &mut [u16],
    v: &mut [u16],
    transform: &CbCrForwardTransform<i32>,
) {
    for (((((&r, &g), &b), y), u), v) in r
        .iter()
        .zip(g.iter())
        .zip(b.iter())
        .zip(y.iter_mut())
        .zip(u.iter_mut())
        .zip(v.iter_mut())
    {
        (*y, *u, *v) = rgb_to_ycbcr_pixel(r, g, b, transform);
    }
}

/// Converts a 4:4:4 YCbCr row at working precision to RGB.
///
/// In computer graphics range luma is saturated to 16..=235 and chroma to
/// 16..=240 (8-bit codes) before the matrix is applied. Output saturates to
/// the full 16-bit range. Every row must have the length of `y`.
pub fn ycbcr_to_rgb_row(
    y: &[u16],
    u: &[u16],
    v: &[u16],
    r: &mut [u16],
    g: &mut [u16],
    b: &mut [u16],
    color_space: ColorSpace,
) -> Result<(), PixelError> {
    let width = y.len();
    for len in [u.len(), v.len(), r.len(), g.len(), b.len()] {
        check_row_len(width, len)?;
    }
    let matrix = InverseMatrix::new(color_space);
    row_kernels().ycbcr_to_rgb(y, u, v, r, g, b, &matrix);
    Ok(())
}

/// Converts an RGB row at working precision to 4:4:4 YCbCr.
///
/// Every row must have the length of `r`.
pub fn rgb_to_ycbcr_row(
    r: &[u16],
    g: &[u16],
    b: &[u16],
    y: &mut [u16],
    u: &mut [u16],
    v: &mut [u16],
    color_space: ColorSpace,
) -> Result<(), PixelError> {
    let width = r.len();
    for len in [g.len(), b.len(), y.len(), u.len(), v.len()] {
        check_row_len(width, len)?;
    }
    let transform = get_built_forward_transform(color_space);
    row_kernels().rgb_to_ycbcr(r, g, b, y, u, v, transform);
    Ok(())
}

/// Re-targets YCbCr encoded with BT.601 coefficients to BT.709, in place.
///
/// Accepts 4:4:4 rows, or 4:2:2 rows where `u` and `v` hold
/// `y.len().div_ceil(2)` samples; luma uses the chroma it is sited with.
pub fn correct_601_to_709_row(
    y: &mut [u16],
    u: &mut [u16],
    v: &mut [u16],
) -> Result<(), PixelError> {
    let chroma_width = if u.len() < y.len() {
        y.len().div_ceil(2)
    } else {
        y.len()
    };
    check_row_len(chroma_width, u.len())?;
    check_row_len(chroma_width, v.len())?;
    correct_601_to_709_in_place(y, u, v);
    Ok(())
}

/// `u` and `v` are either full width or half width, see [correct_601_to_709_row]
pub(crate) fn correct_601_to_709_in_place(y: &mut [u16], u: &mut [u16], v: &mut [u16]) {
    let c = &CHROMA_CORRECTION_601_TO_709;
    let chroma_shift = if u.len() < y.len() { 1 } else { 0 };

    for (x, y) in y.iter_mut().enumerate() {
        let cx = x >> chroma_shift;
        let u = u[cx] as i32 - CHROMA_BIAS;
        let v = v[cx] as i32 - CHROMA_BIAS;
        let luma = ((*y as i32) << CORRECTION_PRECISION) + c.y_v * v + c.y_u * u;
        *y = clamp_u16(luma >> CORRECTION_PRECISION);
    }

    for (u, v) in u.iter_mut().zip(v.iter_mut()) {
        let cb = *u as i32 - CHROMA_BIAS;
        let cr = *v as i32 - CHROMA_BIAS;
        *u = clamp_u16(((c.u_u * cb + c.u_v * cr) >> CORRECTION_PRECISION) + CHROMA_BIAS);
        *v = clamp_u16(((c.v_u * cb + c.v_v * cr) >> CORRECTION_PRECISION) + CHROMA_BIAS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yuv_support::ColorStandard;

    const BT601_CG: ColorSpace = ColorSpace::new(ColorStandard::Bt601, ColorRange::ComputerGraphics);
    const BT709_VS: ColorSpace = ColorSpace::new(ColorStandard::Bt709, ColorRange::VideoSystems);

    fn to_ycbcr8(rgb8: u16, cs: ColorSpace) -> (u16, u16, u16) {
        let v = rgb8 << 8;
        let (y, u, v) = rgb_to_ycbcr_pixel(v, v, v, get_built_forward_transform(cs));
        (y >> 8, u >> 8, v >> 8)
    }

    #[test]
    fn test_bt601_cg_reference_grays() {
        for (rgb, expected_y) in [(0u16, 16i32), (255, 235), (128, 126)] {
            let (y, u, v) = to_ycbcr8(rgb, BT601_CG);
            assert!((y as i32 - expected_y).abs() <= 1, "{} -> {}", rgb, y);
            assert!((u as i32 - 128).abs() <= 1);
            assert!((v as i32 - 128).abs() <= 1);
        }
    }

    #[test]
    fn test_inverse_of_cg_black_and_white() {
        let m = InverseMatrix::new(BT601_CG);
        assert_eq!(ycbcr_to_rgb_pixel(16 << 8, 32768, 32768, &m), (0, 0, 0));
        let (r, g, b) = ycbcr_to_rgb_pixel(235 << 8, 32768, 32768, &m);
        for c in [r, g, b] {
            assert!(c >> 8 >= 254, "{}", c);
        }
    }

    #[test]
    fn test_cg_input_is_presaturated() {
        let m = InverseMatrix::new(BT601_CG);
        assert_eq!(
            ycbcr_to_rgb_pixel(0, 0, 0, &m),
            ycbcr_to_rgb_pixel(16 << 8, 16 << 8, 16 << 8, &m)
        );
        assert_eq!(
            ycbcr_to_rgb_pixel(u16::MAX, u16::MAX, u16::MAX, &m),
            ycbcr_to_rgb_pixel(235 << 8, 240 << 8, 240 << 8, &m)
        );
    }

    #[test]
    fn test_out_of_gamut_saturates_to_bounds() {
        let m = InverseMatrix::new(BT709_VS);
        let (r, _, b) = ycbcr_to_rgb_pixel(u16::MAX, u16::MAX, u16::MAX, &m);
        assert_eq!(r, u16::MAX);
        assert_eq!(b, u16::MAX);
        let (r, _, b) = ycbcr_to_rgb_pixel(0, 0, 0, &m);
        assert_eq!(r, 0);
        assert_eq!(b, 0);
        let (_, g, _) = ycbcr_to_rgb_pixel(0, u16::MAX, u16::MAX, &m);
        assert_eq!(g, 0);
    }

    #[test]
    fn test_vs_gray_round_trip() {
        let t = get_built_forward_transform(BT709_VS);
        let m = InverseMatrix::new(BT709_VS);
        for gray in [16u16 << 8, 128 << 8, 235 << 8] {
            let (y, u, v) = rgb_to_ycbcr_pixel(gray, gray, gray, t);
            assert_eq!((u, v), (32768, 32768));
            let (r, g, b) = ycbcr_to_rgb_pixel(y, u, v, &m);
            for c in [r, g, b] {
                assert!((c as i32 - gray as i32).abs() <= 4, "{} vs {}", c, gray);
            }
        }
    }

    #[test]
    fn test_rows_match_pixels() {
        let r: Vec<u16> = (0..37u16).map(|x| x.wrapping_mul(1771)).collect();
        let g: Vec<u16> = (0..37u16).map(|x| x.wrapping_mul(7919)).collect();
        let b: Vec<u16> = (0..37u16).map(|x| 65535 - x.wrapping_mul(997)).collect();
        let (mut y, mut u, mut v) = (vec![0u16; 37], vec![0u16; 37], vec![0u16; 37]);
        rgb_to_ycbcr_row(&r, &g, &b, &mut y, &mut u, &mut v, BT601_CG).unwrap();
        let t = get_built_forward_transform(BT601_CG);
        for x in 0..37 {
            assert_eq!((y[x], u[x], v[x]), rgb_to_ycbcr_pixel(r[x], g[x], b[x], t));
        }
        let (mut r2, mut g2, mut b2) = (vec![0u16; 37], vec![0u16; 37], vec![0u16; 37]);
        ycbcr_to_rgb_row(&y, &u, &v, &mut r2, &mut g2, &mut b2, BT601_CG).unwrap();
        let m = InverseMatrix::new(BT601_CG);
        for x in 0..37 {
            assert_eq!((r2[x], g2[x], b2[x]), ycbcr_to_rgb_pixel(y[x], u[x], v[x], &m));
        }
    }

    #[test]
    fn test_correction_keeps_neutral_gray() {
        let mut y = vec![16u16 << 8, 128 << 8, 235 << 8, 60000];
        let mut u = vec![32768u16; 2];
        let mut v = vec![32768u16; 2];
        let expected = y.clone();
        correct_601_to_709_row(&mut y, &mut u, &mut v).unwrap();
        assert_eq!(y, expected);
        assert_eq!(u, vec![32768; 2]);
        assert_eq!(v, vec![32768; 2]);
    }

    #[test]
    fn test_correction_moves_saturated_red() {
        let t = get_built_forward_transform(BT601_CG);
        let (y, u, v) = rgb_to_ycbcr_pixel(65280, 0, 0, t);
        let (mut ys, mut us, mut vs) = (vec![y], vec![u], vec![v]);
        correct_601_to_709_row(&mut ys, &mut us, &mut vs).unwrap();
        let t709 = get_built_forward_transform(ColorSpace::new(
            ColorStandard::Bt709,
            ColorRange::ComputerGraphics,
        ));
        let (y709, _, v709) = rgb_to_ycbcr_pixel(65280, 0, 0, t709);
        assert!((ys[0] as i32 - y709 as i32).abs() < 512, "{} vs {}", ys[0], y709);
        assert!((vs[0] as i32 - v709 as i32).abs() < 512, "{} vs {}", vs[0], v709);
    }

    #[test]
    fn test_row_length_mismatch_is_rejected_before_any_write() {
        let y = vec![1u16 << 14; 16];
        let half = vec![32768u16; 8];
        let (mut r, mut g, mut b) = (vec![7u16; 16], vec![7u16; 16], vec![7u16; 16]);
        assert_eq!(
            ycbcr_to_rgb_row(&y, &half, &half, &mut r, &mut g, &mut b, BT601_CG),
            Err(PixelError::PlaneSizeMismatch(crate::MismatchedSize {
                expected: 16,
                received: 8
            }))
        );
        assert_eq!(r, vec![7u16; 16]);

        let mut short = vec![0u16; 15];
        let (mut u, mut v) = (vec![0u16; 16], vec![0u16; 16]);
        assert!(rgb_to_ycbcr_row(&r, &g, &b, &mut short, &mut u, &mut v, BT601_CG).is_err());
        assert!(rgb_to_ycbcr_row(&r, &g, &b[..15], &mut u, &mut v, &mut r.clone(), BT601_CG)
            .is_err());

        let mut luma = vec![1u16 << 14; 16];
        let (mut cu, mut cv) = (vec![32768u16; 8], vec![32768u16; 7]);
        assert!(correct_601_to_709_row(&mut luma, &mut cu, &mut cv).is_err());
        let mut cv = vec![32768u16; 8];
        assert!(correct_601_to_709_row(&mut luma, &mut cu, &mut cv).is_ok());
        let (mut cu, mut cv) = (vec![32768u16; 5], vec![32768u16; 5]);
        assert!(correct_601_to_709_row(&mut luma, &mut cu, &mut cv).is_err());
    }
}
