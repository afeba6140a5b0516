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
use crate::yuv_support::{
    CbCrForwardTransform, CbCrInverseTransform, ColorRange, ColorSpace, ColorStandard,
};

/// Fractional bits of every matrix coefficient in this table
pub(crate) const MATRIX_PRECISION: i32 = 8;

/// Operands of the inverse transform are shifted down by this amount before
/// multiplication, keeping products of 16-bit samples below 2^25.
pub(crate) const MATRIX_PRESHIFT: i32 = 2;

static FORWARD_BT601_CG_Q8: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 66,
    yg: 129,
    yb: 25,
    cb_r: -38,
    cb_g: -74,
    cb_b: 112,
    cr_r: 112,
    cr_g: -94,
    cr_b: -18,
    y_offset: 16,
};

static FORWARD_BT709_CG_Q8: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 47,
    yg: 157,
    yb: 16,
    cb_r: -26,
    cb_g: -86,
    cb_b: 112,
    cr_r: 112,
    cr_g: -102,
    cr_b: -10,
    y_offset: 16,
};

static FORWARD_BT601_VS_Q8: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 77,
    yg: 150,
    yb: 29,
    cb_r: -44,
    cb_g: -87,
    cb_b: 131,
    cr_r: 131,
    cr_g: -110,
    cr_b: -21,
    y_offset: 0,
};

static FORWARD_BT709_VS_Q8: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 54,
    yg: 183,
    yb: 19,
    cb_r: -30,
    cb_g: -101,
    cb_b: 131,
    cr_r: 131,
    cr_g: -119,
    cr_b: -12,
    y_offset: 0,
};

static INVERSE_BT601_CG_Q8: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 298,
    cr_coef: 409,
    cb_coef: 516,
    g_coeff_1: 208,
    g_coeff_2: 100,
    y_offset: 16,
};

static INVERSE_BT709_CG_Q8: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 298,
    cr_coef: 459,
    cb_coef: 541,
    g_coeff_1: 136,
    g_coeff_2: 55,
    y_offset: 16,
};

static INVERSE_BT601_VS_Q8: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 256,
    cr_coef: 351,
    cb_coef: 444,
    g_coeff_1: 179,
    g_coeff_2: 86,
    y_offset: 0,
};

static INVERSE_BT709_VS_Q8: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 256,
    cr_coef: 394,
    cb_coef: 464,
    g_coeff_1: 117,
    g_coeff_2: 47,
    y_offset: 0,
};

/// RGB to YCbCr multipliers, 8 fractional bits.
pub(crate) fn get_built_forward_transform(color_space: ColorSpace) -> &'static CbCrForwardTransform<i32> {
    match (color_space.standard, color_space.range) {
        (ColorStandard::Bt601, ColorRange::ComputerGraphics) => &FORWARD_BT601_CG_Q8,
        (ColorStandard::Bt709, ColorRange::ComputerGraphics) => &FORWARD_BT709_CG_Q8,
        (ColorStandard::Bt601, ColorRange::VideoSystems) => &FORWARD_BT601_VS_Q8,
        (ColorStandard::Bt709, ColorRange::VideoSystems) => &FORWARD_BT709_VS_Q8,
    }
}

/// YCbCr to RGB multipliers, 8 fractional bits.
pub(crate) fn get_built_inverse_transform(color_space: ColorSpace) -> &'static CbCrInverseTransform<i32> {
    match (color_space.standard, color_space.range) {
        (ColorStandard::Bt601, ColorRange::ComputerGraphics) => &INVERSE_BT601_CG_Q8,
        (ColorStandard::Bt709, ColorRange::ComputerGraphics) => &INVERSE_BT709_CG_Q8,
        (ColorStandard::Bt601, ColorRange::VideoSystems) => &INVERSE_BT601_VS_Q8,
        (ColorStandard::Bt709, ColorRange::VideoSystems) => &INVERSE_BT709_VS_Q8,
    }
}

/// Calibration of the alpha companding curve.
///
/// Companded alpha is a 12-bit value lifted by `dc_offset`; decoding removes
/// the lift and rescales by `gain / 2^13`, encoding applies `encode_gain / 2^8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AlphaCurve {
    pub dc_offset: i32,
    pub gain: i32,
    pub encode_gain: i32,
    /// Shift applied to the stored value before the offset is removed
    pub fixed_shift: i32,
    pub normalize_shift: i32,
}

pub(crate) static ALPHA_CURVE: AlphaCurve = AlphaCurve {
    dc_offset: 256,
    gain: 9400,
    encode_gain: 223,
    fixed_shift: 3,
    normalize_shift: 16,
};

/// BT.601 to BT.709 YCbCr correction, 10 fractional bits
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ChromaCorrection {
    pub(crate) y_u: i32,
    pub(crate) y_v: i32,
    pub(crate) u_u: i32,
    pub(crate) u_v: i32,
    pub(crate) v_u: i32,
    pub(crate) v_v: i32,
}

pub(crate) const CORRECTION_PRECISION: i32 = 10;

pub(crate) static CHROMA_CORRECTION_601_TO_709: ChromaCorrection = ChromaCorrection {
    y_u: -118,
    y_v: -212,
    u_u: 1043,
    u_v: 117,
    v_u: 77,
    v_v: 1050,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn kr_kb(standard: ColorStandard) -> (f64, f64) {
        match standard {
            ColorStandard::Bt601 => (0.299, 0.114),
            ColorStandard::Bt709 => (0.2126, 0.0722),
        }
    }

    fn all_color_spaces() -> [ColorSpace; 4] {
        [
            ColorSpace::new(ColorStandard::Bt601, ColorRange::ComputerGraphics),
            ColorSpace::new(ColorStandard::Bt709, ColorRange::ComputerGraphics),
            ColorSpace::new(ColorStandard::Bt601, ColorRange::VideoSystems),
            ColorSpace::new(ColorStandard::Bt709, ColorRange::VideoSystems),
        ]
    }

    #[test]
    fn test_forward_rows_have_nominal_gain() {
        for cs in all_color_spaces() {
            let t = get_built_forward_transform(cs);
            let y_sum = t.yr + t.yg + t.yb;
            match cs.range {
                ColorRange::ComputerGraphics => assert_eq!(y_sum, 220, "{:?}", cs),
                ColorRange::VideoSystems => assert_eq!(y_sum, 256, "{:?}", cs),
            }
            assert_eq!(t.cb_r + t.cb_g + t.cb_b, 0, "{:?}", cs);
            assert_eq!(t.cr_r + t.cr_g + t.cr_b, 0, "{:?}", cs);
        }
    }

    #[test]
    fn test_inverse_literals_match_itu_derivation() {
        for cs in all_color_spaces() {
            let (kr, kb) = kr_kb(cs.standard);
            let kg = 1.0 - kr - kb;
            let (y_scale, uv_scale) = match cs.range {
                ColorRange::ComputerGraphics => (255.0 / 219.0, 255.0 / 224.0),
                ColorRange::VideoSystems => (1.0, 219.0 / 224.0),
            };
            let scale = (1 << MATRIX_PRECISION) as f64;
            let t = get_built_inverse_transform(cs);
            let expected = [
                y_scale * scale,
                2.0 * (1.0 - kr) * uv_scale * scale,
                2.0 * (1.0 - kb) * uv_scale * scale,
                2.0 * (1.0 - kr) * kr / kg * uv_scale * scale,
                2.0 * (1.0 - kb) * kb / kg * uv_scale * scale,
            ];
            let got = [t.y_coef, t.cr_coef, t.cb_coef, t.g_coeff_1, t.g_coeff_2];
            for (e, g) in expected.iter().zip(got.iter()) {
                assert!((e - *g as f64).abs() <= 1.0, "{:?}: {} vs {}", cs, e, g);
            }
        }
    }

    #[test]
    fn test_alpha_curve_is_near_identity_round_trip() {
        let c = ALPHA_CURVE;
        let linear = 4095;
        let stored = ((linear * c.encode_gain) >> 8) + c.dc_offset;
        let decoded = (((stored << c.fixed_shift) - (c.dc_offset << c.fixed_shift)) * c.gain)
            >> c.normalize_shift;
        assert!((decoded - linear).abs() <= 4, "{} vs {}", decoded, linear);
    }
}
