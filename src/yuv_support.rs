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
use crate::PixelError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CbCrInverseTransform<T> {
    pub y_coef: T,
    pub cr_coef: T,
    pub cb_coef: T,
    pub g_coeff_1: T,
    pub g_coeff_2: T,
    /// Luma black level in 8-bit code values
    pub y_offset: T,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct CbCrForwardTransform<T> {
    pub yr: T,
    pub yg: T,
    pub yb: T,
    pub cb_r: T,
    pub cb_g: T,
    pub cb_b: T,
    pub cr_r: T,
    pub cr_g: T,
    pub cr_b: T,
    /// Luma black level in 8-bit code values
    pub y_offset: T,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Color difference standard, see ITU-R BT.601 and BT.709
pub enum ColorStandard {
    Bt601 = 0,
    Bt709 = 1,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Declares which range RGB values use
pub enum ColorRange {
    /// Computer graphics RGB, 0..=255 maps onto luma 16..=235
    ComputerGraphics = 0,
    /// Video systems RGB, RGB keeps the legal 16..=235 broadcast range
    VideoSystems = 1,
}

/// Color space of one conversion call.
///
/// Exactly one standard and one range is active, the two flags are independent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ColorSpace {
    pub standard: ColorStandard,
    pub range: ColorRange,
    /// Stream metadata bit asking for 4:2:2 chroma to be resampled to 4:4:4.
    /// Kept for the flag round trip; expansion to 4:4:4 always interpolates
    /// odd columns, see [crate::upsample_422_to_444].
    pub resample_422_to_444: bool,
    /// Treats YCbCr input as mis-tagged BT.601 and corrects it to BT.709
    pub correct_601_to_709: bool,
}

impl ColorSpace {
    pub const FLAG_BT_601: u32 = 0x01;
    pub const FLAG_BT_709: u32 = 0x02;
    pub const FLAG_VS_RGB: u32 = 0x04;
    pub const FLAG_422_TO_444: u32 = 0x08;
    pub const FLAG_601_TO_709: u32 = 0x20;

    const KNOWN_FLAGS: u32 = Self::FLAG_BT_601
        | Self::FLAG_BT_709
        | Self::FLAG_VS_RGB
        | Self::FLAG_422_TO_444
        | Self::FLAG_601_TO_709;

    pub const fn new(standard: ColorStandard, range: ColorRange) -> ColorSpace {
        ColorSpace {
            standard,
            range,
            resample_422_to_444: false,
            correct_601_to_709: false,
        }
    }

    pub const fn with_422_to_444_resampling(mut self, resample: bool) -> ColorSpace {
        self.resample_422_to_444 = resample;
        self
    }

    pub const fn with_601_to_709_correction(mut self, correct: bool) -> ColorSpace {
        self.correct_601_to_709 = correct;
        self
    }

    /// Decodes color space bit mask carried in stream metadata.
    ///
    /// Fails when neither or both standards are set or unknown bits are present,
    /// there is no implicit default.
    pub fn from_flags(flags: u32) -> Result<ColorSpace, PixelError> {
        if flags & !Self::KNOWN_FLAGS != 0 {
            return Err(PixelError::UnknownColorSpace(flags));
        }
        let standard = match (flags & Self::FLAG_BT_601 != 0, flags & Self::FLAG_BT_709 != 0) {
            (true, false) => ColorStandard::Bt601,
            (false, true) => ColorStandard::Bt709,
            _ => return Err(PixelError::UnknownColorSpace(flags)),
        };
        let range = if flags & Self::FLAG_VS_RGB != 0 {
            ColorRange::VideoSystems
        } else {
            ColorRange::ComputerGraphics
        };
        Ok(ColorSpace {
            standard,
            range,
            resample_422_to_444: flags & Self::FLAG_422_TO_444 != 0,
            correct_601_to_709: flags & Self::FLAG_601_TO_709 != 0,
        })
    }

    pub const fn to_flags(&self) -> u32 {
        let mut flags = match self.standard {
            ColorStandard::Bt601 => Self::FLAG_BT_601,
            ColorStandard::Bt709 => Self::FLAG_BT_709,
        };
        if matches!(self.range, ColorRange::VideoSystems) {
            flags |= Self::FLAG_VS_RGB;
        }
        if self.resample_422_to_444 {
            flags |= Self::FLAG_422_TO_444;
        }
        if self.correct_601_to_709 {
            flags |= Self::FLAG_601_TO_709;
        }
        flags
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChromaSampling {
    Yuv420 = 0,
    Yuv422 = 1,
    Yuv444 = 2,
}

impl ChromaSampling {
    #[inline]
    pub const fn chroma_width(self, width: usize) -> usize {
        match self {
            ChromaSampling::Yuv420 | ChromaSampling::Yuv422 => width.div_ceil(2),
            ChromaSampling::Yuv444 => width,
        }
    }

    #[inline]
    pub const fn chroma_height(self, height: usize) -> usize {
        match self {
            ChromaSampling::Yuv420 => height.div_ceil(2),
            ChromaSampling::Yuv422 | ChromaSampling::Yuv444 => height,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Tag of a canonical sample plane
pub enum PlaneChannel {
    Luma = 0,
    ChromaU = 1,
    ChromaV = 2,
    Red = 3,
    Green = 4,
    Blue = 5,
    Alpha = 6,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// How alpha samples are encoded
pub enum AlphaEncoding {
    Linear = 0,
    /// Stored through the codec companding curve, see [crate::AlphaCurve]
    Companded = 1,
}

#[repr(usize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Yuy2Description {
    YUYV = 0,
    UYVY = 1,
    YVYU = 2,
}

impl Yuy2Description {
    #[inline]
    pub(crate) const fn get_u_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 1,
            Yuy2Description::UYVY => 0,
            Yuy2Description::YVYU => 3,
        }
    }

    #[inline]
    pub(crate) const fn get_v_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 3,
            Yuy2Description::UYVY => 2,
            Yuy2Description::YVYU => 1,
        }
    }

    #[inline(always)]
    pub(crate) const fn get_first_y_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 0,
            Yuy2Description::UYVY => 1,
            Yuy2Description::YVYU => 0,
        }
    }

    #[inline]
    pub(crate) const fn get_second_y_position(&self) -> usize {
        match self {
            Yuy2Description::YUYV => 2,
            Yuy2Description::UYVY => 3,
            Yuy2Description::YVYU => 2,
        }
    }
}

#[repr(usize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Bit placement of 10-bit-per-channel RGB stored in a 32-bit word
pub(crate) enum Rgb10Layout {
    /// R in bits 0..10, G 10..20, B 20..30, top bits zero
    Rg30 = 0,
    /// R in bits 0..10, G 10..20, B 20..30, 2-bit alpha
    Ab10 = 1,
    /// B in bits 0..10, G 10..20, R 20..30, 2-bit alpha
    Ar10 = 2,
    /// Big-endian R in bits 20..30, G 10..20, B 0..10
    R210 = 3,
    /// Big-endian R in bits 22..32, G 12..22, B 2..12
    Dpx0 = 4,
}

impl Rgb10Layout {
    #[inline(always)]
    pub(crate) const fn shifts(&self) -> (u32, u32, u32) {
        match self {
            Rgb10Layout::Rg30 | Rgb10Layout::Ab10 => (0, 10, 20),
            Rgb10Layout::Ar10 | Rgb10Layout::R210 => (20, 10, 0),
            Rgb10Layout::Dpx0 => (22, 12, 2),
        }
    }

    #[inline(always)]
    pub(crate) const fn has_alpha(&self) -> bool {
        matches!(self, Rgb10Layout::Ab10 | Rgb10Layout::Ar10)
    }

    #[inline(always)]
    pub(crate) const fn is_byte_swapped(&self) -> bool {
        matches!(self, Rgb10Layout::R210 | Rgb10Layout::Dpx0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_space_flags_decode() {
        let cs = ColorSpace::from_flags(ColorSpace::FLAG_BT_709 | ColorSpace::FLAG_VS_RGB).unwrap();
        assert_eq!(cs.standard, ColorStandard::Bt709);
        assert_eq!(cs.range, ColorRange::VideoSystems);
        assert!(!cs.resample_422_to_444);
        assert!(!cs.correct_601_to_709);

        let cs = ColorSpace::from_flags(
            ColorSpace::FLAG_BT_601 | ColorSpace::FLAG_422_TO_444 | ColorSpace::FLAG_601_TO_709,
        )
        .unwrap();
        assert_eq!(cs.standard, ColorStandard::Bt601);
        assert_eq!(cs.range, ColorRange::ComputerGraphics);
        assert!(cs.resample_422_to_444);
        assert!(cs.correct_601_to_709);
        assert_eq!(ColorSpace::from_flags(cs.to_flags()), Ok(cs));
    }

    #[test]
    fn test_color_space_without_standard_is_rejected() {
        assert_eq!(
            ColorSpace::from_flags(0),
            Err(PixelError::UnknownColorSpace(0))
        );
        assert_eq!(
            ColorSpace::from_flags(ColorSpace::FLAG_VS_RGB),
            Err(PixelError::UnknownColorSpace(ColorSpace::FLAG_VS_RGB))
        );
    }

    #[test]
    fn test_color_space_with_both_standards_is_rejected() {
        let flags = ColorSpace::FLAG_BT_601 | ColorSpace::FLAG_BT_709;
        assert_eq!(
            ColorSpace::from_flags(flags),
            Err(PixelError::UnknownColorSpace(flags))
        );
        assert_eq!(
            ColorSpace::from_flags(0x101),
            Err(PixelError::UnknownColorSpace(0x101))
        );
    }

    #[test]
    fn test_yuy2_positions_are_permutations() {
        for description in [
            Yuy2Description::YUYV,
            Yuy2Description::UYVY,
            Yuy2Description::YVYU,
        ] {
            let mut seen = [false; 4];
            seen[description.get_first_y_position()] = true;
            seen[description.get_second_y_position()] = true;
            seen[description.get_u_position()] = true;
            seen[description.get_v_position()] = true;
            assert!(seen.iter().all(|&x| x), "{:?}", description);
        }
    }
}
