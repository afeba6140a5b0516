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
use crate::built_coefficients::ALPHA_CURVE;
use crate::dither::DitherSource;
use crate::kernels::{AlignedScratch, RowKernels};

/// Precision every conversion runs at between load and store.
pub const WORKING_BIT_DEPTH: u32 = 16;

const ALPHA_BIT_DEPTH: u32 = 12;

#[inline(always)]
const fn max_colors(bit_depth: u32) -> u32 {
    (1u32 << bit_depth) - 1
}

/// Moves an unsigned sample to working precision.
///
/// Values above the range of `from_bits` saturate first.
#[inline]
pub fn widen(v: u16, from_bits: u32) -> u16 {
    let max = max_colors(from_bits) as u16;
    v.min(max) << (WORKING_BIT_DEPTH - from_bits)
}

/// Number of random bits added when dropping `shift` bits of precision.
#[inline(always)]
pub(crate) const fn dither_bits(shift: u32) -> u32 {
    shift.saturating_sub(1)
}

/// Drops a working sample to `to_bits`, `dither` must be below `2^(16 - to_bits - 1)`.
#[inline]
pub fn narrow_with_dither(v: u16, to_bits: u32, dither: u16) -> u16 {
    let shift = WORKING_BIT_DEPTH - to_bits;
    let max = max_colors(to_bits);
    ((v as u32 + dither as u32) >> shift).min(max) as u16
}

/// Rescales a signed intermediate sample between precisions.
///
/// Negative values and values beyond the unsigned range of `to_bits` saturate,
/// narrowing shifts on a biased value so that negatives floor instead of
/// truncating toward zero.
#[inline]
pub fn rescale_signed(v: i16, from_bits: u32, to_bits: u32, dither: u16) -> u16 {
    let bias = 1i32 << (from_bits + 1);
    let max = max_colors(to_bits) as i32;
    let biased = v as i32 + bias;
    let rescaled = if to_bits >= from_bits {
        let shift = to_bits - from_bits;
        (biased << shift) - (bias << shift)
    } else {
        let shift = from_bits - to_bits;
        ((biased + dither as i32) >> shift) - (bias >> shift)
    };
    rescaled.clamp(0, max) as u16
}

/// Converts companded alpha at working precision to linear alpha.
#[inline]
pub fn decompand_alpha(stored: u16) -> u16 {
    let curve = &ALPHA_CURVE;
    let a12 = (stored >> (WORKING_BIT_DEPTH - ALPHA_BIT_DEPTH)) as i32;
    let linear = (((a12 << curve.fixed_shift) - (curve.dc_offset << curve.fixed_shift))
        * curve.gain)
        >> curve.normalize_shift;
    (linear.clamp(0, max_colors(ALPHA_BIT_DEPTH) as i32) as u16)
        << (WORKING_BIT_DEPTH - ALPHA_BIT_DEPTH)
}

/// Converts linear alpha at working precision to the companded curve.
#[inline]
pub fn compand_alpha(linear: u16) -> u16 {
    let curve = &ALPHA_CURVE;
    let lin12 = (linear >> (WORKING_BIT_DEPTH - ALPHA_BIT_DEPTH)) as i32;
    let stored = ((lin12 * curve.encode_gain) >> 8) + curve.dc_offset;
    (stored.clamp(0, max_colors(ALPHA_BIT_DEPTH) as i32) as u16)
        << (WORKING_BIT_DEPTH - ALPHA_BIT_DEPTH)
}

/// Buffers a [RowNarrower] hands from one row to the next
#[derive(Default)]
pub(crate) struct NarrowScratch {
    noise: Vec<u16>,
    rows: Vec<Vec<u16>>,
    aligned: AlignedScratch,
}

/// Row narrowing bound to one dither source and the selected kernels.
///
/// Noise for a row is drawn before the kernel runs, so every kernel consumes
/// the same values in the same order.
pub(crate) struct RowNarrower<'a> {
    dither: &'a mut dyn DitherSource,
    kernels: &'static dyn RowKernels,
    scratch: NarrowScratch,
}

impl<'a> RowNarrower<'a> {
    #[cfg(test)]
    pub(crate) fn new(dither: &'a mut dyn DitherSource, kernels: &'static dyn RowKernels) -> Self {
        RowNarrower::with_scratch(dither, kernels, NarrowScratch::default())
    }

    pub(crate) fn with_scratch(
        dither: &'a mut dyn DitherSource,
        kernels: &'static dyn RowKernels,
        scratch: NarrowScratch,
    ) -> Self {
        RowNarrower {
            dither,
            kernels,
            scratch,
        }
    }

    /// Gives the buffers back for the next row
    pub(crate) fn into_scratch(self) -> NarrowScratch {
        self.scratch
    }

    pub(crate) fn kernels(&self) -> &'static dyn RowKernels {
        self.kernels
    }

    /// Narrows `src` from working precision into `dst` at `to_bits`
    pub(crate) fn narrow(&mut self, src: &[u16], to_bits: u32, dst: &mut [u16]) {
        let dst = &mut dst[..src.len()];
        let shift = WORKING_BIT_DEPTH - to_bits;
        if shift == 0 {
            dst.copy_from_slice(src);
            return;
        }
        let noise = &mut self.scratch.noise;
        if noise.len() < src.len() {
            noise.resize(src.len(), 0);
        }
        let noise = &mut noise[..src.len()];
        self.dither.fill(noise, dither_bits(shift));
        self.kernels.narrow(src, noise, shift, dst);
    }

    /// Zeroed row of `len` samples, reusing a recycled buffer when one is left
    pub(crate) fn take_row(&mut self, len: usize) -> Vec<u16> {
        let mut row = self.scratch.rows.pop().unwrap_or_default();
        row.clear();
        row.resize(len, 0);
        row
    }

    /// Narrows into a row from [RowNarrower::take_row]
    pub(crate) fn narrowed(&mut self, src: &[u16], to_bits: u32) -> Vec<u16> {
        let mut dst = self.take_row(src.len());
        self.narrow(src, to_bits, &mut dst);
        dst
    }

    /// Returns rows from [RowNarrower::narrowed] or [RowNarrower::take_row]
    pub(crate) fn recycle<const N: usize>(&mut self, rows: [Vec<u16>; N]) {
        self.scratch.rows.extend(rows);
    }

    /// Byte row with an aligned start, kept across rows
    pub(crate) fn aligned_bytes(&mut self, len: usize) -> &mut [u8] {
        self.scratch.aligned.bytes_mut(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{NoDither, RandomDither};
    use crate::kernels::row_kernels;

    #[test]
    fn test_widen_then_narrow_is_exact() {
        for bits in [8u32, 10, 12, 13, 16] {
            let max = max_colors(bits) as u16;
            let shift = WORKING_BIT_DEPTH - bits;
            let largest_dither = if shift == 0 { 0 } else { (1u16 << dither_bits(shift)) - 1 };
            for v in [0u16, 1, max / 2, max - 1, max] {
                let wide = widen(v, bits);
                assert_eq!(narrow_with_dither(wide, bits, 0), v);
                assert_eq!(narrow_with_dither(wide, bits, largest_dither), v);
            }
        }
    }

    #[test]
    fn test_widen_saturates_out_of_range_input() {
        assert_eq!(widen(1023, 8), 255 << 8);
        assert_eq!(widen(0xFFFF, 10), 1023 << 6);
    }

    #[test]
    fn test_narrow_saturates_at_max() {
        assert_eq!(narrow_with_dither(0xFFFF, 8, 127), 255);
        assert_eq!(narrow_with_dither(0xFFFF, 13, 3), 8191);
        assert_eq!(narrow_with_dither(0xFFFF, 10, 31), 1023);
    }

    #[test]
    fn test_dither_stays_in_band_with_unbiased_mean() {
        let mut dither = RandomDither::seeded(0x5EED);
        for value in [128u16 * 256 + 64, 128 * 256 + 154, 128 * 256 + 205, 77 * 256] {
            let exact = value as f64 / 256.0;
            let floor = value >> 8;
            let mut sum = 0u64;
            const TRIALS: usize = 1000;
            for _ in 0..TRIALS {
                let d = dither.next_bits(dither_bits(8));
                let narrowed = narrow_with_dither(value, 8, d);
                assert!(narrowed == floor || narrowed == floor + 1, "{}", narrowed);
                sum += narrowed as u64;
            }
            let mean = sum as f64 / TRIALS as f64;
            assert!((mean - exact).abs() <= 0.5, "mean {} exact {}", mean, exact);
        }
    }

    #[test]
    fn test_signed_rescale_clamps_negatives() {
        assert_eq!(rescale_signed(-100, 13, 8, 0), 0);
        assert_eq!(rescale_signed(-1, 12, 8, 7), 0);
        assert_eq!(rescale_signed(8191, 13, 8, 0), 255);
        assert_eq!(rescale_signed(9000, 13, 8, 0), 255);
        assert_eq!(rescale_signed(4095, 12, 16, 0), 4095 << 4);
        assert_eq!(rescale_signed(-4, 12, 16, 0), 0);
        assert_eq!(rescale_signed(4096, 13, 8, 0), 128);
        assert_eq!(rescale_signed(100, 13, 13, 0), 100);
    }

    #[test]
    fn test_signed_rescale_matches_unsigned_for_positive_values() {
        for v in (0..8192i16).step_by(37) {
            assert_eq!(
                rescale_signed(v, 13, 16, 0),
                widen(v as u16, 13),
                "value {}",
                v
            );
            let wide = widen(v as u16, 13);
            assert_eq!(
                rescale_signed(v, 13, 8, 0),
                narrow_with_dither(wide, 8, 0),
                "value {}",
                v
            );
        }
    }

    #[test]
    fn test_alpha_companding_endpoints() {
        let opaque = compand_alpha(0xFFF0);
        assert!(opaque <= 0xFFF0);
        let restored = decompand_alpha(opaque);
        assert!((restored as i32 - 0xFFF0).abs() <= 4 << 4, "{:#x}", restored);
        assert_eq!(decompand_alpha(compand_alpha(0)), 0);
        assert_eq!(compand_alpha(0), 256 << 4);
        assert_eq!(decompand_alpha(0), 0);
    }

    #[test]
    fn test_row_narrower_without_dither_truncates() {
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, row_kernels());
        let src: Vec<u16> = (0..100u16).map(|x| x * 655).collect();
        let dst = narrower.narrowed(&src, 8);
        for (s, d) in src.iter().zip(dst.iter()) {
            assert_eq!(*d, s >> 8);
        }
        let same = narrower.narrowed(&src, 16);
        assert_eq!(same, src);
    }

    #[test]
    fn test_row_narrower_reuses_recycled_rows() {
        let mut dither = NoDither;
        let mut narrower = RowNarrower::new(&mut dither, row_kernels());
        let src = vec![0xFFFFu16; 64];
        let first = narrower.narrowed(&src, 10);
        let ptr = first.as_ptr();
        narrower.recycle([first]);
        let scratch = narrower.into_scratch();

        let mut dither = NoDither;
        let mut narrower = RowNarrower::with_scratch(&mut dither, row_kernels(), scratch);
        let zeroed = narrower.take_row(32);
        assert_eq!(zeroed.as_ptr(), ptr);
        assert_eq!(zeroed, vec![0u16; 32]);
        narrower.recycle([zeroed]);
        let again = narrower.narrowed(&src[..16], 10);
        assert_eq!(again.as_ptr(), ptr);
        assert_eq!(again, vec![1023u16; 16]);
    }
}
