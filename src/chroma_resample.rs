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
#![forbid(unsafe_code)]
use crate::pixel_error::{check_row_len, PixelError};

/// Horizontal 4:4:4 to 4:2:2 filter
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ChromaDecimation {
    /// Rounded mean of the two samples a chroma sample replaces
    #[default]
    Average,
    /// Keeps the even column, exact inverse of [upsample_422_to_444]
    CoSited,
}

/// Expands one 4:2:2 chroma row to full width.
///
/// Even columns copy the chroma sample they are sited on, odd columns take the
/// rounded mean with the next chroma sample. The last pair repeats its sample,
/// nothing past the row is read. `dst.len()` is the luma width, `src` must hold
/// exactly `dst.len().div_ceil(2)` samples.
pub fn upsample_422_to_444(src: &[u16], dst: &mut [u16]) -> Result<(), PixelError> {
    check_row_len(dst.len().div_ceil(2), src.len())?;
    upsample_row(src, dst);
    Ok(())
}

/// Reduces a full width chroma row to 4:2:2.
///
/// `src.len()` is the luma width, `dst` must hold exactly
/// `src.len().div_ceil(2)` samples; a trailing odd column is taken as is.
pub fn downsample_444_to_422(
    src: &[u16],
    dst: &mut [u16],
    decimation: ChromaDecimation,
) -> Result<(), PixelError> {
    check_row_len(src.len().div_ceil(2), dst.len())?;
    downsample_row(src, dst, decimation);
    Ok(())
}

/// Lengths are the caller's responsibility, see [upsample_422_to_444]
pub(crate) fn upsample_row(src: &[u16], dst: &mut [u16]) {
    for (k, (pair, &c)) in dst.chunks_mut(2).zip(src.iter()).enumerate() {
        pair[0] = c;
        if pair.len() == 2 {
            pair[1] = match src.get(k + 1) {
                Some(&next) => ((c as u32 + next as u32 + 1) >> 1) as u16,
                None => c,
            };
        }
    }
}

pub(crate) fn downsample_row(src: &[u16], dst: &mut [u16], decimation: ChromaDecimation) {
    for (dst, pair) in dst.iter_mut().zip(src.chunks(2)) {
        *dst = match (decimation, pair) {
            (ChromaDecimation::Average, &[a, b]) => ((a as u32 + b as u32 + 1) >> 1) as u16,
            _ => pair[0],
        };
    }
}

/// Row of a 4:2:2 image whose chroma represents row pair `pair` of a 4:2:0 image.
///
/// The odd row of each pair is selected without vertical filtering, a trailing
/// unpaired row stands for itself. Consumers matching existing 4:2:0 content
/// depend on this exact choice.
#[inline]
pub fn decimation_row(pair: usize, height: usize) -> usize {
    (pair * 2 + 1).min(height.saturating_sub(1))
}

/// Whether the chroma of row `row` is kept when decimating vertically
#[inline]
pub fn is_decimation_row(row: usize, height: usize) -> bool {
    decimation_row(row / 2, height) == row
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_upsample_averages_neighbours() {
        let src = [100u16, 200, 300];
        let mut dst = [0u16; 6];
        upsample_422_to_444(&src, &mut dst).unwrap();
        assert_eq!(dst, [100, 150, 200, 250, 300, 300]);
    }

    #[test]
    fn test_upsample_rounds_half_up() {
        let src = [0u16, 65535, 7, 8];
        let mut dst = [0u16; 8];
        upsample_422_to_444(&src, &mut dst).unwrap();
        assert_eq!(dst, [0, 32768, 65535, 32771, 7, 8, 8, 8]);
    }

    #[test]
    fn test_upsample_odd_width_does_not_overrun() {
        let src = [10u16, 21];
        let mut dst = [0u16; 3];
        upsample_422_to_444(&src, &mut dst).unwrap();
        assert_eq!(dst, [10, 16, 21]);
    }

    #[test]
    fn test_mismatched_rows_are_rejected() {
        let mut dst = [0u16; 8];
        assert_eq!(
            upsample_422_to_444(&[1, 2], &mut dst),
            Err(PixelError::PlaneSizeMismatch(crate::MismatchedSize {
                expected: 4,
                received: 2
            }))
        );
        assert_eq!(dst, [0; 8]);
        assert!(upsample_422_to_444(&[1, 2, 3, 4, 5], &mut dst).is_err());

        let mut half = [0u16; 3];
        assert_eq!(
            downsample_444_to_422(&[1u16; 8], &mut half, ChromaDecimation::Average),
            Err(PixelError::PlaneSizeMismatch(crate::MismatchedSize {
                expected: 4,
                received: 3
            }))
        );
        assert!(downsample_444_to_422(&[1u16; 5], &mut half, ChromaDecimation::CoSited).is_ok());
    }

    #[test]
    fn test_cosited_decimation_inverts_upsampling() {
        let mut rng = rand::rng();
        for width in [2usize, 6, 64, 130] {
            let src: Vec<u16> = (0..width / 2).map(|_| rng.random()).collect();
            let mut full = vec![0u16; width];
            upsample_422_to_444(&src, &mut full).unwrap();
            let mut back = vec![0u16; width / 2];
            downsample_444_to_422(&full, &mut back, ChromaDecimation::CoSited).unwrap();
            assert_eq!(back, src);
        }
    }

    #[test]
    fn test_average_decimation_of_flat_rows_is_near_identity() {
        for (a, b) in [(1000u16, 1000u16), (0, 65535), (4096, 61440), (32768, 32769)] {
            let src: Vec<u16> = (0..16).map(|i| if (i / 4) % 2 == 0 { a } else { b }).collect();
            let mut full = vec![0u16; 32];
            upsample_422_to_444(&src, &mut full).unwrap();
            let mut back = vec![0u16; 16];
            downsample_444_to_422(&full, &mut back, ChromaDecimation::Average).unwrap();
            for k in 0..src.len() {
                if src.get(k + 1).is_some_and(|&next| next != src[k]) {
                    continue;
                }
                assert!((back[k] as i32 - src[k] as i32).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_average_decimation_rounds_up() {
        let src = [1u16, 2, 65535, 65535, 7];
        let mut dst = [0u16; 3];
        downsample_444_to_422(&src, &mut dst, ChromaDecimation::Average).unwrap();
        assert_eq!(dst, [2, 65535, 7]);
    }

    #[test]
    fn test_decimation_row_selection() {
        assert_eq!(decimation_row(0, 4), 1);
        assert_eq!(decimation_row(1, 4), 3);
        assert_eq!(decimation_row(2, 5), 4);
        assert_eq!(decimation_row(0, 1), 0);
        assert!(is_decimation_row(1, 4));
        assert!(!is_decimation_row(2, 4));
        assert!(is_decimation_row(4, 5));
        assert!(!is_decimation_row(0, 5));
    }
}
