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
use crate::yuv_support::PlaneChannel;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelError {
    UnknownPixelFormat(u32),
    UnknownColorSpace(u32),
    UnsupportedBitDepth(u32),
    RoiOutOfBounds,
    WidthNotAligned { width: u32, period: u32 },
    OddRoiOffset,
    RoiWiderThanFrame { roi: u32, frame: u32 },
    MissingPlane(PlaneChannel),
    PlaneSizeMismatch(MismatchedSize),
    PlaneMinimumSizeMismatch(MismatchedSize),
    DestinationSizeMismatch(MismatchedSize),
    MinimumDestinationSizeMismatch(MismatchedSize),
    StrideTooSmall(MismatchedSize),
    PointerOverflow,
    ZeroBaseSize,
}

impl Display for PixelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelError::UnknownPixelFormat(tag) => {
                f.write_fmt(format_args!("Unknown pixel format tag {}", tag))
            }
            PixelError::UnknownColorSpace(flags) => f.write_fmt(format_args!(
                "Unrecognized color space descriptor {:#x}, exactly one of BT.601 or BT.709 must be set",
                flags
            )),
            PixelError::UnsupportedBitDepth(depth) => f.write_fmt(format_args!(
                "Bit depth {} is not supported for this sample type",
                depth
            )),
            PixelError::RoiOutOfBounds => {
                f.write_str("Region of interest lies outside of the source image")
            }
            PixelError::WidthNotAligned { width, period } => f.write_fmt(format_args!(
                "Width {} must be a multiple of {} for this pixel format",
                width, period
            )),
            PixelError::OddRoiOffset => {
                f.write_str("Horizontal offset of region must be aligned to the chroma period")
            }
            PixelError::RoiWiderThanFrame { roi, frame } => f.write_fmt(format_args!(
                "Region width {} exceeds frame width {}",
                roi, frame
            )),
            PixelError::MissingPlane(channel) => {
                f.write_fmt(format_args!("Source does not have {:?} plane", channel))
            }
            PixelError::PlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            PixelError::PlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            PixelError::DestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination size mismatch: expected={}, received={}",
                size.expected, size.received
            )),
            PixelError::MinimumDestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination must have size at least {} but it is {}",
                size.expected, size.received
            )),
            PixelError::StrideTooSmall(size) => f.write_fmt(format_args!(
                "Stride must be at least {} but it is {}",
                size.expected, size.received
            )),
            PixelError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
            PixelError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
        }
    }
}

impl Error for PixelError {}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), PixelError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(PixelError::PointerOverflow);
    }
    Ok(())
}

/// Checks that a row handed to a public row function has `expected` samples
#[inline]
pub(crate) fn check_row_len(expected: usize, received: usize) -> Result<(), PixelError> {
    if expected != received {
        return Err(PixelError::PlaneSizeMismatch(MismatchedSize { expected, received }));
    }
    Ok(())
}

/// Checks a plane described in elements per row.
///
/// Stride sign is ignored here, bottom-up planes occupy the same span.
#[inline]
pub(crate) fn check_plane<V>(
    data: &[V],
    stride: isize,
    plane_width: usize,
    plane_height: usize,
) -> Result<(), PixelError> {
    let stride = stride.unsigned_abs();
    check_overflow_v2(stride, plane_height)?;
    check_overflow_v2(plane_width, plane_height)?;
    if stride < plane_width {
        return Err(PixelError::StrideTooSmall(MismatchedSize {
            expected: plane_width,
            received: stride,
        }));
    }
    if stride * plane_height != data.len() {
        return Err(PixelError::PlaneSizeMismatch(MismatchedSize {
            expected: stride * plane_height,
            received: data.len(),
        }));
    }
    Ok(())
}

/// Checks a byte buffer made of `rows` rows of `row_bytes` meaningful bytes
/// each, placed `stride` bytes apart.
#[inline]
pub(crate) fn check_packed_section(
    len: usize,
    stride: usize,
    row_bytes: usize,
    rows: usize,
) -> Result<(), PixelError> {
    check_overflow_v2(stride, rows)?;
    if stride < row_bytes {
        return Err(PixelError::StrideTooSmall(MismatchedSize {
            expected: row_bytes,
            received: stride,
        }));
    }
    if len != stride * rows {
        return Err(PixelError::DestinationSizeMismatch(MismatchedSize {
            expected: stride * rows,
            received: len,
        }));
    }
    if len < row_bytes * rows {
        return Err(PixelError::MinimumDestinationSizeMismatch(MismatchedSize {
            expected: row_bytes * rows,
            received: len,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_check_accepts_exact_layout() {
        let data = vec![0u16; 16 * 4];
        assert!(check_plane(&data, 16, 12, 4).is_ok());
        assert!(check_plane(&data, -16, 12, 4).is_ok());
    }

    #[test]
    fn test_plane_check_rejects_short_stride() {
        let data = vec![0u16; 8 * 4];
        assert_eq!(
            check_plane(&data, 8, 12, 4),
            Err(PixelError::StrideTooSmall(MismatchedSize {
                expected: 12,
                received: 8
            }))
        );
    }

    #[test]
    fn test_packed_section_size_mismatch() {
        let err = check_packed_section(100, 32, 32, 4).unwrap_err();
        assert_eq!(
            err,
            PixelError::DestinationSizeMismatch(MismatchedSize {
                expected: 128,
                received: 100
            })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            check_overflow_v2(usize::MAX, 2),
            Err(PixelError::PointerOverflow)
        );
    }
}
