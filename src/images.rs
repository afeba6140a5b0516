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
use crate::bit_depth::{rescale_signed, WORKING_BIT_DEPTH};
use crate::chroma_resample::decimation_row;
use crate::pixel_error::{check_overflow_v2, check_packed_section, check_plane};
use crate::pixel_format::{FormatFamily, PackedLayout, PixelFormat};
use crate::yuv_support::{AlphaEncoding, ChromaSampling, PlaneChannel};
use crate::{MismatchedSize, PixelError};
use num_traits::AsPrimitive;
use std::fmt::Debug;

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn as_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

/// Storage type of a canonical plane sample.
///
/// `u16` holds unsigned 8, 10, 12, 13 and 16-bit samples, `i16` holds the signed
/// 12 and 13-bit intermediates.
pub trait PlaneSample: Copy + Debug + Default + Send + Sync + 'static + AsPrimitive<i32> {
    fn supports_bit_depth(bit_depth: u32) -> bool;

    /// Stored sample at `bit_depth` to working precision, saturating
    #[inline]
    fn to_working(self, bit_depth: u32) -> u16 {
        let value: i32 = self.as_();
        let max = (1i32 << bit_depth) - 1;
        (value.clamp(0, max) << (WORKING_BIT_DEPTH - bit_depth)) as u16
    }

    /// Sample already narrowed to the plane bit depth
    fn from_narrowed(v: u16) -> Self;
}

impl PlaneSample for u16 {
    #[inline]
    fn supports_bit_depth(bit_depth: u32) -> bool {
        matches!(bit_depth, 8 | 10 | 12 | 13 | 16)
    }

    #[inline]
    fn from_narrowed(v: u16) -> Self {
        v
    }
}

impl PlaneSample for i16 {
    #[inline]
    fn supports_bit_depth(bit_depth: u32) -> bool {
        matches!(bit_depth, 12 | 13)
    }

    #[inline]
    fn to_working(self, bit_depth: u32) -> u16 {
        rescale_signed(self, bit_depth, WORKING_BIT_DEPTH, 0)
    }

    #[inline]
    fn from_narrowed(v: u16) -> Self {
        v as i16
    }
}

#[derive(Debug, Clone)]
/// One tagged plane of a canonical image
pub struct SamplePlane<'a, T>
where
    T: Copy + Debug,
{
    pub data: &'a [T],
    /// Elements per row, negative when the plane is stored bottom-up
    pub stride: isize,
    pub channel: PlaneChannel,
}

impl<'a, T> SamplePlane<'a, T>
where
    T: Copy + Debug,
{
    pub fn new(data: &'a [T], stride: isize, channel: PlaneChannel) -> Self {
        SamplePlane {
            data,
            stride,
            channel,
        }
    }

    /// Logical row `y`, row 0 is the top of the image regardless of stride sign
    pub fn row(&self, y: usize) -> &'a [T] {
        let stride = self.stride.unsigned_abs();
        let rows = self.data.len() / stride;
        let physical = if self.stride < 0 { rows - 1 - y } else { y };
        &self.data[physical * stride..(physical + 1) * stride]
    }
}

#[derive(Debug)]
pub struct SamplePlaneMut<'a, T>
where
    T: Copy + Debug,
{
    pub data: BufferStoreMut<'a, T>,
    /// Elements per row, negative when the plane is stored bottom-up
    pub stride: isize,
    pub channel: PlaneChannel,
}

#[inline]
fn is_chroma(channel: PlaneChannel) -> bool {
    matches!(channel, PlaneChannel::ChromaU | PlaneChannel::ChromaV)
}

fn required_channels(family: FormatFamily) -> [PlaneChannel; 3] {
    match family {
        FormatFamily::Yuv => [PlaneChannel::Luma, PlaneChannel::ChromaU, PlaneChannel::ChromaV],
        FormatFamily::Rgb => [PlaneChannel::Red, PlaneChannel::Green, PlaneChannel::Blue],
    }
}

fn family_of(channels: impl Iterator<Item = PlaneChannel> + Clone) -> Result<FormatFamily, PixelError> {
    if channels.clone().any(|c| c == PlaneChannel::Luma) {
        Ok(FormatFamily::Yuv)
    } else if channels.clone().any(|c| c == PlaneChannel::Red) {
        Ok(FormatFamily::Rgb)
    } else {
        Err(PixelError::MissingPlane(PlaneChannel::Luma))
    }
}

fn plane_dimensions(
    channel: PlaneChannel,
    sampling: ChromaSampling,
    width: usize,
    height: usize,
) -> (usize, usize) {
    if is_chroma(channel) {
        (sampling.chroma_width(width), sampling.chroma_height(height))
    } else {
        (width, height)
    }
}

fn check_plane_set<T: PlaneSample>(
    planes: &[(PlaneChannel, &[T], isize)],
    width: u32,
    height: u32,
    bit_depth: u32,
    sampling: ChromaSampling,
) -> Result<FormatFamily, PixelError> {
    if width == 0 || height == 0 {
        return Err(PixelError::ZeroBaseSize);
    }
    if !T::supports_bit_depth(bit_depth) {
        return Err(PixelError::UnsupportedBitDepth(bit_depth));
    }
    check_overflow_v2(width as usize, height as usize)?;
    let family = family_of(planes.iter().map(|p| p.0))?;
    for channel in required_channels(family) {
        if !planes.iter().any(|p| p.0 == channel) {
            return Err(PixelError::MissingPlane(channel));
        }
    }
    let sampling = match family {
        FormatFamily::Yuv => sampling,
        FormatFamily::Rgb => ChromaSampling::Yuv444,
    };
    for &(channel, data, stride) in planes {
        let (plane_width, plane_height) =
            plane_dimensions(channel, sampling, width as usize, height as usize);
        check_plane(data, stride, plane_width, plane_height)?;
    }
    Ok(family)
}

#[derive(Debug, Clone)]
/// Canonical planar image, planes are resolved by their tags
pub struct PlanarImage<'a, T>
where
    T: Copy + Debug,
{
    pub planes: Vec<SamplePlane<'a, T>>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u32,
    /// Chroma ratio of YUV planes, ignored for RGB planes
    pub sampling: ChromaSampling,
    pub alpha: AlphaEncoding,
}

impl<'a, T> PlanarImage<'a, T>
where
    T: PlaneSample,
{
    /// Builds an image from channels in codec storage order.
    ///
    /// The codec keeps luma first and the chroma planes reversed, V before U,
    /// followed by an optional alpha plane. Each entry is a plane with its
    /// stride in elements.
    pub fn from_codec_channels(
        channels: &[(&'a [T], isize)],
        width: u32,
        height: u32,
        bit_depth: u32,
        sampling: ChromaSampling,
        alpha: AlphaEncoding,
    ) -> Result<Self, PixelError> {
        const CODEC_ORDER: [PlaneChannel; 4] = [
            PlaneChannel::Luma,
            PlaneChannel::ChromaV,
            PlaneChannel::ChromaU,
            PlaneChannel::Alpha,
        ];
        if channels.len() < 3 {
            return Err(PixelError::MissingPlane(CODEC_ORDER[channels.len()]));
        }
        let planes = channels
            .iter()
            .zip(CODEC_ORDER.iter())
            .map(|(&(data, stride), &channel)| SamplePlane::new(data, stride, channel))
            .collect();
        let image = PlanarImage {
            planes,
            width,
            height,
            bit_depth,
            sampling,
            alpha,
        };
        image.check_constraints()?;
        Ok(image)
    }

    pub fn plane(&self, channel: PlaneChannel) -> Option<&SamplePlane<'a, T>> {
        self.planes.iter().find(|p| p.channel == channel)
    }

    pub fn family(&self) -> Result<FormatFamily, PixelError> {
        family_of(self.planes.iter().map(|p| p.channel))
    }

    pub fn check_constraints(&self) -> Result<FormatFamily, PixelError> {
        let planes: Vec<(PlaneChannel, &[T], isize)> = self
            .planes
            .iter()
            .map(|p| (p.channel, p.data, p.stride))
            .collect();
        check_plane_set(&planes, self.width, self.height, self.bit_depth, self.sampling)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Plane set to allocate for a mutable canonical image
pub enum PlanarLayout {
    Yuv420,
    Yuv422,
    Yuv444,
    Rgb,
    Rgba,
}

#[derive(Debug)]
/// Mutable canonical planar image
pub struct PlanarImageMut<'a, T>
where
    T: Copy + Debug,
{
    pub planes: Vec<SamplePlaneMut<'a, T>>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u32,
    pub sampling: ChromaSampling,
    pub alpha: AlphaEncoding,
}

/// Disjoint mutable rows of every plane touching one image row
pub(crate) struct PlanarRowMut<'a, T> {
    pub(crate) planes: Vec<(PlaneChannel, &'a mut [T])>,
}

impl<'a, T> PlanarImageMut<'a, T>
where
    T: PlaneSample,
{
    /// Allocates top-down planes with tight strides
    pub fn alloc(width: u32, height: u32, layout: PlanarLayout, bit_depth: u32) -> Self {
        let (channels, sampling): (&[PlaneChannel], ChromaSampling) = match layout {
            PlanarLayout::Yuv420 | PlanarLayout::Yuv422 | PlanarLayout::Yuv444 => (
                &[PlaneChannel::Luma, PlaneChannel::ChromaU, PlaneChannel::ChromaV],
                match layout {
                    PlanarLayout::Yuv420 => ChromaSampling::Yuv420,
                    PlanarLayout::Yuv422 => ChromaSampling::Yuv422,
                    _ => ChromaSampling::Yuv444,
                },
            ),
            PlanarLayout::Rgb => (
                &[PlaneChannel::Red, PlaneChannel::Green, PlaneChannel::Blue],
                ChromaSampling::Yuv444,
            ),
            PlanarLayout::Rgba => (
                &[
                    PlaneChannel::Red,
                    PlaneChannel::Green,
                    PlaneChannel::Blue,
                    PlaneChannel::Alpha,
                ],
                ChromaSampling::Yuv444,
            ),
        };
        let planes = channels
            .iter()
            .map(|&channel| {
                let (plane_width, plane_height) =
                    plane_dimensions(channel, sampling, width as usize, height as usize);
                SamplePlaneMut {
                    data: BufferStoreMut::Owned(vec![T::default(); plane_width * plane_height]),
                    stride: plane_width as isize,
                    channel,
                }
            })
            .collect();
        PlanarImageMut {
            planes,
            width,
            height,
            bit_depth,
            sampling,
            alpha: AlphaEncoding::Linear,
        }
    }

    pub fn check_constraints(&self) -> Result<FormatFamily, PixelError> {
        let planes: Vec<(PlaneChannel, &[T], isize)> = self
            .planes
            .iter()
            .map(|p| (p.channel, p.data.borrow(), p.stride))
            .collect();
        check_plane_set(&planes, self.width, self.height, self.bit_depth, self.sampling)
    }

    pub fn to_fixed(&'a self) -> PlanarImage<'a, T> {
        PlanarImage {
            planes: self
                .planes
                .iter()
                .map(|p| SamplePlane::new(p.data.borrow(), p.stride, p.channel))
                .collect(),
            width: self.width,
            height: self.height,
            bit_depth: self.bit_depth,
            sampling: self.sampling,
            alpha: self.alpha,
        }
    }

    /// Splits all planes into per image row handles.
    ///
    /// In 4:2:0 images a chroma row is attached only to the row it is
    /// decimated from.
    pub(crate) fn rows_mut(&mut self) -> Vec<PlanarRowMut<'_, T>> {
        let height = self.height as usize;
        let sampling = self.sampling;
        let mut rows: Vec<PlanarRowMut<'_, T>> = (0..height)
            .map(|_| PlanarRowMut {
                planes: Vec::with_capacity(self.planes.len()),
            })
            .collect();
        for plane in self.planes.iter_mut() {
            let stride = plane.stride.unsigned_abs();
            let channel = plane.channel;
            let vertical_decimation = is_chroma(channel) && sampling == ChromaSampling::Yuv420;
            let mut plane_rows: Vec<&mut [T]> = plane.data.as_mut().chunks_exact_mut(stride).collect();
            if plane.stride < 0 {
                plane_rows.reverse();
            }
            for (j, row) in plane_rows.into_iter().enumerate() {
                let target = if vertical_decimation {
                    decimation_row(j, height)
                } else {
                    j
                };
                if let Some(dst) = rows.get_mut(target) {
                    dst.planes.push((channel, row));
                }
            }
        }
        rows
    }
}

#[derive(Debug, Clone)]
/// Packed image in one of the external layouts
pub struct PackedImage<'a> {
    pub data: &'a [u8],
    /// Bytes per row of the primary section
    pub stride: u32,
    /// Declared frame width in pixels
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

#[derive(Debug)]
/// Mutable packed image in one of the external layouts
pub struct PackedImageMut<'a> {
    pub data: BufferStoreMut<'a, u8>,
    /// Bytes per row of the primary section
    pub stride: u32,
    /// Declared frame width in pixels
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

fn check_packed(
    data: &[u8],
    stride: u32,
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<(), PixelError> {
    if width == 0 || height == 0 {
        return Err(PixelError::ZeroBaseSize);
    }
    let period = format.descriptor().period;
    if width % period != 0 {
        return Err(PixelError::WidthNotAligned { width, period });
    }
    let (width, stride, height) = (width as usize, stride as usize, height as usize);
    check_overflow_v2(stride, height)?;
    let sections = format.sections(width, stride, height);
    let expected: usize = sections.iter().map(|s| s.len()).sum();
    if data.len() != expected {
        return Err(PixelError::DestinationSizeMismatch(MismatchedSize {
            expected,
            received: data.len(),
        }));
    }
    for section in sections {
        check_packed_section(section.len(), section.pitch, section.row_bytes, section.rows)?;
    }
    Ok(())
}

/// Read-only view of one row of a packed image
pub(crate) enum PackedRowRef<'a> {
    Interleaved(&'a [u8]),
    Split { lsb: &'a [u8], msb: &'a [u8] },
    Planar { luma: &'a [u8], chroma: (&'a [u8], Option<&'a [u8]>) },
}

/// Mutable view of one row of a packed image
pub(crate) enum PackedRowMut<'a> {
    Interleaved(&'a mut [u8]),
    Split { lsb: &'a mut [u8], msb: &'a mut [u8] },
    /// Chroma is present only on the row chroma is decimated from
    Planar {
        luma: &'a mut [u8],
        chroma: Option<(&'a mut [u8], Option<&'a mut [u8]>)>,
    },
}

impl<'a> PackedImage<'a> {
    pub fn new(data: &'a [u8], stride: u32, width: u32, height: u32, format: PixelFormat) -> Self {
        PackedImage {
            data,
            stride,
            width,
            height,
            format,
        }
    }

    pub fn check_constraints(&self) -> Result<(), PixelError> {
        check_packed(self.data, self.stride, self.width, self.height, self.format)
    }

    pub(crate) fn row(&self, y: usize) -> PackedRowRef<'a> {
        let data: &'a [u8] = self.data;
        let stride = self.stride as usize;
        let height = self.height as usize;
        let sections = self.format.sections(self.width as usize, stride, height);
        let slice_row = |offset: usize, pitch: usize, y: usize| -> &'a [u8] {
            &data[offset + y * pitch..offset + (y + 1) * pitch]
        };
        match self.format.packed_layout() {
            PackedLayout::Interleaved => PackedRowRef::Interleaved(slice_row(0, stride, y)),
            PackedLayout::SplitLsbMsb => PackedRowRef::Split {
                lsb: slice_row(0, sections[0].pitch, y),
                msb: slice_row(sections[0].len(), stride, y),
            },
            PackedLayout::Planar420 { chroma_planes } => {
                let luma = slice_row(0, stride, y);
                let first_offset = sections[0].len();
                let first = slice_row(first_offset, sections[1].pitch, y / 2);
                let second = if chroma_planes > 1 {
                    Some(slice_row(first_offset + sections[1].len(), sections[2].pitch, y / 2))
                } else {
                    None
                };
                PackedRowRef::Planar {
                    luma,
                    chroma: (first, second),
                }
            }
        }
    }
}

impl<'a> PackedImageMut<'a> {
    /// Allocates a zeroed buffer with the smallest valid stride
    pub fn alloc(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = format.min_stride(width as usize);
        let len = format.buffer_len(width as usize, stride, height as usize);
        PackedImageMut {
            data: BufferStoreMut::Owned(vec![0u8; len]),
            stride: stride as u32,
            width,
            height,
            format,
        }
    }

    pub fn check_constraints(&self) -> Result<(), PixelError> {
        check_packed(
            self.data.borrow(),
            self.stride,
            self.width,
            self.height,
            self.format,
        )
    }

    pub fn to_fixed(&'a self) -> PackedImage<'a> {
        PackedImage {
            data: self.data.borrow(),
            stride: self.stride,
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }

    pub(crate) fn rows_mut(&mut self) -> Vec<PackedRowMut<'_>> {
        let format = self.format;
        let stride = self.stride as usize;
        let height = self.height as usize;
        let sections = format.sections(self.width as usize, stride, height);
        let data = self.data.as_mut();
        match format.packed_layout() {
            PackedLayout::Interleaved => data
                .chunks_exact_mut(stride)
                .map(PackedRowMut::Interleaved)
                .collect(),
            PackedLayout::SplitLsbMsb => {
                let (lsb, msb) = data.split_at_mut(sections[0].len());
                lsb.chunks_exact_mut(sections[0].pitch)
                    .zip(msb.chunks_exact_mut(stride))
                    .map(|(lsb, msb)| PackedRowMut::Split { lsb, msb })
                    .collect()
            }
            PackedLayout::Planar420 { chroma_planes } => {
                let (luma, chroma) = data.split_at_mut(sections[0].len());
                let pitch = sections[1].pitch;
                let chroma_rows: Vec<(&mut [u8], Option<&mut [u8]>)> = if chroma_planes > 1 {
                    let (first, second) = chroma.split_at_mut(sections[1].len());
                    first
                        .chunks_exact_mut(pitch)
                        .zip(second.chunks_exact_mut(sections[2].pitch))
                        .map(|(first, second)| (first, Some(second)))
                        .collect()
                } else {
                    chroma
                        .chunks_exact_mut(pitch)
                        .map(|first| (first, None))
                        .collect()
                };
                let mut rows: Vec<PackedRowMut<'_>> = luma
                    .chunks_exact_mut(stride)
                    .map(|luma| PackedRowMut::Planar { luma, chroma: None })
                    .collect();
                for (j, chroma_row) in chroma_rows.into_iter().enumerate() {
                    if let Some(PackedRowMut::Planar { chroma, .. }) =
                        rows.get_mut(decimation_row(j, height))
                    {
                        *chroma = Some(chroma_row);
                    }
                }
                rows
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_stride_reads_bottom_up() {
        let data: Vec<u16> = (0..12).collect();
        let plane = SamplePlane::new(&data, -4, PlaneChannel::Luma);
        assert_eq!(plane.row(0), &[8, 9, 10, 11]);
        assert_eq!(plane.row(2), &[0, 1, 2, 3]);
        let plane = SamplePlane::new(&data, 4, PlaneChannel::Luma);
        assert_eq!(plane.row(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_codec_channels_swap_chroma_once() {
        let y = vec![1u16; 8];
        let v = vec![2u16; 4];
        let u = vec![3u16; 4];
        let image = PlanarImage::from_codec_channels(
            &[(&y[..], 4), (&v[..], 2), (&u[..], 2)],
            4,
            2,
            10,
            ChromaSampling::Yuv422,
            AlphaEncoding::Linear,
        )
        .unwrap();
        assert_eq!(image.plane(PlaneChannel::ChromaU).unwrap().data[0], 3);
        assert_eq!(image.plane(PlaneChannel::ChromaV).unwrap().data[0], 2);
        assert_eq!(image.family(), Ok(FormatFamily::Yuv));
    }

    #[test]
    fn test_missing_plane_is_reported() {
        let y = vec![1u16; 8];
        let u = vec![3u16; 4];
        let image = PlanarImage {
            planes: vec![
                SamplePlane::new(&y, 4, PlaneChannel::Luma),
                SamplePlane::new(&u, 2, PlaneChannel::ChromaU),
            ],
            width: 4,
            height: 2,
            bit_depth: 10,
            sampling: ChromaSampling::Yuv422,
            alpha: AlphaEncoding::Linear,
        };
        assert_eq!(
            image.check_constraints(),
            Err(PixelError::MissingPlane(PlaneChannel::ChromaV))
        );
        let err = PlanarImage::from_codec_channels(
            &[(&y[..], 4), (&u[..], 2)],
            4,
            2,
            10,
            ChromaSampling::Yuv422,
            AlphaEncoding::Linear,
        )
        .unwrap_err();
        assert_eq!(err, PixelError::MissingPlane(PlaneChannel::ChromaU));
    }

    #[test]
    fn test_bit_depth_is_checked_against_sample_type() {
        let image = PlanarImageMut::<i16>::alloc(4, 2, PlanarLayout::Rgb, 10);
        assert_eq!(
            image.check_constraints(),
            Err(PixelError::UnsupportedBitDepth(10))
        );
        let image = PlanarImageMut::<u16>::alloc(4, 2, PlanarLayout::Rgb, 14);
        assert_eq!(
            image.check_constraints(),
            Err(PixelError::UnsupportedBitDepth(14))
        );
        let image = PlanarImageMut::<u16>::alloc(4, 2, PlanarLayout::Rgb, 13);
        assert_eq!(image.check_constraints(), Ok(FormatFamily::Rgb));
        let image = PlanarImageMut::<i16>::alloc(4, 2, PlanarLayout::Rgba, 13);
        assert_eq!(image.check_constraints(), Ok(FormatFamily::Rgb));
    }

    #[test]
    fn test_planar_rows_attach_420_chroma_to_decimation_row() {
        let mut image = PlanarImageMut::<u16>::alloc(4, 5, PlanarLayout::Yuv420, 8);
        let rows = image.rows_mut();
        let counts: Vec<usize> = rows.iter().map(|r| r.planes.len()).collect();
        assert_eq!(counts, vec![1, 3, 1, 3, 3]);
    }

    #[test]
    fn test_packed_rows_split_sections() {
        let mut image = PackedImageMut::alloc(4, 3, PixelFormat::Avid2_8);
        assert_eq!(image.stride, 8);
        assert!(image.check_constraints().is_ok());
        let rows = image.rows_mut();
        assert_eq!(rows.len(), 3);
        for row in rows {
            match row {
                PackedRowMut::Split { lsb, msb } => {
                    assert_eq!(lsb.len(), 2);
                    assert_eq!(msb.len(), 8);
                }
                _ => panic!("expected split row"),
            }
        }

        let mut image = PackedImageMut::alloc(4, 3, PixelFormat::Yv12);
        let rows = image.rows_mut();
        let with_chroma: Vec<bool> = rows
            .iter()
            .map(|r| matches!(r, PackedRowMut::Planar { chroma: Some(_), .. }))
            .collect();
        assert_eq!(with_chroma, vec![false, true, true]);
    }

    #[test]
    fn test_packed_size_mismatch() {
        let data = vec![0u8; 10];
        let image = PackedImage::new(&data, 8, 4, 2, PixelFormat::Yuyv);
        assert_eq!(
            image.check_constraints(),
            Err(PixelError::DestinationSizeMismatch(MismatchedSize {
                expected: 16,
                received: 10
            }))
        );
        let data = vec![0u8; 12];
        let image = PackedImage::new(&data, 6, 4, 2, PixelFormat::Yuyv);
        assert_eq!(
            image.check_constraints(),
            Err(PixelError::StrideTooSmall(MismatchedSize {
                expected: 8,
                received: 6
            }))
        );
        let data = vec![0u8; 32];
        let image = PackedImage::new(&data, 16, 4, 2, PixelFormat::V210);
        assert_eq!(
            image.check_constraints(),
            Err(PixelError::WidthNotAligned {
                width: 4,
                period: 6
            })
        );
    }
}
