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
use crate::bit_depth::{compand_alpha, decompand_alpha, NarrowScratch, RowNarrower};
use crate::codec_table::{codec_for, FormatCodec};
use crate::dither::{DitherSource, RandomDither};
use crate::images::{
    PackedImage, PackedImageMut, PackedRowMut, PlanarImage, PlanarImageMut, PlanarRowMut,
    PlaneSample,
};
use crate::kernels::{row_kernels, RowKernels};
use crate::pixel_format::FormatFamily;
use crate::work_row::{RowLayout, WorkRow};
use crate::yuv_support::{AlphaEncoding, ChromaSampling, ColorSpace, PlaneChannel};
use crate::{MismatchedSize, PixelError};
#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

const ALPHA_CHANNEL: usize = 3;

/// Region of the source image taking part in a conversion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Roi {
        Roi {
            x,
            y,
            width,
            height,
        }
    }

    /// Whole image
    pub const fn full(width: u32, height: u32) -> Roi {
        Roi::new(0, 0, width, height)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConversionRequest {
    pub roi: Roi,
    pub color_space: ColorSpace,
    /// Destination row `r` takes source row `roi.height - 1 - r`
    pub flip: bool,
}

impl ConversionRequest {
    pub const fn new(roi: Roi, color_space: ColorSpace) -> ConversionRequest {
        ConversionRequest {
            roi,
            color_space,
            flip: false,
        }
    }

    pub const fn with_flip(mut self, flip: bool) -> ConversionRequest {
        self.flip = flip;
        self
    }
}

/// Converts between canonical planar images and packed layouts.
///
/// Every call validates everything up front and writes nothing on failure.
/// Rows are independent; each one receives its own fork of the dither source,
/// taken in row order, so a seeded converter is reproducible with or without
/// the `rayon` feature.
pub struct Converter<D: DitherSource = RandomDither> {
    dither: D,
    kernels: &'static dyn RowKernels,
}

impl Converter<RandomDither> {
    pub fn new() -> Self {
        Converter::with_dither(RandomDither::new())
    }
}

impl Default for Converter<RandomDither> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn working_channel(family: FormatFamily, channel: PlaneChannel) -> Option<usize> {
    match (family, channel) {
        (_, PlaneChannel::Alpha) => Some(ALPHA_CHANNEL),
        (FormatFamily::Yuv, PlaneChannel::Luma) | (FormatFamily::Rgb, PlaneChannel::Red) => Some(0),
        (FormatFamily::Yuv, PlaneChannel::ChromaU) | (FormatFamily::Rgb, PlaneChannel::Green) => {
            Some(1)
        }
        (FormatFamily::Yuv, PlaneChannel::ChromaV) | (FormatFamily::Rgb, PlaneChannel::Blue) => {
            Some(2)
        }
        _ => None,
    }
}

#[inline]
fn planar_row_layout(family: FormatFamily, sampling: ChromaSampling) -> RowLayout {
    match (family, sampling) {
        (FormatFamily::Rgb, _) => RowLayout::Rgb,
        (FormatFamily::Yuv, ChromaSampling::Yuv444) => RowLayout::Yuv444,
        (FormatFamily::Yuv, ChromaSampling::Yuv420 | ChromaSampling::Yuv422) => RowLayout::Yuv422,
    }
}

#[inline]
fn is_chroma_channel(family: FormatFamily, channel: usize) -> bool {
    family == FormatFamily::Yuv && (channel == 1 || channel == 2)
}

fn fits(start: u32, len: u32, limit: u32) -> bool {
    start.checked_add(len).is_some_and(|end| end <= limit)
}

/// Checks a region against its source and the format period
fn check_roi(roi: &Roi, width: u32, height: u32, period: u32, even_offset: bool) -> Result<(), PixelError> {
    if width == 0 || height == 0 || roi.width == 0 || roi.height == 0 {
        return Err(PixelError::ZeroBaseSize);
    }
    if !fits(roi.x, roi.width, width) || !fits(roi.y, roi.height, height) {
        return Err(PixelError::RoiOutOfBounds);
    }
    if roi.x % period != 0 || (even_offset && roi.x % 2 != 0) {
        return Err(PixelError::OddRoiOffset);
    }
    if roi.width % period != 0 {
        return Err(PixelError::WidthNotAligned {
            width: roi.width,
            period,
        });
    }
    Ok(())
}

fn check_frame(roi: &Roi, frame_width: u32, frame_height: u32) -> Result<(), PixelError> {
    if roi.width > frame_width {
        return Err(PixelError::RoiWiderThanFrame {
            roi: roi.width,
            frame: frame_width,
        });
    }
    if roi.height != frame_height {
        return Err(PixelError::DestinationSizeMismatch(MismatchedSize {
            expected: roi.height as usize,
            received: frame_height as usize,
        }));
    }
    Ok(())
}

#[inline]
fn source_row(request: &ConversionRequest, r: usize) -> usize {
    let roi = &request.roi;
    let r = if request.flip {
        roi.height as usize - 1 - r
    } else {
        r
    };
    roi.y as usize + r
}

/// Loads the region part of source row `sy` at working precision
fn load_planar_row<T: PlaneSample>(
    src: &PlanarImage<'_, T>,
    family: FormatFamily,
    sy: usize,
    roi: &Roi,
    row: &mut WorkRow,
) {
    let layout = planar_row_layout(family, src.sampling);
    row.reset(layout, roi.width as usize);
    let chroma_width = row.chroma_width();
    let width = row.width;

    for plane in src.planes.iter() {
        let Some(channel) = working_channel(family, plane.channel) else {
            continue;
        };
        let (plane_row, x, count) = if is_chroma_channel(family, channel) {
            let plane_row = match src.sampling {
                ChromaSampling::Yuv420 => sy / 2,
                ChromaSampling::Yuv422 | ChromaSampling::Yuv444 => sy,
            };
            let x = match layout {
                RowLayout::Yuv422 => roi.x as usize / 2,
                RowLayout::Yuv444 | RowLayout::Rgb => roi.x as usize,
            };
            (plane_row, x, chroma_width)
        } else {
            (sy, roi.x as usize, width)
        };
        let samples = &plane.row(plane_row)[x..x + count];
        let dst = row.channel_mut(channel);
        for (dst, &sample) in dst.iter_mut().zip(samples.iter()) {
            *dst = sample.to_working(src.bit_depth);
        }
        if channel == ALPHA_CHANNEL && src.alpha == AlphaEncoding::Companded {
            for a in dst.iter_mut() {
                *a = decompand_alpha(*a);
            }
        }
    }
}

/// Narrows a working row into the planes of one destination row
fn store_planar_row<T: PlaneSample>(
    row: &WorkRow,
    family: FormatFamily,
    dst: PlanarRowMut<'_, T>,
    bit_depth: u32,
    alpha: AlphaEncoding,
    narrower: &mut RowNarrower<'_>,
) {
    for (channel, plane) in dst.planes {
        let Some(channel) = working_channel(family, channel) else {
            continue;
        };
        let narrowed = if channel == ALPHA_CHANNEL && alpha == AlphaEncoding::Companded {
            let mut companded = narrower.take_row(row.width);
            for (dst, &a) in companded.iter_mut().zip(row.alpha.iter()) {
                *dst = compand_alpha(a);
            }
            let narrowed = narrower.narrowed(&companded, bit_depth);
            narrower.recycle([companded]);
            narrowed
        } else {
            narrower.narrowed(row.channel(channel), bit_depth)
        };
        for (dst, &v) in plane.iter_mut().zip(narrowed.iter()) {
            *dst = T::from_narrowed(v);
        }
        narrower.recycle([narrowed]);
    }
}

type PackJob<'a, D> = (usize, (PackedRowMut<'a>, D));
type UnpackJob<'a, T, D> = (usize, (PlanarRowMut<'a, T>, D));

/// Buffers one worker keeps from row to row
struct RowScratch {
    row: WorkRow,
    narrow: NarrowScratch,
}

impl RowScratch {
    fn new(layout: RowLayout) -> RowScratch {
        RowScratch {
            row: WorkRow::new(layout, 0),
            narrow: NarrowScratch::default(),
        }
    }

    /// Runs `f` with a narrower drawing from `dither` and the kept buffers
    fn narrow_with<D: DitherSource>(
        &mut self,
        dither: &mut D,
        kernels: &'static dyn RowKernels,
        f: impl FnOnce(&WorkRow, &mut RowNarrower<'_>),
    ) {
        let mut narrower =
            RowNarrower::with_scratch(dither, kernels, std::mem::take(&mut self.narrow));
        f(&self.row, &mut narrower);
        self.narrow = narrower.into_scratch();
    }
}

impl<D: DitherSource> Converter<D> {
    /// Converter drawing its dither noise from `dither`
    pub fn with_dither(dither: D) -> Self {
        Converter {
            dither,
            kernels: row_kernels(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_kernels(dither: D, kernels: &'static dyn RowKernels) -> Self {
        Converter { dither, kernels }
    }

    fn fork_rows(&mut self, rows: usize) -> Vec<D> {
        (0..rows).map(|_| self.dither.fork()).collect()
    }

    /// Packs the region of a planar image into a packed frame.
    ///
    /// The destination holds `roi.height` rows of `dst.width` pixels; columns
    /// past the region width are written as black.
    pub fn pack<T: PlaneSample>(
        &mut self,
        src: &PlanarImage<'_, T>,
        dst: &mut PackedImageMut<'_>,
        request: &ConversionRequest,
    ) -> Result<(), PixelError> {
        let roi = request.roi;
        let descriptor = dst.format.descriptor();
        let subsampled = src.plane(PlaneChannel::Luma).is_some() && src.sampling != ChromaSampling::Yuv444;
        check_roi(&roi, src.width, src.height, descriptor.period, subsampled)?;
        if dst.width % descriptor.period != 0 {
            return Err(PixelError::WidthNotAligned {
                width: dst.width,
                period: descriptor.period,
            });
        }
        check_frame(&roi, dst.width, dst.height)?;
        let family = src.check_constraints()?;
        dst.check_constraints()?;

        tracing::trace!(
            format = ?dst.format,
            x = roi.x,
            y = roi.y,
            width = roi.width,
            height = roi.height,
            flip = request.flip,
            "pack"
        );

        let codec = codec_for(dst.format);
        let kernels = self.kernels;
        let frame_width = dst.width as usize;
        let color_space = request.color_space;
        let rows = dst.rows_mut();
        let dithers = self.fork_rows(rows.len());
        let jobs: Vec<_> = rows.into_iter().zip(dithers).enumerate().collect();

        let layout = codec.layout();
        let pack_job = |scratch: &mut RowScratch, job: PackJob<'_, D>| {
            let (r, (mut packed_row, mut dither)) = job;
            let row = &mut scratch.row;
            load_planar_row(src, family, source_row(request, r), &roi, row);
            if color_space.correct_601_to_709 {
                row.correct_601_to_709();
            }
            row.convert_to(layout, color_space, kernels);
            row.pad_to(frame_width);
            scratch.narrow_with(&mut dither, kernels, |row, narrower| {
                codec.pack_row(row, &mut packed_row, narrower)
            });
        };

        #[cfg(feature = "rayon")]
        {
            jobs.into_par_iter()
                .for_each_init(|| RowScratch::new(layout), pack_job);
        }
        #[cfg(not(feature = "rayon"))]
        {
            let mut scratch = RowScratch::new(layout);
            jobs.into_iter().for_each(|job| pack_job(&mut scratch, job));
        }

        Ok(())
    }

    /// Unpacks the region of a packed frame into a planar image.
    ///
    /// The destination holds `roi.height` rows of `dst.width` pixels; columns
    /// past the region width are written as black.
    pub fn unpack<T: PlaneSample>(
        &mut self,
        src: &PackedImage<'_>,
        dst: &mut PlanarImageMut<'_, T>,
        request: &ConversionRequest,
    ) -> Result<(), PixelError> {
        let roi = request.roi;
        let descriptor = src.format.descriptor();
        check_roi(&roi, src.width, src.height, descriptor.period, false)?;
        check_frame(&roi, dst.width, dst.height)?;
        src.check_constraints()?;
        let family = dst.check_constraints()?;

        tracing::trace!(
            format = ?src.format,
            x = roi.x,
            y = roi.y,
            width = roi.width,
            height = roi.height,
            flip = request.flip,
            "unpack"
        );

        let codec = codec_for(src.format);
        let kernels = self.kernels;
        let frame_width = dst.width as usize;
        let bit_depth = dst.bit_depth;
        let alpha = dst.alpha;
        let target = planar_row_layout(family, dst.sampling);
        let color_space = request.color_space;
        let rows = dst.rows_mut();
        let dithers = self.fork_rows(rows.len());
        let jobs: Vec<_> = rows.into_iter().zip(dithers).enumerate().collect();

        let layout = codec.layout();
        let source_width = src.width as usize;
        let unpack_job = |scratch: &mut RowScratch, job: UnpackJob<'_, T, D>| {
            let (r, (planar_row, mut dither)) = job;
            let row = &mut scratch.row;
            row.reset(layout, source_width);
            codec.unpack_row(&src.row(source_row(request, r)), row);
            row.crop(roi.x as usize, roi.width as usize);
            if color_space.correct_601_to_709 {
                row.correct_601_to_709();
            }
            row.convert_to(target, color_space, kernels);
            row.pad_to(frame_width);
            scratch.narrow_with(&mut dither, kernels, |row, narrower| {
                store_planar_row(row, family, planar_row, bit_depth, alpha, narrower)
            });
        };

        #[cfg(feature = "rayon")]
        {
            jobs.into_par_iter()
                .for_each_init(|| RowScratch::new(layout), unpack_job);
        }
        #[cfg(not(feature = "rayon"))]
        {
            let mut scratch = RowScratch::new(layout);
            jobs.into_iter().for_each(|job| unpack_job(&mut scratch, job));
        }

        Ok(())
    }
}
