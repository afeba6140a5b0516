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
#![deny(deprecated)]
#![deny(unreachable_code)]
#![allow(clippy::too_many_arguments)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! Pixel format and color space conversion between canonical planar images
//! and the packed layouts used by intermediate video codecs.
//!
//! Conversions go through rows held at 16-bit working precision, narrowing
//! back to the storage depth is dithered.

mod avid_2_8;
mod bit_depth;
mod built_coefficients;
mod chroma_resample;
mod codec_table;
mod dither;
mod images;
mod kernels;
mod numerics;
mod pixel_error;
mod pixel_format;
mod rgb_ar30;
mod rgb_packed;
mod rgb_planar8;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;
mod strip;
mod v210;
mod work_row;
mod ycbcr_matrix;
mod yuv_nv12;
mod yuv_support;
mod yuv_to_yuy2;

pub use pixel_error::MismatchedSize;
pub use pixel_error::PixelError;

pub use yuv_support::AlphaEncoding;
pub use yuv_support::ChromaSampling;
pub use yuv_support::ColorRange;
pub use yuv_support::ColorSpace;
pub use yuv_support::ColorStandard;
pub use yuv_support::PlaneChannel;

pub use built_coefficients::AlphaCurve;

pub use pixel_format::FormatAlpha;
pub use pixel_format::FormatFamily;
pub use pixel_format::PixelFormat;
pub use pixel_format::PixelFormatDescriptor;
pub use pixel_format::WordOrder;

pub use images::BufferStoreMut;
pub use images::PackedImage;
pub use images::PackedImageMut;
pub use images::PlanarImage;
pub use images::PlanarImageMut;
pub use images::PlanarLayout;
pub use images::PlaneSample;
pub use images::SamplePlane;
pub use images::SamplePlaneMut;

pub use strip::ConversionRequest;
pub use strip::Converter;
pub use strip::Roi;

pub use dither::DitherSource;
pub use dither::NoDither;
pub use dither::RandomDither;

pub use chroma_resample::decimation_row;
pub use chroma_resample::downsample_444_to_422;
pub use chroma_resample::is_decimation_row;
pub use chroma_resample::upsample_422_to_444;
pub use chroma_resample::ChromaDecimation;

pub use bit_depth::compand_alpha;
pub use bit_depth::decompand_alpha;
pub use bit_depth::narrow_with_dither;
pub use bit_depth::rescale_signed;
pub use bit_depth::widen;
pub use bit_depth::WORKING_BIT_DEPTH;

pub use ycbcr_matrix::correct_601_to_709_row;
pub use ycbcr_matrix::rgb_to_ycbcr_row;
pub use ycbcr_matrix::ycbcr_to_rgb_row;
