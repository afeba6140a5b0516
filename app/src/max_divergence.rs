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
use cfpixel::{
    ColorRange, ColorSpace, ColorStandard, ConversionRequest, Converter, PackedImageMut,
    PixelFormat, PlanarImageMut, PlanarLayout, Roi,
};
use rand::Rng;

const WIDTH: u32 = 48;
const HEIGHT: u32 = 4;

/// RGB pushed through `format` and back, returns the largest channel error
fn round_trip(format: PixelFormat, color_space: ColorSpace, rgb: [u16; 3]) -> (u32, u32, u32) {
    let mut source = PlanarImageMut::<u16>::alloc(WIDTH, HEIGHT, PlanarLayout::Rgb, 8);
    for (plane, &value) in source.planes.iter_mut().zip(rgb.iter()) {
        plane.data.as_mut().fill(value);
    }
    let request = ConversionRequest::new(Roi::full(WIDTH, HEIGHT), color_space);
    let mut converter = Converter::new();

    let mut packed = PackedImageMut::alloc(WIDTH, HEIGHT, format);
    let fixed_source = source.to_fixed();
    if let Err(err) = converter.pack(&fixed_source, &mut packed, &request) {
        panic!("{:?} pack failed: {}", format, err);
    }

    let mut target = PlanarImageMut::<u16>::alloc(WIDTH, HEIGHT, PlanarLayout::Rgb, 8);
    let fixed_packed = packed.to_fixed();
    if let Err(err) = converter.unpack(&fixed_packed, &mut target, &request) {
        panic!("{:?} unpack failed: {}", format, err);
    }

    let mut divergence = [0u32; 3];
    for (plane, (&expected, max)) in target
        .planes
        .iter()
        .zip(rgb.iter().zip(divergence.iter_mut()))
    {
        for &v in plane.data.borrow() {
            *max = (*max).max((v as i32 - expected as i32).unsigned_abs());
        }
    }
    (divergence[0], divergence[1], divergence[2])
}

pub(crate) fn search_for_max_divergences(
    format: PixelFormat,
    color_space: ColorSpace,
    samples: usize,
) -> (u32, u32, u32) {
    let mut rng = rand::rng();
    let mut m_r = u32::MIN;
    let mut m_g = u32::MIN;
    let mut m_b = u32::MIN;

    for _ in 0..samples {
        let rgb = [
            rng.random_range(0..256u16),
            rng.random_range(0..256u16),
            rng.random_range(0..256u16),
        ];
        let (n_r, n_g, n_b) = round_trip(format, color_space, rgb);
        m_r = n_r.max(m_r);
        m_g = n_g.max(m_g);
        m_b = n_b.max(m_b);
    }
    (m_r, m_g, m_b)
}

pub(crate) fn check_div(format: PixelFormat, samples: usize) {
    for standard in [ColorStandard::Bt601, ColorStandard::Bt709] {
        for range in [ColorRange::ComputerGraphics, ColorRange::VideoSystems] {
            let color_space = ColorSpace::new(standard, range);
            let max_divergence = search_for_max_divergences(format, color_space, samples);
            println!(
                "Max Divergence {:?} {:?} {:?} {:?}",
                format, standard, range, max_divergence
            );
        }
    }
}
