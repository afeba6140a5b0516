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
mod max_divergence;

use cfpixel::{
    ColorRange, ColorSpace, ColorStandard, ConversionRequest, Converter, PackedImageMut,
    PixelFormat, PlanarImageMut, PlanarLayout, Roi,
};
use max_divergence::check_div;
use rand::Rng;
use std::time::Instant;

fn main() {
    let width = 1920u32;
    let height = 1080u32;

    let mut planar = PlanarImageMut::<u16>::alloc(width, height, PlanarLayout::Yuv422, 10);
    let mut rng = rand::rng();
    for plane in planar.planes.iter_mut() {
        for v in plane.data.as_mut().iter_mut() {
            *v = rng.random_range(64..941);
        }
    }
    let fixed_planar = planar.to_fixed();

    let color_space = ColorSpace::new(ColorStandard::Bt709, ColorRange::ComputerGraphics);
    let request = ConversionRequest::new(Roi::full(width, height), color_space);
    let mut converter = Converter::new();

    for format in [
        PixelFormat::Yuyv,
        PixelFormat::V210,
        PixelFormat::Yu64,
        PixelFormat::Avid2_8,
        PixelFormat::Rgb32,
        PixelFormat::Rg30,
    ] {
        let mut packed = PackedImageMut::alloc(width, height, format);
        let start = Instant::now();
        converter
            .pack(&fixed_planar, &mut packed, &request)
            .unwrap();
        println!("Pack {:?} exec time {:?}", format, start.elapsed());

        let mut back = PlanarImageMut::<u16>::alloc(width, height, PlanarLayout::Yuv422, 10);
        let fixed_packed = packed.to_fixed();
        let start = Instant::now();
        converter
            .unpack(&fixed_packed, &mut back, &request)
            .unwrap();
        println!("Unpack {:?} exec time {:?}", format, start.elapsed());
    }

    check_div(PixelFormat::Yuyv, 256);
    check_div(PixelFormat::V210, 256);
}
