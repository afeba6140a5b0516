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
    ColorRange, ColorSpace, ColorStandard, ConversionRequest, Converter, NoDither,
    PackedImageMut, PixelFormat, PlanarImageMut, PlanarLayout, Roi,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

fn random_planar(layout: PlanarLayout, bit_depth: u32) -> PlanarImageMut<'static, u16> {
    let mut image = PlanarImageMut::<u16>::alloc(WIDTH, HEIGHT, layout, bit_depth);
    let mut rng = rand::rng();
    let max = ((1u32 << bit_depth) - 1) as u16;
    for plane in image.planes.iter_mut() {
        for v in plane.data.as_mut().iter_mut() {
            *v = rng.random_range(0..=max);
        }
    }
    image
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let color_space = ColorSpace::new(ColorStandard::Bt709, ColorRange::ComputerGraphics);
    let request = ConversionRequest::new(Roi::full(WIDTH, HEIGHT), color_space);

    let yuv422 = random_planar(PlanarLayout::Yuv422, 10);
    let fixed_yuv422 = yuv422.to_fixed();
    let rgba = random_planar(PlanarLayout::Rgba, 16);
    let fixed_rgba = rgba.to_fixed();

    for format in [
        PixelFormat::Yuyv,
        PixelFormat::V210,
        PixelFormat::Yu64,
        PixelFormat::Avid2_8,
        PixelFormat::Nv12,
    ] {
        c.bench_function(&format!("cfpixel YUV 4:2:2 -> {:?}", format), |b| {
            let mut converter = Converter::new();
            let mut packed = PackedImageMut::alloc(WIDTH, HEIGHT, format);
            b.iter(|| {
                converter
                    .pack(&fixed_yuv422, &mut packed, &request)
                    .unwrap();
            })
        });

        c.bench_function(&format!("cfpixel {:?} -> YUV 4:2:2", format), |b| {
            let mut converter = Converter::new();
            let mut packed = PackedImageMut::alloc(WIDTH, HEIGHT, format);
            converter
                .pack(&fixed_yuv422, &mut packed, &request)
                .unwrap();
            let fixed_packed = packed.to_fixed();
            let mut planar = PlanarImageMut::<u16>::alloc(WIDTH, HEIGHT, PlanarLayout::Yuv422, 10);
            b.iter(|| {
                converter
                    .unpack(&fixed_packed, &mut planar, &request)
                    .unwrap();
            })
        });
    }

    for format in [PixelFormat::Rgba32, PixelFormat::B64a, PixelFormat::Ar10] {
        c.bench_function(&format!("cfpixel RGBA -> {:?}", format), |b| {
            let mut converter = Converter::new();
            let mut packed = PackedImageMut::alloc(WIDTH, HEIGHT, format);
            b.iter(|| {
                converter.pack(&fixed_rgba, &mut packed, &request).unwrap();
            })
        });
    }

    c.bench_function("cfpixel YUV 4:2:2 -> Rgba32 no dither", |b| {
        let mut converter = Converter::with_dither(NoDither);
        let mut packed = PackedImageMut::alloc(WIDTH, HEIGHT, PixelFormat::Rgba32);
        b.iter(|| {
            converter
                .pack(&fixed_yuv422, &mut packed, &request)
                .unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
