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

#![no_main]

use cfpixel::{
    ColorRange, ColorSpace, ColorStandard, ConversionRequest, Converter, PackedImage,
    PixelFormat, PlanarImageMut, PlanarLayout, Roi,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u8, u8, u8, u8, Vec<u8>)| {
    let (i_width, i_height, format, layout, bytes) = data;
    let Ok(format) = PixelFormat::try_from(format as u32 % 27) else {
        return;
    };
    let layout = match layout % 5 {
        0 => PlanarLayout::Yuv420,
        1 => PlanarLayout::Yuv422,
        2 => PlanarLayout::Yuv444,
        3 => PlanarLayout::Rgb,
        _ => PlanarLayout::Rgba,
    };
    fuzz_unpack(i_width as u32, i_height as u32, format, layout, &bytes);
});

fn fuzz_unpack(width: u32, height: u32, format: PixelFormat, layout: PlanarLayout, bytes: &[u8]) {
    if width == 0 || height == 0 {
        return;
    }
    let stride = format.min_stride(width as usize);
    let len = format.buffer_len(width as usize, stride, height as usize);
    let mut data = bytes.to_vec();
    data.resize(len, 0);

    let packed = PackedImage::new(&data, stride as u32, width, height, format);
    let mut planar = PlanarImageMut::<u16>::alloc(width, height, layout, 12);
    let color_space = ColorSpace::new(ColorStandard::Bt601, ColorRange::VideoSystems);
    let request = ConversionRequest::new(Roi::full(width, height), color_space);
    let mut converter = Converter::new();
    // Widths off the format period are rejected, only panics are of interest
    _ = converter.unpack(&packed, &mut planar, &request);
}
