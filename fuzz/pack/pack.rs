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
    ColorSpace, ConversionRequest, Converter, PackedImageMut, PixelFormat, PlanarImageMut,
    PlanarLayout, Roi,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u8, u8, u8, u8, u16, u16, u8, bool)| {
    let (i_width, i_height, format, flags, y_value, uv_value, roi_x, flip) = data;
    let Ok(format) = PixelFormat::try_from(format as u32 % 27) else {
        return;
    };
    let Ok(color_space) = ColorSpace::from_flags(flags as u32 & 0x0F) else {
        return;
    };
    fuzz_pack(
        i_width as u32,
        i_height as u32,
        format,
        color_space,
        y_value,
        uv_value,
        roi_x as u32,
        flip,
    );
});

#[allow(clippy::too_many_arguments)]
fn fuzz_pack(
    width: u32,
    height: u32,
    format: PixelFormat,
    color_space: ColorSpace,
    y_value: u16,
    uv_value: u16,
    roi_x: u32,
    flip: bool,
) {
    if width == 0 || height == 0 {
        return;
    }
    let mut planar = PlanarImageMut::<u16>::alloc(width, height, PlanarLayout::Yuv422, 10);
    for plane in planar.planes.iter_mut() {
        let value = match plane.channel {
            cfpixel::PlaneChannel::Luma => y_value,
            _ => uv_value,
        };
        plane.data.as_mut().fill(value);
    }
    let fixed_planar = planar.to_fixed();

    let period = format.descriptor().period;
    let roi_width = width.saturating_sub(roi_x) / period * period;
    let frame_width = width.div_ceil(period) * period;
    let roi = Roi::new(roi_x, 0, roi_width, height);
    let request = ConversionRequest::new(roi, color_space).with_flip(flip);

    let mut packed = PackedImageMut::alloc(frame_width, height, format);
    let mut converter = Converter::new();
    // Ill-formed regions are rejected, only panics are of interest
    _ = converter.pack(&fixed_planar, &mut packed, &request);
}
