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
use rug::float::Round;
use rug::Float;

const BITS: u32 = 150;
/// Fractional bits of the emitted tables
const PRECISION: u32 = 8;

#[derive(Debug, Copy, Clone, PartialEq)]
enum ColorRange {
    /// Full range RGB mapped onto legal luma 16..=235
    ComputerGraphics,
    /// RGB already in the legal range
    VideoSystems,
}

impl ColorRange {
    fn tag(self) -> &'static str {
        match self {
            ColorRange::ComputerGraphics => "CG",
            ColorRange::VideoSystems => "VS",
        }
    }

    /// Gains applied to luma and to color difference on the way to YCbCr
    fn gains(self) -> (Float, Float) {
        let f = |v: f64| Float::with_val(BITS, v);
        match self {
            ColorRange::ComputerGraphics => (f(219.) / f(255.), f(224.) / f(255.)),
            ColorRange::VideoSystems => (f(1.), f(224.) / f(219.)),
        }
    }

    fn y_offset(self) -> i32 {
        match self {
            ColorRange::ComputerGraphics => 16,
            ColorRange::VideoSystems => 0,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Standard {
    name: &'static str,
    kr: f64,
    kb: f64,
}

const STANDARDS: [Standard; 2] = [
    Standard {
        name: "BT601",
        kr: 0.299,
        kb: 0.114,
    },
    Standard {
        name: "BT709",
        kr: 0.2126,
        kb: 0.0722,
    },
];

fn quantize(v: Float) -> i32 {
    let scaled = v * Float::with_val(BITS, (1u32 << PRECISION) as f64);
    scaled
        .to_i32_saturating_round(Round::Nearest)
        .unwrap_or_default()
}

fn print_forward(standard: Standard, range: ColorRange) {
    let kr = Float::with_val(BITS, standard.kr);
    let kb = Float::with_val(BITS, standard.kb);
    let kg = Float::with_val(BITS, 1.) - &kr - &kb;
    let (y_gain, uv_gain) = range.gains();
    let half = Float::with_val(BITS, 0.5);
    let one = Float::with_val(BITS, 1.);

    let cb_den = one.clone() - &kb;
    let cr_den = one - &kr;
    let rows = [
        ("yr", kr.clone() * &y_gain),
        ("yg", kg.clone() * &y_gain),
        ("yb", kb.clone() * &y_gain),
        ("cb_r", -(half.clone() * &kr / &cb_den) * &uv_gain),
        ("cb_g", -(half.clone() * &kg / &cb_den) * &uv_gain),
        ("cb_b", half.clone() * &uv_gain),
        ("cr_r", half.clone() * &uv_gain),
        ("cr_g", -(half.clone() * &kg / &cr_den) * &uv_gain),
        ("cr_b", -(half * &kb / &cr_den) * &uv_gain),
    ];
    println!(
        "static FORWARD_{}_{}_Q{}: CbCrForwardTransform<i32> = CbCrForwardTransform {{",
        standard.name,
        range.tag(),
        PRECISION
    );
    for (name, value) in rows {
        println!("    {}: {},", name, quantize(value));
    }
    println!("    y_offset: {},", range.y_offset());
    println!("}};\n");
}

fn print_inverse(standard: Standard, range: ColorRange) {
    let kr = Float::with_val(BITS, standard.kr);
    let kb = Float::with_val(BITS, standard.kb);
    let kg = Float::with_val(BITS, 1.) - &kr - &kb;
    let (y_gain, uv_gain) = range.gains();
    let one = Float::with_val(BITS, 1.);
    let two = Float::with_val(BITS, 2.);

    let uv_scale = one.clone() / &uv_gain;
    let rows = [
        ("y_coef", one.clone() / &y_gain),
        ("cr_coef", two.clone() * (one.clone() - &kr) * &uv_scale),
        ("cb_coef", two.clone() * (one.clone() - &kb) * &uv_scale),
        (
            "g_coeff_1",
            two.clone() * (one.clone() - &kr) * &kr / &kg * &uv_scale,
        ),
        ("g_coeff_2", two * (one - &kb) * &kb / &kg * &uv_scale),
    ];
    println!(
        "static INVERSE_{}_{}_Q{}: CbCrInverseTransform<i32> = CbCrInverseTransform {{",
        standard.name,
        range.tag(),
        PRECISION
    );
    for (name, value) in rows {
        println!("    {}: {},", name, quantize(value));
    }
    println!("    y_offset: {},", range.y_offset());
    println!("}};\n");
}

fn main() {
    for range in [ColorRange::ComputerGraphics, ColorRange::VideoSystems] {
        for standard in STANDARDS {
            print_forward(standard, range);
        }
    }
    for range in [ColorRange::ComputerGraphics, ColorRange::VideoSystems] {
        for standard in STANDARDS {
            print_inverse(standard, range);
        }
    }
}
