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
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Source of the noise added to samples before they lose precision.
///
/// A source is consumed row by row. Every row of a conversion receives its own
/// [DitherSource::fork] taken in row order before any row is processed, so a
/// seeded source produces the same output regardless of scheduling.
pub trait DitherSource: Send {
    /// Returns a uniformly distributed value in `0..2^bits`, `bits` at most 16
    fn next_bits(&mut self, bits: u32) -> u16;

    /// Fills the row with values in `0..2^bits`
    fn fill(&mut self, row: &mut [u16], bits: u32) {
        for dst in row.iter_mut() {
            *dst = self.next_bits(bits);
        }
    }

    /// Derives an independent source for one row
    fn fork(&mut self) -> Self
    where
        Self: Sized;
}

/// Pseudo-random dither, driven by any seedable generator.
#[derive(Debug, Clone)]
pub struct RandomDither<R = SmallRng> {
    rng: R,
}

impl RandomDither<SmallRng> {
    /// Seeds from operating system entropy
    pub fn new() -> Self {
        RandomDither {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Reproducible source, equal seeds yield equal conversions
    pub fn seeded(seed: u64) -> Self {
        RandomDither {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDither<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + SeedableRng> RandomDither<R> {
    /// Drives the dither with a caller supplied generator
    pub fn from_rng(rng: R) -> Self {
        RandomDither { rng }
    }
}

impl<R: RngCore + SeedableRng + Send> DitherSource for RandomDither<R> {
    #[inline]
    fn next_bits(&mut self, bits: u32) -> u16 {
        if bits == 0 {
            return 0;
        }
        (self.rng.next_u32() >> (32 - bits.min(16))) as u16
    }

    fn fill(&mut self, row: &mut [u16], bits: u32) {
        if bits == 0 {
            row.fill(0);
            return;
        }
        let shift = 32 - bits.min(16);
        let mut pairs = row.chunks_exact_mut(2);
        for pair in pairs.by_ref() {
            let word = self.rng.next_u32();
            pair[0] = ((word & 0xFFFF) << 16 >> shift) as u16;
            pair[1] = (word >> shift) as u16;
        }
        for dst in pairs.into_remainder() {
            *dst = self.next_bits(bits);
        }
    }

    fn fork(&mut self) -> Self {
        RandomDither {
            rng: R::seed_from_u64(self.rng.next_u64()),
        }
    }
}

/// Truncating narrowing, output equals the plain shift.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NoDither;

impl DitherSource for NoDither {
    #[inline]
    fn next_bits(&mut self, _: u32) -> u16 {
        0
    }

    fn fill(&mut self, row: &mut [u16], _: u32) {
        row.fill(0);
    }

    fn fork(&mut self) -> Self {
        NoDither
    }
}
