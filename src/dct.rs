//! Forward DCT (Discrete Cosine Transform) implementation.
//!
//! This implements the Arai-Agui-Nakajima (AAN) scaled DCT in floating
//! point, the same flow graph as libjpeg's jfdctflt.c. The butterfly needs
//! only 5 multiplies and 29 adds per 1-D DCT; the per-output scale factors
//! that AAN leaves out are applied right after each pass, so the result is
//! the orthonormal 2-D DCT-II:
//!
//! ```text
//! F(u,v) = 1/4 C(u) C(v) sum_x sum_y f(x,y) cos((2x+1)u*pi/16) cos((2y+1)v*pi/16)
//! C(0) = 1/sqrt(2), C(k) = 1 otherwise
//! ```
//!
//! A 2-D DCT is done by 1-D DCT on rows followed by 1-D DCT on columns.
//!
//! Reference: Y. Arai, T. Agui and M. Nakajima, "A Fast DCT-SQ Scheme for
//! Images", Trans. IEICE E-71(11), 1988.

use multiversion::multiversion;

use crate::consts::{DCTSIZE, DCTSIZE2};

// cos(k*pi/8) derived butterfly constants
const C4: f32 = 0.707_106_781; // cos(4*pi/16)
const C6: f32 = 0.382_683_433; // cos(6*pi/16)
const C2_MINUS_C6: f32 = 0.541_196_100; // cos(2*pi/16) - cos(6*pi/16)
const C2_PLUS_C6: f32 = 1.306_562_965; // cos(2*pi/16) + cos(6*pi/16)

/// Post-butterfly scale per output index: 1/(2*sqrt(2)) for k = 0,
/// 1/(4*cos(k*pi/16)) otherwise.
const AAN_SCALE: [f32; DCTSIZE] = [
    0.353_553_391,
    0.254_897_790,
    0.270_598_050,
    0.300_672_443,
    0.353_553_391,
    0.449_988_112,
    0.653_281_482,
    1.281_457_724,
];

/// One AAN butterfly over 8 samples, with output scaling applied.
#[inline(always)]
fn aan_1d(d: [f32; DCTSIZE]) -> [f32; DCTSIZE] {
    let tmp0 = d[0] + d[7];
    let tmp7 = d[0] - d[7];
    let tmp1 = d[1] + d[6];
    let tmp6 = d[1] - d[6];
    let tmp2 = d[2] + d[5];
    let tmp5 = d[2] - d[5];
    let tmp3 = d[3] + d[4];
    let tmp4 = d[3] - d[4];

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    let out0 = tmp10 + tmp11;
    let out4 = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * C4;
    let out2 = tmp13 + z1;
    let out6 = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    let z5 = (tmp10 - tmp12) * C6;
    let z2 = C2_MINUS_C6 * tmp10 + z5;
    let z4 = C2_PLUS_C6 * tmp12 + z5;
    let z3 = tmp11 * C4;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    let out5 = z13 + z2;
    let out3 = z13 - z2;
    let out1 = z11 + z4;
    let out7 = z11 - z4;

    [
        out0 * AAN_SCALE[0],
        out1 * AAN_SCALE[1],
        out2 * AAN_SCALE[2],
        out3 * AAN_SCALE[3],
        out4 * AAN_SCALE[4],
        out5 * AAN_SCALE[5],
        out6 * AAN_SCALE[6],
        out7 * AAN_SCALE[7],
    ]
}

/// Perform forward DCT on one 8x8 block in place.
///
/// Input: 64 level-shifted samples (-128..=127) in row-major order.
/// Output: 64 orthonormal DCT coefficients in row-major order. The DC term
/// of a flat block of value `v` is `8 * v`.
///
/// Uses `multiversion` for automatic SIMD optimization via autovectorization.
#[multiversion(targets(
    "x86_64+avx2",
    "x86_64+sse4.1",
    "x86+avx2",
    "x86+sse4.1",
    "aarch64+neon",
))]
pub fn forward_dct(block: &mut [f32; DCTSIZE2]) {
    // Pass 1: process rows
    for row in block.chunks_exact_mut(DCTSIZE) {
        let mut d = [0.0f32; DCTSIZE];
        d.copy_from_slice(row);
        row.copy_from_slice(&aan_1d(d));
    }

    // Pass 2: process columns
    for col in 0..DCTSIZE {
        let mut d = [0.0f32; DCTSIZE];
        for (i, v) in d.iter_mut().enumerate() {
            *v = block[i * DCTSIZE + col];
        }
        for (i, v) in aan_1d(d).into_iter().enumerate() {
            block[i * DCTSIZE + col] = v;
        }
    }
}

/// Widen an 8x8 sample block into the DCT working buffer.
#[inline]
pub fn load_block(samples: &[i16; DCTSIZE2]) -> [f32; DCTSIZE2] {
    samples.map(|s| s as f32)
}
