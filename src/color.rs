//! Color space conversion routines.
//!
//! This module implements RGB to YCbCr conversion following the ITU-R BT.601
//! standard, as used by JFIF. The level shift is folded into the luma
//! equation so that all three outputs are centered around zero and ready
//! for the forward DCT:
//! ```text
//! Y  =  0.299    * R + 0.587    * G + 0.114    * B - 128
//! Cb = -0.168736 * R - 0.331264 * G + 0.5      * B
//! Cr =  0.5      * R - 0.418688 * G - 0.081312 * B
//! ```

/// Lowest centered sample value.
const SAMPLE_MIN: f32 = -128.0;

/// Highest centered sample value.
const SAMPLE_MAX: f32 = 127.0;

const Y_R: f32 = 0.299;
const Y_G: f32 = 0.587;
const Y_B: f32 = 0.114;
const CB_R: f32 = -0.168736;
const CB_G: f32 = -0.331264;
const CB_B: f32 = 0.5;
const CR_R: f32 = 0.5;
const CR_G: f32 = -0.418688;
const CR_B: f32 = -0.081312;

/// Convert a single RGB pixel to level-shifted YCbCr.
///
/// # Arguments
/// * `r` - Red component (0-255)
/// * `g` - Green component (0-255)
/// * `b` - Blue component (0-255)
///
/// # Returns
/// Tuple of (Y, Cb, Cr), each saturated to -128.0..=127.0
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    let y = Y_R * r + Y_G * g + Y_B * b - 128.0;
    let cb = CB_R * r + CB_G * g + CB_B * b;
    let cr = CR_R * r + CR_G * g + CR_B * b;

    (saturate(y), saturate(cb), saturate(cr))
}

#[inline]
fn saturate(v: f32) -> f32 {
    v.clamp(SAMPLE_MIN, SAMPLE_MAX)
}

/// Round a centered sample to the nearest integer and store it.
///
/// Rounds half away from zero and saturates to -128..=127.
#[inline]
pub fn to_sample(v: f32) -> i16 {
    saturate(v).round() as i16
}
