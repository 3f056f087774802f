//! sRGB ↔ CIE-Lab conversions and a CIE94-style perceptual distance.
//!
//! All conversions use D65/sRGB companding and the CIE standard illuminant
//! normalization. Inputs and outputs are pure values; RGB channels are
//! clamped to [0, 1] on the way back out so no NaN or out-of-gamut value
//! escapes to callers.

/// D65 reference white point.
const WHITE_X: f32 = 0.95047;
const WHITE_Y: f32 = 1.0;
const WHITE_Z: f32 = 1.08883;

/// sRGB companding threshold (gamma curve switches to the linear segment).
const SRGB_THRESHOLD: f32 = 0.04045;

/// CIE Lab pivot threshold (t > threshold uses the cube root branch).
const LAB_THRESHOLD: f32 = 0.008856;

/// Convert an sRGB color (channels in [0, 1]) to CIE-Lab.
pub fn rgb_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let r = srgb_to_linear(rgb[0]);
    let g = srgb_to_linear(rgb[1]);
    let b = srgb_to_linear(rgb[2]);

    // Linear RGB to XYZ, normalized by the D65 white point
    let x = (r * 0.4124 + g * 0.3576 + b * 0.1805) / WHITE_X;
    let y = (r * 0.2126 + g * 0.7152 + b * 0.0722) / WHITE_Y;
    let z = (r * 0.0193 + g * 0.1192 + b * 0.9505) / WHITE_Z;

    let fx = pivot_xyz(x);
    let fy = pivot_xyz(y);
    let fz = pivot_xyz(z);

    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Convert a CIE-Lab color back to sRGB. Channels are clamped to [0, 1].
pub fn lab_to_rgb(lab: [f32; 3]) -> [f32; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = fy + lab[1] / 500.0;
    let fz = fy - lab[2] / 200.0;

    let x = WHITE_X * pivot_xyz_inv(fx);
    let y = WHITE_Y * pivot_xyz_inv(fy);
    let z = WHITE_Z * pivot_xyz_inv(fz);

    let r = x * 3.2406 + y * -1.5372 + z * -0.4986;
    let g = x * -0.9689 + y * 1.8758 + z * 0.0415;
    let b = x * 0.0557 + y * -0.2040 + z * 1.0570;

    [
        linear_to_srgb(r).clamp(0.0, 1.0),
        linear_to_srgb(g).clamp(0.0, 1.0),
        linear_to_srgb(b).clamp(0.0, 1.0),
    ]
}

/// CIE94-style weighted distance between two Lab colors.
///
/// Decomposes the difference into lightness, chroma, and hue terms, with
/// chroma/hue weights derived from the first color's chroma. The hue term
/// is zero-floored before the square root, which also covers the achromatic
/// `c1 == c2 == 0` corner without a division guard.
pub fn perceptual_distance(lab1: [f32; 3], lab2: [f32; 3]) -> f32 {
    let c1 = (lab1[1] * lab1[1] + lab1[2] * lab1[2]).sqrt();
    let c2 = (lab2[1] * lab2[1] + lab2[2] * lab2[2]).sqrt();

    let dl = lab1[0] - lab2[0];
    let dc = c1 - c2;
    let da = lab1[1] - lab2[1];
    let db = lab1[2] - lab2[2];
    let dh2 = (da * da + db * db - dc * dc).max(0.0);

    let sc = 1.0 + 0.045 * c1;
    let sh = 1.0 + 0.015 * c1;

    let term_c = dc / sc;
    let term_h2 = dh2 / (sh * sh);

    (dl * dl + term_c * term_c + term_h2).max(0.0).sqrt()
}

/// Remove sRGB gamma (companded value to linear).
fn srgb_to_linear(c: f32) -> f32 {
    if c > SRGB_THRESHOLD {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Apply sRGB gamma (linear value to companded).
fn linear_to_srgb(c: f32) -> f32 {
    if c > 0.0031308 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

fn pivot_xyz(t: f32) -> f32 {
    if t > LAB_THRESHOLD {
        t.cbrt()
    } else {
        (7.787 * t) + 16.0 / 116.0
    }
}

fn pivot_xyz_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > LAB_THRESHOLD {
        t3
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}
