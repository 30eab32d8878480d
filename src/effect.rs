//! Filter effect expressions.
//!
//! A filter's visual effect is written in the CSS-filter function syntax the
//! booth has always used, e.g. `"sepia(80%) contrast(120%)"`. The expression
//! is parsed once into an ordered list of [`EffectOp`]s, and the ops are
//! folded into a single affine color transform (3x3 matrix plus offset) that
//! is applied per pixel. Alpha is never touched by an effect.

use crate::error::{BoothError, BoothResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectOp {
    /// `grayscale(p)`, amount in [0,1].
    Grayscale(f32),
    /// `sepia(p)`, amount in [0,1].
    Sepia(f32),
    /// `saturate(s)`, 1.0 is identity.
    Saturate(f32),
    /// `hue-rotate(deg)`.
    HueRotate(f32),
    /// `brightness(m)`, 1.0 is identity.
    Brightness(f32),
    /// `contrast(m)`, 1.0 is identity.
    Contrast(f32),
}

/// Affine transform on normalized RGB: `out = m * rgb + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransform {
    pub m: [[f32; 3]; 3],
    pub offset: [f32; 3],
}

impl ColorTransform {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        offset: [0.0, 0.0, 0.0],
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `other` applied after `self`.
    fn then(&self, other: &Self) -> Self {
        let mut m = [[0.0f32; 3]; 3];
        let mut offset = [0.0f32; 3];
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] = (0..3).map(|k| other.m[r][k] * self.m[k][c]).sum();
            }
            offset[r] =
                (0..3).map(|k| other.m[r][k] * self.offset[k]).sum::<f32>() + other.offset[r];
        }
        Self { m, offset }
    }

    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0f32; 3];
        for r in 0..3 {
            let v = self.m[r][0] * rgb[0]
                + self.m[r][1] * rgb[1]
                + self.m[r][2] * rgb[2]
                + self.offset[r];
            out[r] = v.clamp(0.0, 1.0);
        }
        out
    }
}

/// Parses an effect expression into its ordered op list.
///
/// An empty (or all-whitespace) expression is valid and yields no ops; that
/// is the "normal" filter.
pub fn parse_expression(expr: &str) -> BoothResult<Vec<EffectOp>> {
    let mut ops = Vec::new();
    let mut rest = expr.trim();

    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| {
            BoothError::validation(format!("expected '(' in effect expression near '{rest}'"))
        })?;
        let close = rest[open..].find(')').map(|i| open + i).ok_or_else(|| {
            BoothError::validation(format!("unbalanced ')' in effect expression near '{rest}'"))
        })?;

        let name = rest[..open].trim().to_ascii_lowercase();
        let arg = rest[open + 1..close].trim();
        ops.push(parse_function(&name, arg)?);

        rest = rest[close + 1..].trim_start();
    }

    Ok(ops)
}

fn parse_function(name: &str, arg: &str) -> BoothResult<EffectOp> {
    match name {
        "grayscale" => Ok(EffectOp::Grayscale(parse_amount(name, arg)?.min(1.0))),
        "sepia" => Ok(EffectOp::Sepia(parse_amount(name, arg)?.min(1.0))),
        "saturate" => Ok(EffectOp::Saturate(parse_amount(name, arg)?)),
        "brightness" => Ok(EffectOp::Brightness(parse_amount(name, arg)?)),
        "contrast" => Ok(EffectOp::Contrast(parse_amount(name, arg)?)),
        "hue-rotate" => {
            let deg = arg.strip_suffix("deg").unwrap_or(arg).trim();
            let v: f32 = deg.parse().map_err(|_| {
                BoothError::validation(format!("hue-rotate argument '{arg}' is not a number"))
            })?;
            if !v.is_finite() {
                return Err(BoothError::validation("hue-rotate argument must be finite"));
            }
            Ok(EffectOp::HueRotate(v))
        }
        _ => Err(BoothError::validation(format!(
            "unknown effect function '{name}'"
        ))),
    }
}

/// Accepts `80%` or a bare scalar like `0.8` / `1.2`.
fn parse_amount(name: &str, arg: &str) -> BoothResult<f32> {
    let (text, percent) = match arg.strip_suffix('%') {
        Some(t) => (t.trim(), true),
        None => (arg, false),
    };
    let v: f32 = text.parse().map_err(|_| {
        BoothError::validation(format!("{name} argument '{arg}' is not a number"))
    })?;
    if !v.is_finite() || v < 0.0 {
        return Err(BoothError::validation(format!(
            "{name} argument must be finite and >= 0"
        )));
    }
    // Division keeps 120% exactly equal to the scalar 1.2.
    Ok(if percent { v / 100.0 } else { v })
}

/// Folds an op list into one color transform, in op order.
pub fn fold_ops(ops: &[EffectOp]) -> ColorTransform {
    let mut t = ColorTransform::IDENTITY;
    for op in ops {
        t = t.then(&op.transform());
    }
    t
}

impl EffectOp {
    fn transform(self) -> ColorTransform {
        match self {
            // Interpolation matrices below follow the SVG feColorMatrix
            // definitions the CSS filter shorthands are specified against.
            EffectOp::Grayscale(s) => {
                let m = 1.0 - s.clamp(0.0, 1.0);
                ColorTransform {
                    m: [
                        [0.2126 + 0.7874 * m, 0.7152 - 0.7152 * m, 0.0722 - 0.0722 * m],
                        [0.2126 - 0.2126 * m, 0.7152 + 0.2848 * m, 0.0722 - 0.0722 * m],
                        [0.2126 - 0.2126 * m, 0.7152 - 0.7152 * m, 0.0722 + 0.9278 * m],
                    ],
                    offset: [0.0; 3],
                }
            }
            EffectOp::Sepia(s) => {
                let m = 1.0 - s.clamp(0.0, 1.0);
                ColorTransform {
                    m: [
                        [0.393 + 0.607 * m, 0.769 - 0.769 * m, 0.189 - 0.189 * m],
                        [0.349 - 0.349 * m, 0.686 + 0.314 * m, 0.168 - 0.168 * m],
                        [0.272 - 0.272 * m, 0.534 - 0.534 * m, 0.131 + 0.869 * m],
                    ],
                    offset: [0.0; 3],
                }
            }
            EffectOp::Saturate(s) => ColorTransform {
                m: [
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ],
                offset: [0.0; 3],
            },
            EffectOp::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                ColorTransform {
                    m: [
                        [
                            0.213 + cos * 0.787 - sin * 0.213,
                            0.715 - cos * 0.715 - sin * 0.715,
                            0.072 - cos * 0.072 + sin * 0.928,
                        ],
                        [
                            0.213 - cos * 0.213 + sin * 0.143,
                            0.715 + cos * 0.285 + sin * 0.140,
                            0.072 - cos * 0.072 - sin * 0.283,
                        ],
                        [
                            0.213 - cos * 0.213 - sin * 0.787,
                            0.715 - cos * 0.715 + sin * 0.715,
                            0.072 + cos * 0.928 + sin * 0.072,
                        ],
                    ],
                    offset: [0.0; 3],
                }
            }
            EffectOp::Brightness(b) => ColorTransform {
                m: [[b, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, b]],
                offset: [0.0; 3],
            },
            EffectOp::Contrast(c) => {
                let o = 0.5 * (1.0 - c);
                ColorTransform {
                    m: [[c, 0.0, 0.0], [0.0, c, 0.0], [0.0, 0.0, c]],
                    offset: [o, o, o],
                }
            }
        }
    }
}

/// Applies a color transform to a straight-alpha RGBA8 buffer in place.
pub fn apply_transform(rgba: &mut [u8], t: &ColorTransform) {
    if t.is_identity() {
        return;
    }
    for px in rgba.chunks_exact_mut(4) {
        let rgb = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        let out = t.apply_rgb(rgb);
        px[0] = (out[0] * 255.0).round() as u8;
        px[1] = (out[1] * 255.0).round() as u8;
        px[2] = (out[2] * 255.0).round() as u8;
    }
}
