//! Colour ramps for turning a field into packed RGB.
//!
//! Renderers are external; this only maps activations to bytes.

use crate::field::Field;
use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the ramp, in `[0, 1]`
    pub position: f32,
    pub rgb: Rgb,
}

impl ColorStop {
    pub const fn new(position: f32, rgb: Rgb) -> Self {
        Self { position, rgb }
    }
}

/// Piecewise-linear colour ramp over ascending stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Stops are sorted by position; an empty list samples as black
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// 18-stop spectrum ramp
    pub fn spectrum() -> Self {
        Self::new(vec![
            ColorStop::new(0.0000, [0xFF, 0x00, 0x00]),
            ColorStop::new(0.0588, [0xFF, 0x00, 0x80]),
            ColorStop::new(0.1176, [0xFF, 0x80, 0x80]),
            ColorStop::new(0.1764, [0xFF, 0x80, 0x00]),
            ColorStop::new(0.2352, [0x00, 0xFF, 0x80]),
            ColorStop::new(0.2941, [0x80, 0xFF, 0x80]),
            ColorStop::new(0.3529, [0x00, 0xFF, 0x00]),
            ColorStop::new(0.4117, [0x00, 0xFF, 0xFF]),
            ColorStop::new(0.4705, [0x80, 0x00, 0xFF]),
            ColorStop::new(0.5294, [0xFF, 0x80, 0xFF]),
            ColorStop::new(0.5882, [0x00, 0x00, 0xFF]),
            ColorStop::new(0.6470, [0x00, 0x80, 0xFF]),
            ColorStop::new(0.7058, [0x80, 0x80, 0xFF]),
            ColorStop::new(0.7647, [0xFF, 0x00, 0xFF]),
            ColorStop::new(0.8235, [0x80, 0xFF, 0x00]),
            ColorStop::new(0.8823, [0x80, 0xFF, 0xFF]),
            ColorStop::new(0.9411, [0xFF, 0xFF, 0x00]),
            ColorStop::new(1.0000, [0xFF, 0xFF, 0x80]),
        ])
    }

    /// Brown, reddish-orange, yellow, green, cyan
    pub fn fish() -> Self {
        Self::new(vec![
            ColorStop::new(0.0, [165, 42, 42]),
            ColorStop::new(0.25, [255, 69, 0]),
            ColorStop::new(0.5, [255, 255, 0]),
            ColorStop::new(0.75, [0, 255, 0]),
            ColorStop::new(1.0, [0, 255, 255]),
        ])
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at `pos`, clamped to the end stops
    pub fn sample(&self, pos: f32) -> Rgb {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [0, 0, 0],
        };
        if pos.is_nan() || pos <= first.position {
            return first.rgb;
        }
        if pos >= last.position {
            return last.rgb;
        }

        for pair in self.stops.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if pos <= right.position {
                let span = right.position - left.position;
                let t = if span > 0.0 {
                    ((pos - left.position) / span).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                return lerp_rgb(left.rgb, right.rgb, t);
            }
        }
        last.rgb
    }
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |a: u8, b: u8| (a as f32 + t * (b as f32 - a as f32)) as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Named presets selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    #[default]
    Spectrum,
    Fish,
}

/// Activation-to-colour mapping with a background for inactive cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub gradient: Gradient,
    pub background: Rgb,
    /// Values below this, and non-positive values, are drawn as background
    pub cutoff: f32,
}

impl Palette {
    pub fn from_kind(kind: PaletteKind) -> Self {
        match kind {
            PaletteKind::Spectrum => Self {
                gradient: Gradient::spectrum(),
                background: [0, 0, 0],
                cutoff: 0.0,
            },
            PaletteKind::Fish => Self {
                gradient: Gradient::fish(),
                background: [0, 0, 255],
                cutoff: 0.1,
            },
        }
    }

    pub fn color(&self, value: f32) -> Rgb {
        if value.is_nan() || value < self.cutoff || value <= 0.0 {
            return self.background;
        }
        let span = 1.0 - self.cutoff;
        let u = if span > 0.0 { (value - self.cutoff) / span } else { 1.0 };
        self.gradient.sample(u)
    }

    /// Packed RGB, row-major, three bytes per cell
    pub fn render(&self, field: &Field) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(field.len() * 3);
        for &v in field.cells() {
            pixels.extend_from_slice(&self.color(v));
        }
        pixels
    }
}

/// Exponential frame blending for motion trails
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    pixels: Vec<u8>,
    keep: f32,
}

impl TrailBuffer {
    /// `keep` is the weight of the previous frame, clamped to `[0, 1]`
    pub fn new(len: usize, keep: f32) -> Self {
        Self {
            pixels: vec![0; len],
            keep: keep.clamp(0.0, 1.0),
        }
    }

    /// Blend `frame` in and return the blended pixels
    pub fn blend(&mut self, frame: &[u8]) -> &[u8] {
        if self.pixels.len() != frame.len() {
            self.pixels = vec![0; frame.len()];
        }
        for (old, &new) in self.pixels.iter_mut().zip(frame) {
            let blended = self.keep * *old as f32 + (1.0 - self.keep) * new as f32;
            *old = blended.min(255.0) as u8;
        }
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
