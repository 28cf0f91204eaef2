//! Sequential colormaps for image panels.
//!
//! Each map is a list of evenly spaced RGB stops, linearly interpolated.

use clap::ValueEnum;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Colormap {
    Blues,
    BluesR,
    Greys,
    GreysR,
    Viridis,
}

const BLUES: [[u8; 3]; 9] = [
    [0xf7, 0xfb, 0xff],
    [0xde, 0xeb, 0xf7],
    [0xc6, 0xdb, 0xef],
    [0x9e, 0xca, 0xe1],
    [0x6b, 0xae, 0xd6],
    [0x42, 0x92, 0xc6],
    [0x21, 0x71, 0xb5],
    [0x08, 0x51, 0x9c],
    [0x08, 0x30, 0x6b],
];

const GREYS: [[u8; 3]; 9] = [
    [0xff, 0xff, 0xff],
    [0xf0, 0xf0, 0xf0],
    [0xd9, 0xd9, 0xd9],
    [0xbd, 0xbd, 0xbd],
    [0x96, 0x96, 0x96],
    [0x73, 0x73, 0x73],
    [0x52, 0x52, 0x52],
    [0x25, 0x25, 0x25],
    [0x00, 0x00, 0x00],
];

const VIRIDIS: [[u8; 3]; 5] = [
    [0x44, 0x01, 0x54],
    [0x3b, 0x52, 0x8b],
    [0x21, 0x91, 0x8c],
    [0x5e, 0xc9, 0x62],
    [0xfd, 0xe7, 0x25],
];

impl Colormap {
    fn stops(self) -> (&'static [[u8; 3]], bool) {
        match self {
            Colormap::Blues => (&BLUES, false),
            Colormap::BluesR => (&BLUES, true),
            Colormap::Greys => (&GREYS, false),
            Colormap::GreysR => (&GREYS, true),
            Colormap::Viridis => (&VIRIDIS, false),
        }
    }

    /// Colour for `v` in `[0, 1]`; values outside are clamped, NaN maps to 0.
    pub fn color(self, v: f64) -> RGBColor {
        let (stops, reversed) = self.stops();
        let mut t = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        if reversed {
            t = 1.0 - t;
        }
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - i as f64;
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (a, b) = (stops[i], stops[i + 1]);
        RGBColor(lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2]))
    }
}
