//! Mass-loss rate versus look-back time, drawn as a step histogram.
//!
//! Time runs along x as negative years (the past on the left, today at 0).
//! The y axis is labelled in units of `10^k M_sun/yr`, with `k` taken from
//! the major tick spacing.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::MassLossSeries;
use crate::plot::save::{DrawResult, Figure};
use crate::plot::style::RateStyle;

pub struct MassLossFigure {
    /// `(lookback_yr, rate)` in shell order.
    pub pairs: Vec<(f64, f64)>,
    pub style: RateStyle,
    pub font_family: String,
}

impl MassLossFigure {
    pub fn new(series: &MassLossSeries, style: RateStyle, font_family: &str) -> Self {
        Self {
            pairs: series.pairs(),
            style,
            font_family: font_family.to_string(),
        }
    }

    fn x_range(&self) -> (f64, f64) {
        if let Some(lim) = self.style.x_limits {
            return lim;
        }
        let oldest = self.pairs.iter().map(|(t, _)| *t).fold(0.0, f64::max);
        let lo = -(oldest / self.style.x_major).ceil() * self.style.x_major;
        if lo < 0.0 { (lo, 0.0) } else { (-self.style.x_major, 0.0) }
    }

    fn y_range(&self) -> (f64, f64) {
        if let Some(lim) = self.style.y_limits {
            return lim;
        }
        let peak = self.pairs.iter().map(|(_, r)| *r).fold(0.0, f64::max);
        let top = (peak * 1.05 / self.style.y_major).ceil() * self.style.y_major;
        (0.0, top.max(self.style.y_major))
    }
}

/// Points of a `steps-pre` line: `y[i]` is held over `(x[i-1], x[i]]`.
pub fn step_points(xy: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(xy.len() * 2);
    let mut iter = xy.iter();
    let Some(&first) = iter.next() else {
        return out;
    };
    out.push(first);
    let mut prev_x = first.0;
    for &(x, y) in iter {
        out.push((prev_x, y));
        out.push((x, y));
        prev_x = x;
    }
    out
}

/// Clip a monotone, axis-aligned step line to `x0 <= x <= x1`.
///
/// Segments crossing a limit are cut at it, so the step that straddles the
/// axis edge stays visible up to the edge.
pub fn clip_steps_x(points: &[(f64, f64)], x0: f64, x1: f64) -> Vec<(f64, f64)> {
    if let [only] = points {
        return if (x0..=x1).contains(&only.0) { vec![*only] } else { Vec::new() };
    }
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if a.0.max(b.0) < x0 || a.0.min(b.0) > x1 {
            continue;
        }
        let ca = (a.0.clamp(x0, x1), a.1);
        let cb = (b.0.clamp(x0, x1), b.1);
        if out.last() != Some(&ca) {
            out.push(ca);
        }
        out.push(cb);
    }
    out
}

/// Power of ten used to scale y tick labels.
pub fn label_exponent(major: f64) -> i32 {
    major.abs().log10().floor() as i32
}

/// `v / 10^exp`, with as few decimals as the value needs.
pub fn scaled_label(v: f64, exp: i32) -> String {
    let s = v / 10f64.powi(exp);
    if (s - s.round()).abs() < 1e-9 {
        format!("{:.0}", s.round())
    } else {
        format!("{s:.1}")
    }
}

fn superscript(exp: i32) -> String {
    exp.to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            _ => '⁹',
        })
        .collect()
}

fn tick_count(lo: f64, hi: f64, step: f64) -> usize {
    (((hi - lo) / step).round() as usize + 1).max(2)
}

impl Figure for MassLossFigure {
    fn size(&self) -> (u32, u32) {
        (self.style.width, self.style.height)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, labels: bool) -> DrawResult<DB> {
        let s = &self.style;
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.y_range();
        let exp = label_exponent(s.y_major);
        let family = self.font_family.as_str();
        let font_size = s.font_size as f64;

        root.fill(&WHITE)?;

        // Without label areas plotters draws no tick text or axis descriptions.
        let (x_area, y_area) = if labels { (50, 70) } else { (0, 0) };
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(x_area)
            .y_label_area_size(y_area)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        let y_desc = format!("Ṁ (10{} M☉ yr⁻¹)", superscript(exp));
        let x_fmt = |v: &f64| format!("{v:.0}");
        let y_fmt = |v: &f64| scaled_label(*v, exp);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(tick_count(x0, x1, s.x_major))
            .y_labels(tick_count(y0, y1, s.y_major))
            .max_light_lines(((s.x_major / s.x_minor).round() as usize).saturating_sub(1))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc("time (yr)")
            .y_desc(y_desc.as_str())
            .axis_desc_style((family, font_size))
            .label_style((family, font_size * 0.8))
            .bold_line_style(BLACK.mix(0.25))
            .light_line_style(BLACK.mix(0.08));
        if !s.grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        let past: Vec<(f64, f64)> = self.pairs.iter().map(|&(t, r)| (-t, r)).collect();
        let line = clip_steps_x(&step_points(&past), x0, x1);
        let line_style = BLACK.stroke_width(s.line_width);
        let series = chart.draw_series(LineSeries::new(line, line_style))?;

        if let (true, Some(legend)) = (labels, &s.legend) {
            series
                .label(legend.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font((family, font_size * 0.8))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    }
}
