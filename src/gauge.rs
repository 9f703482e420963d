//! Risk classification and the radial probability gauge.
//!
//! Two thresholds live here and are intentionally independent: the color
//! bands break at 30 and 52, while the loan decision breaks at 53.

use std::f64::consts::PI;

/// Upper bound (inclusive) of the green band.
pub const LOW_RISK_MAX: f64 = 30.0;
/// Upper bound (inclusive) of the orange band.
pub const MEDIUM_RISK_MAX: f64 = 52.0;
/// Probabilities strictly below this value get the loan.
pub const GRANT_THRESHOLD: f64 = 53.0;

pub const GAUGE_TITLE: &str = "Probabilité de non-remboursement";

const WIDTH: f64 = 420.0;
const HEIGHT: f64 = 290.0;
const CENTER_X: f64 = 210.0;
const CENTER_Y: f64 = 235.0;
const OUTER_RADIUS: f64 = 160.0;
const INNER_RADIUS: f64 = 100.0;
/// Share of the band width covered by the threshold marker.
const THRESHOLD_THICKNESS: f64 = 0.75;
const THRESHOLD_WIDTH: f64 = 4.0;

/// Color band of a default probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn classify(probability: f64) -> Self {
        if probability <= LOW_RISK_MAX {
            RiskBand::Low
        } else if probability <= MEDIUM_RISK_MAX {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskBand::Low => "green",
            RiskBand::Medium => "orange",
            RiskBand::High => "red",
        }
    }

    /// Axis range covered by the band's background step.
    pub fn range(self) -> (f64, f64) {
        match self {
            RiskBand::Low => (0.0, LOW_RISK_MAX),
            RiskBand::Medium => (LOW_RISK_MAX, MEDIUM_RISK_MAX),
            RiskBand::High => (MEDIUM_RISK_MAX, 100.0),
        }
    }
}

/// Loan decision derived from the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    NotGranted,
}

impl Decision {
    pub fn from_probability(probability: f64) -> Self {
        if probability < GRANT_THRESHOLD {
            Decision::Granted
        } else {
            Decision::NotGranted
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Decision::Granted => "Le prêt sera accordé.",
            Decision::NotGranted => "Le prêt ne sera pas accordé.",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Decision::Granted => "green",
            Decision::NotGranted => "red",
        }
    }
}

/// Semicircular gauge for one probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub probability: f64,
    pub band: RiskBand,
}

impl Gauge {
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            band: RiskBand::classify(probability),
        }
    }

    /// Readout color, matching the band.
    pub fn number_color(&self) -> &'static str {
        self.band.color()
    }

    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg class="gauge" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">"#,
            w = WIDTH,
            h = HEIGHT,
            title = GAUGE_TITLE,
        );
        svg.push_str(&format!(
            r#"<text x="{x}" y="30" text-anchor="middle" font-size="18">{title}</text>"#,
            x = CENTER_X,
            title = GAUGE_TITLE,
        ));

        for band in [RiskBand::Low, RiskBand::Medium, RiskBand::High] {
            let (start, end) = band.range();
            svg.push_str(&format!(
                r#"<path class="step" d="{d}" fill="{color}"/>"#,
                d = annulus_path(start, end, INNER_RADIUS, OUTER_RADIUS),
                color = band.color(),
            ));
        }

        // Value bar, drawn across the middle half of the band.
        let band_width = OUTER_RADIUS - INNER_RADIUS;
        let value = clamp_axis(self.probability);
        if value > 0.0 {
            svg.push_str(&format!(
                r#"<path class="bar" d="{d}" fill="black"/>"#,
                d = annulus_path(
                    0.0,
                    value,
                    INNER_RADIUS + band_width * 0.25,
                    OUTER_RADIUS - band_width * 0.25,
                ),
            ));
        }

        let margin = band_width * (1.0 - THRESHOLD_THICKNESS) / 2.0;
        let (x1, y1) = polar(value, INNER_RADIUS + margin);
        let (x2, y2) = polar(value, OUTER_RADIUS - margin);
        svg.push_str(&format!(
            r#"<line class="threshold" x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="black" stroke-width="{width}"/>"#,
            width = THRESHOLD_WIDTH,
        ));

        for tick in (0..=100).step_by(20) {
            let (x, y) = polar(f64::from(tick), OUTER_RADIUS + 14.0);
            svg.push_str(&format!(
                r#"<text class="tick" x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="12">{tick}</text>"#,
            ));
        }

        svg.push_str(&format!(
            r#"<text class="number" x="{x}" y="{y}" text-anchor="middle" font-size="44" fill="{color}">{value}</text>"#,
            x = CENTER_X,
            y = CENTER_Y - 10.0,
            color = self.number_color(),
            value = format_number(self.probability),
        ));
        svg.push_str("</svg>");
        svg
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Screen point for an axis value at `radius`; 0 sits on the left, 100 on the right.
fn polar(value: f64, radius: f64) -> (f64, f64) {
    let theta = PI * (1.0 - value / 100.0);
    (
        CENTER_X + radius * theta.cos(),
        CENTER_Y - radius * theta.sin(),
    )
}

fn annulus_path(start: f64, end: f64, inner: f64, outer: f64) -> String {
    let (ox0, oy0) = polar(start, outer);
    let (ox1, oy1) = polar(end, outer);
    let (ix1, iy1) = polar(end, inner);
    let (ix0, iy0) = polar(start, inner);
    format!(
        "M {ox0:.2} {oy0:.2} A {outer} {outer} 0 0 1 {ox1:.2} {oy1:.2} \
         L {ix1:.2} {iy1:.2} A {inner} {inner} 0 0 0 {ix0:.2} {iy0:.2} Z"
    )
}

/// Formats a number without trailing zeros (`65`, `52.9`, `0.125`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }
    let text = format!("{:.4}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
