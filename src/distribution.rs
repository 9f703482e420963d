//! Population histogram with the applicant's value overlaid.

use crate::errors::AppError;
use crate::gauge::format_number;
use crate::models::Feature;
use plotters::prelude::*;

/// Number of histogram bins.
pub const BIN_COUNT: usize = 50;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 320;
const MARGIN: u32 = 16;
const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);
const MARKER_WIDTH: u32 = 3;
/// Number of dash periods along the client marker.
const MARKER_DASHES: usize = 16;

/// Equal-width bins over the finite values of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `sample` into `bins` buckets between its minimum and maximum.
    ///
    /// The last bin is closed on the right. An empty sample gives no bins;
    /// a constant sample is spread over a unit-wide range around its value.
    pub fn from_sample(sample: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
        let bounds = finite.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

        let Some((min, max)) = bounds.filter(|_| bins > 0) else {
            return Self {
                start: 0.0,
                bin_width: 0.0,
                counts: Vec::new(),
            };
        };

        let (start, end) = if max > min {
            (min, max)
        } else {
            (min - 0.5, min + 0.5)
        };
        let bin_width = (end - start) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in finite {
            let index = (((v - start) / bin_width) as usize).min(bins - 1);
            counts[index] += 1;
        }

        Self {
            start,
            bin_width,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Histogram chart for one feature plus the client marker.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionChart {
    pub feature: Feature,
    /// `None` when the scoring API has no value for the client.
    pub client_value: Option<f64>,
    pub histogram: Histogram,
}

impl DistributionChart {
    pub fn new(feature: Feature, client_value: Option<f64>, sample: &[f64]) -> Self {
        Self {
            feature,
            client_value: client_value.filter(|v| v.is_finite()),
            histogram: Histogram::from_sample(sample, BIN_COUNT),
        }
    }

    pub fn title(&self) -> String {
        format!("Distribution de {}", self.feature)
    }

    /// X-axis range covering both the population and the client value.
    pub fn x_range(&self) -> (f64, f64) {
        let (lo, hi) = match (self.histogram.is_empty(), self.client_value) {
            (false, Some(c)) => (self.histogram.start.min(c), self.histogram.end().max(c)),
            (false, None) => (self.histogram.start, self.histogram.end()),
            (true, Some(c)) => (c, c),
            (true, None) => (0.0, 1.0),
        };
        if hi > lo {
            (lo, hi)
        } else {
            (lo - 0.5, hi + 0.5)
        }
    }

    /// Axis bounds formatted for the caption under the chart.
    pub fn x_labels(&self) -> (String, String) {
        let (lo, hi) = self.x_range();
        (format_number(lo), format_number(hi))
    }

    /// Draws the bars, the baseline and the dashed client marker as SVG.
    pub fn to_svg(&self) -> Result<String, AppError> {
        let (x_min, x_max) = self.x_range();
        let y_max = (self.histogram.max_count().max(1) as f64) * 1.05;

        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(MARGIN)
                .build_cartesian_2d(x_min..x_max, 0f64..y_max)
                .map_err(render_error)?;

            let histogram = &self.histogram;
            chart
                .draw_series(histogram.counts.iter().enumerate().filter(|(_, count)| **count > 0).map(
                    |(i, &count)| {
                        let left = histogram.start + histogram.bin_width * i as f64;
                        Rectangle::new(
                            [(left, 0.0), (left + histogram.bin_width, count as f64)],
                            BAR_COLOR.filled(),
                        )
                    },
                ))
                .map_err(render_error)?;

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_min, 0.0), (x_max, 0.0)],
                    &BLACK,
                )))
                .map_err(render_error)?;

            if let Some(client) = self.client_value {
                let period = y_max / MARKER_DASHES as f64;
                chart
                    .draw_series((0..MARKER_DASHES).map(|i| {
                        let y0 = period * i as f64;
                        PathElement::new(
                            vec![(client, y0), (client, y0 + period * 0.6)],
                            RED.stroke_width(MARKER_WIDTH),
                        )
                    }))
                    .map_err(render_error)?;
            }

            root.present().map_err(render_error)?;
        }
        Ok(buffer)
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Render(err.to_string())
}
