//! HTML rendering of the dashboard page.
//!
//! The page is a self-contained document: charts are inline SVG and the only
//! script submits the form when the feature dropdown changes.

use crate::dashboard::{DashboardView, PredictionView, ProfileView, Section};
use crate::distribution::DistributionChart;
use crate::errors::AppError;
use crate::gauge::format_number;
use crate::models::Feature;
use serde::Serialize;
use tera::{Context, Tera};

pub const PAGE_TITLE: &str = "Risque de non-remboursement";

/// Template name; the `.html` suffix turns on Tera's autoescaping.
const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("../templates/dashboard.html");

#[derive(Debug, Serialize)]
struct FeatureOption {
    name: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct PredictionContext {
    gauge_svg: String,
    color: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct FieldContext<'a> {
    label: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct DistributionContext {
    title: String,
    svg: String,
    x_min: String,
    x_max: String,
    has_marker: bool,
    client_value: String,
}

/// Values handed to the page template.
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'static str,
    sk_id_curr: &'a str,
    features: Vec<FeatureOption>,
    prediction: Option<PredictionContext>,
    prediction_error: Option<&'a str>,
    profile: Option<Vec<FieldContext<'a>>>,
    profile_error: Option<&'a str>,
    distribution: Option<DistributionContext>,
    distribution_error: Option<&'a str>,
}

impl<'a> PageContext<'a> {
    fn from_view(view: &'a DashboardView) -> Result<Self, AppError> {
        Ok(Self {
            title: PAGE_TITLE,
            sk_id_curr: &view.sk_id_curr,
            features: feature_options(view.feature),
            prediction: view.prediction.ready().map(prediction_context),
            prediction_error: view.prediction.error(),
            profile: view.profile.ready().map(profile_context),
            profile_error: view.profile.error(),
            distribution: view.distribution.ready().map(distribution_context).transpose()?,
            distribution_error: view.distribution.error(),
        })
    }
}

fn feature_options(selected: Feature) -> Vec<FeatureOption> {
    Feature::ALL
        .into_iter()
        .map(|feature| FeatureOption {
            name: feature.as_str(),
            selected: feature == selected,
        })
        .collect()
}

fn prediction_context(prediction: &PredictionView) -> PredictionContext {
    PredictionContext {
        gauge_svg: prediction.gauge.to_svg(),
        color: prediction.decision.color(),
        message: prediction.decision.message(),
    }
}

fn profile_context(profile: &ProfileView) -> Vec<FieldContext<'_>> {
    profile
        .fields
        .iter()
        .map(|field| FieldContext {
            label: field.label,
            value: &field.value,
        })
        .collect()
}

fn distribution_context(chart: &DistributionChart) -> Result<DistributionContext, AppError> {
    let (x_min, x_max) = chart.x_labels();
    Ok(DistributionContext {
        title: chart.title(),
        svg: chart.to_svg()?,
        x_min,
        x_max,
        has_marker: chart.client_value.is_some(),
        client_value: chart.client_value.map(format_number).unwrap_or_default(),
    })
}

/// Render the full dashboard document.
pub fn render(view: &DashboardView) -> Result<String, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let context = Context::from_serialize(PageContext::from_view(view)?)?;
    let rendered = tera.render(TEMPLATE_NAME, &context)?;
    Ok(rendered)
}
