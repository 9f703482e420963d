//! Dashboard orchestration
//!
//! One page request runs the steps in order:
//! 1. Validate the identifier and fetch the prediction (on Run)
//! 2. Validate again and fetch the personal information (on Run)
//! 3. Validate again and fetch the selected feature distribution
//!
//! A failing step is reported inline and never stops the following ones.

use crate::dates::{decode_json_day_count, UNAVAILABLE};
use crate::distribution::DistributionChart;
use crate::errors::AppError;
use crate::gauge::{Decision, Gauge};
use crate::models::{ApplicantProfile, Feature};
use crate::reference::ReferenceTable;
use crate::scoring_client::ScoringClient;
use serde::Deserialize;
use serde_json::Value;

pub const INVALID_ID_MESSAGE: &str = "Veuillez entrer un SK_ID_CURR valide.";
const PREDICT_ERROR_PREFIX: &str = "Erreur lors de l'appel à l'API";
const INFO_ERROR_PREFIX: &str = "Erreur lors de l'appel à l'API pour les informations personnelles";
const DISTRIBUTION_ERROR_PREFIX: &str = "Erreur lors de l'appel à l'API pour la distribution";

/// Form fields of the dashboard page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub sk_id_curr: Option<String>,
    #[serde(default)]
    pub feature: Option<String>,
    /// Present when the Run button submitted the form.
    #[serde(default)]
    pub run: Option<String>,
}

impl DashboardQuery {
    pub fn run_requested(&self) -> bool {
        self.run.is_some()
    }

    /// Selected feature; unknown names fall back to the first one.
    pub fn selected_feature(&self) -> Feature {
        self.feature
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }
}

/// Outcome of one dashboard step.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    NotRequested,
    Ready(T),
    Failed(String),
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub gauge: Gauge,
    pub decision: Decision,
}

impl PredictionView {
    pub fn new(probability: f64) -> Self {
        Self {
            gauge: Gauge::new(probability),
            decision: Decision::from_probability(probability),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub fields: Vec<ProfileField>,
}

impl ProfileView {
    /// Formats profile attributes for display; missing ones read "Non disponible".
    pub fn from_profile(profile: &ApplicantProfile) -> Self {
        let fields = vec![
            ProfileField {
                label: "Date de Naissance",
                value: decode_json_day_count(profile.birth_date.as_ref()),
            },
            ProfileField {
                label: "Emploi Depuis",
                value: decode_json_day_count(profile.employed_since.as_ref()),
            },
            ProfileField {
                label: "Statut Marital",
                value: display_value(profile.married.as_ref()),
            },
            ProfileField {
                label: "Revenu par Personne",
                value: display_value(profile.income_per_person.as_ref()),
            },
            ProfileField {
                label: "Niveau d'Éducation supérieur",
                value: display_value(profile.higher_education.as_ref()),
            },
        ];
        Self { fields }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNAVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Everything the page needs for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub sk_id_curr: String,
    pub feature: Feature,
    pub prediction: Section<PredictionView>,
    pub profile: Section<ProfileView>,
    pub distribution: Section<DistributionChart>,
}

fn inline_error(prefix: &str, err: &AppError) -> String {
    format!("{}: {}", prefix, err.inline_detail())
}

/// Runs the dashboard steps for one request.
pub async fn build_view(
    reference: &ReferenceTable,
    client: &ScoringClient,
    query: &DashboardQuery,
) -> DashboardView {
    let raw_id = query.sk_id_curr.as_deref().unwrap_or("");
    let feature = query.selected_feature();

    let (prediction, profile) = if query.run_requested() {
        (
            predict_step(reference, client, raw_id).await,
            info_step(reference, client, raw_id).await,
        )
    } else {
        (Section::NotRequested, Section::NotRequested)
    };
    let distribution = distribution_step(reference, client, raw_id, feature).await;

    DashboardView {
        sk_id_curr: raw_id.to_string(),
        feature,
        prediction,
        profile,
        distribution,
    }
}

pub async fn predict_step(
    reference: &ReferenceTable,
    client: &ScoringClient,
    raw_id: &str,
) -> Section<PredictionView> {
    let id = match reference.validate(raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::info!("Prediction skipped: {}", e);
            return Section::Failed(INVALID_ID_MESSAGE.to_string());
        }
    };

    match client.predict(id).await {
        Ok(response) => {
            tracing::info!("Applicant {} probability: {}", id, response.probability);
            Section::Ready(PredictionView::new(response.probability))
        }
        Err(e) => {
            tracing::error!("Prediction failed for {}: {}", id, e);
            Section::Failed(inline_error(PREDICT_ERROR_PREFIX, &e))
        }
    }
}

/// An invalid identifier leaves the section empty: the prediction step
/// already reported it.
pub async fn info_step(
    reference: &ReferenceTable,
    client: &ScoringClient,
    raw_id: &str,
) -> Section<ProfileView> {
    let Ok(id) = reference.validate(raw_id) else {
        return Section::NotRequested;
    };

    match client.info(id).await {
        Ok(profile) => Section::Ready(ProfileView::from_profile(&profile)),
        Err(e) => {
            tracing::error!("Info lookup failed for {}: {}", id, e);
            Section::Failed(inline_error(INFO_ERROR_PREFIX, &e))
        }
    }
}

pub async fn distribution_step(
    reference: &ReferenceTable,
    client: &ScoringClient,
    raw_id: &str,
    feature: Feature,
) -> Section<DistributionChart> {
    let id = match reference.validate(raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("Distribution skipped: {}", e);
            return Section::Failed(INVALID_ID_MESSAGE.to_string());
        }
    };

    match client.distribution(id, feature).await {
        Ok(response) => {
            let population = response.population();
            tracing::info!(
                "Distribution of {} for {}: {} population values ({} missing)",
                feature,
                id,
                population.len(),
                response.distribution.len() - population.len()
            );
            Section::Ready(DistributionChart::new(
                feature,
                response.client_value,
                &population,
            ))
        }
        Err(e) => {
            tracing::error!("Distribution lookup failed for {}: {}", id, e);
            Section::Failed(inline_error(DISTRIBUTION_ERROR_PREFIX, &e))
        }
    }
}
