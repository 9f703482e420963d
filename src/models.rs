use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============ Domain Types ============

/// Applicant identifier (`SK_ID_CURR`) accepted by the scoring API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub i64);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Features whose population distribution can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Feature {
    #[default]
    ExtSource2,
    ExtSource3,
    ExtSource1,
    PaymentRate,
    DaysBirth,
    DaysEmployed,
    DaysIdPublish,
    DaysRegistration,
    AmtAnnuity,
    DaysEmployedPerc,
}

impl Feature {
    /// Dropdown order.
    pub const ALL: [Feature; 10] = [
        Feature::ExtSource2,
        Feature::ExtSource3,
        Feature::ExtSource1,
        Feature::PaymentRate,
        Feature::DaysBirth,
        Feature::DaysEmployed,
        Feature::DaysIdPublish,
        Feature::DaysRegistration,
        Feature::AmtAnnuity,
        Feature::DaysEmployedPerc,
    ];

    /// Column name understood by the scoring API.
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::ExtSource2 => "EXT_SOURCE_2",
            Feature::ExtSource3 => "EXT_SOURCE_3",
            Feature::ExtSource1 => "EXT_SOURCE_1",
            Feature::PaymentRate => "PAYMENT_RATE",
            Feature::DaysBirth => "DAYS_BIRTH",
            Feature::DaysEmployed => "DAYS_EMPLOYED",
            Feature::DaysIdPublish => "DAYS_ID_PUBLISH",
            Feature::DaysRegistration => "DAYS_REGISTRATION",
            Feature::AmtAnnuity => "AMT_ANNUITY",
            Feature::DaysEmployedPerc => "DAYS_EMPLOYED_PERC",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| format!("unknown feature `{}`", s))
    }
}

impl Serialize for Feature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============ Scoring API Payloads ============

/// Body of `/predict` and `/info` requests.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantRequest {
    #[serde(rename = "SK_ID_CURR")]
    pub sk_id_curr: ApplicantId,
}

/// Body of `/distribution` requests.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionRequest {
    #[serde(rename = "SK_ID_CURR")]
    pub sk_id_curr: ApplicantId,
    pub feature: Feature,
}

/// `/predict` response: default probability in percent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictResponse {
    pub probability: f64,
}

/// `/info` response. Every attribute may be absent or null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApplicantProfile {
    /// Birth date as a spreadsheet day-count.
    #[serde(rename = "Date_Naissance", default)]
    pub birth_date: Option<Value>,

    /// Employment start date as a spreadsheet day-count.
    #[serde(rename = "Emploi_Depuis", default)]
    pub employed_since: Option<Value>,

    #[serde(rename = "NAME_FAMILY_STATUS_Married", default)]
    pub married: Option<Value>,

    #[serde(rename = "INCOME_PER_PERSON", default)]
    pub income_per_person: Option<Value>,

    #[serde(rename = "NAME_EDUCATION_TYPE_Highereducation", default)]
    pub higher_education: Option<Value>,
}

/// `/distribution` response.
///
/// Missing feature values come through as `null`, both for the client and
/// inside the population sample.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistributionResponse {
    #[serde(default)]
    pub client_value: Option<f64>,
    #[serde(default)]
    pub distribution: Vec<Option<f64>>,
}

impl DistributionResponse {
    /// Population values with the missing ones dropped.
    pub fn population(&self) -> Vec<f64> {
        self.distribution.iter().flatten().copied().collect()
    }
}
