use crate::domain::lenient::{self, Scalar};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub question: &'a str,
    pub profile: &'a crate::domain::profile::Profile,
}

/// One analysis report as returned by the backend. Only `ticker` is required; every
/// other section may be missing or carry an unexpected JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "lenient::text")]
    pub ticker: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub price_data: Option<PriceData>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub analysis: Option<Analysis>,
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub evidence_pack: Vec<EvidenceItem>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub score: Option<Score>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub validation: Option<Validation>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub disclaimer: Option<String>,

    /// The payload exactly as received, for the trace panel.
    #[serde(skip)]
    pub raw: Value,
}

impl AnalysisResult {
    pub fn from_value(raw: Value) -> anyhow::Result<Self> {
        let mut parsed = serde_json::from_value::<AnalysisResult>(raw.clone())
            .context("failed to decode analysis payload")?;
        parsed.raw = raw;
        Ok(parsed)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceData {
    #[serde(default)]
    pub current_price: Option<Scalar>,
    #[serde(default)]
    pub change_1d_pct: Option<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub executive_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub expected_return: Option<String>,
    #[serde(default)]
    pub news_summary: Option<Narrative>,
    #[serde(default)]
    pub bull_case: Option<Narrative>,
    #[serde(default)]
    pub bear_case: Option<Narrative>,
    #[serde(default)]
    pub key_risks: Option<Narrative>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub last_quarter_result: Option<String>,
}

/// A narrative field that is normally a list of bullets but may be a lone string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Narrative {
    List(Vec<Value>),
    Single(Value),
}

impl Narrative {
    /// Bullets as display strings. An empty string or `null` yields no bullets.
    pub fn items(&self) -> Vec<String> {
        match self {
            Narrative::List(values) => values.iter().map(lenient::coerce_text).collect(),
            Narrative::Single(Value::Null) => Vec::new(),
            Narrative::Single(Value::String(s)) if s.is_empty() => Vec::new(),
            Narrative::Single(v) => vec![lenient::coerce_text(v)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub claim: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub total: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub breakdown: Vec<ScoreComponent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreComponent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(default)]
    pub value: Option<Scalar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Pass,
    Fail,
    Unknown,
}

/// Self-assessment reported by the backend. The client never evaluates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Validation {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub reasons: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub suggested_route: Option<String>,
}

impl Validation {
    pub fn status(&self) -> ValidationStatus {
        match self.status.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("PASS") => ValidationStatus::Pass,
            Some(s) if s.eq_ignore_ascii_case("FAIL") => ValidationStatus::Fail,
            _ => ValidationStatus::Unknown,
        }
    }
}
