use crate::domain::analysis::AnalysisResult;
use crate::domain::profile::Profile;
use crate::domain::recommendation::Recommendation;

pub mod error;
pub mod http;

pub use http::HttpFinsightClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    SaveProfile,
    Recommendations,
    Analyze,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Health => "health",
            Operation::SaveProfile => "save_profile",
            Operation::Recommendations => "recommendations",
            Operation::Analyze => "analyze",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Operation::Health => "/health",
            Operation::SaveProfile => "/profile",
            Operation::Recommendations => "/recommendations",
            Operation::Analyze => "/analyze",
        }
    }
}

/// The four logical operations of the FinSight backend.
#[async_trait::async_trait]
pub trait FinsightApi: Send + Sync {
    async fn health(&self) -> anyhow::Result<serde_json::Value>;

    /// Returns the profile as echoed (and possibly normalized) by the backend.
    async fn save_profile(&self, profile: &Profile) -> anyhow::Result<Profile>;

    async fn recommendations(&self, profile: &Profile) -> anyhow::Result<Vec<Recommendation>>;

    async fn analyze(&self, question: &str, profile: &Profile) -> anyhow::Result<AnalysisResult>;
}
