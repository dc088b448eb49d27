use crate::domain::profile::{Horizon, Profile, RiskLevel};
use anyhow::Context;

pub const DEFAULT_BUDGET: &str = "5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub budget: String,
    pub risk: RiskLevel,
    pub horizon: Horizon,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET.to_string(),
            risk: RiskLevel::default(),
            horizon: Horizon::default(),
        }
    }
}

impl ProfileForm {
    pub fn set_budget(&mut self, raw: impl Into<String>) {
        self.budget = raw.into();
    }

    pub fn set_risk(&mut self, risk: RiskLevel) {
        self.risk = risk;
    }

    pub fn set_horizon(&mut self, horizon: Horizon) {
        self.horizon = horizon;
    }

    pub fn submit(&self) -> anyhow::Result<Profile> {
        let raw = self.budget.trim();
        let budget = raw
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .with_context(|| format!("budget must be a number (got {raw:?})"))?;
        Profile::new(budget, self.risk, self.horizon)
    }
}

/// Trimmed question text, or `None` when there is nothing to ask.
pub fn question(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
