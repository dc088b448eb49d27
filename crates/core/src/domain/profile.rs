use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => bail!("unknown risk level {other:?} (expected low, medium or high)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1m")]
    OneMonth,
    #[default]
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Horizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::OneMonth => "1m",
            Horizon::SixMonths => "6m",
            Horizon::OneYear => "1y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Horizon::OneMonth => "1 Month",
            Horizon::SixMonths => "6 Months",
            Horizon::OneYear => "1 Year",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Horizon::OneMonth),
            "6m" => Ok(Horizon::SixMonths),
            "1y" => Ok(Horizon::OneYear),
            other => bail!("unknown horizon {other:?} (expected 1m, 6m or 1y)"),
        }
    }
}

/// Investor profile. Construction validates the budget, so every `Profile` in the
/// process has `budget > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireProfile")]
pub struct Profile {
    budget: f64,
    risk: RiskLevel,
    horizon: Horizon,
}

impl Profile {
    pub fn new(budget: f64, risk: RiskLevel, horizon: Horizon) -> anyhow::Result<Self> {
        ensure!(budget.is_finite(), "budget must be a finite number (got {budget})");
        ensure!(budget > 0.0, "budget must be positive (got {budget})");
        Ok(Self {
            budget,
            risk,
            horizon,
        })
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "budget=${:.2} risk={} horizon={}",
            self.budget, self.risk, self.horizon
        )
    }
}

// The backend echoes the profile with extra keys (e.g. `saved: true`) and falls
// back to a 6m horizon when none is given.
#[derive(Debug, Deserialize)]
struct WireProfile {
    budget: f64,
    risk: RiskLevel,
    #[serde(default)]
    horizon: Horizon,
}

impl TryFrom<WireProfile> for Profile {
    type Error = anyhow::Error;

    fn try_from(wire: WireProfile) -> anyhow::Result<Self> {
        Profile::new(wire.budget, wire.risk, wire.horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_wire_names() {
        let p = Profile::new(5000.0, RiskLevel::High, Horizon::OneYear).unwrap();
        assert_eq!(
            serde_json::to_value(p).unwrap(),
            json!({"budget": 5000.0, "risk": "high", "horizon": "1y"})
        );
    }

    #[test]
    fn accepts_backend_echo_with_extra_keys() {
        let v = json!({"budget": 250, "risk": "low", "horizon": "1m", "saved": true});
        let p: Profile = serde_json::from_value(v).unwrap();
        assert_eq!(p.budget(), 250.0);
        assert_eq!(p.risk(), RiskLevel::Low);
        assert_eq!(p.horizon(), Horizon::OneMonth);
    }

    #[test]
    fn echo_without_horizon_defaults_to_six_months() {
        let v = json!({"budget": 10.5, "risk": "medium"});
        let p: Profile = serde_json::from_value(v).unwrap();
        assert_eq!(p.horizon(), Horizon::SixMonths);
    }

    #[test]
    fn rejects_non_positive_budget() {
        assert!(Profile::new(0.0, RiskLevel::Low, Horizon::OneMonth).is_err());
        assert!(Profile::new(-1.0, RiskLevel::Low, Horizon::OneMonth).is_err());
        assert!(Profile::new(f64::NAN, RiskLevel::Low, Horizon::OneMonth).is_err());

        let v = json!({"budget": 0, "risk": "low", "horizon": "1m"});
        assert!(serde_json::from_value::<Profile>(v).is_err());
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(" 6m ".parse::<Horizon>().unwrap(), Horizon::SixMonths);
        assert!("2y".parse::<Horizon>().is_err());
        assert!("extreme".parse::<RiskLevel>().is_err());
    }
}
