pub mod capture;
pub mod client;
pub mod controller;
pub mod domain;
pub mod render;
pub mod trace;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base: String,
        pub timeout_secs: u64,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let api_base = std::env::var("FINSIGHT_API_BASE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

            let timeout_secs = match std::env::var("FINSIGHT_TIMEOUT_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("FINSIGHT_TIMEOUT_SECS must be an integer (got {s:?})"))?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            };
            anyhow::ensure!(timeout_secs > 0, "FINSIGHT_TIMEOUT_SECS must be > 0");

            Ok(Self {
                api_base,
                timeout_secs,
            })
        }

        pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
            if let Some(base) = api_base.filter(|s| !s.trim().is_empty()) {
                self.api_base = base;
            }
            self
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                api_base: DEFAULT_API_BASE.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        }
    }
}
