use crate::client::FinsightApi;
use crate::domain::analysis::AnalysisResult;
use crate::domain::profile::Profile;
use crate::domain::recommendation::Recommendation;

pub mod state;

pub use state::{
    AnalyzePhase, AnalyzeTicket, Completion, Notification, NotificationKind, ProfilePhase, UiState,
};

pub const PROFILE_REQUIRED: &str =
    "profile required: save your profile before asking for an analysis";
pub const PICKS_UPDATED: &str = "Stock picks updated!";

/// Sequences profile-save → recommendations and analyze requests over one [`UiState`].
#[derive(Debug, Default)]
pub struct Controller {
    state: UiState,
    profile_phase: ProfilePhase,
    analyze_phase: AnalyzePhase,
    notification: Option<Notification>,
    analyze_seq: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn profile_phase(&self) -> ProfilePhase {
        self.profile_phase
    }

    pub fn analyze_phase(&self) -> AnalyzePhase {
        self.analyze_phase
    }

    /// True until a profile has been saved.
    pub fn analysis_locked(&self) -> bool {
        self.state.profile.is_none()
    }

    /// Whether the question control should accept a submission.
    pub fn analyze_enabled(&self) -> bool {
        !self.analysis_locked() && !self.state.loading
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    /// Saves `profile` and refreshes recommendations for it.
    ///
    /// Both are committed together; on any failure the previous profile and
    /// recommendations stay in place. Never touches `result` or `error`.
    pub async fn save_profile(&mut self, api: &dyn FinsightApi, profile: Profile) -> Notification {
        self.profile_phase = ProfilePhase::Saving;
        tracing::debug!(%profile, "profile sequence: saving");

        let outcome = self.run_profile_sequence(api, &profile).await;
        self.profile_phase = ProfilePhase::Idle;

        let notification = match outcome {
            Ok((saved, recommendations)) => {
                tracing::info!(
                    profile = %saved,
                    recommendations_len = recommendations.len(),
                    "profile saved"
                );
                self.state.profile = Some(saved);
                self.state.recommendations = recommendations;
                Notification::success(PICKS_UPDATED)
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile sequence failed");
                Notification::failure(format!("Failed to save profile: {err:#}"))
            }
        };

        self.notification = Some(notification.clone());
        notification
    }

    async fn run_profile_sequence(
        &mut self,
        api: &dyn FinsightApi,
        profile: &Profile,
    ) -> anyhow::Result<(Profile, Vec<Recommendation>)> {
        let saved = api.save_profile(profile).await?;

        self.profile_phase = ProfilePhase::FetchingRecommendations;
        tracing::debug!(profile = %saved, "profile sequence: fetching recommendations");
        let recommendations = api.recommendations(&saved).await?;

        Ok((saved, recommendations))
    }

    /// Enters `Analyzing` for `question`.
    ///
    /// Returns `None` when the precondition fails; the failure is already recorded in
    /// the state and nothing should be sent.
    pub fn begin_analyze(&mut self, question: &str) -> Option<AnalyzeTicket> {
        self.analyze_seq += 1;
        let seq = self.analyze_seq;

        self.analyze_phase = AnalyzePhase::Analyzing;
        self.state.error = None;
        self.state.result = None;
        self.state.loading = true;
        tracing::debug!(seq, "analyze sequence: analyzing");

        let Some(profile) = self.state.profile else {
            self.state.loading = false;
            self.state.error = Some(PROFILE_REQUIRED.to_string());
            self.analyze_phase = AnalyzePhase::Failed;
            tracing::warn!(seq, "analyze requested without a saved profile");
            return None;
        };

        Some(AnalyzeTicket {
            seq,
            question: question.to_string(),
            profile,
        })
    }

    /// Records the outcome for `ticket`, unless a newer submission superseded it.
    pub fn complete_analyze(
        &mut self,
        ticket: AnalyzeTicket,
        outcome: anyhow::Result<AnalysisResult>,
    ) -> Completion {
        if ticket.seq != self.analyze_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.analyze_seq,
                "discarding stale analyze response"
            );
            return Completion::Stale;
        }

        self.state.loading = false;
        match outcome {
            Ok(result) => {
                tracing::info!(seq = ticket.seq, ticker = %result.ticker, "analysis received");
                self.state.result = Some(result);
                self.state.error = None;
                self.analyze_phase = AnalyzePhase::Displaying;
                Completion::Displayed
            }
            Err(err) => {
                tracing::warn!(seq = ticket.seq, error = %err, "analysis failed");
                self.state.result = None;
                self.state.error = Some(format!("{err:#}"));
                self.analyze_phase = AnalyzePhase::Failed;
                Completion::Failed
            }
        }
    }

    /// Runs one analyze submission end to end.
    pub async fn analyze(&mut self, api: &dyn FinsightApi, question: &str) -> Completion {
        let Some(ticket) = self.begin_analyze(question) else {
            return Completion::Failed;
        };
        let outcome = api.analyze(ticket.question(), ticket.profile()).await;
        self.complete_analyze(ticket, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{Horizon, RiskLevel};
    use anyhow::bail;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        fail_save: bool,
        fail_recommendations: bool,
        fail_analyze: bool,
        recommendations_body: Option<Value>,
        calls: AtomicUsize,
        analyze_calls: AtomicUsize,
        last_question: Mutex<Option<String>>,
    }

    fn pick(ticker: &str) -> Recommendation {
        Recommendation {
            ticker: ticker.to_string(),
            name: format!("{ticker} Inc."),
            market: "USA".to_string(),
            rationale: "Aligned with medium risk and 6m horizon.".to_string(),
        }
    }

    #[async_trait::async_trait]
    impl FinsightApi for FakeApi {
        async fn health(&self) -> anyhow::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"status": "ok"}))
        }

        async fn save_profile(&self, profile: &Profile) -> anyhow::Result<Profile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_save {
                bail!("save_profile request failed (stage=http): status=500");
            }
            Ok(*profile)
        }

        async fn recommendations(&self, _profile: &Profile) -> anyhow::Result<Vec<Recommendation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_recommendations {
                bail!("recommendations request failed (stage=send): connection refused");
            }
            match &self.recommendations_body {
                Some(body) => {
                    let parsed: crate::domain::recommendation::RecommendationsResponse =
                        serde_json::from_value(body.clone())?;
                    Ok(parsed.items)
                }
                None => Ok(vec![pick("AAPL"), pick("SHOP")]),
            }
        }

        async fn analyze(&self, question: &str, _profile: &Profile) -> anyhow::Result<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_question.lock().unwrap() = Some(question.to_string());
            if self.fail_analyze {
                bail!("analyze request failed (stage=http): status=500");
            }
            AnalysisResult::from_value(json!({"ticker": "AAPL"}))
        }
    }

    fn profile(budget: f64) -> Profile {
        Profile::new(budget, RiskLevel::Medium, Horizon::SixMonths).unwrap()
    }

    fn result(ticker: &str) -> AnalysisResult {
        AnalysisResult::from_value(json!({"ticker": ticker})).unwrap()
    }

    #[test]
    fn starts_locked_and_idle() {
        let c = Controller::new();
        assert!(c.analysis_locked());
        assert!(!c.analyze_enabled());
        assert_eq!(c.profile_phase(), ProfilePhase::Idle);
        assert_eq!(c.analyze_phase(), AnalyzePhase::Idle);
        assert_eq!(c.state(), &UiState::default());
    }

    #[tokio::test]
    async fn save_profile_stores_profile_and_recommendations() {
        let api = FakeApi::default();
        let mut c = Controller::new();

        let n = c.save_profile(&api, profile(5000.0)).await;
        assert_eq!(n, Notification::success(PICKS_UPDATED));
        assert_eq!(c.state().profile, Some(profile(5000.0)));
        assert_eq!(c.state().recommendations.len(), 2);
        for item in &c.state().recommendations {
            assert!(!item.ticker.is_empty());
            assert!(!item.name.is_empty());
            assert!(!item.market.is_empty());
            assert!(!item.rationale.is_empty());
        }
        assert!(!c.analysis_locked());
        assert!(c.analyze_enabled());
        assert_eq!(c.profile_phase(), ProfilePhase::Idle);
        assert_eq!(c.take_notification(), Some(n));
        assert_eq!(c.notification(), None);
    }

    #[tokio::test]
    async fn absent_items_yield_empty_recommendations() {
        let api = FakeApi {
            recommendations_body: Some(json!({})),
            ..Default::default()
        };
        let mut c = Controller::new();
        let n = c.save_profile(&api, profile(100.0)).await;
        assert!(!n.is_failure());
        assert!(c.state().recommendations.is_empty());
        assert!(c.state().profile.is_some());
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_state() {
        let mut c = Controller::new();
        c.save_profile(&FakeApi::default(), profile(5000.0)).await;

        let failing = FakeApi {
            fail_save: true,
            ..Default::default()
        };
        let n = c.save_profile(&failing, profile(9000.0)).await;
        assert!(n.is_failure());
        assert!(n.message.starts_with("Failed to save profile: "));
        assert_eq!(c.state().profile, Some(profile(5000.0)));
        assert_eq!(c.state().recommendations.len(), 2);
        // Recommendations are never requested after a failed save.
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_fetching_recommendations_discards_the_new_profile() {
        let mut c = Controller::new();
        let failing = FakeApi {
            fail_recommendations: true,
            ..Default::default()
        };
        let n = c.save_profile(&failing, profile(9000.0)).await;
        assert!(n.is_failure());
        assert!(c.state().profile.is_none());
        assert!(c.state().recommendations.is_empty());
        assert!(c.analysis_locked());
        assert_eq!(c.profile_phase(), ProfilePhase::Idle);
    }

    #[tokio::test]
    async fn profile_sequence_never_sets_result_or_error() {
        let mut c = Controller::new();
        c.analyze(&FakeApi::default(), "AAPL?").await;
        let error_before = c.state().error.clone();

        let failing = FakeApi {
            fail_save: true,
            ..Default::default()
        };
        c.save_profile(&failing, profile(1.0)).await;
        assert_eq!(c.state().error, error_before);
        assert!(c.state().result.is_none());
    }

    #[tokio::test]
    async fn analyze_without_profile_never_calls_the_network() {
        let api = FakeApi::default();
        let mut c = Controller::new();

        let completion = c.analyze(&api, "Should I buy AAPL?").await;
        assert_eq!(completion, Completion::Failed);
        assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(c.state().error.as_deref().unwrap().contains("profile required"));
        assert!(!c.state().loading);
        assert!(c.state().result.is_none());
        assert_eq!(c.analyze_phase(), AnalyzePhase::Failed);
    }

    #[tokio::test]
    async fn analyze_success_stores_result() {
        let api = FakeApi::default();
        let mut c = Controller::new();
        c.save_profile(&api, profile(5000.0)).await;

        let completion = c.analyze(&api, "Should I buy AAPL?").await;
        assert_eq!(completion, Completion::Displayed);
        assert_eq!(c.state().result.as_ref().unwrap().ticker, "AAPL");
        assert_eq!(c.state().error, None);
        assert!(!c.state().loading);
        assert_eq!(c.analyze_phase(), AnalyzePhase::Displaying);
        assert_eq!(
            api.last_question.lock().unwrap().as_deref(),
            Some("Should I buy AAPL?")
        );
    }

    #[tokio::test]
    async fn analyze_failure_sets_error_and_clears_result() {
        let mut c = Controller::new();
        c.save_profile(&FakeApi::default(), profile(5000.0)).await;
        c.analyze(&FakeApi::default(), "AAPL?").await;
        assert!(c.state().result.is_some());

        let failing = FakeApi {
            fail_analyze: true,
            ..Default::default()
        };
        let completion = c.analyze(&failing, "AAPL?").await;
        assert_eq!(completion, Completion::Failed);
        assert!(c.state().result.is_none());
        assert!(c.state().error.as_deref().unwrap().contains("status=500"));
        assert!(!c.state().loading);
    }

    #[tokio::test]
    async fn begin_analyze_clears_previous_outcome_and_disables_control() {
        let mut c = Controller::new();
        c.save_profile(&FakeApi::default(), profile(5000.0)).await;
        c.analyze(&FakeApi::default(), "first").await;

        let ticket = c.begin_analyze("second").unwrap();
        assert!(c.state().loading);
        assert!(c.state().result.is_none());
        assert!(c.state().error.is_none());
        assert!(!c.analyze_enabled());
        assert_eq!(c.analyze_phase(), AnalyzePhase::Analyzing);
        assert_eq!(ticket.question(), "second");

        c.complete_analyze(ticket, Ok(result("MSFT")));
        assert!(c.analyze_enabled());
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let mut c = Controller::new();
        c.save_profile(&FakeApi::default(), profile(5000.0)).await;

        let older = c.begin_analyze("older").unwrap();
        let newer = c.begin_analyze("newer").unwrap();
        assert!(newer.seq() > older.seq());

        assert_eq!(c.complete_analyze(newer, Ok(result("NEW"))), Completion::Displayed);
        assert_eq!(
            c.complete_analyze(older, Ok(result("OLD"))),
            Completion::Stale
        );
        assert_eq!(c.state().result.as_ref().unwrap().ticker, "NEW");
        assert!(!c.state().loading);
    }

    #[tokio::test]
    async fn stale_failure_does_not_clear_loading_of_newer_request() {
        let mut c = Controller::new();
        c.save_profile(&FakeApi::default(), profile(5000.0)).await;

        let older = c.begin_analyze("older").unwrap();
        let _newer = c.begin_analyze("newer").unwrap();
        let completion = c.complete_analyze(older, Err(anyhow::anyhow!("boom")));
        assert_eq!(completion, Completion::Stale);
        assert!(c.state().loading);
        assert!(c.state().error.is_none());
    }
}
