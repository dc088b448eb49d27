use crate::domain::analysis::AnalysisResult;
use crate::domain::profile::Profile;
use crate::domain::recommendation::Recommendation;

/// Process-local application state. Only the controller mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub profile: Option<Profile>,
    pub recommendations: Vec<Recommendation>,
    pub result: Option<AnalysisResult>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfilePhase {
    #[default]
    Idle,
    Saving,
    FetchingRecommendations,
}

/// `Displaying` and `Failed` accept a new submission just like `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyzePhase {
    #[default]
    Idle,
    Analyzing,
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// Outcome of the profile sequence. The view must surface it in a way that
/// interrupts the user, unlike the inline analyze error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NotificationKind::Failure
    }
}

/// Handle for one analyze submission. Only the most recently issued ticket may
/// write its outcome into the state.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeTicket {
    pub(crate) seq: u64,
    pub(crate) question: String,
    pub(crate) profile: Profile,
}

impl AnalyzeTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Displayed,
    Failed,
    /// A newer submission superseded this one; state was left untouched.
    Stale,
}
