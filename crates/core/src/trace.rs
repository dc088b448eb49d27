use crate::domain::analysis::{AnalysisResult, ValidationStatus};

/// Expansion flag for the trace panel. Holds no reference to the result, so toggling
/// cannot affect anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceViewer {
    expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceView {
    pub status: String,
    pub verdict: ValidationStatus,
    pub expanded: bool,
    pub detail: Option<TraceDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceDetail {
    pub reasons: String,
    pub suggested_route: String,
    pub raw: String,
}

impl TraceViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// `None` unless the result carries a validation block.
    pub fn view(&self, result: Option<&AnalysisResult>) -> Option<TraceView> {
        let result = result?;
        let validation = result.validation.as_ref()?;

        let detail = self.expanded.then(|| TraceDetail {
            reasons: serde_json::to_string(&validation.reasons).unwrap_or_else(|_| "[]".to_string()),
            suggested_route: validation.suggested_route.clone().unwrap_or_default(),
            raw: serde_json::to_string_pretty(&result.raw).unwrap_or_else(|_| result.raw.to_string()),
        });

        Some(TraceView {
            status: validation.status.clone().unwrap_or_default(),
            verdict: validation.status(),
            expanded: self.expanded,
            detail,
        })
    }
}
