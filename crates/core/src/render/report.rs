use crate::domain::analysis::{AnalysisResult, Narrative};
use crate::render::citation::{extract_citation, Citation};
use crate::render::format::{self, Delta};

pub const DEFAULT_DISCLAIMER: &str = "Not financial advice.";

/// Display-ready sections for one analysis result.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub header: Header,
    pub summary: Option<SummaryBlock>,
    pub narratives: Vec<NarrativeSection>,
    pub last_quarter: Option<String>,
    pub score: ScoreBlock,
    pub evidence: Vec<EvidenceEntry>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub ticker: String,
    pub company_name: Option<String>,
    pub as_of: Option<String>,
    pub price: String,
    pub change: Delta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryBlock {
    pub heading: &'static str,
    pub body: String,
    /// Set only when combined with an executive summary.
    pub expected_return: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeKind {
    News,
    Bull,
    Bear,
    Risks,
}

impl NarrativeKind {
    pub fn title(&self) -> &'static str {
        match self {
            NarrativeKind::News => "News Summary",
            NarrativeKind::Bull => "Bull Case",
            NarrativeKind::Bear => "Bear Case",
            NarrativeKind::Risks => "Key Risks",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeSection {
    pub kind: NarrativeKind,
    pub bullets: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBlock {
    pub total: String,
    pub notes: Option<String>,
    pub breakdown: Vec<ScoreLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceEntry {
    pub heading: String,
    pub title: Option<String>,
    pub claim: String,
    pub url: Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn summary_block(executive_summary: Option<String>, expected_return: Option<String>) -> Option<SummaryBlock> {
    match (executive_summary, expected_return) {
        (Some(body), expected_return) => Some(SummaryBlock {
            heading: "Executive Summary",
            body,
            expected_return,
        }),
        (None, Some(body)) => Some(SummaryBlock {
            heading: "Expected Return",
            body,
            expected_return: None,
        }),
        (None, None) => None,
    }
}

fn narrative_section(kind: NarrativeKind, field: Option<&Narrative>) -> Option<NarrativeSection> {
    let items = field?.items();
    if items.is_empty() {
        return None;
    }
    Some(NarrativeSection {
        kind,
        bullets: items.iter().map(|s| extract_citation(s)).collect(),
    })
}

/// Renders an analysis result. `None` in, `None` out.
pub fn render_report(result: Option<&AnalysisResult>) -> Option<Report> {
    let result = result?;

    let price = result.price_data.as_ref();
    let header = Header {
        ticker: result.ticker.clone(),
        company_name: non_empty(&result.company_name),
        as_of: non_empty(&result.timestamp).map(|ts| format::timestamp(&ts)),
        price: format::price(price.and_then(|p| p.current_price.as_ref())),
        change: format::change_1d(price.and_then(|p| p.change_1d_pct.as_ref())),
    };

    let analysis = result.analysis.as_ref();
    let summary = analysis.and_then(|a| {
        summary_block(non_empty(&a.executive_summary), non_empty(&a.expected_return))
    });

    let narratives = match analysis {
        Some(a) => [
            (NarrativeKind::News, a.news_summary.as_ref()),
            (NarrativeKind::Bull, a.bull_case.as_ref()),
            (NarrativeKind::Bear, a.bear_case.as_ref()),
            (NarrativeKind::Risks, a.key_risks.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, field)| narrative_section(kind, field))
        .collect(),
        None => Vec::new(),
    };

    let last_quarter = analysis.and_then(|a| non_empty(&a.last_quarter_result));

    let score = result.score.as_ref();
    let score = ScoreBlock {
        total: format::score_total(score.and_then(|s| s.total.as_ref())),
        notes: score.and_then(|s| non_empty(&s.notes)),
        breakdown: score
            .map(|s| {
                s.breakdown
                    .iter()
                    .map(|c| ScoreLine {
                        label: c.label.clone(),
                        value: format::signed_component(c.value.as_ref()),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    };

    let evidence = result
        .evidence_pack
        .iter()
        .map(|ev| {
            let claim = extract_citation(&ev.claim);
            let heading = match non_empty(&ev.source) {
                Some(source) => format!("{} - {source}", ev.date),
                None => ev.date.clone(),
            };
            let url = non_empty(&ev.url).or_else(|| claim.has_source().then(|| claim.url.clone()));
            EvidenceEntry {
                heading: heading.trim().to_string(),
                title: non_empty(&ev.title),
                claim: claim.text,
                url,
            }
        })
        .collect();

    Some(Report {
        header,
        summary,
        narratives,
        last_quarter,
        score,
        evidence,
        disclaimer: non_empty(&result.disclaimer).unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string()),
    })
}
