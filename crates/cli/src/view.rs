use finsight_core::controller::{Controller, Notification, NotificationKind};
use finsight_core::domain::analysis::ValidationStatus;
use finsight_core::render::format::Tone;
use finsight_core::render::picks::PicksPanel;
use finsight_core::render::report::Report;
use finsight_core::render::{render_recommendations, render_report};
use finsight_core::trace::{TraceView, TraceViewer};
use std::fmt::{self, Write};

const RULE: &str = "------------------------------------------------------------";

fn to_string(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    write(&mut out).expect("writing to a String cannot fail");
    out
}

pub fn notification(n: &Notification) -> String {
    match n.kind {
        NotificationKind::Success => format!("** {} **", n.message),
        NotificationKind::Failure => format!("!! {} !!", n.message),
    }
}

pub fn picks(panel: &PicksPanel) -> String {
    to_string(|out| write_picks(out, panel))
}

fn write_picks(out: &mut String, panel: &PicksPanel) -> fmt::Result {
    writeln!(out, "{}", panel.title)?;
    writeln!(out, "{RULE}")?;
    for card in &panel.cards {
        writeln!(out, "{:<10} {:<8} {}", card.ticker, card.market, card.name)?;
        if !card.rationale.is_empty() {
            writeln!(out, "           {}", card.rationale)?;
        }
    }
    Ok(())
}

fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::NonNegative => "▲",
        Tone::Negative => "▼",
        Tone::Unavailable => "·",
    }
}

pub fn report(report: &Report) -> String {
    to_string(|out| write_report(out, report))
}

fn write_report(out: &mut String, report: &Report) -> fmt::Result {
    let header = &report.header;

    write!(out, "{} analysis", header.ticker)?;
    if let Some(name) = &header.company_name {
        write!(out, " ({name})")?;
    }
    writeln!(out)?;
    if let Some(as_of) = &header.as_of {
        writeln!(out, "{as_of}")?;
    }
    writeln!(
        out,
        "{}  {} {}",
        header.price,
        tone_marker(header.change.tone),
        header.change.text
    )?;
    writeln!(out, "{RULE}")?;

    if let Some(summary) = &report.summary {
        writeln!(out, "[{}]", summary.heading)?;
        writeln!(out, "{}", summary.body)?;
        if let Some(expected) = &summary.expected_return {
            writeln!(out, "Expected return: {expected}")?;
        }
        writeln!(out)?;
    }

    for section in &report.narratives {
        writeln!(out, "[{}]", section.kind.title())?;
        for bullet in &section.bullets {
            if bullet.has_source() {
                writeln!(out, "  - {} <{}>", bullet.text, bullet.url)?;
            } else {
                writeln!(out, "  - {}", bullet.text)?;
            }
        }
        writeln!(out)?;
    }

    if let Some(last_quarter) = &report.last_quarter {
        writeln!(out, "[Last Quarter Result]")?;
        writeln!(out, "{last_quarter}")?;
        writeln!(out)?;
    }

    writeln!(out, "[FinSight Score] {}/100", report.score.total)?;
    if let Some(notes) = &report.score.notes {
        writeln!(out, "{notes}")?;
    }
    for line in &report.score.breakdown {
        writeln!(out, "  {:<28} {:>8}", line.label, line.value)?;
    }
    writeln!(out)?;

    writeln!(out, "[Evidence Pack]")?;
    for entry in &report.evidence {
        writeln!(out, "  * {}", entry.heading)?;
        if let Some(title) = &entry.title {
            writeln!(out, "    {title}")?;
        }
        if !entry.claim.is_empty() {
            writeln!(out, "    {}", entry.claim)?;
        }
        if let Some(url) = &entry.url {
            writeln!(out, "    Source: {url}")?;
        }
    }

    writeln!(out, "{RULE}")?;
    writeln!(out, "{}", report.disclaimer)?;
    Ok(())
}

pub fn trace(view: &TraceView) -> String {
    to_string(|out| write_trace(out, view))
}

fn write_trace(out: &mut String, view: &TraceView) -> fmt::Result {
    let verdict = match view.verdict {
        ValidationStatus::Pass => "+",
        ValidationStatus::Fail => "x",
        ValidationStatus::Unknown => "?",
    };
    let arrow = if view.expanded { "▼" } else { "▲" };
    writeln!(
        out,
        "Debug Trace | Validation: {} [{verdict}] {arrow}",
        view.status
    )?;
    if let Some(detail) = &view.detail {
        writeln!(out, "Validation Reasons: {}", detail.reasons)?;
        writeln!(out, "Suggested Route: {}", detail.suggested_route)?;
        writeln!(out, "{}", detail.raw)?;
    }
    Ok(())
}

/// Everything the screen would show for the current controller state.
pub fn screen(controller: &Controller, trace_viewer: &TraceViewer) -> String {
    to_string(|out| write_screen(out, controller, trace_viewer))
}

fn write_screen(out: &mut String, controller: &Controller, trace_viewer: &TraceViewer) -> fmt::Result {
    let state = controller.state();

    if let Some(panel) = render_recommendations(&state.recommendations) {
        out.push_str(&picks(&panel));
        out.push('\n');
    }

    if controller.analysis_locked() {
        out.push_str("Please save your budget and risk profile to unlock analysis.\n");
    }
    if state.loading {
        out.push_str("Analyzing market data & news...\n");
    }
    if let Some(error) = &state.error {
        writeln!(out, "Error: {error}")?;
    }

    if let Some(r) = render_report(state.result.as_ref()) {
        out.push_str(&report(&r));
    }
    if let Some(view) = trace_viewer.view(state.result.as_ref()) {
        out.push('\n');
        out.push_str(&trace(&view));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finsight_core::domain::analysis::AnalysisResult;
    use serde_json::json;

    fn sample() -> AnalysisResult {
        AnalysisResult::from_value(json!({
            "ticker": "AAPL",
            "company_name": "Apple Inc.",
            "price_data": {"current_price": 190.5, "change_1d_pct": -1.25},
            "analysis": {
                "executive_summary": "Recommendation: YES",
                "expected_return": "8-12%",
                "bull_case": ["Services growth (source: https://ex.com/s)"]
            },
            "evidence_pack": [{"date": "Recent", "source": "Web", "claim": "Beat", "url": "https://ex.com/q"}],
            "score": {"total": 70, "breakdown": [{"label": "News", "value": 5}]},
            "validation": {"status": "PASS", "reasons": ["ok"], "suggested_route": "WEB"}
        }))
        .unwrap()
    }

    #[test]
    fn report_text_contains_every_section() {
        let r = render_report(Some(&sample())).unwrap();
        let text = report(&r);
        assert!(text.contains("AAPL analysis (Apple Inc.)"));
        assert!(text.contains("$190.50  ▼ -1.25% (1D)"));
        assert!(text.contains("[Executive Summary]"));
        assert!(text.contains("Expected return: 8-12%"));
        assert!(text.contains("  - Services growth <https://ex.com/s>"));
        assert!(text.contains("[FinSight Score] 70.00/100"));
        assert!(text.contains("+5"));
        assert!(text.contains("  * Recent - Web"));
        assert!(text.contains("    Source: https://ex.com/q"));
        assert!(text.ends_with("Not financial advice.\n"));
        assert!(!text.contains("[Bear Case]"));
    }

    #[test]
    fn trace_text_follows_expansion() {
        let result = sample();
        let mut viewer = TraceViewer::new();
        let collapsed = trace(&viewer.view(Some(&result)).unwrap());
        assert!(collapsed.starts_with("Debug Trace | Validation: PASS [+] ▲"));
        assert!(!collapsed.contains("Suggested Route"));

        viewer.toggle();
        let expanded = trace(&viewer.view(Some(&result)).unwrap());
        assert!(expanded.contains("Validation Reasons: [\"ok\"]"));
        assert!(expanded.contains("Suggested Route: WEB"));
    }

    #[test]
    fn locked_screen_prompts_for_profile() {
        let controller = Controller::new();
        let text = screen(&controller, &TraceViewer::new());
        assert!(text.contains("unlock analysis"));
    }

    #[test]
    fn notifications_are_framed_by_kind() {
        assert_eq!(notification(&Notification::success("done")), "** done **");
        assert_eq!(notification(&Notification::failure("nope")), "!! nope !!");
    }
}
