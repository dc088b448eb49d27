use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Citation {
    pub text: String,
    /// Empty when the text carries no marker.
    pub url: String,
}

impl Citation {
    pub fn has_source(&self) -> bool {
        !self.url.is_empty()
    }
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)\(source:\s*(\S+)\)").expect("citation marker pattern is valid")
    })
}

/// Splits the first citation marker out of `input`.
///
/// Only the first match is honored; any later marker stays in `text` verbatim.
/// Stray characters captured after the URL are cut at the first `)`. Never fails:
/// input without a well-formed marker comes back unchanged with an empty URL.
pub fn extract_citation(input: &str) -> Citation {
    let Some(caps) = marker().captures(input) else {
        return Citation {
            text: input.to_string(),
            url: String::new(),
        };
    };
    let (Some(whole), Some(run)) = (caps.get(0), caps.get(1)) else {
        return Citation {
            text: input.to_string(),
            url: String::new(),
        };
    };

    let run = run.as_str();
    let url = match run.find(')') {
        Some(end) => &run[..end],
        None => run,
    };

    let mut text = String::with_capacity(input.len());
    text.push_str(&input[..whole.start()]);
    text.push_str(&input[whole.end()..]);

    Citation {
        text: text.trim().to_string(),
        url: url.to_string(),
    }
}

/// Same as [`extract_citation`] for a JSON value, coerced to text first.
pub fn extract_citation_value(value: &Value) -> Citation {
    extract_citation(&crate::domain::lenient::coerce_text(value))
}
