use crate::domain::lenient::{natural_number, Scalar};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    NonNegative,
    Negative,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub text: String,
    pub tone: Tone,
}

pub fn price(value: Option<&Scalar>) -> String {
    match value.and_then(Scalar::as_f64) {
        Some(n) => format!("${n:.2}"),
        None => "N/A".to_string(),
    }
}

/// Zero counts as non-negative.
pub fn change_1d(value: Option<&Scalar>) -> Delta {
    match value.and_then(Scalar::as_f64) {
        Some(n) => Delta {
            text: format!("{n:.2}% (1D)"),
            tone: if n >= 0.0 {
                Tone::NonNegative
            } else {
                Tone::Negative
            },
        },
        None => Delta {
            text: "1D change N/A".to_string(),
            tone: Tone::Unavailable,
        },
    }
}

pub fn score_total(value: Option<&Scalar>) -> String {
    match value {
        Some(Scalar::Number(n)) if n.is_finite() => format!("{n:.2}"),
        Some(other) => {
            let literal = other.literal();
            if literal.is_empty() {
                "N/A".to_string()
            } else {
                literal
            }
        }
        None => "N/A".to_string(),
    }
}

/// `+5` for positive numbers, the natural form otherwise.
pub fn signed_component(value: Option<&Scalar>) -> String {
    match value {
        Some(Scalar::Number(n)) if *n > 0.0 => format!("+{}", natural_number(*n)),
        Some(other) => other.literal(),
        None => String::new(),
    }
}

pub fn timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
