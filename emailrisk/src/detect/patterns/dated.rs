// Dated local-part detector — five date shapes, years within
// `current_year ± 5` of the assumed "now" (caller-supplied so the
// detector stays a pure function and tests can pin a year).

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
pub struct DatedResult {
    pub hit: bool,
    pub confidence: f64,
    pub shape: Option<&'static str>,
}

struct Shapes {
    year4: Regex,
    year2: Regex,
    month_year: Regex,
    full_date: Regex,
}

fn shapes() -> &'static Shapes {
    static SHAPES: OnceLock<Shapes> = OnceLock::new();
    SHAPES.get_or_init(|| Shapes {
        year4: Regex::new(r"(19|20)\d{2}$").unwrap(),
        year2: Regex::new(r"[._-](\d{2})$").unwrap(),
        month_year: Regex::new(r"(0[1-9]|1[0-2])[._-]?(19|20)\d{2}$").unwrap(),
        full_date: Regex::new(r"(19|20)\d{2}[._-]?(0[1-9]|1[0-2])[._-]?(0[1-9]|[12]\d|3[01])$")
            .unwrap(),
    })
}

pub fn analyze(local: &str) -> DatedResult {
    analyze_with_year(local, current_year())
}

fn current_year() -> i32 {
    2026
}

pub fn analyze_with_year(local: &str, now_year: i32) -> DatedResult {
    let s = shapes();

    if s.full_date.is_match(local) {
        return DatedResult { hit: true, confidence: 0.70, shape: Some("full_date") };
    }
    if s.month_year.is_match(local) {
        return DatedResult { hit: true, confidence: 0.60, shape: Some("month_year") };
    }
    if let Some(m) = s.year4.find(local) {
        if let Ok(year) = m.as_str().parse::<i32>() {
            let diff = (year - now_year).abs();
            if diff <= 5 {
                // Scaled 0.9 (this/next year) down to 0.5 at the edge of the window.
                let confidence = (0.9 - 0.08 * diff as f64).max(0.5);
                return DatedResult { hit: true, confidence, shape: Some("year4") };
            }
        }
    }
    if s.year2.is_match(local) {
        return DatedResult { hit: true, confidence: 0.40, shape: Some("year2") };
    }

    DatedResult::default()
}

pub fn detector_risk(result: &DatedResult) -> f64 {
    if result.hit {
        result.confidence
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_full_date_suffix() {
        let result = analyze_with_year("jsmith.20240315", 2024);
        assert!(result.hit);
        assert_eq!(result.shape, Some("full_date"));
    }

    #[test]
    fn detects_recent_year_suffix() {
        let result = analyze_with_year("jsmith2024", 2024);
        assert!(result.hit);
    }

    #[test]
    fn rejects_year_far_outside_window() {
        let result = analyze_with_year("jsmith1950", 2024);
        assert!(!result.hit);
    }

    #[test]
    fn no_hit_on_plain_name() {
        assert!(!analyze_with_year("jsmith", 2024).hit);
    }
}
