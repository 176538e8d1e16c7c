//! CVSS base-score normalization: turns a raw CVSS vector string (as carried by an
//! OSV `severity[].score` entry) into a rounded 0..10 score and an [`Impact`] band.
//!
//! Implements the CVSS v2.0 and v3.x base-score formulas directly (FIRST.org's
//! published specification) rather than computing exploitability from a cached
//! lookup table, since the vector carries metric values, not a pre-computed score.

use pyreach_core::models::Impact;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvssVersion {
    V2,
    V3,
}

/// CVSS 3.x vectors are prefixed `CVSS:3.0/...` or `CVSS:3.1/...`; a bare vector
/// (no prefix) is 2.0.
pub fn detect_version(vector: &str) -> CvssVersion {
    if vector.starts_with("CVSS:3.") {
        CvssVersion::V3
    } else {
        CvssVersion::V2
    }
}

fn metrics(vector: &str) -> HashMap<&str, &str> {
    vector
        .split('/')
        .filter_map(|seg| seg.split_once(':'))
        .collect()
}

fn impact_for_score(score: f64) -> Impact {
    if score <= 0.0 {
        Impact::Unknown
    } else if score < 4.0 {
        Impact::Low
    } else if score < 7.0 {
        Impact::Medium
    } else if score < 9.0 {
        Impact::High
    } else {
        Impact::Critical
    }
}

/// Parses a raw vector string and returns `(base_score rounded to 0..10, impact)`,
/// or `None` if a required metric is missing or unrecognized.
pub fn base_score(vector: &str) -> Option<(i32, Impact)> {
    let score = match detect_version(vector) {
        CvssVersion::V2 => base_score_v2(vector)?,
        CvssVersion::V3 => base_score_v3(vector)?,
    };
    let rounded = score.round().clamp(0.0, 10.0) as i32;
    Some((rounded, impact_for_score(score)))
}

fn base_score_v2(vector: &str) -> Option<f64> {
    let m = metrics(vector);

    let av = match *m.get("AV")? {
        "L" => 0.395,
        "A" => 0.646,
        "N" => 1.0,
        _ => return None,
    };
    let ac = match *m.get("AC")? {
        "H" => 0.35,
        "M" => 0.61,
        "L" => 0.71,
        _ => return None,
    };
    let au = match *m.get("Au")? {
        "M" => 0.45,
        "S" => 0.56,
        "N" => 0.704,
        _ => return None,
    };
    let impact_metric = |key: &str| -> Option<f64> {
        match *m.get(key)? {
            "N" => Some(0.0),
            "P" => Some(0.275),
            "C" => Some(0.660),
            _ => None,
        }
    };
    let conf = impact_metric("C")?;
    let integ = impact_metric("I")?;
    let avail = impact_metric("A")?;

    let impact = 10.41 * (1.0 - (1.0 - conf) * (1.0 - integ) * (1.0 - avail));
    let exploitability = 20.0 * av * ac * au;
    let f_impact = if impact == 0.0 { 0.0 } else { 1.176 };
    let base = ((0.6 * impact) + (0.4 * exploitability) - 1.5) * f_impact;
    Some(round_to_1dp(base.max(0.0)))
}

fn base_score_v3(vector: &str) -> Option<f64> {
    let m = metrics(vector);

    let scope_changed = matches!(*m.get("S")?, "C");
    let av = match *m.get("AV")? {
        "N" => 0.85,
        "A" => 0.62,
        "L" => 0.55,
        "P" => 0.2,
        _ => return None,
    };
    let ac = match *m.get("AC")? {
        "L" => 0.77,
        "H" => 0.44,
        _ => return None,
    };
    let pr = match (*m.get("PR")?, scope_changed) {
        ("N", _) => 0.85,
        ("L", false) => 0.62,
        ("L", true) => 0.68,
        ("H", false) => 0.27,
        ("H", true) => 0.5,
        _ => return None,
    };
    let ui = match *m.get("UI")? {
        "N" => 0.85,
        "R" => 0.62,
        _ => return None,
    };
    let impact_metric = |key: &str| -> Option<f64> {
        match *m.get(key)? {
            "H" => Some(0.56),
            "L" => Some(0.22),
            "N" => Some(0.0),
            _ => None,
        }
    };
    let conf = impact_metric("C")?;
    let integ = impact_metric("I")?;
    let avail = impact_metric("A")?;

    let isc_base = 1.0 - ((1.0 - conf) * (1.0 - integ) * (1.0 - avail));
    let iss = if scope_changed {
        7.52 * (isc_base - 0.029) - 3.25 * (isc_base - 0.02).powf(15.0)
    } else {
        6.42 * isc_base
    };
    let exploitability = 8.22 * av * ac * pr * ui;

    if iss <= 0.0 {
        return Some(0.0);
    }
    let base = if scope_changed {
        (iss + exploitability).min(10.0) * 1.08
    } else {
        iss + exploitability
    };
    Some(round_up_to_1dp(base.min(10.0)))
}

/// CVSS v3's "Roundup" method: round to the nearest 0.1, rounding up on ties.
fn round_up_to_1dp(value: f64) -> f64 {
    let int_input = (value * 100_000.0).round() as i64;
    if int_input % 10_000 == 0 {
        int_input as f64 / 100_000.0
    } else {
        ((int_input / 10_000) + 1) as f64 / 10.0
    }
}

fn round_to_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_v3_prefix() {
        assert_eq!(detect_version("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"), CvssVersion::V3);
        assert_eq!(detect_version("CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"), CvssVersion::V3);
        assert_eq!(detect_version("AV:N/AC:L/Au:N/C:C/I:C/A:C"), CvssVersion::V2);
    }

    #[test]
    fn v3_critical_vector_rounds_to_critical() {
        let (score, impact) = base_score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H").unwrap();
        assert_eq!(score, 10);
        assert_eq!(impact, Impact::Critical);
    }

    #[test]
    fn v2_full_impact_vector_is_high_severity() {
        let (score, impact) = base_score("AV:N/AC:L/Au:N/C:C/I:C/A:C").unwrap();
        assert!(score >= 9, "expected near-maximal v2 score, got {score}");
        assert_eq!(impact, Impact::Critical);
    }

    #[test]
    fn malformed_vector_returns_none() {
        assert!(base_score("not a vector").is_none());
    }

    #[test]
    fn low_impact_vector_rounds_low() {
        let (_score, impact) = base_score("CVSS:3.1/AV:P/AC:H/PR:H/UI:R/S:U/C:N/I:N/A:L").unwrap();
        assert!(matches!(impact, Impact::Low | Impact::Unknown));
    }
}
