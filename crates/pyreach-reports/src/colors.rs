//! Fixed hex color lookup tables for the DOT/CSV exporters, and the COFE
//! priority-score terminal color bands for the table printers.
//!
//! Mirrors the original system's depth/vuln-score/scorecard-score color maps
//! verbatim, grey `#b2bec3` fallback and all.

use chrono::{Duration, Utc};
use pyreach_core::models::Package;

pub const ROOT_COLOR: &str = "#AEEA00";
const FALLBACK_COLOR: &str = "#b2bec3";

const DEPTH_COLORS: [(u32, &str); 6] = [
    (0, "#AEEA00"),
    (1, "#74b9ff"),
    (2, "#7e57c2"),
    (3, "#d500f9"),
    (4, "#d500f9"),
    (5, "#d500f9"),
];

const VULN_SCORE_COLORS: [(i32, &str); 11] = [
    (0, "#d500f9"),
    (1, "#d500f9"),
    (2, "#d500f9"),
    (3, "#fdd835"),
    (4, "#fdd835"),
    (5, "#fdd835"),
    (6, "#E64A19"),
    (7, "#E64A19"),
    (8, "#E64A19"),
    (9, "#D32F2F"),
    (10, "#D32F2F"),
];

const HYGIENE_SCORE_COLORS: [(i32, &str); 11] = [
    (0, "#d500f9"),
    (1, "#d500f9"),
    (2, "#d500f9"),
    (3, "#f48fb1"),
    (4, "#f48fb1"),
    (5, "#f48fb1"),
    (6, "#ff4081"),
    (7, "#ff4081"),
    (8, "#ff4081"),
    (9, "#e91e63"),
    (10, "#e91e63"),
];

pub fn depth_color(depth: u32) -> &'static str {
    DEPTH_COLORS.iter().find(|(d, _)| *d == depth).map(|(_, c)| *c).unwrap_or(FALLBACK_COLOR)
}

pub fn vuln_score_color(score: i32) -> &'static str {
    VULN_SCORE_COLORS.iter().find(|(s, _)| *s == score).map(|(_, c)| *c).unwrap_or(FALLBACK_COLOR)
}

pub fn hygiene_score_color(score: i32) -> &'static str {
    HYGIENE_SCORE_COLORS.iter().find(|(s, _)| *s == score).map(|(_, c)| *c).unwrap_or(FALLBACK_COLOR)
}

/// Per-vertex vuln color: root is always `ROOT_COLOR`; otherwise the vuln-score
/// color if `max_vuln_score >= 3`, else the depth color.
pub fn node_vuln_color(pkg: &Package, is_root: bool) -> &'static str {
    if is_root {
        return ROOT_COLOR;
    }
    if pkg.max_vuln_score >= 3 {
        vuln_score_color(pkg.max_vuln_score)
    } else {
        depth_color(pkg.depth)
    }
}

/// Per-vertex scorecard color: same shape as [`node_vuln_color`] but keyed on
/// the reverse scorecard score.
pub fn node_scorecard_color(pkg: &Package, is_root: bool) -> &'static str {
    if is_root {
        return ROOT_COLOR;
    }
    let reverse = pkg.reverse_scorecard_score();
    if reverse >= 3 {
        hygiene_score_color(reverse)
    } else {
        depth_color(pkg.depth)
    }
}

/// Overall node color: vuln color wins if `max_vuln_score > 7`, else scorecard
/// color if the reverse score `> 7`, else the depth color.
pub fn node_color(pkg: &Package, is_root: bool) -> &'static str {
    if is_root {
        return ROOT_COLOR;
    }
    if pkg.max_vuln_score > 7 {
        vuln_score_color(pkg.max_vuln_score)
    } else if pkg.reverse_scorecard_score() > 7 {
        hygiene_score_color(pkg.reverse_scorecard_score())
    } else {
        depth_color(pkg.depth)
    }
}

/// Synthetic RFC-3339 timestamp, `now + depth` hours, used to drive timeline
/// animations in an external visualizer.
pub fn depth_timestamp(depth: u32) -> String {
    let when = Utc::now() + Duration::seconds(i64::from(depth) * 3600);
    when.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyreach_core::models::{Package, PackageDetails, ECOSYSTEM_PYPI};

    fn pkg(depth: u32) -> Package {
        Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, depth)
    }

    #[test]
    fn unknown_depth_falls_back_to_grey() {
        assert_eq!(depth_color(99), FALLBACK_COLOR);
    }

    #[test]
    fn root_is_always_the_root_color() {
        let p = pkg(4);
        assert_eq!(node_color(&p, true), ROOT_COLOR);
    }

    #[test]
    fn high_vuln_score_wins_over_scorecard() {
        let mut p = pkg(2);
        p.add_vulnerabilities([pyreach_core::models::PkgVuln {
            id: "CVE-1".into(),
            cve: Some("CVE-1".into()),
            aliases: vec![],
            title: String::new(),
            base_severity: pyreach_core::models::Severity {
                score: 9,
                impact: pyreach_core::models::Impact::Critical,
                severity_type: "cvss3".into(),
                vector: String::new(),
            },
            other_severities: Default::default(),
        }]);
        assert_eq!(node_color(&p, false), vuln_score_color(9));
    }

    #[test]
    fn low_scores_fall_back_to_depth_color() {
        let p = pkg(1);
        assert_eq!(node_color(&p, false), depth_color(1));
    }
}
