//! Vendor detection
//!
//! A filename keyword short-circuits detection. Otherwise each vendor's
//! weighted signature is scored against the normalized headers and the best
//! vendor with enough matching tokens wins; ties go to declaration order.

use serde::Serialize;
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::types::Vendor;

/// Trim, case-fold, strip accents, and turn every non-alphanumeric run into `_`
pub fn normalize_header(header: &str) -> String {
    let folded: String = header
        .trim_start_matches('\u{feff}')
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let mut out = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Score of one vendor against a header row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorScore {
    pub vendor: Vendor,
    pub score: f64,
    pub matches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub vendor: Vendor,
    pub by_filename: bool,
    pub scores: Vec<VendorScore>,
}

/// Pick a vendor for a file from its normalized headers and optional file name
pub fn detect_vendor(
    normalized_headers: &[String],
    filename: Option<&str>,
    min_matches: usize,
) -> Detection {
    if let Some(vendor) = filename.and_then(vendor_from_filename) {
        debug!(%vendor, "Vendor detected from file name");
        return Detection {
            vendor,
            by_filename: true,
            scores: Vec::new(),
        };
    }

    let scores: Vec<VendorScore> = Vendor::DETECTABLE
        .iter()
        .map(|vendor| score_vendor(*vendor, normalized_headers))
        .collect();

    let vendor = pick_best(&scores, min_matches);
    debug!(%vendor, ?scores, "Vendor detected from headers");

    Detection {
        vendor,
        by_filename: false,
        scores,
    }
}

/// Highest score among vendors with enough matches; the earlier vendor keeps a tie
fn pick_best(scores: &[VendorScore], min_matches: usize) -> Vendor {
    let mut best: Option<&VendorScore> = None;
    for candidate in scores.iter().filter(|s| s.matches >= min_matches) {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best.map_or(Vendor::Generic, |b| b.vendor)
}

fn vendor_from_filename(filename: &str) -> Option<Vendor> {
    let lower = filename.to_lowercase();
    Vendor::DETECTABLE.into_iter().find(|vendor| {
        vendor
            .profile()
            .filename_keywords
            .iter()
            .any(|kw| lower.contains(kw))
    })
}

/// Weighted overlap between a vendor signature and the headers.
///
/// Matching works on whole `_`-separated segments. A token matches a header
/// that contains it as a segment run (`tv` in `tv_ms`). A header matches a
/// longer token only when it spans at least two segments (`drill_title` in
/// `drill_title_name`), so a bare `name` or `player` scores nothing.
pub fn score_vendor(vendor: Vendor, normalized_headers: &[String]) -> VendorScore {
    let headers: Vec<Vec<&str>> = normalized_headers.iter().map(|h| segments(h)).collect();
    let mut score = 0.0;
    let mut matches = 0;
    for (token, weight) in vendor.profile().signature {
        let token = segments(token);
        let hit = headers.iter().any(|header| {
            contains_run(header, &token) || (header.len() >= 2 && contains_run(&token, header))
        });
        if hit {
            score += weight;
            matches += 1;
        }
    }
    VendorScore {
        vendor,
        score,
        matches,
    }
}

fn segments(normalized: &str) -> Vec<&str> {
    normalized.split('_').filter(|s| !s.is_empty()).collect()
}

fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| normalize_header(h)).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Tiempo de Vuelo (ms) "), "tiempo_de_vuelo_ms");
        assert_eq!(normalize_header("\u{feff}Player Name"), "player_name");
        assert_eq!(normalize_header("Max Speed [km/h]"), "max_speed_km_h");
        assert_eq!(normalize_header("Caída"), "caida");
    }

    #[test]
    fn test_filename_short_circuits() {
        let detection = detect_vendor(&headers(&["a", "b"]), Some("Export_OpenField_2024.csv"), 2);
        assert_eq!(detection.vendor, Vendor::Catapult);
        assert!(detection.by_filename);
    }

    #[test]
    fn test_catapult_headers() {
        let h = headers(&[
            "Player Name",
            "Period Name",
            "Total Distance",
            "Maximum Velocity",
            "Total Player Load",
        ]);
        assert_eq!(detect_vendor(&h, None, 2).vendor, Vendor::Catapult);
    }

    #[test]
    fn test_statsports_headers() {
        let h = headers(&[
            "Player Display Name",
            "Session Title",
            "Drill Title",
            "Total Distance",
            "HSR Distance",
            "Max Speed",
        ]);
        assert_eq!(detect_vendor(&h, Some("export.csv"), 2).vendor, Vendor::StatSports);
    }

    #[test]
    fn test_chronojump_headers() {
        let h = headers(&["Jumper", "Type", "TV", "TC", "Fall", "Simulated"]);
        assert_eq!(detect_vendor(&h, None, 2).vendor, Vendor::Chronojump);
    }

    #[test]
    fn test_optojump_headers() {
        let h = headers(&["Atleta", "Test", "Tempo di volo", "Tempo di contatto", "Altezza"]);
        assert_eq!(detect_vendor(&h, None, 2).vendor, Vendor::Optojump);
    }

    #[test]
    fn test_single_match_falls_back_to_generic() {
        let h = headers(&["athlete_id", "jump_type", "timestamp", "period_name"]);
        let detection = detect_vendor(&h, None, 2);
        assert_eq!(detection.vendor, Vendor::Generic);
        let catapult = detection
            .scores
            .iter()
            .find(|s| s.vendor == Vendor::Catapult)
            .unwrap();
        assert_eq!(catapult.matches, 1);
    }

    #[test]
    fn test_plain_headers_stay_generic() {
        let h = headers(&["Name", "Jump Type", "Jump Height", "Date"]);
        let detection = detect_vendor(&h, None, 2);
        assert_eq!(detection.vendor, Vendor::Generic);
        assert!(detection.scores.iter().all(|s| s.matches == 0));

        let h = headers(&["Player", "Distance", "Name"]);
        assert_eq!(detect_vendor(&h, None, 2).vendor, Vendor::Generic);
    }

    #[test]
    fn test_segment_matching() {
        let h = headers(&["TV (ms)", "Watch"]);
        let chronojump = score_vendor(Vendor::Chronojump, &h);
        // "tc" is not a segment of "watch"
        assert_eq!(chronojump.matches, 1);

        let h = headers(&["Total Player Load (AU)"]);
        let catapult = score_vendor(Vendor::Catapult, &h);
        assert_eq!(catapult.matches, 2);
    }

    #[test]
    fn test_ties_go_to_declaration_order() {
        let score = |vendor, score, matches| VendorScore {
            vendor,
            score,
            matches,
        };
        let scores = vec![
            score(Vendor::Catapult, 1.0, 1),
            score(Vendor::StatSports, 4.0, 3),
            score(Vendor::Chronojump, 4.0, 2),
            score(Vendor::Optojump, 9.0, 1),
        ];
        // Optojump scores highest but has too few matching tokens
        assert_eq!(pick_best(&scores, 2), Vendor::StatSports);
        assert_eq!(pick_best(&scores, 4), Vendor::Generic);
    }
}
