//! Session consolidation
//!
//! Some exports describe one training session with several rows: per-period
//! breakdowns, often plus a whole-session aggregate. Consolidation folds them
//! into a single summary so volume is never counted twice.
//!
//! Row roles come from the `period_name` and `notes` labels. This is a keyword
//! heuristic and depends on how each vendor labels its aggregate rows.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::adapters::transforms::fold_text;
use crate::schema::{fields, Consolidation, ParsedRecord, CANONICAL_FIELDS};
use crate::types::{IssueKind, IssueLog};

/// Label keywords marking a whole-session aggregate row
pub const AGGREGATE_KEYWORDS: &[&str] = &["session", "total"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowRole {
    Aggregate,
    Period,
}

/// Role of a row judged by its labels alone
pub fn classify(record: &ParsedRecord) -> RowRole {
    let labelled_aggregate = [fields::PERIOD_NAME, fields::NOTES]
        .iter()
        .filter_map(|field| record.get_str(field))
        .map(fold_text)
        .any(|label| AGGREGATE_KEYWORDS.iter().any(|kw| label.contains(kw)));
    if labelled_aggregate {
        RowRole::Aggregate
    } else {
        RowRole::Period
    }
}

/// One contributing period row, kept for drill-down
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodDetail {
    pub row_number: usize,
    pub label: Option<String>,
    pub metrics: BTreeMap<String, f64>,
}

/// One physical session after merging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedSession {
    pub athlete_id: String,
    pub date: Option<NaiveDate>,
    pub session_id: Option<String>,
    pub session_name: Option<String>,
    pub has_aggregate: bool,
    pub periods_count: usize,
    pub metrics: BTreeMap<String, f64>,
    pub periods: Vec<PeriodDetail>,
    /// Source line of the aggregate row
    pub aggregate_row: Option<usize>,
}

impl ConsolidatedSession {
    pub fn metric(&self, field: &str) -> Option<f64> {
        self.metrics.get(field).copied()
    }

    /// Rows merged into this session
    pub fn row_count(&self) -> usize {
        self.periods_count + usize::from(self.has_aggregate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SessionKey {
    athlete_id: String,
    date: Option<NaiveDate>,
    session: Option<String>,
}

fn session_key(record: &ParsedRecord) -> SessionKey {
    let text = |field| {
        record
            .get_str(field)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    SessionKey {
        athlete_id: text(fields::ATHLETE_ID).unwrap_or_default(),
        date: record.timestamp().map(|ts| ts.date()),
        session: text(fields::SESSION_ID).or_else(|| text(fields::SESSION_NAME)),
    }
}

fn row_metrics(record: &ParsedRecord) -> BTreeMap<String, f64> {
    CANONICAL_FIELDS
        .iter()
        .filter(|f| f.consolidation != Consolidation::None)
        .filter_map(|f| record.get_f64(f.name).map(|v| (f.name.to_string(), v)))
        .collect()
}

/// Group valid records into sessions and merge each group.
///
/// Groups keep first-appearance order and rows keep file order.
pub fn consolidate(records: &[ParsedRecord], log: &mut IssueLog) -> Vec<ConsolidatedSession> {
    let mut order: Vec<SessionKey> = Vec::new();
    let mut groups: BTreeMap<SessionKey, Vec<&ParsedRecord>> = BTreeMap::new();
    for record in records {
        let key = session_key(record);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(record);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let rows = groups.remove(&key)?;
            Some(merge_group(key, &rows, log))
        })
        .collect()
}

fn merge_group(key: SessionKey, rows: &[&ParsedRecord], log: &mut IssueLog) -> ConsolidatedSession {
    let first = rows.first().copied();
    let label_of = |record: &ParsedRecord| {
        record
            .get_str(fields::PERIOD_NAME)
            .or_else(|| record.get_str(fields::NOTES))
            .map(str::to_string)
    };

    // A lone row is the session
    let mut aggregate: Option<&ParsedRecord> = if rows.len() == 1 { first } else { None };
    let mut periods: Vec<&ParsedRecord> = Vec::new();
    if aggregate.is_none() {
        for record in rows {
            match (classify(record), aggregate) {
                (RowRole::Aggregate, None) => aggregate = Some(*record),
                (RowRole::Aggregate, Some(kept)) => {
                    warn!(
                        row = record.row_number,
                        aggregate_row = kept.row_number,
                        "Second aggregate row in one session, treating it as a period"
                    );
                    log.warn(
                        record.row_number,
                        Some(fields::PERIOD_NAME),
                        IssueKind::DuplicateAggregate,
                        format!(
                            "Session already has an aggregate row (line {}); \
                             this row is counted as a period",
                            kept.row_number
                        ),
                    );
                    periods.push(*record);
                }
                (RowRole::Period, _) => periods.push(*record),
            }
        }
    }

    let aggregate_metrics = aggregate.map(row_metrics);
    let period_metrics: Vec<BTreeMap<String, f64>> =
        periods.iter().map(|r| row_metrics(r)).collect();
    let metrics = merge_metrics(aggregate_metrics.as_ref(), &period_metrics);

    let session = ConsolidatedSession {
        athlete_id: key.athlete_id,
        date: key.date,
        session_id: first.and_then(|r| r.get_str(fields::SESSION_ID)).map(str::to_string),
        session_name: first
            .and_then(|r| r.get_str(fields::SESSION_NAME))
            .map(str::to_string),
        has_aggregate: aggregate.is_some(),
        periods_count: periods.len(),
        metrics,
        periods: periods
            .iter()
            .zip(period_metrics)
            .map(|(record, metrics)| PeriodDetail {
                row_number: record.row_number,
                label: label_of(*record),
                metrics,
            })
            .collect(),
        aggregate_row: aggregate.map(|r| r.row_number),
    };
    debug!(
        athlete = %session.athlete_id,
        has_aggregate = session.has_aggregate,
        periods = session.periods_count,
        "Consolidated session"
    );
    session
}

/// Merge one session's metrics by each field's consolidation class.
///
/// With an aggregate, cumulative metrics are taken from it verbatim, even when
/// it leaves a field blank. Count metrics fall back to the period sum when the
/// aggregate lacks them. Maximum metrics always span every row.
pub fn merge_metrics(
    aggregate: Option<&BTreeMap<String, f64>>,
    periods: &[BTreeMap<String, f64>],
) -> BTreeMap<String, f64> {
    let mut merged = BTreeMap::new();
    for definition in CANONICAL_FIELDS {
        let name = definition.name;
        let from_aggregate = aggregate.and_then(|m| m.get(name).copied());
        let period_values: Vec<f64> =
            periods.iter().filter_map(|m| m.get(name).copied()).collect();

        let value = match definition.consolidation {
            Consolidation::None => None,
            Consolidation::Cumulative if aggregate.is_some() => from_aggregate,
            Consolidation::Cumulative => sum(&period_values),
            Consolidation::Count => from_aggregate.or_else(|| sum(&period_values)),
            Consolidation::Maximum => from_aggregate
                .into_iter()
                .chain(period_values.iter().copied())
                .reduce(f64::max),
            Consolidation::Average => from_aggregate.or_else(|| weighted_mean(name, periods)),
        };
        if let Some(value) = value {
            merged.insert(name.to_string(), value);
        }
    }
    merged
}

fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

/// Duration-weighted mean when every contributing period has a duration,
/// plain mean otherwise
fn weighted_mean(field: &str, periods: &[BTreeMap<String, f64>]) -> Option<f64> {
    let samples: Vec<(f64, Option<f64>)> = periods
        .iter()
        .filter_map(|m| {
            let value = m.get(field).copied()?;
            let weight = m.get(fields::DURATION).copied().filter(|d| *d > 0.0);
            Some((value, weight))
        })
        .collect();
    if samples.is_empty() {
        return None;
    }

    if samples.iter().all(|(_, weight)| weight.is_some()) {
        let (total, weights) = samples
            .iter()
            .fold((0.0, 0.0), |(total, weights), (value, weight)| {
                let w = weight.unwrap_or(0.0);
                (total + value * w, weights + w)
            });
        Some(total / weights)
    } else {
        Some(samples.iter().map(|(value, _)| value).sum::<f64>() / samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldValue;
    use crate::types::Vendor;
    use chrono::{NaiveDateTime, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn gps_row(line: usize, label: &str, metrics: &[(&str, f64)]) -> ParsedRecord {
        let mut values = BTreeMap::new();
        values.insert(fields::ATHLETE_ID.to_string(), FieldValue::Text("P7".into()));
        values.insert(fields::SESSION_NAME.to_string(), FieldValue::Text("MD-1".into()));
        values.insert(
            fields::TIMESTAMP.to_string(),
            FieldValue::Timestamp(
                NaiveDateTime::parse_from_str("2024-03-01 10:00", "%Y-%m-%d %H:%M").unwrap(),
            ),
        );
        if !label.is_empty() {
            values.insert(fields::PERIOD_NAME.to_string(), FieldValue::Text(label.into()));
        }
        for (k, v) in metrics {
            values.insert(k.to_string(), FieldValue::Float(*v));
        }
        ParsedRecord {
            row_number: line,
            vendor: Vendor::Catapult,
            parsed_at: Utc::now(),
            fields: values,
            derived: BTreeSet::new(),
            raw: Vec::new(),
        }
    }

    #[test]
    fn test_classify_labels() {
        assert_eq!(classify(&gps_row(2, "Session Total", &[])), RowRole::Aggregate);
        assert_eq!(classify(&gps_row(2, "WHOLE SESSION", &[])), RowRole::Aggregate);
        assert_eq!(classify(&gps_row(2, "First Half", &[])), RowRole::Period);
        assert_eq!(classify(&gps_row(2, "", &[])), RowRole::Period);
    }

    #[test]
    fn test_aggregate_is_not_double_counted() {
        let rows = vec![
            gps_row(2, "Session Total", &[(fields::TOTAL_DISTANCE, 10000.0)]),
            gps_row(3, "First Half", &[(fields::TOTAL_DISTANCE, 5000.0)]),
            gps_row(4, "Second Half", &[(fields::TOTAL_DISTANCE, 5000.0)]),
        ];
        let mut log = IssueLog::new();
        let sessions = consolidate(&rows, &mut log);

        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.metric(fields::TOTAL_DISTANCE), Some(10000.0));
        assert!(session.has_aggregate);
        assert_eq!(session.periods_count, 2);
        assert_eq!(session.aggregate_row, Some(2));
        assert_eq!(session.periods[1].label.as_deref(), Some("Second Half"));
        assert!(log.warnings.is_empty());
    }

    #[test]
    fn test_periods_without_aggregate_are_summed() {
        let rows = vec![
            gps_row(
                2,
                "First Half",
                &[(fields::TOTAL_DISTANCE, 5500.0), (fields::MAX_SPEED, 29.0)],
            ),
            gps_row(
                3,
                "Second Half",
                &[(fields::TOTAL_DISTANCE, 4800.0), (fields::MAX_SPEED, 31.5)],
            ),
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].metric(fields::TOTAL_DISTANCE), Some(10300.0));
        assert_eq!(sessions[0].metric(fields::MAX_SPEED), Some(31.5));
        assert!(!sessions[0].has_aggregate);
        assert_eq!(sessions[0].periods_count, 2);
    }

    #[test]
    fn test_single_row_is_aggregate() {
        let rows = vec![gps_row(
            2,
            "First Half",
            &[
                (fields::TOTAL_DISTANCE, 7200.0),
                (fields::MAX_SPEED, 30.2),
                (fields::AVG_HEART_RATE, 151.0),
            ],
        )];
        let sessions = consolidate(&rows, &mut IssueLog::new());

        let session = &sessions[0];
        assert!(session.has_aggregate);
        assert_eq!(session.periods_count, 0);
        assert_eq!(session.metrics, row_metrics(&rows[0]));
    }

    #[test]
    fn test_period_peak_beats_aggregate_peak() {
        let rows = vec![
            gps_row(
                2,
                "Session Total",
                &[(fields::TOTAL_DISTANCE, 9000.0), (fields::MAX_SPEED, 30.0)],
            ),
            gps_row(3, "Drill A", &[(fields::TOTAL_DISTANCE, 4000.0), (fields::MAX_SPEED, 32.4)]),
            gps_row(4, "Drill B", &[(fields::TOTAL_DISTANCE, 5000.0), (fields::MAX_SPEED, 28.0)]),
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());
        assert_eq!(sessions[0].metric(fields::MAX_SPEED), Some(32.4));
        assert_eq!(sessions[0].metric(fields::TOTAL_DISTANCE), Some(9000.0));
    }

    #[test]
    fn test_aggregate_peak_kept_when_highest() {
        let rows = vec![
            gps_row(2, "Total", &[(fields::MAX_SPEED, 33.0)]),
            gps_row(3, "Drill A", &[(fields::MAX_SPEED, 32.4)]),
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());
        assert_eq!(sessions[0].metric(fields::MAX_SPEED), Some(33.0));
    }

    #[test]
    fn test_counts_and_averages() {
        let rows = vec![
            gps_row(
                2,
                "Drill A",
                &[(fields::SPRINT_COUNT, 4.0), (fields::AVG_SPEED, 6.0), (fields::DURATION, 30.0)],
            ),
            gps_row(
                3,
                "Drill B",
                &[(fields::SPRINT_COUNT, 6.0), (fields::AVG_SPEED, 9.0), (fields::DURATION, 60.0)],
            ),
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());
        let session = &sessions[0];
        assert_eq!(session.metric(fields::SPRINT_COUNT), Some(10.0));
        assert_eq!(session.metric(fields::DURATION), Some(90.0));
        // (6·30 + 9·60) / 90
        assert_eq!(session.metric(fields::AVG_SPEED), Some(8.0));
    }

    #[test]
    fn test_plain_mean_without_durations() {
        let periods = vec![
            BTreeMap::from([(fields::AVG_HEART_RATE.to_string(), 140.0)]),
            BTreeMap::from([(fields::AVG_HEART_RATE.to_string(), 150.0)]),
        ];
        let merged = merge_metrics(None, &periods);
        assert_eq!(merged.get(fields::AVG_HEART_RATE), Some(&145.0));
    }

    #[test]
    fn test_count_from_aggregate_when_present() {
        let rows = vec![
            gps_row(2, "Session", &[(fields::SPRINT_COUNT, 9.0)]),
            gps_row(3, "Drill A", &[(fields::SPRINT_COUNT, 4.0)]),
            gps_row(4, "Drill B", &[(fields::SPRINT_COUNT, 6.0)]),
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());
        assert_eq!(sessions[0].metric(fields::SPRINT_COUNT), Some(9.0));
    }

    #[test]
    fn test_blank_aggregate_distance_is_not_rebuilt_from_periods() {
        let rows = vec![
            gps_row(2, "Session Total", &[(fields::TOTAL_DISTANCE, 9000.0)]),
            gps_row(
                3,
                "First Half",
                &[(fields::TOTAL_DISTANCE, 4500.0), (fields::HIGH_SPEED_DISTANCE, 400.0)],
            ),
            gps_row(
                4,
                "Second Half",
                &[(fields::TOTAL_DISTANCE, 4500.0), (fields::HIGH_SPEED_DISTANCE, 300.0)],
            ),
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());

        assert!(sessions[0].has_aggregate);
        assert_eq!(sessions[0].metric(fields::TOTAL_DISTANCE), Some(9000.0));
        assert_eq!(sessions[0].metric(fields::HIGH_SPEED_DISTANCE), None);
        // Still available per period for drill-down
        assert_eq!(
            sessions[0].periods[0].metrics.get(fields::HIGH_SPEED_DISTANCE),
            Some(&400.0)
        );
    }

    #[test]
    fn test_second_aggregate_becomes_period_with_warning() {
        let rows = vec![
            gps_row(2, "Session Total", &[(fields::TOTAL_DISTANCE, 10000.0)]),
            gps_row(3, "Total (copy)", &[(fields::TOTAL_DISTANCE, 10000.0)]),
        ];
        let mut log = IssueLog::new();
        let sessions = consolidate(&rows, &mut log);

        assert_eq!(sessions[0].metric(fields::TOTAL_DISTANCE), Some(10000.0));
        assert_eq!(sessions[0].periods_count, 1);
        assert_eq!(log.warnings.len(), 1);
        assert_eq!(log.warnings[0].kind, IssueKind::DuplicateAggregate);
        assert_eq!(log.warnings[0].row, 3);
    }

    #[test]
    fn test_groups_split_by_athlete_and_session() {
        let mut other = gps_row(4, "First Half", &[(fields::TOTAL_DISTANCE, 3000.0)]);
        other
            .fields
            .insert(fields::ATHLETE_ID.to_string(), FieldValue::Text("P9".into()));
        let mut later = gps_row(5, "First Half", &[(fields::TOTAL_DISTANCE, 2000.0)]);
        later
            .fields
            .insert(fields::SESSION_ID.to_string(), FieldValue::Text("S-2".into()));
        let rows = vec![
            gps_row(2, "First Half", &[(fields::TOTAL_DISTANCE, 5000.0)]),
            gps_row(3, "Second Half", &[(fields::TOTAL_DISTANCE, 4000.0)]),
            other,
            later,
        ];
        let sessions = consolidate(&rows, &mut IssueLog::new());

        let summary: Vec<(String, Option<f64>)> = sessions
            .iter()
            .map(|s| (s.athlete_id.clone(), s.metric(fields::TOTAL_DISTANCE)))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("P7".to_string(), Some(9000.0)),
                ("P9".to_string(), Some(3000.0)),
                ("P7".to_string(), Some(2000.0)),
            ]
        );
        assert_eq!(sessions[2].session_id.as_deref(), Some("S-2"));
    }
}
