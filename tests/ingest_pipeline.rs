//! End-to-end tests over in-memory vendor exports
//!
//! Each fixture mimics a real export closely enough to exercise format
//! detection, vendor detection, mapping, coercion, validation and, where the
//! file has several rows per session, consolidation.

use perf_ingest::schema::fields;
use perf_ingest::{
    import_session_file, parse_performance_file, IngestProcessor, IssueKind, MappingTable, Vendor,
};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashSet};

fn no_subjects() -> HashSet<String> {
    HashSet::new()
}

fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn close(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-6)
}

#[test]
fn test_statsports_session_with_total_row() {
    let csv = "Player Display Name,Session Title,Drill Title,Session Date,\
               Total Distance,HSR Distance,Max Speed,Accelerations\n\
               Kim,MD-2,Session Total,2024-03-04,10000,820,8.5,42\n\
               Kim,MD-2,Warm Up,2024-03-04,5000,300,7.0,15\n\
               Kim,MD-2,Small Sided Games,2024-03-04,5000,520,8.9,27\n";

    let import = import_session_file(csv.as_bytes(), None, &no_subjects());

    assert_eq!(import.parse.vendor, Vendor::StatSports);
    assert!(import.parse.success, "{:?}", import.parse.errors);
    assert_eq!(import.parse.valid_rows, 3);
    assert_eq!(import.sessions.len(), 1);

    let session = &import.sessions[0];
    assert!(session.has_aggregate);
    assert_eq!(session.periods_count, 2);
    assert_eq!(session.session_name.as_deref(), Some("MD-2"));
    assert_eq!(session.metric(fields::TOTAL_DISTANCE), Some(10000.0));
    assert_eq!(session.metric(fields::HIGH_SPEED_DISTANCE), Some(820.0));
    assert_eq!(session.metric(fields::ACCELERATIONS), Some(42.0));
    // Speeds arrive in m/s; the fastest drill beats the total row
    assert!(close(session.metric(fields::MAX_SPEED), 8.9 * 3.6));
}

#[test]
fn test_latin1_catapult_periods_are_summed() {
    let text = "Player Name;Period Name;Date;Total Distance;Maximum Velocity\n\
                José;First Half;01.03.2024;5.500,5;29,4\n\
                José;Second Half;01.03.2024;4.799,5;31,2\n";

    let import = import_session_file(&latin1(text), None, &no_subjects());

    assert_eq!(import.parse.encoding.as_deref(), Some("latin-1"));
    assert_eq!(import.parse.delimiter, Some(';'));
    assert_eq!(import.parse.vendor, Vendor::Catapult);
    assert_eq!(import.parse.records[0].get_str(fields::ATHLETE_ID), Some("José"));

    assert_eq!(import.sessions.len(), 1);
    let session = &import.sessions[0];
    assert!(!session.has_aggregate);
    assert_eq!(session.periods_count, 2);
    assert!(close(session.metric(fields::TOTAL_DISTANCE), 10300.0));
    assert!(close(session.metric(fields::MAX_SPEED), 31.2));
    assert!(import.consolidated);
}

#[test]
fn test_single_row_file_is_its_own_aggregate() {
    let csv = "athlete_id,date,session_name,period_name,\
               total_distance,max_speed,duration,source_system\n\
               A1,2024-03-01,Recovery,First Half,4200,24.5,45,lab\n";

    let import = import_session_file(csv.as_bytes(), None, &no_subjects());

    assert_eq!(import.sessions.len(), 1);
    assert!(import.has_aggregate);
    assert_eq!(import.periods_count, 0);
    assert!(!import.consolidated);

    let expected: BTreeMap<String, f64> = [
        (fields::TOTAL_DISTANCE, 4200.0),
        (fields::MAX_SPEED, 24.5),
        (fields::DURATION, 45.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    assert_eq!(import.sessions[0].metrics, expected);
}

#[test]
fn test_utf16_generic_jump_file() {
    let text = "athlete_id\tjump_type\ttimestamp\tjump_height_cm\tcontact_time_ms\tsource_system\n\
                A1\tdrop jump\t2024-03-01 09:00\t32,5\t210\tforce-plate\n\
                A1\tCMJ\t2024-03-01 09:05\t38,0\t\tforce-plate\n";

    let result = parse_performance_file(&utf16le_with_bom(text), None, &no_subjects());

    assert_eq!(result.encoding.as_deref(), Some("UTF-16LE"));
    assert_eq!(result.delimiter, Some('\t'));
    assert_eq!(result.vendor, Vendor::Generic);
    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.valid_rows, 2);

    let dj = &result.records[0];
    assert_eq!(dj.get_str(fields::JUMP_TYPE), Some("dj"));
    assert!(close(dj.get_f64(fields::CONTACT_TIME), 0.21));
    assert!(close(dj.get_f64(fields::RSI), 32.5 / 0.21));
    assert!(dj.is_derived(fields::FLIGHT_TIME));
    assert!(!dj.is_derived(fields::JUMP_HEIGHT));
    assert_eq!(
        result.column_mapping.get("contact_time_ms").map(String::as_str),
        Some(fields::CONTACT_TIME)
    );
}

#[test]
fn test_optojump_override_from_json_config() {
    let csv = "Atleta;Test;Tempo di volo;Tempo di contatto;Data;Ora\n\
               Luca;DJ;512;245;01/03/2024;10:30\n\
               Luca;DJ;498;;01/03/2024;10:32\n";

    let processor = IngestProcessor::from_config_json(
        r#"{"vendor_override": "optojump", "lenient": true}"#,
    )
    .unwrap();
    let result = processor.parse(csv.as_bytes(), Some("export.csv"), &no_subjects());

    assert_eq!(result.vendor, Vendor::Optojump);
    assert!(result.success);
    assert_eq!(result.valid_rows, 1);

    let record = &result.records[0];
    assert!(close(record.get_f64(fields::FLIGHT_TIME), 0.512));
    assert!(close(record.get_f64(fields::CONTACT_TIME), 0.245));
    assert_eq!(record.get_str(fields::SOURCE_SYSTEM), Some("optojump"));
    assert_eq!(
        record.timestamp().map(|ts| ts.to_string()),
        Some("2024-03-01 10:30:00".to_string())
    );

    // The second drop jump has no contact time
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 3);
    assert_eq!(result.errors[0].kind, IssueKind::BusinessRule);
    assert_eq!(result.errors[0].column.as_deref(), Some(fields::CONTACT_TIME));
}

#[test]
fn test_unknown_athletes_tracked_once_per_id() {
    let csv = "Person;Type;TV;Date\n\
               Ana;CMJ;0,50;2024-03-01\n\
               Eva;CMJ;0,49;2024-03-01\n\
               Eva;SJ;0,44;2024-03-01\n\
               Eva;CMJ;0,51;2024-03-02\n";
    let known: HashSet<String> = ["Ana".to_string()].into_iter().collect();

    let result = parse_performance_file(csv.as_bytes(), Some("chronojump.csv"), &known);

    assert_eq!(result.valid_rows, 1);
    assert_eq!(result.errors.len(), 3);
    let rows: Vec<usize> = result.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![3, 4, 5]);
    assert_eq!(
        result.subjects_not_found.iter().cloned().collect::<Vec<_>>(),
        vec!["Eva".to_string()]
    );
}

#[test]
fn test_custom_table_with_eu_numbers() {
    let table = MappingTable::from_entries([
        ("Jugador", "athlete_id"),
        ("Fecha", "timestamp"),
        ("Distancia (km)", "total_distance"),
        ("Vel. Max", "max_speed"),
    ])
    .unwrap();
    let csv = "Jugador;Fecha;Distancia (km);Vel. Max;Color\n\
               J10;2024-03-01;10,3;31,5;rojo\n\
               J11;2024-03-01;;;azul\n";
    let config = perf_ingest::IngestConfig {
        default_source_system: Some("club-gps".to_string()),
        ..Default::default()
    };

    let result = IngestProcessor::new()
        .with_config(config)
        .with_custom_mapping(table)
        .parse(csv.as_bytes(), None, &no_subjects());

    assert_eq!(result.vendor, Vendor::Custom);
    assert_eq!(result.unmapped_headers, vec!["Color".to_string()]);
    assert!(close(result.records[0].get_f64(fields::TOTAL_DISTANCE), 10300.0));
    assert_eq!(result.records[0].get_str(fields::SOURCE_SYSTEM), Some("club-gps"));

    // Blank metrics are missing, not zero
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, IssueKind::MissingPrimaryMetric);
}

#[test]
fn test_plain_named_jump_file_uses_generic_mapper() {
    let csv = "Name,Jump Type,Jump Height,Date\n\
               Ana,CMJ,34.5,2024-03-01\n\
               Ben,SJ,30.1,2024-03-01\n";
    let config = perf_ingest::IngestConfig {
        default_source_system: Some("lab".to_string()),
        ..Default::default()
    };

    let result = IngestProcessor::new()
        .with_config(config)
        .parse(csv.as_bytes(), None, &no_subjects());

    assert_eq!(result.vendor, Vendor::Generic);
    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.valid_rows, 2);
    assert_eq!(result.records[1].get_str(fields::ATHLETE_ID), Some("Ben"));
}

#[test]
fn test_gps_file_with_rep_column_keeps_gps_rules() {
    let csv = "athlete_id,timestamp,rep,total_distance,source_system\n\
               A1,2024-03-01 09:00,1,1200,lab\n\
               A1,2024-03-01 09:10,2,1180,lab\n";

    let result = parse_performance_file(csv.as_bytes(), None, &no_subjects());

    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.valid_rows, 2);
    assert_eq!(
        result.column_mapping.get("rep").map(String::as_str),
        Some(fields::ATTEMPT)
    );
    assert_eq!(
        result.records[1].get(fields::ATTEMPT),
        Some(&perf_ingest::FieldValue::Integer(2))
    );
}
