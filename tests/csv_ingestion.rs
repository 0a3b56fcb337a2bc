use bikeshare_explorer::BikeshareError;
use bikeshare_explorer::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use bikeshare_explorer::types::{DayOfWeek, OptionalColumns};

#[test]
fn ingest_csv_from_path_happy_path() {
    let ds = ingest_csv_from_path("tests/fixtures/chicago.csv").unwrap();

    assert_eq!(ds.row_count(), 8);
    assert_eq!(ds.columns, OptionalColumns::all());

    let first = &ds.records[0];
    assert_eq!(first.start_station, "Clark St & Elm St");
    assert_eq!(first.end_station, "Wells St & Concord Ln");
    assert_eq!(first.trip_duration_seconds, 600.0);
    assert_eq!(first.user_type.as_deref(), Some("Subscriber"));
    assert_eq!(first.gender.as_deref(), Some("Male"));
    assert_eq!(first.birth_year, Some(1990));
    assert_eq!((first.month, first.day_of_week, first.hour), (1, DayOfWeek::Monday, 8));

    // Blank gender / birth year cells are absent, not errors.
    assert_eq!(ds.records[2].gender, None);
    assert_eq!(ds.records[2].birth_year, None);
}

#[test]
fn ingest_csv_without_optional_columns() {
    let ds = ingest_csv_from_path("tests/fixtures/washington.csv").unwrap();
    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.columns, OptionalColumns::none());
    assert_eq!(ds.records[0].trip_duration_seconds, 489.066);
    assert!(ds.iter().all(|r| r.gender.is_none() && r.birth_year.is_none()));
}

#[test]
fn ingest_csv_allows_reordered_columns() {
    let input = "User Type,End Station,Start Station,Trip Duration,Start Time\nCustomer,B,A,42,2017-04-04 23:59:00\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.records[0].start_station, "A");
    assert_eq!(ds.records[0].end_station, "B");
    assert_eq!(ds.records[0].hour, 23);
    assert_eq!(ds.records[0].end_time, None);
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let input = "Start Time,Trip Duration,Start Station,End Station\n2017-01-01 00:00:00,1,A,B\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = ingest_csv_from_reader(&mut rdr).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'User Type'"));
}

#[test]
fn ingest_csv_reports_malformed_start_time_with_row_number() {
    let err = ingest_csv_from_path("tests/fixtures/malformed.csv").unwrap_err();
    match err {
        BikeshareError::MalformedRecord { row, raw, .. } => {
            // Header is row 1.
            assert_eq!(row, 3);
            assert_eq!(raw, "not a time");
        }
        other => panic!("expected MalformedRecord, got {other}"),
    }
}

#[test]
fn ingest_csv_errors_on_non_numeric_duration() {
    let input = "Start Time,Trip Duration,Start Station,End Station,User Type\n2017-01-01 00:00:00,ten,A,B,Customer\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let msg = ingest_csv_from_reader(&mut rdr).unwrap_err().to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'Trip Duration'"));
}
