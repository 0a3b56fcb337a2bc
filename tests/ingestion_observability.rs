use std::sync::{Arc, Mutex};

use bikeshare_explorer::BikeshareError;
use bikeshare_explorer::ingestion::{
    DataSources, FileObserver, IngestionContext, IngestionFormat, IngestionObserver, IngestionOptions,
    IngestionSeverity, IngestionStats, ingest_from_path, load_city,
};
use bikeshare_explorer::types::CityId;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Option<CityId>, usize)>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push((ctx.city, stats.rows));
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &BikeshareError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &BikeshareError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(obs: &Arc<RecordingObserver>) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_success_with_city_and_row_count() {
    let obs = Arc::new(RecordingObserver::default());
    let sources = DataSources::new("tests/fixtures");

    let ds = load_city(CityId::Chicago, &sources, &options_with(&obs)).unwrap();

    assert_eq!(ds.city, Some(CityId::Chicago));
    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![(Some(CityId::Chicago), 8)]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn missing_city_source_is_critical_and_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let dir = tempfile::tempdir().unwrap();
    let sources = DataSources::new(dir.path());

    let err = load_city(CityId::Washington, &sources, &options_with(&obs)).unwrap_err();
    match err {
        BikeshareError::DataSourceNotFound { city, path, .. } => {
            assert_eq!(city, CityId::Washington);
            assert_eq!(path, dir.path().join("washington.csv"));
        }
        other => panic!("expected DataSourceNotFound, got {other}"),
    }

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
}

#[test]
fn malformed_record_fails_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..options_with(&obs)
    };

    let err = ingest_from_path("tests/fixtures/malformed.csv", &opts).unwrap_err();
    assert!(matches!(err, BikeshareError::MalformedRecord { .. }));

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn file_observer_appends_one_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("ingest.log");
    let opts = IngestionOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };
    let sources = DataSources::new("tests/fixtures");

    load_city(CityId::Washington, &sources, &opts).unwrap();
    let _ = load_city(CityId::Chicago, &DataSources::new(dir.path()), &opts).unwrap_err();

    let text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // success, failure, alert
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(" ok city=Washington format=Csv"));
    assert!(lines[0].ends_with("rows=3"));
    assert!(lines[1].contains(" fail severity=Critical city=Chicago"));
    assert!(lines[2].contains(" ALERT severity=Critical city=Chicago"));
}
