//! End-to-end runs over small fixture files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use hotel_ontology::{
    dry_run, run, LoadError, NormalizeError, PipelineError, PipelineOptions, SimulationError,
    SOURCE_COLUMNS,
};
use tempfile::TempDir;

const HEADER: &str = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,\
arrival_date_day_of_month,stays_in_weekend_nights,stays_in_week_nights,adults,children,babies,country";

const ROWS: &[&str] = &[
    "Resort Hotel,0,342,2015,July,1,0,0,2,0,0,PRT",
    "Resort Hotel,0,7,2015,July,1,0,1,1,0,0,GBR",
    "City Hotel,1,85,2015,July,1,0,3,2,NA,0,PRT",
    "City Hotel,0,85,2015,July,1,1,1,2,1,1,ESP",
    "City Hotel,0,85,2015,July,1,0,2,1,0,0,FRA",
    "Resort Hotel,1,13,2016,January,30,2,5,2,2,0,DEU",
    "City Hotel,0,0,2017,February,28,0,0,1,,0,PRT",
];

struct Fixture {
    dir: TempDir,
    input: PathBuf,
}

impl Fixture {
    fn new(rows: &[&str]) -> Self {
        Self::with_header(HEADER, rows)
    }

    fn with_header(header: &str, rows: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("hotel_bookings.csv");
        let mut content = String::from(header);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content.push('\n');
        fs::write(&input, content).unwrap();
        Self { dir, input }
    }

    fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn options(&self, out: &str, seed: u64) -> PipelineOptions {
        PipelineOptions {
            input_path: self.input.clone(),
            output_dir: self.out(out),
            seed,
            delimiter: ',',
        }
    }
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn output_files(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn writes_three_views_with_fixed_columns() {
    let fx = Fixture::new(ROWS);
    let report = run(&fx.options("out", 42)).unwrap();

    assert_eq!(report.source.row_count, ROWS.len());
    assert_eq!(report.children_filled, 2);
    assert_eq!(report.audit.unique_ids, ROWS.len());
    assert_eq!(
        output_files(&fx.out("out")),
        [
            "arrival_metadata.csv",
            "booking_financials.csv",
            "bookings_core.csv"
        ]
    );

    let (core_header, core) = read_rows(&fx.out("out").join("bookings_core.csv"));
    assert_eq!(
        core_header,
        ["booking_id", "hotel", "is_canceled", "lead_time", "total_guests", "stay_duration"]
    );
    let (arrival_header, arrival) = read_rows(&fx.out("out").join("arrival_metadata.csv"));
    assert_eq!(
        arrival_header,
        [
            "booking_id",
            "arrival_date_year",
            "arrival_date_month",
            "arrival_date_day_of_month",
            "stays_in_weekend_nights"
        ]
    );
    let (fin_header, fin) = read_rows(&fx.out("out").join("booking_financials.csv"));
    assert_eq!(
        fin_header,
        ["booking_id", "hotel", "is_canceled", "stay_duration", "total_cost"]
    );

    assert_eq!(core.len(), ROWS.len());
    assert_eq!(arrival.len(), ROWS.len());
    assert_eq!(fin.len(), ROWS.len());

    // Same join key, same row position, in every view.
    for i in 0..ROWS.len() {
        assert_eq!(core[i][0], arrival[i][0]);
        assert_eq!(core[i][0], fin[i][0]);
    }

    // Month names are exported as numbers, in source order.
    let months: Vec<&str> = arrival.iter().map(|r| r[2].as_str()).collect();
    assert_eq!(months, ["7", "7", "7", "7", "7", "1", "2"]);
}

#[test]
fn derived_totals_match_source_columns() {
    let fx = Fixture::new(ROWS);
    run(&fx.options("out", 42)).unwrap();
    let (_, core) = read_rows(&fx.out("out").join("bookings_core.csv"));

    let guests: Vec<&str> = core.iter().map(|r| r[4].as_str()).collect();
    let nights: Vec<&str> = core.iter().map(|r| r[5].as_str()).collect();
    assert_eq!(guests, ["2", "1", "2", "4", "1", "4", "1"]);
    assert_eq!(nights, ["0", "1", "3", "2", "2", "7", "0"]);
}

#[test]
fn booking_ids_are_unique_hex_even_when_fields_collide() {
    let fx = Fixture::new(ROWS);
    run(&fx.options("out", 42)).unwrap();
    let (_, core) = read_rows(&fx.out("out").join("bookings_core.csv"));

    let ids: Vec<&str> = core.iter().map(|r| r[0].as_str()).collect();
    for id in &ids {
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }
    // Rows 2-4 share lead_time, year and day.
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(ids[0], hotel_ontology::booking_id(0, 342, 2015, 1));
}

#[test]
fn same_seed_gives_byte_identical_files() {
    let fx = Fixture::new(ROWS);
    run(&fx.options("first", 42)).unwrap();
    run(&fx.options("second", 42)).unwrap();

    for name in [
        "bookings_core.csv",
        "arrival_metadata.csv",
        "booking_financials.csv",
    ] {
        let a = fs::read(fx.out("first").join(name)).unwrap();
        let b = fs::read(fx.out("second").join(name)).unwrap();
        assert_eq!(a, b, "{name} differs between runs");
    }
}

#[test]
fn seed_only_affects_costs() {
    let fx = Fixture::new(ROWS);
    run(&fx.options("a", 42)).unwrap();
    run(&fx.options("b", 43)).unwrap();

    for name in ["bookings_core.csv", "arrival_metadata.csv"] {
        assert_eq!(
            fs::read(fx.out("a").join(name)).unwrap(),
            fs::read(fx.out("b").join(name)).unwrap()
        );
    }
    assert_ne!(
        fs::read(fx.out("a").join("booking_financials.csv")).unwrap(),
        fs::read(fx.out("b").join("booking_financials.csv")).unwrap()
    );
}

#[test]
fn costs_are_non_negative_cents_within_variance_band() {
    let fx = Fixture::new(ROWS);
    run(&fx.options("out", 42)).unwrap();
    let (_, fin) = read_rows(&fx.out("out").join("booking_financials.csv"));

    for row in &fin {
        let cost = &row[4];
        let (_, cents) = cost.split_once('.').expect("two-decimal cost");
        assert_eq!(cents.len(), 2);
        assert!(cost.parse::<f64>().unwrap() >= 0.0);
    }

    // Zero-night stays cost nothing.
    assert_eq!(fin[0][4], "0.00");
    assert_eq!(fin[6][4], "0.00");

    // City Hotel, July, 2 nights, not canceled: 351 before variance.
    let cost: f64 = fin[4][4].parse().unwrap();
    assert!((351.0 * 0.85 - 0.01..=351.0 * 1.15 + 0.01).contains(&cost), "{cost}");

    // Canceled City Hotel, July, 3 nights: 20% of 526.5 before variance.
    let fee: f64 = fin[2][4].parse().unwrap();
    let base = 130.0 * 1.35 * 3.0 * 0.20;
    assert!((base * 0.85 - 0.01..=base * 1.15 + 0.01).contains(&fee), "{fee}");
}

#[test]
fn missing_children_is_filled_and_passes_audit() {
    let fx = Fixture::new(&["City Hotel,0,4,2016,May,3,1,1,2,,0,PRT"]);
    let report = run(&fx.options("out", 42)).unwrap();

    assert_eq!(report.children_filled, 1);
    assert!(report.audit.views.iter().all(|v| v.nulls == 0));
    let (_, core) = read_rows(&fx.out("out").join("bookings_core.csv"));
    assert_eq!(core[0][4], "2");
}

#[test]
fn invalid_month_fails_without_writing() {
    let mut rows = ROWS.to_vec();
    rows.push("City Hotel,0,4,2016,Smarch,3,1,1,2,0,0,PRT");
    let fx = Fixture::new(&rows);

    let err = run(&fx.options("out", 42)).unwrap_err();
    match err {
        PipelineError::Normalize(NormalizeError::InvalidMonth { ordinal, value }) => {
            assert_eq!(ordinal, ROWS.len());
            assert_eq!(value, "Smarch");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(output_files(&fx.out("out")).is_empty());
}

#[test]
fn unknown_hotel_fails_and_keeps_previous_outputs() {
    let fx = Fixture::new(&["Motel,0,4,2016,May,3,1,1,2,0,0,PRT"]);
    let out = fx.out("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("bookings_core.csv"), "previous run").unwrap();

    let err = run(&fx.options("out", 42)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Simulation(SimulationError::UnknownHotelType { ordinal: 0, ref value })
            if value == "Motel"
    ));
    assert_eq!(
        fs::read_to_string(out.join("bookings_core.csv")).unwrap(),
        "previous run"
    );
    assert_eq!(output_files(&out), ["bookings_core.csv"]);
}

#[test]
fn missing_required_column_is_a_load_error() {
    let fx = Fixture::with_header(
        "hotel,is_canceled,lead_time",
        &["City Hotel,0,4"],
    );
    let err = run(&fx.options("out", 42)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoadError::MissingColumn(ref c)) if c == "adults"
    ));
}

#[test]
fn ragged_row_is_a_load_error() {
    let fx = Fixture::new(&["City Hotel,0,4,2016,May,3,1,1,2,0,0,PRT,extra"]);
    let err = run(&fx.options("out", 42)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoadError::ColumnCountMismatch { line: 2, .. })
    ));
}

#[test]
fn full_reference_header_is_accepted() {
    let header = SOURCE_COLUMNS.join(",");
    let row = "Resort Hotel,0,342,2015,July,27,1,0,0,2,0,0,BB,PRT,Direct,Direct,0,0,0,C,C,3,\
No Deposit,NULL,NULL,0,Transient,0,0,0,Check-Out,2015-07-01";
    let fx = Fixture::with_header(&header, &[row]);

    let report = run(&fx.options("out", 42)).unwrap();
    assert_eq!(report.source.headers.len(), 32);
    assert_eq!(report.audit.unique_ids, 1);
}

#[test]
fn dry_run_audits_without_writing() {
    let fx = Fixture::new(ROWS);
    let report = dry_run(&fx.options("out", 42)).unwrap();

    assert_eq!(report.source.row_count, ROWS.len());
    assert_eq!(report.audit.views.len(), 3);
    assert!(output_files(&fx.out("out")).is_empty());
}
