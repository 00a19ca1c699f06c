//! End-to-end pipeline tests: CSV data in, trade log CSV out.

mod common;

use common::*;

use std::fs;

use approx::assert_relative_eq;
use fadeback::adapters::csv_adapter::CsvAdapter;
use fadeback::adapters::csv_report_adapter::CsvReportAdapter;
use fadeback::adapters::file_config_adapter::FileConfigAdapter;
use fadeback::domain::backtest::run_instrument;
use fadeback::domain::direction::Direction;
use fadeback::domain::error::FadebackError;
use fadeback::domain::settings::load_settings;
use fadeback::domain::tradelog::TradeLog;
use fadeback::ports::data_port::DataPort;
use fadeback::ports::report_port::ReportPort;
use tempfile::TempDir;

fn write_scenario_csv(dir: &TempDir, instrument: &str) {
    fs::write(
        dir.path().join(format!("{instrument}.csv")),
        candles_to_csv(&short_scenario()),
    )
    .unwrap();
}

#[test]
fn csv_to_trade_log_round_trip() {
    let data_dir = TempDir::new().unwrap();
    write_scenario_csv(&data_dir, "CL");

    let config = FileConfigAdapter::from_string(&scenario_config_ini(
        &data_dir.path().display().to_string(),
        "CL",
    ))
    .unwrap();
    let settings = load_settings(&config).unwrap();

    assert_eq!(settings.data_dir, data_dir.path().to_path_buf());
    assert_eq!(settings.instruments.len(), 1);
    let (name, instrument_config) = &settings.instruments[0];
    assert_eq!(name, "CL");

    let tick_size = settings.ticks.get(name).unwrap();
    assert_relative_eq!(tick_size, 0.01);

    let adapter = CsvAdapter::new(settings.data_dir.clone());
    let candles = adapter.fetch_candles(name).unwrap();
    assert_eq!(candles.len(), 25);

    let session = &settings.sessions[0];
    let trades = run_instrument(
        candles,
        instrument_config,
        name,
        tick_size,
        std::slice::from_ref(session),
        settings.start_time(),
        settings.end_time(),
    )
    .unwrap();

    assert_eq!(trades.len(), 1);
    let trade = &trades[0];
    assert_eq!(trade.instrument, "CL");
    assert_eq!(trade.direction, Direction::Short);
    assert_eq!(trade.taken_at, wednesday(10, 25));
    assert_relative_eq!(trade.entry_price, 100.4);
    assert_relative_eq!(trade.stop_price, 100.62);
    assert_relative_eq!(trade.target_price, 98.8);
    assert_relative_eq!(trade.closed_at_price, 98.8);
    assert_eq!(trade.closed_at_time, wednesday(10, 35));
    assert!(trade.is_win());
    // risk 0.22, reward 1.6
    assert_relative_eq!(trade.profit(), 1.6 / 0.22, max_relative = 1e-9);

    let mut log = TradeLog::new();
    for trade in &trades {
        log.add(trade);
    }
    assert_eq!(log.total_wins(), 1);

    let output_dir = TempDir::new().unwrap();
    let output_path = output_dir.path().join("results.csv");
    CsvReportAdapter::new().write(&log, &output_path).unwrap();

    let report = fs::read_to_string(&output_path).unwrap();
    let mut lines = report.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Instrument,TakenAtDate,TakenAtTime,Direction,EntryPrice,StopPrice,\
         InitialStopPrice,TargetPrice,ClosedAtPrice,ClosedAtTime,Win,Profit"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("CL,2024-01-10,10:25:00,SHORT,100.4,100.62,100.62,98.8,98.8"));
    assert!(row.contains("2024-01-10 10:35:00,true"));
    assert!(lines.next().is_none());
}

#[test]
fn date_range_outside_the_data_fails_the_instrument() {
    let data_dir = TempDir::new().unwrap();
    write_scenario_csv(&data_dir, "CL");

    let ini = scenario_config_ini(&data_dir.path().display().to_string(), "CL")
        .replace("start_date = 2024-01-01", "start_date = 2025-01-01")
        .replace("end_date = 2024-01-31", "end_date = 2025-01-31");
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let settings = load_settings(&config).unwrap();

    let adapter = CsvAdapter::new(settings.data_dir.clone());
    let candles = adapter.fetch_candles("CL").unwrap();
    let (_, instrument_config) = &settings.instruments[0];

    let result = run_instrument(
        candles,
        instrument_config,
        "CL",
        settings.ticks.get("CL").unwrap(),
        &settings.sessions,
        settings.start_time(),
        settings.end_time(),
    );
    assert!(matches!(result, Err(FadebackError::FilteredEmpty { .. })));
}

#[test]
fn unknown_instrument_has_no_tick_size() {
    let data_dir = TempDir::new().unwrap();
    let config = FileConfigAdapter::from_string(&scenario_config_ini(
        &data_dir.path().display().to_string(),
        "OBSCURE",
    ))
    .unwrap();
    let settings = load_settings(&config).unwrap();

    assert!(matches!(
        settings.ticks.get("OBSCURE"),
        Err(FadebackError::MissingTickSize { .. })
    ));
}

#[test]
fn configured_tick_addition_feeds_the_run() {
    let data_dir = TempDir::new().unwrap();
    write_scenario_csv(&data_dir, "OBSCURE");

    let mut ini = scenario_config_ini(&data_dir.path().display().to_string(), "OBSCURE");
    ini.push_str("\n[ticks]\nOBSCURE = 0.01\n");
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let settings = load_settings(&config).unwrap();

    let tick_size = settings.ticks.get("OBSCURE").unwrap();
    let adapter = CsvAdapter::new(settings.data_dir.clone());
    let candles = adapter.fetch_candles("OBSCURE").unwrap();
    let (_, instrument_config) = &settings.instruments[0];

    let trades = run_instrument(
        candles,
        instrument_config,
        "OBSCURE",
        tick_size,
        &settings.sessions,
        settings.start_time(),
        settings.end_time(),
    )
    .unwrap();
    assert_eq!(trades.len(), 1);
}
