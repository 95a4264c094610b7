//! End to end: CSV text -> raw table -> cleaned table -> derived metrics.

use approx::assert_relative_eq;
use optlens_core::{columns, Measure};
use optlens_features::{exposure::total_exposure, MetricsEngine};
use optlens_ingestion::{chain_schema, flow_schema, greeks_schema, parse_csv, TableCleaner};

const CHAIN_CSV: &str = "\
Symbol,Type,Strike,Bid,Mid,Ask,Last,Volume,Open Int,IV,Delta,Moneyness
EQT,Call,40,2.10,2.20,2.30,2.25,1200,5400,55.10%,0.62,+8.50%
EQT,Put,40,0.80,0.85,0.90,unch,600,3000,58.20%,-0.38,+8.50%
EQT,Call,45,0.40,0.45,0.50,0.44,800,2600,52.00%,0.31,-2.20%
EQT,Put,45,3.10,3.20,3.30,N/A,400,1500,61.00%,-0.69,-2.20%
EQT,Put,50,7.00,7.10,7.20,7.05,N/A,900,66.00%,-0.88,-12.40%
";

const GREEKS_CSV: &str = "\
Symbol,Type,Strike,Bid,Ask,Volume,Open Int,IV,Delta,Gamma,Theta,Vega,ITM Prob
EQT,Call,40,2.10,2.30,1200,5400,55.1%,0.62,0.051,-0.031,0.052,60.2%
EQT,Put,40,0.80,0.90,600,3000,58.2%,-0.38,0.049,-0.029,0.050,38.4%
EQT,Call,45,0.40,0.50,800,2600,52.0%,0.31,0.060,-0.024,0.047,29.0%
EQT,Put,45,3.10,3.30,400,1500,61.0,-0.69,0.058,-0.027,0.046,71.3
";

const FLOW_CSV: &str = "\
Symbol,Price~,Type,Strike,Expires,DTE,Bid x Size,Ask x Size,Trade,Size,Side,Premium,Volume,Open Int,IV,Delta,Code,Time
EQT,43.10,Call,45,2025-07-18,30,0.40 x 10,0.50 x 12,0.45,100,ask,100,5,9,52.0%,31.0,SWEEP,10:31:02
EQT,43.10,Put,40,2025-07-18,30,0.80 x 5,0.90 x 8,0.85,200,bid,200,12,9,58.2%,-38.0,BLOCK,10:35:44
EQT,43.10,Call,50,2025-08-15,58,0.10 x 3,0.15 x 9,0.12,300,ask,300,20,9,49.0%,12.0,SWEEP,11:02:10
EQT,43.10,Put,45,2025-07-18,30,3.10 x 2,3.30 x 4,3.20,400,ask,400,9,9,61.0%,-69.0,,11:15:33
EQT,43.10,Call,40,2025-09-19,93,2.10 x 6,2.30 x 7,2.20,500,ask,500,30,9,55.1%,62.0,SWEEP,12:00:00
EQT,43.10,Call,40,2025-09-19,93,2.10 x 6,2.30 x 7,2.20,50,ask,N/A,30,9,55.1%,62.0,SWEEP,12:00:01
";

fn clean(csv: &str, schema: &optlens_core::ColumnSchema) -> optlens_core::CleanedTable {
    let raw = parse_csv(csv.as_bytes(), &schema.name).unwrap();
    TableCleaner::default().clean(&raw, schema)
}

#[test]
fn chain_ratios() {
    let chain = clean(CHAIN_CSV, &chain_schema());
    // The strike 50 put has no volume and is dropped.
    assert_eq!(chain.len(), 4);

    let engine = MetricsEngine::default();
    assert_relative_eq!(engine.put_call_ratio(&chain, Measure::Volume), 1000.0 / 2000.0);
    assert_relative_eq!(engine.put_call_ratio(&chain, Measure::OpenInterest), 4500.0 / 8000.0);

    let moneyness = chain.numbers(columns::MONEYNESS);
    assert_relative_eq!(moneyness[0].unwrap(), 0.085, max_relative = 1e-12);
    assert_relative_eq!(moneyness[2].unwrap(), -0.022, max_relative = 1e-12);
}

#[test]
fn greeks_exposure() {
    let greeks = clean(GREEKS_CSV, &greeks_schema());
    assert_eq!(greeks.len(), 4);

    // "61.0" and "71.3" without '%' are still read as percentages.
    let iv = greeks.numbers(columns::IV);
    assert_relative_eq!(iv[3].unwrap(), 0.61, max_relative = 1e-12);

    let engine = MetricsEngine::default();
    let vega = engine.exposure_by_strike(&greeks, columns::VEGA);
    assert_eq!(vega.iter().map(|p| p.strike).collect::<Vec<_>>(), vec![40.0, 45.0]);

    let direct = 0.052 * 5400.0 * 100.0
        + 0.050 * 3000.0 * 100.0
        + 0.047 * 2600.0 * 100.0
        + 0.046 * 1500.0 * 100.0;
    assert_relative_eq!(total_exposure(&vega), direct, max_relative = 1e-12);
}

#[test]
fn flow_highlights_and_summaries() {
    let flow = clean(FLOW_CSV, &flow_schema());
    // Row with an N/A premium is dropped.
    assert_eq!(flow.len(), 5);
    // Delta arrives as percentage numbers and is rescaled column-wide.
    assert!(flow.report().column(columns::DELTA).unwrap().rescaled);
    assert_relative_eq!(flow.numbers(columns::DELTA)[0].unwrap(), 0.31, max_relative = 1e-12);

    let metrics = MetricsEngine::default().derive(
        &optlens_core::CleanedTable::empty(),
        &optlens_core::CleanedTable::empty(),
        &flow,
    );

    let highlights = &metrics.highlights;
    assert_eq!(highlights.premium_threshold, Some(400.0));
    assert_eq!(highlights.trades.len(), 1);
    let trade = &highlights.trades[0];
    assert_eq!(trade.premium, 500.0);
    assert_eq!(trade.code.as_deref(), Some("SWEEP"));
    assert_eq!(trade.time.as_deref(), Some("12:00:00"));
    assert_eq!(trade.expires.map(|e| e.to_string()), Some("2025-09-19 00:00:00".to_string()));

    let by_code: Vec<(&str, f64)> = metrics
        .premium_by_code
        .iter()
        .map(|g| (g.keys[0].as_str(), g.total))
        .collect();
    assert_eq!(by_code, vec![("SWEEP", 900.0), ("BLOCK", 200.0)]);

    let by_type_side: Vec<(Vec<&str>, f64)> = metrics
        .premium_by_type_side
        .iter()
        .map(|g| (g.keys.iter().map(String::as_str).collect(), g.total))
        .collect();
    assert_eq!(
        by_type_side,
        vec![
            (vec!["Call", "ask"], 900.0),
            (vec!["Put", "bid"], 200.0),
            (vec!["Put", "ask"], 400.0),
        ]
    );

    // Chain-side metrics fall back to identity values.
    assert_eq!(metrics.put_call_volume, 0.0);
    assert!(metrics.vega_exposure.is_empty());
}
