//! Unit tests for report rendering

use chrono::{DateTime, TimeZone, Utc};
use gatsmonitor::models::{IndicatorResult, RunReport, SymbolOutcome, TriggerResult};
use gatsmonitor::report::{self, html};

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap()
}

fn sample_report() -> RunReport {
    let btc = SymbolOutcome::new(
        "BTC:USD:daily",
        Some(at(1_505_721_864)),
        Some(vec![
            TriggerResult {
                definition: "sma(28) crosses sma(14)".to_string(),
                value: true,
            },
            TriggerResult {
                definition: "close(1) < 5".to_string(),
                value: false,
            },
        ]),
        Some(vec![IndicatorResult {
            definition: "price change percentage(28)".to_string(),
            value: "0.67342".to_string(),
        }]),
    );
    let eth = SymbolOutcome::new("ETH:USD:daily", None, None, None);
    RunReport::new(vec![btc, eth], Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap())
}

#[test]
fn renders_title_and_symbols_in_order() {
    let body = html::render(&sample_report()).unwrap();
    assert!(body.starts_with("<h1>GATS Monitor Function</h1>"));
    let btc = body.find("<h2>BTC:USD:daily</h2>").unwrap();
    let eth = body.find("<h2>ETH:USD:daily</h2>").unwrap();
    assert!(btc < eth);
    assert!(body.ends_with("</table>"));
}

#[test]
fn true_triggers_are_highlighted() {
    let body = html::render(&sample_report()).unwrap();
    assert!(body.contains(
        "<tr style='color:green;background:#ccffcc'><td><b>sma(28) crosses sma(14)</b></td><td><b>True</b></td></tr>"
    ));
    assert!(body.contains("<tr><td>close(1) &lt; 5</td><td>False</td></tr>"));
    assert!(body.contains("<tr><td>price change percentage(28)</td><td>0.67342</td></tr>"));
}

#[test]
fn shows_last_market_date() {
    let body = html::render(&sample_report()).unwrap();
    assert!(body.contains("Last Market Date: Mon, 18 Sep 2017 08:04:24 +0000"));
}

#[test]
fn failed_queries_are_marked() {
    let body = html::render(&sample_report()).unwrap();
    assert!(body.contains("<tr><td colspan='2'>Error response for ETH:USD:daily</td></tr>"));
    assert!(body
        .contains("<tr><td colspan='2'>Indicator error response for ETH:USD:daily</td></tr>"));
}

#[test]
fn escapes_markup() {
    let outcome = SymbolOutcome::new(
        "<i>BTC</i>",
        None,
        Some(vec![TriggerResult {
            definition: "<b>close(1)</b> & volume(1) > 0".to_string(),
            value: false,
        }]),
        Some(vec![IndicatorResult {
            definition: "rsi(14)".to_string(),
            value: "<script>".to_string(),
        }]),
    );
    let body = html::render(&RunReport::new(vec![outcome], Utc::now())).unwrap();

    assert!(body.contains("<h2>&lt;i&gt;BTC&lt;/i&gt;</h2>"));
    assert!(body.contains(
        "<tr><td>&lt;b&gt;close(1)&lt;/b&gt; &amp; volume(1) &gt; 0</td><td>False</td></tr>"
    ));
    assert!(body.contains("<tr><td>rsi(14)</td><td>&lt;script&gt;</td></tr>"));
    assert!(!body.contains("<script>"));
}

#[test]
fn email_subject_uses_report_time() {
    let email = report::render_email(&sample_report()).unwrap();
    assert_eq!(email.subject, "Gatsiva Monitoring Report - Sat, 17 Oct 2026 09:30:00");
    assert!(email.html_body.contains("<table border='1'>"));
}
