//! HTML table layout used in the report email

use html_escape::encode_text;
use std::fmt::Write;

use crate::models::{RunReport, SymbolOutcome};

pub const TITLE: &str = "GATS Monitor Function";

const TRUE_ROW_STYLE: &str = "color:green;background:#ccffcc";

pub fn render(report: &RunReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "<h1>{}</h1>", TITLE)?;
    writeln!(out)?;
    out.push_str("<table border='1'>");
    for outcome in report.outcomes() {
        render_symbol(&mut out, outcome)?;
    }
    out.push_str("</table>");
    Ok(out)
}

fn render_symbol(out: &mut String, outcome: &SymbolOutcome) -> std::fmt::Result {
    let symbol = encode_text(outcome.symbol());
    write!(out, "<tr><td colspan='2'><h2>{}</h2></td></tr>", symbol)?;

    out.push_str("<tr><td colspan='2'><h3>Triggers</h3></td></tr>");
    if outcome.trigger_query_failed() {
        write!(
            out,
            "<tr><td colspan='2'>Error response for {}</td></tr>",
            symbol
        )?;
    } else {
        if let Some(ts) = outcome.last_timestamp() {
            write!(
                out,
                "<tr><td colspan='2'><font size='-1'><b>Last Market Date: {}</b></font></td></tr>",
                ts.to_rfc2822()
            )?;
        }
        for trigger in outcome.trigger_results() {
            let definition = encode_text(&trigger.definition);
            if trigger.value {
                write!(
                    out,
                    "<tr style='{}'><td><b>{}</b></td><td><b>True</b></td></tr>",
                    TRUE_ROW_STYLE, definition
                )?;
            } else {
                write!(out, "<tr><td>{}</td><td>False</td></tr>", definition)?;
            }
        }
    }

    out.push_str("<tr><td colspan='2'><h3>Indicators</h3></td></tr>");
    if outcome.indicator_query_failed() {
        write!(
            out,
            "<tr><td colspan='2'>Indicator error response for {}</td></tr>",
            symbol
        )?;
    } else {
        for indicator in outcome.indicator_results() {
            write!(
                out,
                "<tr><td>{}</td><td>{}</td></tr>",
                encode_text(&indicator.definition),
                encode_text(&indicator.value)
            )?;
        }
    }
    Ok(())
}
