//! Grid table rendering for the console.
//!
//! Numbers are printed `%g` style with six significant digits, aligned on the
//! decimal point and right-justified. Every column is at least two characters
//! wider than its header.

use crate::domain::model::DoseReport;
use crate::domain::ports::ResultReporter;
use crate::utils::error::Result;
use std::io::Write;

pub const HEADERS: [&str; 5] = [
    "Sample Dose (Gy)",
    "Flow Rate (uL/s)",
    "Equiv. Signal Volume",
    "Total Time (s)",
    "Attenuator",
];

const SIGNIFICANT_DIGITS: usize = 6;
const MIN_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Float(f64),
    Int(i64),
}

impl Cell {
    fn render(self) -> String {
        match self {
            Cell::Float(value) => format_general(value),
            Cell::Int(value) => value.to_string(),
        }
    }
}

/// C `%g` formatting: fixed notation unless the exponent is below -4 or at
/// least the precision, trailing zeros removed.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = SIGNIFICANT_DIGITS - 1;
    let scientific = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Digits after the decimal point (or exponent marker); `None` for integers.
fn after_point(text: &str) -> Option<usize> {
    if text.parse::<i64>().is_ok() {
        return None;
    }
    text.rfind('.')
        .or_else(|| text.to_ascii_lowercase().rfind('e'))
        .map(|pos| text.len() - pos - 1)
}

fn align_decimal(column: Vec<String>) -> Vec<String> {
    let decimals: Vec<Option<usize>> = column.iter().map(|s| after_point(s)).collect();
    let Some(max_decimals) = decimals.iter().flatten().copied().max() else {
        return column;
    };

    column
        .into_iter()
        .zip(decimals)
        .map(|(text, decimals)| {
            // Integers count as one place left of the point, like a bare '.'
            let pad = match decimals {
                Some(d) => max_decimals - d,
                None => max_decimals + 1,
            };
            format!("{}{}", text, " ".repeat(pad))
        })
        .collect()
}

pub fn render_grid(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let columns: Vec<Vec<String>> = (0..headers.len())
        .map(|c| {
            let rendered = rows
                .iter()
                .map(|row| row.get(c).map(|cell| cell.render()).unwrap_or_default())
                .collect();
            align_decimal(rendered)
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .zip(&columns)
        .map(|(header, cells)| {
            cells
                .iter()
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count() + MIN_PADDING))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = |fill: char| -> String {
        let segments: Vec<String> = widths
            .iter()
            .map(|w| fill.to_string().repeat(w + 2))
            .collect();
        format!("+{}+", segments.join("+"))
    };
    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {:>width$} ", cell, width = w))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut lines = vec![rule('-'), line(headers.to_vec()), rule('=')];
    for r in 0..rows.len() {
        lines.push(line(columns.iter().map(|col| col[r].as_str()).collect()));
        lines.push(rule('-'));
    }
    if rows.is_empty() {
        lines.push(rule('-'));
    }
    lines.join("\n")
}

pub fn render_dose_table(report: &DoseReport) -> String {
    let rows: Vec<Vec<Cell>> = report
        .rows
        .iter()
        .map(|row| {
            vec![
                Cell::Float(row.dose.gray()),
                Cell::Float(row.result.flow_rate),
                Cell::Float(row.result.sample_volume),
                Cell::Float(row.result.exposure_time),
                Cell::Int(i64::from(row.result.attenuator_tier.index())),
            ]
        })
        .collect();
    render_grid(&HEADERS, &rows)
}

pub fn summary_lines(report: &DoseReport) -> [String; 4] {
    let summary = &report.summary;
    [
        format!(
            "Equivalent Dose for Desired SNR: {} Gy",
            summary.snr_dose_truncated()
        ),
        format!(
            "Volume Limit Per Injection: {} uL",
            summary.volume_limit_truncated()
        ),
        format!(
            "Total Sample Volume Required: {} uL",
            summary.total_sample_volume_truncated()
        ),
        format!(
            "Total Experiment Time: {} seconds",
            summary.total_time_truncated()
        ),
    ]
}

pub struct TableReporter<W: Write> {
    out: W,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultReporter for TableReporter<W> {
    fn report(&mut self, report: &DoseReport) -> Result<()> {
        writeln!(self.out, "{}", render_dose_table(report))?;
        for line in summary_lines(report) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
