// src/summary.rs

use serde::Serialize;
use std::{collections::BTreeMap, fmt};

use crate::parse::ParsedRow;

/// kg CO2 per kWh, used when no better factor is available.
pub const FALLBACK_EMISSION_FACTOR: f64 = 0.42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Up => "Up",
            Trend::Down => "Down",
            Trend::Stable => "Stable",
        })
    }
}

/// Preview figures for a set of accepted rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub rows: usize,
    pub total_kwh: f64,
    pub average_kwh: f64,
    pub min_kwh: Option<f64>,
    pub max_kwh: Option<f64>,
    pub by_company: BTreeMap<String, f64>,
    pub trend: Trend,
    pub estimated_co2_kg: f64,
}

impl UsageSummary {
    pub fn from_rows(rows: &[ParsedRow]) -> Self {
        let mut total = 0.0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut by_company: BTreeMap<String, f64> = BTreeMap::new();

        for row in rows {
            let kwh = row.record.kwh;
            total += kwh;
            min = Some(min.map_or(kwh, |m| m.min(kwh)));
            max = Some(max.map_or(kwh, |m| m.max(kwh)));
            *by_company.entry(row.record.company.clone()).or_default() += kwh;
        }

        let average = if rows.is_empty() {
            0.0
        } else {
            total / rows.len() as f64
        };

        Self {
            rows: rows.len(),
            total_kwh: total,
            average_kwh: average,
            min_kwh: min,
            max_kwh: max,
            by_company,
            trend: trend(rows),
            estimated_co2_kg: total * FALLBACK_EMISSION_FACTOR,
        }
    }
}

/// Compare the mean of the later half of the readings (by date) with the
/// earlier half. More than 10% either way counts as a trend.
fn trend(rows: &[ParsedRow]) -> Trend {
    let mut readings: Vec<(&str, f64)> = rows
        .iter()
        .map(|r| (r.record.date.as_str(), r.record.kwh))
        .collect();
    // YYYY-MM-DD sorts chronologically as text
    readings.sort_by(|a, b| a.0.cmp(b.0));

    let mid = readings.len() / 2;
    let (first, second) = readings.split_at(mid);
    let (first, second) = (mean(first), mean(second));

    if second < first * 0.9 {
        Trend::Down
    } else if second > first * 1.1 {
        Trend::Up
    } else {
        Trend::Stable
    }
}

fn mean(readings: &[(&str, f64)]) -> f64 {
    if readings.is_empty() {
        0.0
    } else {
        readings.iter().map(|(_, kwh)| kwh).sum::<f64>() / readings.len() as f64
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total energy:   {} kWh", round2(self.total_kwh))?;
        writeln!(f, "Est. CO2:       {} kg", round2(self.estimated_co2_kg))?;
        writeln!(f, "Average/row:    {} kWh", round2(self.average_kwh))?;
        if let (Some(min), Some(max)) = (self.min_kwh, self.max_kwh) {
            writeln!(f, "Range:          {} to {} kWh", round2(min), round2(max))?;
        }
        writeln!(f, "Trend:          {}", self.trend)?;
        for (company, kwh) in &self.by_company {
            writeln!(f, "  {company}: {} kWh", round2(*kwh))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_csv;

    fn rows(csv: &str) -> Vec<ParsedRow> {
        parse_csv(csv).unwrap().rows.to_vec()
    }

    #[test]
    fn totals_and_company_breakdown() {
        let rows = rows(
            "date,kwh,company
2024-01-01,10,A
2024-01-02,5,B
2024-01-03,15,A
",
        );
        let s = UsageSummary::from_rows(&rows);
        assert_eq!(s.rows, 3);
        assert_eq!(s.total_kwh, 30.0);
        assert_eq!(s.average_kwh, 10.0);
        assert_eq!(s.min_kwh, Some(5.0));
        assert_eq!(s.max_kwh, Some(15.0));
        assert_eq!(s.by_company["A"], 25.0);
        assert_eq!(s.by_company["B"], 5.0);
        assert!((s.estimated_co2_kg - 12.6).abs() < 1e-9);
    }

    #[test]
    fn trend_follows_dates_not_file_order() {
        // later dates listed first; by date the usage is climbing
        let rows = rows(
            "date,kwh,company
2024-01-04,20,A
2024-01-03,20,A
2024-01-02,5,A
2024-01-01,5,A
",
        );
        assert_eq!(UsageSummary::from_rows(&rows).trend, Trend::Up);
    }

    #[test]
    fn trend_thresholds() {
        let down = rows("date,kwh,company\n2024-01-01,10,A\n2024-01-02,8,A\n");
        assert_eq!(UsageSummary::from_rows(&down).trend, Trend::Down);

        let flat = rows("date,kwh,company\n2024-01-01,10,A\n2024-01-02,10.5,A\n");
        assert_eq!(UsageSummary::from_rows(&flat).trend, Trend::Stable);
    }

    #[test]
    fn empty_and_single_row() {
        let s = UsageSummary::from_rows(&[]);
        assert_eq!(s.total_kwh, 0.0);
        assert_eq!(s.average_kwh, 0.0);
        assert_eq!(s.min_kwh, None);
        assert_eq!(s.trend, Trend::Stable);

        // one reading: no earlier half to compare against
        let one = rows("date,kwh,company\n2024-01-01,10,A\n");
        assert_eq!(UsageSummary::from_rows(&one).trend, Trend::Up);
    }
}
