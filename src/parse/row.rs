// src/parse/row.rs

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::FieldError;

/// `YYYY-MM-DD` by shape only; `2024-02-30` passes. ASCII digits, unlike `\d`.
static DATE_SHAPE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date shape pattern should compile")
});

/// One usage entry as the record-creation endpoint expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub company: String,
    pub date: String,
    pub kwh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UsageRecord {
    /// Validate raw text fields into a record.
    ///
    /// Every field is trimmed first. Checks run in a fixed order (presence,
    /// then `kwh`, then `date`) so each bad input reports exactly one reason.
    pub fn from_raw(
        date: &str,
        kwh: &str,
        company: &str,
        notes: Option<&str>,
    ) -> Result<Self, FieldError> {
        let (date, kwh, company) = (date.trim(), kwh.trim(), company.trim());
        if date.is_empty() || kwh.is_empty() || company.is_empty() {
            return Err(FieldError::Missing);
        }

        let kwh_val = parse_kwh(kwh).ok_or_else(|| FieldError::InvalidKwh(kwh.to_string()))?;

        if !is_date_shaped(date) {
            return Err(FieldError::InvalidDate(date.to_string()));
        }

        Ok(Self {
            company: company.to_string(),
            date: date.to_string(),
            kwh: kwh_val,
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

/// An accepted CSV row: the record plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based row number counted from the header, which is row 1.
    pub line: usize,
    pub record: UsageRecord,
}

pub fn is_date_shaped(s: &str) -> bool {
    DATE_SHAPE.is_match(s)
}

/// Finite decimal values only: `NaN`, `inf` and friends are rejected, as is
/// anything that overflows to infinity (`1e999`). Hex literals such as `0x10`
/// are deliberately not accepted; usage figures are plain decimals.
pub fn parse_kwh(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_shape_is_syntactic_only() {
        assert!(is_date_shaped("2024-01-31"));
        assert!(is_date_shaped("2024-02-30"));
        assert!(is_date_shaped("0000-99-99"));

        assert!(!is_date_shaped("01-01-2024"));
        assert!(!is_date_shaped("2024/01/01"));
        assert!(!is_date_shaped("2024-1-01"));
        assert!(!is_date_shaped("2024-01-01T00:00"));
        // Arabic-Indic digits are digits to Unicode, not to this check
        assert!(!is_date_shaped("٢٠٢٤-01-01"));
    }

    #[test]
    fn kwh_parsing() {
        assert_eq!(parse_kwh("10"), Some(10.0));
        assert_eq!(parse_kwh(" 12.5 "), Some(12.5));
        assert_eq!(parse_kwh("-3"), Some(-3.0));
        assert_eq!(parse_kwh("1e3"), Some(1000.0));

        assert_eq!(parse_kwh("abc"), None);
        assert_eq!(parse_kwh("NaN"), None);
        assert_eq!(parse_kwh("inf"), None);
        assert_eq!(parse_kwh("12kwh"), None);
        assert_eq!(parse_kwh("1e999"), None);
        assert_eq!(parse_kwh("0x10"), None);
    }

    #[test]
    fn from_raw_trims_and_normalizes_notes() {
        let rec = UsageRecord::from_raw(" 2024-03-01 ", " 7.25", " City Power ", Some("  "))
            .unwrap();
        assert_eq!(rec.date, "2024-03-01");
        assert_eq!(rec.kwh, 7.25);
        assert_eq!(rec.company, "City Power");
        assert_eq!(rec.notes, None);

        let rec = UsageRecord::from_raw("2024-03-01", "1", "Grid", Some(" heatwave ")).unwrap();
        assert_eq!(rec.notes.as_deref(), Some("heatwave"));
    }

    #[test]
    fn from_raw_reports_first_failing_check() {
        assert_eq!(
            UsageRecord::from_raw("", "abc", "A", None),
            Err(FieldError::Missing)
        );
        assert_eq!(
            UsageRecord::from_raw("bad", "abc", "A", None),
            Err(FieldError::InvalidKwh("abc".into()))
        );
        assert_eq!(
            UsageRecord::from_raw("01-01-2024", "5", "A", None),
            Err(FieldError::InvalidDate("01-01-2024".into()))
        );
    }

    #[test]
    fn company_is_kept_verbatim() {
        let rec = UsageRecord::from_raw("2024-01-01", "1", "eskom", None).unwrap();
        assert_eq!(rec.company, "eskom");
        let rec = UsageRecord::from_raw("2024-01-01", "1", "ESKOM", None).unwrap();
        assert_eq!(rec.company, "ESKOM");
    }

    #[test]
    fn wire_body_omits_absent_notes() {
        let rec = UsageRecord::from_raw("2024-01-01", "10", "A", None).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "company": "A", "date": "2024-01-01", "kwh": 10.0 })
        );

        let rec = UsageRecord::from_raw("2024-01-01", "10", "A", Some("peak")).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["notes"], "peak");
    }
}
