// src/parse/header.rs

use std::collections::HashMap;

use crate::error::ImportError;

pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "kwh", "company"];

/// Positions of the named columns, resolved once from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub date: usize,
    pub kwh: usize,
    pub company: usize,
    pub notes: Option<usize>,
}

/// Fields of one data line, addressed through a [`ColumnIndex`].
#[derive(Debug, Clone, Copy)]
pub struct RowFields<'a> {
    pub date: &'a str,
    pub kwh: &'a str,
    pub company: &'a str,
    pub notes: Option<&'a str>,
}

impl ColumnIndex {
    /// Names are trimmed and lower-cased; a repeated name keeps its first position.
    pub fn from_header(line: &str) -> Result<Self, ImportError> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, name) in line.split(',').enumerate() {
            positions.entry(name.trim().to_lowercase()).or_insert(idx);
        }

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| !positions.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns { missing });
        }

        Ok(Self {
            date: positions["date"],
            kwh: positions["kwh"],
            company: positions["company"],
            notes: positions.get("notes").copied(),
        })
    }

    /// Pick this index's columns out of a split line. Columns past the end
    /// of a short line come back empty rather than failing.
    pub fn extract<'a>(&self, cols: &[&'a str]) -> RowFields<'a> {
        let at = |idx: usize| cols.get(idx).copied().map(str::trim).unwrap_or("");
        RowFields {
            date: at(self.date),
            kwh: at(self.kwh),
            company: at(self.company),
            notes: self.notes.map(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matching_ignores_case_and_padding() {
        let loose = ColumnIndex::from_header("Date, KWH ,Company").unwrap();
        let strict = ColumnIndex::from_header("date,kwh,company").unwrap();
        assert_eq!(loose, strict);
        assert_eq!(loose.notes, None);
    }

    #[test]
    fn columns_are_order_independent() {
        let idx = ColumnIndex::from_header("notes,company,kwh,date,extra").unwrap();
        assert_eq!(idx.notes, Some(0));
        assert_eq!(idx.company, 1);
        assert_eq!(idx.kwh, 2);
        assert_eq!(idx.date, 3);
    }

    #[test]
    fn first_duplicate_wins() {
        let idx = ColumnIndex::from_header("date,kwh,company,KWh").unwrap();
        assert_eq!(idx.kwh, 1);
    }

    #[test]
    fn missing_required_columns_are_listed() {
        let err = ColumnIndex::from_header("date,usage,notes").unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingColumns {
                missing: vec!["kwh", "company"]
            }
        );
    }

    #[test]
    fn extract_tolerates_short_lines() {
        let idx = ColumnIndex::from_header("date,kwh,company,notes").unwrap();
        let fields = idx.extract(&["2024-01-01", " 4 "]);
        assert_eq!(fields.date, "2024-01-01");
        assert_eq!(fields.kwh, "4");
        assert_eq!(fields.company, "");
        assert_eq!(fields.notes, Some(""));
    }
}
