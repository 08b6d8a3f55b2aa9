//! Line-oriented CSV import for lead lists and video script sheets.
//!
//! The format is deliberately simple: rows split on `\n`, cells split on
//! `,`, everything trimmed. Quoted cells containing commas or newlines are
//! not supported, matching what users have always uploaded.

use crate::db::models::{Lead, PendingScript};
use crate::error::AppError;

pub const LEAD_COLUMNS: [&str; 4] = ["name", "email", "company", "domain"];
pub const SCRIPT_COLUMN: &str = "script";
pub const SCRIPT_NAME_COLUMN: &str = "name";

/// Header row plus data rows, blank lines removed.
struct Sheet<'a> {
    headers: Vec<String>,
    rows: Vec<&'a str>,
}

impl<'a> Sheet<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());
        let header = lines.next()?;
        Some(Self {
            headers: header.split(',').map(|h| h.trim().to_lowercase()).collect(),
            rows: lines.collect(),
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Names from `required` absent in the header, in `required` order.
    fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }
}

fn cells(row: &str) -> Vec<&str> {
    row.split(',').map(str::trim).collect()
}

fn cell(values: &[&str], idx: usize) -> String {
    values.get(idx).copied().unwrap_or_default().to_string()
}

/// Parse an uploaded lead list into new `uploaded` leads owned by `user_id`.
///
/// Fails with [`AppError::MissingColumns`] when any of `name, email,
/// company, domain` is absent from the header; nothing is returned in that
/// case. Rows with an empty email are dropped.
pub fn parse_leads(text: &str, user_id: &str) -> Result<Vec<Lead>, AppError> {
    let Some(sheet) = Sheet::parse(text) else {
        return Ok(Vec::new());
    };

    let missing = sheet.missing(&LEAD_COLUMNS);
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }

    // All four present, checked above.
    let [name_idx, email_idx, company_idx, domain_idx] =
        LEAD_COLUMNS.map(|col| sheet.column(col).unwrap_or_default());

    let leads: Vec<Lead> = sheet
        .rows
        .iter()
        .map(|row| cells(row))
        .filter(|values| !cell(values, email_idx).is_empty())
        .map(|values| {
            Lead::new(
                user_id,
                cell(&values, name_idx),
                cell(&values, email_idx),
                cell(&values, company_idx),
                cell(&values, domain_idx),
            )
        })
        .collect();

    tracing::debug!(rows = sheet.rows.len(), leads = leads.len(), "Parsed lead CSV");
    Ok(leads)
}

/// Parse a script sheet. `script` is required, `name` optional; row `i`
/// without a name becomes `Video {i+1}`. Rows with an empty script are
/// dropped.
pub fn parse_scripts(text: &str) -> Result<Vec<PendingScript>, AppError> {
    let Some(sheet) = Sheet::parse(text) else {
        return Ok(Vec::new());
    };

    let Some(script_idx) = sheet.column(SCRIPT_COLUMN) else {
        return Err(AppError::MissingColumns(vec![SCRIPT_COLUMN.to_string()]));
    };
    let name_idx = sheet.column(SCRIPT_NAME_COLUMN);

    let scripts: Vec<PendingScript> = sheet
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let values = cells(row);
            let script = cell(&values, script_idx);
            if script.is_empty() {
                return None;
            }
            let name = name_idx
                .map(|idx| cell(&values, idx))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Video {}", i + 1));
            Some(PendingScript { name, script })
        })
        .collect();

    tracing::debug!(rows = sheet.rows.len(), scripts = scripts.len(), "Parsed script CSV");
    Ok(scripts)
}
