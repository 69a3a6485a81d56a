//! Typed filter constraints for the read path
//!
//! A filter set compiles to a conjunction of named constraints; each
//! constraint carries its SQL fragment and bind parameter. Absent
//! filters impose no constraint, so the empty filter matches all
//! records.

use chrono::NaiveDate;
use rusqlite::ToSql;

/// Optional filter parameters for record lookup.
///
/// `year` and `since_days` both constrain `last_modified`; when both are
/// given, both constraints apply simultaneously (intersection), even
/// when the result is empty.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CveFilter {
    pub cve_id: Option<String>,
    pub year: Option<String>,
    pub min_score: Option<f64>,
    pub since_days: Option<i64>,
}

/// One named predicate of the filter conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Exact match on the business key
    IdEquals(String),
    /// `last_modified` starts with `"<year>-"`
    ModifiedInYear(String),
    /// `score >= threshold`; records without a score never match
    MinScore(f64),
    /// `last_modified >= cutoff`, compared as ISO date strings
    ModifiedSince(String),
}

impl Constraint {
    /// SQL fragment with a single positional placeholder.
    pub fn sql(&self) -> &'static str {
        match self {
            Constraint::IdEquals(_) => "cve_id = ?",
            Constraint::ModifiedInYear(_) => "last_modified LIKE ?",
            Constraint::MinScore(_) => "score >= ?",
            Constraint::ModifiedSince(_) => "last_modified >= ?",
        }
    }

    /// Bind parameter for the placeholder in [`Constraint::sql`].
    pub fn param(&self) -> Box<dyn ToSql> {
        match self {
            Constraint::IdEquals(id) => Box::new(id.clone()),
            Constraint::ModifiedInYear(year) => Box::new(format!("{year}-%")),
            Constraint::MinScore(threshold) => Box::new(*threshold),
            Constraint::ModifiedSince(cutoff) => Box::new(cutoff.clone()),
        }
    }
}

impl CveFilter {
    /// Compile the filter set into its constraint conjunction.
    ///
    /// `today` anchors the `since_days` cutoff; passing it in keeps the
    /// compilation deterministic for tests.
    pub fn constraints(&self, today: NaiveDate) -> Vec<Constraint> {
        let mut constraints = Vec::new();

        if let Some(cve_id) = &self.cve_id {
            constraints.push(Constraint::IdEquals(cve_id.clone()));
        }
        if let Some(year) = &self.year {
            constraints.push(Constraint::ModifiedInYear(year.clone()));
        }
        if let Some(threshold) = self.min_score {
            constraints.push(Constraint::MinScore(threshold));
        }
        if let Some(days) = self.since_days {
            let cutoff = today - chrono::Duration::days(days);
            constraints.push(Constraint::ModifiedSince(
                cutoff.format("%Y-%m-%d").to_string(),
            ));
        }

        constraints
    }
}
