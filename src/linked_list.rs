//! Linked query list: one pane of the browser chain.
//!
//! A list is bound to a table and display column. It is optionally filtered by
//! an identifier handed down from the upstream list, and it knows which stage
//! (if any) it feeds. Chain-level behaviour (clearing and requerying
//! neighbours) lives in [`crate::chain`]; this type only owns its own rows.

use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};

use crate::config::{SelectionResolution, StageConfig};
use crate::error::{BrowserError, BrowserResult};
use crate::protocol::{NotPropagatedReason, RowId, StageId};
use crate::query::{Identifier, ListQuery};

/// One displayed entry and the key it was read with.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub label: String,
    /// Raw display-column value, used for label lookups.
    pub value: Value,
    pub id: RowId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// No rows; initial state and after `clear`.
    Empty,
    /// Rows reflect the last requery, possibly zero of them.
    Populated,
}

pub struct LinkedQueryList {
    title: String,
    empty_hint: String,
    query: ListQuery,
    resolution: SelectionResolution,
    link_column: Option<Identifier>,
    downstream: Option<StageId>,
    current_filter: Option<RowId>,
    rows: Vec<ListRow>,
    state: ListState,
}

impl LinkedQueryList {
    pub fn new(title: impl Into<String>, query: ListQuery) -> Self {
        Self {
            title: title.into(),
            empty_hint: String::new(),
            query,
            resolution: SelectionResolution::default(),
            link_column: None,
            downstream: None,
            current_filter: None,
            rows: Vec::new(),
            state: ListState::Empty,
        }
    }

    /// Builds an unlinked list from its stage config. `link_column` is applied
    /// later by the chain when an upstream links to this list.
    pub fn from_config(config: &StageConfig) -> BrowserResult<Self> {
        let query = ListQuery::new(
            &config.table,
            &config.display_field,
            &config.id_column,
            &config.sort_keys,
        )?;
        let mut list = Self::new(config.title.clone(), query);
        list.empty_hint = config.empty_hint.clone();
        list.resolution = config.selection_resolution;
        Ok(list)
    }

    #[cfg(test)]
    pub fn with_resolution(mut self, resolution: SelectionResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn empty_hint(&self) -> &str {
        &self.empty_hint
    }

    #[cfg(test)]
    pub fn link_column(&self) -> Option<&Identifier> {
        self.link_column.as_ref()
    }

    pub fn downstream(&self) -> Option<StageId> {
        self.downstream
    }

    #[cfg(test)]
    pub fn current_filter(&self) -> Option<RowId> {
        self.current_filter
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.label.clone()).collect()
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub(crate) fn set_link_column(&mut self, column: Identifier) {
        self.link_column = Some(column);
    }

    pub(crate) fn set_downstream(&mut self, stage: StageId) {
        self.downstream = Some(stage);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.state = ListState::Empty;
    }

    /// Re-runs the defining query and replaces all rows.
    ///
    /// The filter only applies when this list has a link column; a root list
    /// shows the whole table regardless of `filter`. On failure the list is left
    /// empty so it never shows rows for a previous filter.
    pub fn requery(&mut self, conn: &Connection, filter: Option<RowId>) -> BrowserResult<()> {
        self.current_filter = filter;
        let fetched = self.fetch_rows(conn, filter);
        self.clear();
        self.rows = fetched?;
        self.state = ListState::Populated;
        debug!(
            "Requeried {} (filter={:?}): {} rows",
            self.query.table,
            filter,
            self.rows.len()
        );
        Ok(())
    }

    fn fetch_rows(&self, conn: &Connection, filter: Option<RowId>) -> BrowserResult<Vec<ListRow>> {
        let bound_filter = filter.zip(self.link_column.as_ref());
        let sql = self.query.select_sql(bound_filter.map(|(_, column)| column));
        debug!("{}", sql);

        let mut stmt = conn.prepare(&sql)?;
        let rows = match bound_filter {
            Some((value, _)) => stmt.query_map([value], read_row)?,
            None => stmt.query_map([], read_row)?,
        };
        rows.collect::<Result<Vec<_>, _>>().map_err(BrowserError::from)
    }

    /// Maps a displayed index to the identifier to hand downstream.
    pub fn resolve_selection(
        &self,
        conn: &Connection,
        index: usize,
    ) -> Result<RowId, NotPropagatedReason> {
        let row = self.rows.get(index).ok_or(NotPropagatedReason::StaleIndex)?;
        match self.resolution {
            SelectionResolution::RowIdentifier => Ok(row.id),
            SelectionResolution::LabelLookup => match self.lookup_by_label(conn, &row.value) {
                Ok(Some(id)) => Ok(id),
                Ok(None) => Err(NotPropagatedReason::NoMatch),
                Err(err) => {
                    warn!(
                        "Label lookup for {:?} in {} failed: {}",
                        row.label, self.query.table, err
                    );
                    Err(NotPropagatedReason::QueryFailed)
                }
            },
        }
    }

    // Scoped to the active filter partition so equal labels under different
    // upstream rows resolve to the right one.
    fn lookup_by_label(&self, conn: &Connection, value: &Value) -> BrowserResult<Option<RowId>> {
        let scope = self.current_filter.zip(self.link_column.as_ref());
        let sql = self.query.label_lookup_sql(scope.map(|(_, column)| column));
        debug!("{}", sql);

        let mut stmt = conn.prepare(&sql)?;
        let id = match scope {
            Some((filter, _)) => stmt
                .query_row(rusqlite::params![value, filter], |row| row.get::<_, RowId>(1))
                .optional()?,
            None => stmt
                .query_row([value], |row| row.get::<_, RowId>(1))
                .optional()?,
        };
        Ok(id)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListRow> {
    let value: Value = row.get(0)?;
    Ok(ListRow {
        label: display_label(&value),
        value,
        id: row.get(1)?,
    })
}

fn display_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Text(text) => text.clone(),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
