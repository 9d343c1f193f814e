//! Query construction for linked lists.
//!
//! Table and column names are only known at configuration time, so they go
//! through an identifier allowlist and are quoted when rendered. Data values
//! (filter identifiers, lookup labels) are always bound as parameters.

use std::fmt;

use crate::error::{BrowserError, BrowserResult};

/// Validated SQL identifier (table or column name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*`; anything else is rejected.
    pub fn parse(name: &str) -> BrowserResult<Self> {
        let mut chars = name.chars();
        let valid_head = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid_head && valid_tail {
            Ok(Self(name.to_string()))
        } else {
            Err(BrowserError::InvalidIdentifier(name.to_string()))
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn quoted(&self) -> String {
        format!(r#""{}""#, self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Query shape of one linked list: which table, which columns, what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub table: Identifier,
    pub display_field: Identifier,
    pub id_column: Identifier,
    pub sort_keys: Vec<Identifier>,
}

impl ListQuery {
    /// Builds a query definition. Empty `sort_keys` sorts by the display field.
    pub fn new(
        table: &str,
        display_field: &str,
        id_column: &str,
        sort_keys: &[String],
    ) -> BrowserResult<Self> {
        let display_field = Identifier::parse(display_field)?;
        let sort_keys = if sort_keys.is_empty() {
            vec![display_field.clone()]
        } else {
            sort_keys
                .iter()
                .map(|key| Identifier::parse(key))
                .collect::<BrowserResult<Vec<_>>>()?
        };
        Ok(Self {
            table: Identifier::parse(table)?,
            display_field,
            id_column: Identifier::parse(id_column)?,
            sort_keys,
        })
    }

    fn select_prefix(&self) -> String {
        format!(
            "SELECT {}, {} FROM {}",
            self.display_field.quoted(),
            self.id_column.quoted(),
            self.table.quoted()
        )
    }

    // Identifier is the final tie-breaker so equal sort keys keep a stable order.
    fn order_by(&self) -> String {
        let mut keys: Vec<String> = self.sort_keys.iter().map(Identifier::quoted).collect();
        if !self.sort_keys.contains(&self.id_column) {
            keys.push(self.id_column.quoted());
        }
        format!(" ORDER BY {}", keys.join(", "))
    }

    /// Row query for the list, with `?1` bound to the filter value when `link_column` is given.
    pub fn select_sql(&self, link_column: Option<&Identifier>) -> String {
        let mut sql = self.select_prefix();
        if let Some(link_column) = link_column {
            sql.push_str(&format!(" WHERE {} = ?1", link_column.quoted()));
        }
        sql.push_str(&self.order_by());
        sql
    }

    /// Identifier lookup by display value (`?1`), optionally scoped to a
    /// filter partition through `link_column` (`?2`).
    pub fn label_lookup_sql(&self, link_column: Option<&Identifier>) -> String {
        let mut sql = self.select_prefix();
        sql.push_str(&format!(" WHERE {} = ?1", self.display_field.quoted()));
        if let Some(link_column) = link_column {
            sql.push_str(&format!(" AND {} = ?2", link_column.quoted()));
        }
        sql.push_str(&self.order_by());
        sql.push_str(" LIMIT 1");
        sql
    }
}
