//! In-memory tables and datasets, plus the read-only `TableSource` seam.
//!
//! Point inputs for distance matrices and imported shapefile datasets are
//! both tables.  External datastores plug in by implementing
//! [`TableSource`]; [`Table`] is the in-memory implementation used for CSV
//! input and shapefile imports.
//!
//! # CSV format
//!
//! [`Table::from_csv_reader`] treats the header row as column names and
//! every cell as text (empty cells become [`Value::Null`]):
//!
//! ```csv
//! location-key,latitude,longitude
//! depot,51.5072,-0.1276
//! customer-1,51.4545,-2.5879
//! ```

use std::io::Read;
use std::path::Path;

use crate::strings::{equivalent, standardise};
use crate::{CoreError, CoreResult, Value};

// ── Columns ───────────────────────────────────────────────────────────────────

/// Declared type of a column.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ColumnKind {
    Text,
    Integer,
    Double,
    Geometry,
}

/// Column definition: name, declared kind and free-form tags.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub tags: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self { name: name.into(), kind, tags: Vec::new() }
    }

    /// Builder-style tag attachment.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| equivalent(t, tag))
    }
}

// ── TableSource ───────────────────────────────────────────────────────────────

/// Read-only view of a table, implemented by anything that can supply rows.
pub trait TableSource {
    fn name(&self) -> &str;
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn column_name(&self, col: usize) -> &str;

    /// Tags attached to `col`.  Sources without tagging return nothing.
    fn column_tags(&self, _col: usize) -> &[String] {
        &[]
    }

    /// Cell value; out-of-range coordinates read as [`Value::Null`].
    fn value(&self, row: usize, col: usize) -> Value;
}

/// Resolve the column carrying `tag`.
///
/// A column explicitly tagged with `tag` wins; otherwise the first column
/// whose name is equivalent to `tag` is used.
pub fn find_tag(source: &dyn TableSource, tag: &str) -> Option<usize> {
    let n = source.column_count();
    (0..n)
        .find(|&c| source.column_tags(c).iter().any(|t| equivalent(t, tag)))
        .or_else(|| (0..n).find(|&c| equivalent(source.column_name(c), tag)))
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Row-major in-memory table.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name:    String,
    columns: Vec<Column>,
    rows:    Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self { name: name.into(), columns, rows: Vec::new() }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Attach `tag` to the column at `col`.  Out-of-range indices are ignored.
    pub fn tag_column(&mut self, col: usize, tag: impl Into<String>) {
        if let Some(c) = self.columns.get_mut(col) {
            c.tags.push(tag.into());
        }
    }

    /// Append a row.  The row must have exactly one value per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> CoreResult<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowLength {
                table:    self.name.clone(),
                expected: self.columns.len(),
                got:      row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn value_at(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Index of the first column whose name is equivalent to `name`.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| equivalent(&c.name, name))
    }

    /// Index of the first column of the given kind.
    pub fn find_column_of_kind(&self, kind: ColumnKind) -> Option<usize> {
        self.columns.iter().position(|c| c.kind == kind)
    }

    /// Index of the first column tagged `tag`.
    pub fn find_tagged(&self, tag: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.has_tag(tag))
    }

    /// Rows whose value in `col` matches `search` (see [`Value::matches`]).
    pub fn find(&self, col: usize, search: &str) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.get(col).is_some_and(|v| v.matches(search)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Rough in-memory footprint used for cache accounting.
    pub fn estimated_size_bytes(&self) -> usize {
        let header: usize = self.columns.iter().map(|c| c.name.len() + 32).sum();
        let cells: usize = self
            .rows
            .iter()
            .flat_map(|r| r.iter())
            .map(Value::estimated_size_bytes)
            .sum();
        self.name.len() + header + cells
    }

    // ── CSV loading ───────────────────────────────────────────────────────

    /// Load a table from a CSV file; the table is named after the file stem.
    pub fn from_csv_path(path: &Path) -> CoreResult<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(name, file)
    }

    /// Like [`from_csv_path`](Self::from_csv_path) but accepts any `Read`
    /// source (pass a `std::io::Cursor` in tests).
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> CoreResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let columns: Vec<Column> = csv_reader
            .headers()?
            .iter()
            .map(|h| Column::new(h.trim(), ColumnKind::Text))
            .collect();

        let mut table = Table::new(name, columns);
        for record in csv_reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    if cell.trim().is_empty() { Value::Null } else { Value::Text(cell.to_owned()) }
                })
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }
}

impl TableSource for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, col: usize) -> &str {
        self.columns.get(col).map_or("", |c| c.name.as_str())
    }

    fn column_tags(&self, col: usize) -> &[String] {
        self.columns.get(col).map_or(&[], |c| c.tags.as_slice())
    }

    fn value(&self, row: usize, col: usize) -> Value {
        self.value_at(row, col).cloned().unwrap_or_default()
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// A named collection of tables, e.g. everything imported from one file.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dataset {
    tables: Vec<Table>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// First table whose name is equivalent to `name`.
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        let wanted = standardise(name);
        self.tables.iter().find(|t| standardise(&t.name) == wanted)
    }

    pub fn estimated_size_bytes(&self) -> usize {
        self.tables.iter().map(Table::estimated_size_bytes).sum()
    }
}
