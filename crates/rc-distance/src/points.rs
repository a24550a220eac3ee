//! Deduplicated point sets read from point tables.
//!
//! A point table exposes three columns, found by tag (or, failing a tag, by
//! name): [`LOCATION_KEY`], [`LATITUDE`] and [`LONGITUDE`].  Ids are compared
//! in standard form, and the set is ordered by that form; the order fixes the
//! rows and columns of the resulting matrix.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use rc_core::table::find_tag;
use rc_core::{GeoPoint, TableSource, Value, standardise};

use crate::{DistanceError, DistanceResult};

pub const LOCATION_KEY: &str = "location-key";
pub const LATITUDE: &str     = "latitude";
pub const LONGITUDE: &str    = "longitude";

/// A point with an identifier, as first spelled in the input.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedPoint {
    pub id:       String,
    pub position: GeoPoint,
}

/// Points keyed by standardised id.
///
/// Equality and hashing cover the standardised ids and positions; the
/// display spelling of an id does not take part.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: BTreeMap<String, LocatedPoint>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and merge every row of every table.
    ///
    /// # Errors
    ///
    /// - [`DistanceError::MissingTag`] if a table lacks one of the columns;
    /// - [`DistanceError::NullValue`] / [`DistanceError::BadValue`] for an
    ///   unreadable cell (row numbers are 1-based);
    /// - [`DistanceError::DuplicatePoint`] if an id appears again with other
    ///   coordinates.
    pub fn from_tables(tables: &[&dyn TableSource]) -> DistanceResult<Self> {
        let mut set = PointSet::new();
        for &table in tables {
            let reader = PointTableReader::new(table)?;
            for row in 0..table.row_count() {
                let position = GeoPoint::new(reader.latitude(row)?, reader.longitude(row)?);
                let id = reader.location_key(row)?;
                set.insert(id, position)?;
            }
        }
        Ok(set)
    }

    /// Add a point.  Re-adding an id at the same position is a no-op.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DuplicatePoint`] if `id` is already present at a
    /// different position.
    pub fn insert(&mut self, id: impl Into<String>, position: GeoPoint) -> DistanceResult<()> {
        let id = id.into();
        let key = standardise(&id);
        match self.points.get(&key) {
            Some(existing) if existing.position != position => Err(DistanceError::DuplicatePoint(id)),
            Some(_) => Ok(()),
            None => {
                self.points.insert(key, LocatedPoint { id, position });
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of `id` (any spelling with the same standard form).
    pub fn get(&self, id: &str) -> Option<GeoPoint> {
        self.points.get(&standardise(id)).map(|p| p.position)
    }

    /// Points in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = &LocatedPoint> + '_ {
        self.points.values()
    }

    /// Ids in matrix order, as first spelled.
    pub fn ids(&self) -> Vec<String> {
        self.iter().map(|p| p.id.clone()).collect()
    }

    /// Positions in matrix order.
    pub fn positions(&self) -> Vec<GeoPoint> {
        self.iter().map(|p| p.position).collect()
    }
}

impl PartialEq for PointSet {
    fn eq(&self, other: &Self) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|((ka, a), (kb, b))| ka == kb && a.position == b.position)
    }
}

impl Eq for PointSet {}

impl Hash for PointSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.points.len());
        for (key, p) in &self.points {
            key.hash(state);
            p.position.hash(state);
        }
    }
}

// ── Table access ──────────────────────────────────────────────────────────────

struct PointTableReader<'a> {
    table: &'a dyn TableSource,
    loc:   usize,
    lat:   usize,
    lon:   usize,
}

impl<'a> PointTableReader<'a> {
    fn new(table: &'a dyn TableSource) -> DistanceResult<Self> {
        let col = |tag: &'static str| {
            find_tag(table, tag).ok_or_else(|| DistanceError::MissingTag {
                table: table.name().to_owned(),
                tag,
            })
        };
        Ok(Self {
            table,
            loc: col(LOCATION_KEY)?,
            lat: col(LATITUDE)?,
            lon: col(LONGITUDE)?,
        })
    }

    fn cell(&self, row: usize, col: usize) -> DistanceResult<Value> {
        let value = self.table.value(row, col);
        if value.is_null() {
            return Err(DistanceError::NullValue {
                table:  self.table.name().to_owned(),
                row:    row + 1,
                column: self.table.column_name(col).to_owned(),
            });
        }
        Ok(value)
    }

    fn bad_value(&self, row: usize, col: usize, expected: &'static str) -> DistanceError {
        DistanceError::BadValue {
            table:  self.table.name().to_owned(),
            row:    row + 1,
            column: self.table.column_name(col).to_owned(),
            expected,
        }
    }

    fn double(&self, row: usize, col: usize) -> DistanceResult<f64> {
        self.cell(row, col)?
            .to_f64()
            .ok_or_else(|| self.bad_value(row, col, "double"))
    }

    fn latitude(&self, row: usize) -> DistanceResult<f64> {
        self.double(row, self.lat)
    }

    fn longitude(&self, row: usize) -> DistanceResult<f64> {
        self.double(row, self.lon)
    }

    fn location_key(&self, row: usize) -> DistanceResult<String> {
        self.cell(row, self.loc)?
            .to_text()
            .map(|s| s.into_owned())
            .ok_or_else(|| self.bad_value(row, self.loc, "text"))
    }
}
