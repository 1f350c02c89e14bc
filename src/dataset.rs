//! Point dataset — the normalized positions and colors to be plotted.
//!
//! Positions use the normalized `[0,1]×[0,1]` convention (origin top-left,
//! `y` down). Nothing here clamps coordinates: points outside the unit
//! square are kept and simply land outside the rendered frame.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, Rgba8};
use crate::error::{LandscapeError, Result};

/// A single plotted point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color: Rgba,
}

impl Point {
    /// Point with the default (red) marker color.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            color: Rgba::red(),
        }
    }

    pub fn with_color(x: f64, y: f64, color: Rgba) -> Self {
        Self { x, y, color }
    }
}

/// One record of the input dataset format.
///
/// Only `x` and `y` are required; unknown fields (labels, ids, ...) are
/// ignored. `color` is an optional `[r, g, b]` triple in 0–255.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

impl From<&PointRecord> for Point {
    fn from(r: &PointRecord) -> Self {
        match r.color {
            Some([red, green, blue]) => Point::with_color(
                r.x,
                r.y,
                Rgba8::new_opaque(red as u32, green as u32, blue as u32).to_rgba(),
            ),
            None => Point::new(r.x, r.y),
        }
    }
}

// ============================================================================
// PointDataset
// ============================================================================

/// Ordered, fixed-size sequence of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointDataset {
    points: Vec<Point>,
}

impl PointDataset {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build from bare positions; every point gets the default color.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            positions
                .into_iter()
                .map(|(x, y)| Point::new(x, y))
                .collect(),
        )
    }

    pub fn from_records(records: &[PointRecord]) -> Self {
        Self::new(records.iter().map(Point::from).collect())
    }

    /// Parse a JSON array of [`PointRecord`]s.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<PointRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(&records))
    }

    /// Load a JSON dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LandscapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&json)?;
        tracing::info!(points = dataset.len(), path = %path.display(), "loaded dataset");
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Recolor one point.
    pub fn set_color(&mut self, index: usize, color: Rgba) -> Result<()> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(LandscapeError::PointIndex { index, len })?;
        point.color = color;
        Ok(())
    }

    pub fn set_all_colors(&mut self, color: Rgba) {
        for p in &mut self.points {
            p.color = color;
        }
    }
}

impl<'a> IntoIterator for &'a PointDataset {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
