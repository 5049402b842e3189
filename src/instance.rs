//! Module for parsing and representing Euclidean TSP instances.
//!
//! Points are identified by their position in the input sequence. The distance
//! table is indexed the same way, so two cities sharing coordinates remain two
//! distinct cities.

use crate::error::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A city location in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// Precomputed pairwise distances, indexed by point index
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    matrix: Vec<Vec<f64>>,
}

impl DistanceTable {
    /// Compute the full Euclidean distance matrix.
    /// Fails when fewer than two points are supplied since no tour exists.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        if points.len() < 2 {
            return Err(SolverError::TooFewPoints { found: points.len() });
        }

        let n = points.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = distance(&points[i], &points[j]);
                }
            }
        }

        Ok(DistanceTable { matrix })
    }

    /// Get the distance between two points
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.matrix[i][j]
    }

    /// Number of points covered by the table
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Cyclic tour length, including the edge from the last point back to the first
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        let n = tour.len();
        (0..n).map(|i| self.distance(tour[i], tour[(i + 1) % n])).sum()
    }
}

/// A complete TSP instance: the points plus their distance table
#[derive(Debug, Clone)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Cities in input order
    pub points: Vec<Point>,
    /// Precomputed distance matrix
    pub table: DistanceTable,
}

impl TspInstance {
    /// Build an instance from an ordered point sequence
    pub fn from_points(name: &str, points: Vec<Point>) -> Result<Self> {
        let table = DistanceTable::from_points(&points)?;

        let instance = TspInstance {
            name: name.to_string(),
            comment: String::new(),
            points,
            table,
        };

        let duplicates = instance.duplicate_count();
        if duplicates > 0 {
            log::warn!(
                "Instance {} contains {} point(s) sharing coordinates with an earlier point; treating them as distinct cities",
                instance.name, duplicates
            );
        }

        Ok(instance)
    }

    /// Load an instance from disk.
    /// Files ending in `.csv` hold `x,y` rows (an optional header is skipped);
    /// anything else is read as a TSPLIB file with a `NODE_COORD_SECTION`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        let fallback_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if is_csv {
            let points = Self::read_csv_points(File::open(path)?)?;
            Self::from_points(&fallback_name, points)
        } else {
            let mut instance = Self::parse_tsplib(BufReader::new(File::open(path)?))?;
            if instance.name.is_empty() {
                instance.name = fallback_name;
            }
            Ok(instance)
        }
    }

    /// Parse a TSPLIB-style document
    pub fn parse_tsplib<R: BufRead>(reader: R) -> Result<Self> {
        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension: Option<usize> = None;
        let mut points = Vec::new();
        let mut in_coords = false;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            if let Some((key, value)) = line.split_once(':') {
                let value = value.trim();
                match key.trim() {
                    "NAME" => {
                        name = value.to_string();
                        continue;
                    }
                    "COMMENT" => {
                        comment = value.to_string();
                        continue;
                    }
                    "DIMENSION" => {
                        let parsed = value
                            .parse()
                            .map_err(|_| SolverError::parse(line_no, "invalid dimension"))?;
                        dimension = Some(parsed);
                        continue;
                    }
                    "TYPE" | "EDGE_WEIGHT_TYPE" => continue,
                    _ => {}
                }
            }

            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                continue;
            }
            if line.ends_with("_SECTION") {
                in_coords = false;
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(SolverError::parse(line_no, "expected `id x y`"));
                }
                let x: f64 = parts[1]
                    .parse()
                    .map_err(|_| SolverError::parse(line_no, "invalid x coordinate"))?;
                let y: f64 = parts[2]
                    .parse()
                    .map_err(|_| SolverError::parse(line_no, "invalid y coordinate"))?;
                points.push(Point::new(x, y));
            }
        }

        if let Some(expected) = dimension {
            if expected != points.len() {
                log::warn!(
                    "DIMENSION declares {} points but NODE_COORD_SECTION lists {}",
                    expected,
                    points.len()
                );
            }
        }

        let mut instance = Self::from_points(&name, points)?;
        instance.comment = comment;
        Ok(instance)
    }

    /// Read `x,y` rows; a first row that does not parse as numbers is taken as a header
    pub fn read_csv_points<R: std::io::Read>(reader: R) -> Result<Vec<Point>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut points = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line_no = record.position().map(|p| p.line() as usize).unwrap_or(index + 1);

            if record.len() < 2 {
                return Err(SolverError::parse(line_no, "expected at least two columns"));
            }

            let x = record[0].parse::<f64>();
            let y = record[1].parse::<f64>();
            match (x, y) {
                (Ok(x), Ok(y)) => points.push(Point::new(x, y)),
                _ if index == 0 => continue,
                _ => return Err(SolverError::parse(line_no, "invalid coordinate")),
            }
        }

        Ok(points)
    }

    /// Number of cities
    pub fn dimension(&self) -> usize {
        self.points.len()
    }

    /// Get the distance between two cities
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.table.distance(i, j)
    }

    /// Calculate the cyclic tour length
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        self.table.tour_length(tour)
    }

    /// Number of points whose coordinates repeat an earlier point
    pub fn duplicate_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.points
            .iter()
            .filter(|p| !seen.insert((p.x.to_bits(), p.y.to_bits())))
            .count()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut distances: Vec<f64> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                distances.push(self.distance(i, j));
            }
        }

        let avg_distance = distances.iter().sum::<f64>() / distances.len() as f64;
        let min_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            duplicate_points: self.duplicate_count(),
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub duplicate_points: usize,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Points: {}", self.dimension)?;
        writeln!(f, "  Duplicate coordinates: {}", self.duplicate_points)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
