//! Built-in demonstration point sets.

use crate::error::Result;
use crate::instance::{Point, TspInstance};

const PATH20: [(f64, f64); 20] = [
    (60.0, 200.0), (180.0, 200.0), (100.0, 180.0), (140.0, 180.0), (20.0, 160.0),
    (80.0, 160.0), (200.0, 160.0), (140.0, 140.0), (40.0, 120.0), (120.0, 120.0),
    (180.0, 100.0), (60.0, 80.0), (100.0, 80.0), (180.0, 60.0), (20.0, 40.0),
    (100.0, 40.0), (200.0, 40.0), (20.0, 20.0), (60.0, 20.0), (160.0, 20.0),
];

const PATH30: [(f64, f64); 30] = [
    (507.0, 230.0), (181.0, 235.0), (148.0, 183.0), (444.0, 666.0), (2300.0, 162.0),
    (87.0, 165.0), (258.0, 160.0), (840.0, 540.0), (400.0, 120.0), (720.0, 120.0),
    (180.0, 100.0), (600.0, 800.0), (100.0, 80.0), (180.0, 680.0), (200.0, 40.0),
    (100.0, 40.0), (200.0, 400.0), (20.0, 20.0), (608.0, 206.0), (173.0, 70.0),
    (500.0, 20.0), (1.0, 5.0), (177.0, 60.0), (73.0, 3300.0), (152.0, 41.0),
    (261.0, 450.0), (270.0, 240.0), (100.0, 234.0), (10.0, 10.0), (111.0, 222.0),
];

fn build(name: &str, coords: &[(f64, f64)]) -> Result<TspInstance> {
    let points = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
    TspInstance::from_points(name, points)
}

/// Twenty cities on a 20-unit grid
pub fn path20() -> Result<TspInstance> {
    build("path20", &PATH20)
}

/// Thirty scattered cities, including two far outliers
pub fn path30() -> Result<TspInstance> {
    build("path30", &PATH30)
}

/// Look up a built-in set by name
pub fn by_name(name: &str) -> Option<Result<TspInstance>> {
    match name {
        "path20" => Some(path20()),
        "path30" => Some(path30()),
        _ => None,
    }
}
