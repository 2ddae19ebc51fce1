use serde::{Deserialize, Serialize};

/// A candidate operating point in per-capita kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub co: f64,
    pub ch4: f64,
}

impl Point {
    #[must_use]
    pub fn new(co: f64, ch4: f64) -> Self {
        Self { co, ch4 }
    }
}

impl From<[f64; 2]> for Point {
    fn from([co, ch4]: [f64; 2]) -> Self {
        Self { co, ch4 }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.co, point.ch4]
    }
}
