//! Points, sizes and the rotation helpers used for arcs
//!
//! All user-facing coordinates are millimetres. Board items store
//! [`IuPoint`] / [`IuSize`] in internal units.

use crate::error::{PcbError, PcbResult};
use crate::units::{internal_to_mm, try_mm_to_internal, Lengths};
use num_complex::Complex64;
use regex::Regex;

/// Arc angles are handed to board items in tenths of a degree
pub const ARC_ANGLE_SCALE: f64 = 10.0;

/// A coordinate in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert to internal units, failing on non-finite or out-of-range
    /// coordinates
    pub fn to_internal(self) -> PcbResult<IuPoint> {
        Ok(IuPoint {
            x: try_mm_to_internal(self.x)?,
            y: try_mm_to_internal(self.y)?,
        })
    }

    /// Parse `x,y` (whitespace and an optional surrounding parenthesis allowed)
    pub fn parse(input: &str) -> PcbResult<Self> {
        let (x, y) = parse_pair(input)?;
        Ok(Self { x, y })
    }

    fn as_complex(self) -> Complex64 {
        Complex64::new(self.x, self.y)
    }

    fn from_complex(c: Complex64) -> Self {
        Self { x: c.re, y: c.im }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Lengths for Point {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        Point::new(f(self.x), f(self.y))
    }
}

/// A width/height pair in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square size, as used for round pads and round drills
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn to_internal(self) -> PcbResult<IuSize> {
        Ok(IuSize {
            width: try_mm_to_internal(self.width)?,
            height: try_mm_to_internal(self.height)?,
        })
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

impl Lengths for Size {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        Size::new(f(self.width), f(self.height))
    }
}

/// A coordinate in internal units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IuPoint {
    pub x: i64,
    pub y: i64,
}

impl IuPoint {
    pub fn to_mm(self) -> Point {
        Point::new(internal_to_mm(self.x), internal_to_mm(self.y))
    }
}

impl std::ops::Add for IuPoint {
    type Output = IuPoint;

    fn add(self, rhs: IuPoint) -> IuPoint {
        IuPoint {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// A size in internal units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IuSize {
    pub width: i64,
    pub height: i64,
}

impl IuSize {
    pub fn to_mm(self) -> Size {
        Size::new(internal_to_mm(self.width), internal_to_mm(self.height))
    }
}

/// Rotate `point` counter-clockwise around (0, 0) by `angle` degrees
pub fn rotate(point: impl Into<Point>, angle: f64) -> Point {
    let p = point.into().as_complex() * Complex64::cis(angle.to_radians());
    Point::from_complex(p)
}

/// Start point of an arc whose angles use the board convention
/// (0° pointing along -Y from the centre, which is up on the board).
pub fn arc_start(center: impl Into<Point>, radius: f64, start_angle: f64) -> Point {
    let offset = Complex64::from_polar(radius, (start_angle - 90.0).to_radians());
    center.into() + Point::from_complex(offset)
}

/// Included angle of an arc in tenths of a degree
pub fn arc_angle(start_angle: f64, stop_angle: f64) -> f64 {
    (stop_angle - start_angle) * ARC_ANGLE_SCALE
}

/// Point on a circle used as its start: straight along +Y from the centre
/// (down on the board)
pub fn circle_start(center: impl Into<Point>, radius: f64) -> Point {
    let center = center.into();
    Point::new(center.x, center.y + radius)
}

lazy_static::lazy_static! {
    static ref PAIR_REGEX: Regex =
        Regex::new(r"^\s*\(?\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*[,;]\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*\)?\s*$")
            .expect("coordinate pair regex is valid");
}

fn parse_pair(input: &str) -> PcbResult<(f64, f64)> {
    let invalid = || PcbError::InvalidCoordinate {
        input: input.to_string(),
    };
    let caps = PAIR_REGEX.captures(input).ok_or_else(invalid)?;
    let x = caps[1].parse::<f64>().map_err(|_| invalid())?;
    let y = caps[2].parse::<f64>().map_err(|_| invalid())?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS,
            "expected ({}, {}), got {:?}",
            x,
            y,
            p
        );
    }

    #[test]
    fn test_rotate_quarter_and_half_turn() {
        assert_close(rotate((1.0, 0.0), 90.0), 0.0, 1.0);
        assert_close(rotate((1.0, 0.0), 180.0), -1.0, 0.0);
        assert_close(rotate((0.0, 2.0), -90.0), 2.0, 0.0);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        for p in [(0.0, 0.0), (1.5, -2.25), (-1e3, 7.0)] {
            assert_eq!(rotate(p, 0.0), Point::from(p));
        }
    }

    #[test]
    fn test_rotate_inverse() {
        let p = Point::new(3.0, -4.5);
        for a in [12.5, 45.0, 90.0, 271.0, -33.0] {
            let back = rotate(rotate(p, a), -a);
            assert_close(back, p.x, p.y);
        }
    }

    #[test]
    fn test_arc_start_uses_up_convention() {
        assert_close(arc_start((0.0, 0.0), 8.0, -90.0), -8.0, 0.0);
        assert_close(arc_start((0.0, 0.0), 8.0, 90.0), 8.0, 0.0);
        assert_close(arc_start((1.0, 1.0), 2.0, 0.0), 1.0, -1.0);
        assert_eq!(arc_angle(-90.0, 90.0), 1800.0);
    }

    #[test]
    fn test_circle_start() {
        assert_eq!(circle_start((1.0, 2.0), 3.0), Point::new(1.0, 5.0));
    }

    #[test]
    fn test_point_parse() {
        assert_eq!(Point::parse("30,26").unwrap(), Point::new(30.0, 26.0));
        assert_eq!(Point::parse(" (-1.5, .25) ").unwrap(), Point::new(-1.5, 0.25));
        assert!(matches!(
            Point::parse("30"),
            Err(PcbError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_internal_conversion() {
        let p = Point::new(30.0, -0.15).to_internal().unwrap();
        assert_eq!(p, IuPoint { x: 30_000_000, y: -150_000 });
        assert_eq!(p.to_mm(), Point::new(30.0, -0.15));
    }

    #[test]
    fn test_internal_conversion_rejects_non_finite() {
        assert!(matches!(
            Point::new(f64::NAN, 0.0).to_internal(),
            Err(PcbError::InvalidLength { .. })
        ));
        assert!(Point::new(0.0, f64::INFINITY).to_internal().is_err());
        assert!(Size::new(1.0, 1e13).to_internal().is_err());
    }
}
