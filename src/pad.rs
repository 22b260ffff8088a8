//! Footprint pads: types, shapes, drills and default layer masks

use crate::error::{PcbError, PcbResult};
use crate::geometry::{IuPoint, IuSize, Point, Size};
use crate::layers::{LayerRef, LayerTable};
use crate::layerset::LayerSet;
use std::str::FromStr;

/// Enumerations with a fixed, ordered list of canonical names
pub trait Named: Copy + 'static {
    const ALL: &'static [Self];

    fn name(&self) -> &'static str;

    /// Look a value up by its canonical name
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }
}

/// Electrical/mechanical kind of a pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadType {
    /// Plated through hole
    Standard,
    Smd,
    /// Edge connector contact
    Conn,
    HoleNotPlated,
}

impl Named for PadType {
    const ALL: &'static [Self] = &[
        PadType::Standard,
        PadType::Smd,
        PadType::Conn,
        PadType::HoleNotPlated,
    ];

    fn name(&self) -> &'static str {
        match self {
            PadType::Standard => "standard",
            PadType::Smd => "smd",
            PadType::Conn => "conn",
            PadType::HoleNotPlated => "hole_not_plated",
        }
    }
}

impl PadType {
    /// Whether pads of this type carry a drill hole
    pub fn has_drill(&self) -> bool {
        matches!(self, PadType::Standard | PadType::HoleNotPlated)
    }

    /// Layers used when a pad is created without explicit layers
    pub fn default_layers(&self, table: &LayerTable) -> PcbResult<LayerSet> {
        match self {
            PadType::Standard => {
                let copper = LayerSet::from_layers(table, table.copper_layers())?;
                copper.union(&LayerSet::from_layers(table, ["F.Mask", "B.Mask"])?)
            }
            PadType::Smd => LayerSet::from_layers(table, ["F.Cu", "F.Paste", "F.Mask"]),
            PadType::Conn => LayerSet::from_layers(table, ["F.Cu", "F.Mask"]),
            PadType::HoleNotPlated => {
                LayerSet::from_layers(table, ["F.Cu", "B.Cu", "F.Mask", "B.Mask"])
            }
        }
    }
}

impl FromStr for PadType {
    type Err = PcbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| PcbError::UnknownPadType {
            name: s.to_string(),
        })
    }
}

/// Copper outline of a pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadShape {
    Circle,
    Rect,
    Oval,
    Trapezoid,
}

impl Named for PadShape {
    const ALL: &'static [Self] = &[
        PadShape::Circle,
        PadShape::Rect,
        PadShape::Oval,
        PadShape::Trapezoid,
    ];

    fn name(&self) -> &'static str {
        match self {
            PadShape::Circle => "circle",
            PadShape::Rect => "rect",
            PadShape::Oval => "oval",
            PadShape::Trapezoid => "trapezoid",
        }
    }
}

impl FromStr for PadShape {
    type Err = PcbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| PcbError::UnknownPadShape {
            name: s.to_string(),
        })
    }
}

/// Pad dimensions: a diameter for round pads, width/height otherwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadSize {
    Diameter(f64),
    Size(Size),
}

impl From<f64> for PadSize {
    fn from(diameter: f64) -> Self {
        PadSize::Diameter(diameter)
    }
}

impl From<(f64, f64)> for PadSize {
    fn from(size: (f64, f64)) -> Self {
        PadSize::Size(size.into())
    }
}

/// Drill hole in mm
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drill {
    Round(f64),
    Oblong(Size),
}

impl From<f64> for Drill {
    fn from(diameter: f64) -> Self {
        Drill::Round(diameter)
    }
}

impl From<(f64, f64)> for Drill {
    fn from(size: (f64, f64)) -> Self {
        Drill::Oblong(size.into())
    }
}

/// Drill shape as stored on a pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillShape {
    Circle,
    Oblong,
}

/// Description of a pad to be added to a module
#[derive(Debug, Clone, PartialEq)]
pub struct PadSpec {
    pub pos: Point,
    pub size: PadSize,
    pub name: String,
    pub pad_type: PadType,
    pub shape: PadShape,
    pub drill: Drill,
    /// `None` selects the pad type's default layers
    pub layers: Option<Vec<LayerRef>>,
}

impl PadSpec {
    /// A round plated through-hole pad with a 1 mm drill
    pub fn new(pos: impl Into<Point>, size: impl Into<PadSize>) -> Self {
        Self {
            pos: pos.into(),
            size: size.into(),
            name: String::new(),
            pad_type: PadType::Standard,
            shape: PadShape::Circle,
            drill: Drill::Round(1.0),
            layers: None,
        }
    }

    pub fn with_name(mut self, name: impl ToString) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_type(mut self, pad_type: PadType) -> Self {
        self.pad_type = pad_type;
        self
    }

    pub fn with_shape(mut self, shape: PadShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_drill(mut self, drill: impl Into<Drill>) -> Self {
        self.drill = drill.into();
        self
    }

    pub fn with_layers<I>(mut self, layers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LayerRef>,
    {
        self.layers = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve the spec into a pad in internal units
    pub fn build(&self, table: &LayerTable) -> PcbResult<Pad> {
        let size = match (self.shape, self.size) {
            (PadShape::Circle, PadSize::Diameter(d)) => Size::square(d),
            (PadShape::Circle, PadSize::Size(_)) => {
                return Err(PcbError::InvalidPadSize {
                    reason: "circle pads take a single diameter".to_string(),
                })
            }
            (_, PadSize::Size(size)) => size,
            (shape, PadSize::Diameter(_)) => {
                return Err(PcbError::InvalidPadSize {
                    reason: format!("{} pads take a (width, height) size", shape.name()),
                })
            }
        };
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(PcbError::InvalidPadSize {
                reason: format!("non-positive size {} x {}", size.width, size.height),
            });
        }

        let layers = match &self.layers {
            Some(layers) => LayerSet::from_layers(table, layers)?,
            None => self.pad_type.default_layers(table)?,
        };

        let (drill_shape, drill) = if self.pad_type.has_drill() {
            match self.drill {
                Drill::Round(d) => (DrillShape::Circle, Some(Size::square(d).to_internal()?)),
                Drill::Oblong(s) => (DrillShape::Oblong, Some(s.to_internal()?)),
            }
        } else {
            (DrillShape::Circle, None)
        };

        Ok(Pad {
            name: self.name.clone(),
            pos: self.pos.to_internal()?,
            size: size.to_internal()?,
            pad_type: self.pad_type,
            shape: self.shape,
            drill_shape,
            drill,
            layers,
        })
    }
}

/// A pad on a module, in module-local internal units
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    name: String,
    pos: IuPoint,
    size: IuSize,
    pad_type: PadType,
    shape: PadShape,
    drill_shape: DrillShape,
    drill: Option<IuSize>,
    layers: LayerSet,
}

impl Pad {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl ToString) {
        self.name = name.to_string();
    }

    pub fn pos(&self) -> IuPoint {
        self.pos
    }

    pub fn set_pos(&mut self, pos: impl Into<Point>) -> PcbResult<()> {
        self.pos = pos.into().to_internal()?;
        Ok(())
    }

    pub fn size(&self) -> IuSize {
        self.size
    }

    pub fn pad_type(&self) -> PadType {
        self.pad_type
    }

    pub fn shape(&self) -> PadShape {
        self.shape
    }

    pub fn drill_shape(&self) -> DrillShape {
        self.drill_shape
    }

    /// Drill size, `None` for pads without a hole
    pub fn drill(&self) -> Option<IuSize> {
        self.drill
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// Replace the pad's layers
    pub fn set_layers<I>(&mut self, table: &LayerTable, layers: I) -> PcbResult<()>
    where
        I: IntoIterator,
        I::Item: Into<LayerRef>,
    {
        self.layers = LayerSet::from_layers(table, layers)?;
        Ok(())
    }
}
