//! Board and module object model
//!
//! All construction methods take millimetres and store internal units. Module
//! graphics and pads are kept in module-local coordinates so moving a module
//! moves everything on it.

use crate::error::{Result, ResultExt};
use crate::geometry::{arc_angle, arc_start, circle_start, IuPoint, Point};
use crate::layers::{standard_layers, LayerRef, LayerTable};
use crate::pad::{Named, Pad, PadSpec};
use crate::units::{mm_to_internal, try_mm_to_internal};
use anyhow::bail;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Default layer for tracks
pub const DEFAULT_TRACK_LAYER: &str = "F.Cu";

/// Default layer for graphic items
pub const DEFAULT_GRAPHIC_LAYER: &str = "F.SilkS";

/// Default line width of graphic items in mm
pub const DEFAULT_GRAPHIC_WIDTH: f64 = 0.15;

/// Default via layer pair
pub const DEFAULT_VIA_LAYERS: (&str, &str) = ("B.Cu", "F.Cu");

/// Sizes used when a track or via is created without explicit dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignSettings {
    pub track_width: i64,
    pub via_size: i64,
    pub via_drill: i64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            track_width: mm_to_internal(0.25),
            via_size: mm_to_internal(0.8),
            via_drill: mm_to_internal(0.4),
        }
    }
}

/// Geometry of a graphic item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphicShape {
    Segment { start: IuPoint, end: IuPoint },
    Circle { center: IuPoint, start: IuPoint },
    /// `angle` is the included angle in tenths of a degree
    Arc {
        center: IuPoint,
        start: IuPoint,
        angle: f64,
    },
}

/// A line, circle or arc on a board or module
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub shape: GraphicShape,
    pub layer: usize,
    pub width: i64,
}

/// A copper track segment
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub start: IuPoint,
    pub end: IuPoint,
    pub layer: usize,
    pub width: i64,
}

/// A via connecting two copper layers
#[derive(Debug, Clone, PartialEq)]
pub struct Via {
    pub pos: IuPoint,
    pub layers: (usize, usize),
    pub size: i64,
    pub drill: i64,
}

fn positive_width(width: f64, what: &str) -> Result<i64> {
    if !(width > 0.0) {
        bail!("{} must be positive, got {}", what, width);
    }
    Ok(try_mm_to_internal(width)?)
}

/// Layer index for a board item; indices must exist in the table
fn resolve(table: &LayerTable, layer: impl Into<LayerRef>) -> Result<usize> {
    let layer = layer.into();
    let label = layer.to_string();
    let index = table.layer_index(layer).with_layer_context(&label)?;
    table.layer_name(index).with_layer_context(&label)?;
    Ok(index)
}

/// Graphic construction shared by boards and modules
fn line(table: &LayerTable, start: Point, end: Point, layer: LayerRef, width: f64) -> Result<Graphic> {
    Ok(Graphic {
        shape: GraphicShape::Segment {
            start: start.to_internal()?,
            end: end.to_internal()?,
        },
        layer: resolve(table, layer)?,
        width: positive_width(width, "line width")?,
    })
}

fn circle(table: &LayerTable, center: Point, radius: f64, layer: LayerRef, width: f64) -> Result<Graphic> {
    if !(radius > 0.0) {
        bail!("circle radius must be positive, got {}", radius);
    }
    Ok(Graphic {
        shape: GraphicShape::Circle {
            center: center.to_internal()?,
            start: circle_start(center, radius).to_internal()?,
        },
        layer: resolve(table, layer)?,
        width: positive_width(width, "circle width")?,
    })
}

fn arc(
    table: &LayerTable,
    center: Point,
    radius: f64,
    (start_angle, stop_angle): (f64, f64),
    layer: LayerRef,
    width: f64,
) -> Result<Graphic> {
    if !(radius > 0.0) {
        bail!("arc radius must be positive, got {}", radius);
    }
    Ok(Graphic {
        shape: GraphicShape::Arc {
            center: center.to_internal()?,
            start: arc_start(center, radius, start_angle).to_internal()?,
            angle: arc_angle(start_angle, stop_angle),
        },
        layer: resolve(table, layer)?,
        width: positive_width(width, "arc width")?,
    })
}

/// A footprint placed on a board
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    reference: String,
    position: IuPoint,
    graphics: Vec<Graphic>,
    pads: Vec<Pad>,
    table: Arc<LayerTable>,
}

impl Module {
    fn new(table: Arc<LayerTable>, reference: &str, pos: Point) -> Result<Self> {
        Ok(Self {
            reference: reference.to_string(),
            position: pos.to_internal().with_item_context(&format!("module {}", reference))?,
            graphics: Vec::new(),
            pads: Vec::new(),
            table,
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn set_reference(&mut self, reference: impl ToString) {
        self.reference = reference.to_string();
    }

    /// Footprint identifier used when the module is stored in a library
    pub fn footprint_id(&self) -> &str {
        &self.reference
    }

    pub fn position(&self) -> IuPoint {
        self.position
    }

    /// Move the module to a new position on the board
    pub fn set_position(&mut self, pos: impl Into<Point>) -> Result<()> {
        self.position = pos
            .into()
            .to_internal()
            .with_item_context(&format!("module {}", self.reference))?;
        debug!("Moved module {} to {:?}", self.reference, self.position);
        Ok(())
    }

    /// Board coordinate of a module-local point
    pub fn to_board(&self, local: IuPoint) -> IuPoint {
        self.position + local
    }

    pub fn graphics(&self) -> impl Iterator<Item = &Graphic> {
        self.graphics.iter()
    }

    pub fn pads(&self) -> impl Iterator<Item = &Pad> {
        self.pads.iter()
    }

    pub fn pads_mut(&mut self) -> impl Iterator<Item = &mut Pad> {
        self.pads.iter_mut()
    }

    /// Create a graphic line on the module
    pub fn add_line(
        &mut self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        layer: impl Into<LayerRef>,
        width: f64,
    ) -> Result<&Graphic> {
        let g = line(&self.table, start.into(), end.into(), layer.into(), width)
            .with_item_context("module line")?;
        self.graphics.push(g);
        Ok(&self.graphics[self.graphics.len() - 1])
    }

    /// Create a graphic polyline: one line from each point to the next
    pub fn add_polyline<P>(&mut self, coords: &[P], layer: impl Into<LayerRef>, width: f64) -> Result<()>
    where
        P: Into<Point> + Copy,
    {
        let layer = layer.into();
        for pair in coords.windows(2) {
            self.add_line(pair[0], pair[1], &layer, width)?;
        }
        Ok(())
    }

    /// Create a graphic circle on the module
    pub fn add_circle(
        &mut self,
        center: impl Into<Point>,
        radius: f64,
        layer: impl Into<LayerRef>,
        width: f64,
    ) -> Result<&Graphic> {
        let g = circle(&self.table, center.into(), radius, layer.into(), width)
            .with_item_context("module circle")?;
        self.graphics.push(g);
        Ok(&self.graphics[self.graphics.len() - 1])
    }

    /// Create a graphic arc on the module. Angles in degrees, 0° pointing up.
    pub fn add_arc(
        &mut self,
        center: impl Into<Point>,
        radius: f64,
        start_angle: f64,
        stop_angle: f64,
        layer: impl Into<LayerRef>,
        width: f64,
    ) -> Result<&Graphic> {
        let g = arc(
            &self.table,
            center.into(),
            radius,
            (start_angle, stop_angle),
            layer.into(),
            width,
        )
        .with_item_context("module arc")?;
        self.graphics.push(g);
        Ok(&self.graphics[self.graphics.len() - 1])
    }

    /// Create a pad on the module
    pub fn add_pad(&mut self, spec: &PadSpec) -> Result<&mut Pad> {
        let pad = spec
            .build(&self.table)
            .with_item_context(&format!("pad '{}' to {}", spec.name, self.reference))?;
        debug!(
            "Added {} pad '{}' to {}",
            spec.pad_type.name(),
            spec.name,
            self.reference
        );
        self.pads.push(pad);
        let last = self.pads.len() - 1;
        Ok(&mut self.pads[last])
    }
}

/// An in-memory PCB
#[derive(Debug, Clone)]
pub struct Board {
    file_name: Option<PathBuf>,
    settings: DesignSettings,
    modules: Vec<Module>,
    tracks: Vec<Track>,
    vias: Vec<Via>,
    drawings: Vec<Graphic>,
    table: Arc<LayerTable>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board using the standard layer table
    pub fn new() -> Self {
        Self::with_layer_table(standard_layers().clone())
    }

    /// Empty board using a custom layer table
    pub fn with_layer_table(table: LayerTable) -> Self {
        Self {
            file_name: None,
            settings: DesignSettings::default(),
            modules: Vec::new(),
            tracks: Vec::new(),
            vias: Vec::new(),
            drawings: Vec::new(),
            table: Arc::new(table),
        }
    }

    pub fn layer_table(&self) -> &LayerTable {
        &self.table
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, path: impl Into<PathBuf>) {
        self.file_name = Some(path.into());
    }

    pub fn design_settings(&self) -> &DesignSettings {
        &self.settings
    }

    pub fn design_settings_mut(&mut self) -> &mut DesignSettings {
        &mut self.settings
    }

    /// Modules in insertion order; each call starts a fresh iteration
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn modules_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.iter_mut()
    }

    /// Look a module up by reference
    pub fn module(&self, reference: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.reference == reference)
    }

    pub fn module_mut(&mut self, reference: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.reference == reference)
    }

    /// Every pad on the board together with the module it belongs to
    pub fn pads(&self) -> impl Iterator<Item = (&Module, &Pad)> {
        self.modules
            .iter()
            .flat_map(|m| m.pads.iter().map(move |p| (m, p)))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn vias(&self) -> &[Via] {
        &self.vias
    }

    pub fn drawings(&self) -> &[Graphic] {
        &self.drawings
    }

    /// Create a new module on the board
    pub fn create_module(&mut self, reference: &str, pos: impl Into<Point>) -> Result<&mut Module> {
        let module = Module::new(Arc::clone(&self.table), reference, pos.into())?;
        info!("Created module {}", reference);
        self.modules.push(module);
        let last = self.modules.len() - 1;
        Ok(&mut self.modules[last])
    }

    /// Add a copy of an existing module under a new reference and position
    pub fn copy_module(
        &mut self,
        original: &Module,
        reference: &str,
        pos: impl Into<Point>,
    ) -> Result<&mut Module> {
        let mut module = original.clone();
        module.table = Arc::clone(&self.table);
        module.reference = reference.to_string();
        module.set_position(pos)?;
        info!("Copied module {} as {}", original.reference, reference);
        self.modules.push(module);
        let last = self.modules.len() - 1;
        Ok(&mut self.modules[last])
    }

    /// Create a track segment. `width` of `None` uses the design settings.
    pub fn add_track_segment(
        &mut self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        layer: impl Into<LayerRef>,
        width: Option<f64>,
    ) -> Result<&Track> {
        let width = match width {
            Some(w) => positive_width(w, "track width")?,
            None => self.settings.track_width,
        };
        let track = Track {
            start: start.into().to_internal()?,
            end: end.into().to_internal()?,
            layer: resolve(&self.table, layer).with_item_context("track segment")?,
            width,
        };
        debug!("Added track {:?} -> {:?}", track.start, track.end);
        self.tracks.push(track);
        Ok(&self.tracks[self.tracks.len() - 1])
    }

    /// Create a track polyline: one segment from each point to the next
    pub fn add_track<P>(&mut self, coords: &[P], layer: impl Into<LayerRef>, width: Option<f64>) -> Result<()>
    where
        P: Into<Point> + Copy,
    {
        let layer = layer.into();
        for pair in coords.windows(2) {
            self.add_track_segment(pair[0], pair[1], &layer, width)?;
        }
        Ok(())
    }

    /// Create a via. `size`/`drill` of `None` use the design settings.
    pub fn add_track_via(
        &mut self,
        coord: impl Into<Point>,
        layer_pair: (impl Into<LayerRef>, impl Into<LayerRef>),
        size: Option<f64>,
        drill: Option<f64>,
    ) -> Result<&Via> {
        let size = match size {
            Some(s) => positive_width(s, "via size")?,
            None => self.settings.via_size,
        };
        let drill = match drill {
            Some(d) => positive_width(d, "via drill")?,
            None => self.settings.via_drill,
        };
        if drill >= size {
            bail!("via drill ({} IU) must be smaller than via size ({} IU)", drill, size);
        }
        let layers = (
            resolve(&self.table, layer_pair.0).with_item_context("via")?,
            resolve(&self.table, layer_pair.1).with_item_context("via")?,
        );
        let via = Via {
            pos: coord.into().to_internal()?,
            layers,
            size,
            drill,
        };
        debug!("Added via at {:?}", via.pos);
        self.vias.push(via);
        Ok(&self.vias[self.vias.len() - 1])
    }

    /// Create a graphic line on the board
    pub fn add_line(
        &mut self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        layer: impl Into<LayerRef>,
        width: f64,
    ) -> Result<&Graphic> {
        let g = line(&self.table, start.into(), end.into(), layer.into(), width)
            .with_item_context("board line")?;
        self.drawings.push(g);
        Ok(&self.drawings[self.drawings.len() - 1])
    }

    /// Create a graphic polyline on the board
    pub fn add_polyline<P>(&mut self, coords: &[P], layer: impl Into<LayerRef>, width: f64) -> Result<()>
    where
        P: Into<Point> + Copy,
    {
        let layer = layer.into();
        for pair in coords.windows(2) {
            self.add_line(pair[0], pair[1], &layer, width)?;
        }
        Ok(())
    }

    /// Create a graphic circle on the board
    pub fn add_circle(
        &mut self,
        center: impl Into<Point>,
        radius: f64,
        layer: impl Into<LayerRef>,
        width: f64,
    ) -> Result<&Graphic> {
        let g = circle(&self.table, center.into(), radius, layer.into(), width)
            .with_item_context("board circle")?;
        self.drawings.push(g);
        Ok(&self.drawings[self.drawings.len() - 1])
    }

    /// Create a graphic arc on the board. Angles in degrees, 0° pointing up.
    pub fn add_arc(
        &mut self,
        center: impl Into<Point>,
        radius: f64,
        start_angle: f64,
        stop_angle: f64,
        layer: impl Into<LayerRef>,
        width: f64,
    ) -> Result<&Graphic> {
        let g = arc(
            &self.table,
            center.into(),
            radius,
            (start_angle, stop_angle),
            layer.into(),
            width,
        )
        .with_item_context("board arc")?;
        self.drawings.push(g);
        Ok(&self.drawings[self.drawings.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PcbError;
    use crate::pad::{PadShape, PadType};

    #[test]
    fn test_track_uses_design_width_by_default() {
        let mut board = Board::new();
        let track = board
            .add_track_segment((0.0, 0.0), (1.0, 0.0), DEFAULT_TRACK_LAYER, None)
            .unwrap();
        assert_eq!(track.width, 250_000);
        assert_eq!(track.layer, 0);
    }

    #[test]
    fn test_add_track_makes_segments_between_points() {
        let mut board = Board::new();
        board
            .add_track(&[(30.0, 26.0), (30.0, 50.0), (60.0, 80.0)], "F.Cu", Some(0.25))
            .unwrap();
        assert_eq!(board.tracks().len(), 2);
        assert_eq!(board.tracks()[1].start, board.tracks()[0].end);

        // A single point is not a track.
        board.add_track(&[(0.0, 0.0)], "F.Cu", None).unwrap();
        assert_eq!(board.tracks().len(), 2);
    }

    #[test]
    fn test_unknown_layer_is_reported() {
        let mut board = Board::new();
        let err = board
            .add_line((0.0, 0.0), (1.0, 1.0), "Top.Silk", 0.15)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PcbError>(),
            Some(PcbError::UnknownLayer { .. })
        ));
        assert!(board.drawings().is_empty());
    }

    #[test]
    fn test_via_defaults_and_validation() {
        let mut board = Board::new();
        let via = board
            .add_track_via((60.0, 80.0), DEFAULT_VIA_LAYERS, None, None)
            .unwrap();
        assert_eq!(via.layers, (31, 0));
        assert_eq!(via.size, 800_000);
        assert_eq!(via.drill, 400_000);

        assert!(board
            .add_track_via((0.0, 0.0), ("B.Cu", "F.Cu"), Some(0.3), Some(0.4))
            .is_err());
        assert_eq!(board.vias().len(), 1);
    }

    #[test]
    fn test_module_arc_start() {
        let mut board = Board::new();
        let module = board.create_module("test", (0.0, 0.0)).unwrap();
        let g = module
            .add_arc((0.0, 0.0), 8.0, -90.0, 90.0, DEFAULT_GRAPHIC_LAYER, 0.2)
            .unwrap();
        match g.shape {
            GraphicShape::Arc { start, angle, .. } => {
                assert_eq!(start, IuPoint { x: -8_000_000, y: 0 });
                assert_eq!(angle, 1800.0);
            }
            other => panic!("expected an arc, got {:?}", other),
        }
        assert_eq!(g.layer, 37);
    }

    #[test]
    fn test_circle_start_is_above_center() {
        let mut board = Board::new();
        let g = board.add_circle((5.0, 5.0), 2.0, "F.SilkS", 0.15).unwrap();
        assert_eq!(
            g.shape,
            GraphicShape::Circle {
                center: IuPoint { x: 5_000_000, y: 5_000_000 },
                start: IuPoint { x: 5_000_000, y: 7_000_000 },
            }
        );
        assert!(board.add_circle((0.0, 0.0), 0.0, "F.SilkS", 0.15).is_err());
    }

    #[test]
    fn test_modules_and_pads_iterate_repeatedly() {
        let mut board = Board::new();
        {
            let m = board.create_module("U1", (10.0, 10.0)).unwrap();
            m.add_pad(&PadSpec::new((-1.0, 0.0), 1.0)).unwrap();
            m.add_pad(&PadSpec::new((1.0, 0.0), 1.0)).unwrap();
        }
        let original = board.module("U1").cloned().unwrap();
        board.copy_module(&original, "U2", (20.0, 10.0)).unwrap();

        assert_eq!(board.modules().count(), 2);
        assert_eq!(board.pads().count(), 4);
        // Restartable: a second pass sees the same items.
        let refs: Vec<&str> = board.pads().map(|(m, _)| m.reference()).collect();
        assert_eq!(refs, vec!["U1", "U1", "U2", "U2"]);

        let u2 = board.module("U2").unwrap();
        assert_eq!(u2.position(), IuPoint { x: 20_000_000, y: 10_000_000 });
        let first = u2.pads().next().unwrap();
        assert_eq!(u2.to_board(first.pos()), IuPoint { x: 19_000_000, y: 10_000_000 });
    }

    #[test]
    fn test_pad_errors_carry_context() {
        let mut board = Board::new();
        let m = board.create_module("J1", (0.0, 0.0)).unwrap();
        let err = m
            .add_pad(
                &PadSpec::new((0.0, 0.0), 1.0)
                    .with_type(PadType::Smd)
                    .with_shape(PadShape::Rect),
            )
            .unwrap_err();
        assert!(err.to_string().contains("J1"));
        assert_eq!(m.pads().count(), 0);
    }

    #[test]
    fn test_custom_layer_table() {
        let table = LayerTable::new(["Top", "Bottom", "Outline"]).unwrap();
        let mut board = Board::with_layer_table(table);
        board
            .add_polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], "Outline", 0.1)
            .unwrap();
        assert_eq!(board.drawings().len(), 2);
        assert!(board.drawings().iter().all(|g| g.layer == 2));
        assert!(board.add_line((0.0, 0.0), (1.0, 0.0), "F.SilkS", 0.1).is_err());
        assert!(board.add_line((0.0, 0.0), (1.0, 0.0), 3usize, 0.1).is_err());
    }

    #[test]
    fn test_layer_index_must_exist_on_board_items() {
        let mut board = Board::new();
        let err = board
            .add_track_segment((0.0, 0.0), (1.0, 0.0), 99usize, None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PcbError>(),
            Some(PcbError::LayerIndexOutOfRange { index: 99, count: 50 })
        ));
        assert!(board
            .add_track_via((0.0, 0.0), (31usize, 50usize), None, None)
            .is_err());
        assert!(board.add_circle((0.0, 0.0), 1.0, 64usize, 0.1).is_err());
        assert!(board.tracks().is_empty() && board.vias().is_empty());
        assert!(board.drawings().is_empty());

        let track = board
            .add_track_segment((0.0, 0.0), (1.0, 0.0), 31usize, None)
            .unwrap();
        assert_eq!(track.layer, 31);
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut board = Board::new();
        let err = board
            .add_track_segment((f64::NAN, 0.0), (1.0, 0.0), "F.Cu", None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PcbError>(),
            Some(PcbError::InvalidLength { .. })
        ));
        assert!(board
            .add_track_segment((0.0, 0.0), (1.0, 0.0), "F.Cu", Some(f64::INFINITY))
            .is_err());
        assert!(board
            .add_track_via((1e13, 0.0), DEFAULT_VIA_LAYERS, None, None)
            .is_err());
        assert!(board
            .add_arc((0.0, f64::NEG_INFINITY), 1.0, 0.0, 90.0, "F.SilkS", 0.1)
            .is_err());
        assert!(board.tracks().is_empty() && board.vias().is_empty());
        assert!(board.drawings().is_empty());

        assert!(board.create_module("U1", (f64::NAN, 0.0)).is_err());
        let m = board.create_module("U2", (0.0, 0.0)).unwrap();
        assert!(m.set_position((f64::INFINITY, 0.0)).is_err());
        assert_eq!(m.position(), IuPoint { x: 0, y: 0 });
        assert!(m.add_pad(&PadSpec::new((f64::NAN, 0.0), 1.0)).is_err());
        assert_eq!(board.modules().count(), 1);
    }
}
