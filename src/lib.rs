// SPDX-FileCopyrightText: 2014 Piers Titus van der Torren
// SPDX-License-Identifier: GPL-2.0-or-later

//! pcb_easy - millimetre-based construction of PCB boards and footprints
//!
//! The crate offers unit conversion, layer lookup, a fixed-width layer-set
//! codec and a small board object model (modules, pads, tracks, vias and
//! graphic items) built on top of them.

pub mod board;
pub mod config;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod layerset;
pub mod pad;
pub mod units;

pub use board::{Board, DesignSettings, Graphic, GraphicShape, Module, Track, Via};
pub use error::{PcbError, PcbResult, Result};
pub use geometry::{arc_start, rotate, IuPoint, IuSize, Point, Size};
pub use layers::{layer_index, layer_name, standard_layers, LayerRef, LayerTable};
pub use layerset::{decode, encode, LayerSet};
pub use pad::{Drill, Pad, PadShape, PadSize, PadSpec, PadType};
pub use units::{
    inch_to_mm, internal_to_mm, mm_to_inch, mm_to_internal, try_mm_to_internal, Length,
};
