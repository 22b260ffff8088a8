//! Layer name ↔ index lookup
//!
//! A [`LayerTable`] is built once from an ordered list of layer names; the
//! position in the list is the layer index. The standard KiCad table is
//! available through [`standard_layers`].

use crate::error::{PcbError, PcbResult};
use std::collections::HashMap;
use tracing::debug;

/// Number of layers in the standard table
pub const STANDARD_LAYER_COUNT: usize = 50;

/// Layers that are not inner copper, in index order starting at `B.Cu` (31)
const NON_INNER_LAYERS: [&str; 19] = [
    "B.Cu",
    "B.Adhes",
    "F.Adhes",
    "B.Paste",
    "F.Paste",
    "B.SilkS",
    "F.SilkS",
    "B.Mask",
    "F.Mask",
    "Dwgs.User",
    "Cmts.User",
    "Eco1.User",
    "Eco2.User",
    "Edge.Cuts",
    "Margin",
    "B.CrtYd",
    "F.CrtYd",
    "B.Fab",
    "F.Fab",
];

lazy_static::lazy_static! {
    static ref STANDARD: LayerTable = {
        let mut names = Vec::with_capacity(STANDARD_LAYER_COUNT);
        names.push("F.Cu".to_string());
        names.extend((1..=30).map(|n| format!("In{}.Cu", n)));
        names.extend(NON_INNER_LAYERS.iter().map(|s| s.to_string()));
        LayerTable::new(names).expect("standard layer names are unique")
    };
}

/// The standard 50-layer table
pub fn standard_layers() -> &'static LayerTable {
    &STANDARD
}

/// A layer given either by name or by index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRef {
    Name(String),
    Index(usize),
}

impl From<&str> for LayerRef {
    fn from(name: &str) -> Self {
        LayerRef::Name(name.to_string())
    }
}

impl From<&String> for LayerRef {
    fn from(name: &String) -> Self {
        LayerRef::Name(name.clone())
    }
}

impl From<String> for LayerRef {
    fn from(name: String) -> Self {
        LayerRef::Name(name)
    }
}

impl From<usize> for LayerRef {
    fn from(index: usize) -> Self {
        LayerRef::Index(index)
    }
}

impl From<&LayerRef> for LayerRef {
    fn from(layer: &LayerRef) -> Self {
        layer.clone()
    }
}

impl std::fmt::Display for LayerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerRef::Name(name) => write!(f, "{}", name),
            LayerRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Bijective mapping between layer names and indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTable {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl LayerTable {
    /// Build a table from ordered layer names. Fails on duplicate names.
    pub fn new<I, S>(names: I) -> PcbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut indices = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if indices.insert(name.clone(), index).is_some() {
                return Err(PcbError::DuplicateLayer { name: name.clone() });
            }
        }
        debug!("Built layer table with {} layers", names.len());
        Ok(Self { names, indices })
    }

    /// Number of layer slots
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a layer to its index. Indices are returned unchanged.
    pub fn layer_index(&self, layer: impl Into<LayerRef>) -> PcbResult<usize> {
        match layer.into() {
            LayerRef::Index(index) => Ok(index),
            LayerRef::Name(name) => self
                .indices
                .get(&name)
                .copied()
                .ok_or(PcbError::UnknownLayer { name }),
        }
    }

    /// Canonical name of the layer at `index`
    pub fn layer_name(&self, index: usize) -> PcbResult<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(PcbError::LayerIndexOutOfRange {
                index,
                count: self.names.len(),
            })
    }

    /// Iterate `(index, name)` in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }

    /// Indices of all copper layers (names ending in `.Cu`)
    pub fn copper_layers(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .filter(|(_, name)| name.ends_with(".Cu"))
            .map(|(index, _)| index)
    }
}

/// Resolve a layer against the standard table
pub fn layer_index(layer: impl Into<LayerRef>) -> PcbResult<usize> {
    standard_layers().layer_index(layer)
}

/// Name of a layer index in the standard table
pub fn layer_name(index: usize) -> PcbResult<&'static str> {
    standard_layers().layer_name(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_positions() {
        let table = standard_layers();
        assert_eq!(table.len(), STANDARD_LAYER_COUNT);
        assert_eq!(table.layer_index("F.Cu"), Ok(0));
        assert_eq!(table.layer_index("In30.Cu"), Ok(30));
        assert_eq!(table.layer_index("B.Cu"), Ok(31));
        assert_eq!(table.layer_index("F.SilkS"), Ok(37));
        assert_eq!(table.layer_index("Edge.Cuts"), Ok(44));
        assert_eq!(table.layer_name(49), Ok("F.Fab"));
    }

    #[test]
    fn test_index_is_returned_unchanged() {
        assert_eq!(layer_index(7usize), Ok(7));
        assert_eq!(layer_index(LayerRef::Index(44)), Ok(44));
    }

    #[test]
    fn test_unknown_name_fails() {
        assert_eq!(
            layer_index("F.Copper"),
            Err(PcbError::UnknownLayer {
                name: "F.Copper".to_string()
            })
        );
    }

    #[test]
    fn test_name_out_of_range_fails() {
        assert_eq!(
            layer_name(50),
            Err(PcbError::LayerIndexOutOfRange {
                index: 50,
                count: 50
            })
        );
    }

    #[test]
    fn test_table_is_bijective() {
        let table = standard_layers();
        for (index, name) in table.iter() {
            assert_eq!(table.layer_index(name), Ok(index));
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = LayerTable::new(["F.Cu", "B.Cu", "F.Cu"]);
        assert_eq!(
            result,
            Err(PcbError::DuplicateLayer {
                name: "F.Cu".to_string()
            })
        );
    }

    #[test]
    fn test_copper_layers() {
        let copper: Vec<usize> = standard_layers().copper_layers().collect();
        assert_eq!(copper.len(), 32);
        assert_eq!(copper.first(), Some(&0));
        assert_eq!(copper.last(), Some(&31));
    }
}
