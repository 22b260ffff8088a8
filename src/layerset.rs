//! Layer sets and their fixed-width hexadecimal form
//!
//! Bit `i` of the set is layer index `i`. The hex form is lowercase,
//! zero-padded to `ceil(N / 4)` digits for a table of `N` layers, most
//! significant digit first. For the standard table that is 13 digits.

use crate::error::{PcbError, PcbResult};
use crate::layers::{standard_layers, LayerRef, LayerTable};

const WORD_BITS: usize = 64;

/// Hex digits needed for a table of `layer_count` layers
pub fn hex_width(layer_count: usize) -> usize {
    layer_count.div_ceil(4)
}

/// A set of layer indices bounded by the size of a layer table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerSet {
    layer_count: usize,
    words: Vec<u64>,
}

impl LayerSet {
    /// Empty set sized for `table`
    pub fn empty(table: &LayerTable) -> Self {
        Self::with_layer_count(table.len())
    }

    fn with_layer_count(layer_count: usize) -> Self {
        Self {
            layer_count,
            words: vec![0; layer_count.div_ceil(WORD_BITS)],
        }
    }

    /// Build a set from layer names and/or indices. Duplicates are harmless.
    pub fn from_layers<I>(table: &LayerTable, layers: I) -> PcbResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<LayerRef>,
    {
        let mut set = Self::empty(table);
        for layer in layers {
            let index = table.layer_index(layer)?;
            set.insert(index)?;
        }
        Ok(set)
    }

    /// Add a layer index. Fails if the index does not fit the table.
    pub fn insert(&mut self, index: usize) -> PcbResult<()> {
        if index >= self.layer_count {
            return Err(PcbError::LayerIndexOutOfRange {
                index,
                count: self.layer_count,
            });
        }
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
        Ok(())
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.layer_count
            && (self.words[index / WORD_BITS] & (1 << (index % WORD_BITS))) != 0
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Set indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.layer_count).filter(move |i| self.contains(*i))
    }

    /// Union of two sets sized for the same table
    pub fn union(&self, other: &LayerSet) -> PcbResult<LayerSet> {
        if self.layer_count != other.layer_count {
            return Err(PcbError::LayerCountMismatch {
                left: self.layer_count,
                right: other.layer_count,
            });
        }
        let mut words = self.words.clone();
        for (w, o) in words.iter_mut().zip(&other.words) {
            *w |= *o;
        }
        Ok(LayerSet {
            layer_count: self.layer_count,
            words,
        })
    }

    fn nibble(&self, digit: usize) -> u8 {
        let bit = digit * 4;
        ((self.words[bit / WORD_BITS] >> (bit % WORD_BITS)) & 0xf) as u8
    }

    /// Fixed-width lowercase hex form
    pub fn to_hex(&self) -> String {
        let width = hex_width(self.layer_count);
        (0..width)
            .rev()
            .map(|digit| {
                char::from_digit(self.nibble(digit) as u32, 16).unwrap_or('0')
            })
            .collect()
    }

    /// Parse the fixed-width hex form produced by [`LayerSet::to_hex`]
    pub fn from_hex(table: &LayerTable, hex: &str) -> PcbResult<Self> {
        let expected = hex_width(table.len());
        let found = hex.chars().count();
        if found != expected {
            return Err(PcbError::HexWidthMismatch { expected, found });
        }

        let mut set = Self::empty(table);
        // Least significant digit is the last character.
        for (digit, c) in hex.chars().rev().enumerate() {
            let value = c
                .to_digit(16)
                .ok_or(PcbError::InvalidHexDigit { digit: c })?;
            for bit in 0..4 {
                if (value & (1 << bit)) != 0 {
                    set.insert(digit * 4 + bit)?;
                }
            }
        }
        Ok(set)
    }

    /// Canonical layer names in ascending index order
    pub fn names<'t>(&self, table: &'t LayerTable) -> PcbResult<Vec<&'t str>> {
        self.iter().map(|index| table.layer_name(index)).collect()
    }
}

/// Encode layers as a fixed-width hex bitmask using `table`
pub fn encode_with<I>(table: &LayerTable, layers: I) -> PcbResult<String>
where
    I: IntoIterator,
    I::Item: Into<LayerRef>,
{
    Ok(LayerSet::from_layers(table, layers)?.to_hex())
}

/// Decode a fixed-width hex bitmask into layer names using `table`
pub fn decode_with(table: &LayerTable, hex: &str) -> PcbResult<Vec<String>> {
    let set = LayerSet::from_hex(table, hex)?;
    Ok(set
        .names(table)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Encode layers against the standard table
pub fn encode<I>(layers: I) -> PcbResult<String>
where
    I: IntoIterator,
    I::Item: Into<LayerRef>,
{
    encode_with(standard_layers(), layers)
}

/// Decode a hex bitmask against the standard table
pub fn decode(hex: &str) -> PcbResult<Vec<String>> {
    decode_with(standard_layers(), hex)
}
