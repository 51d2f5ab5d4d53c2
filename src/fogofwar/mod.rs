//! Fog-of-war restricts what a player can see of the world to the areas their
//! own units are currently watching.
//!
//! The world is discretised into a fixed resolution grid where each cell
//! carries an opacity. Units act as `Revealers` - each one punches a disc of
//! visibility into the grid around its position. On a fixed interval (not
//! every frame, full grid scans are too expensive for that) a resolver
//! recomputes the opacity every cell is heading towards and then eases the
//! displayed opacity towards it, revealing faster than it obscures so that
//! vision feels responsive while the fog creeps back in slowly.
//!
//! Definitions:
//!
//! * Fog cell - one discretised unit of the grid holding a displayed opacity,
//!   a target opacity and a flag recording whether it has ever been seen
//! * Revealer - an entity contributing visibility to the grid, tracked as a
//!   back-reference plus a cached vision range (the grid never owns the unit)
//! * Explored - a cell that has been visible at least once; when remembering
//!   explored areas is enabled such cells settle at a dimmed opacity rather
//!   than returning to full fog
//!
//! ```text
//!  _______________________________
//! | 1.0 | 1.0 | 1.0 | 1.0 | 1.0 |
//! |_____|_____|_____|_____|_____|
//! | 1.0 | 0.7 | 0.4 | 0.7 | 1.0 |
//! |_____|_____|_____|_____|_____|
//! | 1.0 | 0.4 | 0.0 | 0.4 | 1.0 |      a single revealer stood in the
//! |_____|_____|_____|_____|_____|      middle cell, opacity rising with
//! | 1.0 | 0.7 | 0.4 | 0.7 | 1.0 |      distance towards the fully fogged
//! |_____|_____|_____|_____|_____|      edge of its vision range
//! | 1.0 | 1.0 | 1.0 | 1.0 | 1.0 |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! A fog grid exists from the moment the host spawns a
//! [crate::bundle::FogOfWarBundle] until it despawns it - while no grid
//! entity is alive every registration or administrative event drains with no
//! effect and visibility queries have nothing to read, so callers fall back
//! to "not visible". The grid buffers are only ever written by the resolver
//! systems, which the scheduler runs exclusively, so readers never observe a
//! partially faded frame.
//!

pub mod fog_field;
pub mod grid;
pub mod resolver;
pub mod revealers;
pub mod settings;

use bevy::prelude::*;

/// ID of a cell within the fog grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct CellIndex((usize, usize));

impl CellIndex {
	/// Create a new instance of [CellIndex]
	pub fn new(column: usize, row: usize) -> Self {
		CellIndex((column, row))
	}
	/// Get the cell `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the cell column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the cell row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// Position of the cell within a row-major buffer of `columns` width
	pub fn to_linear(&self, columns: usize) -> usize {
		self.get_row() * columns + self.get_column()
	}
	/// From a position within a row-major buffer of `columns` width compute
	/// the cell it refers to
	pub fn from_linear(index: usize, columns: usize) -> Self {
		CellIndex((index % columns, index / columns))
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn linear_index_row_major() {
		let cell = CellIndex::new(3, 2);
		assert_eq!(23, cell.to_linear(10));
	}
	#[test]
	fn linear_index_round_trip() {
		let cell = CellIndex::new(7, 4);
		let linear = cell.to_linear(12);
		assert_eq!(cell, CellIndex::from_linear(linear, 12));
	}
	#[test]
	fn linear_index_first_and_last() {
		assert_eq!(0, CellIndex::new(0, 0).to_linear(8));
		assert_eq!(63, CellIndex::new(7, 7).to_linear(8));
	}
}
