//! The FogField owns the per cell state of a fog grid: the opacity currently
//! being displayed, the opacity each cell is fading towards and a monotonic
//! flag recording whether a cell has ever been seen this session.
//!
//! Buffers are flat row-major arrays of `resolution.x * resolution.y`
//! entries, the same layout the rendering collaborator consumes when it
//! uploads the displayed opacities as a texture. An example displayed buffer
//! with one revealed pocket may look:
//!
//! ```text
//!  _____________________________________
//! |      |      |      |      |      |
//! | 1.00 | 1.00 | 1.00 | 1.00 | 1.00 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 1.00 | 0.82 | 0.55 | 0.82 | 1.00 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 1.00 | 0.55 | 0.12 | 0.55 | 1.00 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 1.00 | 0.82 | 0.55 | 0.82 | 1.00 |
//! |______|______|______|______|______|
//! |      |      |      |      |      |
//! | 1.00 | 1.00 | 1.00 | 1.00 | 1.00 |
//! |______|______|______|______|______|
//! ```
//!
//! Only the resolver writes the opacity buffers. Explored flags only ever go
//! from unseen to seen, the sole exception being [FogField::reset] which is
//! the immediate whole-grid stomp behind the reveal-all and reset-fog
//! administrative commands.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Per cell opacity and exploration state of a fog grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Reflect)]
pub struct FogField {
	/// Cell resolution as `(columns, rows)`, fixed at allocation
	resolution: UVec2,
	/// Row-major opacity currently shown per cell
	displayed: Vec<f32>,
	/// Row-major opacity each cell is fading towards
	target: Vec<f32>,
	/// Row-major flag per cell, set once the cell has been visible
	explored: Vec<bool>,
	/// Cells whose explored flag flipped since the last drain, lets an
	/// incremental renderer touch only what changed
	newly_explored: Vec<CellIndex>,
}

impl FogField {
	/// Create a new instance of [FogField] sized to `dimensions` with every
	/// cell fully fogged and unexplored
	pub fn new(dimensions: &GridDimensions, settings: &FogSettings) -> Self {
		let cell_count = dimensions.get_cell_count();
		FogField {
			resolution: dimensions.get_resolution(),
			displayed: vec![settings.get_max_fog_opacity(); cell_count],
			target: vec![settings.get_max_fog_opacity(); cell_count],
			explored: vec![false; cell_count],
			newly_explored: Vec::new(),
		}
	}
	/// Get the cell resolution as `(columns, rows)`
	pub fn get_resolution(&self) -> UVec2 {
		self.resolution
	}
	/// Number of cells held by the field
	pub fn get_cell_count(&self) -> usize {
		self.displayed.len()
	}
	/// Position of a cell within the row-major buffers
	fn index(&self, cell: CellIndex) -> usize {
		let columns = self.resolution.x as usize;
		if cell.get_column() >= columns || cell.get_row() >= self.resolution.y as usize {
			panic!("Cannot access FogField state, index out of bounds. Asked for column {}, row {}, field resolution is ({}, {})", cell.get_column(), cell.get_row(), self.resolution.x, self.resolution.y)
		}
		cell.to_linear(columns)
	}
	/// Get the opacity currently displayed for a cell
	pub fn get_displayed(&self, cell: CellIndex) -> f32 {
		self.displayed[self.index(cell)]
	}
	/// Set the opacity currently displayed for a cell
	pub fn set_displayed(&mut self, value: f32, cell: CellIndex) {
		let index = self.index(cell);
		self.displayed[index] = value;
	}
	/// Get the opacity a cell is fading towards
	pub fn get_target(&self, cell: CellIndex) -> f32 {
		self.target[self.index(cell)]
	}
	/// Set the opacity a cell is fading towards
	pub fn set_target(&mut self, value: f32, cell: CellIndex) {
		let index = self.index(cell);
		self.target[index] = value;
	}
	/// Lower the opacity a cell is fading towards, keeping whichever of the
	/// current and offered values is more visible - overlapping revealers can
	/// never make a cell foggier than the strongest of them
	pub fn lower_target(&mut self, value: f32, cell: CellIndex) {
		let index = self.index(cell);
		if value < self.target[index] {
			self.target[index] = value;
		}
	}
	/// Whether a cell has ever been visible this session
	pub fn is_explored(&self, cell: CellIndex) -> bool {
		self.explored[self.index(cell)]
	}
	/// Record that a cell is visible. The flag is monotonic, marking an
	/// already explored cell changes nothing
	pub fn mark_explored(&mut self, cell: CellIndex) {
		let index = self.index(cell);
		if !self.explored[index] {
			self.explored[index] = true;
			self.newly_explored.push(cell);
		}
	}
	/// Stomp every cell to the given opacity and explored flag immediately,
	/// displayed and target alike - nothing fades. Pending newly-explored
	/// entries are discarded, incremental consumers should refresh in full
	pub fn reset(&mut self, opacity: f32, explored: bool) {
		self.displayed.fill(opacity);
		self.target.fill(opacity);
		self.explored.fill(explored);
		self.newly_explored.clear();
	}
	/// The row-major displayed-opacity buffer for the rendering collaborator
	pub fn get_opacity_buffer(&self) -> &[f32] {
		&self.displayed
	}
	/// Whether a cell currently counts as visible, i.e. its displayed opacity
	/// sits within the tolerance band of the given minimum opacity
	pub fn is_visible_at(&self, cell: CellIndex, settings: &FogSettings) -> bool {
		self.get_displayed(cell) <= settings.get_min_fog_opacity() + VISIBILITY_TOLERANCE
	}
	/// Number of cells that have been visible at least once
	pub fn get_explored_count(&self) -> usize {
		self.explored.iter().filter(|seen| **seen).count()
	}
	/// Whether any cells flipped to explored since the last drain
	pub fn has_newly_explored(&self) -> bool {
		!self.newly_explored.is_empty()
	}
	/// Return and clear the cells that flipped to explored since the last
	/// drain
	pub fn take_newly_explored(&mut self) -> Vec<CellIndex> {
		std::mem::take(&mut self.newly_explored)
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	/// Build a 4x4 field over a 4x4 world area centred at the origin
	fn test_field() -> (GridDimensions, FogSettings, FogField) {
		let dimensions =
			GridDimensions::new(Vec3::ZERO, Vec2::new(4.0, 4.0), UVec2::new(4, 4)).unwrap();
		let settings = FogSettings::default();
		let field = FogField::new(&dimensions, &settings);
		(dimensions, settings, field)
	}
	#[test]
	fn new_field_is_fully_fogged() {
		let (_, settings, field) = test_field();
		assert_eq!(16, field.get_cell_count());
		for index in 0..16 {
			let cell = CellIndex::from_linear(index, 4);
			assert_eq!(settings.get_max_fog_opacity(), field.get_displayed(cell));
			assert_eq!(settings.get_max_fog_opacity(), field.get_target(cell));
			assert!(!field.is_explored(cell));
		}
	}
	#[test]
	fn lower_target_keeps_most_visible_value() {
		let (_, _, mut field) = test_field();
		let cell = CellIndex::new(1, 2);
		field.lower_target(0.4, cell);
		assert_eq!(0.4, field.get_target(cell));
		// a foggier offer loses
		field.lower_target(0.9, cell);
		assert_eq!(0.4, field.get_target(cell));
		field.lower_target(0.1, cell);
		assert_eq!(0.1, field.get_target(cell));
	}
	#[test]
	fn explored_flag_is_monotonic_and_drains_once() {
		let (_, _, mut field) = test_field();
		let cell = CellIndex::new(3, 0);
		field.mark_explored(cell);
		field.mark_explored(cell);
		assert!(field.is_explored(cell));
		assert_eq!(1, field.get_explored_count());
		let drained = field.take_newly_explored();
		assert_eq!(vec![cell], drained);
		assert!(!field.has_newly_explored());
		// still explored after the drain
		assert!(field.is_explored(cell));
	}
	#[test]
	fn reset_stomps_displayed_target_and_explored() {
		let (_, settings, mut field) = test_field();
		let cell = CellIndex::new(2, 2);
		field.mark_explored(cell);
		field.set_displayed(0.3, cell);
		field.reset(settings.get_max_fog_opacity(), false);
		assert_eq!(1.0, field.get_displayed(cell));
		assert_eq!(1.0, field.get_target(cell));
		assert!(!field.is_explored(cell));
		assert!(!field.has_newly_explored());
		field.reset(settings.get_min_fog_opacity(), true);
		assert_eq!(0.0, field.get_displayed(cell));
		assert_eq!(16, field.get_explored_count());
	}
	#[test]
	fn opacity_buffer_is_row_major() {
		let (_, _, mut field) = test_field();
		field.set_displayed(0.25, CellIndex::new(3, 2));
		let buffer = field.get_opacity_buffer();
		assert_eq!(16, buffer.len());
		assert_eq!(0.25, buffer[2 * 4 + 3]);
	}
	#[test]
	fn visibility_uses_tolerance_band() {
		let (_, settings, mut field) = test_field();
		let cell = CellIndex::new(0, 0);
		assert!(!field.is_visible_at(cell, &settings));
		field.set_displayed(settings.get_min_fog_opacity() + VISIBILITY_TOLERANCE / 2.0, cell);
		assert!(field.is_visible_at(cell, &settings));
		field.set_displayed(settings.get_min_fog_opacity() + VISIBILITY_TOLERANCE * 2.0, cell);
		assert!(!field.is_visible_at(cell, &settings));
	}
	#[test]
	#[should_panic]
	fn out_of_bounds_access_panics() {
		let (_, _, field) = test_field();
		field.get_displayed(CellIndex::new(4, 0));
	}
}
