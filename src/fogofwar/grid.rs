//! The fog grid covers a rectangular area of the world with a fixed
//! resolution of cells. Positions and cells are related by an affine
//! transform: a cell maps to the world position of its centre and a world
//! position maps back to the cell whose covered area it falls in.
//!
//! The grid axes are world `x` (columns) and world `z` (rows) with the grid
//! plane sitting at the height of the origin. The origin is the centre of
//! the covered area, so a `(30, 30)` grid with origin `(0, 0, 0)` spans
//! `-15..15` on both axes.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Placement and discretisation of a fog grid within the world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct GridDimensions {
	/// World position of the centre of the grid, the grid plane sits at its `y`
	origin: Vec3,
	/// World-unit extents of the covered area, `x` along columns and `y` along rows (world `z`)
	size: Vec2,
	/// Number of cells along each axis as `(columns, rows)`
	resolution: UVec2,
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions]. Fails with
	/// [ConfigurationError] when an axis of `resolution` is zero or an extent
	/// of `size` is not a positive finite number
	pub fn new(origin: Vec3, size: Vec2, resolution: UVec2) -> Result<Self, ConfigurationError> {
		if resolution.x == 0 || resolution.y == 0 {
			return Err(ConfigurationError::Resolution(resolution));
		}
		if size.x <= 0.0 || size.y <= 0.0 || !size.is_finite() {
			return Err(ConfigurationError::GridSize(size));
		}
		if !origin.is_finite() {
			return Err(ConfigurationError::Origin(origin));
		}
		Ok(GridDimensions {
			origin,
			size,
			resolution,
		})
	}
	/// Get the world position of the grid centre
	pub fn get_origin(&self) -> Vec3 {
		self.origin
	}
	/// Get the world-unit extents of the covered area
	pub fn get_size(&self) -> Vec2 {
		self.size
	}
	/// Get the cell resolution as `(columns, rows)`
	pub fn get_resolution(&self) -> UVec2 {
		self.resolution
	}
	/// Number of columns in the grid
	pub fn get_columns(&self) -> usize {
		self.resolution.x as usize
	}
	/// Number of rows in the grid
	pub fn get_rows(&self) -> usize {
		self.resolution.y as usize
	}
	/// Total number of cells in the grid
	pub fn get_cell_count(&self) -> usize {
		self.get_columns() * self.get_rows()
	}
	/// World-unit dimensions of a single cell
	pub fn get_cell_size(&self) -> Vec2 {
		self.size / self.resolution.as_vec2()
	}
	/// Get the world position of the **centre** of a cell, on the grid plane
	pub fn grid_to_world(&self, cell: CellIndex) -> Vec3 {
		let x = self.origin.x + (cell.get_column() as f32 + 0.5) / self.resolution.x as f32
			* self.size.x - self.size.x / 2.0;
		let z = self.origin.z + (cell.get_row() as f32 + 0.5) / self.resolution.y as f32
			* self.size.y - self.size.y / 2.0;
		Vec3::new(x, self.origin.y, z)
	}
	/// From a world position find the cell covering it. Positions outside the
	/// grid saturate to the nearest edge cell rather than being an error, so
	/// the result is always a valid index
	pub fn world_to_grid(&self, position: Vec3) -> CellIndex {
		let column = ((position.x - self.origin.x + self.size.x / 2.0) / self.size.x
			* self.resolution.x as f32)
			.floor()
			.clamp(0.0, (self.resolution.x - 1) as f32) as usize;
		let row = ((position.z - self.origin.z + self.size.y / 2.0) / self.size.y
			* self.resolution.y as f32)
			.floor()
			.clamp(0.0, (self.resolution.y - 1) as f32) as usize;
		CellIndex::new(column, row)
	}
	/// Whether a world position lies within the covered area, the grid plane
	/// height is ignored. Positions outside saturate in [Self::world_to_grid]
	/// so visibility queries use this to fail closed instead
	pub fn contains_world(&self, position: Vec3) -> bool {
		position.is_finite()
			&& (position.x - self.origin.x).abs() <= self.size.x / 2.0
			&& (position.z - self.origin.z).abs() <= self.size.y / 2.0
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn zero_resolution_is_rejected() {
		let result = GridDimensions::new(Vec3::ZERO, Vec2::new(10.0, 10.0), UVec2::new(0, 4));
		assert!(result.is_err());
	}
	#[test]
	fn negative_size_is_rejected() {
		let result = GridDimensions::new(Vec3::ZERO, Vec2::new(-1.0, 10.0), UVec2::new(4, 4));
		assert!(result.is_err());
	}
	#[test]
	fn cell_centre_positions() {
		let dimensions =
			GridDimensions::new(Vec3::ZERO, Vec2::new(4.0, 4.0), UVec2::new(4, 4)).unwrap();
		let result = dimensions.grid_to_world(CellIndex::new(0, 0));
		let actual = Vec3::new(-1.5, 0.0, -1.5);
		assert_eq!(actual, result);
		let result = dimensions.grid_to_world(CellIndex::new(3, 3));
		let actual = Vec3::new(1.5, 0.0, 1.5);
		assert_eq!(actual, result);
	}
	#[test]
	fn cell_centre_positions_offset_origin() {
		let dimensions = GridDimensions::new(
			Vec3::new(100.0, 5.0, -40.0),
			Vec2::new(30.0, 30.0),
			UVec2::new(10, 10),
		)
		.unwrap();
		let result = dimensions.grid_to_world(CellIndex::new(0, 0));
		let actual = Vec3::new(86.5, 5.0, -53.5);
		assert_eq!(actual, result);
	}
	#[test]
	fn world_grid_round_trip_every_cell() {
		let dimensions = GridDimensions::new(
			Vec3::new(-3.0, 1.0, 7.5),
			Vec2::new(12.0, 9.0),
			UVec2::new(8, 6),
		)
		.unwrap();
		for row in 0..6 {
			for column in 0..8 {
				let cell = CellIndex::new(column, row);
				let world = dimensions.grid_to_world(cell);
				assert_eq!(cell, dimensions.world_to_grid(world));
			}
		}
	}
	#[test]
	fn out_of_bounds_saturates_to_edge_cells() {
		let dimensions =
			GridDimensions::new(Vec3::ZERO, Vec2::new(10.0, 10.0), UVec2::new(5, 5)).unwrap();
		let result = dimensions.world_to_grid(Vec3::new(-100.0, 0.0, -100.0));
		assert_eq!(CellIndex::new(0, 0), result);
		let result = dimensions.world_to_grid(Vec3::new(100.0, 0.0, 100.0));
		assert_eq!(CellIndex::new(4, 4), result);
		let result = dimensions.world_to_grid(Vec3::new(100.0, 0.0, 0.0));
		assert_eq!(CellIndex::new(4, 2), result);
	}
	#[test]
	fn containment_matches_covered_area() {
		let dimensions =
			GridDimensions::new(Vec3::ZERO, Vec2::new(10.0, 10.0), UVec2::new(5, 5)).unwrap();
		assert!(dimensions.contains_world(Vec3::new(0.0, 3.0, 0.0)));
		assert!(dimensions.contains_world(Vec3::new(5.0, 0.0, -5.0)));
		assert!(!dimensions.contains_world(Vec3::new(5.1, 0.0, 0.0)));
		assert!(!dimensions.contains_world(Vec3::new(0.0, 0.0, -5.1)));
	}
	#[test]
	fn cell_size_from_extents() {
		let dimensions =
			GridDimensions::new(Vec3::ZERO, Vec2::new(30.0, 15.0), UVec2::new(10, 10)).unwrap();
		assert_eq!(Vec2::new(3.0, 1.5), dimensions.get_cell_size());
	}
}
