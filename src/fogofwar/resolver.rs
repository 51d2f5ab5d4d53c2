//! The resolver converts the current set of revealers into per cell target
//! opacities and eases each displayed opacity towards its target. One pass
//! is three stages over the grid:
//!
//! 1. Target reset - every cell falls back to full fog, or to the dimmed
//!    explored opacity when the cell has been seen before and remembering
//!    explored areas is enabled
//! 2. Reveal - every revealer carves a disc into the targets. Only the cells
//!    inside the bounding box of the revealer's range are scanned, so the
//!    cost is `O(revealers * (range / cell size)^2)` rather than
//!    `O(revealers * cells)`. Opacity rises linearly with distance from the
//!    revealer, a cell contested by several revealers keeps the most visible
//!    offer
//! 3. Fade - displayed opacities ease towards their targets by a lerp
//!    factor, using the reveal speed when a cell is getting clearer and the
//!    obscure speed when fog is creeping back. The step never snaps and
//!    never overshoots
//!
//! ```text
//!              target pass        reveal pass         fade pass
//!  ________     ________           ________            ________
//! | 0.2    |   | 1.0    |         | 1.0    |          | 0.28   |  cell out of
//! |________|   |________|         |________|          |________|  vision, fogging
//! | 0.9    |   | 1.0    |         | 0.3    |          | 0.75   |  cell in vision,
//! |________|   |________|         |________|          |________|  clearing
//! ```
//!
//! Each revealer and each cell is handled independently - a malformed
//! revealer is skipped with a log line and the rest of the pass carries on.
//!

use crate::prelude::*;
use bevy::math::FloatExt;
use bevy::prelude::*;

/// Reset every cell's target opacity ahead of the reveal stage. Explored
/// cells fall back to the explored opacity when remembering is enabled,
/// everything else returns to full fog
pub fn reset_targets(field: &mut FogField, settings: &FogSettings) {
	let columns = field.get_resolution().x as usize;
	let rows = field.get_resolution().y as usize;
	let remember = settings.get_remember_explored_areas();
	for row in 0..rows {
		for column in 0..columns {
			let cell = CellIndex::new(column, row);
			let target = if remember && field.is_explored(cell) {
				settings.get_explored_fog_opacity()
			} else {
				settings.get_max_fog_opacity()
			};
			field.set_target(target, cell);
		}
	}
}

/// Carve one revealer's disc of visibility into the target opacities and
/// mark the covered cells explored. A revealer with a malformed position or
/// range is skipped, it cannot abort the pass
pub fn apply_revealer(
	field: &mut FogField,
	dimensions: &GridDimensions,
	settings: &FogSettings,
	position: Vec3,
	range: f32,
) {
	if !position.is_finite() || !range.is_finite() || range <= 0.0 {
		warn!(
			"Skipping revealer with position {:?} and vision range {}",
			position, range
		);
		return;
	}
	// scan only the cells whose bounding box the vision disc can touch, the
	// saturating transform clamps the box to the grid with no wraparound
	let min_cell = dimensions.world_to_grid(position - Vec3::new(range, 0.0, range));
	let max_cell = dimensions.world_to_grid(position + Vec3::new(range, 0.0, range));
	let range_squared = range * range;
	for row in min_cell.get_row()..=max_cell.get_row() {
		for column in min_cell.get_column()..=max_cell.get_column() {
			let cell = CellIndex::new(column, row);
			let distance_squared = dimensions.grid_to_world(cell).distance_squared(position);
			// strictly inside the range, a cell centre exactly on the rim stays fogged
			if distance_squared < range_squared {
				let ratio = distance_squared.sqrt() / range;
				let visible = settings
					.get_min_fog_opacity()
					.lerp(settings.get_max_fog_opacity(), ratio);
				field.lower_target(visible, cell);
				field.mark_explored(cell);
			}
		}
	}
}

/// Ease every cell's displayed opacity towards its target. Revealing and
/// obscuring use their own rates so vision can appear quickly while fog
/// creeps back slowly
pub fn fade_displayed(field: &mut FogField, settings: &FogSettings) {
	let columns = field.get_resolution().x as usize;
	let rows = field.get_resolution().y as usize;
	for row in 0..rows {
		for column in 0..columns {
			let cell = CellIndex::new(column, row);
			let displayed = field.get_displayed(cell);
			let target = field.get_target(cell);
			let rate = if target < displayed {
				settings.get_reveal_speed()
			} else {
				settings.get_obscure_speed()
			};
			field.set_displayed(displayed.lerp(target, rate), cell);
		}
	}
}

/// Run one full resolver pass over a grid: reset targets, carve every active
/// revealer in and fade the displayed opacities. The pass is one atomic unit
/// of work, readers only ever see its completed result
pub fn resolve_tick(
	field: &mut FogField,
	dimensions: &GridDimensions,
	settings: &FogSettings,
	revealers: &[(Vec3, f32)],
) {
	reset_targets(field, settings);
	for (position, range) in revealers.iter() {
		apply_revealer(field, dimensions, settings, *position, *range);
	}
	fade_displayed(field, settings);
}

/// Whether a world position is currently visible. Fails closed: positions
/// outside the covered area are never visible, positions inside are visible
/// when their cell's displayed opacity sits within the tolerance band of the
/// minimum opacity
pub fn is_world_position_visible(
	field: &FogField,
	dimensions: &GridDimensions,
	settings: &FogSettings,
	position: Vec3,
) -> bool {
	if !dimensions.contains_world(position) {
		return false;
	}
	field.is_visible_at(dimensions.world_to_grid(position), settings)
}
