//! Logic for the periodic visibility pass and the administrative fog
//! commands
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Instantly strip the fog from every cell of every grid and mark the whole
/// map explored, bypassing the fade
#[derive(Event, Default)]
pub struct EventRevealEntireMap;

/// Instantly restore full fog everywhere and forget all exploration,
/// bypassing the fade
#[derive(Event, Default)]
pub struct EventResetFog;

/// Emitted after a resolver pass has rewritten a grid's opacity buffer. The
/// rendering collaborator reads [FogField::get_opacity_buffer] of the named
/// grid in response
#[derive(Event)]
pub struct EventFogBufferUpdated {
	/// The fog grid entity whose buffer changed
	grid: Entity,
}

impl EventFogBufferUpdated {
	/// Create a new instance of [EventFogBufferUpdated]
	pub fn new(grid: Entity) -> Self {
		EventFogBufferUpdated { grid }
	}
	/// Get the fog grid entity whose buffer changed
	pub fn get_grid(&self) -> Entity {
		self.grid
	}
}

/// Apply the reveal-all and reset commands to every fog grid, both take
/// effect immediately rather than fading
#[cfg(not(tarpaulin_include))]
pub fn apply_fog_commands(
	mut reveal_events: EventReader<EventRevealEntireMap>,
	mut reset_events: EventReader<EventResetFog>,
	mut q_fog: Query<(&mut FogField, &FogSettings)>,
) {
	if !reveal_events.is_empty() {
		reveal_events.clear();
		for (mut field, settings) in q_fog.iter_mut() {
			field.reset(settings.get_min_fog_opacity(), true);
		}
		debug!("Entire map revealed");
	}
	if !reset_events.is_empty() {
		reset_events.clear();
		for (mut field, settings) in q_fog.iter_mut() {
			field.reset(settings.get_max_fog_opacity(), false);
		}
		debug!("Fog reset");
	}
}

/// Advance each grid's tick timer and on expiry run one full resolver pass:
/// snapshot the registered revealer positions, skip and purge entries whose
/// unit despawned without deregistering, resolve the grid and announce the
/// rewritten buffer
#[cfg(not(tarpaulin_include))]
pub fn advance_visibility(
	time: Res<Time>,
	mut q_fog: Query<(
		Entity,
		&mut VisionTickTimer,
		&GridDimensions,
		&FogSettings,
		&mut FogField,
		&mut RevealerRegistry,
	)>,
	q_position: Query<&GlobalTransform>,
	mut event_published: EventWriter<EventFogBufferUpdated>,
) {
	for (grid, mut timer, dimensions, settings, mut field, mut registry) in q_fog.iter_mut() {
		if !timer.get_mut().tick(time.delta()).just_finished() {
			continue;
		}
		let mut active = Vec::with_capacity(registry.len());
		let mut stale = Vec::new();
		for revealer in registry.iter() {
			match q_position.get(revealer.get_source()) {
				Ok(transform) => {
					active.push((transform.translation(), revealer.get_vision_range()));
				}
				// owner despawned without unregistering, skip the entry
				Err(_) => stale.push(revealer.get_source()),
			}
		}
		if !stale.is_empty() {
			trace!("Purging {} stale revealers", stale.len());
			registry.purge(&stale);
		}
		resolve_tick(&mut field, dimensions, settings, &active);
		event_published.write(EventFogBufferUpdated::new(grid));
	}
}
