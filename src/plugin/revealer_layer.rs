//! Logic for maintaining the set of active revealers feeding each fog grid.
//!
//! The entity/ownership collaborator sends these events when a locally owned
//! vision-bearing unit becomes active or stops being active - the fog engine
//! never queries ownership itself, it trusts the caller's determination.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Request for a unit to start revealing fog around its position
#[derive(Event)]
pub struct EventRegisterRevealer {
	/// The unit whose position will drive the reveal
	revealer: Entity,
	/// Radius in world units, falling back to the grid's default vision
	/// range when `None`
	vision_range: Option<f32>,
}

impl EventRegisterRevealer {
	/// Create a new instance of [EventRegisterRevealer]
	pub fn new(revealer: Entity, vision_range: Option<f32>) -> Self {
		EventRegisterRevealer {
			revealer,
			vision_range,
		}
	}
	/// Get the unit to register
	pub fn get_revealer(&self) -> Entity {
		self.revealer
	}
	/// Get the requested vision range, if any
	pub fn get_vision_range(&self) -> Option<f32> {
		self.vision_range
	}
}

/// Request for a unit to stop revealing fog, sent when it stops being
/// locally owned or is about to despawn
#[derive(Event)]
pub struct EventUnregisterRevealer {
	/// The unit to remove from the registries
	revealer: Entity,
}

impl EventUnregisterRevealer {
	/// Create a new instance of [EventUnregisterRevealer]
	pub fn new(revealer: Entity) -> Self {
		EventUnregisterRevealer { revealer }
	}
	/// Get the unit to unregister
	pub fn get_revealer(&self) -> Entity {
		self.revealer
	}
}

/// Apply registration and deregistration requests to the registry of every
/// fog grid. Runs before the resolver pass so registry changes always take
/// effect between ticks, never during one
#[cfg(not(tarpaulin_include))]
pub fn process_revealer_events(
	mut register_events: EventReader<EventRegisterRevealer>,
	mut unregister_events: EventReader<EventUnregisterRevealer>,
	mut q_registry: Query<(&mut RevealerRegistry, &FogSettings)>,
) {
	if q_registry.is_empty() {
		// no grid is live, drain the requests with no effect
		let dropped = register_events.read().count() + unregister_events.read().count();
		if dropped > 0 {
			trace!("{} revealer events dropped, no fog grid exists", dropped);
		}
		return;
	}
	for event in register_events.read() {
		for (mut registry, settings) in q_registry.iter_mut() {
			let range = event
				.get_vision_range()
				.unwrap_or_else(|| settings.get_default_vision_range());
			registry.register(event.get_revealer(), range);
		}
	}
	for event in unregister_events.read() {
		for (mut registry, _settings) in q_registry.iter_mut() {
			registry.unregister(event.get_revealer());
		}
	}
}
