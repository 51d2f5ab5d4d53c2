//! Defines the Bevy [Plugin] for the fog-of-war grid
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod revealer_layer;
pub mod vision_layer;

/// Execution order of the fog systems within a frame
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Registry and administrative mutations, applied strictly between
	/// resolver passes so a pass never observes a half-updated registry
	Tidy,
	/// The periodic resolver pass itself
	Calculate,
}

/// Wires the fog events and systems into an [App]. The plugin installs no
/// fog grid by itself - the host spawns a [FogOfWarBundle] when it wants one
/// and despawns the entity to tear it down again
pub struct FogOfWarPlugin;

impl Plugin for FogOfWarPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<CellIndex>()
			.register_type::<GridDimensions>()
			.register_type::<FogSettings>()
			.register_type::<FogField>()
			.register_type::<RevealerRegistry>()
			.register_type::<VisionTickTimer>()
			.add_event::<revealer_layer::EventRegisterRevealer>()
			.add_event::<revealer_layer::EventUnregisterRevealer>()
			.add_event::<vision_layer::EventRevealEntireMap>()
			.add_event::<vision_layer::EventResetFog>()
			.add_event::<vision_layer::EventFogBufferUpdated>()
			.configure_sets(Update, (OrderingSet::Tidy, OrderingSet::Calculate).chain())
			.add_systems(
				Update,
				(
					(
						revealer_layer::process_revealer_events,
						vision_layer::apply_fog_commands,
					)
						.in_set(OrderingSet::Tidy),
					vision_layer::advance_visibility.in_set(OrderingSet::Calculate),
				),
			);
	}
}
