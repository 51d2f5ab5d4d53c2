//!
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Repeating timer pacing the resolver passes of a fog grid, decoupling the
/// full grid scan from the frame rate
#[derive(Component, Clone, Debug, Reflect)]
pub struct VisionTickTimer(Timer);

impl VisionTickTimer {
	/// Create a new instance of [VisionTickTimer] firing every
	/// `interval_seconds`
	pub fn new(interval_seconds: f32) -> Self {
		VisionTickTimer(Timer::from_seconds(interval_seconds, TimerMode::Repeating))
	}
	/// Get the underlying timer
	pub fn get(&self) -> &Timer {
		&self.0
	}
	/// Get a mutable reference to the underlying timer
	pub fn get_mut(&mut self) -> &mut Timer {
		&mut self.0
	}
}

/// Everything a live fog grid is made of. Spawning the bundle is what brings
/// a grid into existence - buffers allocated fully fogged, registry empty,
/// tick timer running - and despawning the entity releases all of it again
#[derive(Bundle)]
pub struct FogOfWarBundle {
	/// Placement and discretisation of the grid in the world
	dimensions: GridDimensions,
	/// Fade speeds, opacity band and resolver pacing
	settings: FogSettings,
	/// The per cell opacity and exploration buffers
	field: FogField,
	/// The active vision sources feeding the grid
	revealers: RevealerRegistry,
	/// Pacing of the resolver
	timer: VisionTickTimer,
}

impl FogOfWarBundle {
	/// Create a new instance of [FogOfWarBundle] from validated dimensions
	/// and settings, every cell starting fully fogged and unexplored
	pub fn new(dimensions: GridDimensions, settings: FogSettings) -> Self {
		let field = FogField::new(&dimensions, &settings);
		let timer = VisionTickTimer::new(settings.get_vision_update_interval());
		FogOfWarBundle {
			dimensions,
			settings,
			field,
			revealers: RevealerRegistry::default(),
			timer,
		}
	}
	/// Create a new instance of [FogOfWarBundle] where the [FogSettings] are
	/// derived from disk
	#[cfg(feature = "ron")]
	pub fn new_from_disk(
		dimensions: GridDimensions,
		path: &str,
	) -> Result<Self, ConfigurationError> {
		let settings = FogSettings::from_ron(path.to_string())?;
		Ok(FogOfWarBundle::new(dimensions, settings))
	}
}
