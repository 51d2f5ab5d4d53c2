//! Tunable parameters governing how quickly the fog reveals and obscures,
//! the opacity band it moves within and how often the resolver runs.
//!
//! All parameters are validated up front - a grid is either constructed with
//! a sound configuration or it is never constructed at all, there is no
//! half-initialised state where fading produces garbage.
//!

use std::fmt;

use bevy::prelude::*;

/// Band above the minimum opacity within which a cell still counts as
/// visible, covering the tail of the exponential fade which never quite
/// reaches the target
pub const VISIBILITY_TOLERANCE: f32 = 0.05;

/// Reasons a fog grid refuses to initialise
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
	/// An axis of the cell resolution is zero
	Resolution(UVec2),
	/// An extent of the covered area is not a positive finite number
	GridSize(Vec2),
	/// The grid origin is not finite
	Origin(Vec3),
	/// The opacity band is inverted or escapes `[0, 1]`
	OpacityBand {
		/// Configured minimum opacity
		min: f32,
		/// Configured maximum opacity
		max: f32,
	},
	/// The explored opacity sits outside the opacity band
	ExploredOpacity(f32),
	/// A fade speed sits outside `(0, 1]`, anything else overshoots the target
	FadeSpeed(f32),
	/// The default vision range is not a positive finite number
	VisionRange(f32),
	/// The resolver interval is not a positive finite number
	UpdateInterval(f32),
	/// A settings file could not be read or parsed
	#[cfg(feature = "ron")]
	File(String),
}

impl fmt::Display for ConfigurationError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ConfigurationError::Resolution(resolution) => write!(
				f,
				"Grid resolution ({}, {}) must be at least one cell on each axis",
				resolution.x, resolution.y
			),
			ConfigurationError::GridSize(size) => write!(
				f,
				"Grid size ({}, {}) must be positive and finite on each axis",
				size.x, size.y
			),
			ConfigurationError::Origin(origin) => {
				write!(f, "Grid origin {:?} must be finite", origin)
			}
			ConfigurationError::OpacityBand { min, max } => write!(
				f,
				"Fog opacity band [{}, {}] must satisfy 0 <= min <= max <= 1",
				min, max
			),
			ConfigurationError::ExploredOpacity(opacity) => write!(
				f,
				"Explored fog opacity {} must sit within the min/max opacity band",
				opacity
			),
			ConfigurationError::FadeSpeed(speed) => {
				write!(f, "Fade speed {} must be within (0, 1]", speed)
			}
			ConfigurationError::VisionRange(range) => {
				write!(f, "Default vision range {} must be positive and finite", range)
			}
			ConfigurationError::UpdateInterval(interval) => {
				write!(f, "Vision update interval {} must be positive and finite", interval)
			}
			#[cfg(feature = "ron")]
			ConfigurationError::File(reason) => {
				write!(f, "Failed reading fog settings from disk: {}", reason)
			}
		}
	}
}

impl std::error::Error for ConfigurationError {}

/// Parameters steering the visibility resolver of a fog grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct FogSettings {
	/// Opacity of a fully revealed cell
	min_fog_opacity: f32,
	/// Opacity of a fully fogged cell
	max_fog_opacity: f32,
	/// Opacity an explored cell settles at once out of vision, only used when
	/// `remember_explored_areas` is enabled
	explored_fog_opacity: f32,
	/// Lerp factor applied per tick while a cell's opacity is decreasing
	reveal_speed: f32,
	/// Lerp factor applied per tick while a cell's opacity is increasing,
	/// typically slower than `reveal_speed` so fog creeps back in
	obscure_speed: f32,
	/// Vision range handed to revealers registered without one of their own
	default_vision_range: f32,
	/// Seconds between resolver passes, decoupling full grid scans from the
	/// frame rate
	vision_update_interval: f32,
	/// Whether cells that have been seen once settle at `explored_fog_opacity`
	/// instead of returning to full fog
	remember_explored_areas: bool,
}

impl Default for FogSettings {
	fn default() -> Self {
		FogSettings {
			min_fog_opacity: 0.0,
			max_fog_opacity: 1.0,
			explored_fog_opacity: 0.65,
			reveal_speed: 0.25,
			obscure_speed: 0.1,
			default_vision_range: 10.0,
			vision_update_interval: 0.5,
			remember_explored_areas: true,
		}
	}
}

impl FogSettings {
	/// Create a new instance of [FogSettings], failing with
	/// [ConfigurationError] when any parameter sits outside its documented
	/// range
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		min_fog_opacity: f32,
		max_fog_opacity: f32,
		explored_fog_opacity: f32,
		reveal_speed: f32,
		obscure_speed: f32,
		default_vision_range: f32,
		vision_update_interval: f32,
		remember_explored_areas: bool,
	) -> Result<Self, ConfigurationError> {
		let settings = FogSettings {
			min_fog_opacity,
			max_fog_opacity,
			explored_fog_opacity,
			reveal_speed,
			obscure_speed,
			default_vision_range,
			vision_update_interval,
			remember_explored_areas,
		};
		settings.validate()?;
		Ok(settings)
	}
	/// Check every parameter against its documented range
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		if !(0.0..=1.0).contains(&self.min_fog_opacity)
			|| !(0.0..=1.0).contains(&self.max_fog_opacity)
			|| self.min_fog_opacity > self.max_fog_opacity
		{
			return Err(ConfigurationError::OpacityBand {
				min: self.min_fog_opacity,
				max: self.max_fog_opacity,
			});
		}
		if !(self.min_fog_opacity..=self.max_fog_opacity).contains(&self.explored_fog_opacity) {
			return Err(ConfigurationError::ExploredOpacity(self.explored_fog_opacity));
		}
		for speed in [self.reveal_speed, self.obscure_speed] {
			if !speed.is_finite() || speed <= 0.0 || speed > 1.0 {
				return Err(ConfigurationError::FadeSpeed(speed));
			}
		}
		if !self.default_vision_range.is_finite() || self.default_vision_range <= 0.0 {
			return Err(ConfigurationError::VisionRange(self.default_vision_range));
		}
		if !self.vision_update_interval.is_finite() || self.vision_update_interval <= 0.0 {
			return Err(ConfigurationError::UpdateInterval(self.vision_update_interval));
		}
		Ok(())
	}
	/// Get the opacity of a fully revealed cell
	pub fn get_min_fog_opacity(&self) -> f32 {
		self.min_fog_opacity
	}
	/// Get the opacity of a fully fogged cell
	pub fn get_max_fog_opacity(&self) -> f32 {
		self.max_fog_opacity
	}
	/// Get the opacity an explored cell settles at once out of vision
	pub fn get_explored_fog_opacity(&self) -> f32 {
		self.explored_fog_opacity
	}
	/// Get the lerp factor used while revealing
	pub fn get_reveal_speed(&self) -> f32 {
		self.reveal_speed
	}
	/// Get the lerp factor used while obscuring
	pub fn get_obscure_speed(&self) -> f32 {
		self.obscure_speed
	}
	/// Get the vision range for revealers registered without one
	pub fn get_default_vision_range(&self) -> f32 {
		self.default_vision_range
	}
	/// Get the seconds between resolver passes
	pub fn get_vision_update_interval(&self) -> f32 {
		self.vision_update_interval
	}
	/// Whether explored cells settle at the explored opacity instead of full fog
	pub fn get_remember_explored_areas(&self) -> bool {
		self.remember_explored_areas
	}
	/// From a `ron` file generate the [FogSettings], validated the same way as
	/// [FogSettings::new]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Result<Self, ConfigurationError> {
		let file = std::fs::File::open(&path)
			.map_err(|e| ConfigurationError::File(format!("{}: {}", path, e)))?;
		let settings: FogSettings = ron::de::from_reader(file)
			.map_err(|e| ConfigurationError::File(format!("{}: {}", path, e)))?;
		settings.validate()?;
		Ok(settings)
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn default_settings_are_valid() {
		assert!(FogSettings::default().validate().is_ok());
	}
	#[test]
	fn inverted_opacity_band_is_rejected() {
		let result = FogSettings::new(0.8, 0.2, 0.5, 0.25, 0.1, 10.0, 0.5, true);
		assert_eq!(
			Err(ConfigurationError::OpacityBand { min: 0.8, max: 0.2 }),
			result
		);
	}
	#[test]
	fn opacity_band_outside_unit_range_is_rejected() {
		let result = FogSettings::new(0.0, 1.5, 0.5, 0.25, 0.1, 10.0, 0.5, true);
		assert!(result.is_err());
	}
	#[test]
	fn explored_opacity_outside_band_is_rejected() {
		let result = FogSettings::new(0.2, 0.8, 0.9, 0.25, 0.1, 10.0, 0.5, true);
		assert_eq!(Err(ConfigurationError::ExploredOpacity(0.9)), result);
	}
	#[test]
	fn zero_fade_speed_is_rejected() {
		let result = FogSettings::new(0.0, 1.0, 0.5, 0.0, 0.1, 10.0, 0.5, true);
		assert_eq!(Err(ConfigurationError::FadeSpeed(0.0)), result);
	}
	#[test]
	fn overshooting_fade_speed_is_rejected() {
		let result = FogSettings::new(0.0, 1.0, 0.5, 0.25, 1.5, 10.0, 0.5, true);
		assert_eq!(Err(ConfigurationError::FadeSpeed(1.5)), result);
	}
	#[test]
	fn non_positive_interval_is_rejected() {
		let result = FogSettings::new(0.0, 1.0, 0.5, 0.25, 0.1, 10.0, 0.0, true);
		assert_eq!(Err(ConfigurationError::UpdateInterval(0.0)), result);
	}
	#[test]
	fn non_positive_vision_range_is_rejected() {
		let result = FogSettings::new(0.0, 1.0, 0.5, 0.25, 0.1, -2.0, 0.5, true);
		assert_eq!(Err(ConfigurationError::VisionRange(-2.0)), result);
	}
	#[test]
	fn flat_opacity_band_is_accepted() {
		// min == max makes fading a no-op rather than an error
		let result = FogSettings::new(0.5, 0.5, 0.5, 0.25, 0.1, 10.0, 0.5, true);
		assert!(result.is_ok());
	}
}
