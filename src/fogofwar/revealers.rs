//! Tracking of the vision sources feeding a fog grid.
//!
//! A revealer is a back-reference to a unit entity plus a cached vision
//! range. The registry never owns the unit - positions are looked up through
//! the reference at resolve time and an entry whose unit has despawned
//! without deregistering is simply skipped and purged, it can never crash a
//! resolver pass.
//!

use bevy::prelude::*;

/// An active vision source contributing visibility to a fog grid
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Revealer {
	/// The unit supplying a world position, held as a back-reference only
	source: Entity,
	/// Radius in world units within which the source lifts the fog
	vision_range: f32,
}

impl Revealer {
	/// Create a new instance of [Revealer]
	pub fn new(source: Entity, vision_range: f32) -> Self {
		Revealer {
			source,
			vision_range,
		}
	}
	/// Get the unit supplying the world position
	pub fn get_source(&self) -> Entity {
		self.source
	}
	/// Get the vision radius in world units
	pub fn get_vision_range(&self) -> f32 {
		self.vision_range
	}
}

/// The set of currently active vision sources of a fog grid, at most one
/// entry per unit
#[derive(Component, Default, Clone, Reflect)]
pub struct RevealerRegistry {
	/// Tracked sources in registration order
	revealers: Vec<Revealer>,
}

impl RevealerRegistry {
	/// Start tracking a unit as a vision source. Registering an already
	/// tracked unit refreshes its cached range rather than duplicating the
	/// entry. An invalid reference or range is logged and ignored
	pub fn register(&mut self, source: Entity, vision_range: f32) {
		if source == Entity::PLACEHOLDER {
			warn!("Refusing to register the placeholder entity as a revealer");
			return;
		}
		if !vision_range.is_finite() || vision_range <= 0.0 {
			warn!(
				"Refusing to register revealer {:?} with vision range {}",
				source, vision_range
			);
			return;
		}
		if let Some(existing) = self
			.revealers
			.iter_mut()
			.find(|revealer| revealer.source == source)
		{
			if existing.vision_range != vision_range {
				debug!(
					"Revealer {:?} re-registered, vision range {} replaces {}",
					source, vision_range, existing.vision_range
				);
				existing.vision_range = vision_range;
			}
			return;
		}
		self.revealers.push(Revealer::new(source, vision_range));
	}
	/// Stop tracking a unit, removing every entry that references it.
	/// Silently succeeds when the unit was never registered
	pub fn unregister(&mut self, source: Entity) {
		self.revealers.retain(|revealer| revealer.source != source);
	}
	/// Drop every entry whose unit has been found stale by the resolver
	pub fn purge(&mut self, stale: &[Entity]) {
		if stale.is_empty() {
			return;
		}
		self.revealers
			.retain(|revealer| !stale.contains(&revealer.source));
	}
	/// Iterate the tracked sources
	pub fn iter(&self) -> impl Iterator<Item = &Revealer> {
		self.revealers.iter()
	}
	/// Number of tracked sources
	pub fn len(&self) -> usize {
		self.revealers.len()
	}
	/// Whether no sources are tracked
	pub fn is_empty(&self) -> bool {
		self.revealers.is_empty()
	}
	/// Forget every tracked source
	pub fn clear(&mut self) {
		self.revealers.clear();
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn registration_is_idempotent_per_unit() {
		let mut registry = RevealerRegistry::default();
		let unit = Entity::from_raw(7);
		registry.register(unit, 5.0);
		registry.register(unit, 5.0);
		assert_eq!(1, registry.len());
	}
	#[test]
	fn re_registration_refreshes_the_range() {
		let mut registry = RevealerRegistry::default();
		let unit = Entity::from_raw(7);
		registry.register(unit, 5.0);
		registry.register(unit, 9.0);
		assert_eq!(1, registry.len());
		let ranges: Vec<f32> = registry.iter().map(|r| r.get_vision_range()).collect();
		assert_eq!(vec![9.0], ranges);
	}
	#[test]
	fn placeholder_reference_is_ignored() {
		let mut registry = RevealerRegistry::default();
		registry.register(Entity::PLACEHOLDER, 5.0);
		assert!(registry.is_empty());
	}
	#[test]
	fn invalid_range_is_ignored() {
		let mut registry = RevealerRegistry::default();
		registry.register(Entity::from_raw(1), 0.0);
		registry.register(Entity::from_raw(2), -3.0);
		registry.register(Entity::from_raw(3), f32::NAN);
		assert!(registry.is_empty());
	}
	#[test]
	fn unregister_removes_all_entries_and_tolerates_absence() {
		let mut registry = RevealerRegistry::default();
		let first = Entity::from_raw(1);
		let second = Entity::from_raw(2);
		registry.register(first, 5.0);
		registry.register(second, 6.0);
		registry.unregister(first);
		assert_eq!(1, registry.len());
		// absent unit, nothing happens
		registry.unregister(first);
		assert_eq!(1, registry.len());
		registry.unregister(second);
		assert!(registry.is_empty());
	}
	#[test]
	fn purge_drops_only_stale_entries() {
		let mut registry = RevealerRegistry::default();
		let keep = Entity::from_raw(1);
		let gone = Entity::from_raw(2);
		registry.register(keep, 5.0);
		registry.register(gone, 6.0);
		registry.purge(&[gone]);
		assert_eq!(1, registry.len());
		assert_eq!(keep, registry.iter().next().unwrap().get_source());
	}
}
