//! This is a plugin for Bevy game engine to handle the logic for calculating a grid based fog-of-war
//!

pub mod bundle;
pub mod fogofwar;
pub mod plugin;

pub mod prelude;
