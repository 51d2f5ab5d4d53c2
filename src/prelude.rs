//! `use bevy_fog_of_war_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::fogofwar::{
	fog_field::*, grid::*, resolver::*, revealers::*, settings::*, *,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{revealer_layer::*, vision_layer::*, *},
};
