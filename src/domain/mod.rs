pub mod entity;
pub mod material;
pub mod physics;
pub mod rules;
