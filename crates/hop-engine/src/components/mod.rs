pub mod player;
pub mod transform;
