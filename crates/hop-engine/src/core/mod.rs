pub mod frame;
pub mod physics;
