pub mod keys;
pub mod resolver;
pub mod state;
