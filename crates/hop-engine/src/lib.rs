pub mod api;
pub mod bridge;
pub mod command;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use bridge::protocol::{FrameRecord, FRAME_RECORD_FLOATS, PROTOCOL_VERSION};
pub use command::Command;
pub use components::player::{Player, PlayerConfig};
pub use components::transform::Transform;
pub use core::frame::FrameLoop;
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, PhysicsBackend, PhysicsBody,
    PhysicsWorld, RayQuery,
};
pub use input::keys::{InputEvent, KeyBindings, LogicalKey};
pub use input::resolver::resolve;
pub use input::state::InputState;
pub use renderer::traits::{NullProxy, VisualProxy};
