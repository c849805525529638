use wasm_bindgen::prelude::*;

mod game;
pub use game::BallHop;

hop_web::export_game!(BallHop, "ball-hop");
