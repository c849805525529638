use hop_engine::{FrameLoop, FrameRecord, Game, GameConfig, InputEvent};

/// Generic game runner that wires the frame loop to the browser.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports
/// free functions via `#[wasm_bindgen]` (see [`crate::export_game!`]),
/// because wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    frame_loop: Option<FrameLoop>,
    /// Latest transform, read by JS through `record_ptr`.
    record: FrameRecord,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            frame_loop: None,
            record: FrameRecord::new(),
        }
    }

    /// Build the world with the game's own config. Call once after construction.
    pub fn init(&mut self) {
        let config = self.game.config();
        self.init_with_config(config);
    }

    /// Build the world from a JSON config, falling back to the game's
    /// config if it does not parse.
    pub fn init_with_json(&mut self, json: &str) {
        let config = match GameConfig::from_json(json) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("bad config ({}), using game defaults", err);
                self.game.config()
            }
        };
        self.init_with_config(config);
    }

    fn init_with_config(&mut self, config: GameConfig) {
        let frame_loop = FrameLoop::with_config(config, &mut self.game);
        self.frame_loop = Some(frame_loop);
    }

    pub fn is_initialized(&self) -> bool {
        self.frame_loop.is_some()
    }

    /// Run one frame and refresh the record JS reads.
    pub fn tick(&mut self) {
        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return;
        };
        frame_loop.tick(&mut self.record);
        self.record.frame = frame_loop.frame() as f32;
    }

    pub fn key_down(&mut self, code: &str) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.key_down(code);
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.key_up(code);
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.push_input(event);
        }
    }

    /// Window lost focus: key-ups will never arrive for what is held.
    pub fn blur(&mut self) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.release_all();
        }
    }

    // ---- Accessors for JS reads ----

    pub fn record(&self) -> &FrameRecord {
        &self.record
    }

    pub fn record_ptr(&self) -> *const f32 {
        self.record.as_ptr()
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_loop
            .as_ref()
            .map(|l| l.frame() as u32)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hop_engine::{LogicalKey, PhysicsWorld, PlayerConfig};
    use glam::Vec3;

    struct Drift;

    impl Game for Drift {
        fn config(&self) -> GameConfig {
            GameConfig {
                gravity: Vec3::ZERO,
                player: PlayerConfig {
                    spawn: Vec3::ZERO,
                    ..Default::default()
                },
                ..Default::default()
            }
        }

        fn init(&mut self, _world: &mut PhysicsWorld) {}
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut runner = GameRunner::new(Drift);
        runner.key_down("KeyD");
        runner.tick();
        assert!(!runner.is_initialized());
        assert_eq!(runner.frame_count(), 0);
        assert_eq!(runner.record().frame, 0.0);
    }

    #[test]
    fn ticks_update_record() {
        let mut runner = GameRunner::new(Drift);
        runner.init();
        runner.key_down("KeyD");
        runner.tick();
        runner.tick();

        assert_eq!(runner.frame_count(), 2);
        let record = runner.record();
        assert_eq!(record.frame, 2.0);
        assert!(record.position[0] > 0.0);
    }

    #[test]
    fn blur_stops_steering() {
        let mut runner = GameRunner::new(Drift);
        runner.init();
        runner.push_input(InputEvent::KeyDown(LogicalKey::Forward));
        runner.blur();
        runner.tick();
        runner.tick();
        assert_eq!(runner.record().position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn bad_json_falls_back_to_game_config() {
        let mut runner = GameRunner::new(Drift);
        runner.init_with_json("{ nope");
        assert!(runner.is_initialized());
        runner.tick();
        // Drift has no gravity; the default config would have pulled the ball down.
        assert_eq!(runner.record().position[1], 0.0);
    }
}
