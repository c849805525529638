use crate::api::game::{Game, GameConfig};
use crate::command::Command;
use crate::components::player::Player;
use crate::core::physics::PhysicsWorld;
use crate::input::keys::{InputEvent, KeyBindings};
use crate::input::resolver::resolve;
use crate::input::state::InputState;
use crate::renderer::traits::VisualProxy;

/// One world, one player, one input context.
///
/// Owns the only `InputState`; key events mutate it between ticks and
/// `tick` samples it at a single well-defined point.
pub struct FrameLoop {
    world: PhysicsWorld,
    player: Player,
    input: InputState,
    bindings: KeyBindings,
    frame: u64,
}

impl FrameLoop {
    /// Build from the game's own config.
    pub fn new<G: Game>(game: &mut G) -> Self {
        let config = game.config();
        Self::with_config(config, game)
    }

    /// Build with an explicit config (e.g. loaded from JSON).
    pub fn with_config<G: Game>(config: GameConfig, game: &mut G) -> Self {
        let mut world = PhysicsWorld::new(config.gravity);
        world.set_dt(config.fixed_dt);
        game.init(&mut world);
        let player = Player::spawn(&mut world, &config.player);

        log::info!(
            "frame loop ready: {} bodies, dt {:.4}s, player at {:?}",
            world.body_count(),
            config.fixed_dt,
            config.player.spawn,
        );

        Self {
            world,
            player,
            input: InputState::new(),
            bindings: config.bindings,
            frame: 0,
        }
    }

    /// Run one frame. Order matters:
    ///
    /// 1. step physics
    /// 2. mirror the post-step transform
    /// 3. resolve one command from held keys
    /// 4. apply it (visible only after the *next* step)
    /// 5. present the mirrored transform
    ///
    /// Returns the command applied this frame, if any.
    pub fn tick<P: VisualProxy>(&mut self, proxy: &mut P) -> Option<Command> {
        self.world.step();
        self.player.sync_from(&self.world);

        let command = resolve(&self.input);
        if let Some(command) = command {
            command.apply(&mut self.player, &mut self.world);
        }

        proxy.present(self.player.transform());
        self.frame += 1;
        command
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Forward a physical key press. Unbound codes are ignored.
    pub fn key_down(&mut self, code: &str) {
        if let Some(event) = self.bindings.key_down(code) {
            self.push_input(event);
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(event) = self.bindings.key_up(code) {
            self.push_input(event);
        }
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.input.clear();
    }

    /// Number of completed ticks.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}
