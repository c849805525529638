use crate::components::player::Player;
use crate::core::physics::PhysicsBackend;

/// One frame's worth of intent, decoupled from which keys produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Ground-plane direction; each component is -1, 0 or 1 before scaling.
    Move { dx: f32, dz: f32 },
    Jump,
}

impl Command {
    /// Dispatch to the player. Effects land on the next physics step.
    pub fn apply<W: PhysicsBackend>(self, player: &mut Player, world: &mut W) {
        match self {
            Command::Move { dx, dz } => player.move_by(world, dx, dz),
            Command::Jump => {
                player.jump(world);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::player::PlayerConfig;
    use crate::core::physics::PhysicsWorld;
    use glam::Vec3;

    #[test]
    fn move_command_pushes_the_player() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let config = PlayerConfig::default();
        let mut player = Player::spawn(&mut world, &config);
        world.step();

        Command::Move { dx: 0.0, dz: -1.0 }.apply(&mut player, &mut world);
        world.step();

        let vel = world.velocity(player.body());
        assert!(vel.z < 0.0, "expected -z velocity, got {:?}", vel);
        assert!(vel.x.abs() < 1e-4);
        assert!((player.linear_damping() - config.moving_damping).abs() < 1e-6);
    }

    #[test]
    fn jump_command_while_airborne_changes_nothing() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let config = PlayerConfig::default();
        let mut player = Player::spawn(&mut world, &config);
        world.step();

        let damping = world.linear_damping(player.body());
        Command::Jump.apply(&mut player, &mut world);

        assert_eq!(world.velocity(player.body()), Vec3::ZERO);
        assert_eq!(world.linear_damping(player.body()), damping);
    }
}
