use glam::Vec3;
use hop_engine::*;

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// The ball drops from here onto the platform.
const SPAWN: Vec3 = Vec3::new(0.0, 5.0, 0.0);
const BALL_RADIUS: f32 = 1.0;

const PLATFORM_Y: f32 = -3.0;
/// Rapier half extents: the visible slab is 5 × 0.5 × 15.
const PLATFORM_HALF: Vec3 = Vec3::new(2.5, 0.25, 7.5);
const PLATFORM_BOUNCE: f32 = 0.7;

pub struct BallHop;

impl BallHop {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BallHop {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for BallHop {
    fn config(&self) -> GameConfig {
        GameConfig {
            gravity: GRAVITY,
            player: PlayerConfig {
                spawn: SPAWN,
                radius: BALL_RADIUS,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn init(&mut self, world: &mut PhysicsWorld) {
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_x: PLATFORM_HALF.x,
            half_y: PLATFORM_HALF.y,
            half_z: PLATFORM_HALF.z,
        })
        .with_position(Vec3::new(0.0, PLATFORM_Y, 0.0));

        let material = ColliderMaterial {
            restitution: PLATFORM_BOUNCE,
            ..Default::default()
        };
        world.create_body(&desc, material);
    }
}
