use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::transform::Transform;
use crate::core::physics::{
    BodyDesc, ColliderDesc, ColliderMaterial, PhysicsBackend, PhysicsBody, PhysicsWorld, RayQuery,
};

/// Tuning for the controlled ball. Loaded as part of `GameConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Where the body starts.
    pub spawn: Vec3,
    /// Ball collider radius.
    pub radius: f32,
    /// Impulse magnitude per unit of steering intent.
    pub movement_speed: f32,
    /// Damping while actively steered.
    pub moving_damping: f32,
    /// Damping while coasting, falling or jumping.
    pub idle_damping: f32,
    /// Vertical impulse of a grounded jump.
    pub jump_impulse: f32,
    /// Ground probe length as a multiple of `radius`. Slightly above 1 so a
    /// resting ball (center exactly `radius` above the surface) registers.
    pub probe_factor: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 5.0, 0.0),
            radius: 1.0,
            movement_speed: 0.5,
            moving_damping: 2.0,
            idle_damping: 0.1,
            jump_impulse: 20.0,
            probe_factor: 1.1,
            density: 1.0,
            restitution: 0.0,
            friction: 0.5,
        }
    }
}

impl PlayerConfig {
    /// Max distance of the downward grounded probe.
    pub fn ground_probe(&self) -> f32 {
        self.radius * self.probe_factor
    }

    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::Ball { radius: self.radius })
            .with_position(self.spawn)
            .with_linear_damping(self.idle_damping)
    }

    pub fn material(&self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.restitution,
            friction: self.friction,
            density: self.density,
        }
    }
}

/// The entity steered by input.
///
/// Holds a handle into the physics world, never the body itself. Physical
/// truth stays in the world; `transform` is a mirror refreshed by
/// [`Player::sync_from`] after each step.
#[derive(Debug)]
pub struct Player {
    body: PhysicsBody,
    movement_speed: f32,
    moving_damping: f32,
    idle_damping: f32,
    jump_impulse: f32,
    ground_probe: f32,
    linear_damping: f32,
    transform: Transform,
}

impl Player {
    /// Register a ball body + collider in `world` and wrap it.
    pub fn spawn(world: &mut PhysicsWorld, config: &PlayerConfig) -> Self {
        let body = world.create_body(&config.body_desc(), config.material());
        let mut player = Self::attach(body, config);
        player.sync_from(&*world);
        player
    }

    /// Wrap a body that is already registered. The body's damping is
    /// assumed to be `config.idle_damping`.
    pub fn attach(body: PhysicsBody, config: &PlayerConfig) -> Self {
        Self {
            body,
            movement_speed: config.movement_speed,
            moving_damping: config.moving_damping,
            idle_damping: config.idle_damping,
            jump_impulse: config.jump_impulse,
            ground_probe: config.ground_probe(),
            linear_damping: config.idle_damping,
            transform: Transform::new(config.spawn, glam::Quat::IDENTITY),
        }
    }

    /// Remove the body from the world. Consumes the player, so no handle
    /// to the removed body survives.
    pub fn despawn(self, world: &mut PhysicsWorld) {
        world.remove_body(self.body);
    }

    /// Steer along the ground plane. Never pushes vertically.
    ///
    /// Damping is raised before the impulse goes in, so both are in effect
    /// for the same upcoming step. A world that does not hold this body
    /// is left untouched.
    pub fn move_by<W: PhysicsBackend>(&mut self, world: &mut W, dx: f32, dz: f32) {
        if !world.contains(&self.body) {
            log::warn!("move ignored: body is not in this world");
            return;
        }
        let impulse = Vec3::new(dx * self.movement_speed, 0.0, dz * self.movement_speed);
        self.set_damping(world, self.moving_damping);
        world.apply_impulse(&self.body, impulse, true);
    }

    /// Jump if something solid is right below. Returns whether it did.
    ///
    /// An airborne request is dropped, not buffered for landing.
    pub fn jump<W: PhysicsBackend>(&mut self, world: &mut W) -> bool {
        if !world.contains(&self.body) {
            log::warn!("jump ignored: body is not in this world");
            return false;
        }
        if self.ground_distance(&*world).is_none() {
            log::debug!("jump ignored: nothing within {} below", self.ground_probe);
            return false;
        }
        self.set_damping(world, self.idle_damping);
        world.apply_impulse(&self.body, Vec3::new(0.0, self.jump_impulse, 0.0), true);
        true
    }

    /// Distance to the surface below, if within the probe length.
    /// Casts a fresh ray every call.
    pub fn ground_distance<W: PhysicsBackend>(&self, world: &W) -> Option<f32> {
        let origin = world.translation(&self.body);
        let query = RayQuery::downward(origin, self.ground_probe).excluding(&self.body);
        world
            .cast_ray(&query)
            .filter(|toi| *toi < self.ground_probe)
    }

    pub fn is_grounded<W: PhysicsBackend>(&self, world: &W) -> bool {
        self.ground_distance(world).is_some()
    }

    /// Copy the body's post-step translation and rotation into the mirror.
    pub fn sync_from<W: PhysicsBackend>(&mut self, world: &W) {
        self.transform = Transform::new(world.translation(&self.body), world.rotation(&self.body));
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn ground_probe(&self) -> f32 {
        self.ground_probe
    }

    /// Damping most recently written to the body.
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    fn set_damping<W: PhysicsBackend>(&mut self, world: &mut W, damping: f32) {
        self.linear_damping = damping;
        world.set_linear_damping(&self.body, damping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Damping(f32),
        Impulse(Vec3, bool),
    }

    /// Records every mutation and answers ray casts from a script.
    #[derive(Default)]
    struct ScriptedWorld {
        position: Vec3,
        ground_hit: Option<f32>,
        calls: Vec<Call>,
        queries: RefCell<Vec<RayQuery>>,
    }

    impl ScriptedWorld {
        fn impulses(&self) -> Vec<Vec3> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Impulse(v, _) => Some(*v),
                    _ => None,
                })
                .collect()
        }
    }

    impl PhysicsBackend for ScriptedWorld {
        fn apply_impulse(&mut self, _body: &PhysicsBody, impulse: Vec3, wake: bool) {
            self.calls.push(Call::Impulse(impulse, wake));
        }

        fn set_linear_damping(&mut self, _body: &PhysicsBody, damping: f32) {
            self.calls.push(Call::Damping(damping));
        }

        fn translation(&self, _body: &PhysicsBody) -> Vec3 {
            self.position
        }

        fn rotation(&self, _body: &PhysicsBody) -> Quat {
            Quat::IDENTITY
        }

        fn cast_ray(&self, query: &RayQuery) -> Option<f32> {
            self.queries.borrow_mut().push(*query);
            self.ground_hit
        }
    }

    fn scripted_player(config: &PlayerConfig) -> Player {
        let body = PhysicsBody {
            world_id: 0,
            body_handle: RigidBodyHandle::invalid(),
            collider_handle: ColliderHandle::invalid(),
        };
        Player::attach(body, config)
    }

    #[test]
    fn move_scales_intent_by_movement_speed() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld::default();

        player.move_by(&mut world, 1.0, 0.0);

        assert_eq!(world.impulses(), vec![Vec3::new(config.movement_speed, 0.0, 0.0)]);
    }

    #[test]
    fn forward_move_impulse_points_negative_z() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld::default();

        player.move_by(&mut world, 0.0, -1.0);

        assert_eq!(world.impulses(), vec![Vec3::new(0.0, 0.0, -config.movement_speed)]);
    }

    #[test]
    fn move_sets_damping_before_waking_impulse() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld::default();

        player.move_by(&mut world, -1.0, 1.0);

        let speed = config.movement_speed;
        assert_eq!(
            world.calls,
            vec![
                Call::Damping(config.moving_damping),
                Call::Impulse(Vec3::new(-speed, 0.0, speed), true),
            ]
        );
        assert_eq!(player.linear_damping(), config.moving_damping);
    }

    #[test]
    fn grounded_jump_lowers_damping_and_pushes_up() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld {
            ground_hit: Some(0.9),
            ..Default::default()
        };
        player.move_by(&mut world, 1.0, 0.0);
        world.calls.clear();

        assert!(player.jump(&mut world));

        assert_eq!(
            world.calls,
            vec![
                Call::Damping(config.idle_damping),
                Call::Impulse(Vec3::new(0.0, config.jump_impulse, 0.0), true),
            ]
        );
        assert_eq!(player.linear_damping(), config.idle_damping);
    }

    #[test]
    fn airborne_jump_is_a_noop() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld::default();

        assert!(!player.jump(&mut world));
        assert!(world.calls.is_empty());
        assert_eq!(player.linear_damping(), config.idle_damping);
    }

    #[test]
    fn hit_at_or_beyond_probe_length_is_not_ground() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);

        for toi in [config.ground_probe(), config.ground_probe() + 0.4] {
            let mut world = ScriptedWorld {
                ground_hit: Some(toi),
                ..Default::default()
            };
            assert!(!player.jump(&mut world), "toi {} counted as ground", toi);
            assert!(world.calls.is_empty());
        }
    }

    #[test]
    fn probe_is_downward_from_body_and_excludes_self() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld {
            position: Vec3::new(2.0, -1.75, 4.0),
            ground_hit: Some(1.0),
            ..Default::default()
        };

        player.jump(&mut world);

        let queries = world.queries.borrow();
        assert_eq!(queries.len(), 1);
        let q = queries[0];
        assert_eq!(q.origin, Vec3::new(2.0, -1.75, 4.0));
        assert_eq!(q.direction, Vec3::NEG_Y);
        assert!((q.max_toi - 1.1).abs() < 1e-6);
        assert!(q.solid);
        assert_eq!(q.exclude_body, Some(RigidBodyHandle::invalid()));
    }

    #[test]
    fn every_jump_casts_a_fresh_probe() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let mut world = ScriptedWorld {
            ground_hit: Some(0.5),
            ..Default::default()
        };

        assert!(player.jump(&mut world));
        world.ground_hit = None;
        assert!(!player.jump(&mut world));
        assert_eq!(world.queries.borrow().len(), 2);
    }

    #[test]
    fn sync_mirrors_backend_transform() {
        let config = PlayerConfig::default();
        let mut player = scripted_player(&config);
        let world = ScriptedWorld {
            position: Vec3::new(1.0, 0.5, -2.0),
            ..Default::default()
        };

        player.sync_from(&world);

        assert_eq!(player.transform().position, Vec3::new(1.0, 0.5, -2.0));
        assert_eq!(player.transform().rotation, Quat::IDENTITY);
    }

    // -- Against the real Rapier world --

    fn platform(world: &mut PhysicsWorld) {
        world.create_body(
            &BodyDesc::fixed(ColliderDesc::Cuboid {
                half_x: 2.5,
                half_y: 0.25,
                half_z: 7.5,
            })
            .with_position(Vec3::new(0.0, -3.0, 0.0)),
            ColliderMaterial::default(),
        );
    }

    #[test]
    fn resting_ball_jumps_in_rapier() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.set_dt(1.0 / 60.0);
        platform(&mut world);
        // Platform top is at -2.75, so a radius-1 ball rests at -1.75.
        let config = PlayerConfig {
            spawn: Vec3::new(0.0, -1.75, 0.0),
            ..Default::default()
        };
        let mut player = Player::spawn(&mut world, &config);
        world.step();

        let distance = player.ground_distance(&world).expect("should be grounded");
        assert!(distance < config.ground_probe());

        assert!(player.jump(&mut world));
        world.step();
        assert!(world.velocity(player.body()).y > 0.0);
        assert!((world.linear_damping(player.body()) - config.idle_damping).abs() < 1e-6);
    }

    #[test]
    fn falling_ball_cannot_jump_in_rapier() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.set_dt(1.0 / 60.0);
        platform(&mut world);
        let config = PlayerConfig::default();
        let mut player = Player::spawn(&mut world, &config);
        world.step();

        let vel = world.velocity(player.body());
        let damping = world.linear_damping(player.body());
        assert!(!player.jump(&mut world));
        assert_eq!(world.velocity(player.body()), vel);
        assert_eq!(world.linear_damping(player.body()), damping);
    }

    #[test]
    fn lone_ball_does_not_ground_on_itself() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let mut player = Player::spawn(&mut world, &PlayerConfig::default());
        world.step();
        assert!(!player.is_grounded(&world));
        assert!(!player.jump(&mut world));
    }

    #[test]
    fn despawn_removes_the_body() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let player = Player::spawn(&mut world, &PlayerConfig::default());
        assert_eq!(world.body_count(), 1);
        player.despawn(&mut world);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn player_outliving_its_world_cannot_touch_another() {
        let config = PlayerConfig::default();
        let mut old = PhysicsWorld::new(Vec3::ZERO);
        let mut player = Player::spawn(&mut old, &config);
        drop(old);

        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let bystander = world.create_body(
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 1.0 }).with_linear_damping(0.3),
            ColliderMaterial::default(),
        );
        // Same arena slot the stale player points at.
        assert_eq!(bystander.body_handle(), player.body().body_handle());
        world.step();

        player.move_by(&mut world, 1.0, 0.0);
        assert!(!player.jump(&mut world));
        world.step();

        assert_eq!(world.velocity(&bystander), Vec3::ZERO);
        assert!((world.linear_damping(&bystander) - 0.3).abs() < 1e-6);
        assert_eq!(player.linear_damping(), config.idle_damping);
    }

    #[test]
    fn held_jump_on_rest_fires_while_still_in_probe_range() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.set_dt(1.0 / 60.0);
        platform(&mut world);
        let config = PlayerConfig {
            spawn: Vec3::new(0.0, -1.75, 0.0),
            ..Default::default()
        };
        let mut player = Player::spawn(&mut world, &config);

        let mut jumps = 0;
        for _ in 0..20 {
            world.step();
            if player.jump(&mut world) {
                jumps += 1;
            }
        }
        // One step after the first impulse the ball is still within the
        // probe, so a held key lands a second one. Then it is airborne.
        assert_eq!(jumps, 2);
        assert!(!player.is_grounded(&world));
    }

    #[test]
    fn spawn_mirrors_initial_position() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let player = Player::spawn(&mut world, &PlayerConfig::default());
        assert_eq!(player.transform().position, Vec3::new(0.0, 5.0, 0.0));
        assert!((world.linear_damping(player.body()) - 0.1).abs() < 1e-6);
    }
}
