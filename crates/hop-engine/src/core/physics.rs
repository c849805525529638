use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> nalgebra::UnitQuaternion<f32> {
    nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_to_quat(q: &nalgebra::UnitQuaternion<f32>) -> Quat {
    let c = q.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    /// Rapier takes half extents, not full sizes.
    Cuboid { half_x: f32, half_y: f32, half_z: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_x, half_y, half_z } => {
                ColliderBuilder::cuboid(half_x, half_y, half_z)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self::of_type(BodyType::Dynamic, collider)
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self::of_type(BodyType::Fixed, collider)
    }

    fn of_type(body_type: BodyType, collider: ColliderDesc) -> Self {
        Self {
            body_type,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            collider,
            linear_damping: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    /// Set the linear damping (velocity decay). Higher values slow the body faster.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }
}

/// Handle pair referencing a body registered in a [`PhysicsWorld`].
///
/// Neither `Clone` nor `Copy`: whoever holds it is the only one who can
/// mutate or remove the body, and [`PhysicsWorld::remove_body`] consumes it.
/// Stamped with the id of the world that created it; every other world
/// treats it as unknown.
#[derive(Debug, PartialEq, Eq)]
pub struct PhysicsBody {
    pub(crate) world_id: u64,
    pub(crate) body_handle: RigidBodyHandle,
    pub(crate) collider_handle: ColliderHandle,
}

impl PhysicsBody {
    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body_handle
    }

    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider_handle
    }
}

/// A single-shot ray query against the current collision state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Should be normalized; time of impact is then a distance.
    pub direction: Vec3,
    pub max_toi: f32,
    /// When `true`, a ray starting inside a shape hits it at toi 0.
    pub solid: bool,
    /// Body whose colliders are ignored (usually the caster itself).
    pub exclude_body: Option<RigidBodyHandle>,
}

impl RayQuery {
    /// Straight down from `origin`, at most `max_toi` long.
    pub fn downward(origin: Vec3, max_toi: f32) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
            max_toi,
            solid: true,
            exclude_body: None,
        }
    }

    pub fn excluding(mut self, body: &PhysicsBody) -> Self {
        self.exclude_body = Some(body.body_handle);
        self
    }
}

/// The body primitives an entity is allowed to call.
///
/// [`PhysicsWorld`] is the real implementation; tests script their own.
pub trait PhysicsBackend {
    /// Apply an instantaneous impulse. `wake` resumes a sleeping body.
    fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec3, wake: bool);

    fn set_linear_damping(&mut self, body: &PhysicsBody, damping: f32);

    fn translation(&self, body: &PhysicsBody) -> Vec3;

    fn rotation(&self, body: &PhysicsBody) -> Quat;

    /// Time of impact of the closest hit, if any.
    fn cast_ray(&self, query: &RayQuery) -> Option<f32>;

    /// Whether `body` is registered here.
    fn contains(&self, _body: &PhysicsBody) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier3D boilerplate into a single, easy-to-use struct.
pub struct PhysicsWorld {
    id: u64,
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector (Y-up,
    /// so Earth gravity is `Vec3::new(0.0, -9.81, 0.0)`).
    pub fn new(gravity: Vec3) -> Self {
        Self {
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    pub fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .position(nalgebra::Isometry3::from_parts(
                nalgebra::Translation3::new(desc.position.x, desc.position.y, desc.position.z),
                quat_to_na(desc.rotation),
            ))
            .linvel(vec3_to_na(desc.velocity))
            .linear_damping(desc.linear_damping)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            world_id: self.id,
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    /// A body from another world is dropped without touching this one.
    pub fn remove_body(&mut self, body: PhysicsBody) {
        if body.world_id != self.id {
            log::warn!("remove_body: handle belongs to another world, ignored");
            return;
        }
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by one timestep. Also refreshes the query
    /// pipeline, so ray casts see the post-step collision state.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.rigid_body(body)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn linear_damping(&self, body: &PhysicsBody) -> f32 {
        self.rigid_body(body)
            .map(|rb| rb.linear_damping())
            .unwrap_or(0.0)
    }

    pub fn is_sleeping(&self, body: &PhysicsBody) -> bool {
        self.rigid_body(body)
            .map(|rb| rb.is_sleeping())
            .unwrap_or(false)
    }

    /// Force a body to sleep (mostly useful to check that impulses wake it).
    pub fn sleep(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.sleep();
        }
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn rigid_body(&self, body: &PhysicsBody) -> Option<&RigidBody> {
        if body.world_id != self.id {
            return None;
        }
        self.bodies.get(body.body_handle)
    }

    fn rigid_body_mut(&mut self, body: &PhysicsBody) -> Option<&mut RigidBody> {
        if body.world_id != self.id {
            return None;
        }
        self.bodies.get_mut(body.body_handle)
    }
}

impl PhysicsBackend for PhysicsWorld {
    fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec3, wake: bool) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.apply_impulse(vec3_to_na(impulse), wake);
        }
    }

    fn set_linear_damping(&mut self, body: &PhysicsBody, damping: f32) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_linear_damping(damping);
        }
    }

    fn translation(&self, body: &PhysicsBody) -> Vec3 {
        self.rigid_body(body)
            .map(|rb| na_to_vec3(rb.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    fn rotation(&self, body: &PhysicsBody) -> Quat {
        self.rigid_body(body)
            .map(|rb| na_to_quat(rb.rotation()))
            .unwrap_or(Quat::IDENTITY)
    }

    fn contains(&self, body: &PhysicsBody) -> bool {
        self.rigid_body(body).is_some()
    }

    /// Sees the collision state as of the last [`PhysicsWorld::step`].
    fn cast_ray(&self, query: &RayQuery) -> Option<f32> {
        let ray = Ray::new(
            nalgebra::Point3::new(query.origin.x, query.origin.y, query.origin.z),
            vec3_to_na(query.direction),
        );

        let filter = match query.exclude_body {
            Some(handle) => QueryFilter::default().exclude_sensors().exclude_rigid_body(handle),
            None => QueryFilter::default().exclude_sensors(),
        };

        self.query_pipeline
            .cast_ray(
                &self.bodies,
                &self.colliders,
                &ray,
                query.max_toi,
                query.solid,
                filter,
            )
            .map(|(_, toi)| toi)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
