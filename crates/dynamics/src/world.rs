//! # Simulation World
//!
//! The [`World`] owns the body and joint arenas and drives the step
//! pipeline: external forces, broad/narrow phase, constraint assembly,
//! sequential impulse iterations, pose integration, fault containment and
//! the sleep pass. One `World` is exclusively borrowed for the duration of
//! [`World::step`]; there is no shared or ambient state.
//!
//! Creation of bodies and joints is immediate; removal is deferred to the
//! next `step` call so in-flight constraint lists are never invalidated.
//! The step function is pure with respect to its inputs: the same body and
//! joint set with the same configuration produces the same trajectory.
//!
//! With the `parallel` feature, AABB computation and the narrow-phase pair
//! tests fan out over rayon. Both are read-only over the body set and their
//! output order is preserved, so the parallel build steps bit-for-bit the
//! same as the sequential one. Constraint solving stays sequential.

use std::collections::HashSet;

use glam::Vec3;
use tracing::{debug, warn};

use crate::body::{BodyDesc, RigidBody};
use crate::collision::{collide, compute_aabbs, sweep_pairs, Contact};
use crate::error::Error;
use crate::events::{Event, StepReport};
use crate::handle::{Arena, BodyHandle, JointHandle};
use crate::joint::{Joint, JointDesc, JointKind};
use crate::sleep::SleepParams;
use crate::solver::{self, ContactConstraint, JointConstraint, SolverBody};
use crate::types::{BodyKind, PoseSnapshot, StepConfig};

#[derive(Debug)]
pub struct World {
    bodies: Arena<RigidBody>,
    joints: Arena<Joint>,
    gravity: Vec3,
    config: StepConfig,
    sleep: SleepParams,
    pending_body_removals: Vec<BodyHandle>,
    pending_joint_removals: Vec<JointHandle>,
}

impl World {
    /// Empty world with gravity of -9.81 m/s^2 along z.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: Arena::new(),
            joints: Arena::new(),
            gravity: Vec3::new(0.0, 0.0, -9.81),
            config: StepConfig::default(),
            sleep: SleepParams::default(),
            pending_body_removals: Vec::new(),
            pending_joint_removals: Vec::new(),
        }
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    #[must_use]
    pub fn config(&self) -> StepConfig {
        self.config
    }

    pub fn set_config(&mut self, config: StepConfig) {
        self.config = config;
    }

    pub fn set_sleep_params(&mut self, sleep: SleepParams) {
        self.sleep = sleep;
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Create a body. Validates the shape and, for Active bodies, the mass.
    pub fn add_body(&mut self, desc: BodyDesc) -> Result<BodyHandle, Error> {
        let body = RigidBody::new(desc)?;
        let (index, generation) = self.bodies.insert(body);
        Ok(BodyHandle { index, generation })
    }

    /// Create a joint between two live bodies. Anchor frames are captured
    /// here and never recomputed from world geometry afterwards.
    pub fn add_joint(&mut self, desc: JointDesc) -> Result<JointHandle, Error> {
        self.body(desc.body_a)?;
        self.body(desc.body_b)?;
        let joint = Joint::new(desc)?;
        let (index, generation) = self.joints.insert(joint);
        Ok(JointHandle { index, generation })
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&RigidBody, Error> {
        self.bodies
            .get(handle.index, handle.generation)
            .ok_or(Error::StaleBodyHandle {
                index: handle.index,
                generation: handle.generation,
            })
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, Error> {
        self.bodies
            .get_mut(handle.index, handle.generation)
            .ok_or(Error::StaleBodyHandle {
                index: handle.index,
                generation: handle.generation,
            })
    }

    pub fn joint(&self, handle: JointHandle) -> Result<&Joint, Error> {
        self.joints
            .get(handle.index, handle.generation)
            .ok_or(Error::StaleJointHandle {
                index: handle.index,
                generation: handle.generation,
            })
    }

    /// Current angle of a hinge joint, `None` for a fixed joint or when a
    /// connected body has been removed.
    pub fn hinge_angle(&self, handle: JointHandle) -> Result<Option<f32>, Error> {
        let joint = self.joint(handle)?;
        if !matches!(joint.kind, JointKind::Hinge { .. }) {
            return Ok(None);
        }
        let (Some(body_a), Some(body_b)) = (
            self.bodies.get(joint.body_a.index, joint.body_a.generation),
            self.bodies.get(joint.body_b.index, joint.body_b.generation),
        ) else {
            return Ok(None);
        };
        Ok(Some(joint.hinge_angle(&body_a.pose, &body_b.pose)))
    }

    /// Queue a body for removal at the next step boundary. Joints attached
    /// to it are permanently detached at the same time.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), Error> {
        self.body(handle)?;
        self.pending_body_removals.push(handle);
        Ok(())
    }

    /// Queue a joint for removal at the next step boundary.
    pub fn remove_joint(&mut self, handle: JointHandle) -> Result<(), Error> {
        self.joint(handle)?;
        self.pending_joint_removals.push(handle);
        Ok(())
    }

    /// Accumulate a force at a world-space point until the end of the next
    /// step. Sleeping bodies are excluded from force application.
    pub fn apply_force(
        &mut self,
        handle: BodyHandle,
        force: Vec3,
        world_point: Vec3,
    ) -> Result<(), Error> {
        let body = self.body_mut(handle)?;
        if body.kind() == BodyKind::Active && !body.is_sleeping() {
            body.add_force_at_point(force, world_point);
        }
        Ok(())
    }

    /// Apply an immediate velocity change at a world-space point. Sleeping
    /// bodies are excluded; wake them first if the impulse must land.
    pub fn apply_impulse(
        &mut self,
        handle: BodyHandle,
        impulse: Vec3,
        world_point: Vec3,
    ) -> Result<(), Error> {
        let body = self.body_mut(handle)?;
        if body.kind() == BodyKind::Active && !body.is_sleeping() {
            body.add_impulse_at_point(impulse, world_point);
        }
        Ok(())
    }

    /// Wake a sleeping body.
    pub fn wake(&mut self, handle: BodyHandle) -> Result<(), Error> {
        self.body_mut(handle)?.wake();
        Ok(())
    }

    /// Current pose of every live body in creation order.
    #[must_use]
    pub fn poses(&self) -> Vec<(BodyHandle, PoseSnapshot)> {
        self.bodies
            .iter()
            .map(|(index, generation, body)| {
                (
                    BodyHandle { index, generation },
                    PoseSnapshot::from_pose(&body.pose),
                )
            })
            .collect()
    }

    /// Advance the simulation by `dt`, divided into the configured number
    /// of substeps. Returns the end-of-step poses and the events raised
    /// along the way.
    pub fn step(&mut self, dt: f32) -> StepReport {
        self.apply_pending_removals();

        let substeps = self.config.substeps.max(1);
        let sub_dt = dt / substeps as f32;
        let mut events = Vec::new();

        let skip_pairs = self.connected_pairs();
        for _ in 0..substeps {
            self.substep(sub_dt, &skip_pairs, &mut events);
        }

        self.check_breaking(&mut events);
        for (_, _, body) in self.bodies.iter_mut() {
            body.clear_forces();
        }
        self.sleep_pass(&mut events);

        StepReport {
            poses: self.poses(),
            events,
        }
    }

    fn apply_pending_removals(&mut self) {
        for handle in std::mem::take(&mut self.pending_joint_removals) {
            self.joints.remove(handle.index, handle.generation);
        }
        for handle in std::mem::take(&mut self.pending_body_removals) {
            if self.bodies.remove(handle.index, handle.generation).is_none() {
                continue;
            }
            // Detach joints that referenced the removed body. This is not a
            // break: no event, just a permanent disable.
            for (_, _, joint) in self.joints.iter_mut() {
                if joint.body_a == handle || joint.body_b == handle {
                    joint.enabled = false;
                    joint.reset_warm_start();
                }
            }
        }
    }

    /// Body slot pairs whose mutual collision is disabled by a joint.
    fn connected_pairs(&self) -> HashSet<(u32, u32)> {
        let mut set = HashSet::new();
        for (_, _, joint) in self.joints.iter() {
            if joint.enabled && !joint.collide_connected {
                let a = joint.body_a.index;
                let b = joint.body_b.index;
                set.insert((a.min(b), a.max(b)));
            }
        }
        set
    }

    fn substep(&mut self, dt: f32, skip_pairs: &HashSet<(u32, u32)>, events: &mut Vec<Event>) {
        let gravity = self.gravity;
        for (_, _, body) in self.bodies.iter_mut() {
            body.integrate_forces(gravity, dt);
        }

        let contacts = self.find_contacts(skip_pairs);
        debug!(contacts = contacts.len(), "narrow phase done");

        // Working copy of every live body's velocity state, in slot order.
        let slot_count = self.bodies.slot_count();
        let mut solver_index = vec![u32::MAX; slot_count];
        let mut solver_bodies = Vec::with_capacity(self.bodies.len());
        let mut slots = Vec::with_capacity(self.bodies.len());
        for (index, generation, body) in self.bodies.iter() {
            solver_index[index as usize] = solver_bodies.len() as u32;
            solver_bodies.push(SolverBody {
                linear: body.linear_velocity,
                angular: body.angular_velocity,
                inv_mass: body.inv_mass,
                inv_inertia: body.inv_inertia_world(),
            });
            slots.push((index, generation));
        }

        let mut contact_constraints: Vec<ContactConstraint> = contacts
            .iter()
            .map(|&(a, b, ref contact)| {
                let pos_a = self.bodies.get_at(a).map(|body| body.pose.position);
                let pos_b = self.bodies.get_at(b).map(|body| body.pose.position);
                ContactConstraint::prepare(
                    solver_index[a as usize] as usize,
                    solver_index[b as usize] as usize,
                    &solver_bodies,
                    contact,
                    pos_a.unwrap_or_default(),
                    pos_b.unwrap_or_default(),
                    dt,
                )
            })
            .collect();

        let mut joint_constraints: Vec<JointConstraint> = Vec::new();
        for (index, _, joint) in self.joints.iter() {
            if !joint.enabled {
                continue;
            }
            let (Some(body_a), Some(body_b)) = (
                self.bodies.get_at(joint.body_a.index),
                self.bodies.get_at(joint.body_b.index),
            ) else {
                continue;
            };
            let a = solver_index[joint.body_a.index as usize] as usize;
            let b = solver_index[joint.body_b.index as usize] as usize;
            if solver_bodies[a].is_immovable() && solver_bodies[b].is_immovable() {
                continue;
            }
            let pose_a = body_a.pose;
            let pose_b = body_b.pose;
            joint_constraints.push(JointConstraint::prepare(
                index,
                joint,
                a,
                b,
                &mut solver_bodies,
                &pose_a,
                &pose_b,
                dt,
            ));
        }

        solver::iterate(
            &mut solver_bodies,
            &mut contact_constraints,
            &mut joint_constraints,
            self.config.solver_iterations.max(1),
        );

        // Velocities back to the arena. A sleeping body nudged hard enough
        // by the solver wakes; below that, it stays put at zero velocity.
        let wake_linear = self.sleep.linear_threshold * SleepParams::WAKE_FACTOR;
        let wake_angular = self.sleep.angular_threshold * SleepParams::WAKE_FACTOR;
        for (solver_body, &(slot, generation)) in solver_bodies.iter().zip(&slots) {
            let Some(body) = self.bodies.get_at_mut(slot) else {
                continue;
            };
            if body.sleeping {
                if solver_body.linear.length() > wake_linear
                    || solver_body.angular.length() > wake_angular
                {
                    body.wake();
                    body.linear_velocity = solver_body.linear;
                    body.angular_velocity = solver_body.angular;
                    events.push(Event::BodyWoke(BodyHandle {
                        index: slot,
                        generation,
                    }));
                }
            } else {
                body.linear_velocity = solver_body.linear;
                body.angular_velocity = solver_body.angular;
            }
        }

        // Joint warm-start storage and per-step breaking accumulation.
        for constraint in joint_constraints {
            let (index, impulses, magnitude) = constraint.into_result();
            if let Some(joint) = self.joints.get_at_mut(index) {
                joint.impulses = impulses;
                joint.step_impulse += magnitude;
            }
        }

        for (index, generation, body) in self.bodies.iter_mut() {
            if body.is_sleeping() {
                continue;
            }
            body.integrate_pose(dt);
            if body.has_numerical_fault() {
                warn!(
                    body = index,
                    "non-finite state detected; stopping body and forcing sleep"
                );
                body.put_to_sleep();
                events.push(Event::NumericalFault(BodyHandle { index, generation }));
            }
        }
    }

    /// Broad phase plus narrow phase: candidate pairs from the AABB sweep,
    /// filtered, then the analytic per-pair tests. Pair order is the
    /// deterministic broad-phase order.
    fn find_contacts(&self, skip_pairs: &HashSet<(u32, u32)>) -> Vec<(u32, u32, Contact)> {
        let mut aabbs = compute_aabbs(&self.bodies);
        let pairs = sweep_pairs(&mut aabbs);

        let candidates: Vec<(u32, u32)> = pairs
            .into_iter()
            .filter(|&(a, b)| {
                if skip_pairs.contains(&(a, b)) {
                    return false;
                }
                let (Some(body_a), Some(body_b)) =
                    (self.bodies.get_at(a), self.bodies.get_at(b))
                else {
                    return false;
                };
                // At least one side must be awake and Active; nothing else
                // can gain velocity from the pair.
                let awake_active = |body: &RigidBody| {
                    body.kind() == BodyKind::Active && !body.is_sleeping()
                };
                awake_active(body_a) || awake_active(body_b)
            })
            .collect();

        let contacts: Vec<(u32, u32, Contact)>;
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            // Order-preserving parallel collect keeps the contact list
            // deterministic.
            contacts = candidates
                .par_iter()
                .filter_map(|&(a, b)| {
                    let body_a = self.bodies.get_at(a)?;
                    let body_b = self.bodies.get_at(b)?;
                    collide(body_a, body_b).map(|contact| (a, b, contact))
                })
                .collect();
        }
        #[cfg(not(feature = "parallel"))]
        {
            contacts = candidates
                .into_iter()
                .filter_map(|(a, b)| {
                    let body_a = self.bodies.get_at(a)?;
                    let body_b = self.bodies.get_at(b)?;
                    collide(body_a, body_b).map(|contact| (a, b, contact))
                })
                .collect();
        }
        contacts
    }

    /// One-way breaking transition: a joint whose equality-row impulse over
    /// this step exceeded its threshold is disabled permanently.
    fn check_breaking(&mut self, events: &mut Vec<Event>) {
        for (index, generation, joint) in self.joints.iter_mut() {
            if joint.enabled {
                if let Some(threshold) = joint.breaking_threshold {
                    if joint.step_impulse > threshold {
                        joint.enabled = false;
                        joint.reset_warm_start();
                        debug!(joint = index, impulse = joint.step_impulse, "joint broke");
                        events.push(Event::JointBroken(JointHandle { index, generation }));
                    }
                }
            }
            joint.step_impulse = 0.0;
        }
    }

    /// Put Active bodies to sleep after enough consecutive low-motion steps.
    fn sleep_pass(&mut self, events: &mut Vec<Event>) {
        let params = self.sleep;
        for (index, generation, body) in self.bodies.iter_mut() {
            if body.kind() != BodyKind::Active || body.sleeping {
                continue;
            }
            let resting = body.linear_velocity.length() < params.linear_threshold
                && body.angular_velocity.length() < params.angular_threshold;
            if resting {
                body.low_motion_steps += 1;
                if body.low_motion_steps >= params.steps_to_sleep {
                    body.put_to_sleep();
                    events.push(Event::BodySlept(BodyHandle { index, generation }));
                }
            } else {
                body.low_motion_steps = 0;
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
