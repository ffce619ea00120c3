//! Trajectory simulation system.
//!
//! One [`TrajectorySimulator`] is attached to one host object (the parent).
//! While idle it keeps re-capturing the parent's position as the rest
//! position; while active it advances the parent, and optionally every
//! other member of the parent's group, along a ballistic trajectory that
//! rebounds off the ground.
//!
//! The parent owns the rebound budget and drives the idle/active state
//! machine. Followers integrate with their own vertical velocity and
//! rebound indefinitely; they are only snapped back when the parent
//! relaunches or is deactivated.

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::game::config::TrajectoryConfig;
use crate::game::error::{ModuleDataError, TrajectoryError};
use crate::game::persistence::{self, ModuleData};
use crate::game::state::TrajectoryState;
use crate::physics::{BallisticsParams, BodyStep, TrajectoryBody};
use crate::world::{FrameContext, ObjectId, TrajectoryHost};

/// What happened when the parent touched the ground this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Rebounded and keeps going. `remaining` is the budget left
    /// (negative when unlimited).
    Rebounded { remaining: i32 },
    /// Budget exhausted without repeat: frozen in place and now idle.
    Stopped,
    /// Budget exhausted with repeat: back at the rest position, relaunched.
    Relaunched,
}

/// Result of one [`TrajectorySimulator::update`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Idle: the parent's position was captured as the rest position.
    RestCaptured(Vec3),
    /// Active, but the host is paused or the layer is hidden.
    Frozen,
    /// One integration step ran.
    Stepped {
        /// Parent position after the step (and any relaunch).
        position: Vec3,
        /// Ground contact of the parent, if any.
        contact: Option<ContactEvent>,
        /// Group-follow applied but the captured follower data no longer
        /// lines up with the group, so followers were left where they are.
        followers_skipped: bool,
    },
}

/// Per-object ballistic motion module.
///
/// Config fields are public so an editor can change them live; the
/// transient state is read through [`state`](Self::state) and only changed
/// via the activation commands, group-follow primitives and import.
#[derive(Debug, Clone)]
pub struct TrajectorySimulator {
    parent: ObjectId,
    /// User-editable parameters.
    pub config: TrajectoryConfig,
    state: TrajectoryState,
}

impl TrajectorySimulator {
    /// Create an idle simulator for `parent` with default parameters.
    pub fn new(parent: ObjectId) -> Self {
        Self::with_config(parent, TrajectoryConfig::default())
    }

    /// Create an idle simulator for `parent` with the given parameters.
    pub fn with_config(parent: ObjectId, config: TrajectoryConfig) -> Self {
        Self {
            parent,
            config,
            state: TrajectoryState::new(),
        }
    }

    /// The host object this module is attached to.
    pub fn parent(&self) -> ObjectId {
        self.parent
    }

    pub fn state(&self) -> &TrajectoryState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    // ========================================================================
    // FRAME UPDATE
    // ========================================================================

    /// Drive the module for one host frame.
    ///
    /// Idle: re-captures the rest position. Active and paused/hidden: no-op.
    /// Otherwise advances followers, then the parent, by
    /// `frame.delta * time_speed` seconds.
    ///
    /// Followers with nothing captured yet (group-follow switched on while
    /// active, or a save without follower data) are captured at their
    /// current positions first. If the captured data does not line up with
    /// the group, the followers are not touched and the outcome reports
    /// `followers_skipped`; the parent keeps going either way.
    pub fn update<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
        frame: FrameContext,
    ) -> Result<FrameOutcome, TrajectoryError> {
        let position = self.parent_position(&*host)?;

        if !self.state.active {
            self.state.rest_position = position;
            return Ok(FrameOutcome::RestCaptured(position));
        }
        if frame.is_frozen() {
            return Ok(FrameOutcome::Frozen);
        }

        let dt = frame.delta * self.config.time_speed;
        let params = self.config.ballistics();

        let mut followers = None;
        let mut followers_skipped = false;
        if let Some(siblings) = self.follower_group(&*host) {
            if self.nothing_captured() {
                self.capture_siblings(&*host, &siblings)?;
            }
            if self.check_followers(&siblings).is_ok() {
                let positions = sibling_positions(&*host, &siblings)?;
                self.step_followers(host, &siblings, positions, &params, dt);
                followers = Some(siblings);
            } else {
                followers_skipped = true;
            }
        }

        let mut body = TrajectoryBody::new(position, self.state.vertical_velocity);
        let step = body.step(&params, dt, &*host);
        self.state.vertical_velocity = body.vertical_velocity;
        host.set_position(self.parent, body.position);

        let contact = match step {
            BodyStep::Airborne => None,
            BodyStep::Rebounded { .. } => {
                Some(self.on_parent_contact(host, body.is_settled(), followers.as_deref()))
            }
        };

        let position = match contact {
            Some(ContactEvent::Relaunched) => self.state.rest_position,
            _ => body.position,
        };
        Ok(FrameOutcome::Stepped {
            position,
            contact,
            followers_skipped,
        })
    }

    fn step_followers<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
        siblings: &[ObjectId],
        positions: Vec<Vec3>,
        params: &BallisticsParams,
        dt: f32,
    ) {
        let followers = siblings
            .iter()
            .zip(positions)
            .zip(self.state.follower_velocities.iter_mut());

        for ((&id, position), velocity) in followers {
            let mut body = TrajectoryBody::new(position, *velocity);
            body.step(params, dt, &*host);
            *velocity = body.vertical_velocity;
            host.set_position(id, body.position);
        }
    }

    /// Rebound budget bookkeeping after the parent touched the ground.
    /// `followers` is only given when they are in sync with the group.
    fn on_parent_contact<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
        settled: bool,
        followers: Option<&[ObjectId]>,
    ) -> ContactEvent {
        if self.state.remaining_rebounds > 0 {
            self.state.remaining_rebounds -= 1;
            return ContactEvent::Rebounded {
                remaining: self.state.remaining_rebounds,
            };
        }

        if self.state.remaining_rebounds != 0 && !settled {
            return ContactEvent::Rebounded {
                remaining: self.state.remaining_rebounds,
            };
        }

        if !self.config.repeat_on_finish {
            self.state.active = false;
            debug!(parent = %self.parent, "trajectory finished, stopping");
            return ContactEvent::Stopped;
        }

        host.set_position(self.parent, self.state.rest_position);
        self.state.remaining_rebounds = self.config.rebound_count;
        self.state.vertical_velocity = self.config.initial_speed.y;
        if let Some(siblings) = followers {
            self.restore_follower_positions(host, siblings);
            self.restore_follower_velocities();
        }
        debug!(parent = %self.parent, "trajectory finished, relaunching");
        ContactEvent::Relaunched
    }

    // ========================================================================
    // ACTIVATION
    // ========================================================================

    /// Start the simulation from the parent's current position.
    ///
    /// Freezes the rest position, loads the rebound budget and launch speed,
    /// and captures the followers when group-follow applies. No-op if
    /// already active.
    pub fn activate<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<(), TrajectoryError> {
        if self.state.active {
            return Ok(());
        }

        let position = self.parent_position(&*host)?;
        let captured = self.capture_followers(&*host)?;

        self.state.rest_position = position;
        self.state.remaining_rebounds = self.config.rebound_count;
        self.state.vertical_velocity = self.config.initial_speed.y;
        self.state.active = true;

        debug!(parent = %self.parent, followers = captured, "trajectory activated");
        Ok(())
    }

    /// Stop the simulation and put the parent (and followers) back at rest.
    /// No-op if already idle.
    ///
    /// The parent always goes back to rest and the module always ends up
    /// idle. Followers whose captured data no longer lines up with the group
    /// are left in place and the mismatch is returned.
    pub fn deactivate<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<(), TrajectoryError> {
        if !self.state.active {
            return Ok(());
        }

        host.set_position(self.parent, self.state.rest_position);
        self.state.active = false;
        debug!(parent = %self.parent, "trajectory deactivated");

        let Some(siblings) = self.follower_group(&*host) else {
            return Ok(());
        };
        if self.nothing_captured() {
            return Ok(());
        }
        self.check_followers(&siblings)?;
        self.restore_follower_positions(host, &siblings);
        self.restore_follower_velocities();
        Ok(())
    }

    /// Flip between idle and active. Returns the new active flag.
    pub fn toggle_active<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<bool, TrajectoryError> {
        if self.state.active {
            self.deactivate(host)?;
        } else {
            self.activate(host)?;
        }
        Ok(self.state.active)
    }

    pub fn toggle_repeat(&mut self) {
        self.config.toggle_repeat();
    }

    /// Turn group-follow on or off. Turning it on captures the followers.
    pub fn set_group_follows<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &mut H,
        enabled: bool,
    ) -> Result<(), TrajectoryError> {
        let was_enabled = self.config.group_follows;
        self.config.group_follows = enabled;
        if enabled && !was_enabled {
            if let Err(e) = self.capture_followers(&*host) {
                self.config.group_follows = was_enabled;
                return Err(e);
            }
        }
        Ok(())
    }

    // ========================================================================
    // GROUP FOLLOW
    // ========================================================================

    /// Record every sibling's current position and give each the launch
    /// speed `initial_speed.y`. Returns the number of followers captured,
    /// zero when group-follow does not apply.
    pub fn capture_followers<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &H,
    ) -> Result<usize, TrajectoryError> {
        match self.follower_group(host) {
            Some(siblings) => self.capture_siblings(host, &siblings),
            None => Ok(0),
        }
    }

    fn capture_siblings<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &H,
        siblings: &[ObjectId],
    ) -> Result<usize, TrajectoryError> {
        let positions = sibling_positions(host, siblings)?;
        self.state.follower_velocities = vec![self.config.initial_speed.y; positions.len()];
        self.state.follower_rest_positions = positions;

        debug!(parent = %self.parent, followers = siblings.len(), "captured followers");
        Ok(siblings.len())
    }

    /// Move every sibling back to its captured position. Velocities are
    /// left alone.
    pub fn reset_follower_positions<H: TrajectoryHost + ?Sized>(
        &self,
        host: &mut H,
    ) -> Result<(), TrajectoryError> {
        let Some(siblings) = self.follower_group(&*host) else {
            return Ok(());
        };
        self.check_followers(&siblings)?;
        self.restore_follower_positions(host, &siblings);
        Ok(())
    }

    /// Give every follower the launch speed `initial_speed.y` again.
    /// Positions are left alone.
    pub fn reset_follower_velocities<H: TrajectoryHost + ?Sized>(
        &mut self,
        host: &H,
    ) -> Result<(), TrajectoryError> {
        let Some(siblings) = self.follower_group(host) else {
            return Ok(());
        };
        self.check_followers(&siblings)?;
        self.restore_follower_velocities();
        Ok(())
    }

    /// Siblings that follow the parent, or `None` when group-follow is off,
    /// the parent has no group, or it is not the group root.
    fn follower_group<H: TrajectoryHost + ?Sized>(&self, host: &H) -> Option<Vec<ObjectId>> {
        if !self.config.group_follows || !host.is_group_root(self.parent) {
            return None;
        }
        host.group_siblings(self.parent)
    }

    fn nothing_captured(&self) -> bool {
        self.state.follower_rest_positions.is_empty() && self.state.follower_velocities.is_empty()
    }

    fn check_followers(&self, siblings: &[ObjectId]) -> Result<(), TrajectoryError> {
        if self.state.followers_aligned(siblings.len()) {
            return Ok(());
        }
        let err = TrajectoryError::FollowerMismatch {
            captured: self.state.follower_rest_positions.len(),
            velocities: self.state.follower_velocities.len(),
            siblings: siblings.len(),
        };
        warn!(parent = %self.parent, "{err}");
        Err(err)
    }

    fn restore_follower_positions<H: TrajectoryHost + ?Sized>(
        &self,
        host: &mut H,
        siblings: &[ObjectId],
    ) {
        for (&id, &rest) in siblings.iter().zip(&self.state.follower_rest_positions) {
            host.set_position(id, rest);
        }
    }

    fn restore_follower_velocities(&mut self) {
        let launch = self.config.initial_speed.y;
        self.state.follower_velocities.fill(launch);
    }

    fn parent_position<H: TrajectoryHost + ?Sized>(&self, host: &H) -> Result<Vec3, TrajectoryError> {
        host.position(self.parent)
            .ok_or(TrajectoryError::UnknownObject(self.parent))
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Full state-preserving export of config and state.
    pub fn export(&self) -> ModuleData {
        persistence::export_module(&self.config, &self.state)
    }

    /// Export only the config keys, for copying parameters between objects.
    pub fn export_config(&self) -> ModuleData {
        let mut data = ModuleData::new();
        persistence::export_config(&self.config, &mut data);
        data
    }

    /// Apply a persisted map. Missing keys keep their current values; any
    /// malformed value rejects the whole map and changes nothing.
    pub fn import(&mut self, data: &ModuleData) -> Result<(), ModuleDataError> {
        persistence::import_module(data, &mut self.config, &mut self.state)?;
        info!(
            parent = %self.parent,
            keys = data.len(),
            active = self.state.active,
            "imported module data"
        );
        Ok(())
    }
}

fn sibling_positions<H: TrajectoryHost + ?Sized>(
    host: &H,
    siblings: &[ObjectId],
) -> Result<Vec<Vec3>, TrajectoryError> {
    siblings
        .iter()
        .map(|&id| host.position(id).ok_or(TrajectoryError::UnknownObject(id)))
        .collect()
}

static_assertions::assert_impl_all!(TrajectorySimulator: Send, Sync, Clone);
static_assertions::assert_impl_all!(TrajectoryConfig: Copy, Send, Sync);
