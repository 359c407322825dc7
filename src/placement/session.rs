//! The placement session: owns a spline, gates recomputation with a dirty
//! flag and drives a full re-placement pass through an [`InstanceHost`].

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::PlacementError;
use super::resolver::{resolve_placement, LaneLayout, PlacementDescriptor};
use crate::prefab::PrefabPalette;
use crate::spline::{
    polyline_length, spline_points, ArcLengthWalker, AttachMode, CatmullRomCurve, ControlPoint,
    SplineSettings, MIN_DISTANCE_BETWEEN_OBJECTS,
};

/// Seed used by [`PlacementSession::new`].
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Lifecycle of a [`PlacementSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Placed instances match the settings.
    Clean,
    /// Settings or control points changed since the last pass.
    #[default]
    Dirty,
    /// A placement pass is running.
    Recomputing,
}

/// Creates and destroys the objects that back placement descriptors.
pub trait InstanceHost {
    /// Handle to a placed object.
    type Instance;

    /// Create an object for a descriptor.
    fn instantiate(&mut self, descriptor: &PlacementDescriptor) -> Self::Instance;

    /// Destroy an object created by a previous pass.
    fn release(&mut self, instance: Self::Instance);
}

/// Host whose instances are the descriptors themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorHost;

impl InstanceHost for DescriptorHost {
    type Instance = PlacementDescriptor;

    fn instantiate(&mut self, descriptor: &PlacementDescriptor) -> PlacementDescriptor {
        descriptor.clone()
    }

    fn release(&mut self, _instance: PlacementDescriptor) {}
}

/// Result of [`compute_placements`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPass {
    /// Descriptors in placement order: by step, then lane left to right.
    pub descriptors: Vec<PlacementDescriptor>,
    /// Number of lanes skipped because no prefab could be selected.
    pub failures: usize,
    /// The most recent selection error, if any.
    pub last_error: Option<PlacementError>,
    /// Polyline length of the walked spline.
    pub length: f32,
}

/// Run the whole placement pipeline for a spline.
///
/// Produces nothing for fewer than two control points. Failed prefab
/// selections skip the affected lane and are counted in the result.
pub fn compute_placements(
    settings: &SplineSettings,
    palette: &PrefabPalette,
    rng: &mut impl Rng,
) -> PlacementPass {
    let mut pass = PlacementPass::default();
    if !settings.is_valid() {
        return pass;
    }

    let positions = settings.positions();
    let curve = CatmullRomCurve::new(&positions, settings.curve_resolution, settings.looped);
    let points = spline_points(curve.samples(), settings.curve_resolution, positions.len());
    pass.length = polyline_length(&points);

    let distance = settings.distance_between_objects;
    debug_assert!(distance >= MIN_DISTANCE_BETWEEN_OBJECTS, "settings are not normalized");
    let lanes = LaneLayout::from_settings(settings);

    for (step_index, step) in ArcLengthWalker::new(&points, distance).enumerate() {
        for lane in lanes.iter() {
            match palette.select(rng) {
                Ok(prefab) => pass
                    .descriptors
                    .push(resolve_placement(settings, step_index, &step, lane, prefab, rng)),
                Err(err) => {
                    pass.failures += 1;
                    pass.last_error = Some(err);
                }
            }
        }
    }

    pass
}

/// A painted spline and the instances placed along it.
///
/// Every mutation marks the session dirty; [`apply_if_dirty`](Self::apply_if_dirty)
/// then rebuilds all instances from scratch. Placement is deterministic: the
/// same settings, palette and seed always produce the same descriptors.
#[derive(Debug, Clone)]
pub struct PlacementSession<I = PlacementDescriptor> {
    settings: SplineSettings,
    palette: PrefabPalette,
    seed: u64,
    state: SessionState,
    instances: Vec<I>,
}

impl<I> Default for PlacementSession<I> {
    fn default() -> Self {
        Self::new(SplineSettings::default(), PrefabPalette::default())
    }
}

impl<I> PlacementSession<I> {
    /// Create a session. It starts dirty so the first trigger places instances.
    pub fn new(mut settings: SplineSettings, palette: PrefabPalette) -> Self {
        settings.normalize();
        Self {
            settings,
            palette,
            seed: DEFAULT_SEED,
            state: SessionState::Dirty,
            instances: Vec::new(),
        }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn settings(&self) -> &SplineSettings {
        &self.settings
    }

    pub fn palette(&self) -> &PrefabPalette {
        &self.palette
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty
    }

    /// Instances placed by the last pass, in placement order.
    pub fn instances(&self) -> &[I] {
        &self.instances
    }

    /// Force a rebuild on the next trigger.
    pub fn mark_dirty(&mut self) {
        self.state = SessionState::Dirty;
    }

    /// Edit the settings in place.
    ///
    /// The settings are normalized afterwards and the session is marked dirty
    /// if anything changed.
    pub fn edit_settings<R>(&mut self, edit: impl FnOnce(&mut SplineSettings) -> R) -> R {
        let before = self.settings.clone();
        let result = edit(&mut self.settings);
        self.settings.normalize();
        if self.settings != before {
            self.mark_dirty();
        }
        result
    }

    /// Replace the settings.
    pub fn set_settings(&mut self, settings: SplineSettings) {
        self.edit_settings(|current| *current = settings);
    }

    /// Edit the prefab palette; marks the session dirty if anything changed.
    pub fn edit_palette<R>(&mut self, edit: impl FnOnce(&mut PrefabPalette) -> R) -> R {
        let before = self.palette.clone();
        let result = edit(&mut self.palette);
        if self.palette != before {
            self.mark_dirty();
        }
        result
    }

    /// Replace the prefab palette.
    pub fn set_palette(&mut self, palette: PrefabPalette) {
        self.edit_palette(|current| *current = palette);
    }

    /// Change the random seed.
    pub fn reseed(&mut self, seed: u64) {
        if self.seed != seed {
            self.seed = seed;
            self.mark_dirty();
        }
    }

    /// Index of the control point closest to `position` under the current attach mode.
    pub fn find_closest_control_point(&self, position: Vec3) -> Option<usize> {
        self.settings
            .find_closest_control_point(position, self.settings.attach_mode)
    }

    /// Add a control point relative to the closest existing one and return its index.
    pub fn add_control_point(&mut self, position: Vec3, attach_mode: AttachMode) -> usize {
        self.mark_dirty();
        self.settings
            .attach_control_point(ControlPoint::new(position), attach_mode)
    }

    /// Insert a control point at the given index.
    pub fn insert_control_point(&mut self, index: usize, point: ControlPoint) -> bool {
        if index > self.settings.control_points.len() {
            return false;
        }
        self.settings.control_points.insert(index, point);
        self.mark_dirty();
        true
    }

    /// Remove the control point at the given index.
    pub fn remove_control_point(&mut self, index: usize) -> Option<ControlPoint> {
        if index >= self.settings.control_points.len() {
            return None;
        }
        self.mark_dirty();
        Some(self.settings.control_points.remove(index))
    }

    /// Move a control point. Only an actual change marks the session dirty.
    pub fn move_control_point(&mut self, index: usize, position: Vec3) -> bool {
        let Some(point) = self.settings.control_points.get_mut(index) else {
            return false;
        };
        if point.position != position {
            point.position = position;
            self.state = SessionState::Dirty;
        }
        true
    }

    /// Set the rotation of a control point. Only an actual change marks the
    /// session dirty.
    pub fn set_control_point_rotation(&mut self, index: usize, rotation: Quat) -> bool {
        let Some(point) = self.settings.control_points.get_mut(index) else {
            return false;
        };
        if point.rotation != rotation {
            point.rotation = rotation;
            self.state = SessionState::Dirty;
        }
        true
    }

    /// Start a new spline: drop all control points and hand back the placed
    /// instances without releasing them, so they stay where they are.
    pub fn new_spline(&mut self) -> Vec<I> {
        self.settings.control_points.clear();
        self.state = SessionState::Clean;
        std::mem::take(&mut self.instances)
    }

    /// Drop all control points and release every placed instance.
    pub fn clear_spline<H>(&mut self, host: &mut H)
    where
        H: InstanceHost<Instance = I>,
    {
        self.settings.control_points.clear();
        self.release_instances(host);
        self.state = SessionState::Clean;
    }

    /// Rebuild all instances if the session is dirty.
    ///
    /// Returns whether a placement pass ran. Safe to call every frame.
    pub fn apply_if_dirty<H>(&mut self, host: &mut H) -> bool
    where
        H: InstanceHost<Instance = I>,
    {
        if self.state != SessionState::Dirty {
            return false;
        }

        self.state = SessionState::Recomputing;
        self.release_instances(host);

        if self.settings.is_valid() {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            let pass = compute_placements(&self.settings, &self.palette, &mut rng);

            if let Some(err) = pass.last_error {
                warn!("Skipped {} spline placements: {}", pass.failures, err);
            }

            self.instances = pass
                .descriptors
                .iter()
                .map(|descriptor| host.instantiate(descriptor))
                .collect();

            debug!(
                "Placed {} instances along {:.2} units of spline",
                self.instances.len(),
                pass.length
            );
        }

        self.state = SessionState::Clean;
        true
    }

    fn release_instances<H>(&mut self, host: &mut H)
    where
        H: InstanceHost<Instance = I>,
    {
        for instance in self.instances.drain(..) {
            host.release(instance);
        }
    }
}
