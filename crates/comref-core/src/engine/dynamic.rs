use super::config::CylinderParams;
use super::error::PullError;
use super::history::EntityId;
use crate::core::com::normalize;
use crate::core::geometry::SimBox;
use crate::core::switching::switching_weight;
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument, trace};

/// The local reference group of one pull group, as selected at the latest rebuild.
#[derive(Debug, Clone, Default)]
pub struct DynamicGroup {
    indices: Vec<usize>,
    weights: Vec<f64>,
    center: Point3<f64>,
    weighted_mass: f64,
    selected_mass: f64,
}

impl DynamicGroup {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn reset(&mut self) {
        self.indices.clear();
        self.weights.clear();
        self.center = Point3::origin();
        self.weighted_mass = 0.0;
        self.selected_mass = 0.0;
    }

    /// Particle indices of the selected atoms, in reference-group order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Switching weight of each selected atom, parallel to [`Self::indices`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted center of mass, in the unwrapped frame of the reference group.
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Sum of `mass * weight` over the selected atoms.
    pub fn weighted_mass(&self) -> f64 {
        self.weighted_mass
    }

    /// Sum of the plain masses of the selected atoms.
    pub fn selected_mass(&self) -> f64 {
        self.selected_mass
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Rebuilds a cylindrical local reference group for every pull group each step.
///
/// Buffers are sized for the whole reference group when the builder is created and only
/// cleared afterwards. Groups are built into a scratch set that replaces the published
/// set only when every group succeeds, so a failed rebuild leaves the previous groups.
#[derive(Debug, Clone)]
pub struct DynamicGroupBuilder {
    params: CylinderParams,
    groups: Vec<DynamicGroup>,
    scratch: Vec<DynamicGroup>,
}

impl DynamicGroupBuilder {
    pub fn new(params: CylinderParams, n_pull_groups: usize, reference_size: usize) -> Self {
        let allocate = || {
            (0..n_pull_groups)
                .map(|_| DynamicGroup::with_capacity(reference_size))
                .collect()
        };
        Self {
            params,
            groups: allocate(),
            scratch: allocate(),
        }
    }

    pub fn params(&self) -> &CylinderParams {
        &self.params
    }

    pub fn groups(&self) -> &[DynamicGroup] {
        &self.groups
    }

    /// Selects, weights and centers the reference atoms around each trial position.
    ///
    /// `reference_indices[k]` is the particle whose unwrapped position is `unwrapped[k]`.
    /// Distances are measured in the x-y plane only. `step` is used for error context.
    #[instrument(skip_all, name = "dynamic_group_rebuild", fields(step = step))]
    pub fn rebuild(
        &mut self,
        reference_indices: &[usize],
        unwrapped: &[Point3<f64>],
        masses: &[f64],
        sim_box: &SimBox,
        trial_positions: &[Point3<f64>],
        step: u64,
    ) -> Result<&[DynamicGroup], PullError> {
        if trial_positions.len() != self.groups.len() {
            return Err(PullError::TrialPositionCount {
                expected: self.groups.len(),
                found: trial_positions.len(),
            });
        }
        let CylinderParams {
            core_radius,
            cutoff,
        } = self.params;

        for (i, (group, trial)) in self.scratch.iter_mut().zip(trial_positions).enumerate() {
            group.reset();
            let mut weighted_sum = Vector3::zeros();

            for (&idx, pos) in reference_indices.iter().zip(unwrapped) {
                let dr = sim_box.cylinder_distance(pos, trial);
                if dr < cutoff {
                    let mass = masses[idx];
                    let weight = switching_weight(dr, core_radius, cutoff);
                    trace!(group = i, atom = idx, dr, weight, "Selected reference atom");

                    weighted_sum += pos.coords * (mass * weight);
                    group.weighted_mass += mass * weight;
                    group.selected_mass += mass;
                    group.indices.push(idx);
                    group.weights.push(weight);
                }
            }

            let com = normalize(weighted_sum, group.weighted_mass).ok_or(
                PullError::DegenerateMass {
                    entity: EntityId::PullGroup(i),
                    step,
                },
            )?;
            group.center = com.position;

            debug!(
                group = i,
                atoms = group.len(),
                x = group.center.x,
                y = group.center.y,
                z = group.center.z,
                weighted_mass = group.weighted_mass,
                mass = group.selected_mass,
                "Built local reference group"
            );
        }
        std::mem::swap(&mut self.groups, &mut self.scratch);
        Ok(&self.groups)
    }
}
