use crate::core::com::{CenterOfMass, center_of_mass};
use crate::core::geometry::SimBox;
use crate::engine::config::{PullConfig, ReferenceGeometry};
use crate::engine::dynamic::{DynamicGroup, DynamicGroupBuilder};
use crate::engine::error::PullError;
use crate::engine::history::{EntityId, HistoryBank};
use crate::engine::unwrap::UnwrapTracker;
use nalgebra::Point3;
use tracing::{debug, info, instrument, warn};

/// Reference positions produced by one step.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceSnapshot {
    /// The (smoothed) center of the whole reference group.
    Static(CenterOfMass),
    /// One (smoothed) local center per pull group; `total_mass` is the weighted mass.
    Cylinder(Vec<CenterOfMass>),
}

impl ReferenceSnapshot {
    /// The reference a given pull group is restrained against.
    pub fn for_pull_group(&self, index: usize) -> Option<&CenterOfMass> {
        match self {
            ReferenceSnapshot::Static(com) => Some(com),
            ReferenceSnapshot::Cylinder(coms) => coms.get(index),
        }
    }
}

/// Per-simulation pull reference state.
///
/// The mass table is borrowed from the caller for the lifetime of the simulation.
pub struct PullReference<'a> {
    config: PullConfig,
    masses: &'a [f64],
    tracker: UnwrapTracker,
    history: HistoryBank,
    dynamic: Option<DynamicGroupBuilder>,
    step: u64,
}

impl<'a> PullReference<'a> {
    /// Validates `config` against the system and allocates all per-step state.
    ///
    /// `initial_positions` seeds the unwrap tracker; the first call to
    /// [`advance`](Self::advance) may pass the same frame again.
    pub fn new(
        config: PullConfig,
        masses: &'a [f64],
        initial_positions: &[Point3<f64>],
        sim_box: &SimBox,
    ) -> Result<Self, PullError> {
        let reference_mass = config.reference.check_against(masses)?;
        for group in &config.pull_groups {
            group.check_against(masses)?;
        }
        if initial_positions.len() != masses.len() {
            return Err(PullError::FrameSize {
                expected: masses.len(),
                found: initial_positions.len(),
            });
        }
        if !sim_box.is_rectangular() {
            warn!("Box is not rectangular; only its diagonal is used for periodic corrections.");
        }

        let tracker = UnwrapTracker::new(
            &config.reference.indices,
            initial_positions,
            config.pulled_dims,
        )?;
        let history = HistoryBank::new(config.history_depth, config.pull_groups.len());
        let dynamic = match config.geometry {
            ReferenceGeometry::Static => None,
            ReferenceGeometry::Cylinder(params) => Some(DynamicGroupBuilder::new(
                params,
                config.pull_groups.len(),
                config.reference.len(),
            )),
        };

        info!(
            reference = %config.reference.name,
            atoms = config.reference.len(),
            mass = reference_mass,
            pull_groups = config.pull_groups.len(),
            history_depth = config.history_depth,
            cylinder = dynamic.is_some(),
            "Pull reference initialized"
        );

        Ok(Self {
            config,
            masses,
            tracker,
            history,
            dynamic,
            step: 0,
        })
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    /// Number of completed calls to [`advance`](Self::advance).
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Continuous coordinates of the reference group, in group order.
    pub fn unwrapped_reference(&self) -> &[Point3<f64>] {
        self.tracker.positions()
    }

    pub fn history(&self) -> &HistoryBank {
        &self.history
    }

    /// Local reference groups from the latest step; empty outside cylinder mode.
    pub fn dynamic_groups(&self) -> &[DynamicGroup] {
        match &self.dynamic {
            Some(builder) => builder.groups(),
            None => &[],
        }
    }

    /// Folded centers of mass of the pull groups in `positions`.
    ///
    /// Useful as trial positions for [`advance`](Self::advance) when the caller does not
    /// track the pull groups itself.
    pub fn pull_group_centers(
        &self,
        positions: &[Point3<f64>],
        sim_box: &SimBox,
    ) -> Result<Vec<Point3<f64>>, PullError> {
        self.check_frame(positions)?;
        self.config
            .pull_groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                center_of_mass(positions, &group.indices, self.masses, sim_box)
                    .map(|com| com.position)
                    .ok_or(PullError::DegenerateMass {
                        entity: EntityId::PullGroup(i),
                        step: self.step,
                    })
            })
            .collect()
    }

    /// Runs one step of reference bookkeeping.
    ///
    /// `trial_positions` holds the current position of every pull group and is only read
    /// in cylinder mode.
    ///
    /// On error the step counter, the running averages and the dynamic groups keep the
    /// values of the last successful step. The unwrap tracker has still consumed
    /// `positions`, so the frame may be passed again.
    #[instrument(skip_all, name = "pull_reference_step")]
    pub fn advance(
        &mut self,
        positions: &[Point3<f64>],
        sim_box: &SimBox,
        trial_positions: &[Point3<f64>],
    ) -> Result<ReferenceSnapshot, PullError> {
        self.check_frame(positions)?;
        let step = self.step + 1;
        let smooth = self.config.uses_running_average();

        self.tracker.update(positions, sim_box)?;
        let reference = self
            .tracker
            .center_of_mass(self.masses)
            .ok_or(PullError::DegenerateMass {
                entity: EntityId::Reference,
                step,
            })?;
        debug!(
            step,
            x = reference.position.x,
            y = reference.position.y,
            z = reference.position.z,
            mass = reference.total_mass,
            "Unwrapped reference center"
        );

        let snapshot = match self.dynamic.as_mut() {
            None => {
                let position = if smooth {
                    self.history.push(EntityId::Reference, &reference.position)?
                } else {
                    reference.position
                };
                ReferenceSnapshot::Static(CenterOfMass {
                    position,
                    ..reference
                })
            }
            Some(builder) => {
                let groups = builder.rebuild(
                    self.tracker.indices(),
                    self.tracker.positions(),
                    self.masses,
                    sim_box,
                    trial_positions,
                    step,
                )?;
                let mut centers = Vec::with_capacity(groups.len());
                for (i, group) in groups.iter().enumerate() {
                    let position = if smooth {
                        self.history.push(EntityId::PullGroup(i), &group.center())?
                    } else {
                        group.center()
                    };
                    centers.push(CenterOfMass {
                        position,
                        total_mass: group.weighted_mass(),
                    });
                }
                ReferenceSnapshot::Cylinder(centers)
            }
        };
        self.step = step;
        Ok(snapshot)
    }

    fn check_frame(&self, positions: &[Point3<f64>]) -> Result<(), PullError> {
        if positions.len() != self.masses.len() {
            return Err(PullError::FrameSize {
                expected: self.masses.len(),
                found: positions.len(),
            });
        }
        Ok(())
    }
}
