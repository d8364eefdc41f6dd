use crate::core::models::{GroupError, IndexGroup};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' is not a valid radius: {value}")]
    InvalidRadius { name: &'static str, value: f64 },

    #[error("Core radius ({core_radius}) must be smaller than the cutoff radius ({cutoff})")]
    SwitchRadii { core_radius: f64, cutoff: f64 },

    #[error("History depth must be at least 1")]
    ZeroHistoryDepth,

    #[error("Cylinder mode requires at least one pull group")]
    NoPullGroups,

    #[error(transparent)]
    Group(#[from] GroupError),
}

/// Radii of the switching region around each pull group's axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    /// Atoms closer than this carry full weight.
    pub core_radius: f64,
    /// Atoms at or beyond this are excluded.
    pub cutoff: f64,
}

impl CylinderParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.core_radius.is_finite() && self.core_radius >= 0.0) {
            return Err(ConfigError::InvalidRadius {
                name: "core_radius",
                value: self.core_radius,
            });
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(ConfigError::InvalidRadius {
                name: "cutoff",
                value: self.cutoff,
            });
        }
        if self.core_radius >= self.cutoff {
            return Err(ConfigError::SwitchRadii {
                core_radius: self.core_radius,
                cutoff: self.cutoff,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceGeometry {
    /// One reference COM computed from the whole reference group.
    Static,
    /// One local, distance-weighted reference per pull group.
    Cylinder(CylinderParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullConfig {
    pub reference: IndexGroup,
    pub pull_groups: Vec<IndexGroup>,
    /// Number of samples in each running average. A depth of 1 disables smoothing.
    pub history_depth: usize,
    pub geometry: ReferenceGeometry,
    /// Dimensions along which pulling acts; only used to decide what gets logged.
    pub pulled_dims: [bool; 3],
}

impl PullConfig {
    pub fn cylinder(&self) -> Option<&CylinderParams> {
        match &self.geometry {
            ReferenceGeometry::Cylinder(params) => Some(params),
            ReferenceGeometry::Static => None,
        }
    }

    pub fn uses_running_average(&self) -> bool {
        self.history_depth > 1
    }
}

#[derive(Default)]
pub struct PullConfigBuilder {
    reference: Option<IndexGroup>,
    pull_groups: Vec<IndexGroup>,
    history_depth: Option<usize>,
    geometry: Option<ReferenceGeometry>,
    pulled_dims: Option<[bool; 3]>,
}

impl PullConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(mut self, group: IndexGroup) -> Self {
        self.reference = Some(group);
        self
    }
    pub fn pull_group(mut self, group: IndexGroup) -> Self {
        self.pull_groups.push(group);
        self
    }
    pub fn pull_groups(mut self, groups: Vec<IndexGroup>) -> Self {
        self.pull_groups = groups;
        self
    }
    pub fn history_depth(mut self, depth: usize) -> Self {
        self.history_depth = Some(depth);
        self
    }
    pub fn geometry(mut self, geometry: ReferenceGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
    pub fn cylinder(self, core_radius: f64, cutoff: f64) -> Self {
        self.geometry(ReferenceGeometry::Cylinder(CylinderParams {
            core_radius,
            cutoff,
        }))
    }
    pub fn pulled_dims(mut self, dims: [bool; 3]) -> Self {
        self.pulled_dims = Some(dims);
        self
    }

    pub fn build(self) -> Result<PullConfig, ConfigError> {
        let reference = self
            .reference
            .ok_or(ConfigError::MissingParameter("reference"))?;
        let history_depth = self
            .history_depth
            .ok_or(ConfigError::MissingParameter("history_depth"))?;
        let geometry = self
            .geometry
            .ok_or(ConfigError::MissingParameter("geometry"))?;

        if history_depth == 0 {
            return Err(ConfigError::ZeroHistoryDepth);
        }
        reference.check_structure()?;
        for group in &self.pull_groups {
            group.check_structure()?;
        }
        if let ReferenceGeometry::Cylinder(params) = &geometry {
            params.validate()?;
            if self.pull_groups.is_empty() {
                return Err(ConfigError::NoPullGroups);
            }
        }

        Ok(PullConfig {
            reference,
            pull_groups: self.pull_groups,
            history_depth,
            geometry,
            pulled_dims: self.pulled_dims.unwrap_or([true; 3]),
        })
    }
}
