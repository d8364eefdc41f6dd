use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileCylinderConfig, FilePullConfig};
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use comref::core::geometry::SimBox;
use comref::engine::config::{self as core_config, PullConfig, PullConfigBuilder};
use nalgebra::Vector3;
use std::str::FromStr;
use tracing::debug;

/// Everything a command needs to set up a pull reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub masses: Vec<f64>,
    pub sim_box: SimBox,
    pub pull: PullConfig,
}

pub fn build_config(args: &ConfigArgs) -> Result<AppConfig> {
    let file_config = FileConfig::from_file(&args.config)?;
    merge_config(file_config, args)
}

fn merge_config(file_config: FileConfig, args: &ConfigArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let system = file_config
        .system
        .take()
        .ok_or_else(|| CliError::Config("`system` section is required.".to_string()))?;
    let box_size = system
        .box_size
        .as_ref()
        .ok_or_else(|| CliError::Config("`system.box` is required.".to_string()))?
        .resolve()?;
    let sim_box = SimBox::rectangular(Vector3::from(box_size))
        .map_err(|e| CliError::Config(e.to_string()))?;

    let reference = file_config
        .reference
        .take()
        .ok_or_else(|| CliError::Config("`reference` section is required.".to_string()))?;

    let pull_file = file_config.pull.take().unwrap_or_default();
    let history_depth = args
        .history_depth
        .or(pull_file.history_depth)
        .unwrap_or(defaults.history_depth);

    let mut builder = PullConfigBuilder::new()
        .reference(reference.into())
        .pull_groups(file_config.pull_groups.into_iter().map(Into::into).collect())
        .history_depth(history_depth)
        .pulled_dims(pull_file.pulled_dims.unwrap_or(defaults.pulled_dims));
    builder = merge_geometry(builder, pull_file.cylinder)?;

    let pull = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Final pull configuration: {:?}", pull);

    Ok(AppConfig {
        masses: system.masses,
        sim_box,
        pull,
    })
}

fn merge_geometry(
    builder: PullConfigBuilder,
    cylinder: Option<FileCylinderConfig>,
) -> Result<PullConfigBuilder> {
    let Some(c) = cylinder else {
        return Ok(builder.geometry(core_config::ReferenceGeometry::Static));
    };
    let core_radius = c.core_radius.ok_or_else(|| {
        CliError::Config("`pull.cylinder` requires `core-radius`".to_string())
    })?;
    let cutoff = c
        .cutoff
        .ok_or_else(|| CliError::Config("`pull.cylinder` requires `cutoff`".to_string()))?;
    Ok(builder.cylinder(core_radius, cutoff))
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_assignment(kv_pair).map_err(|e| CliError::Argument(e.to_string()))?;
        let pull = config.pull.get_or_insert_with(FilePullConfig::default);

        match key {
            "pull.history-depth" => {
                pull.history_depth = Some(parse_value(key, value, "integer")?);
            }
            "pull.cylinder.core-radius" => {
                pull.cylinder
                    .get_or_insert_with(Default::default)
                    .core_radius = Some(parse_value(key, value, "float")?);
            }
            "pull.cylinder.cutoff" => {
                pull.cylinder.get_or_insert_with(Default::default).cutoff =
                    Some(parse_value(key, value, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
