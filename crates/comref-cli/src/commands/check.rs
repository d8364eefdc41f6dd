use crate::cli::CheckArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use comref::engine::config::ReferenceGeometry;
use comref::engine::error::PullError;
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Loading configuration from {:?}", &args.config.config);
    let config = build_config(&args.config)?;

    validate(&config)?;
    println!("{}", summarize(&config));
    Ok(())
}

/// Applies the system-dependent checks that building the config cannot do on its own.
fn validate(config: &AppConfig) -> Result<()> {
    config
        .pull
        .reference
        .check_against(&config.masses)
        .map_err(PullError::from)?;
    for group in &config.pull.pull_groups {
        group
            .check_against(&config.masses)
            .map_err(PullError::from)?;
    }
    Ok(())
}

fn summarize(config: &AppConfig) -> String {
    let pull = &config.pull;
    let lengths = config.sim_box.lengths();
    let mut lines = vec![
        format!("System: {} atoms", config.masses.len()),
        format!(
            "Box: {:.3} x {:.3} x {:.3}",
            lengths.x, lengths.y, lengths.z
        ),
        format!(
            "Reference group '{}': {} atoms",
            pull.reference.name,
            pull.reference.len()
        ),
    ];
    for group in &pull.pull_groups {
        lines.push(format!("Pull group '{}': {} atoms", group.name, group.len()));
    }
    lines.push(match pull.geometry {
        ReferenceGeometry::Static => "Reference: static center of mass".to_string(),
        ReferenceGeometry::Cylinder(params) => format!(
            "Reference: cylinder (core radius {}, cutoff {})",
            params.core_radius, params.cutoff
        ),
    });
    lines.push(if pull.uses_running_average() {
        format!("Running average over {} steps", pull.history_depth)
    } else {
        "Running average disabled".to_string()
    });
    lines.join("\n")
}
