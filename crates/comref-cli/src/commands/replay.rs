use crate::cli::ReplayArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use comref::core::io::frames::{Frame, load_frames};
use comref::workflows::reference::{PullReference, ReferenceSnapshot};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct ReferenceRow<'a> {
    step: u64,
    entity: &'a str,
    x: f64,
    y: f64,
    z: f64,
    mass: f64,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    info!("Loading configuration from {:?}", &args.config.config);
    let config = build_config(&args.config)?;

    info!("Loading trajectory from {:?}", &args.trajectory);
    let frames = load_frames(&args.trajectory)?;
    if frames.is_empty() {
        return Err(CliError::FileParsing {
            path: args.trajectory.clone(),
            source: anyhow::anyhow!("trajectory contains no frames"),
        });
    }

    let rows = match &args.output {
        Some(path) => {
            let rows = replay(&config, &frames, BufWriter::new(File::create(path)?))?;
            info!("Wrote {} rows to {:?}", rows, path);
            rows
        }
        None => replay(&config, &frames, io::stdout().lock())?,
    };
    info!("Replayed {} frames ({} rows).", frames.len(), rows);
    Ok(())
}

/// Drives a pull reference over `frames` and writes one CSV row per reference per frame.
///
/// Returns the number of data rows written.
pub fn replay<W: Write>(config: &AppConfig, frames: &[Frame], writer: W) -> Result<usize> {
    let Some(first) = frames.first() else {
        return Ok(0);
    };
    let sim_box = &config.sim_box;
    let mut reference = PullReference::new(
        config.pull.clone(),
        &config.masses,
        &first.positions,
        sim_box,
    )?;
    let cylinder = config.pull.cylinder().is_some();
    let mut out = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for frame in frames {
        let trials = if cylinder {
            reference.pull_group_centers(&frame.positions, sim_box)?
        } else {
            Vec::new()
        };
        let snapshot = reference.advance(&frame.positions, sim_box, &trials)?;

        let labelled: Vec<_> = match &snapshot {
            ReferenceSnapshot::Static(com) => vec![(config.pull.reference.name.as_str(), com)],
            ReferenceSnapshot::Cylinder(coms) => config
                .pull
                .pull_groups
                .iter()
                .map(|g| g.name.as_str())
                .zip(coms)
                .collect(),
        };
        for (entity, com) in labelled {
            out.serialize(ReferenceRow {
                step: frame.step,
                entity,
                x: com.position.x,
                y: com.position.y,
                z: com.position.z,
                mass: com.total_mass,
            })?;
            rows += 1;
        }
    }
    out.flush()?;

    if rows == 0 {
        warn!("Replay finished without producing any reference rows.");
    }
    Ok(rows)
}
