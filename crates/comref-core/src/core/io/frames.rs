use nalgebra::Point3;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Frame {frame} is malformed: {message}")]
    Malformed { frame: u64, message: String },
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    frame: u64,
    atom: usize,
    x: f64,
    y: f64,
    z: f64,
}

/// Coordinates of every atom at one sampled step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub step: u64,
    pub positions: Vec<Point3<f64>>,
}

/// Reads frames from a CSV table with the header `frame,atom,x,y,z`.
///
/// Rows of one frame must be contiguous. Within a frame every atom from 0 up to the
/// atom count must appear exactly once, in any order, and all frames must hold the
/// same number of atoms. Coordinates must be finite.
pub fn load_frames(path: &Path) -> Result<Vec<Frame>, FrameLoadError> {
    let display = path.to_string_lossy().to_string();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| FrameLoadError::Csv {
            path: display.clone(),
            source: e,
        })?;
    collect_frames(reader, &display)
}

pub fn read_frames(source: impl Read) -> Result<Vec<Frame>, FrameLoadError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    collect_frames(reader, "<reader>")
}

fn collect_frames<R: Read>(
    mut reader: csv::Reader<R>,
    path: &str,
) -> Result<Vec<Frame>, FrameLoadError> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut finished: HashSet<u64> = HashSet::new();
    let mut current: Option<(u64, Vec<(usize, Point3<f64>)>)> = None;

    for result in reader.deserialize::<FrameRecord>() {
        let record = result.map_err(|e| FrameLoadError::Csv {
            path: path.to_string(),
            source: e,
        })?;

        if current.as_ref().is_some_and(|(step, _)| *step != record.frame) {
            if let Some((step, rows)) = current.take() {
                frames.push(finish_frame(step, rows, &frames)?);
                finished.insert(step);
            }
        }
        if finished.contains(&record.frame) {
            return Err(FrameLoadError::Malformed {
                frame: record.frame,
                message: "rows of this frame are not contiguous".to_string(),
            });
        }

        let position = Point3::new(record.x, record.y, record.z);
        if !position.coords.iter().all(|c| c.is_finite()) {
            return Err(FrameLoadError::Malformed {
                frame: record.frame,
                message: format!("atom {} has a non-finite coordinate", record.atom),
            });
        }

        let (_, rows) = current.get_or_insert_with(|| (record.frame, Vec::new()));
        rows.push((record.atom, position));
    }

    if let Some((step, rows)) = current.take() {
        frames.push(finish_frame(step, rows, &frames)?);
    }
    Ok(frames)
}

/// Places the rows of one frame by atom index.
///
/// A frame of n rows must name atoms `0..n`; an index at or beyond n means some
/// smaller index is missing.
fn finish_frame(
    step: u64,
    rows: Vec<(usize, Point3<f64>)>,
    previous: &[Frame],
) -> Result<Frame, FrameLoadError> {
    let n_atoms = rows.len();
    let mut slots: Vec<Option<Point3<f64>>> = vec![None; n_atoms];
    for (atom, position) in rows {
        let Some(slot) = slots.get_mut(atom) else {
            continue;
        };
        if slot.is_some() {
            return Err(FrameLoadError::Malformed {
                frame: step,
                message: format!("atom {} appears more than once", atom),
            });
        }
        *slot = Some(position);
    }

    let positions = slots
        .into_iter()
        .enumerate()
        .map(|(atom, slot)| {
            slot.ok_or_else(|| FrameLoadError::Malformed {
                frame: step,
                message: format!("atom {} is missing", atom),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(first) = previous.first() {
        if first.positions.len() != n_atoms {
            return Err(FrameLoadError::Malformed {
                frame: step,
                message: format!(
                    "holds {} atoms, but frame {} holds {}",
                    n_atoms,
                    first.step,
                    first.positions.len()
                ),
            });
        }
    }
    Ok(Frame { step, positions })
}
