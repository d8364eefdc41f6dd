use super::error::PullError;
use crate::core::com::{CenterOfMass, center_of_mass_contiguous};
use crate::core::geometry::{DIM, SimBox};
use nalgebra::Point3;
use tracing::{debug, instrument};

/// Keeps a continuous copy of the reference group's coordinates across box-image jumps.
///
/// Each step the displacement of every reference atom since the previous step is put
/// under the minimum-image convention and added to its continuous position. This is
/// exact as long as no atom moves more than half a box length between two updates;
/// larger moves are silently mis-unwrapped.
#[derive(Debug, Clone)]
pub struct UnwrapTracker {
    indices: Vec<usize>,
    continuous: Vec<Point3<f64>>,
    last_raw: Vec<Point3<f64>>,
    required_atoms: usize,
    pulled_dims: [bool; 3],
}

impl UnwrapTracker {
    /// Starts tracking `indices` from the coordinates in `positions`.
    pub fn new(
        indices: &[usize],
        positions: &[Point3<f64>],
        pulled_dims: [bool; 3],
    ) -> Result<Self, PullError> {
        let required_atoms = indices.iter().max().map_or(0, |&max| max + 1);
        check_frame_size(required_atoms, positions.len())?;

        let initial: Vec<Point3<f64>> = indices.iter().map(|&idx| positions[idx]).collect();
        Ok(Self {
            indices: indices.to_vec(),
            continuous: initial.clone(),
            last_raw: initial,
            required_atoms,
            pulled_dims,
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Continuous coordinates, one per reference atom in group order.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.continuous
    }

    /// Folds in a new frame of wrapped coordinates and returns the continuous ones.
    #[instrument(skip_all, name = "unwrap_update")]
    pub fn update(
        &mut self,
        positions: &[Point3<f64>],
        sim_box: &SimBox,
    ) -> Result<&[Point3<f64>], PullError> {
        check_frame_size(self.required_atoms, positions.len())?;

        for (rank, &idx) in self.indices.iter().enumerate() {
            let raw = positions[idx];
            for dim in 0..DIM {
                let length = sim_box.length(dim);
                let mut dx = raw[dim] - self.last_raw[rank][dim];
                if dx < -0.5 * length {
                    dx += length;
                    if self.pulled_dims[dim] {
                        debug!(
                            atom = idx,
                            dim,
                            old = self.continuous[rank][dim],
                            "Reference atom jumped +box"
                        );
                    }
                }
                if dx > 0.5 * length {
                    dx -= length;
                    if self.pulled_dims[dim] {
                        debug!(
                            atom = idx,
                            dim,
                            old = self.continuous[rank][dim],
                            "Reference atom jumped -box"
                        );
                    }
                }
                self.continuous[rank][dim] += dx;
            }
            self.last_raw[rank] = raw;
        }
        Ok(&self.continuous)
    }

    /// Center of mass of the continuous coordinates, without any box folding.
    pub fn center_of_mass(&self, masses: &[f64]) -> Option<CenterOfMass> {
        center_of_mass_contiguous(&self.continuous, &self.indices, masses)
    }
}

fn check_frame_size(required: usize, found: usize) -> Result<(), PullError> {
    if found < required {
        return Err(PullError::FrameSize {
            expected: required,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn cube(length: f64) -> SimBox {
        SimBox::rectangular(Vector3::new(length, length, length)).unwrap()
    }

    #[test]
    fn new_copies_the_selected_atoms_in_group_order() {
        let positions = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        let tracker = UnwrapTracker::new(&[2, 0], &positions, [true; 3]).unwrap();
        assert_eq!(
            tracker.positions(),
            &[Point3::new(3.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]
        );
        assert_eq!(tracker.indices(), &[2, 0]);
    }

    #[test]
    fn new_rejects_frame_without_reference_atoms() {
        let positions = vec![Point3::origin(); 2];
        let result = UnwrapTracker::new(&[0, 4], &positions, [true; 3]);
        assert_eq!(
            result.unwrap_err(),
            PullError::FrameSize {
                expected: 5,
                found: 2
            }
        );
    }

    #[test]
    fn small_moves_are_added_directly() {
        let sim_box = cube(10.0);
        let mut tracker =
            UnwrapTracker::new(&[0], &[Point3::new(5.0, 5.0, 5.0)], [true; 3]).unwrap();

        let unwrapped = tracker
            .update(&[Point3::new(5.5, 4.0, 5.25)], &sim_box)
            .unwrap();

        assert_eq!(unwrapped[0], Point3::new(5.5, 4.0, 5.25));
    }

    #[test]
    fn forward_boundary_crossing_keeps_moving_forward() {
        let sim_box = cube(10.0);
        let eps = 0.1;
        let mut tracker =
            UnwrapTracker::new(&[0], &[Point3::new(10.0 - eps, 1.0, 1.0)], [true; 3]).unwrap();

        let unwrapped = tracker
            .update(&[Point3::new(eps, 1.0, 1.0)], &sim_box)
            .unwrap();

        assert!(f64_approx_equal(unwrapped[0].x, 10.0 + eps));
        assert!(unwrapped[0].x > 10.0 - eps);
    }

    #[test]
    fn backward_boundary_crossing_keeps_moving_backward() {
        let sim_box = cube(10.0);
        let mut tracker =
            UnwrapTracker::new(&[0], &[Point3::new(1.0, 0.2, 1.0)], [true; 3]).unwrap();

        let unwrapped = tracker
            .update(&[Point3::new(1.0, 9.9, 1.0)], &sim_box)
            .unwrap();

        assert!(f64_approx_equal(unwrapped[0].y, -0.1));
    }

    #[test]
    fn repeated_crossings_accumulate_whole_boxes() {
        let sim_box = cube(4.0);
        let mut tracker =
            UnwrapTracker::new(&[0], &[Point3::new(0.0, 0.0, 0.0)], [true; 3]).unwrap();

        // Drift +1.5 per step in x, wrapping into [0, 4).
        let mut expected = 0.0;
        for step in 1..=10 {
            expected += 1.5;
            let wrapped = (1.5 * step as f64).rem_euclid(4.0);
            tracker
                .update(&[Point3::new(wrapped, 0.0, 0.0)], &sim_box)
                .unwrap();
        }
        assert!(f64_approx_equal(tracker.positions()[0].x, expected));
    }

    #[test]
    fn continuous_and_raw_differ_by_whole_box_lengths() {
        let sim_box = cube(3.0);
        let mut tracker =
            UnwrapTracker::new(&[0], &[Point3::new(2.9, 0.1, 1.5)], [true; 3]).unwrap();
        let raw = Point3::new(0.2, 2.8, 1.6);
        let unwrapped = tracker.update(&[raw], &sim_box).unwrap()[0];

        for dim in 0..3 {
            let shifts = (unwrapped[dim] - raw[dim]) / sim_box.length(dim);
            assert!(f64_approx_equal(shifts, shifts.round()));
        }
    }

    #[test]
    fn update_rejects_short_frame() {
        let mut tracker =
            UnwrapTracker::new(&[1], &[Point3::origin(), Point3::origin()], [true; 3]).unwrap();
        let result = tracker.update(&[Point3::origin()], &cube(10.0));
        assert!(matches!(result, Err(PullError::FrameSize { .. })));
    }

    #[test]
    fn center_of_mass_uses_unwrapped_coordinates() {
        let sim_box = cube(10.0);
        let positions = vec![Point3::new(9.5, 0.0, 0.0), Point3::new(8.5, 0.0, 0.0)];
        let masses = vec![1.0, 1.0];
        let mut tracker = UnwrapTracker::new(&[0, 1], &positions, [true; 3]).unwrap();

        tracker
            .update(
                &[Point3::new(0.5, 0.0, 0.0), Point3::new(9.5, 0.0, 0.0)],
                &sim_box,
            )
            .unwrap();
        let com = tracker.center_of_mass(&masses).unwrap();

        assert!(f64_approx_equal(com.position.x, 10.0));
        assert_eq!(com.total_mass, 2.0);
    }
}
