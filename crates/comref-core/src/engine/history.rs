use super::error::PullError;
use nalgebra::{Point3, Vector3};
use std::fmt;

/// Identifies the owner of a running-average history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// The main reference group.
    Reference,
    /// The local reference built for the pull group with this index.
    PullGroup(usize),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Reference => write!(f, "the reference group"),
            EntityId::PullGroup(i) => write!(f, "the local reference of pull group {}", i),
        }
    }
}

/// Mean of the last `depth` samples pushed into it.
///
/// The first push seeds every slot with the pushed sample, so the average is defined
/// from the very first step and moves away from that seed as real samples replace it.
#[derive(Debug, Clone)]
pub struct RunningAverage {
    samples: Vec<Vector3<f64>>,
    next: usize,
    seeded: bool,
}

impl RunningAverage {
    pub fn new(depth: usize) -> Self {
        Self {
            samples: vec![Vector3::zeros(); depth.max(1)],
            next: 0,
            seeded: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.samples.len()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Replaces the oldest sample with `sample` and returns the new mean.
    pub fn push(&mut self, sample: &Point3<f64>) -> Point3<f64> {
        if self.seeded {
            self.samples[self.next] = sample.coords;
        } else {
            self.samples.fill(sample.coords);
            self.seeded = true;
        }
        self.next = (self.next + 1) % self.depth();
        self.current()
    }

    fn current(&self) -> Point3<f64> {
        let sum = self
            .samples
            .iter()
            .fold(Vector3::zeros(), |acc, sample| acc + sample);
        Point3::from(sum / self.depth() as f64)
    }

    /// The current mean, or `None` before the first push.
    pub fn mean(&self) -> Option<Point3<f64>> {
        self.seeded.then(|| self.current())
    }

    /// Samples in the order they were pushed, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        let (newer, older) = self.samples.split_at(self.next);
        older.iter().chain(newer).map(|v| Point3::from(*v))
    }
}

/// Running averages for the reference group and for every pull group's local reference.
#[derive(Debug, Clone)]
pub struct HistoryBank {
    reference: RunningAverage,
    pull_groups: Vec<RunningAverage>,
}

impl HistoryBank {
    pub fn new(depth: usize, n_pull_groups: usize) -> Self {
        Self {
            reference: RunningAverage::new(depth),
            pull_groups: vec![RunningAverage::new(depth); n_pull_groups],
        }
    }

    pub fn get(&self, entity: EntityId) -> Option<&RunningAverage> {
        match entity {
            EntityId::Reference => Some(&self.reference),
            EntityId::PullGroup(i) => self.pull_groups.get(i),
        }
    }

    /// Pushes a fresh COM for `entity` and returns its smoothed value.
    pub fn push(&mut self, entity: EntityId, com: &Point3<f64>) -> Result<Point3<f64>, PullError> {
        let history = match entity {
            EntityId::Reference => Some(&mut self.reference),
            EntityId::PullGroup(i) => self.pull_groups.get_mut(i),
        }
        .ok_or(PullError::UnknownEntity { entity })?;
        Ok(history.push(com))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn points_approx_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    #[test]
    fn first_push_seeds_the_whole_window() {
        let mut avg = RunningAverage::new(4);
        assert_eq!(avg.mean(), None);

        let smoothed = avg.push(&Point3::new(1.0, 2.0, 3.0));

        assert_eq!(smoothed, Point3::new(1.0, 2.0, 3.0));
        assert!(avg.is_seeded());
        assert!(avg.samples().all(|s| s == Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn identical_pushes_average_to_the_same_value() {
        let v = Point3::new(2.5, -1.25, 7.0);
        let mut avg = RunningAverage::new(8);
        let mut smoothed = Point3::origin();
        for _ in 0..8 {
            smoothed = avg.push(&v);
        }
        assert_eq!(smoothed, v);
    }

    #[test]
    fn increasing_sequence_is_averaged_strictly_inside_the_window() {
        let depth = 5;
        let mut avg = RunningAverage::new(depth);
        let mut smoothed = Point3::origin();
        for i in 0..12 {
            smoothed = avg.push(&Point3::new(i as f64, 0.0, 0.0));
        }
        // Window now holds 7..=11.
        assert!(smoothed.x > 7.0 && smoothed.x < 11.0);
        assert!((smoothed.x - 9.0).abs() < TOLERANCE);
    }

    #[test]
    fn mean_matches_shift_based_history() {
        let depth = 3;
        let mut avg = RunningAverage::new(depth);
        let mut shifted = vec![Vector3::zeros(); depth];
        let inputs = [1.0, 4.0, -2.0, 8.0, 3.5, 0.25];

        avg.push(&Point3::new(inputs[0], 0.0, 0.0));
        shifted.fill(Vector3::new(inputs[0], 0.0, 0.0));

        for &x in &inputs[1..] {
            let smoothed = avg.push(&Point3::new(x, 0.0, 0.0));
            shifted.rotate_left(1);
            shifted[depth - 1] = Vector3::new(x, 0.0, 0.0);
            let expected = shifted.iter().sum::<Vector3<f64>>() / depth as f64;
            assert!(points_approx_equal(&smoothed, &Point3::from(expected)));
        }
    }

    #[test]
    fn samples_are_reported_oldest_first() {
        let mut avg = RunningAverage::new(3);
        for x in [1.0, 2.0, 3.0, 4.0] {
            avg.push(&Point3::new(x, 0.0, 0.0));
        }
        let xs: Vec<f64> = avg.samples().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn depth_one_is_the_identity() {
        let mut avg = RunningAverage::new(1);
        avg.push(&Point3::new(1.0, 1.0, 1.0));
        let smoothed = avg.push(&Point3::new(5.0, 6.0, 7.0));
        assert_eq!(smoothed, Point3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn bank_keeps_entities_independent() {
        let mut bank = HistoryBank::new(2, 2);
        bank.push(EntityId::PullGroup(0), &Point3::new(0.0, 0.0, 0.0))
            .unwrap();
        let group0 = bank
            .push(EntityId::PullGroup(0), &Point3::new(2.0, 0.0, 0.0))
            .unwrap();
        let group1 = bank
            .push(EntityId::PullGroup(1), &Point3::new(9.0, 0.0, 0.0))
            .unwrap();

        assert_eq!(group0, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(group1, Point3::new(9.0, 0.0, 0.0));
        assert!(!bank.get(EntityId::Reference).unwrap().is_seeded());
    }

    #[test]
    fn bank_rejects_unknown_pull_group() {
        let mut bank = HistoryBank::new(2, 1);
        let result = bank.push(EntityId::PullGroup(3), &Point3::origin());
        assert_eq!(
            result,
            Err(PullError::UnknownEntity {
                entity: EntityId::PullGroup(3)
            })
        );
    }

    #[test]
    fn entity_display_names_the_group() {
        assert_eq!(EntityId::Reference.to_string(), "the reference group");
        assert_eq!(
            EntityId::PullGroup(2).to_string(),
            "the local reference of pull group 2"
        );
    }
}
