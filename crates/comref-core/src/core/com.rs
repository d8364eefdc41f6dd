use super::geometry::SimBox;
use nalgebra::{Point3, Vector3};

/// A mass-weighted centroid together with the mass it was weighted by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterOfMass {
    pub position: Point3<f64>,
    pub total_mass: f64,
}

/// Center of mass of the atoms `indices` selects from `positions`, folded into the box.
///
/// Masses and positions are both looked up through `indices`. The centroid is folded by
/// at most one box length per dimension into `[0, L)`.
///
/// Returns `None` when the selected atoms carry no positive mass.
pub fn center_of_mass(
    positions: &[Point3<f64>],
    indices: &[usize],
    masses: &[f64],
    sim_box: &SimBox,
) -> Option<CenterOfMass> {
    let (weighted_sum, total_mass) = indices.iter().fold(
        (Vector3::zeros(), 0.0),
        |(sum, mass_sum), &idx| {
            let mass = masses[idx];
            (sum + positions[idx].coords * mass, mass_sum + mass)
        },
    );
    normalize(weighted_sum, total_mass).map(|com| CenterOfMass {
        position: sim_box.fold_once(&com.position),
        ..com
    })
}

/// Center of mass of an already extracted, contiguous coordinate array.
///
/// `positions[k]` belongs to atom `indices[k]`, whose mass is read from `masses`. No box
/// folding is applied since such arrays normally hold unwrapped coordinates.
///
/// Returns `None` when the atoms carry no positive mass.
pub fn center_of_mass_contiguous(
    positions: &[Point3<f64>],
    indices: &[usize],
    masses: &[f64],
) -> Option<CenterOfMass> {
    let (weighted_sum, total_mass) = positions.iter().zip(indices).fold(
        (Vector3::zeros(), 0.0),
        |(sum, mass_sum), (pos, &idx)| {
            let mass = masses[idx];
            (sum + pos.coords * mass, mass_sum + mass)
        },
    );
    normalize(weighted_sum, total_mass)
}

#[inline]
pub(crate) fn normalize(weighted_sum: Vector3<f64>, total_mass: f64) -> Option<CenterOfMass> {
    if total_mass > 0.0 && total_mass.is_finite() {
        Some(CenterOfMass {
            position: Point3::from(weighted_sum / total_mass),
            total_mass,
        })
    } else {
        None
    }
}
