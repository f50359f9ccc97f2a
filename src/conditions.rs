use clap::ValueEnum;
use truss2d::{force, point, BoundaryCondition, Force, Truss, TrussEditError};

/// Steel properties shared by the triangular example.
const STEEL_MODULUS: f64 = 2.0e11;
/// Cross-sectional area of the triangular example members.
const TRIANGLE_AREA: f64 = 2300.0e-6;

/// Built-in problems the CLI can solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Problem {
    /// Three-node triangle with a pin, a roller and a horizontal apex load.
    #[default]
    Triangle,
    /// Single inclined rod on a pin and a roller.
    Rod,
}

impl Problem {
    /// Build the truss for this problem with supports and loads applied.
    pub fn build(self) -> Result<Truss, TrussEditError> {
        match self {
            Problem::Triangle => triangle_truss(),
            Problem::Rod => inclined_rod(),
        }
    }
}

/// Triangle with supports at the base and a 100 kN push at the apex.
///
/// The left base node is pinned and the right one rides on a roller, giving the
/// three restraints a planar truss needs to be statically determinate (see
/// <https://en.wikipedia.org/wiki/Truss#Statics_of_trusses>).
pub fn triangle_truss() -> Result<Truss, TrussEditError> {
    let mut truss = Truss::new();
    let n1 = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
    let n2 = truss.add_node(point(4.0, 0.0), BoundaryCondition::RESTRICTED_IN_Y, Force::default());
    let n3 = truss.add_node(point(4.0, 6.0), BoundaryCondition::FREE_MOVING, force(100.0e3, 0.0));
    truss.add_element(n1, n2, STEEL_MODULUS, TRIANGLE_AREA)?;
    truss.add_element(n2, n3, STEEL_MODULUS, TRIANGLE_AREA)?;
    truss.add_element(n1, n3, STEEL_MODULUS, TRIANGLE_AREA)?;
    Ok(truss)
}

/// Rod from the origin to (192, 144) with E = 3e4 and A = 10.
///
/// The far end may only slide along X, so the load has an axial component the
/// rod can carry.
pub fn inclined_rod() -> Result<Truss, TrussEditError> {
    let mut truss = Truss::new();
    let base = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
    let tip = truss.add_node(point(192.0, 144.0), BoundaryCondition::RESTRICTED_IN_Y, force(1_000.0, 0.0));
    truss.add_element(base, tip, 3.0e4, 10.0)?;
    Ok(truss)
}
