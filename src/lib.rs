#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod boundary;
mod element;
mod errors;
mod geometry;
mod node;
mod system;
mod truss;
mod view;

pub use boundary::BoundaryCondition;
pub use element::Element;
pub use errors::{AnalysisError, DofError, ElementPropertyError, TrussEditError};
pub use geometry::{force, point, Displacement, Force, Point, Reaction};
pub use node::{dof_owner, Dofs, Node, DOFS_PER_NODE};
pub use system::{DisplacementSolution, ReducedSystem, PIVOT_TOLERANCE};
pub use truss::Truss;
pub use view::{
    deformed_segments, force_arrows, undeformed_segments, Axis, Bounds, ForceArrow, Segment, Spacing,
    TrussView, MAX_SPACING_PERCENTAGE,
};
