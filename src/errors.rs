//! Error types produced while building or analysing trusses.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when the analysis pipeline cannot produce a result.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the reduced stiffness matrix is singular.
    ///
    /// This happens when the truss has too few supports to suppress rigid-body
    /// motion or when its members form a mechanism.
    #[error("structure is unstable: reduced stiffness over {free_dofs} free dofs is singular; check supports and connectivity")]
    Unstable {
        /// Size of the reduced system that failed to factorise.
        free_dofs: usize,
    },
    /// Returned when the supported dof list is inconsistent.
    #[error("invalid dof bookkeeping: {0}")]
    InvalidDofs(#[from] DofError),
    /// Returned when stresses or reactions are requested before displacements are applied.
    #[error("nodal displacements are not available; solve the truss first")]
    NotSolved,
    /// Returned when a displacement solution no longer matches the truss it is applied to.
    #[error("solution for revision {solution_revision:?} covers {solution_dofs} dofs with {solution_free} free, truss is at revision {truss_revision} with {truss_dofs} dofs and {truss_free} free")]
    StaleSolution {
        /// Truss revision the solution was computed for, `None` when it was not
        /// produced by [`Truss::solve_for_displacements`](crate::Truss::solve_for_displacements).
        solution_revision: Option<u64>,
        /// Current revision of the truss.
        truss_revision: u64,
        /// Total dofs recorded in the solution.
        solution_dofs: usize,
        /// Free dofs recorded in the solution.
        solution_free: usize,
        /// Total dofs of the truss.
        truss_dofs: usize,
        /// Free dofs of the truss.
        truss_free: usize,
    },
}

/// Precondition failure in the dof bookkeeping of a linear system.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DofError {
    /// Returned when the same dof appears twice.
    #[error("dof {0} is listed more than once")]
    Duplicate(usize),
    /// Returned when a dof does not exist in the truss.
    #[error("dof {dof} is outside the {number_of_dofs} dofs of the truss")]
    OutOfRange {
        /// Offending dof.
        dof: usize,
        /// Total dofs of the truss.
        number_of_dofs: usize,
    },
    /// Returned when the stiffness matrix is not square or does not match the force vector.
    #[error("stiffness is {rows}x{cols} but the force vector has {dofs} entries")]
    DimensionMismatch {
        /// Rows of the stiffness matrix.
        rows: usize,
        /// Columns of the stiffness matrix.
        cols: usize,
        /// Length of the force vector.
        dofs: usize,
    },
}

/// Error returned when the material or section of an element is not physically meaningful.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ElementPropertyError {
    /// Returned when the cross-sectional area is zero, negative or not finite.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area.
        area: f64,
    },
    /// Returned when Young's modulus is zero, negative or not finite.
    #[error("Young's modulus must be positive (received {youngs_modulus})")]
    NonPositiveYoungsModulus {
        /// Rejected Young's modulus.
        youngs_modulus: f64,
    },
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid input.
///
/// # Examples
///
/// ```
/// use petgraph::graph::NodeIndex;
/// use truss2d::{BoundaryCondition, Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// let missing = NodeIndex::new(7);
/// let error = truss
///     .set_boundary_condition(missing, BoundaryCondition::FULLY_RESTRICTED)
///     .expect_err("unknown node is rejected");
/// assert_eq!(error, TrussEditError::UnknownNode(missing));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a node cannot be found in the truss.
    #[error("node {0:?} does not exist in this truss")]
    UnknownNode(NodeIndex),
    /// Returned when an element cannot be found in the truss.
    #[error("element {0:?} does not exist in this truss")]
    UnknownElement(EdgeIndex),
    /// Returned when both ends of an element are the same node.
    #[error("element endpoints must differ (both are {0:?})")]
    DuplicateEndpoints(NodeIndex),
    /// Returned when the endpoints of an element share the same coordinates.
    #[error("element between {0:?} and {1:?} has zero length")]
    ZeroLengthElement(NodeIndex, NodeIndex),
    /// Returned when an endpoint coordinate is NaN or infinite.
    #[error("element between {0:?} and {1:?} has a non-finite endpoint coordinate")]
    NonFiniteGeometry(NodeIndex, NodeIndex),
    /// Returned when the supplied element properties are invalid.
    #[error("{0}")]
    InvalidElementProperties(#[from] ElementPropertyError),
}
