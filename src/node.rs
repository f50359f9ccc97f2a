//! Truss nodes and their global degree-of-freedom numbering.

use serde::Serialize;

use crate::boundary::BoundaryCondition;
use crate::geometry::{Displacement, Force, Point, Reaction};

/// Number of translational degrees of freedom carried by each node.
pub const DOFS_PER_NODE: usize = 2;

/// Global degree-of-freedom indices of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dofs {
    /// Index of the X translation.
    pub x: usize,
    /// Index of the Y translation.
    pub y: usize,
}

impl Dofs {
    /// Dof pair `(2 * id, 2 * id + 1)` for the node with identifier `id`.
    #[must_use]
    pub const fn for_node(id: usize) -> Self {
        Self {
            x: DOFS_PER_NODE * id,
            y: DOFS_PER_NODE * id + 1,
        }
    }
}

/// Owner of a global dof: the node identifier and whether it is the X component.
#[must_use]
pub const fn dof_owner(dof: usize) -> (usize, bool) {
    (dof / DOFS_PER_NODE, dof % DOFS_PER_NODE == 0)
}

/// A pin joint of the truss.
///
/// Nodes are created through [`Truss::add_node`](crate::Truss::add_node), which
/// hands out identifiers in insertion order. Position and dofs never change
/// afterwards; displacement and reaction are written by the analysis pipeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    /// Identifier assigned by the owning truss.
    id: usize,
    /// Undeformed position.
    position: Point,
    /// Global dof indices derived from `id`.
    dofs: Dofs,
    /// Restraint state per axis.
    pub(crate) boundary_condition: BoundaryCondition,
    /// External load.
    pub(crate) force: Force,
    /// Solved displacement, zero until a solution is applied.
    pub(crate) displacement: Displacement,
    /// Recovered support reaction, zero until reactions are applied.
    pub(crate) reaction: Reaction,
}

impl Node {
    /// Create a node with identifier `id`.
    pub(crate) fn new(
        id: usize,
        position: Point,
        boundary_condition: BoundaryCondition,
        force: Force,
    ) -> Self {
        Self {
            id,
            position,
            dofs: Dofs::for_node(id),
            boundary_condition,
            force,
            displacement: Displacement::default(),
            reaction: Reaction::default(),
        }
    }

    /// Identifier of the node inside its truss.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Undeformed position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// X coordinate of the undeformed position.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Y coordinate of the undeformed position.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Global dof indices.
    #[must_use]
    pub fn dofs(&self) -> Dofs {
        self.dofs
    }

    /// Restraint state.
    #[must_use]
    pub fn boundary_condition(&self) -> BoundaryCondition {
        self.boundary_condition
    }

    /// Applied external load.
    #[must_use]
    pub fn force(&self) -> Force {
        self.force
    }

    /// Displacement written by the last applied solution.
    #[must_use]
    pub fn displacement(&self) -> Displacement {
        self.displacement
    }

    /// Reaction written by the last reaction recovery.
    #[must_use]
    pub fn reaction(&self) -> Reaction {
        self.reaction
    }

    /// Return `true` when the node is held along at least one axis.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.boundary_condition.is_supported()
    }

    /// Dofs that may move.
    #[must_use]
    pub fn free_dofs(&self) -> Vec<usize> {
        self.boundary_condition.free_dofs(self.dofs)
    }

    /// Dofs held by the support.
    #[must_use]
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.boundary_condition.restrained_dofs(self.dofs)
    }

    /// Clear results written by the analysis pipeline.
    pub(crate) fn reset_results(&mut self) {
        self.displacement = Displacement::default();
        self.reaction = Reaction::default();
    }
}
