//! Per-axis support conditions for truss nodes.

use serde::Serialize;

use crate::node::Dofs;

/// Restraint state of a node along each global axis.
///
/// A `true` flag means the node may translate along that axis; `false` means the
/// support holds it in place and the corresponding degree of freedom is removed
/// from the reduced system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BoundaryCondition {
    /// Whether the node may move along X.
    pub free_x: bool,
    /// Whether the node may move along Y.
    pub free_y: bool,
}

impl BoundaryCondition {
    /// Unsupported node.
    pub const FREE_MOVING: Self = Self::new(true, true);
    /// Roller that holds the node in X only.
    pub const RESTRICTED_IN_X: Self = Self::new(false, true);
    /// Roller that holds the node in Y only.
    pub const RESTRICTED_IN_Y: Self = Self::new(true, false);
    /// Pin that holds the node in both directions.
    pub const FULLY_RESTRICTED: Self = Self::new(false, false);

    /// Create a boundary condition with explicit per-axis freedom.
    #[must_use]
    pub const fn new(free_x: bool, free_y: bool) -> Self {
        Self { free_x, free_y }
    }

    /// Return `true` when at least one axis is restrained.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !self.free_x || !self.free_y
    }

    /// Degrees of freedom of `dofs` that may move, x before y.
    #[must_use]
    pub fn free_dofs(self, dofs: Dofs) -> Vec<usize> {
        let mut free = Vec::with_capacity(2);
        if self.free_x {
            free.push(dofs.x);
        }
        if self.free_y {
            free.push(dofs.y);
        }
        free
    }

    /// Degrees of freedom of `dofs` held by the support, x before y.
    #[must_use]
    pub fn restrained_dofs(self, dofs: Dofs) -> Vec<usize> {
        let mut restrained = Vec::with_capacity(2);
        if !self.free_x {
            restrained.push(dofs.x);
        }
        if !self.free_y {
            restrained.push(dofs.y);
        }
        restrained
    }
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        Self::FREE_MOVING
    }
}
