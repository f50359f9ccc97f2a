//! Reduced linear system over the free dofs and its dense solution.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::errors::{AnalysisError, DofError};

/// Relative pivot size below which the reduced stiffness is treated as singular.
///
/// Pivots of the LU factorisation are compared against the largest pivot, so the
/// check does not depend on the units chosen for `E`, `A` or lengths. It does
/// depend on the spread of member stiffnesses: a stable truss whose axial
/// stiffnesses `EA/L` differ by more than about twelve orders of magnitude can
/// produce a pivot below the threshold and is then reported as
/// [`AnalysisError::Unstable`].
pub const PIVOT_TOLERANCE: f64 = 1.0e-12;

/// Stiffness matrix and force vector restricted to the free dofs.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedSystem {
    /// Reduced stiffness matrix.
    pub(crate) stiffness: DMatrix<f64>,
    /// Reduced force vector.
    pub(crate) force: DVector<f64>,
    /// Global dof of each reduced row, ascending.
    pub(crate) free_dofs: Vec<usize>,
    /// Size of the unreduced system.
    pub(crate) number_of_dofs: usize,
    /// Revision of the truss this system was assembled from.
    pub(crate) revision: Option<u64>,
}

impl ReducedSystem {
    /// Remove the `supported` rows and columns from a full system.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidDofs`] when `stiffness` is not square with
    /// one row per entry of `force`, or when `supported` repeats a dof or names
    /// one outside the system.
    pub fn eliminate(
        stiffness: &DMatrix<f64>,
        force: &DVector<f64>,
        supported: &[usize],
    ) -> Result<Self, AnalysisError> {
        let number_of_dofs = force.len();
        let (rows, cols) = stiffness.shape();
        if rows != number_of_dofs || cols != number_of_dofs {
            return Err(DofError::DimensionMismatch {
                rows,
                cols,
                dofs: number_of_dofs,
            }
            .into());
        }
        let mut restrained = vec![false; number_of_dofs];
        for &dof in supported {
            if dof >= number_of_dofs {
                return Err(DofError::OutOfRange {
                    dof,
                    number_of_dofs,
                }
                .into());
            }
            if restrained[dof] {
                return Err(DofError::Duplicate(dof).into());
            }
            restrained[dof] = true;
        }

        let free_dofs: Vec<usize> = (0..number_of_dofs).filter(|&dof| !restrained[dof]).collect();
        let free_len = free_dofs.len();
        let mut k_ff = DMatrix::zeros(free_len, free_len);
        let mut f_f = DVector::zeros(free_len);
        for (row_idx, &row) in free_dofs.iter().enumerate() {
            f_f[row_idx] = force[row];
            for (col_idx, &col) in free_dofs.iter().enumerate() {
                k_ff[(row_idx, col_idx)] = stiffness[(row, col)];
            }
        }
        debug!(
            number_of_dofs,
            supported = supported.len(),
            free = free_len,
            "eliminated supported dofs"
        );

        Ok(Self {
            stiffness: k_ff,
            force: f_f,
            free_dofs,
            number_of_dofs,
            revision: None,
        })
    }

    /// Reduced stiffness matrix.
    #[must_use]
    pub fn stiffness(&self) -> &DMatrix<f64> {
        &self.stiffness
    }

    /// Reduced force vector.
    #[must_use]
    pub fn force(&self) -> &DVector<f64> {
        &self.force
    }

    /// Global dof of each reduced row.
    #[must_use]
    pub fn free_dofs(&self) -> &[usize] {
        &self.free_dofs
    }

    /// Number of dofs of the unreduced system.
    #[must_use]
    pub fn number_of_dofs(&self) -> usize {
        self.number_of_dofs
    }

    /// Solve `K_ff · u_f = F_f` with a dense LU factorisation.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unstable`] when the reduced stiffness is singular.
    pub fn solve(&self) -> Result<DisplacementSolution, AnalysisError> {
        let free_len = self.free_dofs.len();
        if free_len == 0 {
            return Ok(DisplacementSolution {
                free_dofs: Vec::new(),
                values: DVector::zeros(0),
                number_of_dofs: self.number_of_dofs,
                revision: self.revision,
            });
        }

        let unstable = AnalysisError::Unstable {
            free_dofs: free_len,
        };
        let lu = self.stiffness.clone().lu();
        let pivots = lu.u().diagonal().abs();
        let largest = pivots.max();
        let smallest = pivots.min();
        debug!(free = free_len, largest, smallest, "factorised reduced stiffness");
        if !(largest > 0.0) || smallest <= PIVOT_TOLERANCE * largest {
            warn!(free = free_len, largest, smallest, "reduced stiffness is singular");
            return Err(unstable);
        }

        let values = lu.solve(&self.force).ok_or_else(|| unstable.clone())?;
        if values.iter().any(|value| !value.is_finite()) {
            warn!(free = free_len, "solve produced non-finite displacements");
            return Err(unstable);
        }

        Ok(DisplacementSolution {
            free_dofs: self.free_dofs.clone(),
            values,
            number_of_dofs: self.number_of_dofs,
            revision: self.revision,
        })
    }

    /// Residual `K_ff · u_f − F_f` of a solution.
    #[must_use]
    pub fn residual(&self, solution: &DisplacementSolution) -> DVector<f64> {
        &self.stiffness * &solution.values - &self.force
    }
}

/// Displacements of the free dofs, tagged with the global dof each entry belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementSolution {
    /// Global dof of each entry in `values`.
    pub(crate) free_dofs: Vec<usize>,
    /// Solved displacements.
    pub(crate) values: DVector<f64>,
    /// Size of the unreduced system.
    pub(crate) number_of_dofs: usize,
    /// Revision of the truss the solution was computed for.
    pub(crate) revision: Option<u64>,
}

impl DisplacementSolution {
    /// Solved free-dof displacements in ascending dof order.
    #[must_use]
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Global dof of each entry in [`DisplacementSolution::values`].
    #[must_use]
    pub fn free_dofs(&self) -> &[usize] {
        &self.free_dofs
    }

    /// Pairs of `(global dof, displacement)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.free_dofs.iter().copied().zip(self.values.iter().copied())
    }

    /// Full displacement vector with zeros at the supported dofs.
    #[must_use]
    pub fn full_vector(&self) -> DVector<f64> {
        let mut full = DVector::zeros(self.number_of_dofs);
        for (dof, value) in self.iter() {
            full[dof] = value;
        }
        full
    }
}
