//! Core data structures and algorithms for truss analysis.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use tracing::debug;

use crate::boundary::BoundaryCondition;
use crate::element::{Element, Member};
use crate::errors::{AnalysisError, TrussEditError};
use crate::geometry::{Displacement, Force, Point, Reaction};
use crate::node::{dof_owner, Dofs, Node, DOFS_PER_NODE};
use crate::system::{DisplacementSolution, ReducedSystem};

/// Container for a planar pin-jointed truss.
///
/// Nodes are graph vertices and elements are graph edges. Nodes cannot be
/// removed, so the graph index of a node doubles as its identifier and fixes
/// its dofs at `(2 * id, 2 * id + 1)` for the lifetime of the truss.
#[derive(Clone, Debug, Default)]
pub struct Truss {
    /// Underlying graph storage for nodes and elements.
    graph: Graph<Node, Member>,
    /// Indicates whether the nodal displacements reflect the current configuration.
    analysis_valid: bool,
    /// Configuration counter, bumped by every edit.
    revision: u64,
}

impl Truss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use truss2d::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            analysis_valid: false,
            revision: 0,
        }
    }

    /// Return the number of nodes in the truss.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of elements in the truss.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Total number of global dofs.
    #[must_use]
    pub fn number_of_dofs(&self) -> usize {
        self.node_count() * DOFS_PER_NODE
    }

    /// Return `true` once displacements for the current configuration have been applied.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.analysis_valid
    }

    /// Configuration revision, incremented by every edit.
    ///
    /// Solutions remember the revision they were computed for and are rejected
    /// by [`Truss::apply_displacements`] once it has moved on.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a node and return its identifier.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, BoundaryCondition, Force, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let first = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
    /// let second = truss.add_node(point(4.0, 0.0), BoundaryCondition::RESTRICTED_IN_Y, Force::default());
    /// assert_eq!(truss.node(second).expect("node exists").dofs().x, 2);
    /// assert_eq!(first.index(), 0);
    /// ```
    pub fn add_node(
        &mut self,
        position: Point,
        boundary_condition: BoundaryCondition,
        force: Force,
    ) -> NodeIndex {
        self.invalidate();
        let id = self.graph.node_count();
        let index = self
            .graph
            .add_node(Node::new(id, position, boundary_condition, force));
        debug_assert_eq!(index.index(), id);
        index
    }

    /// Connect two nodes with an axial element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownNode`] when an endpoint is not part of this
    /// truss, [`TrussEditError::DuplicateEndpoints`],
    /// [`TrussEditError::ZeroLengthElement`] or
    /// [`TrussEditError::NonFiniteGeometry`] for degenerate geometry and
    /// [`TrussEditError::InvalidElementProperties`] when `youngs_modulus` or `area`
    /// is not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, BoundaryCondition, Force, Truss, TrussEditError};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_node(point(1.0, 1.0), BoundaryCondition::FREE_MOVING, Force::default());
    /// let b = truss.add_node(point(1.0, 1.0), BoundaryCondition::FREE_MOVING, Force::default());
    /// let error = truss
    ///     .add_element(a, b, 2.0e11, 2.3e-3)
    ///     .expect_err("coincident nodes rejected");
    /// assert_eq!(error, TrussEditError::ZeroLengthElement(a, b));
    /// ```
    pub fn add_element(
        &mut self,
        node1: NodeIndex,
        node2: NodeIndex,
        youngs_modulus: f64,
        area: f64,
    ) -> Result<EdgeIndex, TrussEditError> {
        let start = self.existing_node(node1)?.position();
        let end = self.existing_node(node2)?.position();
        if node1 == node2 {
            return Err(TrussEditError::DuplicateEndpoints(node1));
        }
        let length = start.distance_to(end);
        if !length.is_finite() {
            return Err(TrussEditError::NonFiniteGeometry(node1, node2));
        }
        if length <= 0.0 {
            return Err(TrussEditError::ZeroLengthElement(node1, node2));
        }
        let member = Member::new(youngs_modulus, area)?;
        self.invalidate();
        Ok(self.graph.add_edge(node1, node2, member))
    }

    /// Replace the material and section of an element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownElement`] when `element` is not part of this
    /// truss and [`TrussEditError::InvalidElementProperties`] for non-positive values.
    pub fn set_element_properties(
        &mut self,
        element: EdgeIndex,
        youngs_modulus: f64,
        area: f64,
    ) -> Result<(), TrussEditError> {
        if self.graph.edge_weight(element).is_none() {
            return Err(TrussEditError::UnknownElement(element));
        }
        let member = Member::new(youngs_modulus, area)?;
        self.invalidate();
        if let Some(edge) = self.graph.edge_weight_mut(element) {
            *edge = member;
        }
        Ok(())
    }

    /// Change the support of a node.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownNode`] when `node` is not part of this truss.
    pub fn set_boundary_condition(
        &mut self,
        node: NodeIndex,
        boundary_condition: BoundaryCondition,
    ) -> Result<(), TrussEditError> {
        self.existing_node(node)?;
        self.invalidate();
        self.graph[node].boundary_condition = boundary_condition;
        Ok(())
    }

    /// Change the external load on a node.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownNode`] when `node` is not part of this truss.
    pub fn set_force(&mut self, node: NodeIndex, force: Force) -> Result<(), TrussEditError> {
        self.existing_node(node)?;
        self.invalidate();
        self.graph[node].force = force;
        Ok(())
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, node: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(node)
    }

    /// Look up an element together with its endpoints.
    #[must_use]
    pub fn element(&self, element: EdgeIndex) -> Option<Element<'_>> {
        let (start, end) = self.graph.edge_endpoints(element)?;
        Some(Element::new(
            element,
            &self.graph[start],
            &self.graph[end],
            &self.graph[element],
        ))
    }

    /// Nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> + '_ {
        self.graph
            .edge_indices()
            .filter_map(move |edge| self.element(edge))
    }

    /// Assemble the global stiffness matrix.
    ///
    /// Each element matrix is added at the rows and columns given by its
    /// [`Element::node_dofs`]; contributions on shared dofs accumulate.
    #[must_use]
    pub fn global_stiffness(&self) -> DMatrix<f64> {
        let dof = self.number_of_dofs();
        let mut matrix = DMatrix::zeros(dof, dof);
        for element in self.elements() {
            let local = element.global_stiffness_matrix();
            let dof_map = element.node_dofs();
            for (row_local, &global_row) in dof_map.iter().enumerate() {
                for (col_local, &global_col) in dof_map.iter().enumerate() {
                    matrix[(global_row, global_col)] += local[(row_local, col_local)];
                }
            }
        }
        debug!(
            dofs = dof,
            elements = self.element_count(),
            "assembled global stiffness"
        );
        matrix
    }

    /// Assemble the global force vector from the nodal loads, `(fx, fy)` per node.
    #[must_use]
    pub fn force_vector(&self) -> DVector<f64> {
        let mut load = DVector::zeros(self.number_of_dofs());
        for node in self.nodes() {
            let dofs = node.dofs();
            load[dofs.x] = node.force().fx;
            load[dofs.y] = node.force().fy;
        }
        load
    }

    /// Dofs free to move, ascending.
    #[must_use]
    pub fn free_dofs(&self) -> Vec<usize> {
        self.nodes().flat_map(Node::free_dofs).collect()
    }

    /// Dofs held by supports, ascending.
    #[must_use]
    pub fn supported_dofs(&self) -> Vec<usize> {
        self.nodes().flat_map(Node::restrained_dofs).collect()
    }

    /// Remove the supported dofs from the global stiffness matrix and force vector.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidDofs`] when the supported dofs are inconsistent.
    pub fn impose_boundary_conditions(&self) -> Result<ReducedSystem, AnalysisError> {
        let mut reduced = ReducedSystem::eliminate(
            &self.global_stiffness(),
            &self.force_vector(),
            &self.supported_dofs(),
        )?;
        reduced.revision = Some(self.revision);
        Ok(reduced)
    }

    /// Solve for the displacements of the free dofs without touching the nodes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Unstable`] when the truss is a mechanism or lacks
    /// supports.
    pub fn solve_for_displacements(&self) -> Result<DisplacementSolution, AnalysisError> {
        self.impose_boundary_conditions()?.solve()
    }

    /// Write a displacement solution to the nodes.
    ///
    /// Even dofs update the X component of node `dof / 2`, odd dofs the Y
    /// component of node `(dof - 1) / 2`. Supported components are reset to zero.
    /// Previously recovered stresses and reactions are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::StaleSolution`] when `solution` was not computed
    /// by [`Truss::solve_for_displacements`] for the current revision of this truss.
    pub fn apply_displacements(
        &mut self,
        solution: &DisplacementSolution,
    ) -> Result<(), AnalysisError> {
        let free_dofs = self.free_dofs();
        if solution.revision != Some(self.revision)
            || solution.number_of_dofs != self.number_of_dofs()
            || solution.free_dofs != free_dofs
        {
            return Err(AnalysisError::StaleSolution {
                solution_revision: solution.revision,
                truss_revision: self.revision,
                solution_dofs: solution.number_of_dofs,
                solution_free: solution.free_dofs.len(),
                truss_dofs: self.number_of_dofs(),
                truss_free: free_dofs.len(),
            });
        }

        self.clear_results();
        for (dof, value) in solution.iter() {
            let (id, is_x) = dof_owner(dof);
            let node = &mut self.graph[NodeIndex::new(id)];
            if is_x {
                node.displacement.x = value;
            } else {
                node.displacement.y = value;
            }
        }
        self.analysis_valid = true;
        debug!(free = free_dofs.len(), "applied nodal displacements");
        Ok(())
    }

    /// Solve the truss and write the displacements to the nodes.
    ///
    /// Nothing is written when the solve fails.
    ///
    /// # Errors
    ///
    /// Propagates the failures of [`Truss::solve_for_displacements`].
    pub fn set_nodal_displacements(&mut self) -> Result<(), AnalysisError> {
        let solution = self.solve_for_displacements()?;
        self.apply_displacements(&solution)
    }

    /// Full vector of the displacements stored on the nodes, in dof order.
    #[must_use]
    pub fn displacement_vector(&self) -> DVector<f64> {
        let mut displacements = DVector::zeros(self.number_of_dofs());
        for node in self.nodes() {
            let dofs = node.dofs();
            displacements[dofs.x] = node.displacement().x;
            displacements[dofs.y] = node.displacement().y;
        }
        displacements
    }

    /// Axial stress of every element computed from the stored displacements.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before displacements have been applied.
    pub fn element_stresses(&self) -> Result<Vec<(EdgeIndex, f64)>, AnalysisError> {
        self.ensure_solved()?;
        Ok(self
            .elements()
            .map(|element| (element.id(), element.axial_stress(&element.nodal_displacements())))
            .collect())
    }

    /// Compute element stresses and store them on the elements.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before displacements have been applied.
    pub fn set_element_stresses(&mut self) -> Result<(), AnalysisError> {
        let stresses = self.element_stresses()?;
        for (edge, stress) in stresses {
            self.graph[edge].stress = Some(stress);
        }
        Ok(())
    }

    /// Reaction at every supported dof as `(dof, value)` pairs, ascending by dof.
    ///
    /// Each value is the supported row of the full stiffness matrix multiplied by
    /// the full displacement vector, i.e. the total nodal force the support carries.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before displacements have been applied.
    pub fn reactions(&self) -> Result<Vec<(usize, f64)>, AnalysisError> {
        self.ensure_solved()?;
        let stiffness = self.global_stiffness();
        let displacements = self.displacement_vector();
        Ok(self
            .supported_dofs()
            .into_iter()
            .map(|dof| (dof, stiffness.row(dof).dot(&displacements.transpose())))
            .collect())
    }

    /// Compute the support reactions and store them on the nodes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before displacements have been applied.
    pub fn set_reactions(&mut self) -> Result<(), AnalysisError> {
        let reactions = self.reactions()?;
        for node in self.graph.node_weights_mut() {
            node.reaction = Reaction::default();
        }
        for (dof, value) in reactions {
            let (id, is_x) = dof_owner(dof);
            let node = &mut self.graph[NodeIndex::new(id)];
            if is_x {
                node.reaction.fx = value;
            } else {
                node.reaction.fy = value;
            }
        }
        Ok(())
    }

    /// Run the whole pipeline: displacements, element stresses and reactions.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the structure cannot be solved.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{force, point, BoundaryCondition, Force, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let support = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
    /// let tip = truss.add_node(point(1.0, 0.0), BoundaryCondition::RESTRICTED_IN_Y, force(1_000.0, 0.0));
    /// let bar = truss.add_element(support, tip, 200.0e9, 0.01).expect("valid bar");
    ///
    /// truss.analyze().expect("bar is stable");
    /// let stress = truss.element(bar).and_then(|bar| bar.stress()).expect("stress recovered");
    /// assert!((stress - 100_000.0).abs() < 1.0e-6);
    /// ```
    pub fn analyze(&mut self) -> Result<(), AnalysisError> {
        self.set_nodal_displacements()?;
        self.set_element_stresses()?;
        self.set_reactions()
    }

    /// Map from each node's dof pair to its stored displacement.
    ///
    /// The map is rebuilt from the nodes on every call.
    #[must_use]
    pub fn dof_displacement_map(&self) -> BTreeMap<Dofs, Displacement> {
        self.nodes()
            .map(|node| (node.dofs(), node.displacement()))
            .collect()
    }

    /// Resolve `node` or report it as unknown.
    fn existing_node(&self, node: NodeIndex) -> Result<&Node, TrussEditError> {
        self.graph
            .node_weight(node)
            .ok_or(TrussEditError::UnknownNode(node))
    }

    /// Fail unless displacements for the current configuration are stored.
    fn ensure_solved(&self) -> Result<(), AnalysisError> {
        if self.analysis_valid {
            Ok(())
        } else {
            Err(AnalysisError::NotSolved)
        }
    }

    /// Reset cached analysis results when the topology or properties change.
    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        if self.analysis_valid {
            self.clear_results();
            self.analysis_valid = false;
        }
    }

    /// Zero displacements and reactions and forget element stresses.
    fn clear_results(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.reset_results();
        }
        for member in self.graph.edge_weights_mut() {
            member.stress = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::ElementPropertyError;
    use crate::geometry::{force, point};

    const E: f64 = 2.0e11;
    const A: f64 = 2300.0e-6;

    fn triangle() -> (Truss, [NodeIndex; 3]) {
        let mut truss = Truss::new();
        let n1 = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
        let n2 = truss.add_node(point(4.0, 0.0), BoundaryCondition::RESTRICTED_IN_Y, Force::default());
        let n3 = truss.add_node(point(4.0, 6.0), BoundaryCondition::FREE_MOVING, force(100.0e3, 0.0));
        truss.add_element(n1, n2, E, A).expect("valid element");
        truss.add_element(n2, n3, E, A).expect("valid element");
        truss.add_element(n1, n3, E, A).expect("valid element");
        (truss, [n1, n2, n3])
    }

    #[test]
    fn node_identifiers_are_sequential_per_truss() {
        let (first, nodes) = triangle();
        let (second, _) = triangle();
        for (expected, index) in nodes.iter().enumerate() {
            assert_eq!(first.node(*index).expect("node exists").id(), expected);
            assert_eq!(second.node(*index).expect("node exists").id(), expected);
        }
        assert_eq!(first.node(nodes[2]).expect("node exists").dofs(), Dofs { x: 4, y: 5 });
    }

    #[test]
    fn add_element_rejects_invalid_input() {
        let mut truss = Truss::new();
        let a = truss.add_node(point(0.0, 0.0), BoundaryCondition::FREE_MOVING, Force::default());
        let b = truss.add_node(point(1.0, 0.0), BoundaryCondition::FREE_MOVING, Force::default());
        let missing = NodeIndex::new(9);

        assert_eq!(
            truss.add_element(a, missing, E, A),
            Err(TrussEditError::UnknownNode(missing))
        );
        assert_eq!(
            truss.add_element(a, a, E, A),
            Err(TrussEditError::DuplicateEndpoints(a))
        );
        assert_eq!(
            truss.add_element(a, b, E, -1.0),
            Err(TrussEditError::InvalidElementProperties(
                ElementPropertyError::NonPositiveArea { area: -1.0 }
            ))
        );
        assert_eq!(
            truss.add_element(a, b, 0.0, A),
            Err(TrussEditError::InvalidElementProperties(
                ElementPropertyError::NonPositiveYoungsModulus { youngs_modulus: 0.0 }
            ))
        );
        assert_eq!(truss.element_count(), 0);
    }

    #[test]
    fn add_element_rejects_non_finite_coordinates() {
        let mut truss = Truss::new();
        let anchor = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
        let nan = truss.add_node(point(f64::NAN, 1.0), BoundaryCondition::FREE_MOVING, Force::default());
        let far = truss.add_node(point(f64::INFINITY, 0.0), BoundaryCondition::FREE_MOVING, Force::default());

        assert_eq!(
            truss.add_element(anchor, nan, E, A),
            Err(TrussEditError::NonFiniteGeometry(anchor, nan))
        );
        assert_eq!(
            truss.add_element(far, anchor, E, A),
            Err(TrussEditError::NonFiniteGeometry(far, anchor))
        );
        assert_eq!(truss.element_count(), 0);
    }

    #[test]
    fn force_vector_follows_node_order() {
        let (truss, _) = triangle();
        assert_eq!(
            truss.force_vector(),
            DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 100.0e3, 0.0])
        );
    }

    #[test]
    fn partitions_free_and_supported_dofs() {
        let (truss, _) = triangle();
        assert_eq!(truss.free_dofs(), vec![2, 4, 5]);
        assert_eq!(truss.supported_dofs(), vec![0, 1, 3]);
    }

    #[test]
    fn global_stiffness_is_symmetric_and_balanced() {
        let (truss, _) = triangle();
        let stiffness = truss.global_stiffness();
        assert_eq!(stiffness.shape(), (6, 6));
        assert_relative_eq!(stiffness, stiffness.transpose(), epsilon = 1.0e-3);

        // Rigid translations produce no nodal forces.
        let shift_x = DVector::from_vec(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let shift_y = DVector::from_vec(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let scale = stiffness.amax();
        assert!((&stiffness * shift_x).amax() < 1.0e-9 * scale);
        assert!((&stiffness * shift_y).amax() < 1.0e-9 * scale);
    }

    #[test]
    fn assembly_is_independent_of_element_order() {
        let (forward, _) = triangle();

        let mut reversed = Truss::new();
        let n1 = reversed.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
        let n2 = reversed.add_node(point(4.0, 0.0), BoundaryCondition::RESTRICTED_IN_Y, Force::default());
        let n3 = reversed.add_node(point(4.0, 6.0), BoundaryCondition::FREE_MOVING, force(100.0e3, 0.0));
        reversed.add_element(n1, n3, E, A).expect("valid element");
        reversed.add_element(n2, n3, E, A).expect("valid element");
        reversed.add_element(n1, n2, E, A).expect("valid element");

        assert_relative_eq!(
            forward.global_stiffness(),
            reversed.global_stiffness(),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn boundary_conditions_remove_supported_dofs() {
        let (truss, _) = triangle();
        let reduced = truss.impose_boundary_conditions().expect("valid dofs");
        let supported = truss.supported_dofs().len();
        assert_eq!(
            reduced.stiffness().shape(),
            (truss.number_of_dofs() - supported, truss.number_of_dofs() - supported)
        );
        assert_eq!(reduced.force().len(), truss.number_of_dofs() - supported);
        assert_eq!(reduced.free_dofs(), truss.free_dofs().as_slice());
    }

    #[test]
    fn solution_reproduces_reduced_forces() {
        let (truss, _) = triangle();
        let reduced = truss.impose_boundary_conditions().expect("valid dofs");
        let solution = reduced.solve().expect("triangle is stable");
        assert_eq!(solution.values().len(), 3);
        assert!(solution.values().iter().all(|value| value.is_finite()));
        assert!(reduced.residual(&solution).amax() < 1.0e-6);
    }

    #[test]
    fn displacements_are_scattered_by_dof_parity() {
        let (mut truss, [n1, n2, n3]) = triangle();
        let solution = truss.solve_for_displacements().expect("triangle is stable");
        truss.apply_displacements(&solution).expect("fresh solution");

        let values = solution.values();
        assert_eq!(truss.node(n1).expect("node exists").displacement(), Displacement::default());
        let roller = truss.node(n2).expect("node exists").displacement();
        assert_eq!(roller, Displacement::new(values[0], 0.0));
        let tip = truss.node(n3).expect("node exists").displacement();
        assert_eq!(tip, Displacement::new(values[1], values[2]));

        assert_eq!(truss.displacement_vector(), solution.full_vector());
        let map = truss.dof_displacement_map();
        assert_eq!(map[&Dofs::for_node(2)], tip);
    }

    #[test]
    fn unsupported_truss_is_unstable() {
        let mut truss = Truss::new();
        let a = truss.add_node(point(0.0, 0.0), BoundaryCondition::FREE_MOVING, Force::default());
        let b = truss.add_node(point(1.0, 0.0), BoundaryCondition::FREE_MOVING, force(1.0, 0.0));
        truss.add_element(a, b, E, A).expect("valid element");

        let error = truss.set_nodal_displacements().expect_err("rigid body motion detected");
        assert_eq!(error, AnalysisError::Unstable { free_dofs: 4 });
        assert!(!truss.is_solved());
        assert_eq!(truss.displacement_vector(), DVector::zeros(4));
    }

    #[test]
    fn mechanism_is_unstable() {
        // Two collinear bars pinned at the ends cannot carry a transverse load.
        let mut truss = Truss::new();
        let a = truss.add_node(point(0.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
        let b = truss.add_node(point(1.0, 0.0), BoundaryCondition::FREE_MOVING, force(0.0, -10.0));
        let c = truss.add_node(point(2.0, 0.0), BoundaryCondition::FULLY_RESTRICTED, Force::default());
        truss.add_element(a, b, E, A).expect("valid element");
        truss.add_element(b, c, E, A).expect("valid element");

        assert_eq!(
            truss.solve_for_displacements(),
            Err(AnalysisError::Unstable { free_dofs: 2 })
        );
    }

    #[test]
    fn failed_solve_keeps_previous_state_untouched() {
        let (mut truss, [_, n2, _]) = triangle();
        truss.analyze().expect("triangle is stable");
        truss
            .set_boundary_condition(n2, BoundaryCondition::FREE_MOVING)
            .expect("known node");
        assert!(!truss.is_solved());

        let error = truss.analyze().expect_err("two restraints are not enough");
        assert!(matches!(error, AnalysisError::Unstable { .. }));
        assert_eq!(truss.displacement_vector(), DVector::zeros(6));
        assert!(truss.elements().all(|element| element.stress().is_none()));
    }

    #[test]
    fn stale_solution_is_rejected() {
        let (mut truss, [_, n2, _]) = triangle();
        let solution = truss.solve_for_displacements().expect("triangle is stable");
        truss
            .set_boundary_condition(n2, BoundaryCondition::FULLY_RESTRICTED)
            .expect("known node");
        assert!(matches!(
            truss.apply_displacements(&solution),
            Err(AnalysisError::StaleSolution { .. })
        ));
    }

    #[test]
    fn solution_from_previous_load_case_is_rejected() {
        let (mut truss, [_, _, n3]) = triangle();
        let solution = truss.solve_for_displacements().expect("triangle is stable");
        let before = truss.revision();
        truss.set_force(n3, force(0.0, -50.0e3)).expect("known node");
        assert!(truss.revision() > before);

        assert_eq!(
            truss.apply_displacements(&solution),
            Err(AnalysisError::StaleSolution {
                solution_revision: Some(before),
                truss_revision: truss.revision(),
                solution_dofs: 6,
                solution_free: 3,
                truss_dofs: 6,
                truss_free: 3,
            })
        );
        assert!(!truss.is_solved());
        assert_eq!(truss.displacement_vector(), DVector::zeros(6));

        // A fresh solve for the new load case balances the new load.
        truss.analyze().expect("triangle is stable");
        let reactions = truss.reactions().expect("solved");
        let sum_y: f64 = reactions
            .iter()
            .filter(|(dof, _)| dof % 2 == 1)
            .map(|(_, value)| value)
            .sum();
        assert_relative_eq!(sum_y, 50.0e3, max_relative = 1.0e-9);
    }

    #[test]
    fn solution_from_previous_properties_is_rejected() {
        let (mut truss, _) = triangle();
        let solution = truss.solve_for_displacements().expect("triangle is stable");
        truss
            .set_element_properties(EdgeIndex::new(2), E / 2.0, A)
            .expect("valid properties");

        assert!(matches!(
            truss.apply_displacements(&solution),
            Err(AnalysisError::StaleSolution { .. })
        ));
        assert!(!truss.is_solved());
    }

    #[test]
    fn solution_without_revision_is_rejected() {
        let (mut truss, _) = triangle();
        let detached = ReducedSystem::eliminate(
            &truss.global_stiffness(),
            &truss.force_vector(),
            &truss.supported_dofs(),
        )
        .expect("valid dofs")
        .solve()
        .expect("triangle is stable");

        assert!(matches!(
            truss.apply_displacements(&detached),
            Err(AnalysisError::StaleSolution {
                solution_revision: None,
                ..
            })
        ));
        let fresh = truss.solve_for_displacements().expect("triangle is stable");
        assert_eq!(fresh.values(), detached.values());
        truss.apply_displacements(&fresh).expect("current revision");
        assert!(truss.is_solved());
    }

    #[test]
    fn stresses_and_reactions_require_a_solution() {
        let (mut truss, _) = triangle();
        assert_eq!(truss.element_stresses(), Err(AnalysisError::NotSolved));
        assert_eq!(truss.reactions(), Err(AnalysisError::NotSolved));
        assert_eq!(truss.set_element_stresses(), Err(AnalysisError::NotSolved));
        assert_eq!(truss.set_reactions(), Err(AnalysisError::NotSolved));
    }

    #[test]
    fn reactions_balance_applied_loads() {
        let (mut truss, [n1, n2, n3]) = triangle();
        truss.analyze().expect("triangle is stable");

        let reactions = truss.reactions().expect("solved");
        let dofs: Vec<usize> = reactions.iter().map(|(dof, _)| *dof).collect();
        assert_eq!(dofs, truss.supported_dofs());

        // Statics: Rx1 = -P, Ry2 = P * h / b, Ry1 = -Ry2.
        let pin = truss.node(n1).expect("node exists").reaction();
        let roller = truss.node(n2).expect("node exists").reaction();
        assert_relative_eq!(pin.fx, -100.0e3, max_relative = 1.0e-9);
        assert_relative_eq!(roller.fy, 150.0e3, max_relative = 1.0e-9);
        assert_relative_eq!(pin.fy, -150.0e3, max_relative = 1.0e-9);
        assert_eq!(roller.fx, 0.0);
        assert_eq!(truss.node(n3).expect("node exists").reaction(), Reaction::default());
    }

    #[test]
    fn stresses_match_joint_equilibrium() {
        let (mut truss, _) = triangle();
        truss.analyze().expect("triangle is stable");

        let forces: Vec<f64> = truss
            .elements()
            .map(|element| element.axial_force().expect("stress recovered"))
            .collect();
        // Method of joints for P = 100 kN at the apex.
        let diagonal = 100.0e3 * 52.0_f64.sqrt() / 4.0;
        assert_relative_eq!(forces[0], 0.0, epsilon = 1.0e-3);
        assert_relative_eq!(forces[1], -150.0e3, max_relative = 1.0e-9);
        assert_relative_eq!(forces[2], diagonal, max_relative = 1.0e-9);
    }

    #[test]
    fn editing_invalidates_results() {
        let (mut truss, [_, _, n3]) = triangle();
        truss.analyze().expect("triangle is stable");
        assert!(truss.is_solved());

        truss.set_force(n3, force(0.0, -50.0e3)).expect("known node");
        assert!(!truss.is_solved());
        assert_eq!(truss.displacement_vector(), DVector::zeros(6));
        assert!(truss.elements().all(|element| element.stress().is_none()));
        assert_eq!(truss.node(n3).expect("node exists").force(), force(0.0, -50.0e3));
    }

    #[test]
    fn set_element_properties_validates_input() {
        let (mut truss, _) = triangle();
        let first = EdgeIndex::new(0);
        truss
            .set_element_properties(first, 7.0e10, 1.0e-3)
            .expect("valid properties");
        let element = truss.element(first).expect("element exists");
        assert_eq!(element.youngs_modulus(), 7.0e10);
        assert_eq!(element.area(), 1.0e-3);

        let missing = EdgeIndex::new(42);
        assert_eq!(
            truss.set_element_properties(missing, E, A),
            Err(TrussEditError::UnknownElement(missing))
        );
    }
}
