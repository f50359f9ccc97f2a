use serde::Serialize;
use truss2d::{AnalysisError, Displacement, Reaction, Truss};

/// Results of one node after analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeResult {
    /// Node identifier.
    pub id: usize,
    /// Solved displacement.
    pub displacement: Displacement,
    /// Support reaction, zero for free axes.
    pub reaction: Reaction,
}

/// Results of one element after analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementResult {
    /// Identifier of the first node.
    pub node1: usize,
    /// Identifier of the second node.
    pub node2: usize,
    /// Undeformed length.
    pub length: f64,
    /// Axial stress, positive in tension.
    pub stress: f64,
    /// Axial force, positive in tension.
    pub axial_force: f64,
}

/// Summary of a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Global dof and displacement of every free dof.
    pub free_displacements: Vec<(usize, f64)>,
    /// Per-node results in identifier order.
    pub nodes: Vec<NodeResult>,
    /// Per-element results in insertion order.
    pub elements: Vec<ElementResult>,
    /// Global dof and reaction of every supported dof.
    pub reactions: Vec<(usize, f64)>,
}

/// Solve the truss, recover stresses and reactions, and collect the results.
///
/// The solver follows the direct stiffness method described at
/// <https://en.wikipedia.org/wiki/Direct_stiffness_method>.
pub fn run_analysis(truss: &mut Truss) -> Result<AnalysisSummary, AnalysisError> {
    let solution = truss.solve_for_displacements()?;
    truss.apply_displacements(&solution)?;
    truss.set_element_stresses()?;
    truss.set_reactions()?;

    let nodes = truss
        .nodes()
        .map(|node| NodeResult {
            id: node.id(),
            displacement: node.displacement(),
            reaction: node.reaction(),
        })
        .collect();
    let elements = truss
        .elements()
        .map(|element| ElementResult {
            node1: element.node1().id(),
            node2: element.node2().id(),
            length: element.length(),
            stress: element.stress().unwrap_or_default(),
            axial_force: element.axial_force().unwrap_or_default(),
        })
        .collect();

    Ok(AnalysisSummary {
        free_displacements: solution.iter().collect(),
        nodes,
        elements,
        reactions: truss.reactions()?,
    })
}
