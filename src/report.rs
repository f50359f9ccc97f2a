use crate::analysis::AnalysisSummary;
use std::fmt::Write;

/// Render a textual summary of a truss analysis.
///
/// Displacements and stresses use scientific notation so the numbers can be
/// cross-checked against hand calculations.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();

    // The free-dof vector comes first; it is the raw output of the linear solve.
    let vector: Vec<String> = summary
        .free_displacements
        .iter()
        .map(|(_, value)| format!("{value:+.6e}"))
        .collect();
    writeln!(&mut output, "Free dof displacements: [{}]", vector.join(", "))
        .expect("writing to string cannot fail");

    output.push_str("Nodes:\n");
    for node in &summary.nodes {
        writeln!(
            &mut output,
            "  node {}: ux = {:+.3e}, uy = {:+.3e}, Rx = {:+.1}, Ry = {:+.1}",
            node.id, node.displacement.x, node.displacement.y, node.reaction.fx, node.reaction.fy
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("Elements:\n");
    for (index, element) in summary.elements.iter().enumerate() {
        writeln!(
            &mut output,
            "  element {index} ({} -> {}): L = {:.3}, stress = {:+.3e}, force = {:+.1}",
            element.node1, element.node2, element.length, element.stress, element.axial_force
        )
        .expect("writing to string cannot fail");
    }

    output
}
