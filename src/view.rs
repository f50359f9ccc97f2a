//! Read-only geometry handed to plotting front ends.
//!
//! Nothing here feeds back into the analysis: magnification and arrow
//! lengths only scale what is drawn.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::{Displacement, Point};
use crate::truss::Truss;

/// Largest spacing percentage offered by [`Spacing::spacing_map`].
pub const MAX_SPACING_PERCENTAGE: u32 = 200;

/// Drawing offsets expressed as a percentage of the longest element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Spacing {
    /// Length of the longest element, zero for a truss without elements.
    longest: f64,
}

impl Spacing {
    /// Measure the longest element of `truss`.
    #[must_use]
    pub fn new(truss: &Truss) -> Self {
        let longest = truss
            .elements()
            .map(|element| element.length())
            .fold(0.0, f64::max);
        Self { longest }
    }

    /// Length of the longest element.
    #[must_use]
    pub fn longest(&self) -> f64 {
        self.longest
    }

    /// `percentage` percent of the longest element length.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, BoundaryCondition, Force, Spacing, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_node(point(0.0, 0.0), BoundaryCondition::FREE_MOVING, Force::default());
    /// let b = truss.add_node(point(0.0, 6.0), BoundaryCondition::FREE_MOVING, Force::default());
    /// truss.add_element(a, b, 2.0e11, 2.3e-3).expect("valid element");
    /// assert!((Spacing::new(&truss).spacing(10) - 0.6).abs() < 1.0e-12);
    /// ```
    #[must_use]
    pub fn spacing(&self, percentage: u32) -> f64 {
        f64::from(percentage) * self.longest / 100.0
    }

    /// Spacings for `0, 10, ..., 200` percent.
    #[must_use]
    pub fn spacing_map(&self) -> BTreeMap<u32, f64> {
        (0..=MAX_SPACING_PERCENTAGE)
            .step_by(10)
            .map(|percentage| (percentage, self.spacing(percentage)))
            .collect()
    }
}

/// Straight line between two drawn points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    /// Start of the line, at the element's first node.
    pub start: Point,
    /// End of the line, at the element's second node.
    pub end: Point,
}

/// Direction of a load component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Global X.
    X,
    /// Global Y.
    Y,
}

/// Arrow representing one non-zero load component at a node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForceArrow {
    /// Label such as `Fx2`.
    pub label: String,
    /// Component direction.
    pub axis: Axis,
    /// Load magnitude with sign.
    pub magnitude: f64,
    /// Arrow tail, at the node.
    pub tail: Point,
    /// Arrow head, offset along the load sign by the arrow length.
    pub head: Point,
}

/// Axis-aligned box enclosing everything a renderer draws.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    /// Lower-left corner.
    pub min: Point,
    /// Upper-right corner.
    pub max: Point,
}

impl Bounds {
    /// Smallest box containing every point, `None` when there are no points.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, Bounds};
    ///
    /// let bounds = Bounds::enclosing([point(1.0, -2.0), point(-3.0, 4.0)]).expect("two points");
    /// assert_eq!(bounds.min, point(-3.0, -2.0));
    /// assert_eq!(bounds.max, point(1.0, 4.0));
    /// ```
    #[must_use]
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            |bounds, p| Self {
                min: Point::new(bounds.min.x.min(p.x), bounds.min.y.min(p.y)),
                max: Point::new(bounds.max.x.max(p.x), bounds.max.y.max(p.y)),
            },
        ))
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Element lines in the undeformed configuration.
#[must_use]
pub fn undeformed_segments(truss: &Truss) -> Vec<Segment> {
    truss
        .elements()
        .map(|element| Segment {
            start: element.node1().position(),
            end: element.node2().position(),
        })
        .collect()
}

/// Element lines with every node shifted by its displacement times `magnification`.
#[must_use]
pub fn deformed_segments(truss: &Truss, magnification: f64) -> Vec<Segment> {
    truss
        .elements()
        .map(|element| Segment {
            start: element
                .node1()
                .position()
                .displaced(element.node1().displacement(), magnification),
            end: element
                .node2()
                .position()
                .displaced(element.node2().displacement(), magnification),
        })
        .collect()
}

/// Load arrows of length `arrow_length` for every non-zero load component.
#[must_use]
pub fn force_arrows(truss: &Truss, arrow_length: f64) -> Vec<ForceArrow> {
    let mut arrows = Vec::new();
    for node in truss.nodes() {
        let tail = node.position();
        let load = node.force();
        if load.fx != 0.0 {
            arrows.push(ForceArrow {
                label: format!("Fx{}", node.id()),
                axis: Axis::X,
                magnitude: load.fx,
                tail,
                head: Point::new(tail.x + arrow_length.copysign(load.fx), tail.y),
            });
        }
        if load.fy != 0.0 {
            arrows.push(ForceArrow {
                label: format!("Fy{}", node.id()),
                axis: Axis::Y,
                magnitude: load.fy,
                tail,
                head: Point::new(tail.x, tail.y + arrow_length.copysign(load.fy)),
            });
        }
    }
    arrows
}

/// Serializable snapshot of everything a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrussView {
    /// Undeformed node positions.
    pub nodes: Vec<Point>,
    /// Nodal displacements.
    pub displacements: Vec<Displacement>,
    /// Undeformed element lines.
    pub undeformed: Vec<Segment>,
    /// Magnified deformed element lines.
    pub deformed: Vec<Segment>,
    /// Load arrows.
    pub forces: Vec<ForceArrow>,
    /// Magnification applied to `deformed`.
    pub magnification: f64,
    /// Box around the nodes, both element outlines and the arrow heads; `None`
    /// for an empty truss.
    pub bounds: Option<Bounds>,
}

impl TrussView {
    /// Capture the truss, magnifying displacements by the spacing at
    /// `magnification_percentage` and sizing arrows at ten percent of the
    /// longest element.
    #[must_use]
    pub fn capture(truss: &Truss, magnification_percentage: u32) -> Self {
        let spacing = Spacing::new(truss);
        let magnification = spacing.spacing(magnification_percentage);
        let nodes: Vec<Point> = truss.nodes().map(|node| node.position()).collect();
        let undeformed = undeformed_segments(truss);
        let deformed = deformed_segments(truss, magnification);
        let forces = force_arrows(truss, spacing.spacing(10));
        let bounds = Bounds::enclosing(
            nodes
                .iter()
                .copied()
                .chain(
                    undeformed
                        .iter()
                        .chain(&deformed)
                        .flat_map(|segment| [segment.start, segment.end]),
                )
                .chain(forces.iter().map(|arrow| arrow.head)),
        );
        Self {
            nodes,
            displacements: truss.nodes().map(|node| node.displacement()).collect(),
            undeformed,
            deformed,
            forces,
            magnification,
            bounds,
        }
    }
}
