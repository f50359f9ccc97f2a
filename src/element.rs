//! Two-node axial elements.

use nalgebra::{Matrix4, RowVector4, Vector4};
use petgraph::graph::EdgeIndex;

use crate::errors::ElementPropertyError;
use crate::node::Node;

/// Material, section and recovered stress of an element, stored on a graph edge.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Member {
    /// Young's modulus.
    pub(crate) youngs_modulus: f64,
    /// Cross-sectional area.
    pub(crate) area: f64,
    /// Axial stress, `None` until stresses are recovered.
    pub(crate) stress: Option<f64>,
}

impl Member {
    /// Validate and store element properties.
    pub(crate) fn new(youngs_modulus: f64, area: f64) -> Result<Self, ElementPropertyError> {
        // Negated comparisons also reject NaN.
        if !(area > 0.0) || !area.is_finite() {
            return Err(ElementPropertyError::NonPositiveArea { area });
        }
        if !(youngs_modulus > 0.0) || !youngs_modulus.is_finite() {
            return Err(ElementPropertyError::NonPositiveYoungsModulus { youngs_modulus });
        }
        Ok(Self {
            youngs_modulus,
            area,
            stress: None,
        })
    }
}

/// Read-only view of an axial element together with its two endpoint nodes.
///
/// Endpoints are shared with the other elements of the truss, so the view
/// borrows them from the owning [`Truss`](crate::Truss) instead of holding
/// copies. Element construction guarantees distinct endpoints and a non-zero
/// length, which keeps the direction cosines finite.
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    /// Edge identifier inside the truss graph.
    id: EdgeIndex,
    /// First endpoint.
    node1: &'a Node,
    /// Second endpoint.
    node2: &'a Node,
    /// Material and section data.
    member: &'a Member,
}

impl<'a> Element<'a> {
    /// Assemble a view from its parts.
    pub(crate) fn new(id: EdgeIndex, node1: &'a Node, node2: &'a Node, member: &'a Member) -> Self {
        Self {
            id,
            node1,
            node2,
            member,
        }
    }

    /// Identifier of the element inside its truss.
    #[must_use]
    pub fn id(&self) -> EdgeIndex {
        self.id
    }

    /// First endpoint.
    #[must_use]
    pub fn node1(&self) -> &'a Node {
        self.node1
    }

    /// Second endpoint.
    #[must_use]
    pub fn node2(&self) -> &'a Node {
        self.node2
    }

    /// Young's modulus `E`.
    #[must_use]
    pub fn youngs_modulus(&self) -> f64 {
        self.member.youngs_modulus
    }

    /// Cross-sectional area `A`.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.member.area
    }

    /// Undeformed length.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, BoundaryCondition, Force, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_node(point(0.0, 0.0), BoundaryCondition::FREE_MOVING, Force::default());
    /// let b = truss.add_node(point(192.0, 144.0), BoundaryCondition::FREE_MOVING, Force::default());
    /// let rod = truss.add_element(a, b, 3.0e4, 10.0).expect("valid rod");
    /// assert_eq!(truss.element(rod).expect("rod exists").length(), 240.0);
    /// ```
    #[must_use]
    pub fn length(&self) -> f64 {
        self.node1.position().distance_to(self.node2.position())
    }

    /// Cosine of the angle between the element axis and global X.
    #[must_use]
    pub fn cos(&self) -> f64 {
        (self.node2.x() - self.node1.x()) / self.length()
    }

    /// Sine of the angle between the element axis and global X.
    #[must_use]
    pub fn sin(&self) -> f64 {
        (self.node2.y() - self.node1.y()) / self.length()
    }

    /// Axial stiffness `E·A/L`.
    #[must_use]
    pub fn axial_stiffness(&self) -> f64 {
        self.youngs_modulus() * self.area() / self.length()
    }

    /// Element stiffness matrix in global coordinates.
    ///
    /// Rows and columns follow [`Element::node_dofs`].
    #[must_use]
    pub fn global_stiffness_matrix(&self) -> Matrix4<f64> {
        let c = self.cos();
        let s = self.sin();
        let cc = c * c;
        let cs = c * s;
        let ss = s * s;
        #[rustfmt::skip]
        let pattern = Matrix4::new(
             cc,  cs, -cc, -cs,
             cs,  ss, -cs, -ss,
            -cc, -cs,  cc,  cs,
            -cs, -ss,  cs,  ss,
        );
        pattern * self.axial_stiffness()
    }

    /// Row `[-c, -s, c, s]` projecting endpoint displacements onto the element axis.
    #[must_use]
    pub fn transformation_row(&self) -> RowVector4<f64> {
        let c = self.cos();
        let s = self.sin();
        RowVector4::new(-c, -s, c, s)
    }

    /// Global dofs `[x1, y1, x2, y2]` of the endpoints.
    #[must_use]
    pub fn node_dofs(&self) -> [usize; 4] {
        let first = self.node1.dofs();
        let second = self.node2.dofs();
        [first.x, first.y, second.x, second.y]
    }

    /// Endpoint displacements currently stored on the nodes, in [`Element::node_dofs`] order.
    #[must_use]
    pub fn nodal_displacements(&self) -> Vector4<f64> {
        let first = self.node1.displacement();
        let second = self.node2.displacement();
        Vector4::new(first.x, first.y, second.x, second.y)
    }

    /// Axial stress produced by the endpoint displacements `u`.
    ///
    /// Positive values are tensile.
    #[must_use]
    pub fn axial_stress(&self, u: &Vector4<f64>) -> f64 {
        self.youngs_modulus() / self.length() * (self.transformation_row() * u)[0]
    }

    /// Stress written by the last stress recovery.
    ///
    /// Returns `None` until [`Truss::set_element_stresses`](crate::Truss::set_element_stresses)
    /// has run on a solved truss.
    #[must_use]
    pub fn stress(&self) -> Option<f64> {
        self.member.stress
    }

    /// Axial force corresponding to [`Element::stress`].
    #[must_use]
    pub fn axial_force(&self) -> Option<f64> {
        self.member.stress.map(|stress| stress * self.area())
    }
}
