//! Model data: nodes, element groups and load cases.
//!
//! Nodes and elements are numbered 1, 2, 3, ... in input order and are
//! referenced internally by 0-based index. Every group holds elements of a
//! single kind together with the material sets they refer to.

use crate::element::{CompactStiffness, Element, ElementKind};
use crate::equations::{number_equations, LocationMap};
use crate::error::{Error, RecordKind, Result};
use crate::load::LoadCase;
use crate::material::Material;
use crate::node::Node;
use crate::types::{Point3, StressTensor};

/// One element of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    /// 1-based element number within its group.
    pub number: usize,
    /// Node indices (0-based).
    pub nodes: Vec<usize>,
    /// 1-based material set number.
    pub material_set: usize,
}

/// Elements of one kind sharing a list of material sets.
#[derive(Debug, Clone)]
pub struct ElementGroup {
    /// 1-based group number.
    pub number: usize,
    kind: ElementKind,
    materials: Vec<Material>,
    elements: Vec<ElementRecord>,
}

/// An element resolved against its group: kind, connectivity and material.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    pub kind: ElementKind,
    pub record: &'a ElementRecord,
    pub material: &'a Material,
}

impl<'a> ElementView<'a> {
    /// Nodal coordinates in local node order.
    pub fn coords(&self, nodes: &[Node]) -> Vec<Point3> {
        self.record.nodes.iter().map(|&n| nodes[n].coords).collect()
    }

    /// Global equations of the element's local DOFs.
    pub fn location_map(&self, nodes: &[Node]) -> LocationMap {
        LocationMap::build(nodes, &self.record.nodes, self.kind.dof_slots())
    }

    /// Number of entries in the compact stiffness, ND(ND+1)/2.
    pub fn stiffness_size(&self) -> usize {
        let nd = self.kind.n_dofs();
        nd * (nd + 1) / 2
    }

    /// Element stiffness packed as its upper triangle.
    pub fn compact_stiffness(&self, nodes: &[Node]) -> Result<CompactStiffness> {
        let k = self.kind.stiffness(&self.coords(nodes), self.material)?;
        CompactStiffness::from_dense(&k)
    }

    /// Stresses from a global displacement vector (indexed by equation - 1).
    pub fn stress(&self, nodes: &[Node], displacements: &[f64]) -> Result<Vec<StressTensor>> {
        let local = self.location_map(nodes).gather(displacements);
        self.kind.stress(&self.coords(nodes), &local, self.material)
    }
}

impl ElementGroup {
    /// Empty group with its material sets.
    pub fn new(number: usize, kind: ElementKind, materials: Vec<Material>) -> Self {
        Self {
            number,
            kind,
            materials,
            elements: Vec::new(),
        }
    }

    /// Element kind of the group.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Material sets, set number `s` at index `s - 1`.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Append an element.
    ///
    /// `number` must continue the sequence, `nodes` are 0-based node indices
    /// (checked against the model by [`Model::add_element`]) and
    /// `material_set` must name one of the group's sets.
    pub fn add_element(
        &mut self,
        number: usize,
        nodes: Vec<usize>,
        material_set: usize,
    ) -> Result<usize> {
        let expected = self.elements.len() + 1;
        if number != expected {
            return Err(Error::Ordering {
                kind: RecordKind::Element,
                expected,
                found: number,
            });
        }
        if nodes.len() != self.kind.n_nodes() {
            return Err(Error::Mesh(format!(
                "{} element {} of group {} requires {} nodes, got {}",
                self.kind.name(),
                number,
                self.number,
                self.kind.n_nodes(),
                nodes.len()
            )));
        }
        if material_set == 0 || material_set > self.materials.len() {
            return Err(Error::MaterialReference {
                group: self.number,
                element: number,
                set: material_set,
                available: self.materials.len(),
            });
        }
        self.elements.push(ElementRecord {
            number,
            nodes,
            material_set,
        });
        Ok(expected - 1)
    }

    /// Resolve element `index` (0-based).
    pub fn element(&self, index: usize) -> ElementView<'_> {
        let record = &self.elements[index];
        ElementView {
            kind: self.kind,
            record,
            material: &self.materials[record.material_set - 1],
        }
    }

    /// All elements, resolved, in input order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ElementView<'_>> + '_ {
        (0..self.elements.len()).map(move |i| self.element(i))
    }
}

/// Complete analysis model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Heading used to label output.
    pub title: String,
    nodes: Vec<Node>,
    groups: Vec<ElementGroup>,
    load_cases: Vec<LoadCase>,
    neq: Option<usize>,
}

impl Model {
    /// Create a new empty model.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Append a node; its number must continue the sequence.
    pub fn add_node(&mut self, node: Node) -> Result<usize> {
        let expected = self.nodes.len() + 1;
        if node.number != expected {
            return Err(Error::Ordering {
                kind: RecordKind::Node,
                expected,
                found: node.number,
            });
        }
        self.nodes.push(node);
        self.neq = None;
        Ok(expected - 1)
    }

    /// Append an element group, returning its index.
    pub fn add_group(&mut self, kind: ElementKind, materials: Vec<Material>) -> usize {
        let index = self.groups.len();
        self.groups
            .push(ElementGroup::new(index + 1, kind, materials));
        index
    }

    /// Append an element to group `group` (0-based), with 1-based node numbers.
    pub fn add_element(
        &mut self,
        group: usize,
        number: usize,
        node_numbers: &[usize],
        material_set: usize,
    ) -> Result<usize> {
        let n_nodes = self.nodes.len();
        let indices = node_numbers
            .iter()
            .map(|&n| {
                if n == 0 || n > n_nodes {
                    Err(Error::Mesh(format!(
                        "element {} of group {} references node {}, but the model has {} nodes",
                        number,
                        group + 1,
                        n,
                        n_nodes
                    )))
                } else {
                    Ok(n - 1)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let n_groups = self.groups.len();
        self.groups
            .get_mut(group)
            .ok_or_else(|| {
                Error::Mesh(format!(
                    "element group {} does not exist ({} defined)",
                    group + 1,
                    n_groups
                ))
            })?
            .add_element(number, indices, material_set)
    }

    /// Append a load case; its number must continue the sequence and every
    /// load must reference an existing node and a direction in 1..=6.
    pub fn add_load_case(&mut self, case: LoadCase) -> Result<usize> {
        let expected = self.load_cases.len() + 1;
        if case.number != expected {
            return Err(Error::Ordering {
                kind: RecordKind::LoadCase,
                expected,
                found: case.number,
            });
        }
        case.validate(self.nodes.len())?;
        self.load_cases.push(case);
        Ok(expected - 1)
    }

    /// Assign equation numbers to all free DOFs, returning NEQ.
    pub fn number_equations(&mut self) -> usize {
        let neq = number_equations(&mut self.nodes);
        self.neq = Some(neq);
        neq
    }

    /// NEQ, once equations have been numbered.
    pub fn neq(&self) -> Option<usize> {
        self.neq
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn groups(&self) -> &[ElementGroup] {
        &self.groups
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of elements over all groups.
    pub fn n_elements(&self) -> usize {
        self.groups.iter().map(ElementGroup::n_elements).sum()
    }

    /// All elements of all groups, in group then input order.
    pub fn elements(&self) -> impl Iterator<Item = ElementView<'_>> + '_ {
        self.groups.iter().flat_map(|g| g.iter())
    }

    /// Location maps of every element, in [`Model::elements`] order.
    pub fn location_maps(&self) -> Result<Vec<LocationMap>> {
        if self.neq.is_none() {
            return Err(Error::Mesh("equations have not been numbered".into()));
        }
        Ok(self.elements().map(|e| e.location_map(&self.nodes)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::NodalLoad;
    use crate::node::Restraint;

    fn bar_model() -> Model {
        let mut model = Model::new("two bars");
        model
            .add_node(Node::new(1, Point3::zeros(), [Restraint::Fixed; 3]))
            .unwrap();
        model.add_node(Node::free(2, Point3::new(1.0, 0.0, 0.0))).unwrap();
        model
            .add_node(Node::new(3, Point3::new(2.0, 0.0, 0.0), [Restraint::Fixed; 3]))
            .unwrap();
        let g = model.add_group(
            ElementKind::from_code(1).unwrap(),
            vec![Material::bar(100.0, 1.0).unwrap()],
        );
        model.add_element(g, 1, &[1, 2], 1).unwrap();
        model.add_element(g, 2, &[2, 3], 1).unwrap();
        model
    }

    #[test]
    fn test_model_creation() {
        let model = bar_model();
        assert_eq!(model.n_nodes(), 3);
        assert_eq!(model.n_elements(), 2);
        assert_eq!(model.groups()[0].elements()[1].nodes, vec![1, 2]);
    }

    #[test]
    fn test_nodes_out_of_order() {
        let mut model = Model::new("");
        let err = model.add_node(Node::free(2, Point3::zeros())).unwrap_err();
        assert!(matches!(
            err,
            Error::Ordering {
                kind: RecordKind::Node,
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_elements_out_of_order() {
        let mut model = bar_model();
        let err = model.add_element(0, 4, &[1, 3], 1).unwrap_err();
        assert!(matches!(err, Error::Ordering { expected: 3, .. }));
    }

    #[test]
    fn test_invalid_element_node_count() {
        let mut model = bar_model();
        assert!(matches!(
            model.add_element(0, 3, &[1], 1),
            Err(Error::Mesh(_))
        ));
    }

    #[test]
    fn test_invalid_node_reference() {
        let mut model = bar_model();
        assert!(matches!(
            model.add_element(0, 3, &[1, 9], 1),
            Err(Error::Mesh(_))
        ));
    }

    #[test]
    fn test_material_reference_out_of_range() {
        let mut model = bar_model();
        let err = model.add_element(0, 3, &[1, 3], 2).unwrap_err();
        assert!(matches!(
            err,
            Error::MaterialReference {
                group: 1,
                element: 3,
                set: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_location_maps_require_numbering() {
        let mut model = bar_model();
        assert!(model.location_maps().is_err());
        assert_eq!(model.number_equations(), 3);
        let maps = model.location_maps().unwrap();
        assert_eq!(
            maps[0].as_slice(),
            &[None, None, None, Some(1), Some(2), Some(3)]
        );
        assert_eq!(maps[1].first_equation(), Some(1));
    }

    #[test]
    fn test_load_case_sequence() {
        let mut model = bar_model();
        let case = LoadCase::new(2, vec![NodalLoad::new(2, 1, 1.0)]);
        assert!(matches!(
            model.add_load_case(case),
            Err(Error::Ordering {
                kind: RecordKind::LoadCase,
                ..
            })
        ));
        let case = LoadCase::new(1, vec![NodalLoad::new(2, 1, 1.0)]);
        assert_eq!(model.add_load_case(case).unwrap(), 0);
    }
}
