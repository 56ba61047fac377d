pub mod serialization;

use std::fmt;

use crate::geometry::{build_signature, GeometrySignature, MeshData};
use crate::identity::StableId;
use crate::materials::{Material, MaterialReference};

/// Position of a node as child indices from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub Vec<usize>);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// One material slot of an extracted element.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSlot {
    pub index: usize,
    pub reference: MaterialReference,
}

/// Renderable element extracted from a hierarchy at scan time.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderElement {
    pub handle: ElementHandle,
    /// Segment names from the root, root included.
    pub path: Vec<String>,
    /// `None` when the renderer has no geometry.
    pub signature: Option<GeometrySignature>,
    pub slots: Vec<MaterialSlot>,
    pub stable_id: Option<StableId>,
}

impl RenderElement {
    pub fn display_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    pub fn path_string(&self) -> String {
        self.path.join("/")
    }

    pub fn material_references(&self) -> Vec<MaterialReference> {
        self.slots.iter().map(|slot| slot.reference.clone()).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no renderer at {0}")]
    UnknownElement(ElementHandle),
}

/// Hierarchy traversal and slot mutation, as provided by the host scene graph.
pub trait Hierarchy {
    fn root_name(&self) -> &str;

    /// Every renderable element, in a stable traversal order.
    fn render_elements(&self) -> Vec<RenderElement>;

    fn material_slots(&self, handle: &ElementHandle) -> Option<Vec<Option<Material>>>;

    fn set_material_slots(
        &mut self,
        handle: &ElementHandle,
        slots: Vec<Option<Material>>,
    ) -> Result<(), SceneError>;
}

/// Mesh plus per-slot material assignment of a node.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshRenderer {
    #[serde(default)]
    pub mesh: Option<MeshData>,
    #[serde(default)]
    pub materials: Vec<Option<Material>>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<MeshRenderer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            renderer: None,
            children: Vec::new(),
        }
    }

    pub fn with_renderer(mut self, mesh: Option<MeshData>, materials: Vec<Option<Material>>) -> Self {
        self.renderer = Some(MeshRenderer { mesh, materials });
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

/// In-memory hierarchy loaded from a scene description file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneGraph {
    root: SceneNode,
}

impl SceneGraph {
    pub fn new(root: SceneNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn node(&self, handle: &ElementHandle) -> Option<&SceneNode> {
        let mut node = &self.root;
        for &index in &handle.0 {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, handle: &ElementHandle) -> Option<&mut SceneNode> {
        let mut node = &mut self.root;
        for &index in &handle.0 {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }
}

impl Hierarchy for SceneGraph {
    fn root_name(&self) -> &str {
        &self.root.name
    }

    fn render_elements(&self) -> Vec<RenderElement> {
        let mut elements = Vec::new();
        let mut path = Vec::new();
        collect_elements(&self.root, &mut Vec::new(), &mut path, &mut elements);
        elements
    }

    fn material_slots(&self, handle: &ElementHandle) -> Option<Vec<Option<Material>>> {
        let renderer = self.node(handle)?.renderer.as_ref()?;
        Some(renderer.materials.clone())
    }

    fn set_material_slots(
        &mut self,
        handle: &ElementHandle,
        slots: Vec<Option<Material>>,
    ) -> Result<(), SceneError> {
        let renderer = self
            .node_mut(handle)
            .and_then(|node| node.renderer.as_mut())
            .ok_or_else(|| SceneError::UnknownElement(handle.clone()))?;
        renderer.materials = slots;
        Ok(())
    }
}

fn collect_elements(
    node: &SceneNode,
    indices: &mut Vec<usize>,
    path: &mut Vec<String>,
    out: &mut Vec<RenderElement>,
) {
    path.push(node.name.clone());

    if let Some(renderer) = &node.renderer {
        out.push(RenderElement {
            handle: ElementHandle(indices.clone()),
            path: path.clone(),
            signature: build_signature(renderer.mesh.as_ref()),
            slots: renderer
                .materials
                .iter()
                .enumerate()
                .map(|(index, material)| MaterialSlot {
                    index,
                    reference: material
                        .as_ref()
                        .map(Material::reference)
                        .unwrap_or_default(),
                })
                .collect(),
            stable_id: renderer.mesh.as_ref().and_then(MeshData::stable_id),
        });
    }

    for (index, child) in node.children.iter().enumerate() {
        indices.push(index);
        collect_elements(child, indices, path, out);
        indices.pop();
    }

    path.pop();
}
