use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a page, section or module. Stable across flatten/rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Payloads decide whether their node may own children.
pub trait Nestable {
    fn accepts_children(&self) -> bool;
}

/// A node of the content tree: structural fields plus a domain payload.
///
/// `parent_id` and `depth` are derived from the node's position and are
/// recomputed by every flatten/rebuild; they are never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Node<T> {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub children: Vec<Node<T>>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<NodeId>, data: T) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            depth: 0,
            children: Vec::new(),
            data,
        }
    }

    pub fn with_children(mut self, children: Vec<Node<T>>) -> Self {
        self.children = children;
        self
    }
}

/// Entry of a flattened tree. Carries no children; the hierarchy lives in
/// `parent_id` and the list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatNode<T> {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub depth: usize,
    #[serde(flatten)]
    pub data: T,
}

impl<T> FlatNode<T> {
    pub fn new(id: impl Into<NodeId>, parent_id: Option<NodeId>, data: T) -> Self {
        Self {
            id: id.into(),
            parent_id,
            depth: 0,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Text,
    Gallery,
    Article,
    News,
    Timeline,
    Newsletter,
    Form,
    Cta,
    List,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 9] = [
        ModuleKind::Text,
        ModuleKind::Gallery,
        ModuleKind::Article,
        ModuleKind::News,
        ModuleKind::Timeline,
        ModuleKind::Newsletter,
        ModuleKind::Form,
        ModuleKind::Cta,
        ModuleKind::List,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModuleKind::Text => "text",
            ModuleKind::Gallery => "gallery",
            ModuleKind::Article => "article",
            ModuleKind::News => "news",
            ModuleKind::Timeline => "timeline",
            ModuleKind::Newsletter => "newsletter",
            ModuleKind::Form => "form",
            ModuleKind::Cta => "cta",
            ModuleKind::List => "list",
        }
    }
}

/// Role of an entry. Serialized as the backend's `type` tag, with modules
/// carrying an extra `moduleType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Page,
    Section,
    Module {
        #[serde(rename = "moduleType", default = "default_module_kind")]
        module: ModuleKind,
    },
}

fn default_module_kind() -> ModuleKind {
    ModuleKind::Text
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Page => "page",
            ItemKind::Section => "section",
            ItemKind::Module { module } => module.label(),
        }
    }
}

/// Domain payload of the page/section/module tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageItem {
    pub name: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(flatten)]
    pub kind: ItemKind,
}

fn default_visible() -> bool {
    true
}

impl PageItem {
    pub fn page(name: impl Into<String>) -> Self {
        Self::with_kind(name, ItemKind::Page)
    }

    pub fn section(name: impl Into<String>) -> Self {
        Self::with_kind(name, ItemKind::Section)
    }

    pub fn module(name: impl Into<String>, module: ModuleKind) -> Self {
        Self::with_kind(name, ItemKind::Module { module })
    }

    fn with_kind(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            is_visible: true,
            kind,
        }
    }
}

impl Nestable for PageItem {
    fn accepts_children(&self) -> bool {
        !matches!(self.kind, ItemKind::Module { .. })
    }
}

pub type PageNode = Node<PageItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modules_are_leaves() {
        assert!(PageItem::page("Home").accepts_children());
        assert!(PageItem::section("Hero").accepts_children());
        for kind in ModuleKind::ALL {
            assert!(!PageItem::module("m", kind).accepts_children());
        }
    }

    #[test]
    fn test_node_wire_shape() {
        let node = Node::new("s1", PageItem::section("Hero"))
            .with_children(vec![Node::new("m1", PageItem::module("Intro", ModuleKind::Cta))]);

        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["id"], "s1");
        assert_eq!(json["type"], "section");
        assert_eq!(json["isVisible"], true);
        assert_eq!(json["children"][0]["type"], "module");
        assert_eq!(json["children"][0]["moduleType"], "cta");
        assert!(json.get("parentId").is_none());
    }

    #[test]
    fn test_node_from_backend_json() {
        let raw = r#"{
            "id": "m7",
            "name": "Latest news",
            "type": "module",
            "moduleType": "news",
            "isVisible": false
        }"#;

        let node: PageNode = serde_json::from_str(raw).unwrap();

        assert_eq!(node.id, NodeId::from("m7"));
        assert!(!node.data.is_visible);
        assert_eq!(
            node.data.kind,
            ItemKind::Module {
                module: ModuleKind::News
            }
        );
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_visibility_defaults_to_true() {
        let node: PageNode =
            serde_json::from_str(r#"{"id": "p1", "name": "Home", "type": "page"}"#).unwrap();
        assert!(node.data.is_visible);
    }
}
