//! Layer tree of a layered document.
//!
//! Only visibility and bounds are typed. Everything else a layer carries
//! (name, blend settings, text and font records, effects) travels along as
//! [`LayerExtra`] and is never inspected by the checks.

use serde::Serialize;

/// Layer rectangle in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerBounds {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl LayerBounds {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Opaque additional-information block attached to a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedBlock {
    /// Four-character block key (e.g., "TySh", "lsct", "luni")
    pub key: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Pass-through layer data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerExtra {
    pub name: String,
    pub opacity: u8,
    pub blend_mode: String,
    pub blocks: Vec<TaggedBlock>,
}

/// Fields shared by every layer kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerProps {
    pub visible: bool,
    pub bounds: LayerBounds,
    pub extra: LayerExtra,
}

/// One node of the layer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerNode {
    /// Pixel layer
    Layer(LayerProps),
    /// Type layer
    Text(LayerProps),
    /// Layer group with its children, topmost first
    Group {
        #[serde(flatten)]
        props: LayerProps,
        children: Vec<LayerNode>,
    },
}

impl LayerNode {
    pub fn props(&self) -> &LayerProps {
        match self {
            Self::Layer(props) | Self::Text(props) => props,
            Self::Group { props, .. } => props,
        }
    }

    pub fn visible(&self) -> bool {
        self.props().visible
    }

    pub fn bounds(&self) -> LayerBounds {
        self.props().bounds
    }
}

/// Structural role of a flat layer record, before the tree is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Pixel,
    Text,
    /// Opens a group (the folder record itself)
    GroupStart,
    /// Closes the innermost open group
    GroupEnd,
}

/// Top-level children of a layered document, topmost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LayerTree {
    children: Vec<LayerNode>,
}

impl LayerTree {
    /// Assemble a tree from records stored bottom-most first.
    ///
    /// Unbalanced group markers are tolerated: a stray end marker is dropped
    /// and groups left open at the end are closed implicitly.
    pub fn from_records(records: Vec<(RecordKind, LayerProps)>) -> Self {
        let mut root = Vec::new();
        let mut open: Vec<(LayerProps, Vec<LayerNode>)> = Vec::new();

        fn push(root: &mut Vec<LayerNode>, open: &mut [(LayerProps, Vec<LayerNode>)], node: LayerNode) {
            match open.last_mut() {
                Some((_, children)) => children.push(node),
                None => root.push(node),
            }
        }

        for (kind, props) in records.into_iter().rev() {
            match kind {
                RecordKind::GroupStart => open.push((props, Vec::new())),
                RecordKind::GroupEnd => {
                    if let Some((props, children)) = open.pop() {
                        push(&mut root, &mut open, LayerNode::Group { props, children });
                    }
                }
                RecordKind::Text => push(&mut root, &mut open, LayerNode::Text(props)),
                RecordKind::Pixel => push(&mut root, &mut open, LayerNode::Layer(props)),
            }
        }
        while let Some((props, children)) = open.pop() {
            push(&mut root, &mut open, LayerNode::Group { props, children });
        }

        Self { children: root }
    }

    /// Number of top-level children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[LayerNode] {
        &self.children
    }
}
