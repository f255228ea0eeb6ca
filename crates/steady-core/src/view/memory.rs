//! In-memory document used by tests, benchmarks and the demo simulator.

use super::{
    ElementId, ElementInfo, PageView, PointerEventKind, StylePatch, VisualState, ACTIVE_CLASS,
    ASSIST_MARKER_ATTR, OPT_OUT_ATTR,
};
use crate::error::ViewError;
use crate::geometry::{distance, Point, Rect};
use std::collections::BTreeMap;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder, Debug, Clone)]
pub struct NodeSpec {
    #[builder(setter(into))]
    pub tag: String,
    /// Border box as laid out before any assistance.
    pub rect: Rect,
    #[builder(default, setter(strip_option))]
    pub parent: Option<ElementId>,
    #[builder(default, setter(strip_option, into))]
    pub role: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub input_type: Option<String>,
    #[builder(default, setter(strip_option, into))]
    pub cursor: Option<String>,
    #[builder(default)]
    pub click_handler: bool,
    #[builder(default)]
    pub opted_out: bool,
    #[builder(default)]
    pub padding: f64,
    #[builder(default = 16.0)]
    pub font_size: f64,
}

#[derive(Debug, Clone)]
struct PageNode {
    parent: Option<ElementId>,
    info: ElementInfo,
    content: Rect,
    visual: VisualState,
    attached: bool,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPage {
    nodes: Vec<PageNode>,
    listeners: BTreeMap<PointerEventKind, usize>,
    mutations: usize,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spec: NodeSpec) -> ElementId {
        let id = ElementId(self.nodes.len() as u64 + 1);
        let padding = spec.padding.max(0.0);
        self.nodes.push(PageNode {
            parent: spec.parent,
            info: ElementInfo {
                tag: spec.tag.to_lowercase(),
                role: spec.role,
                input_type: spec.input_type.map(|t| t.to_lowercase()),
                cursor: spec.cursor,
                has_click_handler: spec.click_handler,
                opted_out: spec.opted_out,
            },
            content: spec.rect.inflate(-padding),
            visual: VisualState {
                padding_px: padding,
                font_size_px: spec.font_size,
                ..Default::default()
            },
            attached: true,
        });
        id
    }

    /// Shorthand for a `<button>` centred on `(cx, cy)`.
    pub fn add_button(&mut self, cx: f64, cy: f64, width: f64, height: f64) -> ElementId {
        self.add(
            NodeSpec::builder()
                .tag("button")
                .rect(Rect::centered(cx, cy, width, height))
                .build(),
        )
    }

    /// Detaches the node and its whole subtree.
    pub fn remove(&mut self, id: ElementId) {
        let doomed: Vec<ElementId> = (1..=self.nodes.len() as u64)
            .map(ElementId)
            .filter(|&n| self.contains(id, n))
            .collect();
        for n in doomed {
            if let Some(node) = self.node_mut(n) {
                node.attached = false;
            }
        }
    }

    /// Deepest attached node under `p`; later siblings win on overlap.
    pub fn hit_test(&self, p: Point) -> Option<ElementId> {
        let mut best: Option<(ElementId, usize)> = None;
        for idx in 0..self.nodes.len() {
            let id = ElementId(idx as u64 + 1);
            let Some(rect) = self.measure(id) else {
                continue;
            };
            if !rect.contains(p) {
                continue;
            }
            let depth = self.depth(id);
            if best.map_or(true, |(_, d)| depth >= d) {
                best = Some((id, depth));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Attached nodes currently carrying the assistance marker.
    pub fn marked(&self) -> Vec<ElementId> {
        self.ids()
            .filter(|&id| self.node(id).is_some_and(|n| n.attached && n.visual.marker.is_some()))
            .collect()
    }

    /// Marker attributes and classes a browser document would show for `id`.
    pub fn attributes(&self, id: ElementId) -> Vec<(&'static str, String)> {
        let Some(node) = self.node(id).filter(|n| n.attached) else {
            return Vec::new();
        };
        let mut attrs = Vec::new();
        if let Some(reason) = node.visual.marker {
            attrs.push((ASSIST_MARKER_ATTR, reason.to_string()));
        }
        if node.visual.active_class {
            attrs.push(("class", ACTIVE_CLASS.to_string()));
        }
        if node.info.opted_out {
            attrs.push((OPT_OUT_ATTR, String::new()));
        }
        attrs
    }

    /// Attached nodes currently faded by neighbour suppression.
    pub fn faded(&self) -> Vec<ElementId> {
        self.ids()
            .filter(|&id| self.node(id).is_some_and(|n| n.attached && n.visual.faded))
            .collect()
    }

    pub fn listener_count(&self, kind: PointerEventKind) -> usize {
        self.listeners.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.values().sum()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> {
        (1..=self.nodes.len() as u64).map(ElementId)
    }

    fn depth(&self, id: ElementId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            depth += 1;
            if depth > super::MAX_TREE_DEPTH {
                break;
            }
            cursor = self.parent(p);
        }
        depth
    }

    fn node(&self, id: ElementId) -> Option<&PageNode> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.nodes.get(idx)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut PageNode> {
        let idx = (id.0 as usize).checked_sub(1)?;
        self.nodes.get_mut(idx)
    }

    fn attached(&self, id: ElementId) -> Option<&PageNode> {
        self.node(id).filter(|n| n.attached)
    }
}

impl PageView for MemoryPage {
    fn is_attached(&self, id: ElementId) -> bool {
        self.attached(id).is_some()
    }

    fn describe(&self, id: ElementId) -> Option<ElementInfo> {
        self.attached(id).map(|n| n.info.clone())
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    fn measure(&self, id: ElementId) -> Option<Rect> {
        let node = self.attached(id)?;
        let (dx, dy) = node.visual.translate.unwrap_or((0.0, 0.0));
        Some(
            node.content
                .inflate(node.visual.padding_px)
                .translate(dx, dy),
        )
    }

    fn visual(&self, id: ElementId) -> Option<VisualState> {
        self.attached(id).map(|n| n.visual.clone())
    }

    fn mutate(&mut self, id: ElementId, patch: &StylePatch) -> Result<(), ViewError> {
        let node = self.node_mut(id).ok_or(ViewError::Unknown(id))?;
        if !node.attached {
            return Err(ViewError::Detached(id));
        }
        patch.apply_to(&mut node.visual);
        self.mutations += 1;
        Ok(())
    }

    fn elements_near(&self, center: Point, radius: f64) -> Vec<ElementId> {
        self.ids()
            .filter(|&id| {
                self.measure(id)
                    .is_some_and(|r| distance(r.center(), center) <= radius)
            })
            .collect()
    }

    fn listen(&mut self, kind: PointerEventKind) {
        *self.listeners.entry(kind).or_insert(0) += 1;
    }

    fn unlisten(&mut self, kind: PointerEventKind) {
        if let Some(count) = self.listeners.get_mut(&kind) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.listeners.remove(&kind);
            }
        }
    }
}
