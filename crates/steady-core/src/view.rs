pub mod memory;

use crate::error::ViewError;
use crate::geometry::{Point, Rect};
use crate::stats::AssistReason;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Data attribute marking the assisted element; its value is the [`AssistReason`].
pub const ASSIST_MARKER_ATTR: &str = "data-steady-assist";
/// Class toggling the active visual treatment.
pub const ACTIVE_CLASS: &str = "steady-assist-active";
/// Injected UI sets this on itself so neighbour dimming skips it.
pub const OPT_OUT_ATTR: &str = "data-steady-ignore";
pub const HIGHLIGHT_SHADOW: &str = "0 0 0 3px rgba(59, 130, 246, 0.3)";
pub const APPLY_TRANSITION: &str = "all 0.3s ease";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only facts about a node, enough to classify it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementInfo {
    /// Lower-case tag name.
    pub tag: String,
    pub role: Option<String>,
    pub input_type: Option<String>,
    /// Computed `cursor` style.
    pub cursor: Option<String>,
    pub has_click_handler: bool,
    pub opted_out: bool,
}

/// Every property the engine may touch on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub padding_px: f64,
    pub font_size_px: f64,
    pub box_shadow: Option<String>,
    pub transition: Option<String>,
    pub translate: Option<(f64, f64)>,
    pub opacity: Option<f64>,
    pub pointer_events_disabled: bool,
    pub marker: Option<AssistReason>,
    pub active_class: bool,
    pub faded: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            padding_px: 0.0,
            font_size_px: 16.0,
            box_shadow: None,
            transition: None,
            translate: None,
            opacity: None,
            pointer_events_disabled: false,
            marker: None,
            active_class: false,
            faded: false,
        }
    }
}

/// A partial update. `None` leaves the property untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub padding_px: Option<f64>,
    pub font_size_px: Option<f64>,
    pub box_shadow: Option<Option<String>>,
    pub transition: Option<Option<String>>,
    pub translate: Option<Option<(f64, f64)>>,
    pub opacity: Option<Option<f64>>,
    pub pointer_events_disabled: Option<bool>,
    pub marker: Option<Option<AssistReason>>,
    pub active_class: Option<bool>,
    pub faded: Option<bool>,
}

impl StylePatch {
    /// Patch that writes every property back to `original`.
    pub fn restore(original: &VisualState) -> Self {
        Self {
            padding_px: Some(original.padding_px),
            font_size_px: Some(original.font_size_px),
            box_shadow: Some(original.box_shadow.clone()),
            transition: Some(original.transition.clone()),
            translate: Some(original.translate),
            opacity: Some(original.opacity),
            pointer_events_disabled: Some(original.pointer_events_disabled),
            marker: Some(original.marker),
            active_class: Some(original.active_class),
            faded: Some(original.faded),
        }
    }

    pub fn apply_to(&self, v: &mut VisualState) {
        if let Some(p) = self.padding_px {
            v.padding_px = p;
        }
        if let Some(f) = self.font_size_px {
            v.font_size_px = f;
        }
        if let Some(s) = &self.box_shadow {
            v.box_shadow = s.clone();
        }
        if let Some(t) = &self.transition {
            v.transition = t.clone();
        }
        if let Some(t) = self.translate {
            v.translate = t;
        }
        if let Some(o) = self.opacity {
            v.opacity = o;
        }
        if let Some(pe) = self.pointer_events_disabled {
            v.pointer_events_disabled = pe;
        }
        if let Some(m) = self.marker {
            v.marker = m;
        }
        if let Some(c) = self.active_class {
            v.active_class = c;
        }
        if let Some(f) = self.faded {
            v.faded = f;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PointerEventKind {
    MouseMove,
    MouseOver,
    MouseOut,
    Click,
}

/// The engine's only window onto the host document.
///
/// Queries return `None` for nodes that are unknown or detached; mutations
/// return [`ViewError`] in the same situation.
pub trait PageView {
    fn is_attached(&self, id: ElementId) -> bool;

    fn describe(&self, id: ElementId) -> Option<ElementInfo>;

    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Current border box of the node.
    fn measure(&self, id: ElementId) -> Option<Rect>;

    fn visual(&self, id: ElementId) -> Option<VisualState>;

    fn mutate(&mut self, id: ElementId, patch: &StylePatch) -> Result<(), ViewError>;

    /// Attached nodes whose centre lies within `radius` of `center`, in document order.
    fn elements_near(&self, center: Point, radius: f64) -> Vec<ElementId>;

    fn listen(&mut self, kind: PointerEventKind);

    fn unlisten(&mut self, kind: PointerEventKind);

    fn restore(&mut self, id: ElementId, original: &VisualState) -> Result<(), ViewError> {
        self.mutate(id, &StylePatch::restore(original))
    }

    /// True when `node` is `ancestor` or lies beneath it.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        let mut depth = 0;
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return false;
            }
            cursor = self.parent(id);
        }
        false
    }
}

pub(crate) const MAX_TREE_DEPTH: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_patch_round_trip() {
        let original = VisualState {
            padding_px: 4.0,
            opacity: Some(0.9),
            ..Default::default()
        };
        let mut v = original.clone();
        StylePatch {
            padding_px: Some(20.0),
            box_shadow: Some(Some(HIGHLIGHT_SHADOW.to_string())),
            marker: Some(Some(AssistReason::Hover)),
            opacity: Some(None),
            ..Default::default()
        }
        .apply_to(&mut v);
        assert_ne!(v, original);

        StylePatch::restore(&original).apply_to(&mut v);
        assert_eq!(v, original);
    }

    #[test]
    fn test_empty_patch() {
        assert!(StylePatch::default().is_empty());
        assert!(!StylePatch::restore(&VisualState::default()).is_empty());
    }
}
