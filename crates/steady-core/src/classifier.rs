use crate::view::{ElementId, ElementInfo, PageView, MAX_TREE_DEPTH};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Decides whether a node counts as a click target.
///
/// Implement this to plug in a site-specific policy; [`TargetClassifier`]
/// covers the two built-in variants.
pub trait TargetPolicy {
    fn qualifies(&self, info: &ElementInfo) -> bool;
}

impl<F> TargetPolicy for F
where
    F: Fn(&ElementInfo) -> bool,
{
    fn qualifies(&self, info: &ElementInfo) -> bool {
        self(info)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PolicyKind {
    /// Anything that looks clickable, including every form field.
    Interactive,
    /// Stricter: only button-ish inputs, and a pointer cursor over a form
    /// field is ignored.
    #[default]
    ButtonLike,
}

const BUTTON_INPUT_TYPES: [&str; 3] = ["button", "submit", "reset"];
const FORM_FIELD_TAGS: [&str; 3] = ["input", "select", "textarea"];

#[derive(Debug, Clone, PartialEq)]
pub struct TargetClassifier {
    pub kind: PolicyKind,
    pub tags: Vec<String>,
    pub honor_role_button: bool,
    pub honor_pointer_cursor: bool,
    pub honor_click_handler: bool,
}

impl Default for TargetClassifier {
    fn default() -> Self {
        Self::new(PolicyKind::default())
    }
}

impl TargetClassifier {
    pub fn new(kind: PolicyKind) -> Self {
        Self {
            kind,
            tags: ["a", "button", "select", "textarea"]
                .into_iter()
                .map(String::from)
                .collect(),
            honor_role_button: true,
            honor_pointer_cursor: true,
            honor_click_handler: kind == PolicyKind::Interactive,
        }
    }

    /// Adds an extra tag that always qualifies (e.g. a custom element).
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_lowercase());
        self
    }

    fn is_qualifying_input(&self, info: &ElementInfo) -> bool {
        if info.tag != "input" {
            return false;
        }
        match self.kind {
            PolicyKind::Interactive => true,
            PolicyKind::ButtonLike => info
                .input_type
                .as_deref()
                .is_some_and(|t| BUTTON_INPUT_TYPES.contains(&t)),
        }
    }
}

impl TargetPolicy for TargetClassifier {
    fn qualifies(&self, info: &ElementInfo) -> bool {
        if self.tags.iter().any(|t| *t == info.tag) || self.is_qualifying_input(info) {
            return true;
        }
        if self.honor_role_button && info.role.as_deref() == Some("button") {
            return true;
        }
        if self.honor_click_handler && info.has_click_handler {
            return true;
        }
        if self.honor_pointer_cursor && info.cursor.as_deref() == Some("pointer") {
            let misleading =
                self.kind == PolicyKind::ButtonLike && FORM_FIELD_TAGS.contains(&info.tag.as_str());
            return !misleading;
        }
        false
    }
}

pub fn is_assistable<V, P>(view: &V, policy: &P, id: ElementId) -> bool
where
    V: PageView + ?Sized,
    P: TargetPolicy + ?Sized,
{
    view.describe(id).is_some_and(|info| policy.qualifies(&info))
}

/// Closest qualifying node, starting at `id` itself and walking up.
pub fn nearest_assistable<V, P>(view: &V, policy: &P, id: ElementId) -> Option<ElementId>
where
    V: PageView + ?Sized,
    P: TargetPolicy + ?Sized,
{
    let mut cursor = Some(id);
    let mut depth = 0;
    while let Some(node) = cursor {
        if is_assistable(view, policy, node) {
            return Some(node);
        }
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return None;
        }
        cursor = view.parent(node);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::view::memory::{MemoryPage, NodeSpec};
    use rstest::rstest;

    fn info(tag: &str) -> ElementInfo {
        ElementInfo {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("button", None, None, true)]
    #[case("a", None, None, true)]
    #[case("select", None, None, true)]
    #[case("textarea", None, None, true)]
    #[case("input", Some("submit"), None, true)]
    #[case("input", Some("reset"), None, true)]
    #[case("input", Some("text"), None, false)]
    #[case("input", Some("text"), Some("pointer"), false)]
    #[case("div", None, Some("pointer"), true)]
    #[case("div", None, Some("default"), false)]
    #[case("span", None, None, false)]
    fn test_button_like_policy(
        #[case] tag: &str,
        #[case] input_type: Option<&str>,
        #[case] cursor: Option<&str>,
        #[case] expected: bool,
    ) {
        let c = TargetClassifier::new(PolicyKind::ButtonLike);
        let i = ElementInfo {
            input_type: input_type.map(String::from),
            cursor: cursor.map(String::from),
            ..info(tag)
        };
        assert_eq!(c.qualifies(&i), expected);
    }

    #[test]
    fn test_interactive_policy_is_looser() {
        let c = TargetClassifier::new(PolicyKind::Interactive);
        let text = ElementInfo {
            input_type: Some("text".into()),
            ..info("input")
        };
        assert!(c.qualifies(&text));

        let clickable_div = ElementInfo {
            has_click_handler: true,
            ..info("div")
        };
        assert!(c.qualifies(&clickable_div));
        assert!(!TargetClassifier::default().qualifies(&clickable_div));
    }

    #[test]
    fn test_role_button_and_custom_policy() {
        let c = TargetClassifier::default();
        let role = ElementInfo {
            role: Some("button".into()),
            ..info("div")
        };
        assert!(c.qualifies(&role));

        let only_links = |i: &ElementInfo| i.tag == "a";
        assert!(only_links.qualifies(&info("a")));
        assert!(!only_links.qualifies(&info("button")));
        assert!(TargetClassifier::default().with_tag("X-Chip").qualifies(&info("x-chip")));
    }

    #[test]
    fn test_nearest_walks_ancestors() {
        let mut page = MemoryPage::new();
        let button = page.add(
            NodeSpec::builder()
                .tag("button")
                .rect(Rect::new(0.0, 0.0, 80.0, 30.0))
                .build(),
        );
        let label = page.add(
            NodeSpec::builder()
                .tag("span")
                .rect(Rect::new(10.0, 5.0, 40.0, 20.0))
                .parent(button)
                .build(),
        );
        let loose = page.add(
            NodeSpec::builder()
                .tag("p")
                .rect(Rect::new(200.0, 0.0, 80.0, 30.0))
                .build(),
        );
        let c = TargetClassifier::default();
        assert_eq!(nearest_assistable(&page, &c, label), Some(button));
        assert_eq!(nearest_assistable(&page, &c, loose), None);

        page.remove(button);
        assert_eq!(nearest_assistable(&page, &c, label), None);
    }
}
