mod common;

use common::{id, session_with, PageBuilder};
use proptest::prelude::*;
use steady_core::config::Config;
use steady_core::controller::PointerEvent;
use steady_core::geometry::Rect;
use steady_core::history::{CursorHistory, CursorSample};
use steady_core::messages::InboundMessage;
use steady_core::stats::{AssistReason, TremorProfile};
use steady_core::tremor::{TremorAnalyzer, MIN_SAMPLES};
use steady_core::view::memory::{MemoryPage, NodeSpec};
use steady_core::view::PageView;

// --- STRATEGIES ---

#[derive(Debug, Clone)]
enum Step {
    Over(u64),
    Out(u64),
    Click(u64),
    Move(f64, f64),
    Wait(u64),
    Motor(bool),
    Visual(bool),
    Feedback(bool),
    Remove(u64),
    Reset,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (1u64..=6).prop_map(Step::Over),
        2 => (1u64..=6).prop_map(Step::Out),
        3 => (1u64..=6).prop_map(Step::Click),
        4 => (0.0..500.0f64, 0.0..300.0f64).prop_map(|(x, y)| Step::Move(x, y)),
        4 => (0u64..4000).prop_map(Step::Wait),
        1 => any::<bool>().prop_map(Step::Motor),
        1 => any::<bool>().prop_map(Step::Visual),
        1 => any::<bool>().prop_map(Step::Feedback),
        1 => (1u64..=6).prop_map(Step::Remove),
        1 => Just(Step::Reset),
    ]
}

/// Five buttons in a row plus one nested link.
fn busy_page() -> MemoryPage {
    let mut page = PageBuilder::new()
        .button(60.0, 100.0)
        .button(150.0, 100.0)
        .button(240.0, 100.0)
        .padded_button(330.0, 100.0, 6.0)
        .button(420.0, 100.0)
        .build();
    page.add(
        NodeSpec::builder()
            .tag("a")
            .rect(Rect::centered(150.0, 100.0, 30.0, 12.0))
            .parent(id(2))
            .build(),
    );
    page
}

prop_compose! {
    fn arb_original()(
        padding in 0.0..20.0f64,
        font in 10.0..24.0f64,
    ) -> (f64, f64) {
        (padding, font)
    }
}

proptest! {
    #[test]
    fn prop_at_most_one_assisted(steps in proptest::collection::vec(arb_step(), 1..60)) {
        let mut s = session_with(busy_page(), Config::default());
        for step in steps {
            match step {
                Step::Over(n) => s.handle(PointerEvent::Over { target: id(n) }),
                Step::Out(n) => s.handle(PointerEvent::Out { target: id(n) }),
                Step::Click(n) => s.handle(PointerEvent::Click { target: id(n) }),
                Step::Move(x, y) => s.handle(PointerEvent::Move { x, y }),
                Step::Wait(ms) => s.advance_by(ms),
                Step::Motor(on) => s.on_message(InboundMessage::UpdateMotorImpaired { enabled: on }),
                Step::Visual(on) => s.on_message(InboundMessage::UpdateVisualImpaired { enabled: on }),
                Step::Feedback(on) => s.on_message(InboundMessage::UpdateVisualFeedback { enabled: on }),
                Step::Remove(n) => s.view_mut().remove(id(n)),
                Step::Reset => s.on_message(InboundMessage::ResetLearning {}),
            }

            let marked = s.view().marked();
            prop_assert!(marked.len() <= 1, "marked: {:?}", marked);
            match s.active_target() {
                Some(t) if s.view().is_attached(t) => prop_assert_eq!(marked, vec![t]),
                Some(_) => prop_assert!(marked.is_empty()),
                None => {
                    prop_assert!(marked.is_empty());
                    prop_assert!(s.view().faded().is_empty());
                }
            }
            prop_assert!(s.stats().confidence_level <= 100);
        }
    }

    #[test]
    fn prop_restore_round_trip(
        originals in proptest::collection::vec(arb_original(), 3),
        motor in any::<bool>(),
        visual in any::<bool>(),
        scale in 0.5..3.0f64,
        cursor in (0.0..400.0f64, 0.0..200.0f64),
        target in 1u64..=3,
    ) {
        let mut page = MemoryPage::new();
        for (i, (padding, font)) in originals.iter().enumerate() {
            page.add(
                NodeSpec::builder()
                    .tag("button")
                    .rect(Rect::centered(100.0 + i as f64 * 100.0, 100.0, 80.0, 40.0))
                    .padding(*padding)
                    .font_size(*font)
                    .build(),
            );
        }
        let before: Vec<_> = page.ids().map(|i| page.visual(i).unwrap()).collect();

        let mut s = session_with(page, Config::default());
        s.on_message(InboundMessage::UpdateMotorImpaired { enabled: motor });
        s.on_message(InboundMessage::UpdateVisualImpaired { enabled: visual });
        s.on_message(InboundMessage::UpdateVisualImpairedScale { value: scale });
        s.handle(PointerEvent::Move { x: cursor.0, y: cursor.1 });

        s.clear_assistance();
        if s.apply_assistance(id(target), AssistReason::Hesitation) {
            prop_assert_ne!(s.view().visual(id(target)).unwrap(), before[target as usize - 1].clone());
        }
        s.clear_assistance();
        s.clear_assistance();

        let after: Vec<_> = s.view().ids().map(|i| s.view().visual(i).unwrap()).collect();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn prop_short_history_is_unknown(
        points in proptest::collection::vec((-500.0..500.0f64, -500.0..500.0f64, 0u64..50), 0..MIN_SAMPLES)
    ) {
        let mut t = 0;
        let history = CursorHistory::from_samples(
            10,
            points.into_iter().map(|(x, y, dt)| {
                t += dt;
                CursorSample::new(x, y, t)
            }),
        );
        prop_assert_eq!(TremorAnalyzer::default().analyze(&history), TremorProfile::UNKNOWN);
    }

    #[test]
    fn prop_footprint_never_exceeds_cap(
        w in 1.0..300.0f64,
        h in 1.0..300.0f64,
        motor in any::<bool>(),
    ) {
        let mut page = MemoryPage::new();
        let b = page.add(NodeSpec::builder().tag("button").rect(Rect::centered(500.0, 500.0, w, h)).build());
        let mut s = session_with(page, Config::default());
        s.on_message(InboundMessage::UpdateMotorImpaired { enabled: motor });
        prop_assert!(s.apply_assistance(b, AssistReason::Hover));
        let grown = s.view().measure(b).unwrap().area();
        prop_assert!(grown <= 3.0 * w * h * (1.0 + 1e-9));
    }
}
