#![allow(dead_code)]

use steady_core::bridge::MemoryBridge;
use steady_core::config::Config;
use steady_core::controller::AssistanceController;
use steady_core::geometry::Rect;
use steady_core::scheduler::VirtualClock;
use steady_core::view::memory::{MemoryPage, NodeSpec};
use steady_core::view::ElementId;

pub type Session = AssistanceController<MemoryPage, VirtualClock, MemoryBridge>;

/// Builder for small test pages
#[derive(Default)]
pub struct PageBuilder {
    page: MemoryPage,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(mut self, cx: f64, cy: f64) -> Self {
        self.page.add_button(cx, cy, 80.0, 30.0);
        self
    }

    pub fn padded_button(mut self, cx: f64, cy: f64, padding: f64) -> Self {
        self.page.add(
            NodeSpec::builder()
                .tag("button")
                .rect(Rect::centered(cx, cy, 80.0, 30.0))
                .padding(padding)
                .build(),
        );
        self
    }

    pub fn text(mut self, cx: f64, cy: f64) -> Self {
        self.page.add(
            NodeSpec::builder()
                .tag("p")
                .rect(Rect::centered(cx, cy, 120.0, 20.0))
                .build(),
        );
        self
    }

    pub fn overlay_button(mut self, cx: f64, cy: f64) -> Self {
        self.page.add(
            NodeSpec::builder()
                .tag("button")
                .rect(Rect::centered(cx, cy, 80.0, 30.0))
                .opted_out(true)
                .build(),
        );
        self
    }

    pub fn build(self) -> MemoryPage {
        self.page
    }
}

/// Three buttons in a row, 120px apart, ids #1..#3.
pub fn toolbar() -> MemoryPage {
    PageBuilder::new()
        .button(100.0, 100.0)
        .button(220.0, 100.0)
        .button(340.0, 100.0)
        .build()
}

pub fn session_with(page: MemoryPage, config: Config) -> Session {
    let mut s = AssistanceController::new(page, VirtualClock::new(), MemoryBridge::new(), config);
    s.attach();
    s
}

pub fn session(page: MemoryPage) -> Session {
    session_with(page, Config::default())
}

pub fn id(n: u64) -> ElementId {
    ElementId(n)
}
