//! Synthetic tremor playback for demos.
//!
//! The simulator drives a controller purely through its public surface:
//! pointer events, clicks and clock advances. It never touches assistance
//! state directly.

use crate::bridge::StatsBridge;
use crate::classifier::{TargetClassifier, TargetPolicy};
use crate::controller::{AssistanceController, PointerEvent};
use crate::geometry::{distance, Point, Rect};
use crate::scheduler::Scheduler;
use crate::stats::{AssistReason, SessionStats, TremorProfile};
use crate::view::memory::{MemoryPage, NodeSpec};
use crate::view::{ElementId, PageView};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Tremor severity to simulate (1 = light, 3 = strong)
    #[arg(long, default_value_t = 2)]
    pub severity: u8,

    /// 4 is real time; higher plays faster
    #[arg(long, default_value_t = 4.0)]
    pub playback_speed: f64,

    #[arg(long, default_value_t = 1)]
    pub rounds: usize,

    #[arg(long, default_value_t = 6)]
    pub max_targets: usize,

    #[arg(long, default_value_t = 12)]
    pub steps_per_target: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 1280.0)]
    pub viewport_width: f64,

    #[arg(long, default_value_t = 800.0)]
    pub viewport_height: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            severity: 2,
            playback_speed: 4.0,
            rounds: 1,
            max_targets: 6,
            steps_per_target: 12,
            seed: None,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

/// Jitter amplitude in px for a demo severity.
pub fn tremor_amplitude(severity: u8) -> f64 {
    match severity {
        1 => 2.0,
        3 => 12.0,
        _ => 6.0,
    }
}

/// Distance the cursor starts from each target, along both axes.
const APPROACH_OFFSET: f64 = 60.0;
/// Fraction of the remaining gap closed per step.
const EASING: f64 = 0.35;
const MIN_TARGET_SIDE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    pub point: Point,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetOutcome {
    pub target: ElementId,
    /// Element the final click landed on.
    pub clicked: Option<ElementId>,
    /// Assistance active when the click was dispatched.
    pub assisted: Option<(ElementId, AssistReason)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub outcomes: Vec<TargetOutcome>,
    pub moves: usize,
    pub elapsed_ms: u64,
    pub stats: SessionStats,
    pub profile: TremorProfile,
}

impl SimulationReport {
    pub fn assisted_clicks(&self) -> usize {
        self.outcomes.iter().filter(|o| o.assisted.is_some()).count()
    }
}

pub struct TremorSimulator {
    params: SimulationParams,
    rng: fastrand::Rng,
}

impl TremorSimulator {
    pub fn new(params: SimulationParams) -> Self {
        let rng = match params.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Self { params, rng }
    }

    fn scaled(&self, ms: f64) -> u64 {
        let speed = (self.params.playback_speed / 4.0).max(0.01);
        (ms / speed).round().max(1.0) as u64
    }

    fn offset(&mut self) -> f64 {
        (self.rng.f64() - 0.5) * 2.0 * tremor_amplitude(self.params.severity)
    }

    /// Jittered points around `(x, y)`, 20 to 50 ms apart before scaling.
    pub fn tremor_path(&mut self, x: f64, y: f64) -> Vec<PathStep> {
        (0..self.params.steps_per_target)
            .map(|_| {
                let point = Point::new(x + self.offset(), y + self.offset());
                let raw_delay = 20.0 + self.rng.f64() * 30.0;
                PathStep {
                    point,
                    delay_ms: self.scaled(raw_delay),
                }
            })
            .collect()
    }

    /// Visible button-like targets nearest the viewport centre.
    pub fn demo_targets(&self, page: &MemoryPage) -> Vec<ElementId> {
        let policy = TargetClassifier::default();
        let viewport = Rect::new(0.0, 0.0, self.params.viewport_width, self.params.viewport_height);
        let centre = viewport.center();

        let mut targets: Vec<(ElementId, f64)> = page
            .ids()
            .filter(|&id| page.describe(id).is_some_and(|i| policy.qualifies(&i)))
            .filter_map(|id| page.measure(id).map(|r| (id, r)))
            .filter(|(_, r)| {
                r.width > MIN_TARGET_SIDE
                    && r.height > MIN_TARGET_SIDE
                    && r.left >= 0.0
                    && r.top >= 0.0
                    && r.right() <= viewport.right()
                    && r.bottom() <= viewport.bottom()
            })
            .map(|(id, r)| (id, distance(r.center(), centre)))
            .collect();

        targets.sort_by(|a, b| a.1.total_cmp(&b.1));
        targets
            .into_iter()
            .take(self.params.max_targets)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn play<S, B>(
        &mut self,
        controller: &mut AssistanceController<MemoryPage, S, B>,
    ) -> SimulationReport
    where
        S: Scheduler,
        B: StatsBridge,
    {
        let started = controller.now_ms();
        let mut outcomes = Vec::new();
        let mut moves = 0;
        let mut under: Option<ElementId> = None;

        for round in 0..self.params.rounds.max(1) {
            let targets = self.demo_targets(controller.view());
            info!("Demo round {}: {} targets", round + 1, targets.len());

            for target in targets {
                let Some(rect) = controller.view().measure(target) else {
                    continue;
                };
                let centre = rect.center();
                let mut cur = Point::new(centre.x - APPROACH_OFFSET, centre.y - APPROACH_OFFSET);

                for step in self.tremor_path(centre.x, centre.y) {
                    cur = Point::new(
                        cur.x + (step.point.x - cur.x) * EASING,
                        cur.y + (step.point.y - cur.y) * EASING,
                    );
                    move_to(controller, &mut under, cur);
                    moves += 1;
                    controller.advance_by(step.delay_ms);
                }

                move_to(controller, &mut under, centre);
                moves += 1;
                controller.advance_by(self.scaled(80.0));
                // press/release gap
                controller.advance_by(40);

                let clicked = controller.view().hit_test(centre);
                let assisted = controller.active_target().zip(controller.active_reason());
                if let Some(el) = clicked {
                    controller.handle(PointerEvent::Click { target: el });
                }
                debug!("Demo click on {:?} (aiming at {})", clicked, target);
                outcomes.push(TargetOutcome {
                    target,
                    clicked,
                    assisted,
                });

                controller.advance_by(self.scaled(350.0));
            }
        }

        SimulationReport {
            outcomes,
            moves,
            elapsed_ms: controller.now_ms().saturating_sub(started),
            stats: controller.stats().clone(),
            profile: *controller.tremor_profile(),
        }
    }
}

/// Dispatches the over/out pair a browser would fire when the element under
/// the pointer changes, then the move itself.
fn move_to<S, B>(
    controller: &mut AssistanceController<MemoryPage, S, B>,
    under: &mut Option<ElementId>,
    p: Point,
) where
    S: Scheduler,
    B: StatsBridge,
{
    let hit = controller.view().hit_test(p);
    if hit != *under {
        if let Some(old) = *under {
            controller.handle(PointerEvent::Out { target: old });
        }
        if let Some(new) = hit {
            controller.handle(PointerEvent::Over { target: new });
        }
        *under = hit;
    }
    controller.handle(PointerEvent::Move { x: p.x, y: p.y });
}

/// A small sign-up form plus a toolbar, laid out inside 1280x800.
pub fn sample_page() -> MemoryPage {
    let mut page = MemoryPage::new();
    let form = page.add(
        NodeSpec::builder()
            .tag("form")
            .rect(Rect::new(440.0, 200.0, 400.0, 400.0))
            .build(),
    );
    for i in 0..2 {
        page.add(
            NodeSpec::builder()
                .tag("input")
                .input_type("text")
                .rect(Rect::new(470.0, 240.0 + i as f64 * 60.0, 340.0, 36.0))
                .parent(form)
                .padding(6.0)
                .build(),
        );
    }
    let submit = page.add(
        NodeSpec::builder()
            .tag("button")
            .rect(Rect::new(470.0, 380.0, 160.0, 44.0))
            .parent(form)
            .padding(8.0)
            .build(),
    );
    page.add(
        NodeSpec::builder()
            .tag("span")
            .rect(Rect::new(490.0, 390.0, 80.0, 24.0))
            .parent(submit)
            .build(),
    );
    page.add(
        NodeSpec::builder()
            .tag("a")
            .rect(Rect::new(650.0, 384.0, 120.0, 36.0))
            .parent(form)
            .build(),
    );
    page.add(
        NodeSpec::builder()
            .tag("input")
            .input_type("reset")
            .rect(Rect::new(470.0, 450.0, 120.0, 36.0))
            .parent(form)
            .build(),
    );

    let toolbar = page.add(
        NodeSpec::builder()
            .tag("nav")
            .rect(Rect::new(0.0, 0.0, 1280.0, 60.0))
            .build(),
    );
    for i in 0..4 {
        page.add(
            NodeSpec::builder()
                .tag("div")
                .cursor("pointer")
                .rect(Rect::new(20.0 + i as f64 * 110.0, 12.0, 100.0, 36.0))
                .parent(toolbar)
                .build(),
        );
    }
    page.add(
        NodeSpec::builder()
            .tag("div")
            .role("button")
            .opted_out(true)
            .rect(Rect::new(1100.0, 700.0, 140.0, 50.0))
            .build(),
    );
    page
}
