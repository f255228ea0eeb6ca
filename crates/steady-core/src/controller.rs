//! Per-page assistance state machine.
//!
//! One [`AssistanceController`] owns everything a page session needs: the
//! cursor history, the learned tremor profile, the stats, the single assisted
//! element and every pending timer. Hosts feed it pointer events, inbound
//! messages and the passage of time; it mutates the page through a
//! [`PageView`] and reports through a [`StatsBridge`].
//!
//! Phases: `Idle -> Hovering -> HesitationPending -> Assisted -> Restoring -> Idle`,
//! plus `Idle -> Assisted` on hover when motor-impaired mode is on.

use crate::adaptive::{self, DwellAverage, MIN_CLICKS_FOR_ADAPTATION};
use crate::bridge::StatsBridge;
use crate::classifier::{is_assistable, nearest_assistable, TargetClassifier, TargetPolicy};
use crate::config::{clamp_sensitivity, clamp_visual_scale, Config};
use crate::geometry::{distance, speed, Point, Rect};
use crate::history::{CursorHistory, CursorSample};
use crate::messages::{InboundMessage, OutboundMessage};
use crate::predictor::{Candidate, TargetPredictor};
use crate::scheduler::{Scheduler, TaskHandle, TimerTask};
use crate::stats::{AssistReason, SessionStats, TremorProfile};
use crate::storage::StorageWrite;
use crate::tremor::{self, TremorAnalyzer};
use crate::view::{
    ElementId, PageView, PointerEventKind, StylePatch, VisualState, APPLY_TRANSITION,
    HIGHLIGHT_SHADOW, MAX_TREE_DEPTH,
};
use fnv::FnvHashMap;
use strum::IntoEnumIterator;
use strum_macros::Display;
use tracing::{debug, info, warn};

/// Samples used for the slow-movement check.
const SLOW_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Over { target: ElementId },
    Out { target: ElementId },
    Click { target: ElementId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Idle,
    Hovering,
    /// Hesitation was detected but nothing could be assisted yet.
    HesitationPending,
    Assisted,
    Restoring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hover {
    target: ElementId,
    since_ms: u64,
    hesitated: bool,
    /// Assistance was applied to the hovered element during this hover.
    assisted: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveAssist {
    target: ElementId,
    reason: AssistReason,
    neighbours: Vec<ElementId>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Timers {
    hesitation: Option<TaskHandle>,
    auto_restore: Option<TaskHandle>,
    leave_restore: Option<TaskHandle>,
    click_restore: Option<TaskHandle>,
    inactivity: Option<TaskHandle>,
}

/// Takes the handle out of `slot` and cancels it.
fn cancel_slot<S: Scheduler>(scheduler: &mut S, slot: &mut Option<TaskHandle>) {
    if let Some(handle) = slot.take() {
        scheduler.cancel(handle);
    }
}

/// True when the fired `handle` is the one held in `slot`; clears the slot.
fn claim(slot: &mut Option<TaskHandle>, handle: TaskHandle) -> bool {
    if *slot == Some(handle) {
        *slot = None;
        true
    } else {
        false
    }
}

pub struct AssistanceController<V, S, B> {
    view: V,
    scheduler: S,
    bridge: B,
    config: Config,
    policy: Box<dyn TargetPolicy>,
    tremor: TremorAnalyzer,
    predictor: TargetPredictor,

    history: CursorHistory,
    profile: TremorProfile,
    stats: SessionStats,
    dwell: DwellAverage,

    hover: Option<Hover>,
    active: Option<ActiveAssist>,
    originals: FnvHashMap<ElementId, VisualState>,
    timers: Timers,

    attached: bool,
    moves_since_analysis: usize,
    last_prediction_ms: Option<u64>,
}

impl<V, S, B> AssistanceController<V, S, B>
where
    V: PageView,
    S: Scheduler,
    B: StatsBridge,
{
    pub fn new(view: V, scheduler: S, bridge: B, config: Config) -> Self {
        let config = config.normalized();
        Self {
            view,
            scheduler,
            bridge,
            history: CursorHistory::new(config.timing.history_length),
            config,
            policy: Box::new(TargetClassifier::default()),
            tremor: TremorAnalyzer::default(),
            predictor: TargetPredictor::default(),
            profile: TremorProfile::UNKNOWN,
            stats: SessionStats::default(),
            dwell: DwellAverage::default(),
            hover: None,
            active: None,
            originals: FnvHashMap::default(),
            timers: Timers::default(),
            attached: false,
            moves_since_analysis: 0,
            last_prediction_ms: None,
        }
    }

    pub fn with_policy(mut self, policy: impl TargetPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    // --- Lifecycle ---

    /// Reads persisted settings, stats and the learned tremor pattern, then
    /// attaches if assistance is enabled. An unavailable bridge leaves the
    /// constructor's configuration in place.
    pub fn start(&mut self) {
        match self.bridge.load() {
            Ok(state) => {
                self.config.assist = state.config.normalized();
                self.stats = state.stats;
                self.profile = state.user_tremor_pattern;
                debug!(
                    "Loaded persisted state (tremor: {}, clicks: {})",
                    self.profile.severity, self.stats.click_count
                );
            }
            Err(e) => warn!("Could not load persisted state: {}", e),
        }
        if self.config.assist.enabled {
            self.attach();
        }
    }

    /// Registers one listener per pointer event kind. Calling twice is a no-op.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        for kind in PointerEventKind::iter() {
            self.view.listen(kind);
        }
        self.attached = true;
        info!("Listening for pointer events");
    }

    /// Removes exactly the listeners `attach` added, restores the page and
    /// cancels every pending timer.
    /// Assistance applied directly through `apply_assistance` is cleared even
    /// when the listeners were never attached.
    pub fn detach(&mut self) {
        self.clear_assistance();
        cancel_slot(&mut self.scheduler, &mut self.timers.inactivity);
        if !self.attached {
            return;
        }
        for kind in PointerEventKind::iter() {
            self.view.unlisten(kind);
        }
        self.attached = false;
        info!("Detached from page");
    }

    // --- Time ---

    /// Runs every timer due at or before `now_ms`, in due order.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((handle, task)) = self.scheduler.pop_due(now_ms) {
            self.on_timer(handle, task);
        }
        self.scheduler.set_now(now_ms);
    }

    pub fn advance_by(&mut self, delta_ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(delta_ms);
        self.advance_to(target);
    }

    /// Advances the clock, then dispatches the event.
    pub fn handle_at(&mut self, now_ms: u64, event: PointerEvent) {
        self.advance_to(now_ms);
        self.handle(event);
    }

    // --- Pointer events ---

    pub fn handle(&mut self, event: PointerEvent) {
        if !self.attached || !self.config.assist.enabled {
            return;
        }
        self.reset_inactivity();
        match event {
            PointerEvent::Move { x, y } => self.on_move(x, y),
            PointerEvent::Over { target } => self.on_over(target),
            PointerEvent::Out { target } => self.on_out(target),
            PointerEvent::Click { target } => self.on_click(target),
        }
    }

    fn on_move(&mut self, x: f64, y: f64) {
        let now = self.scheduler.now_ms();
        self.history.record(CursorSample::new(x, y, now));
        let position = Point::new(x, y);

        if let Some(hover) = self.hover {
            match self.view.measure(hover.target) {
                Some(rect) if rect.contains(position) => {}
                Some(_) => self.on_out(hover.target),
                None => {
                    debug!("Hovered element {} vanished", hover.target);
                    self.end_hover();
                }
            }
        }

        self.moves_since_analysis += 1;
        if self.moves_since_analysis >= self.config.timing.tremor_interval {
            self.moves_since_analysis = 0;
            self.update_tremor_profile();
        }

        self.predict_slow_target(position, now);
    }

    fn on_over(&mut self, raw: ElementId) {
        let Some(target) = nearest_assistable(&self.view, self.policy.as_ref(), raw) else {
            return;
        };
        if self.hover.is_some_and(|h| h.target == target) {
            return;
        }
        if self.hover.is_some() {
            self.end_hover();
        }

        let now = self.scheduler.now_ms();
        self.hover = Some(Hover {
            target,
            since_ms: now,
            hesitated: false,
            assisted: false,
        });

        if self.active_target() == Some(target) {
            // Came back before the leave delay ran out.
            cancel_slot(&mut self.scheduler, &mut self.timers.leave_restore);
            return;
        }

        if self.config.assist.motor_impaired {
            self.apply_assistance(target, AssistReason::Hover);
            return;
        }

        let delay = self.hesitation_delay_ms();
        self.timers.hesitation = Some(
            self.scheduler
                .schedule(delay, TimerTask::Hesitation(target)),
        );
        debug!("Hovering {} (hesitation in {}ms)", target, delay);
    }

    /// Out events for descendants are ignored; leaving the hovered element
    /// itself is also picked up from `Move`.
    fn on_out(&mut self, target: ElementId) {
        if self.hover.is_some_and(|h| h.target == target) {
            self.end_hover();
        }
        if self.active_target() == Some(target) && self.timers.leave_restore.is_none() {
            let delay = self.config.timing.leave_restore_ms;
            self.timers.leave_restore = Some(
                self.scheduler
                    .schedule(delay, TimerTask::DeferredRestore(target)),
            );
        }
    }

    fn on_click(&mut self, target: ElementId) {
        let now = self.scheduler.now_ms();
        let step = self.config.timing.confidence_step;
        self.stats.click_count += 1;

        // The user clicked before hesitation kicked in.
        if let Some(hover) = self.hover {
            if self.timers.hesitation.is_some() && self.view.contains(hover.target, target) {
                cancel_slot(&mut self.scheduler, &mut self.timers.hesitation);
                self.dwell.record(now.saturating_sub(hover.since_ms));
            }
        }

        if let Some(assisted) = self.active_target() {
            if self.view.contains(assisted, target) {
                self.stats.successful_clicks += 1;
                self.stats.raise_confidence(step);
                cancel_slot(&mut self.scheduler, &mut self.timers.auto_restore);
                cancel_slot(&mut self.scheduler, &mut self.timers.leave_restore);
                if self.timers.click_restore.is_none() {
                    let delay = self.config.timing.click_restore_ms;
                    self.timers.click_restore = Some(
                        self.scheduler
                            .schedule(delay, TimerTask::DeferredRestore(assisted)),
                    );
                }
                debug!("Click landed on assisted {}", assisted);
            } else {
                self.stats.missed_clicks += 1;
                self.stats.lower_confidence(step);
                debug!("Click on {} missed assisted {}", target, assisted);
                self.restore_active();
            }
        }

        let every = self.config.timing.tremor_persist_every.max(1);
        if self.stats.click_count % every == 0 {
            self.persist_tremor_profile();
        }
        self.publish_stats();
    }

    // --- Timers ---

    fn on_timer(&mut self, handle: TaskHandle, task: TimerTask) {
        match task {
            TimerTask::Hesitation(target) => {
                if !claim(&mut self.timers.hesitation, handle) {
                    return;
                }
                let Some(hover) = self.hover.as_mut().filter(|h| h.target == target) else {
                    return;
                };
                hover.hesitated = true;
                let dwell = self.scheduler.now_ms().saturating_sub(hover.since_ms);
                self.dwell.record(dwell);
                debug!("Hesitation on {} after {}ms", target, dwell);
                self.apply_assistance(target, AssistReason::Hesitation);
            }
            TimerTask::AutoRestore(target) => {
                if claim(&mut self.timers.auto_restore, handle)
                    && self.active_target() == Some(target)
                {
                    debug!("Auto-restoring {}", target);
                    self.restore_active();
                }
            }
            TimerTask::DeferredRestore(target) => {
                let ours = claim(&mut self.timers.leave_restore, handle)
                    || claim(&mut self.timers.click_restore, handle);
                if ours && self.active_target() == Some(target) {
                    self.restore_active();
                }
            }
            TimerTask::Inactivity => {
                if !claim(&mut self.timers.inactivity, handle) {
                    return;
                }
                let decayed =
                    (self.stats.confidence_level as f64 * self.config.timing.confidence_decay).floor();
                self.stats.confidence_level = decayed.clamp(0.0, 100.0) as u8;
                if self.hover.is_some() {
                    self.end_hover();
                }
                debug!("Inactive, confidence now {}", self.stats.confidence_level);
                self.publish_stats();
            }
        }
    }

    fn reset_inactivity(&mut self) {
        cancel_slot(&mut self.scheduler, &mut self.timers.inactivity);
        let delay = self.config.timing.inactivity_ms;
        self.timers.inactivity = Some(self.scheduler.schedule(delay, TimerTask::Inactivity));
    }

    // --- Assistance ---

    /// Assists `target`, first restoring whatever was assisted before.
    /// Returns false when nothing was applied (feedback off, node gone).
    pub fn apply_assistance(&mut self, target: ElementId, reason: AssistReason) -> bool {
        if !self.config.assist.visual_feedback {
            debug!("Visual feedback off, not assisting {}", target);
            return false;
        }
        if self.active_target() == Some(target) {
            return true;
        }
        if !self.view.is_attached(target) {
            debug!("Skipping detached {}", target);
            return false;
        }
        self.restore_active();

        let Some(original) = self.capture_original(target) else {
            return false;
        };
        let Some(rect) = self.view.measure(target) else {
            return false;
        };

        let patch = self.assist_patch(&original, &rect, reason);
        if let Err(e) = self.view.mutate(target, &patch) {
            debug!("Could not assist {}: {}", target, e);
            return false;
        }

        let neighbours = self.dim_neighbours(target, &rect);
        self.active = Some(ActiveAssist {
            target,
            reason,
            neighbours,
        });
        self.stats.assist_count += 1;
        if let Some(hover) = self.hover.as_mut().filter(|h| h.target == target) {
            hover.assisted = true;
        }

        let delay = self.config.timing.auto_restore_ms;
        self.timers.auto_restore = Some(
            self.scheduler
                .schedule(delay, TimerTask::AutoRestore(target)),
        );
        info!("Assisting {} ({})", target, reason);
        self.publish_stats();
        true
    }

    /// Restores the assisted element and its neighbours and cancels every
    /// timer tied to them. Also drops the hover. Safe to call repeatedly.
    pub fn clear_assistance(&mut self) {
        self.restore_active();
        if self.hover.is_some() {
            self.end_hover();
        }
        cancel_slot(&mut self.scheduler, &mut self.timers.hesitation);
    }

    fn restore_active(&mut self) {
        cancel_slot(&mut self.scheduler, &mut self.timers.auto_restore);
        cancel_slot(&mut self.scheduler, &mut self.timers.leave_restore);
        cancel_slot(&mut self.scheduler, &mut self.timers.click_restore);

        let Some(active) = self.active.take() else {
            return;
        };
        for id in active.neighbours.iter().copied().chain([active.target]) {
            self.restore_element(id);
        }
        // Nodes removed from the page never come back.
        let view = &self.view;
        self.originals.retain(|id, _| view.is_attached(*id));
        debug!("Restored {}", active.target);
    }

    fn restore_element(&mut self, id: ElementId) {
        let Some(original) = self.originals.get(&id) else {
            return;
        };
        if let Err(e) = self.view.restore(id, original) {
            debug!("Restore of {} skipped: {}", id, e);
            self.originals.remove(&id);
        }
    }

    fn capture_original(&mut self, id: ElementId) -> Option<VisualState> {
        if let Some(v) = self.originals.get(&id) {
            return Some(v.clone());
        }
        let v = self.view.visual(id)?;
        self.originals.insert(id, v.clone());
        Some(v)
    }

    fn assist_patch(&self, original: &VisualState, rect: &Rect, reason: AssistReason) -> StylePatch {
        let assist = &self.config.assist;
        let sizing = &self.config.sizing;

        let mut extra = sizing.base_extra_padding * (self.effective_sensitivity() as f64 / 3.0);
        if assist.motor_impaired {
            extra *= sizing.motor_padding_factor;
        }
        if assist.auto_adapt {
            extra *= tremor::sizing_factor(self.profile.severity);
        }

        // Larger text can grow the content box by up to the scale on each
        // axis, which comes out of the same footprint budget as the padding.
        let font_scale = if assist.visual_impaired {
            assist.visual_impaired_scale
        } else {
            1.0
        };
        let scaled = Rect::centered(
            rect.center().x,
            rect.center().y,
            rect.width * font_scale,
            rect.height * font_scale,
        );
        let budget = sizing.max_footprint_ratio / (font_scale * font_scale);
        extra = extra.min(max_extra_padding(&scaled, budget));

        let font_size_px = assist
            .visual_impaired
            .then(|| original.font_size_px * font_scale);

        let translate = match self.history.latest() {
            Some(cursor) if assist.auto_adapt => {
                let cursor = Point::from(cursor);
                adaptive::will_click_miss(cursor, rect, &self.profile).then(|| {
                    adaptive::snap_offset(
                        cursor,
                        rect,
                        tremor::snap_strength(self.profile.severity),
                        sizing.max_snap_px,
                    )
                })
            }
            _ => None,
        };

        StylePatch {
            padding_px: Some(original.padding_px + extra),
            font_size_px,
            box_shadow: Some(Some(HIGHLIGHT_SHADOW.to_string())),
            transition: Some(Some(APPLY_TRANSITION.to_string())),
            translate: translate.map(Some),
            marker: Some(Some(reason)),
            active_class: Some(true),
            ..Default::default()
        }
    }

    /// Fades competing targets around `target`, more the closer they are.
    fn dim_neighbours(&mut self, target: ElementId, rect: &Rect) -> Vec<ElementId> {
        let center = rect.center();
        let radius = self.config.sizing.dim_radius;
        if radius <= 0.0 {
            return Vec::new();
        }
        let max_dim = self.config.sizing.max_dim;
        let disable = self.config.assist.motor_impaired;

        let mut dimmed = Vec::new();
        for id in self.view.elements_near(center, radius) {
            if self.view.contains(target, id) || self.view.contains(id, target) {
                continue;
            }
            if !is_assistable(&self.view, self.policy.as_ref(), id) || self.is_opted_out(id) {
                continue;
            }
            let Some(r) = self.view.measure(id) else {
                continue;
            };
            if self.capture_original(id).is_none() {
                continue;
            }
            let d = distance(center, r.center());
            let patch = StylePatch {
                opacity: Some(Some(1.0 - (d / radius).min(1.0) * max_dim)),
                faded: Some(true),
                pointer_events_disabled: disable.then_some(true),
                ..Default::default()
            };
            match self.view.mutate(id, &patch) {
                Ok(()) => dimmed.push(id),
                Err(e) => debug!("Could not dim {}: {}", id, e),
            }
        }
        dimmed
    }

    /// The node or one of its ancestors asked to be left alone.
    fn is_opted_out(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        let mut depth = 0;
        while let Some(node) = cursor {
            if self.view.describe(node).is_some_and(|i| i.opted_out) {
                return true;
            }
            depth += 1;
            if depth > MAX_TREE_DEPTH {
                return false;
            }
            cursor = self.view.parent(node);
        }
        false
    }

    fn end_hover(&mut self) {
        cancel_slot(&mut self.scheduler, &mut self.timers.hesitation);
        if let Some(hover) = self.hover.take() {
            if !hover.hesitated {
                let now = self.scheduler.now_ms();
                self.dwell.record(now.saturating_sub(hover.since_ms));
            }
        }
    }

    // --- Prediction & learning ---

    fn predict_slow_target(&mut self, position: Point, now: u64) {
        if self.active.is_some() || !self.config.assist.visual_feedback {
            return;
        }
        let Some(recent) = self.history.recent(SLOW_WINDOW) else {
            return;
        };
        if speed(&recent) >= self.config.timing.speed_threshold {
            return;
        }
        let cooling = self
            .last_prediction_ms
            .is_some_and(|t| now.saturating_sub(t) < self.config.timing.prediction_cooldown_ms);
        if cooling {
            return;
        }

        let candidates: Vec<Candidate> = self
            .view
            .elements_near(position, self.config.sizing.assistance_radius)
            .into_iter()
            .filter(|&id| is_assistable(&self.view, self.policy.as_ref(), id))
            .filter_map(|id| self.view.measure(id).map(|rect| Candidate::new(id, rect)))
            .collect();

        let Some(target) = self.predictor.predict(&self.history, &candidates) else {
            return;
        };
        self.last_prediction_ms = Some(now);
        self.apply_assistance(target, AssistReason::Predicted);
    }

    fn update_tremor_profile(&mut self) {
        let profile = self.tremor.analyze(&self.history);
        if !profile.is_known() {
            return;
        }
        let changed = profile.severity != self.profile.severity;
        self.profile = profile;
        if changed {
            info!(
                "Tremor estimate: {} ({:.1}Hz, {:.1}px)",
                profile.severity, profile.frequency_hz, profile.amplitude_px
            );
            self.send(OutboundMessage::TremorUpdate { profile });
        }
    }

    fn persist_tremor_profile(&mut self) {
        if let Err(e) = self
            .bridge
            .store(StorageWrite::UserTremorPattern(self.profile))
        {
            warn!("Failed to persist tremor pattern: {}", e);
        }
        self.send(OutboundMessage::TremorUpdate {
            profile: self.profile,
        });
    }

    /// Configured sensitivity, or the recommended level once enough clicks
    /// have been observed with auto-adapt on.
    pub fn effective_sensitivity(&self) -> u8 {
        let configured = self.config.assist.sensitivity;
        if !self.config.assist.auto_adapt || self.stats.click_count < MIN_CLICKS_FOR_ADAPTATION {
            return configured;
        }
        match self.stats.success_rate() {
            Some(rate) => {
                adaptive::recommended_level(rate, self.profile.severity, self.dwell.mean_ms())
            }
            None => configured,
        }
    }

    pub fn hesitation_delay_ms(&self) -> u64 {
        self.config.timing.hesitation_threshold_ms / self.effective_sensitivity().max(1) as u64
    }

    // --- Messages ---

    pub fn on_message(&mut self, message: InboundMessage) {
        debug!("Message: {:?}", message);
        let assist = &mut self.config.assist;
        match message {
            InboundMessage::ToggleAssistance { enabled } => {
                assist.enabled = enabled;
                if enabled {
                    self.attach();
                } else {
                    self.detach();
                }
            }
            InboundMessage::UpdateSensitivity { sensitivity } => {
                assist.sensitivity = clamp_sensitivity(sensitivity);
            }
            InboundMessage::UpdateVisualFeedback { enabled } => {
                assist.visual_feedback = enabled;
                if !enabled {
                    self.clear_assistance();
                }
            }
            InboundMessage::UpdateAutoAdapt { enabled } => {
                assist.auto_adapt = enabled;
            }
            InboundMessage::UpdateMotorImpaired { enabled } => {
                assist.motor_impaired = enabled;
                self.clear_assistance();
            }
            InboundMessage::UpdateVisualImpaired { enabled } => {
                assist.visual_impaired = enabled;
                self.clear_assistance();
            }
            InboundMessage::UpdateVisualImpairedScale { value } => {
                assist.visual_impaired_scale = clamp_visual_scale(value);
            }
            InboundMessage::ResetLearning {} => self.reset_learning(),
        }
    }

    /// Parses and applies a raw JSON message. Malformed input is logged and dropped.
    pub fn on_raw_message(&mut self, raw: &str) {
        match InboundMessage::from_json(raw) {
            Ok(message) => self.on_message(message),
            Err(e) => warn!("Ignoring malformed message: {}", e),
        }
    }

    fn reset_learning(&mut self) {
        self.clear_assistance();
        self.stats = SessionStats::default();
        self.history.clear();
        self.dwell.reset();
        self.moves_since_analysis = 0;
        self.last_prediction_ms = None;
        self.profile = TremorProfile::UNKNOWN;
        info!("Learning reset");
        self.persist_tremor_profile();
        self.publish_stats();
    }

    // --- Bridge ---

    fn publish_stats(&mut self) {
        let stats = self.stats.clone();
        if let Err(e) = self.bridge.store(StorageWrite::Stats(stats.clone())) {
            warn!("Failed to persist stats: {}", e);
        }
        self.send(OutboundMessage::StatsUpdate { stats });
    }

    fn send(&mut self, message: OutboundMessage) {
        if let Err(e) = self.bridge.publish(&message) {
            warn!("Dropped outbound message: {}", e);
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> Phase {
        let restoring = self.timers.leave_restore.is_some() || self.timers.click_restore.is_some();
        match (&self.active, self.hover) {
            (Some(_), _) if restoring => Phase::Restoring,
            (Some(_), _) => Phase::Assisted,
            (None, Some(h)) if h.hesitated && !h.assisted => Phase::HesitationPending,
            (None, Some(_)) => Phase::Hovering,
            (None, None) => Phase::Idle,
        }
    }

    /// Number of elements whose pre-assistance state is cached.
    pub fn cached_originals(&self) -> usize {
        self.originals.len()
    }

    pub fn active_target(&self) -> Option<ElementId> {
        self.active.as_ref().map(|a| a.target)
    }

    pub fn active_reason(&self) -> Option<AssistReason> {
        self.active.as_ref().map(|a| a.reason)
    }

    pub fn hover_target(&self) -> Option<ElementId> {
        self.hover.map(|h| h.target)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn tremor_profile(&self) -> &TremorProfile {
        &self.profile
    }

    pub fn history(&self) -> &CursorHistory {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }
}

/// Largest uniform padding increase keeping the box within `ratio` times
/// its original area: solves `(w + 2e)(h + 2e) = ratio * w * h` for `e`.
///
/// Only padding is bounded here. Typography growth is bounded separately by
/// `MAX_VISUAL_SCALE`; the controller shrinks `ratio` to leave room for it.
pub fn max_extra_padding(rect: &Rect, ratio: f64) -> f64 {
    let (w, h) = (rect.width.max(0.0), rect.height.max(0.0));
    let sum = w + h;
    let disc = sum * sum - 4.0 * (1.0 - ratio.max(1.0)) * w * h;
    ((disc.max(0.0).sqrt() - sum) / 4.0).max(0.0)
}
