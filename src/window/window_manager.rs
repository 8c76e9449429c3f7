//! Session state of the card shell.
//!
//! `WindowManager` owns everything one session needs: the panel registry and
//! the content of each panel, the drag and swipe controllers, overlay and
//! focus state, the lock screen and the cooperative timer table. It is the
//! only object the runner talks to. Reinitialization rebuilds it in place,
//! which is how a breakpoint crossing resets the session.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Clear;

use super::decorator::{CardDecorator, PanelDecorator};
use super::{
    DragController, DragEffect, DragEvent, GrabTarget, Panel, PanelId, PanelKind, PanelRegistry,
    PanelVisual, SwipeController, SwipeEffect, SwipeEvent, SwipeState,
};
use crate::actions::Action;
use crate::clock::WallClock;
use crate::components::{
    BootScreen, ClockPopup, CompactHome, Component, ComponentContext, DailyWidget,
    DebugLogComponent, DebugLogHandle, DesktopIcons, HeartBurst, HomeAction, LockKey, LockScreen,
    MenuEntry, MenuHit, StartMenu, Taskbar, TaskbarHit, TaskbarState, Toast, UnlockAttempt,
    WidgetAction, global_debug_log,
};
use crate::config::{Config, Metrics, PresentationMode};
use crate::constants::{
    CLOCK_REFRESH, COUNTDOWN_REFRESH, DAILY_QUOTE_ROTATION, GREETING_REFRESH, HEARTS_FRAME,
    HEARTS_LIFETIME, RESIZE_DEBOUNCE, TOAST_DURATION,
};
use crate::content::{AppEntry, ContentRegistry, FaultContent, PanelContent};
use crate::keybindings::KeyBindings;
use crate::layout::{DragBounds, Point, RegionMap, Size, Viewport, visible_rect};
use crate::state::{ClickScope, Dismissals, FocusTarget, Landing, OverlayId, OverlayState};
use crate::theme;
use crate::timers::{Debouncer, Fired, FrameRequest, Scheduler, TimerKind, TimerOwner};
use crate::ui::{UiFrame, centered};

/// Panel name used by the daily widget's vault button.
const VAULT_KIND: &str = "birthday-vault";
const COUNTDOWN_KIND: &str = "countdown";
/// Rows kept free above compact sheets so the home header stays visible.
const SHEET_TOP: i32 = 1;

#[derive(Debug, Clone)]
pub struct FocusRing<T: Copy + Eq> {
    order: Vec<T>,
    current: T,
}

impl<T: Copy + Eq> FocusRing<T> {
    pub fn new(current: T) -> Self {
        Self {
            order: Vec::new(),
            current,
        }
    }

    pub fn set_order(&mut self, order: Vec<T>) {
        self.order = order;
    }

    pub fn current(&self) -> T {
        self.current
    }

    pub fn set_current(&mut self, current: T) {
        self.current = current;
    }

    pub fn advance(&mut self, forward: bool) {
        if self.order.is_empty() {
            return;
        }
        let idx = self
            .order
            .iter()
            .position(|item| *item == self.current)
            .unwrap_or(0);
        let step = if forward { 1isize } else { -1isize };
        let next = ((idx as isize + step).rem_euclid(self.order.len() as isize)) as usize;
        self.current = self.order[next];
    }
}

/// What sits under a pointer position, topmost layer first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    LockScreen,
    StartMenu(MenuHit),
    ClockPopup { close: bool },
    Taskbar(TaskbarHit),
    Panel { id: PanelId, target: GrabTarget },
    Widget(WidgetAction),
    Desktop,
}

pub struct WindowManager {
    config: Config,
    metrics: Metrics,
    /// Mode chosen from the width when the session started.
    session_mode: PresentationMode,
    mode: PresentationMode,
    viewport: Viewport,
    now: Instant,
    clock: Arc<dyn WallClock>,
    bindings: KeyBindings,
    decorator: Box<dyn PanelDecorator>,
    content_registry: ContentRegistry,
    apps: Vec<AppEntry>,
    registry: PanelRegistry,
    contents: BTreeMap<PanelId, Box<dyn PanelContent>>,
    regions: RegionMap<PanelId>,
    drag: DragController,
    swipe: SwipeController,
    overlays: OverlayState,
    focus_ring: FocusRing<FocusTarget>,
    scheduler: Scheduler,
    resize: Debouncer,
    frame_request: FrameRequest,
    lock_screen: LockScreen,
    taskbar: Taskbar,
    start_menu: StartMenu,
    clock_popup: ClockPopup,
    desktop_icons: DesktopIcons,
    daily_widget: DailyWidget,
    compact_home: CompactHome,
    toast: Toast,
    hearts: HeartBurst,
    boot: Option<BootScreen>,
    debug_log: DebugLogComponent,
    reinit_count: u64,
    quit: bool,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("mode", &self.mode)
            .field("viewport", &self.viewport)
            .field("panels", &self.registry.list_open())
            .field("locked", &self.overlays.is_locked())
            .field("focus", &self.overlays.focus())
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    /// Start a session. Log lines go to the process-wide debug log when one
    /// is installed.
    pub fn new(
        config: Config,
        viewport: Viewport,
        clock: Arc<dyn WallClock>,
        now: Instant,
    ) -> Self {
        let debug_log = global_debug_log().unwrap_or_default();
        Self::with_debug_log(config, viewport, clock, now, debug_log)
    }

    pub fn with_debug_log(
        config: Config,
        viewport: Viewport,
        clock: Arc<dyn WallClock>,
        now: Instant,
        debug_log: DebugLogHandle,
    ) -> Self {
        let metrics = config.metrics;
        let mode = config.mode_for_width(viewport.width);
        let wall = clock.now();
        let card = config.content.clone();
        let content_registry = ContentRegistry::with_defaults(card, config.photo_dir.clone());
        let apps = content_registry.apps();
        let card = content_registry.card();

        let mut taskbar = Taskbar::new();
        taskbar.update_clock(wall);
        let mut daily_widget = DailyWidget::new(card);
        daily_widget.start(wall);
        let mut compact_home = CompactHome::new(card.recipient.clone(), apps.clone());
        compact_home.update(wall);
        let mut clock_popup = ClockPopup::new(card.birthday.clone());
        clock_popup.refresh(wall);
        let mut lock_screen = LockScreen::new(config.pin.clone(), card.recipient.clone());
        lock_screen.reset(wall);
        let boot = config
            .show_boot
            .then(|| BootScreen::new(card.recipient.clone(), wall, mode.boot_duration()));

        let mut scheduler = Scheduler::new();
        scheduler.every(TimerOwner::Shell, TimerKind::Clock, CLOCK_REFRESH, now);
        scheduler.every(TimerOwner::Shell, TimerKind::Greeting, GREETING_REFRESH, now);
        scheduler.every(TimerOwner::Shell, TimerKind::Countdown, COUNTDOWN_REFRESH, now);
        scheduler.every(TimerOwner::Shell, TimerKind::DailyQuote, DAILY_QUOTE_ROTATION, now);
        if config.lock_on_start {
            scheduler.every(TimerOwner::Shell, TimerKind::LockClock, CLOCK_REFRESH, now);
        }
        if boot.is_some() {
            scheduler.after(TimerOwner::Shell, TimerKind::BootDone, mode.boot_duration(), now);
        }

        tracing::debug!(
            mode = ?mode,
            width = viewport.width,
            height = viewport.height,
            locked = config.lock_on_start,
            "session started"
        );

        let mut frame_request = FrameRequest::default();
        frame_request.request();
        Self {
            overlays: OverlayState::new(config.lock_on_start),
            start_menu: StartMenu::new(apps.clone()),
            desktop_icons: DesktopIcons::new(apps.clone()),
            metrics,
            session_mode: mode,
            mode,
            viewport,
            now,
            clock,
            bindings: KeyBindings::default(),
            decorator: Box::new(CardDecorator),
            content_registry,
            apps,
            registry: PanelRegistry::new(),
            contents: BTreeMap::new(),
            regions: RegionMap::default(),
            drag: DragController::new(),
            swipe: SwipeController::new(),
            focus_ring: FocusRing::new(FocusTarget::Desktop),
            scheduler,
            resize: Debouncer::new(RESIZE_DEBOUNCE),
            frame_request,
            lock_screen,
            taskbar,
            clock_popup,
            daily_widget,
            compact_home,
            toast: Toast::new(),
            hearts: HeartBurst::new(),
            boot,
            debug_log: DebugLogComponent::new(debug_log),
            reinit_count: 0,
            quit: false,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    /// Open panels, oldest first.
    pub fn list_open(&self) -> &[Panel] {
        self.registry.list_open()
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.registry.get(id)
    }

    pub fn content(&self, id: PanelId) -> Option<&dyn PanelContent> {
        self.contents.get(&id).map(|c| &**c)
    }

    pub fn overlays(&self) -> &OverlayState {
        &self.overlays
    }

    pub fn is_locked(&self) -> bool {
        self.overlays.is_locked()
    }

    pub fn focus(&self) -> FocusTarget {
        self.overlays.focus()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    pub fn hearts(&self) -> &HeartBurst {
        &self.hearts
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn lock_screen(&self) -> &LockScreen {
        &self.lock_screen
    }

    pub fn daily_widget(&self) -> &DailyWidget {
        &self.daily_widget
    }

    pub fn is_booting(&self) -> bool {
        self.boot.as_ref().is_some_and(BootScreen::is_visible)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_swiping(&self) -> bool {
        self.swipe.is_tracking()
    }

    /// Number of reinitializations since the manager was created.
    pub fn reinit_count(&self) -> u64 {
        self.reinit_count
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// True once per batch of state changes; the runner draws when it is.
    pub fn take_frame_request(&mut self) -> bool {
        let overlays = self.overlays.take_change();
        self.frame_request.take() || overlays
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scheduler.next_deadline(), self.resize.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ---- lifecycle ----

    /// Open a panel of `kind`, placed by the cascade, focused and raised.
    pub fn open(&mut self, kind: impl Into<PanelKind>) -> PanelId {
        let kind = kind.into();
        let id = self.registry.open(kind.clone(), self.viewport, &self.metrics);
        let content = self.content_registry.produce(&kind);
        let interval = content.refresh_interval();
        self.contents.insert(id, content);
        let wall = self.clock.now();
        self.guarded(id, |content| content.start(wall));
        if let Some(period) = interval
            && self.contents.contains_key(&id)
        {
            self.scheduler
                .every(TimerOwner::Panel(id), TimerKind::ContentRefresh, period, self.now);
        }
        self.focus_panel(id);
        self.refresh_regions();
        self.frame_request.request();
        id
    }

    /// Close a panel and cancel everything it owns. Unknown ids are a no-op.
    pub fn close(&mut self, id: PanelId) -> bool {
        match self.registry.close(id) {
            Some(panel) => {
                self.forget_panel(panel.id());
                true
            }
            None => false,
        }
    }

    pub fn close_topmost(&mut self) -> Option<PanelId> {
        let panel = self.registry.close_topmost()?;
        self.forget_panel(panel.id());
        Some(panel.id())
    }

    fn forget_panel(&mut self, id: PanelId) {
        let cancelled = self.scheduler.cancel_owner(TimerOwner::Panel(id));
        if cancelled > 0 {
            tracing::debug!(panel = %id, timers = cancelled, "cancelled panel timers");
        }
        self.drag.abort_for(id);
        self.swipe.abort_for(id);
        self.overlays.panel_closed(id);
        self.contents.remove(&id);
        self.regions.remove(id);
        self.frame_request.request();
    }

    /// Focus a panel and paint it above the others.
    pub fn focus_panel(&mut self, id: PanelId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.registry.raise(id);
        self.overlays.set_focus(FocusTarget::Panel(id));
        self.frame_request.request();
        true
    }

    /// Tab order: the desktop, then panels in open order.
    pub fn cycle_focus(&mut self, forward: bool) {
        let mut order = vec![FocusTarget::Desktop];
        order.extend(self.registry.list_open().iter().map(|p| FocusTarget::Panel(p.id())));
        self.focus_ring.set_order(order);
        self.focus_ring.set_current(self.overlays.focus());
        self.focus_ring.advance(forward);
        match self.focus_ring.current() {
            FocusTarget::Panel(id) => {
                self.focus_panel(id);
            }
            other => self.overlays.set_focus(other),
        }
        self.frame_request.request();
    }

    // ---- overlays ----

    /// Close the start menu, the clock popup and the topmost panel, all on
    /// the same press. Nothing happens while locked.
    pub fn escape(&mut self) -> Dismissals {
        let dismissals = self.overlays.escape(&mut self.registry);
        if dismissals.start_menu {
            self.start_menu.clear_hits();
        }
        if dismissals.clock_popup {
            self.clock_popup.clear_hits();
        }
        if let Some(panel) = &dismissals.panel {
            self.forget_panel(panel.id());
        }
        if !dismissals.is_empty() {
            self.frame_request.request();
        }
        dismissals
    }

    /// `None` while locked, otherwise the new visibility.
    pub fn toggle_start_menu(&mut self) -> Option<bool> {
        let visible = self
            .overlays
            .toggle(OverlayId::StartMenu, Landing::start_menu(self.start_menu.len()))?;
        if visible {
            self.start_menu.select(0);
        } else {
            self.start_menu.clear_hits();
        }
        self.frame_request.request();
        Some(visible)
    }

    pub fn toggle_clock_popup(&mut self) -> Option<bool> {
        let visible = self
            .overlays
            .toggle(OverlayId::ClockPopup, Landing::clock_popup())?;
        if visible {
            self.clock_popup.refresh(self.clock.now());
        } else {
            self.clock_popup.clear_hits();
        }
        self.frame_request.request();
        Some(visible)
    }

    fn close_overlay(&mut self, overlay: OverlayId) -> bool {
        let closed = self.overlays.close(overlay);
        if closed {
            match overlay {
                OverlayId::StartMenu => self.start_menu.clear_hits(),
                OverlayId::ClockPopup => self.clock_popup.clear_hits(),
            }
            self.frame_request.request();
        }
        closed
    }

    pub fn toggle_debug_log(&mut self) {
        self.overlays.toggle_debug_log_visible();
        self.frame_request.request();
    }

    pub fn lock(&mut self) -> bool {
        if !self.overlays.lock() {
            return false;
        }
        if let Some(id) = self.drag.active_panel() {
            self.drag.abort_for(id);
        }
        if let SwipeState::Tracking(session) = self.swipe.state() {
            self.swipe.abort_for(session.panel);
            self.set_visual(session.panel, PanelVisual::REST);
        }
        self.start_menu.clear_hits();
        self.clock_popup.clear_hits();
        self.lock_screen.reset(self.clock.now());
        self.scheduler.cancel_kind(TimerOwner::Shell, TimerKind::LockClock);
        self.scheduler
            .every(TimerOwner::Shell, TimerKind::LockClock, CLOCK_REFRESH, self.now);
        self.frame_request.request();
        true
    }

    /// Compare the typed PIN and unlock on a match.
    pub fn submit_pin(&mut self) -> UnlockAttempt {
        let attempt = self.lock_screen.submit();
        if attempt == UnlockAttempt::Accepted && self.overlays.unlock() {
            self.scheduler.cancel_kind(TimerOwner::Shell, TimerKind::LockClock);
        }
        self.frame_request.request();
        attempt
    }

    /// Type `pin` into the lock screen and submit it. `None` when not locked.
    pub fn enter_pin(&mut self, pin: &str) -> Option<UnlockAttempt> {
        if !self.overlays.is_locked() {
            return None;
        }
        for ch in pin.chars() {
            self.lock_screen.type_char(ch);
        }
        Some(self.submit_pin())
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast.show(message);
        self.scheduler.cancel_kind(TimerOwner::Shell, TimerKind::ToastExpiry);
        self.scheduler
            .after(TimerOwner::Shell, TimerKind::ToastExpiry, TOAST_DURATION, self.now);
        self.frame_request.request();
    }

    fn send_love(&mut self) {
        let recipient = self.content_registry.card().recipient.clone();
        self.show_toast(format!("Love sent to {recipient} ♥"));
        self.start_hearts();
    }

    /// Rain hearts down the screen, restarting a burst already in flight.
    pub fn start_hearts(&mut self) {
        self.hearts.start(self.now);
        for kind in [TimerKind::HeartsFrame, TimerKind::HeartsExpiry] {
            self.scheduler.cancel_kind(TimerOwner::Shell, kind);
        }
        self.scheduler
            .every(TimerOwner::Shell, TimerKind::HeartsFrame, HEARTS_FRAME, self.now);
        self.scheduler
            .after(TimerOwner::Shell, TimerKind::HeartsExpiry, HEARTS_LIFETIME, self.now);
        self.frame_request.request();
    }

    /// Change presentation without starting a new session.
    pub fn set_mode(&mut self, mode: PresentationMode) {
        if mode == self.mode {
            return;
        }
        if let Some(id) = self.drag.active_panel() {
            self.drag.abort_for(id);
        }
        if let SwipeState::Tracking(session) = self.swipe.state() {
            self.swipe.abort_for(session.panel);
            self.set_visual(session.panel, PanelVisual::REST);
        }
        tracing::debug!(mode = ?mode, "presentation switched");
        self.mode = mode;
        self.refresh_regions();
        self.frame_request.request();
    }

    // ---- time ----

    /// Advance the session to `now`: run the resize debounce and every timer
    /// that is due.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        if self.resize.fire(now) {
            self.reinit();
            return;
        }
        for fired in self.scheduler.due(now) {
            self.dispatch_timer(fired);
        }
    }

    fn dispatch_timer(&mut self, fired: Fired) {
        let wall = self.clock.now();
        match (fired.owner, fired.kind) {
            (TimerOwner::Panel(id), TimerKind::ContentRefresh) => {
                self.guarded(id, |content| content.refresh(wall));
            }
            (TimerOwner::Panel(id), kind) => {
                tracing::warn!(panel = %id, kind = ?kind, "unexpected panel timer");
            }
            (TimerOwner::Shell, TimerKind::Clock) => {
                self.taskbar.update_clock(wall);
                self.compact_home.update(wall);
            }
            (TimerOwner::Shell, TimerKind::LockClock) => self.lock_screen.update_time(wall),
            (TimerOwner::Shell, TimerKind::Greeting) => self.daily_widget.refresh_greeting(wall),
            (TimerOwner::Shell, TimerKind::Countdown) => self.daily_widget.refresh_countdown(wall),
            (TimerOwner::Shell, TimerKind::DailyQuote) => self.daily_widget.rotate_quote(),
            (TimerOwner::Shell, TimerKind::BootDone) => {
                if let Some(boot) = self.boot.as_mut()
                    && boot.finish()
                {
                    tracing::debug!("boot finished");
                }
            }
            (TimerOwner::Shell, TimerKind::ToastExpiry) => {
                self.toast.hide();
            }
            (TimerOwner::Shell, TimerKind::HeartsFrame) => {}
            (TimerOwner::Shell, TimerKind::HeartsExpiry) => {
                self.hearts.clear();
                self.scheduler.cancel_kind(TimerOwner::Shell, TimerKind::HeartsFrame);
            }
            (TimerOwner::Shell, TimerKind::ContentRefresh) => {}
        }
        self.frame_request.request();
    }

    /// Record a new terminal size. Crossing the breakpoint schedules a
    /// debounced reinitialization; crossing back before it fires cancels it.
    pub fn resize(&mut self, width: u16, height: u16) {
        let viewport = Size::new(i32::from(width), i32::from(height));
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if self.config.mode_for_width(viewport.width) != self.session_mode {
            self.resize.trigger(self.now);
        } else {
            self.resize.cancel();
        }
        self.refresh_regions();
        self.frame_request.request();
    }

    /// Throw the session away and start a fresh one at the current size.
    pub fn reinit(&mut self) {
        tracing::debug!(
            panels = self.registry.len(),
            width = self.viewport.width,
            "reinitializing session"
        );
        let fresh = Self::with_debug_log(
            self.config.clone(),
            self.viewport,
            Arc::clone(&self.clock),
            self.now,
            self.debug_log.handle().clone(),
        );
        let reinit_count = self.reinit_count.saturating_add(1);
        let quit = self.quit;
        *self = fresh;
        self.reinit_count = reinit_count;
        self.quit = quit;
    }

    // ---- content isolation ----

    /// Run `f` against a panel's content. A panic replaces the content with
    /// the fault placeholder and cancels the panel's timers.
    fn guarded<R>(&mut self, id: PanelId, f: impl FnOnce(&mut dyn PanelContent) -> R) -> Option<R> {
        let content = self.contents.get_mut(&id)?;
        match panic::catch_unwind(AssertUnwindSafe(|| f(&mut **content))) {
            Ok(result) => Some(result),
            Err(payload) => {
                self.fault(id, payload.as_ref());
                None
            }
        }
    }

    fn fault(&mut self, id: PanelId, payload: &(dyn Any + Send)) {
        let message = panic_message(payload);
        tracing::error!(panel = %id, message = %message, "panel content panicked");
        self.contents.insert(id, Box::new(FaultContent));
        self.scheduler.cancel_owner(TimerOwner::Panel(id));
        self.frame_request.request();
    }

    // ---- geometry ----

    fn screen_rect(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.viewport.width.clamp(0, i32::from(u16::MAX)) as u16,
            self.viewport.height.clamp(0, i32::from(u16::MAX)) as u16,
        )
    }

    /// Screen minus the taskbar strip.
    fn desktop_area(&self) -> Rect {
        let screen = self.screen_rect();
        let taskbar = self.metrics.taskbar_height.clamp(0, i32::from(screen.height)) as u16;
        Rect {
            height: screen.height - taskbar,
            ..screen
        }
    }

    fn taskbar_area(&self) -> Rect {
        let screen = self.screen_rect();
        let desktop = self.desktop_area();
        Rect {
            y: desktop.height,
            height: screen.height - desktop.height,
            ..screen
        }
    }

    /// On-screen rectangle of a panel in the current mode.
    fn panel_rect(&self, panel: &Panel) -> Option<Rect> {
        let desktop = self.desktop_area();
        match self.mode {
            PresentationMode::Expanded => visible_rect(panel.position, panel.size, desktop),
            PresentationMode::Compact => {
                let top = SHEET_TOP.min(i32::from(desktop.height));
                let origin = Point::new(0, top.saturating_add(panel.visual.offset_y));
                let size = Size::new(i32::from(desktop.width), i32::from(desktop.height) - top);
                visible_rect(origin, size, desktop)
            }
        }
    }

    fn refresh_regions(&mut self) {
        self.regions.clear();
        let rects: Vec<(PanelId, Option<Rect>)> = self
            .registry
            .list_open()
            .iter()
            .map(|panel| (panel.id(), self.panel_rect(panel)))
            .collect();
        for (id, rect) in rects {
            if let Some(rect) = rect {
                self.regions.set(id, rect);
            }
        }
    }

    fn set_visual(&mut self, id: PanelId, visual: PanelVisual) {
        if let Some(panel) = self.registry.get_mut(id) {
            panel.visual = visual;
        }
        self.refresh_regions();
        self.frame_request.request();
    }

    fn title_for(&self, kind: &PanelKind) -> String {
        self.apps
            .iter()
            .find(|app| &app.kind == kind)
            .map(|app| app.label.clone())
            .unwrap_or_else(|| kind.title())
    }

    /// Resolve a pointer position against the layers drawn last frame.
    pub fn hit_test(&self, column: u16, row: u16) -> ClickTarget {
        if self.overlays.is_locked() {
            return ClickTarget::LockScreen;
        }
        if self.overlays.is_open(OverlayId::StartMenu)
            && let Some(hit) = self.start_menu.hit_test(column, row)
        {
            return ClickTarget::StartMenu(hit);
        }
        if self.overlays.is_open(OverlayId::ClockPopup) && self.clock_popup.contains(column, row) {
            return ClickTarget::ClockPopup {
                close: self.clock_popup.hit_close(column, row),
            };
        }
        if let Some(hit) = self.taskbar.hit_test(column, row) {
            return ClickTarget::Taskbar(hit);
        }
        let mut topmost_first = self.registry.draw_order();
        topmost_first.reverse();
        if let Some(id) = self.regions.hit_test(column, row, &topmost_first)
            && let Some(rect) = self.regions.get(id)
        {
            let target = self.decorator.grab_target(rect, column, row);
            return ClickTarget::Panel { id, target };
        }
        if self.mode == PresentationMode::Expanded
            && let Some(action) = self.daily_widget.hit_test(column, row)
        {
            return ClickTarget::Widget(action);
        }
        ClickTarget::Desktop
    }

    // ---- input ----

    /// Route one terminal event. Returns true when it was consumed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(event, key),
            Event::Mouse(mouse) => self.handle_mouse(event, mouse),
            Event::Resize(width, height) => {
                self.resize(*width, *height);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, event: &Event, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let action = self.bindings.action_for_key(key);
        if action == Some(Action::Quit) {
            self.request_quit();
            return true;
        }
        if self.is_booting() {
            return false;
        }
        if self.overlays.is_locked() {
            return match self.lock_screen.handle_key(key) {
                LockKey::Submit => {
                    self.submit_pin();
                    true
                }
                LockKey::Edited => {
                    self.frame_request.request();
                    true
                }
                LockKey::Ignored => false,
            };
        }
        if self.overlays.debug_log_visible() {
            match action {
                Some(Action::ToggleDebugLog) => {
                    self.toggle_debug_log();
                    return true;
                }
                Some(Action::Escape) => {
                    self.toggle_debug_log();
                    self.escape();
                    return true;
                }
                _ => {}
            }
            let ctx = self.context(true);
            let consumed = self.debug_log.handle_event(event, &ctx);
            if consumed {
                self.frame_request.request();
            }
            return consumed;
        }
        if let Some(action) = action
            && action.is_global()
        {
            return self.apply_action(action);
        }
        if self.overlays.is_open(OverlayId::StartMenu)
            && let Some(action) = action
            && self.apply_action(action)
        {
            return true;
        }
        if let FocusTarget::Panel(id) = self.overlays.focus() {
            let ctx = self.context(true);
            if self.guarded(id, |content| content.handle_event(event, &ctx)) == Some(true) {
                self.frame_request.request();
                return true;
            }
        }
        if let Some(action) = action
            && self.apply_action(action)
        {
            return true;
        }
        self.handle_focus_key(key)
    }

    fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.request_quit();
                true
            }
            Action::Escape => {
                self.escape();
                true
            }
            Action::FocusNext => {
                self.cycle_focus(true);
                true
            }
            Action::FocusPrev => {
                self.cycle_focus(false);
                true
            }
            Action::ToggleStartMenu => self.toggle_start_menu().is_some(),
            Action::ToggleClockPopup => self.toggle_clock_popup().is_some(),
            Action::ToggleDebugLog => {
                self.toggle_debug_log();
                true
            }
            Action::MenuUp | Action::MenuDown => {
                if !self.overlays.is_open(OverlayId::StartMenu) {
                    return false;
                }
                let delta = if action == Action::MenuUp { -1 } else { 1 };
                let idx = self.start_menu.select_delta(delta);
                self.overlays.set_focus(FocusTarget::StartMenuItem(idx));
                self.frame_request.request();
                true
            }
            Action::MenuSelect => match self.overlays.focus() {
                FocusTarget::StartMenuItem(idx) if self.overlays.is_open(OverlayId::StartMenu) => {
                    self.activate_menu_entry(idx);
                    true
                }
                FocusTarget::StartMenuClose => self.close_overlay(OverlayId::StartMenu),
                _ => false,
            },
        }
    }

    /// Keys for whatever shell element holds focus when no binding applied.
    fn handle_focus_key(&mut self, key: &KeyEvent) -> bool {
        let activate = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        match self.overlays.focus() {
            FocusTarget::StartButton if activate => self.toggle_start_menu().is_some(),
            FocusTarget::ClockButton if activate => self.toggle_clock_popup().is_some(),
            FocusTarget::ClockPopupClose if activate => self.close_overlay(OverlayId::ClockPopup),
            FocusTarget::StartMenuClose if activate => self.close_overlay(OverlayId::StartMenu),
            FocusTarget::Desktop => match self.mode {
                PresentationMode::Expanded => match self.desktop_icons.handle_key(key) {
                    Some(kind) => {
                        self.open(kind);
                        true
                    }
                    None => {
                        self.frame_request.request();
                        matches!(
                            key.code,
                            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
                        )
                    }
                },
                PresentationMode::Compact => match self.compact_home.handle_key(key) {
                    Some(action) => {
                        self.apply_home_action(action);
                        true
                    }
                    None => {
                        self.frame_request.request();
                        matches!(
                            key.code,
                            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
                        )
                    }
                },
            },
            _ => false,
        }
    }

    fn activate_menu_entry(&mut self, idx: usize) {
        let Some(entry) = self.start_menu.entry(idx).cloned() else {
            return;
        };
        self.close_overlay(OverlayId::StartMenu);
        match entry {
            MenuEntry::App(app) => {
                self.open(app.kind);
            }
            MenuEntry::Lock => {
                self.lock();
            }
            MenuEntry::SwitchView => {
                let next = match self.mode {
                    PresentationMode::Compact => PresentationMode::Expanded,
                    PresentationMode::Expanded => PresentationMode::Compact,
                };
                self.set_mode(next);
            }
        }
    }

    fn apply_widget_action(&mut self, action: WidgetAction) {
        match action {
            WidgetAction::ToggleCollapse => {
                self.daily_widget.toggle_collapsed();
                self.frame_request.request();
            }
            WidgetAction::SendLove => self.send_love(),
            WidgetAction::OpenVault => {
                self.open(VAULT_KIND);
            }
        }
    }

    fn apply_home_action(&mut self, action: HomeAction) {
        match action {
            HomeAction::SendLove => self.send_love(),
            HomeAction::Countdown => {
                self.open(COUNTDOWN_KIND);
            }
            HomeAction::Desktop => self.set_mode(PresentationMode::Expanded),
            HomeAction::Launch(kind) => {
                self.open(kind);
            }
        }
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent) -> bool {
        if self.is_booting() {
            return false;
        }
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(event, column, row),
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_move(column, row),
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(),
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if self.overlays.is_locked() {
                    return false;
                }
                if self.overlays.debug_log_visible() {
                    let ctx = self.context(true);
                    return self.debug_log.handle_event(event, &ctx);
                }
                match self.hit_test(column, row) {
                    ClickTarget::Panel { id, .. } => {
                        let ctx = self.context(true);
                        let consumed = self
                            .guarded(id, |content| content.handle_event(event, &ctx))
                            == Some(true);
                        if consumed {
                            self.frame_request.request();
                        }
                        consumed
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn pointer_down(&mut self, event: &Event, column: u16, row: u16) -> bool {
        let target = self.hit_test(column, row);
        if target == ClickTarget::LockScreen {
            if self.lock_screen.hit_unlock(column, row) {
                self.submit_pin();
            }
            return true;
        }

        let scope = ClickScope {
            on_start_button: target == ClickTarget::Taskbar(TaskbarHit::StartButton),
            in_start_menu: matches!(target, ClickTarget::StartMenu(_)),
            on_clock_button: target == ClickTarget::Taskbar(TaskbarHit::Clock),
            in_clock_popup: matches!(target, ClickTarget::ClockPopup { .. }),
        };
        for overlay in self.overlays.click_outside(scope) {
            match overlay {
                OverlayId::StartMenu => self.start_menu.clear_hits(),
                OverlayId::ClockPopup => self.clock_popup.clear_hits(),
            }
            self.frame_request.request();
        }

        match target {
            ClickTarget::LockScreen => {}
            ClickTarget::StartMenu(MenuHit::Item(idx)) => self.activate_menu_entry(idx),
            ClickTarget::StartMenu(MenuHit::Close) => {
                self.close_overlay(OverlayId::StartMenu);
            }
            ClickTarget::StartMenu(MenuHit::Inside) => {}
            ClickTarget::ClockPopup { close } => {
                if close {
                    self.close_overlay(OverlayId::ClockPopup);
                }
            }
            ClickTarget::Taskbar(TaskbarHit::StartButton) => {
                self.toggle_start_menu();
            }
            ClickTarget::Taskbar(TaskbarHit::Clock) => {
                self.toggle_clock_popup();
            }
            ClickTarget::Taskbar(TaskbarHit::Panel(id)) => {
                self.focus_panel(id);
            }
            ClickTarget::Panel { id, target } => self.press_panel(event, id, target, column, row),
            ClickTarget::Widget(action) => self.apply_widget_action(action),
            ClickTarget::Desktop => self.press_desktop(column, row),
        }
        true
    }

    fn press_panel(
        &mut self,
        event: &Event,
        id: PanelId,
        target: GrabTarget,
        column: u16,
        row: u16,
    ) {
        if target == GrabTarget::CloseControl {
            self.close(id);
            return;
        }
        self.focus_panel(id);
        let Some(panel) = self.registry.get(id) else {
            return;
        };
        let (position, size) = (panel.position, panel.size);
        match (self.mode, target) {
            (PresentationMode::Expanded, GrabTarget::TitleBar) => {
                self.drag.handle(DragEvent::Press {
                    panel: id,
                    target,
                    pointer: Point::new(i32::from(column), i32::from(row)),
                    panel_position: position,
                    bounds: DragBounds::new(self.viewport, size, self.metrics.taskbar_height),
                });
            }
            (PresentationMode::Compact, GrabTarget::TitleBar | GrabTarget::Body) => {
                self.swipe.handle(
                    SwipeEvent::Touch {
                        panel: id,
                        y: i32::from(row),
                    },
                    &self.metrics,
                );
            }
            _ => {}
        }
        if target == GrabTarget::Body {
            let ctx = self.context(true);
            self.guarded(id, |content| content.handle_event(event, &ctx));
        }
    }

    fn press_desktop(&mut self, column: u16, row: u16) {
        match self.mode {
            PresentationMode::Expanded => {
                if let Some(kind) = self.desktop_icons.hit_test(column, row) {
                    self.open(kind);
                    return;
                }
            }
            PresentationMode::Compact => {
                if let Some(action) = self.compact_home.hit_test(column, row) {
                    self.apply_home_action(action);
                    return;
                }
            }
        }
        self.overlays.set_focus(FocusTarget::Desktop);
        self.frame_request.request();
    }

    fn pointer_move(&mut self, column: u16, row: u16) -> bool {
        if self.drag.is_dragging() {
            let effect = self.drag.handle(DragEvent::Move {
                pointer: Point::new(i32::from(column), i32::from(row)),
            });
            self.apply_drag_effect(effect);
            return true;
        }
        if self.swipe.is_tracking() {
            let effect = self
                .swipe
                .handle(SwipeEvent::Move { y: i32::from(row) }, &self.metrics);
            self.apply_swipe_effect(effect);
            return true;
        }
        false
    }

    fn pointer_up(&mut self) -> bool {
        if self.drag.is_dragging() {
            let effect = self.drag.handle(DragEvent::Release);
            self.apply_drag_effect(effect);
            return true;
        }
        if self.swipe.is_tracking() {
            let effect = self.swipe.handle(SwipeEvent::Lift, &self.metrics);
            self.apply_swipe_effect(effect);
            return true;
        }
        false
    }

    fn apply_drag_effect(&mut self, effect: DragEffect) {
        match effect {
            DragEffect::MoveTo { panel, position } | DragEffect::Finished { panel, position } => {
                if self.registry.set_position(panel, position) {
                    self.refresh_regions();
                    self.frame_request.request();
                }
            }
            DragEffect::Started(_) | DragEffect::None => {}
        }
    }

    fn apply_swipe_effect(&mut self, effect: SwipeEffect) {
        match effect {
            SwipeEffect::Visual { panel, visual } => self.set_visual(panel, visual),
            SwipeEffect::Dismiss(panel) => {
                self.close(panel);
            }
            SwipeEffect::Restore(panel) => self.set_visual(panel, PanelVisual::REST),
            SwipeEffect::None => {}
        }
    }

    fn context(&self, focused: bool) -> ComponentContext {
        ComponentContext::new(focused).with_now(self.clock.now())
    }

    // ---- drawing ----

    /// Paint the whole shell, bottom layer first.
    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        let ctx = self.context(false);
        frame.render_widget(Clear, area);
        frame.fill_style(
            area,
            Style::default()
                .bg(theme::desktop_bg())
                .fg(theme::desktop_fg()),
        );
        self.refresh_regions();
        let desktop = self.desktop_area().intersection(area);
        let desktop_focused = self.overlays.focus() == FocusTarget::Desktop;
        match self.mode {
            PresentationMode::Expanded => {
                self.desktop_icons.render(frame, desktop, desktop_focused);
                self.daily_widget.render(frame, desktop);
            }
            PresentationMode::Compact => {
                self.compact_home.render(frame, desktop, desktop_focused);
            }
        }

        for id in self.registry.draw_order() {
            self.render_panel(frame, id, &ctx);
        }

        let panels: Vec<(PanelId, String)> = self
            .registry
            .list_open()
            .iter()
            .map(|panel| (panel.id(), self.title_for(panel.kind())))
            .collect();
        let focus = self.overlays.focus();
        let state = TaskbarState {
            focused: match focus {
                FocusTarget::Panel(id) => Some(id),
                _ => None,
            },
            start_open: self.overlays.is_open(OverlayId::StartMenu),
            clock_open: self.overlays.is_open(OverlayId::ClockPopup),
            start_focused: focus == FocusTarget::StartButton,
            clock_focused: focus == FocusTarget::ClockButton,
        };
        let taskbar_area = self.taskbar_area().intersection(area);
        self.taskbar.render(frame, taskbar_area, &panels, state);

        if state.start_open {
            let anchor = self.taskbar.start_rect().unwrap_or(taskbar_area);
            self.start_menu.render(frame, anchor, desktop, focus);
        } else {
            self.start_menu.clear_hits();
        }
        if state.clock_open {
            let anchor = self.taskbar.clock_rect().unwrap_or(taskbar_area);
            self.clock_popup.render(frame, anchor, desktop, focus);
        } else {
            self.clock_popup.clear_hits();
        }

        self.toast.render(frame, desktop);
        self.hearts.render(frame, area, self.now);

        if self.overlays.is_locked() {
            self.lock_screen.render(frame, area, &ctx);
        }
        if self.overlays.debug_log_visible() {
            let width = area.width.saturating_sub(4).max(area.width.min(20));
            let height = area.height.saturating_sub(4).max(area.height.min(6));
            let rect = centered(area, width, height);
            self.debug_log.render(frame, rect, &ctx.with_focus(true));
        }
        if let Some(boot) = self.boot.as_mut()
            && boot.is_visible()
        {
            boot.render(frame, area, &ctx);
        }
    }

    fn render_panel(&mut self, frame: &mut UiFrame<'_>, id: PanelId, ctx: &ComponentContext) {
        let Some(panel) = self.registry.get(id) else {
            return;
        };
        let Some(rect) = self.regions.get(id) else {
            return;
        };
        let title = self.title_for(panel.kind());
        let faded = panel.visual.opacity < 1.0;
        let focused = self.overlays.focus() == FocusTarget::Panel(id);

        self.decorator.render_frame(frame, rect, &title, focused, faded);
        let inner = self.decorator.content_rect(rect);
        frame.render_widget(Clear, inner);
        frame.fill_style(
            inner,
            Style::default().bg(theme::panel_bg()).fg(theme::panel_fg()),
        );
        let ctx = ctx.with_focus(focused);
        let rendered = {
            let mut content_frame = frame.narrowed(inner);
            self.guarded(id, |content| content.render(&mut content_frame, inner, &ctx))
                .is_some()
        };
        // a panicking widget is replaced; draw the placeholder this frame
        if !rendered && let Some(content) = self.contents.get_mut(&id) {
            let mut content_frame = frame.narrowed(inner);
            content.render(&mut content_frame, inner, &ctx);
        }
        if faded {
            frame.dim(rect);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
