use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use navigation::{
    CancellationToken, ControllerHandle, NavigationConfig, NavigationError, NavigationRequest,
    Navigator, Presentation, ResourceLoader, TransitionEvent, TransitionKind, TransitionSpec,
    ViewDescriptor,
};
use serde::{Deserialize, Serialize};
use shared::domain::SessionUser;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::AppConfig;
use crate::controller::events::{StatusBanner, StatusSeverity, UiError, UiErrorContext, UiEvent};
use crate::ui::screens::{login::LoginScreen, NavIntent, Screen, ScreenContext};
use crate::ui::{theme, views, window::EguiWindow};

pub const SETTINGS_STORAGE_KEY: &str = "studentnest.settings";

fn ui_in_rect(ui: &mut egui::Ui, rect: egui::Rect, add: impl FnOnce(&mut egui::Ui)) {
    let mut child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(rect)
            .layout(egui::Layout::top_down(egui::Align::Min)),
    );
    child.set_clip_rect(rect.intersect(ui.clip_rect()));
    add(&mut child);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedDesktopSettings {
    pub last_username: String,
    pub dark_mode: bool,
}

pub struct StudentNestApp {
    navigator: Navigator<dyn Screen>,
    window_open: Rc<Cell<bool>>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    user: Option<SessionUser>,
    settings: PersistedDesktopSettings,
    status: Option<StatusBanner>,
    intents: Vec<NavIntent>,
    pending_navigation: Option<CancellationToken>,
    /// Username for the login view once it is swapped in.
    pending_prefill: Option<String>,
    theme_dirty: bool,
}

impl StudentNestApp {
    pub fn new(
        ctx: &egui::Context,
        config: &AppConfig,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: PersistedDesktopSettings,
    ) -> Self {
        let mut loader = ResourceLoader::new().with_stylesheet_dir(config.stylesheet_dir());
        views::register_screens(&mut loader);
        let mut navigator = Navigator::new(
            loader,
            NavigationConfig {
                max_transition: config.max_transition,
                history_limit: config.history_limit,
            },
        );

        let login = views::login();
        let (window, window_open) = EguiWindow::new(ctx.clone(), (login.width(), login.height()));
        navigator.set_primary_window(Box::new(window));

        let mut app = Self {
            navigator,
            window_open,
            cmd_tx,
            ui_rx,
            user: None,
            settings,
            status: None,
            intents: Vec::new(),
            pending_navigation: None,
            pending_prefill: None,
            theme_dirty: true,
        };
        let request = NavigationRequest::to(login).transition(TransitionSpec::none());
        app.go(request, Instant::now());
        app
    }

    fn go(
        &mut self,
        request: NavigationRequest,
        now: Instant,
    ) -> Option<ControllerHandle<dyn Screen>> {
        match self.navigator.navigate(request.clone(), now) {
            Ok(handle) => Some(handle),
            Err(NavigationError::Busy) => {
                tracing::debug!(view_id = %request.descriptor().view_id(), "deferring navigation until the transition ends");
                self.pending_navigation = Some(self.navigator.defer(request));
                None
            }
            Err(err) => {
                tracing::warn!(view_id = %request.descriptor().view_id(), error = %err, "navigation failed");
                self.report_navigation_error(&err);
                None
            }
        }
    }

    fn report_navigation_error(&mut self, err: &NavigationError) {
        let err = UiError::from_message(UiErrorContext::Navigation, err.user_message());
        self.status = Some(StatusBanner::from_ui_error(&err));
    }

    /// The dashboard for the signed-in user, or the login view.
    fn home(&self) -> ViewDescriptor {
        match &self.user {
            Some(user) => views::dashboard_for(user.role),
            None => views::login(),
        }
    }

    fn process_ui_events(&mut self, now: Instant) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.dispatch_to_screen(&event);
            match event {
                UiEvent::BackendReady => tracing::info!("backend ready"),
                UiEvent::Info(message) => self.status = Some(StatusBanner::info(message)),
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
                    self.status = Some(StatusBanner::from_ui_error(&err));
                }
                UiEvent::Authenticated(user) => {
                    tracing::info!(username = %user.username, role = %user.role, "signed in");
                    let dashboard = views::dashboard_for(user.role);
                    self.settings.last_username = user.username.clone();
                    self.user = Some(user);
                    self.status = None;
                    let request = NavigationRequest::to(dashboard)
                        .transition(TransitionSpec::of(TransitionKind::Fade));
                    self.go(request, now);
                }
                UiEvent::Registered { username } => {
                    self.settings.last_username = username.clone();
                    self.status = Some(StatusBanner::info(
                        "Registration successful! Please log in.",
                    ));
                    let request = NavigationRequest::to(views::login())
                        .transition(TransitionSpec::of(TransitionKind::SlideRight))
                        .without_history();
                    match self.go(request, now) {
                        Some(handle) => prefill_login(&handle, &username),
                        None => self.pending_prefill = Some(username),
                    }
                }
                _ => {}
            }
        }
    }

    fn dispatch_to_screen(&mut self, event: &UiEvent) {
        let Some(root) = self.navigator.window().content() else {
            return;
        };
        let controller = root.controller().clone();
        let Some(mut screen) = controller.try_borrow_mut() else {
            tracing::debug!("screen busy; event not delivered");
            return;
        };
        let mut ctx = ScreenContext::new(
            self.user.as_ref(),
            self.navigator.session(),
            &self.settings.last_username,
            &self.cmd_tx,
            &mut self.status,
            &mut self.intents,
        );
        screen.on_event(event, &mut ctx);
    }

    fn handle_transition_events(&mut self, events: Vec<TransitionEvent>) {
        for event in events {
            match event {
                TransitionEvent::Swapped { view_id } => {
                    tracing::debug!(view_id = %view_id, "view swapped");
                    self.theme_dirty = true;
                    if view_id.as_str() == views::LOGIN {
                        if let Some(username) = self.pending_prefill.take() {
                            if let Some(root) = self.navigator.window().content() {
                                prefill_login(root.controller(), &username);
                            }
                        }
                    }
                }
                TransitionEvent::Completed { view_id } => {
                    tracing::debug!(view_id = %view_id, "transition completed");
                }
                TransitionEvent::Aborted { view_id, reason } => {
                    if !self.window_open.get() {
                        continue;
                    }
                    tracing::warn!(view_id = %view_id, reason = %reason, "transition aborted");
                    self.report_navigation_error(&NavigationError::Aborted(reason));
                }
            }
        }
    }

    fn apply_intents(&mut self, now: Instant) {
        for intent in std::mem::take(&mut self.intents) {
            self.apply_intent(intent, now);
        }
    }

    fn apply_intent(&mut self, intent: NavIntent, now: Instant) {
        match intent {
            NavIntent::Open {
                descriptor,
                transition,
                back_to,
            } => {
                let mut request = NavigationRequest::to(descriptor).transition(transition);
                if let Some(target) = back_to {
                    request = request.back_to(target);
                }
                self.go(request, now);
            }
            NavIntent::Return { target, transition } => {
                let descriptor = target
                    .as_ref()
                    .and_then(views::resolve)
                    .unwrap_or_else(|| self.home());
                self.go(NavigationRequest::to(descriptor).transition(transition), now);
            }
            NavIntent::Back { transition } => match self.navigator.back(transition, now) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    let request = NavigationRequest::to(self.home())
                        .transition(transition)
                        .without_history();
                    self.go(request, now);
                }
                Err(NavigationError::Busy) => {
                    tracing::debug!("back ignored while a transition is in flight");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "back navigation failed");
                    self.report_navigation_error(&err);
                }
            },
            NavIntent::Logout => self.logout(now),
        }
    }

    fn logout(&mut self, now: Instant) {
        if let Some(token) = self.pending_navigation.take() {
            token.cancel();
        }
        self.pending_prefill = None;
        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "signed out");
        }
        self.navigator.reset_session();
        let request = NavigationRequest::to(views::login())
            .transition(TransitionSpec::of(TransitionKind::SlideRight))
            .without_history();
        self.go(request, now);
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if !self.theme_dirty {
            return;
        }
        let sheet = theme::merge_sheets(self.navigator.window().stylesheets());
        ctx.set_visuals(theme::visuals_for(&sheet, self.settings.dark_mode));
        self.theme_dirty = false;
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &self.status {
                Some(banner) => {
                    let color = match banner.severity {
                        StatusSeverity::Info => ui.visuals().text_color(),
                        StatusSeverity::Error => ui.visuals().error_fg_color,
                    };
                    ui.colored_label(color, &banner.message);
                }
                None => {
                    ui.weak("Ready");
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.checkbox(&mut self.settings.dark_mode, "Dark mode").changed() {
                    self.theme_dirty = true;
                }
                if self.status.is_some() && ui.small_button("Dismiss").clicked() {
                    self.status = None;
                }
            });
        });
    }

    fn show_root(&mut self, ui: &mut egui::Ui) {
        let Some(root) = self.navigator.window().content() else {
            ui.centered_and_justified(|ui| ui.spinner());
            return;
        };
        let presentation = root.presentation();
        let interactive = root.is_interactive();
        let controller = root.controller().clone();
        let Some(mut screen) = controller.try_borrow_mut() else {
            return;
        };

        let rect = offset_rect(ui.max_rect(), presentation);
        let mut ctx = ScreenContext::new(
            self.user.as_ref(),
            self.navigator.session(),
            &self.settings.last_username,
            &self.cmd_tx,
            &mut self.status,
            &mut self.intents,
        );
        ui_in_rect(ui, rect, |ui| {
            ui.set_opacity(presentation.opacity);
            if !interactive {
                ui.disable();
            }
            screen.show(ui, &mut ctx);
        });
    }
}

fn offset_rect(rect: egui::Rect, presentation: Presentation) -> egui::Rect {
    let (dx, dy) = presentation.offset;
    rect.translate(egui::vec2(dx, dy))
}

impl eframe::App for StudentNestApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|input| input.viewport().close_requested()) {
            self.window_open.set(false);
        }

        let now = Instant::now();
        self.process_ui_events(now);
        let events = self.navigator.tick(now);
        self.handle_transition_events(events);
        self.apply_theme_if_needed(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.show_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.show_root(ui));

        self.apply_intents(now);

        if self.navigator.is_busy() || self.navigator.has_deferred() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

fn prefill_login(handle: &ControllerHandle<dyn Screen>, username: &str) {
    if let Err(err) = handle.with(|login: &mut LoginScreen| login.prefill(username)) {
        tracing::warn!(error = %err, "login view did not accept the username");
    }
}
