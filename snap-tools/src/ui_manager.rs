//! Menu bar, demo, settings and about windows of Snap Tools

use crate::config::{AppConfig, Theme};
use crate::frame_stats::FrameTimeHistory;
use dear_imgui_rs::{Condition, Ui};
use snap_platform::RendererType;
use std::fmt::Write as _;
use tracing::{debug, info};

/// Widget values of the demo window
#[derive(Clone, Debug, PartialEq)]
pub struct DemoState {
    pub slider_value: f32,
    pub clear_color: [f32; 3],
    pub counter: i32,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            slider_value: 0.0,
            clear_color: [0.45, 0.55, 0.60],
            counter: 0,
        }
    }
}

/// Widget values of the settings window.
///
/// Edits are kept here only; nothing is pushed to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsState {
    pub vsync: bool,
    /// `1..=16`
    pub msaa_samples: i32,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            vsync: true,
            msaa_samples: 4,
        }
    }
}

/// What the user asked for during one rendered frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiActions {
    /// File → Exit, or [`UiManager::request_exit`]
    pub exit_requested: bool,
    /// Help → About was chosen
    pub about_opened: bool,
    /// "Apply Settings" was pressed
    pub apply_settings: bool,
}

/// Owns all UI state and draws it once per frame
pub struct UiManager {
    renderer: RendererType,
    theme: Theme,
    theme_applied: bool,
    initialized: bool,
    show_demo: bool,
    show_settings: bool,
    show_about: bool,
    exit_pending: bool,
    history: FrameTimeHistory,
    demo: DemoState,
    settings: SettingsState,
    counter_text: String,
    stats_text: String,
    renderer_text: String,
}

impl UiManager {
    pub fn new(renderer: RendererType) -> Self {
        let mut manager = Self {
            renderer,
            theme: Theme::default(),
            theme_applied: false,
            initialized: false,
            show_demo: true,
            show_settings: false,
            show_about: false,
            exit_pending: false,
            history: FrameTimeHistory::new(),
            demo: DemoState::default(),
            settings: SettingsState::default(),
            counter_text: String::new(),
            stats_text: String::new(),
            renderer_text: format!("Renderer: {renderer}"),
        };
        manager.refresh_counter_text();
        manager.refresh_stats_text();
        manager
    }

    /// Create a manager seeded from the application configuration
    pub fn from_config(renderer: RendererType, config: &AppConfig) -> Self {
        let mut manager = Self::new(renderer).with_theme(config.theme);
        manager.settings = SettingsState {
            vsync: config.window.vsync,
            msaa_samples: config.msaa_samples.clamp(1, 16),
        };
        manager
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self.theme_applied = false;
        self
    }

    pub fn initialize(&mut self) {
        if !self.initialized {
            self.initialized = true;
            info!("UI manager initialized");
        }
    }

    pub fn shutdown(&mut self) {
        if self.initialized {
            self.initialized = false;
            info!("UI manager shut down");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Feed the framerate of the last frame into the rolling statistics
    pub fn update(&mut self, framerate: f32) {
        if self.history.record_framerate(framerate) {
            self.refresh_stats_text();
        }
    }

    /// Make the next [`render`](Self::render) report `exit_requested`
    pub fn request_exit(&mut self) {
        self.exit_pending = true;
    }

    /// Draw every visible window for the current frame
    pub fn render(&mut self, ui: &Ui) -> UiActions {
        if !self.theme_applied {
            match self.theme {
                Theme::Dark => ui.style_colors_dark(),
                Theme::Light => ui.style_colors_light(),
                Theme::Classic => ui.style_colors_classic(),
            }
            self.theme_applied = true;
            debug!("Applied {:?} theme", self.theme);
        }

        let mut actions = UiActions::default();
        self.draw_menu_bar(ui, &mut actions);
        if self.show_demo {
            self.draw_demo_window(ui);
        }
        if self.show_settings {
            self.draw_settings_window(ui, &mut actions);
        }
        if self.show_about {
            self.draw_about_window(ui);
        }

        if std::mem::take(&mut self.exit_pending) {
            actions.exit_requested = true;
        }
        if actions.apply_settings {
            info!(
                "Apply Settings requested (vsync: {}, MSAA samples: {})",
                self.settings.vsync, self.settings.msaa_samples
            );
        }
        actions
    }

    fn draw_menu_bar(&mut self, ui: &Ui, actions: &mut UiActions) {
        let Some(_menu_bar) = ui.begin_main_menu_bar() else {
            return;
        };

        ui.menu("File", || {
            if ui.menu_item("Exit") {
                self.exit_pending = true;
            }
        });
        ui.menu("View", || {
            ui.menu_item_toggle("Demo Window", None::<&str>, &mut self.show_demo, true);
            ui.menu_item_toggle("Settings", None::<&str>, &mut self.show_settings, true);
        });
        ui.menu("Help", || {
            if ui.menu_item("About") {
                self.show_about = true;
                actions.about_opened = true;
            }
        });
    }

    fn draw_demo_window(&mut self, ui: &Ui) {
        let mut clicked = false;
        let demo = &mut self.demo;
        let counter_text = &self.counter_text;
        let stats_text = &self.stats_text;
        let renderer_text = &self.renderer_text;

        ui.window("Snap Tools Demo")
            .size([420.0, 320.0], Condition::FirstUseEver)
            .build(|| {
                ui.text("Cross-Platform ImGui Application");
                ui.separator();

                ui.text("This is a cross-platform application using:");
                ui.bullet_text("macOS: Cocoa + Metal");
                ui.bullet_text("Windows: Win32 + DirectX11");
                ui.bullet_text("Linux: X11/Wayland + OpenGL3");
                ui.text(renderer_text);

                ui.separator();

                ui.slider_f32("Float Value", &mut demo.slider_value, 0.0, 1.0);
                ui.color_edit3("Clear Color", &mut demo.clear_color);

                if ui.button("Click Me!") {
                    clicked = true;
                }
                ui.same_line();
                ui.text(counter_text);

                ui.separator();
                ui.text(stats_text);
            });

        if clicked {
            self.demo.counter += 1;
            self.refresh_counter_text();
        }
    }

    fn draw_settings_window(&mut self, ui: &Ui, actions: &mut UiActions) {
        let settings = &mut self.settings;
        let mut close = false;

        ui.window("Settings")
            .size([320.0, 180.0], Condition::FirstUseEver)
            .build(|| {
                ui.text("Application Settings");
                ui.separator();

                ui.checkbox("VSync", &mut settings.vsync);
                ui.slider_i32("MSAA Samples", &mut settings.msaa_samples, 1, 16);
                ui.separator();
                if ui.button("Apply Settings") {
                    actions.apply_settings = true;
                }
                ui.same_line();
                if ui.button("Close") {
                    close = true;
                }
            });

        if close {
            self.show_settings = false;
        }
    }

    fn draw_about_window(&mut self, ui: &Ui) {
        let renderer_text = &self.renderer_text;
        let mut close = false;

        ui.window("About Snap Tools")
            .size([300.0, 140.0], Condition::FirstUseEver)
            .build(|| {
                ui.text("Snap Tools");
                ui.text(concat!("Version ", env!("CARGO_PKG_VERSION")));
                ui.text(renderer_text);
                ui.separator();
                ui.text_disabled("Built on Dear ImGui");
                if ui.button("Close") {
                    close = true;
                }
            });

        if close {
            self.show_about = false;
        }
    }

    fn refresh_counter_text(&mut self) {
        self.counter_text.clear();
        let _ = write!(self.counter_text, "Counter = {}", self.demo.counter);
    }

    fn refresh_stats_text(&mut self) {
        self.stats_text.clear();
        let _ = write!(
            self.stats_text,
            "Application average {:.3} ms/frame ({:.1} FPS)",
            self.history.average_ms(),
            self.history.average_fps()
        );
    }

    pub fn renderer(&self) -> RendererType {
        self.renderer
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn show_demo(&self) -> bool {
        self.show_demo
    }

    pub fn set_show_demo(&mut self, show: bool) {
        self.show_demo = show;
    }

    pub fn show_settings(&self) -> bool {
        self.show_settings
    }

    pub fn set_show_settings(&mut self, show: bool) {
        self.show_settings = show;
    }

    pub fn show_about(&self) -> bool {
        self.show_about
    }

    pub fn set_show_about(&mut self, show: bool) {
        self.show_about = show;
    }

    /// Mean frame time in milliseconds over the recorded history
    pub fn avg_frame_time(&self) -> f32 {
        self.history.average_ms()
    }

    pub fn frame_history(&self) -> &FrameTimeHistory {
        &self.history
    }

    /// Cached "Application average ..." line shown in the demo window
    pub fn stats_text(&self) -> &str {
        &self.stats_text
    }

    pub fn counter_text(&self) -> &str {
        &self.counter_text
    }

    pub fn demo(&self) -> &DemoState {
        &self.demo
    }

    pub fn demo_mut(&mut self) -> &mut DemoState {
        &mut self.demo
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsState {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_guard;
    use approx::assert_relative_eq;
    use dear_imgui_rs::Context;

    fn context() -> Context {
        let mut ctx = Context::try_create().expect("create context");
        {
            let io = ctx.io_mut();
            io.set_display_size([800.0, 600.0]);
            io.set_delta_time(1.0 / 60.0);
        }
        let _ = ctx.font_atlas_mut().build();
        let _ = ctx.set_ini_filename::<std::path::PathBuf>(None);
        ctx
    }

    fn frame(ctx: &mut Context, manager: &mut UiManager) -> UiActions {
        let ui = ctx.frame();
        let actions = manager.render(ui);
        ctx.render();
        actions
    }

    #[test]
    fn new_manager_has_documented_defaults() {
        let manager = UiManager::new(RendererType::Headless);
        assert!(!manager.is_initialized());
        assert!(manager.show_demo());
        assert!(!manager.show_settings());
        assert!(!manager.show_about());
        assert_relative_eq!(manager.avg_frame_time(), 16.666_666, epsilon = 1e-4);
        assert_eq!(manager.counter_text(), "Counter = 0");
        assert_eq!(
            manager.stats_text(),
            "Application average 16.667 ms/frame (60.0 FPS)"
        );
    }

    #[test]
    fn from_config_seeds_settings_and_theme() {
        let config = AppConfig::default()
            .with_theme(Theme::Light)
            .with_msaa_samples(8);
        let manager = UiManager::from_config(RendererType::Headless, &config);
        assert_eq!(manager.theme(), Theme::Light);
        assert_eq!(manager.settings().msaa_samples, 8);
        assert!(manager.settings().vsync);
    }

    #[test]
    fn lifecycle_is_idempotent() {
        let mut manager = UiManager::new(RendererType::Headless);
        manager.initialize();
        manager.initialize();
        assert!(manager.is_initialized());
        manager.shutdown();
        manager.shutdown();
        assert!(!manager.is_initialized());
    }

    #[test]
    fn update_tracks_constant_framerate() {
        let mut manager = UiManager::new(RendererType::Headless);
        for _ in 0..200 {
            manager.update(125.0);
        }
        assert_relative_eq!(manager.avg_frame_time(), 8.0, epsilon = 1e-4);
        assert_eq!(
            manager.stats_text(),
            "Application average 8.000 ms/frame (125.0 FPS)"
        );

        manager.update(0.0);
        manager.update(f32::NAN);
        assert_relative_eq!(manager.avg_frame_time(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn first_update_averages_over_the_whole_window() {
        let mut manager = UiManager::new(RendererType::Headless);
        manager.update(100.0);
        assert_relative_eq!(manager.avg_frame_time(), 10.0 / 120.0, epsilon = 1e-6);
        assert_eq!(
            manager.stats_text(),
            "Application average 0.083 ms/frame (12000.0 FPS)"
        );
    }

    #[test]
    fn renders_every_window_without_actions() {
        let _guard = test_guard();
        let mut ctx = context();
        let mut manager = UiManager::new(RendererType::Headless);
        manager.initialize();
        manager.set_show_settings(true);
        manager.set_show_about(true);

        for _ in 0..3 {
            let actions = frame(&mut ctx, &mut manager);
            assert_eq!(actions, UiActions::default());
        }
        assert!(ctx.draw_data().is_some_and(|d| d.draw_lists_count() > 0));
    }

    #[test]
    fn request_exit_is_reported_once() {
        let _guard = test_guard();
        let mut ctx = context();
        let mut manager = UiManager::new(RendererType::Headless);

        manager.request_exit();
        assert!(frame(&mut ctx, &mut manager).exit_requested);
        assert!(!frame(&mut ctx, &mut manager).exit_requested);
    }

    #[test]
    fn hiding_and_showing_demo_keeps_widget_state() {
        let _guard = test_guard();
        let mut ctx = context();
        let mut manager = UiManager::new(RendererType::Headless);
        manager.demo_mut().slider_value = 0.75;
        manager.demo_mut().clear_color = [0.1, 0.2, 0.3];
        manager.settings_mut().msaa_samples = 16;

        frame(&mut ctx, &mut manager);
        manager.set_show_demo(false);
        frame(&mut ctx, &mut manager);
        frame(&mut ctx, &mut manager);
        manager.set_show_demo(true);
        frame(&mut ctx, &mut manager);

        assert_eq!(manager.demo().slider_value, 0.75);
        assert_eq!(manager.demo().clear_color, [0.1, 0.2, 0.3]);
        assert_eq!(manager.settings().msaa_samples, 16);
    }
}
