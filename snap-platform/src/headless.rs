//! Window-less backend driving a real Dear ImGui context.
//!
//! Frames are built and finalized exactly like on a native backend, but the
//! draw data is only inspected, never rasterized. A [`HeadlessProbe`] shares
//! counters with the backend so they stay observable after the backend has
//! been boxed and handed to an application.

use crate::config::{RendererType, WindowConfig};
use crate::error::{PlatformError, PlatformResult};
use crate::frame::FramePhase;
use crate::{NativeRenderer, Platform};
use dear_imgui_rs::{ConfigFlags, Context, Ui};
use raw_window_handle::RawWindowHandle;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct ProbeState {
    polls: Cell<u64>,
    clears: Cell<u64>,
    frames_presented: Cell<u64>,
    last_clear_color: Cell<[f32; 4]>,
    last_draw_list_count: Cell<usize>,
    live: Cell<bool>,
    pending_close: Cell<bool>,
    close_after_polls: Cell<Option<u64>>,
    fail_initialize: Cell<bool>,
    fail_present_at: Cell<Option<u64>>,
}

/// Shared view into a [`HeadlessPlatform`]'s activity
#[derive(Clone, Debug, Default)]
pub struct HeadlessProbe {
    state: Rc<ProbeState>,
}

impl HeadlessProbe {
    /// Number of `poll_events` calls made while initialized
    pub fn poll_count(&self) -> u64 {
        self.state.polls.get()
    }

    pub fn clear_count(&self) -> u64 {
        self.state.clears.get()
    }

    pub fn frames_presented(&self) -> u64 {
        self.state.frames_presented.get()
    }

    pub fn last_clear_color(&self) -> [f32; 4] {
        self.state.last_clear_color.get()
    }

    /// Draw lists contained in the most recently presented frame
    pub fn last_draw_list_count(&self) -> usize {
        self.state.last_draw_list_count.get()
    }

    /// Whether the backend currently holds a Dear ImGui context
    pub fn is_live(&self) -> bool {
        self.state.live.get()
    }

    /// Queue a close request; it is delivered by the next `poll_events`
    pub fn request_close(&self) {
        self.state.pending_close.set(true);
    }

    /// Deliver a close request once `polls` polls have happened
    pub fn close_after_polls(&self, polls: u64) {
        self.state.close_after_polls.set(Some(polls));
    }

    /// Make the next `initialize` fail after its context was created
    pub fn fail_next_initialize(&self) {
        self.state.fail_initialize.set(true);
    }

    /// Make the `frame`-th `render_frame` call (1-based) return a surface error
    pub fn fail_present_at(&self, frame: u64) {
        self.state.fail_present_at.set(Some(frame));
    }
}

/// Backend without window or GPU
pub struct HeadlessPlatform {
    context: Option<Context>,
    probe: HeadlessProbe,
    phase: FramePhase,
    size: (u32, u32),
    title: String,
    frame_time: Duration,
    should_close: bool,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            context: None,
            probe: HeadlessProbe::default(),
            phase: FramePhase::Idle,
            size: (0, 0),
            title: String::new(),
            frame_time: Duration::from_secs_f64(1.0 / 60.0),
            should_close: false,
        }
    }

    /// Fixed delta time fed to Dear ImGui for every frame
    pub fn with_frame_time(mut self, frame_time: Duration) -> Self {
        if !frame_time.is_zero() {
            self.frame_time = frame_time;
        }
        self
    }

    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn create_context(&self, config: &WindowConfig) -> PlatformResult<Context> {
        let mut context = Context::try_create()?;
        context.set_ini_filename(None::<String>)?;
        {
            let io = context.io_mut();
            io.set_display_size([config.width as f32, config.height as f32]);
            io.set_delta_time(self.frame_time.as_secs_f32());
            let mut flags = io.config_flags();
            flags.insert(ConfigFlags::NAV_ENABLE_KEYBOARD | ConfigFlags::NAV_ENABLE_GAMEPAD);
            io.set_config_flags(flags);
        }
        let _ = context.font_atlas_mut().build();
        Ok(context)
    }
}

impl Platform for HeadlessPlatform {
    fn initialize(&mut self, config: &WindowConfig) -> PlatformResult<()> {
        if self.context.is_some() {
            return Err(PlatformError::AlreadyInitialized);
        }
        config.validate()?;

        let context = self.create_context(config)?;
        if self.probe.state.fail_initialize.replace(false) {
            drop(context);
            return Err(PlatformError::ContextCreation(
                "headless initialization failure requested".to_string(),
            ));
        }

        self.context = Some(context);
        self.size = (config.width, config.height);
        self.title = config.title.clone();
        self.phase = FramePhase::Idle;
        self.probe.state.live.set(true);
        info!(
            "Headless platform initialized ({}x{})",
            config.width, config.height
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(context) = self.context.take() {
            drop(context);
            self.phase = FramePhase::Idle;
            self.probe.state.live.set(false);
            info!("Headless platform shut down");
        }
    }

    fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn poll_events(&mut self) {
        if self.context.is_none() {
            return;
        }
        let state = &self.probe.state;
        let polls = state.polls.get() + 1;
        state.polls.set(polls);

        let scripted = state.close_after_polls.get().is_some_and(|n| polls >= n);
        if state.pending_close.replace(false) || scripted {
            if !self.should_close {
                debug!("Close request delivered after {polls} polls");
            }
            self.should_close = true;
        }
    }

    fn set_window_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn window_size(&self) -> Option<(u32, u32)> {
        self.context.as_ref().map(|_| self.size)
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(context) = self.context.as_mut() {
            context
                .io_mut()
                .set_display_size([width as f32, height as f32]);
            self.size = (width, height);
        }
    }

    fn clear_background(&mut self, color: [f32; 4]) {
        if self.context.is_none() {
            return;
        }
        let state = &self.probe.state;
        state.clears.set(state.clears.get() + 1);
        state.last_clear_color.set(color);
    }

    fn new_frame(&mut self) -> PlatformResult<&mut Ui> {
        let context = self.context.as_mut().ok_or(PlatformError::NotInitialized)?;
        self.phase.begin()?;
        context
            .io_mut()
            .set_delta_time(self.frame_time.as_secs_f32());
        Ok(context.frame())
    }

    fn imgui_render(&mut self) -> PlatformResult<()> {
        let context = self.context.as_mut().ok_or(PlatformError::NotInitialized)?;
        self.phase.finalize()?;
        context.render();
        Ok(())
    }

    fn render_frame(&mut self) -> PlatformResult<()> {
        let context = self.context.as_ref().ok_or(PlatformError::NotInitialized)?;
        self.phase.present()?;
        let state = &self.probe.state;
        let attempt = state.frames_presented.get() + 1;
        if state.fail_present_at.get() == Some(attempt) {
            state.fail_present_at.set(None);
            return Err(PlatformError::Surface(format!(
                "headless present failure requested at frame {attempt}"
            )));
        }

        let draw_lists = context
            .draw_data()
            .map(|draw_data| draw_data.draw_lists_count())
            .unwrap_or(0);
        state.last_draw_list_count.set(draw_lists);
        state.frames_presented.set(state.frames_presented.get() + 1);
        Ok(())
    }

    fn renderer_type(&self) -> RendererType {
        RendererType::Headless
    }

    fn framerate(&self) -> f32 {
        self.context
            .as_ref()
            .map(|context| context.io().framerate())
            .unwrap_or(0.0)
    }

    fn native_window(&self) -> Option<RawWindowHandle> {
        None
    }

    fn native_renderer(&self) -> Option<NativeRenderer<'_>> {
        self.context.as_ref().map(NativeRenderer::Headless)
    }
}

impl Drop for HeadlessPlatform {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_guard;

    fn initialized() -> (HeadlessPlatform, HeadlessProbe) {
        let mut platform = HeadlessPlatform::new();
        let probe = platform.probe();
        platform
            .initialize(&WindowConfig::default())
            .expect("headless initialize");
        (platform, probe)
    }

    #[test]
    fn initialize_then_shutdown_releases_context() {
        let _guard = test_guard();
        let (mut platform, probe) = initialized();
        assert!(probe.is_live());
        assert_eq!(platform.window_size(), Some((1200, 800)));

        platform.shutdown();
        assert!(!probe.is_live());
        assert!(!platform.is_initialized());
        assert_eq!(platform.window_size(), None);

        // A fresh context can be created once the previous one is gone
        let mut other = HeadlessPlatform::new();
        other.initialize(&WindowConfig::default()).unwrap();
    }

    #[test]
    fn shutdown_is_idempotent() {
        let _guard = test_guard();
        let (mut platform, probe) = initialized();
        platform.shutdown();
        platform.shutdown();
        assert!(!probe.is_live());

        let mut never = HeadlessPlatform::new();
        never.shutdown();
    }

    #[test]
    fn second_initialize_is_rejected() {
        let _guard = test_guard();
        let (mut platform, _probe) = initialized();
        assert!(matches!(
            platform.initialize(&WindowConfig::default()),
            Err(PlatformError::AlreadyInitialized)
        ));
    }

    #[test]
    fn failed_initialize_releases_partial_state() {
        let _guard = test_guard();
        let mut platform = HeadlessPlatform::new();
        let probe = platform.probe();
        probe.fail_next_initialize();

        assert!(platform.initialize(&WindowConfig::default()).is_err());
        assert!(!platform.is_initialized());
        assert!(!probe.is_live());

        // The context created during the failed attempt was dropped
        platform.initialize(&WindowConfig::default()).unwrap();
        assert!(probe.is_live());
    }

    #[test]
    fn invalid_config_is_rejected_before_any_allocation() {
        let _guard = test_guard();
        let mut platform = HeadlessPlatform::new();
        let cfg = WindowConfig::default().with_size(0, 0);
        assert!(matches!(
            platform.initialize(&cfg),
            Err(PlatformError::InvalidConfig(_))
        ));
        assert!(!platform.probe().is_live());
    }

    #[test]
    fn frame_calls_require_initialization() {
        let _guard = test_guard();
        let mut platform = HeadlessPlatform::new();
        assert!(matches!(
            platform.new_frame(),
            Err(PlatformError::NotInitialized)
        ));
        assert!(matches!(
            platform.imgui_render(),
            Err(PlatformError::NotInitialized)
        ));
        assert!(matches!(
            platform.render_frame(),
            Err(PlatformError::NotInitialized)
        ));
        assert_eq!(platform.framerate(), 0.0);
        platform.poll_events();
        assert_eq!(platform.probe().poll_count(), 0);
    }

    #[test]
    fn full_frame_produces_draw_data() {
        let _guard = test_guard();
        let (mut platform, probe) = initialized();

        platform.poll_events();
        platform.clear_background([0.45, 0.55, 0.60, 1.0]);
        let ui = platform.new_frame().unwrap();
        ui.window("Probe").build(|| ui.text("headless"));
        platform.imgui_render().unwrap();
        platform.render_frame().unwrap();

        assert_eq!(probe.frames_presented(), 1);
        assert_eq!(probe.clear_count(), 1);
        assert_eq!(probe.last_clear_color(), [0.45, 0.55, 0.60, 1.0]);
        assert!(probe.last_draw_list_count() >= 1);
        assert!(platform.framerate() > 0.0);
    }

    #[test]
    fn requested_present_failure_hits_one_frame() {
        let _guard = test_guard();
        let (mut platform, probe) = initialized();
        probe.fail_present_at(2);

        let mut results = Vec::new();
        for _ in 0..3 {
            let ui = platform.new_frame().unwrap();
            ui.text("frame");
            platform.imgui_render().unwrap();
            results.push(platform.render_frame());
        }

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PlatformError::Surface(_))));
        assert!(results[2].is_ok());
        assert_eq!(probe.frames_presented(), 2);
    }

    #[test]
    fn close_request_is_sticky_once_delivered() {
        let _guard = test_guard();
        let (mut platform, probe) = initialized();

        probe.request_close();
        assert!(!platform.should_close());
        platform.poll_events();
        assert!(platform.should_close());
        for _ in 0..3 {
            platform.poll_events();
            assert!(platform.should_close());
        }
    }

    #[test]
    fn scripted_close_fires_on_requested_poll() {
        let _guard = test_guard();
        let (mut platform, probe) = initialized();
        probe.close_after_polls(3);

        platform.poll_events();
        platform.poll_events();
        assert!(!platform.should_close());
        platform.poll_events();
        assert!(platform.should_close());
    }

    #[test]
    fn window_management_updates_display() {
        let _guard = test_guard();
        let (mut platform, _probe) = initialized();
        platform.set_window_title("Renamed");
        assert_eq!(platform.title(), "Renamed");

        platform.set_window_size(640, 480);
        assert_eq!(platform.window_size(), Some((640, 480)));
        platform.set_window_size(0, 480);
        assert_eq!(platform.window_size(), Some((640, 480)));
        assert!(platform.native_window().is_none());
        assert!(matches!(
            platform.native_renderer(),
            Some(NativeRenderer::Headless(_))
        ));
    }
}
