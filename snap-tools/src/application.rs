//! Top-level run loop: poll events, update statistics, render a frame

use crate::config::AppConfig;
use crate::error::AppError;
use crate::ui_manager::{UiActions, UiManager};
use snap_platform::{Platform, RendererType, create_platform};
use tracing::{error, info};

/// Lifecycle of an [`Application`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Uninitialized,
    Running,
    Stopped,
}

/// Owns the platform backend and the UI, and sequences every frame
pub struct Application {
    config: AppConfig,
    platform: Option<Box<dyn Platform>>,
    ui: Option<UiManager>,
    state: AppState,
    running: bool,
    backend_taken: bool,
    frames_rendered: u64,
}

impl Application {
    /// Use the backend compiled for this OS
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            platform: None,
            ui: None,
            state: AppState::Uninitialized,
            running: false,
            backend_taken: false,
            frames_rendered: 0,
        }
    }

    /// Use `platform` instead of the compiled-in backend
    pub fn with_platform(config: AppConfig, platform: Box<dyn Platform>) -> Self {
        let mut app = Self::new(config);
        app.platform = Some(platform);
        app
    }

    /// Bring up the backend and the UI.
    ///
    /// One-shot: on failure the backend is released and the application stays
    /// [`AppState::Uninitialized`]; any later call returns
    /// [`AppError::NotInitialized`] instead of acquiring another backend.
    pub fn initialize(&mut self) -> Result<(), AppError> {
        if self.ui.is_some() {
            return Err(AppError::AlreadyRunning);
        }
        if self.backend_taken {
            return Err(AppError::NotInitialized);
        }

        self.backend_taken = true;
        let mut platform = self.platform.take().unwrap_or_else(create_platform);
        if let Err(err) = platform.initialize(&self.config.window) {
            error!("Failed to initialize {} platform: {err}", platform.renderer_type());
            platform.shutdown();
            return Err(err.into());
        }

        let renderer = platform.renderer_type();
        let mut ui = UiManager::from_config(renderer, &self.config);
        ui.initialize();

        self.platform = Some(platform);
        self.ui = Some(ui);
        self.running = true;
        self.state = AppState::Running;
        self.frames_rendered = 0;

        info!("Application initialized successfully");
        info!("Using renderer: {renderer}");
        Ok(())
    }

    /// Run frames until a close request, File → Exit, [`stop`](Self::stop) or a frame error
    pub fn run(&mut self) -> Result<(), AppError> {
        if self.platform.is_none() || self.ui.is_none() {
            return Err(AppError::NotInitialized);
        }

        let result = loop {
            if !self.running {
                break Ok(());
            }
            let Some(platform) = self.platform.as_mut() else {
                break Err(AppError::NotInitialized);
            };
            if platform.should_close() {
                info!("Window close requested");
                break Ok(());
            }

            platform.poll_events();
            self.update();
            match self.render() {
                Ok(actions) => {
                    if actions.about_opened {
                        info!("About window opened");
                    }
                    if actions.exit_requested {
                        info!("Exit requested from the menu");
                        self.running = false;
                    }
                }
                Err(err) => {
                    error!("Frame failed: {err}");
                    break Err(err);
                }
            }
        };

        self.running = false;
        self.state = AppState::Stopped;
        result
    }

    /// Ask the loop to end after the current frame
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Release the UI, then the backend. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        let had_ui = self.ui.is_some();
        let had_platform = self.platform.is_some();

        if let Some(mut ui) = self.ui.take() {
            ui.shutdown();
        }
        if let Some(mut platform) = self.platform.take() {
            platform.shutdown();
        }
        self.running = false;

        if had_ui {
            self.state = AppState::Stopped;
        }
        if had_ui || had_platform {
            info!("Application shutdown complete");
        }
    }

    fn update(&mut self) {
        if let (Some(platform), Some(ui)) = (self.platform.as_ref(), self.ui.as_mut()) {
            ui.update(platform.framerate());
        }
    }

    fn render(&mut self) -> Result<UiActions, AppError> {
        let (Some(platform), Some(ui)) = (self.platform.as_mut(), self.ui.as_mut()) else {
            return Err(AppError::NotInitialized);
        };

        platform.clear_background(self.config.clear_color);
        let frame = platform.new_frame()?;
        let actions = ui.render(frame);
        platform.imgui_render()?;
        platform.render_frame()?;

        self.frames_rendered += 1;
        Ok(actions)
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Renderer of the active backend, `None` before [`initialize`](Self::initialize)
    pub fn renderer_type(&self) -> Option<RendererType> {
        self.ui.as_ref().map(UiManager::renderer)
    }

    pub fn ui(&self) -> Option<&UiManager> {
        self.ui.as_ref()
    }

    pub fn ui_mut(&mut self) -> Option<&mut UiManager> {
        self.ui.as_mut()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        self.shutdown();
    }
}
