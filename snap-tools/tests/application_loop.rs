use approx::assert_relative_eq;
use snap_platform::{HeadlessPlatform, HeadlessProbe, PlatformError, RendererType};
use snap_tools::{AppConfig, AppError, AppState, Application};
use std::sync::{Mutex, OnceLock};

fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn headless_app(config: AppConfig) -> (Application, HeadlessProbe) {
    let platform = HeadlessPlatform::new();
    let probe = platform.probe();
    (Application::with_platform(config, Box::new(platform)), probe)
}

#[test]
fn initialize_then_shutdown_without_run_releases_backend() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    assert_eq!(app.state(), AppState::Uninitialized);
    assert_eq!(app.renderer_type(), None);

    app.initialize().expect("initialize");
    assert_eq!(app.state(), AppState::Running);
    assert!(app.is_running());
    assert!(probe.is_live());
    assert_eq!(app.renderer_type(), Some(RendererType::Headless));
    assert!(app.ui().is_some_and(|ui| ui.is_initialized()));

    app.shutdown();
    assert!(!probe.is_live());
    assert!(app.ui().is_none());
    assert!(!app.is_running());
    assert_eq!(app.state(), AppState::Stopped);
}

#[test]
fn shutdown_twice_is_harmless() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    app.shutdown();
    app.shutdown();
    assert!(!probe.is_live());

    let mut never_initialized = Application::new(AppConfig::default());
    never_initialized.shutdown();
    never_initialized.shutdown();
    assert_eq!(never_initialized.state(), AppState::Uninitialized);
}

#[test]
fn dropping_the_application_releases_backend() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    drop(app);
    assert!(!probe.is_live());
}

#[test]
fn failed_initialize_releases_backend_and_stays_uninitialized() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    probe.fail_next_initialize();

    let err = app.initialize().expect_err("initialize must fail");
    assert!(matches!(
        err,
        AppError::Platform(PlatformError::ContextCreation(_))
    ));
    assert_eq!(app.state(), AppState::Uninitialized);
    assert!(!probe.is_live());
    assert!(matches!(app.run(), Err(AppError::NotInitialized)));
}

#[test]
fn initialize_is_one_shot_after_a_failure() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    probe.fail_next_initialize();
    assert!(app.initialize().is_err());

    assert!(matches!(app.initialize(), Err(AppError::NotInitialized)));
    assert_eq!(app.state(), AppState::Uninitialized);
    assert_eq!(app.renderer_type(), None);
    assert!(!probe.is_live());
}

#[test]
fn invalid_window_config_is_rejected() {
    let _guard = test_guard();
    let config =
        AppConfig::default().with_window(snap_tools::WindowConfig::default().with_size(0, 600));
    let (mut app, probe) = headless_app(config);
    assert!(matches!(
        app.initialize(),
        Err(AppError::Platform(PlatformError::InvalidConfig(_)))
    ));
    assert!(!probe.is_live());
}

#[test]
fn second_initialize_is_rejected() {
    let _guard = test_guard();
    let (mut app, _probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    assert!(matches!(app.initialize(), Err(AppError::AlreadyRunning)));
}

#[test]
fn close_request_ends_the_loop() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    probe.close_after_polls(3);

    app.run().expect("run");
    assert_eq!(probe.poll_count(), 3);
    assert_eq!(probe.frames_presented(), 3);
    assert_eq!(app.frames_rendered(), 3);
    assert_eq!(app.state(), AppState::Stopped);
    assert!(!app.is_running());
}

#[test]
fn exit_stops_after_the_current_frame_without_polling_again() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    app.ui_mut().expect("ui").request_exit();

    app.run().expect("run");
    assert_eq!(probe.poll_count(), 1);
    assert_eq!(probe.frames_presented(), 1);
    assert_eq!(app.frames_rendered(), 1);
    assert_eq!(app.state(), AppState::Stopped);
}

#[test]
fn frame_error_stops_the_loop_and_is_returned() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    probe.fail_present_at(2);

    let err = app.run().expect_err("second frame must fail");
    assert!(matches!(err, AppError::Platform(PlatformError::Surface(_))));
    assert_eq!(probe.poll_count(), 2);
    assert_eq!(probe.frames_presented(), 1);
    assert_eq!(app.frames_rendered(), 1);
    assert_eq!(app.state(), AppState::Stopped);
    assert!(!app.is_running());

    app.shutdown();
    assert!(!probe.is_live());
}

#[test]
fn stop_before_run_renders_nothing() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    app.stop();

    app.run().expect("run");
    assert_eq!(probe.poll_count(), 0);
    assert_eq!(app.frames_rendered(), 0);
    assert_eq!(app.state(), AppState::Stopped);
}

#[test]
fn frames_clear_with_configured_color_and_draw_the_ui() {
    let _guard = test_guard();
    let color = [0.1, 0.2, 0.3, 1.0];
    let (mut app, probe) = headless_app(AppConfig::default().with_clear_color(color));
    app.initialize().expect("initialize");
    probe.close_after_polls(2);

    app.run().expect("run");
    assert_eq!(probe.clear_count(), 2);
    assert_eq!(probe.last_clear_color(), color);
    assert!(probe.last_draw_list_count() > 0);
}

#[test]
fn frame_statistics_follow_the_backend_framerate() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    probe.close_after_polls(150);

    app.run().expect("run");
    let ui = app.ui().expect("ui");
    assert_eq!(ui.frame_history().len(), snap_tools::FRAME_HISTORY_LEN);
    assert_relative_eq!(ui.avg_frame_time(), 1000.0 / 60.0, epsilon = 0.05);
}

#[test]
fn hidden_demo_window_keeps_widget_state() {
    let _guard = test_guard();
    let (mut app, probe) = headless_app(AppConfig::default());
    app.initialize().expect("initialize");
    {
        let ui = app.ui_mut().expect("ui");
        ui.demo_mut().slider_value = 0.25;
        ui.set_show_demo(false);
        ui.set_show_settings(true);
    }
    probe.close_after_polls(2);
    app.run().expect("run");

    let ui = app.ui().expect("ui");
    assert!(!ui.show_demo());
    assert_eq!(ui.demo().slider_value, 0.25);
}
