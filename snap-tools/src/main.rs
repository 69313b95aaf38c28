use snap_tools::{AppConfig, Application, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init_tracing();

    let mut app = Application::new(AppConfig::default());
    if let Err(err) = app.initialize() {
        eprintln!("Failed to initialize application: {err}");
        return ExitCode::FAILURE;
    }

    println!("Starting cross-platform application...");
    let result = app.run();
    app.shutdown();

    match result {
        Ok(()) => {
            println!("Application finished successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Application error: {err}");
            ExitCode::FAILURE
        }
    }
}
