use vidra::app::{Settings, ShellApp};
use vidra::cli::Args;
use vidra::engine::PlaybinEngine;
use vidra::paths;

use clap::Parser;
use eframe::egui;
use log::{debug, info};

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for log setup)
    let args = Args::parse();

    // Create path configuration from CLI args and environment
    let path_config = paths::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = paths::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // Initialize logger based on --log flag
    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| paths::data_file("vidra.log", &path_config));

        let file = std::fs::File::create(&log_path)
            .map_err(|e| anyhow::anyhow!("failed to create log file {}: {e}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {log_level:?})", log_path.display());
    } else {
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .init();
    }

    info!("Vidra Media Player starting...");
    debug!("Command-line args: {:?}", args);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Vidra v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size(egui::vec2(640.0, 480.0))
            .with_resizable(true)
            .with_drag_and_drop(true),
        persist_window: true,
        #[cfg(not(target_arch = "wasm32"))]
        persistence_path: Some(paths::config_file("vidra.json", &path_config)),
        ..Default::default()
    };

    eframe::run_native(
        "Vidra",
        native_options,
        Box::new(move |cc| {
            // Load persisted settings if available, otherwise defaults
            let mut settings: Settings = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted settings found, using defaults");
                    Settings::default()
                });

            let mut engine = PlaybinEngine::new()?;

            // Bind video output into this window; without an embeddable
            // handle the engine opens its own output window.
            engine.attach_window(cc);

            if let Some(volume) = args.volume {
                settings.volume = volume;
            }

            let mut app = ShellApp::new(engine, settings);

            if let Some(path) = &args.file_path {
                info!("Input file: {}", path.display());
                app.open_path(path);
            } else {
                debug!("No input file provided, starting with empty state");
            }

            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    info!("Application exiting");
    Ok(())
}
