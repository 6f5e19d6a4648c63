//! Desktop shell for the event form. Config is read before the window opens so a
//! bad `.placefind.toml` shows up in the log right away.

use dioxus::prelude::*;

mod app;
mod search;
mod state;

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("placefind=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(feature = "desktop")]
fn window_config() -> dioxus::desktop::Config {
    use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

    let window = WindowBuilder::new()
        .with_title("placefind")
        .with_inner_size(LogicalSize::new(720.0, 640.0))
        .with_min_inner_size(LogicalSize::new(480.0, 420.0));
    Config::default()
        .with_menu(None)
        .with_background_color((10, 10, 10, 255))
        .with_window(window)
}

fn main() {
    init_logging();
    state::park_startup(state::AppState::from_cwd());

    #[cfg(feature = "desktop")]
    {
        LaunchBuilder::new().with_cfg(window_config()).launch(app::App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        dioxus::launch(app::App);
    }
}
