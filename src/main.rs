//! Showroom - interactive vehicle viewer
//!
//! Renders a single car model with orbit controls, configurable paint colors,
//! breakpoint-based camera framing and a fixed overlay (title, byline, links).

mod app;
mod assets;
mod config;
mod render;
mod scene;
mod ui;

fn main() {
    app::run();
}
