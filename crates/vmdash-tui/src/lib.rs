//! # vmdash-tui
//!
//! Terminal dashboard for live virtual-machine metrics.
//!
//! Built with `ratatui` and `crossterm`, providing:
//! - A results table with one row per VM (name, namespace, cores, MB).
//! - CPU and memory bar charts labelled by VM name.
//! - A status line reporting the realtime channel's state.
//!
//! [`renderer::MetricsRenderer`] holds the presentation state and is usable
//! without a terminal; [`session::run`] drives it from a live feed.

pub mod app;
pub mod event;
pub mod renderer;
pub mod session;
pub mod ui;
