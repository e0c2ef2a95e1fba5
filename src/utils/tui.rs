use std::borrow::Cow;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Spinner shown on stderr while a sync talks to the network.
/// Hidden automatically when stderr is not a terminal.
pub fn create_spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .map(|style| style.tick_strings(SPINNER_FRAMES))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        .with_style(style)
        .with_message(message);
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}
