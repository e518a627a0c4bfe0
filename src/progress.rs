use std::fmt::Write;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};

pub const BAR_WIDTH: usize = 50;

/// Completion of `progress` out of `total` as `NN.NN%`. A zero total counts as done.
pub fn percent(progress: u64, total: u64) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        (progress as f64 / total as f64).clamp(0.0, 1.0)
    };
    format!("{:.2}%", fraction * 100.0)
}

/// Single-line `[####------] NN.NN%` bar redrawn in place.
///
/// Reaching the total completes the bar; the line is left on screen and later
/// output starts on the next line.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Draws to stdout when `visible`. indicatif skips drawing when stdout is not
    /// a terminal, so redirected runs only get the log lines.
    pub fn new(total: u64, visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self::with_target(total, target)
    }

    pub fn with_target(total: u64, target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template(&format!("[{{bar:{BAR_WIDTH}}}] {{percent2}}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("percent2", |state: &ProgressState, w: &mut dyn Write| {
                let _ = w.write_str(&percent(state.pos(), state.len().unwrap_or(0)));
            })
            .progress_chars("#-");

        let bar = ProgressBar::with_draw_target(Some(total), target).with_style(style);
        Self { bar }
    }

    pub fn update(&self, progress: u64) {
        if self.bar.is_finished() {
            return;
        }
        if progress >= self.bar.length().unwrap_or(0) {
            // moves to the total and draws once
            self.bar.finish();
        } else {
            self.bar.set_position(progress);
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Ends the line for a bar that stopped short of its total.
    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
