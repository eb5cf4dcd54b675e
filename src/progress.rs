use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

/// Progress indicator manager
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    enabled: bool,
    verbose: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(quiet: bool, verbose: bool) -> Self {
        // Progress goes to stderr, and only when it is a terminal
        let enabled = !quiet && io::stderr().is_terminal();

        Self {
            multi: Arc::new(MultiProgress::new()),
            enabled,
            verbose,
        }
    }

    /// Create a spinner with a message
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .ok()?
            .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]);

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Show a simple message (for verbose mode)
    pub fn show_message(&self, message: &str) {
        if self.verbose && self.enabled {
            eprintln!("🔍 {}", message);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A spinner tied to one long-running step; cleared when dropped
pub struct Spinner {
    bar: Option<ProgressBar>,
    manager: Arc<ProgressManager>,
}

impl Spinner {
    pub fn new(manager: Arc<ProgressManager>, message: &str) -> Self {
        let bar = manager.create_spinner(message);
        Self { bar, manager }
    }

    /// Update the progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.bar {
            pb.set_message(message.to_string());
        }
        self.manager.show_message(message);
    }

    /// Finish with a success message
    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.bar {
            pb.finish_with_message(format!("✅ {}", message));
        }
        self.manager.show_message(&format!("Done: {}", message));
    }

    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(ref pb) = self.bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
