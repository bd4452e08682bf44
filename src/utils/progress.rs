//! Progress bar display for file scanning

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a search run, one tick per file
#[derive(Clone)]
pub struct ProgressDisplay {
    file_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a visible progress bar over `total_files` files
    pub fn new(total_files: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let file_pb = ProgressBar::new(total_files);
        file_pb.set_style(style);
        Self { file_pb }
    }

    /// A progress display that never draws
    pub fn hidden() -> Self {
        Self {
            file_pb: ProgressBar::hidden(),
        }
    }

    /// Mark one file as done and show its name and running hit count
    pub fn file_done(&self, file_name: &str, total_hits: usize) {
        // Truncate long names for display
        let chars: Vec<char> = file_name.chars().collect();
        let display_name = if chars.len() > 40 {
            let tail: String = chars[chars.len() - 37..].iter().collect();
            format!("...{}", tail)
        } else {
            file_name.to_string()
        };
        self.file_pb
            .set_message(format!("{} ({} hits)", display_name, total_hits));
        self.file_pb.inc(1);
    }

    pub fn finish(&self) {
        self.file_pb.finish_and_clear();
    }

    /// Abandon on cancellation or error
    pub fn abandon(&self) {
        self.file_pb.abandon();
    }
}
