//! Progress reporting for file mode.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Progress bar over `total` units, hidden when `quiet` or when stderr is
/// not a terminal.
pub fn create_progress_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Closing line printed after a run.
pub fn summary(scanned: usize, fixed: usize) -> String {
    format!("{} file(s) scanned, {} fixed", scanned, fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_bar_is_hidden() {
        assert!(create_progress_bar(10, true).is_hidden());
    }

    #[test]
    fn summary_line() {
        assert_eq!(summary(3, 1), "3 file(s) scanned, 1 fixed");
    }
}
