use indicatif::ProgressBar;

pub fn create_progress_bar(quiet: bool, len: usize) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(len as u64)
    }
}
