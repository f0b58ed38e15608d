use indicatif::{ProgressBar, ProgressStyle};

/// Draws on stderr; indicatif stays silent when stderr is not a terminal.
pub(crate) fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        bar.set_style(style.progress_chars("██▌ "));
    }
    bar.set_message(message);
    bar
}
