/// Progress and cancellation handle for one tool run.
///
/// Cancellation is cooperative and only observed between execution steps: a
/// running operation is never interrupted once started.
pub trait Feedback {
    fn set_progress(&self, _progress: f64) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Feedback implementation that ignores progress and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {}
