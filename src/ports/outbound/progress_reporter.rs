/// ProgressReporter port for user-facing progress messages
///
/// Progress is written apart from the command output (stderr) so that
/// reports can be piped. Diagnostics go through `tracing` instead.
pub trait ProgressReporter {
    /// Reports a progress message
    ///
    /// # Arguments
    /// * `message` - The progress message to report
    fn report(&self, message: &str);

    /// Reports progress over a known number of steps (e.g. upload chunks)
    ///
    /// # Arguments
    /// * `current` - Steps completed so far
    /// * `total` - Total number of steps
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning that does not stop the operation
    fn report_warning(&self, message: &str);

    /// Reports an error; any running progress display is cleared
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
