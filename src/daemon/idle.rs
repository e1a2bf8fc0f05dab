/// Decides whether the user has been away long enough to stop the timers.
pub struct IdleEvaluator {
    threshold_ms: Option<u64>,
}

impl IdleEvaluator {
    /// A zero timeout disables idle detection.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            threshold_ms: (minutes > 0).then(|| minutes as u64 * 60 * 1000),
        }
    }

    pub fn is_idle(&self, idle_ms: u32) -> bool {
        self.threshold_ms
            .is_some_and(|threshold| threshold < idle_ms as u64)
    }
}
