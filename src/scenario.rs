//! Per-scenario state.
//!
//! The mock server keeps expectations and its request log across scenarios,
//! so the first step that talks to it in each scenario has to reset it.
//! `ScenarioState` remembers whether that already happened.

/// Reset bookkeeping for the scenario currently running.
#[derive(Debug, Default)]
pub struct ScenarioState {
    name: Option<String>,
    reset_pending: bool,
    expectations: usize,
    verifications: usize,
}

impl ScenarioState {
    pub fn new() -> Self {
        ScenarioState::default()
    }

    /// Start a scenario and arm the reset.
    pub fn begin(&mut self, name: impl Into<String>) {
        let name = name.into();
        if let Some(previous) = &self.name {
            tracing::warn!(previous = %previous, next = %name, "scenario started before the previous one ended");
        }
        tracing::debug!(scenario = %name, "scenario started");

        self.name = Some(name);
        self.reset_pending = true;
        self.expectations = 0;
        self.verifications = 0;
    }

    /// Returns `true` once per scenario: the caller must reset the mock server.
    pub fn take_reset(&mut self) -> bool {
        let pending = std::mem::replace(&mut self.reset_pending, false);
        if pending {
            tracing::debug!(scenario = self.name.as_deref().unwrap_or("<none>"), "mock server reset due");
        }
        pending
    }

    /// Finish the current scenario.
    pub fn end(&mut self) {
        if let Some(name) = self.name.take() {
            tracing::debug!(
                scenario = %name,
                expectations = self.expectations,
                verifications = self.verifications,
                "scenario finished"
            );
        }
        self.reset_pending = false;
    }

    pub fn record_expectation(&mut self) {
        self.expectations += 1;
    }

    pub fn record_verification(&mut self) {
        self.verifications += 1;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.name.is_some()
    }

    pub fn expectations(&self) -> usize {
        self.expectations
    }

    pub fn verifications(&self) -> usize {
        self.verifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_once_per_scenario() {
        let mut state = ScenarioState::new();
        state.begin("first");
        assert!(state.take_reset());
        assert!(!state.take_reset());
        state.end();

        state.begin("second");
        assert!(state.take_reset());
        assert!(!state.take_reset());
    }

    #[test]
    fn test_no_reset_outside_scenario() {
        let mut state = ScenarioState::new();
        assert!(!state.take_reset());

        state.begin("only");
        state.end();
        assert!(!state.take_reset());
    }

    #[test]
    fn test_counters_reset_on_begin() {
        let mut state = ScenarioState::new();
        state.begin("first");
        state.record_expectation();
        state.record_expectation();
        state.record_verification();
        assert_eq!(state.expectations(), 2);
        assert_eq!(state.verifications(), 1);
        state.end();

        state.begin("second");
        assert_eq!(state.expectations(), 0);
        assert_eq!(state.verifications(), 0);
    }

    #[test]
    fn test_name_and_active() {
        let mut state = ScenarioState::new();
        assert!(!state.is_active());
        state.begin("login works");
        assert_eq!(state.name(), Some("login works"));
        assert!(state.is_active());
        state.end();
        assert_eq!(state.name(), None);
    }

    #[test]
    fn test_begin_without_end_rearms() {
        let mut state = ScenarioState::new();
        state.begin("first");
        assert!(state.take_reset());
        state.begin("second");
        assert!(state.take_reset());
    }
}
