//! Session-scoped presentation state
//!
//! The core engine is stateless and re-entrant; whether a report has been
//! generated for the currently loaded file pair is presentation state and
//! lives here. Loading a new file pair resets the flag, so state never leaks
//! from a previous comparison.

/// State for a single comparison session
#[derive(Debug, Default)]
pub struct ReportSession {
    inputs: Option<(String, String)>,
    keys: Vec<String>,
    report_generated: bool,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the loaded file pair by content fingerprint. A different
    /// pair resets the report-generated flag.
    pub fn set_inputs(&mut self, base_fingerprint: String, current_fingerprint: String) {
        let inputs = (base_fingerprint, current_fingerprint);
        if self.inputs.as_ref() != Some(&inputs) {
            self.report_generated = false;
        }
        self.inputs = Some(inputs);
    }

    pub fn set_keys(&mut self, keys: Vec<String>) {
        self.keys = keys;
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn mark_report_generated(&mut self) {
        self.report_generated = true;
    }

    pub fn report_generated(&self) -> bool {
        self.report_generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_pair_resets_report_flag() {
        let mut session = ReportSession::new();
        session.set_inputs("a".into(), "b".into());
        session.mark_report_generated();
        assert!(session.report_generated());

        // same pair keeps the flag
        session.set_inputs("a".into(), "b".into());
        assert!(session.report_generated());

        // new pair resets it
        session.set_inputs("a".into(), "c".into());
        assert!(!session.report_generated());
    }
}
