use crate::gateway::DiagnosisResult;
use crate::session::DiagnosisSession;

/// Which screen is active. Replaces the ambient view/result globals of a UI
/// shell with an explicit value: transitions consume the old view and return
/// the next one, and whatever the old view owned is dropped with it.
pub enum View {
    Intro,
    Diagnosis(DiagnosisSession),
    Report(DiagnosisResult),
}

impl View {
    pub fn new() -> Self {
        View::Intro
    }

    /// Intro → Diagnosis. Starting over from any view discards the current
    /// session or result.
    pub fn start_diagnosis(self, seed: Option<u64>) -> View {
        let session = match seed {
            Some(seed) => DiagnosisSession::with_seed(seed),
            None => DiagnosisSession::from_entropy(),
        };
        View::Diagnosis(session)
    }

    /// Diagnosis → Report, once a gateway round-trip has produced a result.
    pub fn complete(self, result: DiagnosisResult) -> View {
        View::Report(result)
    }

    /// Any view → Intro. The session or result is dropped here; nothing is
    /// persisted.
    pub fn reset(self) -> View {
        View::Intro
    }

    pub fn is_intro(&self) -> bool {
        matches!(self, View::Intro)
    }
}

impl Default for View {
    fn default() -> Self {
        View::new()
    }
}
