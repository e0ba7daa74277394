use crate::catalog::{Statement, catalog, statement_by_id};
use crate::error::FivefoldError;
use crate::gateway::{DiagnosisResult, InterpretationGateway};
use crate::scoring::{Responses, compute_totals};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Presenting the statement at this position in the shuffled order.
    Answering(usize),
    /// Totals computed, gateway call in flight.
    Submitting,
    /// Gateway round-trip succeeded; the result has been produced.
    Done,
}

/// One diagnosis session: a shuffled presentation order over the fixed
/// catalog, the responses collected so far, and the submission state machine.
/// Discarded wholesale on reset; nothing is persisted.
pub struct DiagnosisSession {
    order: Vec<u32>,
    responses: Responses,
    state: SessionState,
}

impl DiagnosisSession {
    /// Shuffle the catalog with the caller's RNG. Every statement appears
    /// exactly once; the permutation is fixed for the session's lifetime.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut order: Vec<u32> = catalog().iter().map(|s| s.id).collect();
        order.shuffle(rng);
        Self {
            order,
            responses: Responses::new(),
            state: SessionState::Answering(0),
        }
    }

    /// Reproducible presentation order, mainly for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(&mut StdRng::from_entropy())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn total_statements(&self) -> usize {
        self.order.len()
    }

    pub fn presentation_order(&self) -> &[u32] {
        &self.order
    }

    /// The statement at the current position, if still answering.
    pub fn current_statement(&self) -> Option<&'static Statement> {
        match self.state {
            SessionState::Answering(pos) => statement_by_id(self.order[pos]),
            _ => None,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.responses.len()
    }

    pub fn progress_percent(&self) -> u32 {
        match self.state {
            SessionState::Answering(pos) => {
                (((pos + 1) * 100) / self.order.len().max(1)) as u32
            }
            SessionState::Submitting | SessionState::Done => 100,
        }
    }

    pub fn response_for(&self, statement_id: u32) -> Option<u8> {
        self.responses.get(statement_id)
    }

    /// Store or overwrite a response and advance, unless the current
    /// statement is the last in the presentation order.
    pub fn record_response(&mut self, statement_id: u32, value: u8) -> Result<(), FivefoldError> {
        let pos = match self.state {
            SessionState::Answering(pos) => pos,
            _ => {
                return Err(FivefoldError::NotReadyToSubmit(
                    "responses can only be recorded while answering".into(),
                ));
            }
        };
        self.responses.record(statement_id, value)?;
        if pos + 1 < self.order.len() {
            self.state = SessionState::Answering(pos + 1);
        }
        Ok(())
    }

    /// Move back one statement. No-op at the first statement.
    pub fn go_back(&mut self) {
        if let SessionState::Answering(pos) = self.state {
            if pos > 0 {
                self.state = SessionState::Answering(pos - 1);
            }
        }
    }

    /// Submission is enabled only from the last statement, once it has a
    /// recorded response.
    pub fn can_submit(&self) -> bool {
        match self.state {
            SessionState::Answering(pos) => {
                pos + 1 == self.order.len() && self.responses.get(self.order[pos]).is_some()
            }
            _ => false,
        }
    }

    /// Compute totals and make the single gateway attempt. On failure the
    /// session returns to the last statement with every response intact, so
    /// the user can retry without losing answers.
    pub async fn submit(
        &mut self,
        gateway: &dyn InterpretationGateway,
    ) -> Result<DiagnosisResult, FivefoldError> {
        if !self.can_submit() {
            return Err(FivefoldError::NotReadyToSubmit(
                "the last statement has not been answered".into(),
            ));
        }
        let last = self.order.len() - 1;
        self.state = SessionState::Submitting;

        let totals = compute_totals(catalog(), &self.responses);
        tracing::debug!(answered = self.responses.len(), "submitting diagnosis");

        match gateway.interpret(&totals).await {
            Ok(payload) => {
                if let Err(err) = payload.validate() {
                    tracing::error!(error = %err, "gateway payload failed validation");
                    self.state = SessionState::Answering(last);
                    return Err(err.into());
                }
                self.state = SessionState::Done;
                Ok(DiagnosisResult::from_payload(totals, payload))
            }
            Err(err) => {
                tracing::error!(error = %err, "gateway call failed");
                self.state = SessionState::Answering(last);
                Err(err.into())
            }
        }
    }
}
