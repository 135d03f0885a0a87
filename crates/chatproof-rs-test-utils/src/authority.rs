use async_trait::async_trait;
use chatproof_rs_protocol::{
    AuthorityError, ChatHistory, SubmissionHistory, SubmissionPayload, SubmitDataResult,
    ValidationAuthority, VerificationRequest, VerifyTokenResult,
};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Authority endpoint selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityCall {
    Verify,
    History,
    Submit,
}

/// In-memory authority with canned responses, call counters and recorded
/// requests. Accepts everything and reports no history by default.
#[derive(Debug)]
pub struct StubAuthority {
    verify: VerifyTokenResult,
    history: SubmissionHistory,
    submit: SubmitDataResult,
    failing: Option<AuthorityCall>,
    verify_calls: AtomicUsize,
    history_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    verifications: Mutex<Vec<VerificationRequest>>,
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl Default for StubAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl StubAuthority {
    pub fn new() -> Self {
        Self {
            verify: VerifyTokenResult {
                is_valid: true,
                error_text: String::new(),
                proof_token: "proof".to_string(),
            },
            history: SubmissionHistory {
                is_valid: true,
                error_text: String::new(),
                last_submission: None,
                chat_histories: Vec::new(),
            },
            submit: SubmitDataResult {
                is_valid: true,
                error_text: String::new(),
            },
            failing: None,
            verify_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            verifications: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_token(mut self, error_text: impl Into<String>) -> Self {
        self.verify.is_valid = false;
        self.verify.error_text = error_text.into();
        self
    }

    pub fn with_history(mut self, history: SubmissionHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_last_submission(mut self, last: NaiveDateTime) -> Self {
        self.history.last_submission = Some(last);
        self
    }

    pub fn with_chat_history(mut self, chat: ChatHistory) -> Self {
        self.history.chat_histories.push(chat);
        self
    }

    pub fn rejecting_history(mut self, error_text: impl Into<String>) -> Self {
        self.history.is_valid = false;
        self.history.error_text = error_text.into();
        self
    }

    pub fn rejecting_submission(mut self, error_text: impl Into<String>) -> Self {
        self.submit.is_valid = false;
        self.submit.error_text = error_text.into();
        self
    }

    /// Fail the given call with a transport error.
    pub fn failing(mut self, call: AuthorityCall) -> Self {
        self.failing = Some(call);
        self
    }

    pub fn calls(&self, call: AuthorityCall) -> usize {
        match call {
            AuthorityCall::Verify => self.verify_calls.load(Ordering::SeqCst),
            AuthorityCall::History => self.history_calls.load(Ordering::SeqCst),
            AuthorityCall::Submit => self.submit_calls.load(Ordering::SeqCst),
        }
    }

    pub fn verifications(&self) -> Vec<VerificationRequest> {
        self.verifications.lock().clone()
    }

    /// Payloads seen by history lookup and submission, in call order.
    pub fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().clone()
    }

    fn check(&self, call: AuthorityCall) -> Result<(), AuthorityError> {
        if self.failing == Some(call) {
            return Err(AuthorityError::Transport(format!(
                "stub {call:?} unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ValidationAuthority for StubAuthority {
    async fn verify_token(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerifyTokenResult, AuthorityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verifications.lock().push(request.clone());
        self.check(AuthorityCall::Verify)?;
        Ok(self.verify.clone())
    }

    async fn historical_chats(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionHistory, AuthorityError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().push(payload.clone());
        self.check(AuthorityCall::History)?;
        Ok(self.history.clone())
    }

    async fn submit_data(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmitDataResult, AuthorityError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().push(payload.clone());
        self.check(AuthorityCall::Submit)?;
        Ok(self.submit.clone())
    }
}
