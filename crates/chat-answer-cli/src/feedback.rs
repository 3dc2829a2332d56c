//! Like/dislike handling for the answer being viewed.

use std::collections::HashMap;

use chat_answer_engine::{
    DislikeOutcome, Feedback, FeedbackError, FeedbackSink, NegativeReasons, RawAnswer,
    initial_feedback, toggle_dislike, toggle_like,
};

/// Reasons in the order they are offered, selectable with keys 1-9 and 0.
pub fn offered_reasons() -> impl Iterator<Item = Feedback> {
    Feedback::UNHELPFUL_REASONS
        .iter()
        .chain(Feedback::HARMFUL_REASONS)
        .copied()
}

/// Logs submissions instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct LogSink {
    pub submitted: Vec<(String, String)>,
}

impl FeedbackSink for LogSink {
    fn submit(&mut self, message_id: &str, value: &str) -> Result<(), FeedbackError> {
        log::info!("Feedback for {message_id}: {value}");
        self.submitted.push((message_id.to_string(), value.to_string()));
        Ok(())
    }
}

/// Feedback state for one answer plus the open/closed reason dialog.
pub struct FeedbackPanel<S: FeedbackSink> {
    message_id: String,
    /// Application-held feedback, keyed by message id.
    store: HashMap<String, Feedback>,
    pub reasons: NegativeReasons,
    pub dialog_open: bool,
    sink: S,
}

impl<S: FeedbackSink> FeedbackPanel<S> {
    /// `None` when the answer has no message id to attach feedback to.
    pub fn new(answer: &RawAnswer, sink: S) -> Option<Self> {
        let message_id = answer.message_id.clone()?;
        let mut store = HashMap::new();
        if let Some(initial) = initial_feedback(answer) {
            store.insert(message_id.clone(), initial);
        }
        Some(Self {
            message_id,
            store,
            reasons: NegativeReasons::new(),
            dialog_open: false,
            sink,
        })
    }

    pub fn state(&self) -> Option<Feedback> {
        self.store.get(&self.message_id).copied()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn set_state(&mut self, feedback: Feedback) {
        self.store.insert(self.message_id.clone(), feedback);
    }

    pub fn like(&mut self) -> Result<Feedback, FeedbackError> {
        let next = toggle_like(self.state());
        self.set_state(next);
        self.sink.submit(&self.message_id, next.as_str())?;
        Ok(next)
    }

    pub fn dislike(&mut self) -> Result<Feedback, FeedbackError> {
        let outcome = toggle_dislike(self.state());
        self.set_state(outcome.state());
        match outcome {
            DislikeOutcome::AskForReasons => self.dialog_open = true,
            DislikeOutcome::Reset => self.sink.submit(&self.message_id, Feedback::Neutral.as_str())?,
        }
        Ok(outcome.state())
    }

    /// Toggles the reason bound to `key` ('1'..'9', '0') while the dialog is open.
    pub fn toggle_reason_key(&mut self, key: char) {
        let index = match key.to_digit(10) {
            Some(0) => 9,
            Some(d) => d as usize - 1,
            None => return,
        };
        if let Some(reason) = offered_reasons().nth(index) {
            self.reasons.toggle(reason);
        }
    }

    pub fn submit_reasons(&mut self) -> Result<(), FeedbackError> {
        self.reasons.submit(&self.message_id, &mut self.sink)?;
        self.dialog_open = false;
        Ok(())
    }

    /// Closing the dialog without submitting leaves the answer neutral.
    pub fn cancel_dialog(&mut self) {
        self.reasons = NegativeReasons::new();
        self.dialog_open = false;
        self.set_state(Feedback::Neutral);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn panel(feedback: Option<&str>) -> FeedbackPanel<LogSink> {
        let answer = RawAnswer::with_text("text").message("m1", feedback);
        FeedbackPanel::new(&answer, LogSink::default()).unwrap()
    }

    #[test]
    fn no_message_id_means_no_panel() {
        assert!(FeedbackPanel::new(&RawAnswer::with_text("x"), LogSink::default()).is_none());
    }

    #[test]
    fn starts_from_stored_marker() {
        assert_eq!(panel(Some("positive")).state(), Some(Feedback::Positive));
        assert_eq!(panel(None).state(), None);
    }

    #[test]
    fn like_twice_returns_to_neutral() {
        let mut panel = panel(None);
        assert_eq!(panel.like().unwrap(), Feedback::Positive);
        assert_eq!(panel.like().unwrap(), Feedback::Neutral);
        assert_eq!(
            panel.sink().submitted,
            vec![
                ("m1".to_string(), "positive".to_string()),
                ("m1".to_string(), "neutral".to_string())
            ]
        );
    }

    #[test]
    fn dislike_opens_dialog_then_submits_reasons() {
        let mut panel = panel(Some("positive"));

        assert_eq!(panel.dislike().unwrap(), Feedback::Negative);
        assert!(panel.dialog_open);
        assert!(panel.sink().submitted.is_empty());

        panel.toggle_reason_key('2');
        panel.toggle_reason_key('0');
        panel.submit_reasons().unwrap();

        assert!(!panel.dialog_open);
        assert_eq!(
            panel.sink().submitted,
            vec![("m1".to_string(), "wrong_citation,other_harmful".to_string())]
        );
    }

    #[test]
    fn submitting_no_reasons_keeps_dialog_open() {
        let mut panel = panel(None);
        panel.dislike().unwrap();

        assert!(matches!(panel.submit_reasons(), Err(FeedbackError::NoReasons)));
        assert!(panel.dialog_open);
    }

    #[test]
    fn dislike_from_negative_resets_immediately() {
        let mut panel = panel(Some("out_of_scope"));

        assert_eq!(panel.dislike().unwrap(), Feedback::Neutral);
        assert!(!panel.dialog_open);
        assert_eq!(
            panel.sink().submitted,
            vec![("m1".to_string(), "neutral".to_string())]
        );
    }

    #[test]
    fn cancel_leaves_neutral() {
        let mut panel = panel(None);
        panel.dislike().unwrap();
        panel.toggle_reason_key('1');
        panel.cancel_dialog();

        assert_eq!(panel.state(), Some(Feedback::Neutral));
        assert!(panel.reasons.is_empty());
        assert!(panel.sink().submitted.is_empty());
    }
}
