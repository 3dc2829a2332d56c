//! # Answer Feedback
//!
//! Like/dislike state for a single answer. The engine derives and formats
//! feedback values; storing them is the job of a [`FeedbackSink`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RawAnswer;

/// Feedback recorded against an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Neutral,
    Positive,
    Negative,
    MissingCitation,
    WrongCitation,
    OutOfScope,
    InaccurateOrIrrelevant,
    OtherUnhelpful,
    HateSpeech,
    Violent,
    Sexual,
    Manipulative,
    #[serde(alias = "other_harmlful")]
    OtherHarmful,
}

impl Feedback {
    /// Every value with its wire spelling.
    const ALL: &'static [(Feedback, &'static str)] = &[
        (Feedback::Neutral, "neutral"),
        (Feedback::Positive, "positive"),
        (Feedback::Negative, "negative"),
        (Feedback::MissingCitation, "missing_citation"),
        (Feedback::WrongCitation, "wrong_citation"),
        (Feedback::OutOfScope, "out_of_scope"),
        (Feedback::InaccurateOrIrrelevant, "inaccurate_or_irrelevant"),
        (Feedback::OtherUnhelpful, "other_unhelpful"),
        (Feedback::HateSpeech, "hate_speech"),
        (Feedback::Violent, "violent"),
        (Feedback::Sexual, "sexual"),
        (Feedback::Manipulative, "manipulative"),
        (Feedback::OtherHarmful, "other_harmful"),
    ];

    /// Older clients stored this misspelling.
    const LEGACY_OTHER_HARMFUL: &'static str = "other_harmlful";

    /// Reasons offered when an answer was unhelpful.
    pub const UNHELPFUL_REASONS: &'static [Feedback] = &[
        Feedback::MissingCitation,
        Feedback::WrongCitation,
        Feedback::OutOfScope,
        Feedback::InaccurateOrIrrelevant,
        Feedback::OtherUnhelpful,
    ];

    /// Reasons offered when reporting inappropriate content.
    pub const HARMFUL_REASONS: &'static [Feedback] = &[
        Feedback::HateSpeech,
        Feedback::Violent,
        Feedback::Sexual,
        Feedback::Manipulative,
        Feedback::OtherHarmful,
    ];

    pub fn as_str(&self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(value, _)| value == self)
            .map_or("neutral", |(_, name)| name)
    }

    /// Everything except neutral and positive.
    pub fn is_negative(&self) -> bool {
        !matches!(self, Feedback::Neutral | Feedback::Positive)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::LEGACY_OTHER_HARMFUL {
            return Ok(Feedback::OtherHarmful);
        }
        Self::ALL
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(value, _)| *value)
            .ok_or_else(|| FeedbackError::Unknown(s.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Unknown feedback value: {0}")]
    Unknown(String),

    #[error("No negative feedback reasons selected")]
    NoReasons,

    #[error("Answer has no message id")]
    NoMessageId,

    #[error("Failed to submit feedback for {message_id}: {reason}")]
    Submit { message_id: String, reason: String },
}

/// Read-only view of feedback the application already holds, keyed by message id.
pub trait FeedbackStore {
    fn feedback_for(&self, message_id: &str) -> Option<Feedback>;
}

impl FeedbackStore for HashMap<String, Feedback> {
    fn feedback_for(&self, message_id: &str) -> Option<Feedback> {
        self.get(message_id).copied()
    }
}

/// Persists feedback values, e.g. by calling the chat history service.
pub trait FeedbackSink {
    fn submit(&mut self, message_id: &str, value: &str) -> Result<(), FeedbackError>;
}

/// Feedback stored with the answer itself.
///
/// `None` when the answer has no message id or no stored marker. A marker
/// listing several reasons counts as negative; an unrecognised marker counts
/// as neutral.
pub fn initial_feedback(answer: &RawAnswer) -> Option<Feedback> {
    answer.message_id.as_ref()?;
    let marker = answer.feedback.as_deref()?;

    if marker.contains(',') {
        return Some(Feedback::Negative);
    }
    Some(marker.parse().unwrap_or(Feedback::Neutral))
}

/// Feedback held by the application for this answer, falling back to [`initial_feedback`].
pub fn current_feedback(answer: &RawAnswer, store: &impl FeedbackStore) -> Option<Feedback> {
    answer
        .message_id
        .as_deref()
        .and_then(|id| store.feedback_for(id))
        .or_else(|| initial_feedback(answer))
}

/// Thumbs up: clears a like, otherwise likes.
pub fn toggle_like(current: Option<Feedback>) -> Feedback {
    match current {
        Some(Feedback::Positive) => Feedback::Neutral,
        _ => Feedback::Positive,
    }
}

/// Result of pressing thumbs down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DislikeOutcome {
    /// State becomes negative; reasons must be collected before anything is submitted.
    AskForReasons,
    /// A negative state was cleared; submit neutral straight away.
    Reset,
}

impl DislikeOutcome {
    pub fn state(&self) -> Feedback {
        match self {
            DislikeOutcome::AskForReasons => Feedback::Negative,
            DislikeOutcome::Reset => Feedback::Neutral,
        }
    }
}

/// Thumbs down.
pub fn toggle_dislike(current: Option<Feedback>) -> DislikeOutcome {
    match current {
        None | Some(Feedback::Neutral) | Some(Feedback::Positive) => DislikeOutcome::AskForReasons,
        Some(_) => DislikeOutcome::Reset,
    }
}

/// Reasons ticked in the negative feedback dialog, in the order they were ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegativeReasons {
    reasons: Vec<Feedback>,
}

impl NegativeReasons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks or unticks `reason`.
    pub fn set(&mut self, reason: Feedback, checked: bool) {
        if checked {
            if !self.reasons.contains(&reason) {
                self.reasons.push(reason);
            }
        } else {
            self.reasons.retain(|r| *r != reason);
        }
    }

    pub fn toggle(&mut self, reason: Feedback) {
        let checked = !self.contains(reason);
        self.set(reason, checked);
    }

    pub fn contains(&self, reason: Feedback) -> bool {
        self.reasons.contains(&reason)
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[Feedback] {
        &self.reasons
    }

    /// The stored value: reasons joined with `,`.
    pub fn to_feedback_value(&self) -> String {
        self.reasons
            .iter()
            .map(Feedback::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Sends the reasons to `sink` and clears them.
    pub fn submit(
        &mut self,
        message_id: &str,
        sink: &mut impl FeedbackSink,
    ) -> Result<(), FeedbackError> {
        if self.is_empty() {
            return Err(FeedbackError::NoReasons);
        }
        sink.submit(message_id, &self.to_feedback_value())?;
        self.reasons.clear();
        Ok(())
    }
}
