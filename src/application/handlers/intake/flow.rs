//! IntakeFlow - renders dialog outcomes as provider markup.
//!
//! Handlers decide *what* happens next; this type owns *how* it is said:
//! callback URLs, the voice, gather timing and the fixed wording of the
//! fallback prompts.

use crate::domain::intake::IntakeField;
use crate::domain::telephony::{Gather, Say, VoiceResponse};

use super::record_answer::{RepromptReason, StepOutcome};
use super::start_handoff::HandoffOutcome;

pub const START_PATH: &str = "/voice";
pub const HANDOFF_PATH: &str = "/start_gpt_conversation";

pub(crate) const GREETING: &str = "Hello!";
pub(crate) const START_OVER: &str = "We encountered an issue. Please start over.";
pub(crate) const SAVE_FAILED: &str = "Sorry, we had trouble saving that.";
pub(crate) const GIVE_UP: &str = "We were unable to understand your response. Goodbye.";
pub(crate) const RECORD_MISSING: &str =
    "I couldn't find your information. Please try again later.";
pub(crate) const EMPTY_REPLY: &str =
    "I'm sorry, I didn't understand that. Can you please try again?";
pub(crate) const BACKEND_FAILED: &str =
    "I'm sorry, I couldn't process your request right now. Please try again later.";

/// Default number of re-prompts allowed per step.
pub const DEFAULT_MAX_REPROMPTS: u32 = 3;

/// Rendering settings shared by every dialog step.
#[derive(Debug, Clone)]
pub struct IntakeFlow {
    base_url: String,
    voice: String,
    gather_timeout_secs: u32,
    max_reprompts: u32,
}

impl IntakeFlow {
    /// `base_url` is the public origin the provider calls back on. An empty
    /// base yields relative callback paths.
    pub fn new(base_url: impl Into<String>, voice: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            voice: voice.into(),
            gather_timeout_secs: Gather::DEFAULT_TIMEOUT_SECS,
            max_reprompts: DEFAULT_MAX_REPROMPTS,
        }
    }

    pub fn with_gather_timeout(mut self, secs: u32) -> Self {
        self.gather_timeout_secs = secs;
        self
    }

    pub fn with_max_reprompts(mut self, max: u32) -> Self {
        self.max_reprompts = max;
        self
    }

    pub fn max_reprompts(&self) -> u32 {
        self.max_reprompts
    }

    /// Absolute callback URL for a path, carrying the attempt number once
    /// the caller has been re-prompted.
    pub fn url(&self, path: &str, attempt: u32) -> String {
        if attempt == 0 {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?attempt={}", self.base_url, path, attempt)
        }
    }

    fn say(&self, text: impl Into<String>) -> Say {
        Say::new(text).with_voice(self.voice.clone())
    }

    /// Speech capture for `field` with a spoken prompt, followed by a
    /// redirect to the same step so a silent caller still produces a
    /// callback there.
    fn listen(&self, field: IntakeField, prompt: String, attempt: u32) -> VoiceResponse {
        let action = self.url(field.step_path(), attempt);
        VoiceResponse::new()
            .gather(
                Gather::speech(action.clone())
                    .with_timeout(self.gather_timeout_secs)
                    .with_prompt(self.say(prompt)),
            )
            .redirect(action)
    }

    /// Opening prompt for a new call.
    pub fn greeting(&self) -> VoiceResponse {
        let first = IntakeField::FirstName;
        self.listen(first, format!("{} {}", GREETING, first.question()), 0)
    }

    /// Markup for the result of one question step.
    pub fn render_step(&self, outcome: &StepOutcome) -> VoiceResponse {
        match outcome {
            StepOutcome::Advanced {
                field,
                answer,
                next,
            } => self.listen(
                *next,
                format!("{} {}", field.acknowledgement(answer), next.question()),
                0,
            ),
            StepOutcome::Reprompt {
                field,
                attempt,
                reason,
            } => {
                let prompt = match reason {
                    RepromptReason::NoSpeech => format!(
                        "Sorry, I didn't catch that. Please say your {} again.",
                        field.label()
                    ),
                    RepromptReason::SaveFailed => format!("{} {}", SAVE_FAILED, field.question()),
                };
                self.listen(*field, prompt, *attempt)
            }
            StepOutcome::Exhausted { .. } => VoiceResponse::new().say(self.say(GIVE_UP)).hangup(),
            StepOutcome::Handoff { .. } => VoiceResponse::new().redirect(self.url(HANDOFF_PATH, 0)),
            StepOutcome::StartOver => VoiceResponse::new()
                .say(self.say(START_OVER))
                .redirect(self.url(START_PATH, 0)),
        }
    }

    /// Markup for the assistant handoff; the call always ends afterwards.
    pub fn render_handoff(&self, outcome: &HandoffOutcome) -> VoiceResponse {
        let text = match outcome {
            HandoffOutcome::Reply(reply) => reply.as_str(),
            HandoffOutcome::EmptyReply => EMPTY_REPLY,
            HandoffOutcome::BackendFailed => BACKEND_FAILED,
            HandoffOutcome::RecordMissing => RECORD_MISSING,
        };
        VoiceResponse::new().say(self.say(text)).hangup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> IntakeFlow {
        IntakeFlow::new("https://intake.example.com/", "alice")
    }

    #[test]
    fn urls_carry_attempt_only_after_first_ask() {
        let flow = flow();
        assert_eq!(
            flow.url("/process_age", 0),
            "https://intake.example.com/process_age"
        );
        assert_eq!(
            flow.url("/process_age", 2),
            "https://intake.example.com/process_age?attempt=2"
        );
    }

    #[test]
    fn greeting_asks_first_name() {
        let response = flow().greeting();

        assert_eq!(
            response.spoken(),
            vec!["Hello! Please say your first name after the beep."]
        );
        assert_eq!(
            response.gather_action(),
            Some("https://intake.example.com/process_first_name")
        );
        assert_eq!(response.redirect_target(), response.gather_action());
    }

    #[test]
    fn advance_acknowledges_and_asks_next() {
        let response = flow().render_step(&StepOutcome::Advanced {
            field: IntakeField::FirstName,
            answer: "Jordan".to_string(),
            next: IntakeField::LastName,
        });

        assert_eq!(
            response.spoken(),
            vec!["Thank you, Jordan. Please say your last name."]
        );
        assert_eq!(
            response.gather_action(),
            Some("https://intake.example.com/process_last_name")
        );
    }

    #[test]
    fn age_acknowledgement_does_not_echo() {
        let response = flow().render_step(&StepOutcome::Advanced {
            field: IntakeField::Age,
            answer: "42".to_string(),
            next: IntakeField::Residency,
        });
        assert_eq!(
            response.spoken(),
            vec!["Thank you. Please state your residency."]
        );
    }

    #[test]
    fn reprompt_returns_to_same_step() {
        let response = flow().render_step(&StepOutcome::Reprompt {
            field: IntakeField::Age,
            attempt: 1,
            reason: RepromptReason::NoSpeech,
        });

        assert_eq!(
            response.spoken(),
            vec!["Sorry, I didn't catch that. Please say your age again."]
        );
        assert_eq!(
            response.gather_action(),
            Some("https://intake.example.com/process_age?attempt=1")
        );
        assert_eq!(
            response.redirect_target(),
            Some("https://intake.example.com/process_age?attempt=1")
        );
    }

    #[test]
    fn save_failure_apologises_and_reasks() {
        let response = flow().render_step(&StepOutcome::Reprompt {
            field: IntakeField::LastName,
            attempt: 1,
            reason: RepromptReason::SaveFailed,
        });
        assert_eq!(
            response.spoken(),
            vec!["Sorry, we had trouble saving that. Please say your last name."]
        );
    }

    #[test]
    fn handoff_redirects_without_speaking() {
        let response = flow().render_step(&StepOutcome::Handoff { saved: false });
        assert!(response.spoken().is_empty());
        assert_eq!(
            response.redirect_target(),
            Some("https://intake.example.com/start_gpt_conversation")
        );
    }

    #[test]
    fn start_over_redirects_to_entrypoint() {
        let response = flow().render_step(&StepOutcome::StartOver);
        assert_eq!(response.spoken(), vec![START_OVER]);
        assert_eq!(
            response.redirect_target(),
            Some("https://intake.example.com/voice")
        );
    }

    #[test]
    fn exhausted_hangs_up() {
        let response = flow().render_step(&StepOutcome::Exhausted {
            field: IntakeField::Age,
        });
        assert_eq!(response.spoken(), vec![GIVE_UP]);
        assert!(response.ends_call());
    }

    #[test]
    fn handoff_outcomes_end_the_call() {
        let flow = flow();
        for (outcome, text) in [
            (HandoffOutcome::Reply("Hi Jordan!".to_string()), "Hi Jordan!"),
            (HandoffOutcome::EmptyReply, EMPTY_REPLY),
            (HandoffOutcome::BackendFailed, BACKEND_FAILED),
            (HandoffOutcome::RecordMissing, RECORD_MISSING),
        ] {
            let response = flow.render_handoff(&outcome);
            assert_eq!(response.spoken(), vec![text]);
            assert!(response.ends_call());
        }
    }

    #[test]
    fn relative_urls_without_base() {
        let flow = IntakeFlow::new("", "alice");
        assert_eq!(flow.url("/voice", 0), "/voice");
    }
}
