//! StartCallHandler - answers a new inbound call.

use std::sync::Arc;

use crate::domain::foundation::CallSid;
use crate::domain::telephony::VoiceResponse;

use super::IntakeFlow;

#[derive(Debug, Clone, Default)]
pub struct StartCallCommand {
    pub call_sid: Option<CallSid>,
}

/// Greets the caller and asks the first question. Touches no storage; the
/// record is created by the first answer.
pub struct StartCallHandler {
    flow: Arc<IntakeFlow>,
}

impl StartCallHandler {
    pub fn new(flow: Arc<IntakeFlow>) -> Self {
        Self { flow }
    }

    pub fn handle(&self, cmd: StartCallCommand) -> VoiceResponse {
        match &cmd.call_sid {
            Some(call_sid) => tracing::info!(call_sid = %call_sid, "Call started"),
            None => tracing::info!("Call started without call identifier"),
        }
        self.flow.greeting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_and_points_at_first_name_step() {
        let handler = StartCallHandler::new(Arc::new(IntakeFlow::new("https://h", "alice")));

        let response = handler.handle(StartCallCommand {
            call_sid: Some(CallSid::new("CA1").unwrap()),
        });

        assert_eq!(response.gather_action(), Some("https://h/process_first_name"));
        assert!(!response.ends_call());
    }

    #[test]
    fn works_without_call_sid() {
        let handler = StartCallHandler::new(Arc::new(IntakeFlow::new("", "alice")));
        let response = handler.handle(StartCallCommand::default());
        assert_eq!(response.gather_action(), Some("/process_first_name"));
    }
}
