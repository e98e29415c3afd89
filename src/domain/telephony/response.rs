//! Voice response markup.
//!
//! A `VoiceResponse` is the instruction document returned to the telephony
//! provider for every callback: what to say, what to listen for and which
//! URL to call next. It renders to the provider's XML dialect:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Response>
//!   <Gather input="speech" action="https://host/process_age" method="POST" timeout="10" speechTimeout="auto">
//!     <Say voice="alice">Please say your age.</Say>
//!   </Gather>
//!   <Redirect method="POST">https://host/process_age</Redirect>
//! </Response>
//! ```

use std::fmt;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Spoken text, optionally in a named provider voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Say {
    pub text: String,
    pub voice: Option<String>,
}

impl Say {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    fn write_xml(&self, out: &mut String) {
        match &self.voice {
            Some(voice) => {
                out.push_str(&format!(r#"<Say voice="{}">"#, xml_escape(voice)));
            }
            None => out.push_str("<Say>"),
        }
        out.push_str(&xml_escape(&self.text));
        out.push_str("</Say>");
    }
}

/// Speech capture that posts the recognized text to `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub action: String,
    pub timeout_secs: u32,
    pub prompts: Vec<Say>,
}

impl Gather {
    /// Default seconds of silence before the provider gives up listening.
    pub const DEFAULT_TIMEOUT_SECS: u32 = 10;

    pub fn speech(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            prompts: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_prompt(mut self, say: Say) -> Self {
        self.prompts.push(say);
        self
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str(&format!(
            r#"<Gather input="speech" action="{}" method="POST" timeout="{}" speechTimeout="auto">"#,
            xml_escape(&self.action),
            self.timeout_secs
        ));
        for say in &self.prompts {
            say.write_xml(out);
        }
        out.push_str("</Gather>");
    }
}

/// One instruction in a response document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(Say),
    Gather(Gather),
    Redirect(String),
    Hangup,
}

/// Ordered list of instructions for the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, say: Say) -> Self {
        self.verbs.push(Verb::Say(say));
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect(url.into()));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Action URL of the first speech capture, if any.
    pub fn gather_action(&self) -> Option<&str> {
        self.verbs.iter().find_map(|verb| match verb {
            Verb::Gather(gather) => Some(gather.action.as_str()),
            _ => None,
        })
    }

    /// Target of the first redirect, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        self.verbs.iter().find_map(|verb| match verb {
            Verb::Redirect(url) => Some(url.as_str()),
            _ => None,
        })
    }

    /// Every spoken line in order, including prompts nested in gathers.
    pub fn spoken(&self) -> Vec<&str> {
        let mut lines = Vec::new();
        for verb in &self.verbs {
            match verb {
                Verb::Say(say) => lines.push(say.text.as_str()),
                Verb::Gather(gather) => {
                    lines.extend(gather.prompts.iter().map(|say| say.text.as_str()))
                }
                Verb::Redirect(_) | Verb::Hangup => {}
            }
        }
        lines
    }

    pub fn ends_call(&self) -> bool {
        matches!(self.verbs.last(), Some(Verb::Hangup))
    }

    /// Renders the provider XML document.
    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str("<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say(say) => say.write_xml(&mut out),
                Verb::Gather(gather) => gather.write_xml(&mut out),
                Verb::Redirect(url) => {
                    out.push_str(r#"<Redirect method="POST">"#);
                    out.push_str(&xml_escape(url));
                    out.push_str("</Redirect>");
                }
                Verb::Hangup => out.push_str("<Hangup/>"),
            }
        }
        out.push_str("</Response>");
        out
    }
}

impl fmt::Display for VoiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_xml())
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_response_renders_bare_document() {
        assert_eq!(
            VoiceResponse::new().to_xml(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#
        );
    }

    #[test]
    fn gather_nests_prompts_and_attributes() {
        let response = VoiceResponse::new()
            .gather(
                Gather::speech("https://host/process_age")
                    .with_prompt(Say::new("Please say your age.").with_voice("alice")),
            )
            .redirect("https://host/process_age");

        assert_eq!(
            response.to_xml(),
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#,
                r#"<Gather input="speech" action="https://host/process_age" method="POST" timeout="10" speechTimeout="auto">"#,
                r#"<Say voice="alice">Please say your age.</Say></Gather>"#,
                r#"<Redirect method="POST">https://host/process_age</Redirect>"#,
                r#"</Response>"#
            )
        );
    }

    #[test]
    fn query_strings_are_escaped_in_urls() {
        let xml = VoiceResponse::new()
            .redirect("https://host/process_age?attempt=1&x=2")
            .to_xml();
        assert!(xml.contains("attempt=1&amp;x=2"));
    }

    #[test]
    fn spoken_text_is_escaped() {
        let xml = VoiceResponse::new()
            .say(Say::new("Tom & Jerry <3 \"quotes\""))
            .to_xml();
        assert!(xml.contains("Tom &amp; Jerry &lt;3 &quot;quotes&quot;"));
    }

    #[test]
    fn accessors_describe_the_document() {
        let response = VoiceResponse::new()
            .say(Say::new("Sorry."))
            .gather(Gather::speech("/a").with_prompt(Say::new("Again?")))
            .redirect("/b")
            .hangup();

        assert_eq!(response.gather_action(), Some("/a"));
        assert_eq!(response.redirect_target(), Some("/b"));
        assert_eq!(response.spoken(), vec!["Sorry.", "Again?"]);
        assert!(response.ends_call());
    }

    proptest! {
        #[test]
        fn escaped_text_never_contains_markup(text in ".*") {
            let escaped = xml_escape(&text);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }
    }
}
