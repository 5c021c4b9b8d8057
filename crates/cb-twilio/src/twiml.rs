//! TwiML document builder
//!
//! ```
//! use cb_twilio::TwimlBuilder;
//!
//! let xml = TwimlBuilder::new("alice", "en-US")
//!     .say("Goodbye & thanks")
//!     .hangup()
//!     .build();
//! assert!(xml.contains("Goodbye &amp; thanks"));
//! ```

use quick_xml::escape::escape;

/// Content type for TwiML responses
pub const TWIML_CONTENT_TYPE: &str = "text/xml";

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone)]
enum Verb {
    Say(String),
    Pause(u32),
    Gather {
        action: String,
        timeout: u32,
        children: Vec<Verb>,
    },
    Dial {
        number: String,
        timeout: u32,
        caller_id: Option<String>,
    },
    Record {
        action: String,
        max_length: u32,
    },
    Redirect(String),
    Hangup,
}

/// Builds a `<Response>` document one verb at a time
#[derive(Debug, Clone)]
pub struct TwimlBuilder {
    voice: String,
    language: String,
    verbs: Vec<Verb>,
}

impl TwimlBuilder {
    /// `voice` and `language` apply to every `<Say>`
    pub fn new(voice: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            language: language.into(),
            verbs: Vec::new(),
        }
    }

    /// Empty `<Response/>`, used to acknowledge inbound messages
    pub fn empty() -> String {
        format!("{}\n<Response/>", XML_HEADER)
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn pause(mut self, seconds: u32) -> Self {
        self.verbs.push(Verb::Pause(seconds));
        self
    }

    /// One-digit `<Gather>` posting to `action`. `nested` fills its body.
    pub fn gather(
        mut self,
        action: &str,
        timeout: u32,
        nested: impl FnOnce(TwimlBuilder) -> TwimlBuilder,
    ) -> Self {
        let inner = nested(TwimlBuilder::new(self.voice.clone(), self.language.clone()));
        self.verbs.push(Verb::Gather {
            action: action.to_string(),
            timeout,
            children: inner.verbs,
        });
        self
    }

    pub fn dial(mut self, number: &str, timeout: u32, caller_id: Option<&str>) -> Self {
        self.verbs.push(Verb::Dial {
            number: number.to_string(),
            timeout,
            caller_id: caller_id.map(str::to_string),
        });
        self
    }

    /// `<Record>` with a beep, posting the recording to `action`
    pub fn record(mut self, action: &str, max_length: u32) -> Self {
        self.verbs.push(Verb::Record {
            action: action.to_string(),
            max_length,
        });
        self
    }

    pub fn redirect(mut self, url: &str) -> Self {
        self.verbs.push(Verb::Redirect(url.to_string()));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn build(self) -> String {
        let mut out = String::with_capacity(256 + self.verbs.len() * 96);
        out.push_str(XML_HEADER);
        out.push_str("\n<Response>\n");
        for verb in &self.verbs {
            self.write_verb(&mut out, verb, 1);
        }
        out.push_str("</Response>");
        out
    }

    fn write_verb(&self, out: &mut String, verb: &Verb, depth: usize) {
        let indent = "  ".repeat(depth);
        match verb {
            Verb::Say(text) => {
                out.push_str(&format!(
                    "{}<Say voice=\"{}\" language=\"{}\">{}</Say>\n",
                    indent,
                    escape(&self.voice),
                    escape(&self.language),
                    escape(text)
                ));
            }
            Verb::Pause(seconds) => {
                out.push_str(&format!("{}<Pause length=\"{}\"/>\n", indent, seconds));
            }
            Verb::Gather {
                action,
                timeout,
                children,
            } => {
                out.push_str(&format!(
                    "{}<Gather numDigits=\"1\" action=\"{}\" method=\"POST\" timeout=\"{}\">\n",
                    indent,
                    escape(action),
                    timeout
                ));
                for child in children {
                    self.write_verb(out, child, depth + 1);
                }
                out.push_str(&format!("{}</Gather>\n", indent));
            }
            Verb::Dial {
                number,
                timeout,
                caller_id,
            } => {
                let caller = caller_id
                    .as_deref()
                    .map(|c| format!(" callerId=\"{}\"", escape(c)))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "{}<Dial timeout=\"{}\"{}>{}</Dial>\n",
                    indent,
                    timeout,
                    caller,
                    escape(number)
                ));
            }
            Verb::Record { action, max_length } => {
                out.push_str(&format!(
                    "{}<Record action=\"{}\" method=\"POST\" maxLength=\"{}\" playBeep=\"true\"/>\n",
                    indent,
                    escape(action),
                    max_length
                ));
            }
            Verb::Redirect(url) => {
                out.push_str(&format!("{}<Redirect>{}</Redirect>\n", indent, escape(url)));
            }
            Verb::Hangup => {
                out.push_str(&format!("{}<Hangup/>\n", indent));
            }
        }
    }
}
