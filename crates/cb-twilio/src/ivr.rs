//! IVR menu for inbound and outbound calls
//!
//! Twilio fetches `/twilio/voice-response` when a call connects, posts the
//! pressed digit to `/twilio/gather-response` and posts finished
//! voicemails to `/twilio/recording-complete`. Each maps to one method on
//! [`IvrComposer`].

use cb_core::Config;
use serde::Serialize;

use crate::twiml::TwimlBuilder;

pub const VOICE_PATH: &str = "/twilio/voice-response";
pub const GATHER_PATH: &str = "/twilio/gather-response";
pub const RECORDING_PATH: &str = "/twilio/recording-complete";

const DIAL_TIMEOUT_SECS: u32 = 30;

/// Informational menu entries, keyed by digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuOption {
    AiVideos,
    SocialMedia,
    DigitalMarketing,
    Portfolio,
    Pricing,
    Consultation,
    Contact,
    About,
}

impl MenuOption {
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::AiVideos),
            '2' => Some(Self::SocialMedia),
            '3' => Some(Self::DigitalMarketing),
            '4' => Some(Self::Portfolio),
            '5' => Some(Self::Pricing),
            '6' => Some(Self::Consultation),
            '7' => Some(Self::Contact),
            '8' => Some(Self::About),
            _ => None,
        }
    }

    pub fn digit(&self) -> u8 {
        match self {
            Self::AiVideos => 1,
            Self::SocialMedia => 2,
            Self::DigitalMarketing => 3,
            Self::Portfolio => 4,
            Self::Pricing => 5,
            Self::Consultation => 6,
            Self::Contact => 7,
            Self::About => 8,
        }
    }
}

/// What a caller's key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "option", rename_all = "kebab-case")]
pub enum IvrAction {
    Informational(MenuOption),
    TransferToHuman,
    EndCall,
    RepeatMenu,
    InvalidSelection,
}

/// Where the call goes after the response plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallOutcome {
    ContinueInMenu,
    TransferToHuman,
    EndCall,
}

impl IvrAction {
    /// Map the `Digits` webhook field to an action. Total over all input.
    pub fn resolve_digits(digits: Option<&str>) -> Self {
        let Some(digits) = digits.map(str::trim).filter(|d| !d.is_empty()) else {
            return Self::RepeatMenu;
        };

        let mut chars = digits.chars();
        match (chars.next(), chars.next()) {
            (Some('0'), None) => Self::TransferToHuman,
            (Some('9'), None) => Self::EndCall,
            (Some(c), None) => MenuOption::from_digit(c)
                .map(Self::Informational)
                .unwrap_or(Self::InvalidSelection),
            _ => Self::InvalidSelection,
        }
    }

    pub fn outcome(&self) -> CallOutcome {
        match self {
            Self::TransferToHuman => CallOutcome::TransferToHuman,
            Self::EndCall => CallOutcome::EndCall,
            // Consultation records a message and then the call ends on its own
            Self::Informational(_) | Self::RepeatMenu | Self::InvalidSelection => {
                CallOutcome::ContinueInMenu
            }
        }
    }
}

/// TwiML for one menu selection
#[derive(Debug, Clone, Serialize)]
pub struct IvrResponse {
    pub action: IvrAction,
    pub outcome: CallOutcome,
    pub twiml: String,
}

/// Builds the IVR's TwiML documents
#[derive(Debug, Clone)]
pub struct IvrComposer {
    voice: String,
    language: String,
    transfer_number: Option<String>,
    caller_id: Option<String>,
}

impl IvrComposer {
    pub fn new(
        voice: impl Into<String>,
        language: impl Into<String>,
        transfer_number: Option<String>,
        caller_id: Option<String>,
    ) -> Self {
        Self {
            voice: voice.into(),
            language: language.into(),
            transfer_number: transfer_number.filter(|n| !n.trim().is_empty()),
            caller_id: caller_id.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ivr.voice.clone(),
            config.ivr.language.clone(),
            config.ivr.transfer_number.clone(),
            config.ivr_caller_id().map(str::to_string),
        )
    }

    fn builder(&self) -> TwimlBuilder {
        TwimlBuilder::new(&self.voice, &self.language)
    }

    /// Dial the executive line when one is configured
    fn transfer(&self, builder: TwimlBuilder) -> TwimlBuilder {
        match &self.transfer_number {
            Some(number) => builder.dial(number, DIAL_TIMEOUT_SECS, self.caller_id.as_deref()),
            None => builder,
        }
    }

    /// Main menu played when a call connects
    pub fn greeting(&self) -> String {
        let builder = self
            .builder()
            .gather(GATHER_PATH, 10, |g| {
                g.say("Welcome to Adlync Solutions! I'm your AI-powered digital marketing assistant.")
                    .pause(1)
                    .say("We specialize in AI videos, social media marketing, and complete digital transformation for businesses.")
                    .pause(1)
                    .say(MENU_PROMPT)
                    .say("Please press a number from 0 to 9, or stay on the line to speak with our executive team.")
            });

        let builder = if self.transfer_number.is_some() {
            self.transfer(builder.say(
                "I understand you'd like to speak with our executive team directly. Please hold while I connect you to one of our specialists.",
            ))
            .say("I'm sorry, all our executives are currently busy. Let me take your message and have someone call you back within 15 minutes.")
        } else {
            builder.say("Our executive team is not available right now. Let me take your message and have someone call you back within 15 minutes.")
        };

        builder
            .pause(1)
            .say("Please leave your name, phone number, and a brief message after the beep.")
            .record(RECORDING_PATH, 120)
            .say("Thank you! Our executive team will call you back within 15 minutes. Goodbye!")
            .hangup()
            .build()
    }

    /// Response to the digit(s) a caller pressed
    pub fn respond(&self, digits: Option<&str>) -> IvrResponse {
        let action = IvrAction::resolve_digits(digits);
        let twiml = match action {
            IvrAction::Informational(option) => self.informational(option),
            IvrAction::TransferToHuman => self.transfer_to_human(),
            IvrAction::EndCall => self.end_call(),
            IvrAction::RepeatMenu => self.builder().redirect(VOICE_PATH).build(),
            IvrAction::InvalidSelection => self
                .builder()
                .say("I'm sorry, that's not a valid option. Please choose a number from 0 to 9.")
                .pause(1)
                .say("Let me repeat our service menu for you.")
                .redirect(VOICE_PATH)
                .build(),
        };

        IvrResponse {
            action,
            outcome: action.outcome(),
            twiml,
        }
    }

    /// Played after a voicemail or follow-up recording finishes
    pub fn recording_complete(&self) -> String {
        self.builder()
            .say("Excellent! Your message has been recorded successfully and sent to our expert team at Adlync Solutions.")
            .pause(1)
            .say("Our specialists will review your requirements and contact you within 2 hours with a customized solution and proposal.")
            .pause(1)
            .say("Would you like to explore more services? Press 0 to speak with our team, press 6 to book an immediate consultation, or press 9 to end this call.")
            .gather(GATHER_PATH, 15, |g| {
                g.say("Please press 0 for our team, 6 for consultation, or 9 to end call.")
            })
            .say("Thank you for choosing Adlync Solutions. Our team will contact you soon. Have a great day!")
            .hangup()
            .build()
    }

    fn informational(&self, option: MenuOption) -> String {
        let builder = self.builder();
        match option {
            MenuOption::AiVideos
            | MenuOption::SocialMedia
            | MenuOption::DigitalMarketing
            | MenuOption::Portfolio => {
                say_lines(builder, info_lines(option))
                    .gather(GATHER_PATH, 5, |g| g.record(RECORDING_PATH, 60))
                    .redirect(VOICE_PATH)
                    .build()
            }
            MenuOption::Pricing | MenuOption::Contact | MenuOption::About => {
                say_lines(builder, info_lines(option))
                    .gather(GATHER_PATH, 10, |g| g.say("Please make your selection."))
                    .redirect(VOICE_PATH)
                    .build()
            }
            MenuOption::Consultation => builder
                .say("Fantastic! You've chosen to book a free consultation with our experts.")
                .pause(1)
                .say("Our free consultation includes a 30-minute strategy session, a complete business analysis, a custom marketing plan, ROI projections, and a no-obligation proposal.")
                .pause(1)
                .say("To book your consultation, please leave your name, business details, preferred time, and contact information after the beep. Our team will call you within 2 hours.")
                .record(RECORDING_PATH, 120)
                .say("Perfect! Your consultation request has been recorded. Thank you for choosing Adlync Solutions!")
                .build(),
        }
    }

    fn transfer_to_human(&self) -> String {
        let builder = self.builder();
        let builder = if self.transfer_number.is_some() {
            self.transfer(
                builder
                    .say("You selected to speak with our executive team. Please hold while I connect your call."),
            )
            .say("I'm sorry, our executive is currently unavailable.")
        } else {
            builder.say("I'm sorry, our executive team is not available right now.")
        };

        builder
            .say("Let me take your message and have someone call you back within 15 minutes.")
            .pause(1)
            .say("Please leave your name, phone number, and message after the beep.")
            .record(RECORDING_PATH, 60)
            .say("Thank you! Our team will call you back within 15 minutes. Goodbye!")
            .hangup()
            .build()
    }

    fn end_call(&self) -> String {
        self.builder()
            .say("Thank you for calling Adlync Solutions! We appreciate your interest in our AI-powered digital marketing services.")
            .pause(1)
            .say("Remember, we offer free consultations. Visit us at www.adlyncsolutions.com or email info@adlyncsolutions.com.")
            .pause(1)
            .say("Have a wonderful day. Goodbye!")
            .hangup()
            .build()
    }
}

/// Say each line with a one-second pause in between
fn say_lines(mut builder: TwimlBuilder, lines: &[&str]) -> TwimlBuilder {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            builder = builder.pause(1);
        }
        builder = builder.say(*line);
    }
    builder
}

const MENU_PROMPT: &str = "Please choose from our service menu: Press 1 for AI Videos and Avatar Videos. Press 2 for Social Media Marketing. Press 3 for Digital Marketing Solutions. Press 4 for Our Portfolio and Success Stories. Press 5 for Pricing and Packages. Press 6 to Book a Free Consultation. Press 7 for Contact Information. Press 8 to Learn About Adlync Solutions. Press 0 to Speak with Our Executive Team. Press 9 to End this Call.";

fn info_lines(option: MenuOption) -> &'static [&'static str] {
    match option {
        MenuOption::AiVideos => &[
            "Excellent choice! You selected AI Videos and Avatar Videos.",
            "At Adlync Solutions, we create AI Avatar Spokesperson Videos, AI-Generated Product Demos, Personalized Video Messages, and Animated Explainer Videos.",
            "Our AI videos have a quick turnaround of 24 to 48 hours, support multiple languages, and include unlimited revisions.",
            "Would you like to discuss your video requirements? Please describe your project after the beep, or press 0 to speak with our team.",
        ],
        MenuOption::SocialMedia => &[
            "Great selection! You chose Social Media Marketing services.",
            "We offer Instagram and Facebook Management, Content Creation and Design, Paid Advertising Campaigns, Influencer Marketing, and Analytics and Reporting.",
            "Our packages include 30 posts per month, daily story updates, targeted ad campaigns, and monthly performance reports.",
            "Would you like to discuss your social media goals? Please share your requirements after the beep, or press 0 to speak with our team.",
        ],
        MenuOption::DigitalMarketing => &[
            "Perfect! You selected our Digital Marketing Solutions.",
            "We provide Search Engine Optimization, Google Ads and PPC Campaigns, Website Development, Email Marketing Automation, and Lead Generation Systems.",
            "Our clients often see large increases in website traffic and lead generation.",
            "Interested in a free digital audit? Please tell us about your business after the beep, or press 0 to speak with our team.",
        ],
        MenuOption::Portfolio => &[
            "Wonderful! Let me share our success stories.",
            "For an E-commerce Brand, we helped achieve a 500% increase in online sales within 6 months.",
            "For a Tech Startup, we generated over 1000 qualified leads and a number 1 Google ranking.",
            "Would you like detailed case studies for your industry? Please tell us your business type after the beep, or press 0 to speak with our team.",
        ],
        MenuOption::Pricing => &[
            "Excellent! Here's an overview of our packages.",
            "We offer AI Video packages, monthly Social Media packages, and Digital Marketing packages, with custom enterprise plans available.",
            "Special offers include 20% off your first month, a free consultation, and no setup fees. Press 6 for a consultation, or press 0 to speak with our team.",
        ],
        MenuOption::Contact => &[
            "Here's how to reach Adlync Solutions.",
            "You can reach us by phone, WhatsApp, or email at info@adlyncsolutions.com. Visit our website at www.adlyncsolutions.com.",
            "Business hours are Monday to Friday 9 AM to 7 PM, and Saturday 10 AM to 4 PM. Press 6 to book a consultation, or press 0 to speak with our team.",
        ],
        MenuOption::About => &[
            "Thank you for your interest in learning about Adlync Solutions!",
            "Founded in 2020, we've helped over 500 businesses transform their digital presence using AI technology and proven marketing strategies.",
            "Our mission is to deliver measurable results for businesses of all sizes. Press 6 for a consultation, or press 0 to speak with our team.",
        ],
        MenuOption::Consultation => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(transfer: Option<&str>) -> IvrComposer {
        IvrComposer::new(
            "alice",
            "en-US",
            transfer.map(str::to_string),
            Some("+14155550100".to_string()),
        )
    }

    #[test]
    fn test_resolve_digits() {
        assert_eq!(IvrAction::resolve_digits(None), IvrAction::RepeatMenu);
        assert_eq!(IvrAction::resolve_digits(Some("  ")), IvrAction::RepeatMenu);
        assert_eq!(IvrAction::resolve_digits(Some("0")), IvrAction::TransferToHuman);
        assert_eq!(IvrAction::resolve_digits(Some("9")), IvrAction::EndCall);
        assert_eq!(
            IvrAction::resolve_digits(Some("5")),
            IvrAction::Informational(MenuOption::Pricing)
        );
        assert_eq!(IvrAction::resolve_digits(Some("12")), IvrAction::InvalidSelection);
        assert_eq!(IvrAction::resolve_digits(Some("*")), IvrAction::InvalidSelection);
        assert_eq!(IvrAction::resolve_digits(Some("#")), IvrAction::InvalidSelection);
    }

    #[test]
    fn test_every_digit_resolves() {
        for d in '1'..='8' {
            let action = IvrAction::resolve_digits(Some(&d.to_string()));
            match action {
                IvrAction::Informational(option) => {
                    assert_eq!(option.digit(), d.to_digit(10).unwrap() as u8)
                }
                other => panic!("digit {d} resolved to {other:?}"),
            }
        }
    }

    #[test]
    fn test_outcomes() {
        let ivr = composer(Some("+919876543210"));
        assert_eq!(ivr.respond(Some("0")).outcome, CallOutcome::TransferToHuman);
        assert_eq!(ivr.respond(Some("9")).outcome, CallOutcome::EndCall);
        assert_eq!(ivr.respond(Some("3")).outcome, CallOutcome::ContinueInMenu);
        assert_eq!(ivr.respond(Some("x")).outcome, CallOutcome::ContinueInMenu);
    }

    #[test]
    fn test_greeting_with_transfer() {
        let xml = composer(Some("+919876543210")).greeting();
        assert!(xml.contains(r#"<Gather numDigits="1" action="/twilio/gather-response" method="POST" timeout="10">"#));
        assert!(xml.contains(r#"<Dial timeout="30" callerId="+14155550100">+919876543210</Dial>"#));
        assert!(xml.contains(r#"<Record action="/twilio/recording-complete""#));
        assert!(xml.contains("<Hangup/>"));
    }

    #[test]
    fn test_greeting_without_transfer_skips_dial() {
        let xml = composer(None).greeting();
        assert!(!xml.contains("<Dial"));
        assert!(xml.contains("<Record"));
    }

    #[test]
    fn test_info_option_records_follow_up() {
        let xml = composer(None).respond(Some("1")).twiml;
        let gather = xml.find(r#"<Gather numDigits="1" action="/twilio/gather-response" method="POST" timeout="5">"#).unwrap();
        let record = xml.find(r#"maxLength="60""#).unwrap();
        assert!(gather < record);
        assert!(xml.contains("<Redirect>/twilio/voice-response</Redirect>"));
    }

    #[test]
    fn test_pricing_gathers_again() {
        let xml = composer(None).respond(Some("5")).twiml;
        assert!(xml.contains(r#"timeout="10""#));
        assert!(xml.contains("Please make your selection."));
        assert!(xml.contains("<Redirect>/twilio/voice-response</Redirect>"));
    }

    #[test]
    fn test_consultation_records() {
        let xml = composer(None).respond(Some("6")).twiml;
        assert!(xml.contains(r#"maxLength="120""#));
        assert!(!xml.contains("<Redirect>"));
    }

    #[test]
    fn test_end_call_hangs_up() {
        let xml = composer(None).respond(Some("9")).twiml;
        assert!(xml.contains("Goodbye!"));
        assert!(xml.contains("<Hangup/>"));
        assert!(!xml.contains("<Gather"));
    }

    #[test]
    fn test_transfer_falls_back_to_voicemail() {
        let xml = composer(Some("+919876543210")).respond(Some("0")).twiml;
        let dial = xml.find("<Dial").unwrap();
        let record = xml.find("<Record").unwrap();
        assert!(dial < record);
        assert!(xml.contains("<Hangup/>"));
    }

    #[test]
    fn test_invalid_and_absent_redirect_to_menu() {
        let ivr = composer(None);
        let invalid = ivr.respond(Some("77")).twiml;
        assert!(invalid.contains("not a valid option"));
        assert!(invalid.contains("<Redirect>/twilio/voice-response</Redirect>"));

        let absent = ivr.respond(None);
        assert_eq!(absent.action, IvrAction::RepeatMenu);
        assert!(absent.twiml.contains("<Redirect>/twilio/voice-response</Redirect>"));
    }

    #[test]
    fn test_recording_complete() {
        let xml = composer(None).recording_complete();
        assert!(xml.contains(r#"timeout="15""#));
        assert!(xml.ends_with("<Hangup/>\n</Response>"));
    }

    #[test]
    fn test_from_config_uses_twilio_number_as_caller_id() {
        let mut config = Config::default();
        config.twilio.phone_number = "+14155550111".into();
        config.ivr.transfer_number = Some("+919876543210".into());
        let xml = IvrComposer::from_config(&config).respond(Some("0")).twiml;
        assert!(xml.contains(r#"callerId="+14155550111""#));
    }
}
