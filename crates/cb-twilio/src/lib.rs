//! cb-twilio: telephony and messaging through the Twilio REST API
//!
//! Outbound voice calls, SMS and WhatsApp (single and bulk), read-only
//! account queries, and the TwiML documents served to Twilio's voice
//! webhooks (the IVR menu).

pub mod address;
pub mod client;
pub mod error;
pub mod ivr;
pub mod twiml;
pub mod types;

pub use client::TwilioClient;
pub use error::{Result, TwilioError};
pub use ivr::{CallOutcome, IvrAction, IvrComposer, IvrResponse, MenuOption};
pub use twiml::{TwimlBuilder, TWIML_CONTENT_TYPE};
pub use types::{
    BulkWhatsAppRequest, CallRequest, SmsRequest, TwilioWebhook, WhatsAppRequest,
};
