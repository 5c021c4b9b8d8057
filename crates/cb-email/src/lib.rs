//! cb-email: transactional email through SendGrid

pub mod error;
pub mod sendgrid;

pub use error::{EmailError, Result};
pub use sendgrid::{is_email, Attachment, EmailRequest, SendGridClient};
