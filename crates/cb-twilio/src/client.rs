//! Twilio REST API client

use std::time::Duration;

use cb_core::dispatch::read_response;
use cb_core::{BulkReport, DispatchResult, ProviderError, TwilioConfig};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::address::{
    require_e164, require_resource_id, require_text, require_url, require_whatsapp,
};
use crate::error::{Result, TwilioError};
use crate::types::{BulkWhatsAppRequest, CallRequest, SmsRequest, WhatsAppRequest};

const PROVIDER: &str = "Twilio";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const API_VERSION: &str = "2010-04-01";

/// Twilio API client
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    account_sid: String,
    auth_token: String,
    phone_number: String,
    whatsapp_number: String,
    base_url: String,
    /// Public base URL of this service, used for default callbacks
    app_base_url: String,
    bulk_delay: Duration,
}

impl TwilioClient {
    /// Create a client. Fails when the account SID or auth token is missing.
    pub fn new(config: &TwilioConfig, app_base_url: &str) -> Result<Self> {
        if !config.is_configured() {
            return Err(TwilioError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TwilioError::Config(e.to_string()))?;

        Ok(Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            phone_number: config.phone_number.clone(),
            whatsapp_number: config.whatsapp_number.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
            bulk_delay: Duration::from_secs(config.bulk_delay_secs),
        })
    }

    /// Override the default delay between bulk sends
    pub fn with_bulk_delay(mut self, delay: Duration) -> Self {
        self.bulk_delay = delay;
        self
    }

    fn account_url(&self) -> String {
        format!("{}/{}/Accounts/{}", self.base_url, API_VERSION, self.account_sid)
    }

    fn callback(&self, path: &str) -> String {
        format!("{}{}", self.app_base_url, path)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
    }

    fn post_form(&self, url: &str, form: &[(&str, String)]) -> RequestBuilder {
        self.client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::transport(&e, context))?;
        Ok(read_response(PROVIDER, response, context).await?)
    }

    fn sender<'a>(requested: &'a str, fallback: &'a str) -> &'a str {
        let requested = requested.trim();
        if requested.is_empty() { fallback } else { requested }
    }

    /// Place an outbound voice call
    pub async fn initiate_call(&self, request: &CallRequest) -> Result<DispatchResult> {
        let from = Self::sender(&request.from, &self.phone_number);
        require_e164("to", &request.to)?;
        require_e164("from", from)?;
        require_url("url", request.url.as_deref())?;
        require_url("statusCallback", request.status_callback.as_deref())?;

        info!("Initiating call from {} to {}", from, request.to);

        let form = vec![
            ("To", request.to.trim().to_string()),
            ("From", from.to_string()),
            (
                "Url",
                request
                    .url
                    .clone()
                    .unwrap_or_else(|| self.callback("/twilio/voice-response")),
            ),
            ("Method", request.method.clone().unwrap_or_else(|| "POST".into())),
            (
                "StatusCallback",
                request
                    .status_callback
                    .clone()
                    .unwrap_or_else(|| self.callback("/twilio/call-status")),
            ),
            (
                "StatusCallbackMethod",
                request
                    .status_callback_method
                    .clone()
                    .unwrap_or_else(|| "POST".into()),
            ),
            ("Record", request.record.clone().unwrap_or_else(|| "false".into())),
            ("Timeout", request.timeout.clone().unwrap_or_else(|| "60".into())),
        ];

        let url = format!("{}/Calls.json", self.account_url());
        let data = self
            .send(self.post_form(&url, &form), "Failed to initiate call")
            .await?;

        let result = DispatchResult::ok("Call initiated successfully", data);
        info!("Call initiated. CallSid: {:?}", result.sid);
        Ok(result)
    }

    /// Fetch a call resource
    pub async fn call_status(&self, call_sid: &str) -> Result<DispatchResult> {
        require_resource_id("callSid", call_sid)?;
        debug!("Fetching call status for {}", call_sid);
        let url = format!("{}/Calls/{}.json", self.account_url(), call_sid);
        let context = format!("Failed to get call status for CallSid: {}", call_sid);
        let data = self.send(self.get(&url), &context).await?;
        Ok(DispatchResult::ok("Call status retrieved successfully", data).with_sid(call_sid))
    }

    /// Send an SMS
    pub async fn send_sms(&self, request: &SmsRequest) -> Result<DispatchResult> {
        let from = Self::sender(&request.from, &self.phone_number);
        require_e164("to", &request.to)?;
        require_e164("from", from)?;
        require_text("body", &request.body)?;
        require_url("statusCallback", request.status_callback.as_deref())?;
        require_url("mediaUrl", request.media_url.as_deref())?;

        info!("Sending SMS from {} to {}", from, request.to);

        let mut form = vec![
            ("To", request.to.trim().to_string()),
            ("From", from.to_string()),
            ("Body", request.body.clone()),
            (
                "StatusCallback",
                request
                    .status_callback
                    .clone()
                    .unwrap_or_else(|| self.callback("/twilio/sms-status")),
            ),
        ];
        if let Some(media) = &request.media_url {
            form.push(("MediaUrl", media.clone()));
        }

        let url = format!("{}/Messages.json", self.account_url());
        let data = self
            .send(self.post_form(&url, &form), "Failed to send SMS")
            .await?;
        Ok(DispatchResult::ok("SMS sent successfully", data))
    }

    /// Fetch a message resource (SMS or WhatsApp)
    pub async fn message_status(&self, message_sid: &str) -> Result<DispatchResult> {
        require_resource_id("messageSid", message_sid)?;
        debug!("Fetching message status for {}", message_sid);
        let url = format!("{}/Messages/{}.json", self.account_url(), message_sid);
        let context = format!("Failed to get SMS status for MessageSid: {}", message_sid);
        let data = self.send(self.get(&url), &context).await?;
        Ok(DispatchResult::ok("SMS status retrieved successfully", data).with_sid(message_sid))
    }

    /// Send a WhatsApp message. Both addresses get the `whatsapp:` prefix.
    pub async fn send_whatsapp(&self, request: &WhatsAppRequest) -> Result<DispatchResult> {
        let to = require_whatsapp("to", &request.to)?;
        let from = require_whatsapp("from", Self::sender(&request.from, &self.whatsapp_number))?;
        require_text("body", &request.body)?;
        require_url("statusCallback", request.status_callback.as_deref())?;
        require_url("mediaUrl", request.media_url.as_deref())?;

        info!("Sending WhatsApp from {} to {}", from, to);

        let status_callback = request
            .status_callback
            .clone()
            .unwrap_or_else(|| self.callback("/twilio/whatsapp-status"));
        let data = self
            .post_whatsapp(&to, &from, &request.body, request.media_url.as_deref(), &status_callback)
            .await?;
        Ok(DispatchResult::ok("WhatsApp message sent successfully", data))
    }

    async fn post_whatsapp(
        &self,
        to: &str,
        from: &str,
        body: &str,
        media_url: Option<&str>,
        status_callback: &str,
    ) -> Result<Value> {
        let mut form = vec![
            ("To", to.to_string()),
            ("From", from.to_string()),
            ("Body", body.to_string()),
            ("StatusCallback", status_callback.to_string()),
        ];
        if let Some(media) = media_url {
            form.push(("MediaUrl", media.to_string()));
        }

        let url = format!("{}/Messages.json", self.account_url());
        self.send(self.post_form(&url, &form), "Failed to send WhatsApp message")
            .await
    }

    /// Send one WhatsApp message to each recipient, in order.
    ///
    /// Sends are sequential with a pause between consecutive recipients.
    /// A bad number or a rejected send is recorded and the batch moves on.
    pub async fn send_bulk_whatsapp(&self, request: &BulkWhatsAppRequest) -> Result<DispatchResult> {
        if request.phone_numbers.is_empty() {
            return Err(TwilioError::Validation(
                "phoneNumbers must contain at least one number".to_string(),
            ));
        }
        let from = require_whatsapp("from", Self::sender(&request.from, &self.whatsapp_number))?;
        require_text("body", &request.body)?;
        require_url("statusCallback", request.status_callback.as_deref())?;
        require_url("mediaUrl", request.media_url.as_deref())?;

        let delay = request
            .delay_secs()
            .map(Duration::from_secs)
            .unwrap_or(self.bulk_delay);
        let status_callback = request
            .status_callback
            .clone()
            .unwrap_or_else(|| self.callback("/twilio/whatsapp-status"));
        let total = request.phone_numbers.len();

        info!("Sending bulk WhatsApp to {} numbers", total);

        let mut report = BulkReport::new(total);
        for (i, number) in request.phone_numbers.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            debug!("Sending WhatsApp {}/{} to {}", i + 1, total, number);

            let to = match require_whatsapp("phoneNumber", number) {
                Ok(to) => to,
                Err(e) => {
                    warn!("Skipping {}: {}", number, e);
                    report.record_failure(number, json!(e.to_string()));
                    continue;
                }
            };

            match self
                .post_whatsapp(&to, &from, &request.body, request.media_url.as_deref(), &status_callback)
                .await
            {
                Ok(payload) => report.record_success(number, &payload),
                Err(e) => {
                    warn!("Failed to send WhatsApp to {}: {}", number, e);
                    let detail = match e {
                        TwilioError::Provider(p) => p.details.unwrap_or(json!(p.message)),
                        other => json!(other.to_string()),
                    };
                    report.record_failure(number, detail);
                }
            }
        }

        let result = report.into_result("Bulk WhatsApp");
        info!("{}", result.message);
        Ok(result)
    }

    /// Account resource
    pub async fn account_info(&self) -> Result<DispatchResult> {
        let url = format!("{}.json", self.account_url());
        let data = self.send(self.get(&url), "Failed to get account info").await?;
        Ok(DispatchResult::ok("Account info retrieved successfully", data).with_sid(&self.account_sid))
    }

    /// Numbers owned by the account
    pub async fn phone_numbers(&self) -> Result<DispatchResult> {
        let url = format!("{}/IncomingPhoneNumbers.json", self.account_url());
        let data = self.send(self.get(&url), "Failed to get phone numbers").await?;
        Ok(DispatchResult {
            sid: None,
            ..DispatchResult::ok("Phone numbers retrieved successfully", data)
        })
    }

    /// Local numbers available for purchase in `country` (ISO 3166 alpha-2)
    pub async fn available_numbers(&self, country: &str) -> Result<DispatchResult> {
        let country = country.trim().to_uppercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TwilioError::Validation(format!(
                "country must be a two-letter code, got '{}'",
                country
            )));
        }

        let url = format!("{}/AvailablePhoneNumbers/{}/Local.json", self.account_url(), country);
        let context = format!("Failed to get available numbers for {}", country);
        let data = self
            .send(self.get(&url).query(&[("PageSize", "10")]), &context)
            .await?;
        Ok(DispatchResult {
            sid: None,
            ..DispatchResult::ok(
                format!("Available numbers for {} retrieved successfully", country),
                data,
            )
        })
    }

    /// Account type, status and balance
    pub async fn trial_info(&self) -> Result<DispatchResult> {
        let context = "Failed to get trial information";
        let account = self
            .send(self.get(&format!("{}.json", self.account_url())), context)
            .await?;
        let balance = self
            .send(self.get(&format!("{}/Balance.json", self.account_url())), context)
            .await?;

        let data = json!({
            "isTrial": account.get("type").and_then(Value::as_str) == Some("Trial"),
            "status": account.get("status").cloned().unwrap_or(Value::Null),
            "dateCreated": account.get("date_created").cloned().unwrap_or(Value::Null),
            "account": account,
            "balance": balance,
        });
        Ok(DispatchResult {
            sid: None,
            ..DispatchResult::ok("Trial information retrieved successfully", data)
        })
    }
}
