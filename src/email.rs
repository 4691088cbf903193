//! Transactional email (Resend REST API, no SDK dependency)

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected the message: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Anything that can deliver an [`EmailMessage`]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Resend-backed mailer; one attempt per message, bounded by the client timeout
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: &str, from: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [message.to],
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Resend API error");
            return Err(MailError::Rejected(format!("{status}: {body}")));
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

// =============================================================================
// Templates
// =============================================================================

const FOOTER: &str = r#"<hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
<p style="color: #999; font-size: 12px;">
    HolidyHours - Making holiday hours simple<br>
    Questions? Reply to this email or contact support@holidyhours.com
</p>"#;

fn button(href: &str, label: &str) -> String {
    format!(
        r#"<p style="margin: 30px 0;">
    <a href="{href}" style="background-color: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">{label}</a>
</p>"#,
        href = escape_html(href),
    )
}

fn layout(body: &str) -> String {
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
<div style="max-width: 600px; margin: 0 auto; padding: 20px;">
<h1 style="color: #2563eb;">HolidyHours</h1>
{body}
{FOOTER}
</div>
</body>
</html>"#
    )
}

/// Magic link that lets the owner edit their page
pub fn magic_link_email(to: &str, business_name: &str, link: &str) -> EmailMessage {
    let name = escape_html(business_name);
    let body = format!(
        r#"<h2>Edit Your Holiday Hours</h2>
<p>Hello,</p>
<p>Click the link below to edit your holiday hours page for <strong>{name}</strong>:</p>
{button}
<p style="color: #666; font-size: 14px;">This link will expire in 24 hours for security reasons.</p>
<p style="color: #666; font-size: 14px;">If you didn't request this link, you can safely ignore this email.</p>"#,
        button = button(link, "Edit My Page"),
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Edit Your {business_name} Holiday Hours - HolidyHours"),
        html: layout(&body),
    }
}

/// Receipt sent once a payment is confirmed; `amount` is in currency subunits
pub fn payment_receipt_email(
    to: &str,
    business_name: &str,
    amount: u64,
    reference: &str,
    page_url: &str,
    date: NaiveDate,
) -> EmailMessage {
    let body = format!(
        r#"<h2>Payment Confirmed!</h2>
<p>Hello,</p>
<p>Thank you for your payment. Your holiday hours page for <strong>{name}</strong> is now live!</p>
<div style="background-color: #f3f4f6; padding: 20px; border-radius: 6px; margin: 20px 0;">
    <h3 style="margin-top: 0;">Payment Details</h3>
    <p style="margin: 5px 0;"><strong>Amount:</strong> ${amount}</p>
    <p style="margin: 5px 0;"><strong>Reference:</strong> {reference}</p>
    <p style="margin: 5px 0;"><strong>Date:</strong> {date}</p>
</div>
{button}
<p>You can edit your page anytime using the magic link we'll send to your email.</p>"#,
        name = escape_html(business_name),
        amount = format_amount(amount),
        reference = escape_html(reference),
        date = date.format("%B %d, %Y"),
        button = button(page_url, "View Your Page"),
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Payment Confirmed - Your Holiday Hours Page is Live!".to_string(),
        html: layout(&body),
    }
}

/// Format a subunit amount as major units with two decimals
fn format_amount(subunits: u64) -> String {
    format!("{}.{:02}", subunits / 100, subunits % 100)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
