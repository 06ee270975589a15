//! Notification mail for workflow events
//!
//! Delivery is best-effort: callers log failures and never let them fail
//! the workflow operation that triggered the notice.

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    workflow::{ApplicationKind, ApprovalDecision},
};

#[derive(Clone)]
pub struct NotifyService {
    config: EmailConfig,
}

impl NotifyService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Tell the first-stage officer a new application awaits their review
    pub async fn application_submitted(
        &self,
        to: &str,
        kind: ApplicationKind,
        application_id: i32,
        applicant_name: &str,
    ) -> AppResult<()> {
        let subject = format!("Application #{} awaits your review", application_id);
        let noun = match kind {
            ApplicationKind::Email => "email account application",
            ApplicationKind::Loan => "equipment loan application",
        };
        let body = format!(
            r#"
{applicant} submitted {noun} #{id}.

Please review it in StaffDesk.
"#,
            applicant = applicant_name,
            noun = noun,
            id = application_id
        );

        self.send_email(to, &subject, &body).await
    }

    /// Tell the applicant their application was decided
    pub async fn application_decided(
        &self,
        to: &str,
        kind: ApplicationKind,
        application_id: i32,
        decision: ApprovalDecision,
        comments: Option<&str>,
    ) -> AppResult<()> {
        let noun = match kind {
            ApplicationKind::Email => "email account application",
            ApplicationKind::Loan => "equipment loan application",
        };
        let subject = format!("Your {} #{} was {}", noun, application_id, decision);
        let body = format!(
            r#"
Your {noun} #{id} was {decision}.

{comments}
"#,
            noun = noun,
            id = application_id,
            decision = decision,
            comments = comments.unwrap_or("")
        );

        self.send_email(to, &subject, &body).await
    }

    /// Tell the applicant their mailbox is ready
    pub async fn mailbox_ready(&self, to: &str, assigned_email: &str) -> AppResult<()> {
        let subject = "Your requested mailbox has been created";
        let body = format!(
            r#"
Your new mailbox is ready: {assigned}

You can sign in with your existing directory credentials.
"#,
            assigned = assigned_email
        );

        self.send_email(to, subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("StaffDesk");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
