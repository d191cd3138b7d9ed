//! Contact form state and local submission.
//!
//! # Responsibility
//! - Hold the four contact fields and apply pure field updates.
//! - On submit, suppress default navigation, publish one acknowledgment and
//!   reset the fields.
//!
//! # Invariants
//! - Field updates have no side effects beyond the field itself.
//! - A submit that fails the native field constraints publishes nothing and
//!   keeps the current values.
//! - No message is delivered anywhere; the acknowledgment is local only.

use crate::model::portfolio::Acknowledgment;
use crate::notify::{NotificationBus, NotifyError, PublishReceipt};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Valid e-mail address production used by `<input type="email">`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// One contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    /// Form control `name` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Parses a form control name.
    pub fn parse(value: &str) -> Result<Self, ContactError> {
        match value.trim() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "subject" => Ok(Self::Subject),
            "message" => Ok(Self::Message),
            other => Err(ContactError::UnknownField(other.to_string())),
        }
    }
}

/// Form submission event as delivered by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the host's default page navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Native constraint failures that block a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintViolations {
    /// Required fields with an empty value.
    pub missing: Vec<ContactField>,
    /// Email is present but not a valid address.
    pub invalid_email: bool,
}

impl ConstraintViolations {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && !self.invalid_email
    }
}

/// Outcome of [`ContactForm::submit`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Acknowledgment published and fields reset.
    Sent(PublishReceipt),
    /// Constraints failed; nothing published, fields kept.
    Rejected(ConstraintViolations),
}

/// Contact form errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    UnknownField(String),
    Notify(NotifyError),
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(value) => write!(f, "unknown contact field: `{value}`"),
            Self::Notify(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Notify(err) => Some(err),
            Self::UnknownField(_) => None,
        }
    }
}

impl From<NotifyError> for ContactError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}

/// Contact section form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    email: String,
    subject: String,
    message: String,
    acknowledgment: Acknowledgment,
}

impl ContactForm {
    /// Creates an empty form publishing `acknowledgment` on submit.
    pub fn new(acknowledgment: Acknowledgment) -> Self {
        Self {
            acknowledgment,
            ..Self::default()
        }
    }

    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
        }
    }

    /// Replaces one field value.
    pub fn on_field_change(&mut self, field: ContactField, value: impl Into<String>) {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Replaces one field value addressed by its control name.
    pub fn on_named_change(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ContactError> {
        let field = ContactField::parse(name)?;
        self.on_field_change(field, value);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        ContactField::ALL
            .into_iter()
            .all(|field| self.value(field).is_empty())
    }

    /// Checks `required` on every field and `type="email"` on the email.
    ///
    /// Emptiness follows the native rule: any non-empty value satisfies
    /// `required`. The email value is sanitized (trimmed) first, so an email
    /// made only of whitespace is missing rather than invalid.
    pub fn check_constraints(&self) -> ConstraintViolations {
        let email = self.email.trim();
        let missing = ContactField::ALL
            .into_iter()
            .filter(|field| match field {
                ContactField::Email => email.is_empty(),
                _ => self.value(*field).is_empty(),
            })
            .collect();
        let invalid_email = !email.is_empty() && !EMAIL_RE.is_match(email);
        ConstraintViolations {
            missing,
            invalid_email,
        }
    }

    /// Handles a form submission.
    ///
    /// Always prevents the default navigation. When the constraints hold,
    /// publishes exactly one acknowledgment on `bus` and resets all fields.
    ///
    /// # Errors
    /// - Returns [`ContactError::Notify`] when the bus is closed; the fields
    ///   are kept in that case.
    pub fn submit(
        &mut self,
        event: &mut SubmitEvent,
        bus: &NotificationBus,
    ) -> Result<SubmitOutcome, ContactError> {
        event.prevent_default();

        let violations = self.check_constraints();
        if !violations.is_empty() {
            debug!(
                "event=contact_submit module=contact status=rejected missing={} invalid_email={}",
                violations.missing.len(),
                violations.invalid_email
            );
            return Ok(SubmitOutcome::Rejected(violations));
        }

        let receipt = bus.publish(
            self.acknowledgment.title.clone(),
            self.acknowledgment.description.clone(),
        )?;
        self.reset();
        info!(
            "event=contact_submit module=contact status=ok notification={}",
            receipt.id
        );
        Ok(SubmitOutcome::Sent(receipt))
    }

    fn reset(&mut self) {
        for field in ContactField::ALL {
            self.on_field_change(field, String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactError, ContactField, ContactForm};
    use crate::model::portfolio::Acknowledgment;

    #[test]
    fn parses_known_field_names() {
        for field in ContactField::ALL {
            assert_eq!(ContactField::parse(field.as_str()).expect("known"), field);
        }
        assert_eq!(
            ContactField::parse("phone").unwrap_err(),
            ContactError::UnknownField("phone".to_string())
        );
    }

    #[test]
    fn field_change_touches_only_that_field() {
        let mut form = ContactForm::new(Acknowledgment::default());
        form.on_field_change(ContactField::Subject, "Hola");
        assert_eq!(form.value(ContactField::Subject), "Hola");
        assert_eq!(form.value(ContactField::Name), "");
        assert!(!form.is_empty());
    }

    #[test]
    fn constraints_follow_native_semantics() {
        let mut form = ContactForm::default();
        let violations = form.check_constraints();
        assert_eq!(violations.missing, ContactField::ALL.to_vec());
        assert!(!violations.invalid_email, "empty email is a missing field only");

        form.on_field_change(ContactField::Email, "not-an-address");
        assert!(form.check_constraints().invalid_email);

        form.on_field_change(ContactField::Email, " ada@example.com ");
        assert!(!form.check_constraints().invalid_email);

        form.on_field_change(ContactField::Name, " ");
        assert!(!form.check_constraints().missing.contains(&ContactField::Name));
    }

    #[test]
    fn whitespace_email_is_missing_not_invalid() {
        let mut form = ContactForm::default();
        form.on_field_change(ContactField::Email, "   ");
        let violations = form.check_constraints();
        assert!(violations.missing.contains(&ContactField::Email));
        assert!(!violations.invalid_email);
    }
}
