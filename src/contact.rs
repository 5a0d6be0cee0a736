use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactError {
    MissingName,
    MissingEmail,
    InvalidEmail,
    MissingMessage,
    AlreadySubmitting,
    AlreadySent,
    NotSubmitting,
}

impl ContactError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingName => "name is required",
            Self::MissingEmail => "email is required",
            Self::InvalidEmail => "email address looks invalid",
            Self::MissingMessage => "message is required",
            Self::AlreadySubmitting => "a submission is already in flight",
            Self::AlreadySent => "message was already sent",
            Self::NotSubmitting => "no submission is in flight",
        }
    }
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ContactError {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
    Sent,
}

impl FormState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Sent => "sent",
        }
    }
}

impl ContactFields {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingName);
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ContactError::MissingEmail);
        }
        if !looks_like_email(email) {
            return Err(ContactError::InvalidEmail);
        }

        if self.message.trim().is_empty() {
            return Err(ContactError::MissingMessage);
        }

        Ok(())
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
}

/// Form lifecycle: a successful submission moves to `Sent` exactly once and
/// there is no retry path out of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    state: FormState,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn begin_submit(&mut self, fields: &ContactFields) -> Result<(), ContactError> {
        match self.state {
            FormState::Submitting => return Err(ContactError::AlreadySubmitting),
            FormState::Sent => return Err(ContactError::AlreadySent),
            FormState::Editing => {}
        }

        fields.validate()?;
        self.state = FormState::Submitting;
        Ok(())
    }

    /// Returns `true` only for the call that performs the transition to `Sent`.
    pub fn complete(&mut self, delivered: bool) -> Result<bool, ContactError> {
        if self.state != FormState::Submitting {
            return Err(ContactError::NotSubmitting);
        }

        self.state = if delivered {
            FormState::Sent
        } else {
            FormState::Editing
        };
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactFields {
        ContactFields {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello there".to_string(),
        }
    }

    #[test]
    fn required_fields_are_checked_in_order() {
        let mut fields = ContactFields::default();
        assert_eq!(fields.validate(), Err(ContactError::MissingName));

        fields.name = "Ada".to_string();
        assert_eq!(fields.validate(), Err(ContactError::MissingEmail));

        fields.email = "not-an-email".to_string();
        assert_eq!(fields.validate(), Err(ContactError::InvalidEmail));

        fields.email = "ada@example.com".to_string();
        assert_eq!(fields.validate(), Err(ContactError::MissingMessage));

        fields.message = "hi".to_string();
        assert_eq!(fields.validate(), Ok(()));
    }

    #[test]
    fn successful_submission_transitions_to_sent_once() {
        let mut form = ContactForm::new();

        form.begin_submit(&filled()).expect("valid fields should submit");
        assert_eq!(form.state(), FormState::Submitting);
        assert_eq!(form.begin_submit(&filled()), Err(ContactError::AlreadySubmitting));

        assert_eq!(form.complete(true), Ok(true));
        assert_eq!(form.state(), FormState::Sent);
        assert_eq!(form.complete(true), Err(ContactError::NotSubmitting));
        assert_eq!(form.begin_submit(&filled()), Err(ContactError::AlreadySent));
    }

    #[test]
    fn failed_delivery_returns_to_editing_without_retry() {
        let mut form = ContactForm::new();

        form.begin_submit(&filled()).expect("valid fields should submit");
        assert_eq!(form.complete(false), Ok(false));
        assert_eq!(form.state(), FormState::Editing);
    }

    #[test]
    fn invalid_fields_keep_form_editable() {
        let mut form = ContactForm::new();
        let fields = ContactFields {
            email: "a b@example.com".to_string(),
            ..filled()
        };

        assert_eq!(form.begin_submit(&fields), Err(ContactError::InvalidEmail));
        assert_eq!(form.state(), FormState::Editing);
    }
}
