//! Request body records.
//!
//! Every field is optional and only the fields that were set end up in the
//! serialized JSON object. An unset field is absent, never `null`.

use serde::Serialize;

/// Body for `PUT`/`PATCH /api/users/{id}`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
}

/// Body for `POST /api/register`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body for `POST /api/login`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Login {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn builder() -> UpdateUserBuilder {
        UpdateUserBuilder::default()
    }
}

impl Register {
    pub fn builder() -> CredentialsBuilder<Register> {
        CredentialsBuilder::default()
    }
}

impl Login {
    pub fn builder() -> CredentialsBuilder<Login> {
        CredentialsBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct UpdateUserBuilder {
    inner: UpdateUser,
}

impl UpdateUserBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    pub fn job(mut self, job: impl Into<String>) -> Self {
        self.inner.job = Some(job.into());
        self
    }

    pub fn build(self) -> UpdateUser {
        self.inner
    }
}

/// Register and login share the same shape, only the target record differs.
pub trait Credentials: Default {
    fn set_email(&mut self, email: String);
    fn set_password(&mut self, password: String);
}

impl Credentials for Register {
    fn set_email(&mut self, email: String) {
        self.email = Some(email);
    }

    fn set_password(&mut self, password: String) {
        self.password = Some(password);
    }
}

impl Credentials for Login {
    fn set_email(&mut self, email: String) {
        self.email = Some(email);
    }

    fn set_password(&mut self, password: String) {
        self.password = Some(password);
    }
}

#[derive(Debug, Default)]
pub struct CredentialsBuilder<T: Credentials> {
    inner: T,
}

impl<T: Credentials> CredentialsBuilder<T> {
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.inner.set_email(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.inner.set_password(password.into());
        self
    }

    pub fn build(self) -> T {
        self.inner
    }
}
