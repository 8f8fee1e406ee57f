//! Builders for intake payloads and configurations.

#![allow(dead_code)]

use inquiry_desk::config::Config;
use inquiry_desk::inquiry::{NewInquiry, NumberingStrategy};

/// Builder for `NewInquiry` payloads. Starts from a complete, valid form.
pub struct InquiryBuilder {
    inner: NewInquiry,
}

impl InquiryBuilder {
    pub fn new(name: &str) -> Self {
        let handle = name.to_lowercase().replace(' ', ".");
        Self {
            inner: NewInquiry {
                name: Some(name.to_string()),
                phone: Some("5551234567".to_string()),
                email: Some(format!("{}@example.com", handle)),
                address: Some("1 Main St".to_string()),
                comment: None,
            },
        }
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.inner.phone = Some(phone.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.inner.email = Some(email.to_string());
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.inner.address = Some(address.to_string());
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.inner.comment = Some(comment.to_string());
        self
    }

    pub fn without_address(mut self) -> Self {
        self.inner.address = None;
        self
    }

    pub fn build(self) -> NewInquiry {
        self.inner
    }
}

/// Builder for `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn strategy(mut self, strategy: NumberingStrategy) -> Self {
        self.config.numbering.strategy = strategy;
        self
    }

    pub fn limits(mut self, default_limit: u32, max_limit: u32) -> Self {
        self.config.pagination.default_limit = default_limit;
        self.config.pagination.max_limit = max_limit;
        self
    }

    pub fn api_prefix(mut self, prefix: &str) -> Self {
        self.config.server.api_prefix = prefix.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    /// Serializes the config the way it would be written to disk.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.config).expect("config serializes")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
