pub type BoothResult<T> = Result<T, BoothError>;

#[derive(thiserror::Error, Debug)]
pub enum BoothError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A source photo could not be decoded. Fatal for that photo's pipeline
    /// invocation; the caller offers a retake instead of substituting a blank.
    #[error("decode error: {0}")]
    Decode(String),

    /// A secondary asset (texture, sticker artwork, template background)
    /// could not be loaded. Callers are expected to degrade gracefully.
    #[error("asset error: {0}")]
    Asset(String),

    #[error("export error: {0}")]
    Export(String),

    /// The checkout integration is missing its configuration (no API key).
    #[error("payment service misconfigured: {0}")]
    PaymentMisconfigured(String),

    /// The checkout provider rejected or failed the request.
    #[error("payment initialization failed: {0}")]
    PaymentProvider(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoothError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            BoothError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(BoothError::decode("x").to_string().contains("decode error:"));
        assert!(BoothError::asset("x").to_string().contains("asset error:"));
        assert!(BoothError::export("x").to_string().contains("export error:"));
    }

    #[test]
    fn payment_variants_are_distinguishable() {
        let a = BoothError::PaymentMisconfigured("no key".to_string()).to_string();
        let b = BoothError::PaymentProvider("HTTP 502".to_string()).to_string();
        assert!(a.contains("misconfigured"));
        assert!(b.contains("initialization failed"));
        assert_ne!(a, b);
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = BoothError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
