pub type SpanwallResult<T> = Result<T, SpanwallError>;

#[derive(thiserror::Error, Debug)]
pub enum SpanwallError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("image error: {0}")]
    Image(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpanwallError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}
