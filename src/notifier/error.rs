#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NotifierError {
    #[error("SMS gateway request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("SMS gateway rejected message with status {status}: {body}")]
    GatewayError { status: u16, body: String },
}
