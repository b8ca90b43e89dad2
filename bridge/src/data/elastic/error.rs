use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Store configuration error: {0}")]
    Config(String),

    #[error("Store response is not valid JSON: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl StoreError {
    pub fn status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}
