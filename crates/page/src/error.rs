use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid {region} selector {selector:?}: {reason}")]
    InvalidSelector {
        region: &'static str,
        selector: String,
        reason: String,
    },

    #[error("Script injection failed: {0}")]
    Injection(String),

    #[error("Script injection failed: unsupported page URL {0}")]
    UnsupportedUrl(String),
}

impl PageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PageError::InvalidSelector { .. } => "A page selector in your config is not valid CSS.",
            PageError::Injection(_) => "Could not read the exercise page. Reload it and try again.",
            PageError::UnsupportedUrl(_) => "Only http(s) and file pages can be read.",
        }
    }
}

impl From<reqwest::Error> for PageError {
    fn from(e: reqwest::Error) -> Self {
        PageError::Injection(e.to_string())
    }
}

impl From<std::io::Error> for PageError {
    fn from(e: std::io::Error) -> Self {
        PageError::Injection(e.to_string())
    }
}

pub type PageResult<T> = Result<T, PageError>;
