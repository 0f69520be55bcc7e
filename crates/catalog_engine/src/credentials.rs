/// Supplies the `Authorization` header value for outgoing requests.
pub trait CredentialProvider: Send + Sync {
    fn authorization(&self) -> Option<String>;
}

/// Anonymous access; the public listing needs no credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn authorization(&self) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken").finish_non_exhaustive()
    }
}

impl CredentialProvider for BearerToken {
    fn authorization(&self) -> Option<String> {
        if self.token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.token))
        }
    }
}
