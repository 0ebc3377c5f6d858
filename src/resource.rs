use url::Url;

/// Just a wrapper around a base URL and an API token
#[derive(Clone)]
pub struct Resource {
    base_url: Url,
    token: String,
}

impl Resource {
    pub fn new(base_url: Url, token: String) -> Self {
        Self { base_url, token }
    }

    pub fn base_url(&self) -> &Url { &self.base_url }
    pub fn token(&self) -> &str { &self.token }

    /// Build the URL for an endpoint path, keeping the scheme, server and token of `self`
    pub fn endpoint(&self, path: &str) -> Url {
        let mut built = self.base_url.clone();
        built.set_path(path);
        built
    }
}
