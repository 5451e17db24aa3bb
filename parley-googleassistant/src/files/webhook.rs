use parley_build::{FileContent, GeneratedFile};
use serde_json::json;

/// `webhooks/<name>.yaml`, routing every registered intent handler to the
/// project endpoint.
pub struct Webhook<'a> {
    pub name: &'a str,
    pub endpoint: &'a str,
    path: String,
}

impl<'a> Webhook<'a> {
    pub fn new(name: &'a str, endpoint: &'a str) -> Self {
        Self {
            name,
            endpoint,
            path: format!("webhooks/{}.yaml", name),
        }
    }
}

impl GeneratedFile for Webhook<'_> {
    fn path(&self) -> &str {
        &self.path
    }

    fn content(&self) -> FileContent {
        FileContent::Data(json!({
            "handlers": [{ "name": self.name }],
            "httpsEndpoint": { "baseUrl": self.endpoint },
        }))
    }
}
