use crate::reminder::TrackedAction;
use crate::shared::entity::ID;
use url::form_urlencoded;

/// Builds the tracking URLs embedded in a rendered reminder. Correlation is
/// purely by the opaque attempt id carried in the `id` query parameter.
#[derive(Debug, Clone)]
pub struct TrackingLinks<'a> {
    base: &'a str,
    attempt_id: &'a ID,
}

impl<'a> TrackingLinks<'a> {
    /// `base` is the public tracking endpoint prefix, e.g.
    /// `https://skifte.example/api/v1/track`
    pub fn new(base: &'a str, attempt_id: &'a ID) -> Self {
        Self {
            base: base.trim_end_matches('/'),
            attempt_id,
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}?id={}", self.base, name, self.attempt_id)
    }

    /// URL of the 1x1 open-tracking image
    pub fn open_pixel(&self) -> String {
        self.endpoint("open")
    }

    /// Wraps an outbound destination so the click is recorded before the
    /// recipient is redirected
    pub fn click(&self, destination: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(destination.as_bytes()).collect();
        format!("{}&url={}", self.endpoint("click"), encoded)
    }

    /// Link requesting a callback or an offer on behalf of the recipient
    pub fn action(&self, action: TrackedAction) -> String {
        format!("{}&action={}", self.endpoint("action"), action.as_str())
    }
}
