use session::model::SessionId;

/// Carries the session identifier between requests, e.g. in a cookie.
///
/// The gate never sees the wire format; it only reads the identifier from an
/// inbound request and asks for it to be attached to or cleared from the
/// outbound response.
pub trait SessionTransport: Send + Sync {
    type Request: Sync + ?Sized;
    type Response: Send + ?Sized;

    fn identifier(&self, request: &Self::Request) -> Option<SessionId>;

    fn attach(&self, response: &mut Self::Response, id: &SessionId);

    fn clear(&self, response: &mut Self::Response);
}
