//! Portfolio page collaborators.
//!
//! These sit next to the viewer rather than inside it: the menu table decides
//! which clip a label plays and what the answer box shows, the chat and voice
//! clients talk to their HTTP backends, and the edge scroller moves the bottom
//! menu.

pub mod chat;
pub mod menu;
pub mod scroll;
pub mod voice;

pub use chat::{ChatAnswer, ChatReply, ChatRequest, ChatSource, TrackEvent};
pub use menu::{MenuAction, MenuResponse, MenuTable, greeting};
pub use scroll::{EdgeScroll, clamp_scroll, edge_scroll_delta};
pub use voice::{VoiceReply, VoiceRequest};

#[cfg(feature = "http")]
pub use chat::ChatClient;
#[cfg(feature = "http")]
pub use voice::VoiceClient;

#[cfg(feature = "http")]
async fn post_json(endpoint: &str, body: &serde_json::Value) -> crate::errors::Result<ehttp::Response> {
    let mut request = ehttp::Request::post(endpoint, serde_json::to_vec(body)?);
    request.headers.insert("Content-Type", "application/json");
    ehttp::fetch_async(request).await.map_err(crate::errors::ViewerError::HttpError)
}
