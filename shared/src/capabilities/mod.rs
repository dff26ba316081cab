//! Capabilities used by the core.
//!
//! We use Crux's built-in Render and Http capabilities directly; the shell
//! performs the requests and resolves them back into events.

mod http;

pub use self::http::{read_body, HttpError, ValidatedUrl, MAX_URL_LENGTH};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
