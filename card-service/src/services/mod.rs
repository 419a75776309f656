pub mod art;
pub mod cards;
pub mod dispatcher;
pub mod formatter;
pub mod message;
pub mod metrics;
pub mod prompts;
pub mod providers;

pub use art::ArtFinalizer;
pub use cards::{image_file_name, CardService, ConfirmOutcome};
pub use dispatcher::EmailDispatcher;
pub use formatter::{
    format_result, format_to_html, sanitize_message_html, ResultTemplate, ATTRIBUTION,
};
pub use message::MessageFinalizer;
pub use self::metrics::{get_metrics, init_metrics};
