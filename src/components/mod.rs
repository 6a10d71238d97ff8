//! UI components.

pub mod entity_network;
mod mention_display;
mod mention_input;

pub use mention_display::MentionDisplay;
pub use mention_input::MentionInput;
