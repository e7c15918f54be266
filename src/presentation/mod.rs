//! Presentation layer - view state for chat screens.

pub mod chat_presenter;

pub use chat_presenter::{ChatPresenter, ChatState, CONNECTION_ERROR_MESSAGE};
