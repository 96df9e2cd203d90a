pub mod chatbot;
pub mod fallback;
pub mod llm;
pub mod responder;
pub mod session_manager;
