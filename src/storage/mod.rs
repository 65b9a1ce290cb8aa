//! Durable client-side state. The only thing the desk persists is the chat
//! conversation history; everything else lives on the server.

pub mod history;
