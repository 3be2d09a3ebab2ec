pub mod frontend_messages;
