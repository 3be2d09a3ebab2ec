pub mod appstate;
pub mod gain;
pub mod http;
pub mod messages;
pub mod store;
pub mod surface;
