mod connection_handler;
mod location_payload;
mod location_payload_deserializer;
mod server_loop;

pub use connection_handler::HandlerConfig;
pub use server_loop::{LocationServer, ServerState};
