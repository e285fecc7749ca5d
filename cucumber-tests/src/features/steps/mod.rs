pub mod record_steps;
pub mod server_steps;
