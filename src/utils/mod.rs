pub mod auth_header;
pub mod http_client;
pub mod request_id;
