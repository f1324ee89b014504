pub mod config;
pub mod connection;
pub mod exception;
pub mod negotiate;
pub mod param;
pub mod query;
pub mod render;
pub mod request;
pub mod response;
pub mod server;
pub mod util;

pub use config::Config;
pub use connection::{handle_connection, Connection, ConnectionState};
pub use exception::Exception;
pub use negotiate::{negotiate, Negotiation};
pub use query::parse_query;
pub use render::Representation;
pub use request::{read_request, ParsedRequest};
pub use response::Response;
pub use server::Server;
pub use util::HtmlBuilder;
