pub mod client;
pub mod errors;
pub mod model;
pub mod path;
pub mod promise;
pub mod transport;
