//! Typed representations of API wire objects.

mod params;
mod resource;

pub use params::{MediaType, PreviewSize, SortField, SortKey};
pub use resource::{decode_resource, decode_resources, JsonObject, Link, Resource, ResourceType};
