pub mod analysis;
pub mod lenient;
pub mod profile;
pub mod recommendation;
