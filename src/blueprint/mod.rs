pub mod codec;
pub mod graph;
pub mod model;
