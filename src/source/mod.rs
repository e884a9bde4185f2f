pub mod frame;
pub mod images;
pub mod media;
