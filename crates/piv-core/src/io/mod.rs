pub mod image_io;

pub use image_io::{load_frame_pair, load_image};
