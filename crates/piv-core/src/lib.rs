pub mod consts;
pub mod correlate;
pub mod error;
pub mod field;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod postprocess;
