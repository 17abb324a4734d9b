pub mod direct;
mod dispatcher;
pub mod fft;
pub mod peak;
pub mod sig2noise;
pub mod subpixel;
pub mod window;

pub use dispatcher::{build_correlator, correlate_windows, plane_shape, Correlator};
pub use peak::{find_peak, locate_displacement, Peak, PeakEstimate};
pub use sig2noise::sig2noise;
pub use window::{extract_search_area, extract_window, normalize, Window};
