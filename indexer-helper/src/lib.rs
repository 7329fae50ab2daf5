#[cfg(feature = "magnet")]
pub mod magnet;
#[cfg(feature = "numeric")]
pub mod numeric;
