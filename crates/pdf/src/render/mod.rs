pub mod outline;
pub mod overlay;
