//! Shared utilities: image loading and tracing setup.

pub mod image;

pub use image::{dynamic_to_rgb, load_rgb_image};

/// Initializes tracing with the standard environment-filtered subscriber.
///
/// Call once at startup; respects `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
