//! Form filling: label variants, the word-box label matcher, fill-position
//! resolution, and the overlay renderer.

pub mod matcher;
pub mod renderer;
pub mod resolver;
pub mod variants;

pub use matcher::find_label;
pub use renderer::{FillEvent, FillInstruction, TextStyle, fill_page, measure_value_width};
pub use resolver::{FillPosition, FillRule, resolve_fill_position};
pub use variants::LabelVariantSet;
