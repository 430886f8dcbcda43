//! Form components for the membership wizard

mod field_renderer;

pub use field_renderer::{draw_field, field_height, FieldView};
