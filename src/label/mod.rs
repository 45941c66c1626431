pub mod layout;
pub mod markup;
pub mod request;

pub use layout::{select_layout, LabelSizeId, LayoutSpec};
pub use markup::render_markup;
pub use request::{CheckinLabels, LabelFields, LabelRequest, ValidationError};
