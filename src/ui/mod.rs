/// Presentation layer: side/top panels and the central dashboard.
pub mod panels;
pub mod plot;
