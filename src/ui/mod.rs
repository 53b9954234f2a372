//! Presentation: side panel, top bar and one module per tab.

pub mod charts;
pub mod map;
pub mod panels;
pub mod predict;
pub mod table;
