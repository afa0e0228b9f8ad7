//! Pure data shaping for the views, plus the HTML drawing step.

pub mod columns;
pub mod feed;
pub mod html;
pub mod table;
