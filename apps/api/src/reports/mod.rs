// Analysis reports: the assessment trigger's output, PDF rendering, and the
// filtered listing/download/delete surface used by HR.

pub mod filters;
pub mod handlers;
pub mod queries;
pub mod render;
