// CV fit assessment: prompt, strict response schema, pluggable scorer and the
// HR trigger that turns a scored assessment into a stored PDF report.

pub mod handlers;
pub mod prompts;
pub mod schema;
pub mod scoring;
