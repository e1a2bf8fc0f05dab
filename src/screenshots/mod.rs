//! Screenshots and the sessions they belong to.
//!
//! Screenshots are files named `<epoch-ms>-<label>.png`, the label naming the project and task
//! that were running. [resolver] maps them back onto sessions; [timeline] builds analytics from
//! the file names alone.

pub mod artifact;
pub mod capture;
pub mod resolver;
pub mod source;
pub mod timeline;
