//! course-feedback — a single-page course feedback form.
//!
//! The server owns the form state and renders it as a DOM snapshot. Browsers
//! post UI actions to `/actions/:action` and receive fresh snapshots over SSE.
//! A valid submission is inserted into the backend store and the stored row
//! becomes the "latest feedback" shown under the form.

pub mod config;
pub mod controller;
pub mod display;
pub mod entry;
pub mod error;
pub mod form;
pub mod notify;
pub mod page;
pub mod server;
pub mod store;
pub mod view;
