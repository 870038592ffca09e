//! Client-side controller for the image-analysis page.
//!
//! A user picks or drops an image, chooses languages and submits it to the
//! analysis backend; the result text is rendered and, when the backend
//! returns a narration URL, the audio is verified before it is offered for
//! playback.

pub mod api;
pub mod config;
pub mod pipeline;
pub mod selection;
pub mod view;
