//! Pipeline stages of one OCR invocation.
//!
//! Each submodule implements exactly one step, so each can be tested
//! against a mock server on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ upload ──▶ poll
//! (GET URL)  (multipart, 429 retry)  (status loop + page assembly)
//! ```
//!
//! 1. [`input`] : download the PDF into memory and check its content type
//! 2. [`upload`]: submit the bytes, retrying only on HTTP 429
//! 3. [`poll`]  : wait for a terminal status and join the page Markdown

pub mod input;
pub mod poll;
pub mod upload;
