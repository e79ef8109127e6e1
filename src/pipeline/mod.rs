//! Pipeline stages shared by every conversion route.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ stage ──▶ converter ──▶ postprocess
//! (validate,  (temp     (external,    (entity decoding,
//!  fetch)      file)     blocking)     word count)
//! ```
//!
//! 1. [`input`] checks the allow-list, picks the suffix and fetches remote documents
//! 2. [`stage`] writes bytes to a request-owned [`stage::TransientFile`]
//! 3. The converter (see [`crate::converter`]) runs on the blocking pool
//! 4. [`postprocess`] decodes HTML character references and counts words

pub mod input;
pub mod postprocess;
pub mod stage;
