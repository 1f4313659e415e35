//! In-app alert feed. Rows are written by the matching batch and the
//! billing success path; the only mutation here is the read flag.

pub mod handlers;
