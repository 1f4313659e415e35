//! Consortium formation for joint bids: SMEs pool capacity to qualify
//! for larger tenders.

pub mod handlers;
