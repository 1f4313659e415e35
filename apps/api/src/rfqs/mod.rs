//! Reverse marketplace: buyers post requests-for-quotation that
//! suppliers browse directly. RFQs never enter the matching engine.

pub mod handlers;
