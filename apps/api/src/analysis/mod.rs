//! Decision support for bidders: deterministic win-probability estimates
//! from historical award data, and LLM-backed bid analysis.

pub mod bid_analysis;
pub mod handlers;
pub mod prompts;
pub mod win_probability;
