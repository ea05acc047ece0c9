//! Commodity balance constraints for OSeMOSYS-style energy system models.
//!
//! The heart of the crate is [`commodity_balance::add_commodity_balance_constraints`], which adds
//! balance laws between paired commodities (e.g. generated and final electricity) to an
//! [`model::OptimisationModel`]. The remaining modules provide the labelled linear expressions
//! those laws are written in, input loading and a small CLI for checking a model's production
//! against its balances.
pub mod check;
pub mod cli;
pub mod commodity;
pub mod commodity_balance;
pub mod dataset;
pub mod expression;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod settings;

#[cfg(test)]
mod fixture;
