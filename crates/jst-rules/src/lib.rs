//! The rule engine: a `Rule` trait matched against entry-kind paths through
//! a `RuleTrie`, decoupled from any concrete emission buffer so that
//! `jst-emit` (which supplies the buffer) can depend on this crate instead
//! of the other way around.

pub mod rule;
pub mod trie;

pub use rule::{BasicRule, DefaultRule, Rule, RuleBuffer};
pub use trie::RuleTrie;
