//! Small shared helpers: collection aliases and id generation.

pub mod collections;
pub mod id_generator;
