#![cfg_attr(not(test), no_std)]

pub mod key;

pub use key::CompositeKey;
