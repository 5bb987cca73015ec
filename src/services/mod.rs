pub mod account_service;
pub mod clock;
pub mod notifier;
pub mod token_issuer;
pub mod token_store;
pub mod token_sweeper;
pub mod token_validator;

#[cfg(test)]
pub mod testing;
