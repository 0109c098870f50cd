pub mod action;
pub mod calculators;
pub mod context;
pub mod effects;
pub mod engine;
pub mod observer;
pub mod playback;
pub mod rewards;
pub mod status;
pub mod targeting;

#[cfg(test)]
pub(crate) mod tests;
