//! Peripheral drivers and one-shot hardware initialisation.

pub mod adc;
pub mod dht11;
pub mod hw_init;
pub mod relay;
pub mod servo;
