pub mod configuration;
pub mod gps;
pub mod nmea;
pub mod transport;

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;
