//! Market data: exchange-rate snapshot and the sources it is loaded from

pub mod fx;
pub mod sources;
