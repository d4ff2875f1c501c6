pub mod advance_tax;
pub mod presumptive;
pub mod regimes;
pub mod slabs;
