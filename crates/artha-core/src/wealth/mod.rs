pub mod goals;
pub mod net_worth;
