pub mod amortization;
pub mod prepayment;
