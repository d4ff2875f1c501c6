pub mod growth;
pub mod loans;
pub mod planning;
pub mod tax;
