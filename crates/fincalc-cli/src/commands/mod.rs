pub mod cards;
pub mod deposits;
pub mod format;
pub mod investments;
pub mod loans;
