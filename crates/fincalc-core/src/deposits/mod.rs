pub mod compound;
pub mod ppf;
