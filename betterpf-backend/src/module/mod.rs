pub mod pf;
pub mod scheduled;
