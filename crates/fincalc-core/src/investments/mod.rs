pub mod roi;
pub mod savings_goal;
pub mod sip;
