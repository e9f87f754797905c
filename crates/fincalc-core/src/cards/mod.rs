pub mod payoff;
