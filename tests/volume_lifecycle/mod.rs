//! Step definitions and scenarios for volume lifecycle behaviour.

mod bdd_steps;
mod scenarios;
mod test_helpers;
