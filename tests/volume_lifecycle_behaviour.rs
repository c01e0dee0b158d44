//! Behavioural scenarios for volume lifecycle reconciliation.

mod volume_lifecycle;
