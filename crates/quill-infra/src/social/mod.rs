//! Social publishing adapters.

mod dry_run;

pub use dry_run::DryRunSocialPublisher;
