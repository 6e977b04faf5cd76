#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Nebula Event Bus
//!
//! Generic in-process pub/sub used to hand events back to the scheduler and
//! engine without either side holding a direct reference to the other. Two
//! producers use this today: the HIL timeout watcher (§4.3/§5) publishes
//! `HilTimeoutElapsed` once an interaction's deadline passes, and the cron
//! runner (§4.3.4) publishes `CronFired` at each job's scheduled tick.
//! Both are consumed by whatever drives the scheduler's main loop.
//!
//! [`EventBus<T>`] is generic over the event payload rather than baking in a
//! fixed event enum: it carries no knowledge of workflows, executions, or
//! cron jobs. Built on `tokio::sync::broadcast`, so emission is
//! fire-and-forget and every live subscriber gets its own clone of each
//! event.

mod bus;

pub use bus::{BackpressurePolicy, EventBus, EventSubscriber, RecvError, RecvOutcome};
