mod rate_limit;

pub use rate_limit::{CounterStore, FixedWindowCounter, RateLimit, rate_limit_middleware};
