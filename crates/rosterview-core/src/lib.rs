//! Core types: date ranges, week pagination, roster events, aggregation

pub mod aggregate;
pub mod error;
pub mod event;
pub mod time;
pub mod tracing;
pub mod weeks;

pub use aggregate::{
    AggregateByEvent, AggregateByRegistrar, FilterConfig, UNASSIGNED_NAME, aggregate_by_event,
    aggregate_by_registrar, total_count,
};
pub use error::ConfigError;
pub use event::{EVENT_TIME_FORMAT, Event, StaffAssignment};
pub use time::{DATE_FORMAT, DateRange, WeekRange};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use weeks::generate_weeks;
