//! Helpers for recording values onto the current span

use std::fmt::Display;

use tracing::Span;

/// Record a field on the current span after it has been created
///
/// The field must be declared (possibly empty) in the span's `fields(..)`
/// list, otherwise the record is a no-op
pub fn backfill_trace_field<T: Display>(field: &str, value: T) {
    Span::current().record(field, value.to_string());
}
