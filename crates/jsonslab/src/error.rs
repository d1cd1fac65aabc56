use alloc::collections::TryReserveError;

use thiserror::Error;

/// The global allocator declined a storage reservation.
///
/// Every fallible constructor and mutating operation in this crate reports
/// failure through this one type. The operation that returned it has already
/// released any partial work; the receiver (if any) is still valid and
/// unchanged.
///
/// Contract violations (see the `# Panics` sections on individual methods)
/// are not reported this way: they panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("allocation failed")]
pub struct AllocError;

impl From<TryReserveError> for AllocError {
    fn from(_: TryReserveError) -> Self {
        AllocError
    }
}
