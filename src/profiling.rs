//! Counters for structural work and linear scans, plus the slow-operation hook.
//!
//! Counters are process-wide and relaxed; they are for understanding hot paths,
//! not for synchronization.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

pub static SLOW_OPERATIONS: AtomicU64 = AtomicU64::new(0);
pub static COMPACTIONS: AtomicU64 = AtomicU64::new(0);
pub static SPLITS: AtomicU64 = AtomicU64::new(0);
pub static SHIFTS: AtomicU64 = AtomicU64::new(0);
pub static COPY_TASKS: AtomicU64 = AtomicU64::new(0);
pub static LEAF_COPIES: AtomicU64 = AtomicU64::new(0);

/// The linear-time operations that report through the hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlowOperation {
    Contains,
    ContainsSequence,
    IndexOf,
    LastIndexOf,
    ContainsAny,
    ContainsAnyExcluding,
    RemoveValue,
}

static SLOW_OPERATION_HOOK: RwLock<Option<fn(SlowOperation)>> = RwLock::new(None);

/// Install (or with `None`, remove) the callback run before every linear scan.
pub fn set_slow_operation_hook(hook: Option<fn(SlowOperation)>) {
    match SLOW_OPERATION_HOOK.write() {
        Ok(mut slot) => *slot = hook,
        Err(poisoned) => *poisoned.into_inner() = hook,
    }
}

#[inline]
pub fn slow_operation(operation: SlowOperation) {
    SLOW_OPERATIONS.fetch_add(1, Ordering::Relaxed);
    let hook = match SLOW_OPERATION_HOOK.read() {
        Ok(slot) => *slot,
        Err(poisoned) => *poisoned.into_inner(),
    };
    if let Some(hook) = hook {
        hook(operation);
    }
}

#[inline]
pub fn compaction() {
    COMPACTIONS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn split() {
    SPLITS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn shift() {
    SHIFTS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn copy_task() {
    COPY_TASKS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn leaf_copy() {
    LEAF_COPIES.fetch_add(1, Ordering::Relaxed);
}

/// Point-in-time copy of every counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub slow_operations: u64,
    pub compactions: u64,
    pub splits: u64,
    pub shifts: u64,
    pub copy_tasks: u64,
    pub leaf_copies: u64,
}

pub fn snapshot() -> Snapshot {
    return Snapshot {
        slow_operations: SLOW_OPERATIONS.load(Ordering::Relaxed),
        compactions: COMPACTIONS.load(Ordering::Relaxed),
        splits: SPLITS.load(Ordering::Relaxed),
        shifts: SHIFTS.load(Ordering::Relaxed),
        copy_tasks: COPY_TASKS.load(Ordering::Relaxed),
        leaf_copies: LEAF_COPIES.load(Ordering::Relaxed),
    };
}

pub fn reset() {
    SLOW_OPERATIONS.store(0, Ordering::Relaxed);
    COMPACTIONS.store(0, Ordering::Relaxed);
    SPLITS.store(0, Ordering::Relaxed);
    SHIFTS.store(0, Ordering::Relaxed);
    COPY_TASKS.store(0, Ordering::Relaxed);
    LEAF_COPIES.store(0, Ordering::Relaxed);
}

pub fn report() -> String {
    let s = snapshot();
    let per_task = if s.copy_tasks > 0 {
        s.leaf_copies as f64 / s.copy_tasks as f64
    } else {
        0.0
    };
    format!(
        "Slow ops: {}, Compactions: {}, Splits: {}, Shifts: {}, Copy tasks: {} ({:.2} leaf copies/task)",
        s.slow_operations, s.compactions, s.splits, s.shifts, s.copy_tasks, per_task
    )
}
