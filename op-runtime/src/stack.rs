//! The scheduler's heterogeneous stack entry: either a pending Op or an
//! installed continuation handler.
//!
//! Modeled as a sum type rather than via subclassing, per the design
//! notes this scheduler follows: a `StackEntry` is tagged explicitly so
//! the step loop can assert which kind is on top without a downcast.

use op_core::{BoxedDynOp, ErasedHandler};

/// One slot on the scheduler's stack.
pub enum StackEntry {
    /// A pending Op, not yet run (or tail-called into place).
    Op(BoxedDynOp),
    /// A continuation installed by a parent that delegated to a child via
    /// `handle_outcome`. Invoked exactly once, when the child's slot
    /// (immediately above this one) terminates.
    Handler {
        /// The erased handler function itself.
        handler: ErasedHandler,
        /// Name of the Op that installed this handler, for snapshots.
        parent_name: String,
    },
}

impl StackEntry {
    /// The name this entry contributes to a stack snapshot: the Op's own
    /// name, or `Handler<parentName>` for an installed continuation.
    pub fn snapshot_name(&self) -> String {
        match self {
            StackEntry::Op(op) => op.name().to_string(),
            StackEntry::Handler { parent_name, .. } => format!("Handler<{parent_name}>"),
        }
    }
}
