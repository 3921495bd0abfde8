//! Fault capture
//!
//! Turns panics escaping a guarded render into structured reports. A
//! process-wide panic hook records the panic location (and, in debug builds,
//! a backtrace) into a thread-local slot, but only while a guarded render is
//! in flight on that thread. Panics anywhere else keep the previous hook's
//! behavior.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic;
use std::sync::Once;

thread_local! {
    static GUARD_DEPTH: Cell<usize> = Cell::new(0);
    static LAST_PANIC: RefCell<Option<CapturedPanic>> = RefCell::new(None);
    static COMPONENT_STACK: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

static HOOK: Once = Once::new();

/// What the panic hook saw at the moment of a guarded panic. The component
/// trace is snapshotted here because unwinding pops [`TraceScope`]s before
/// the boundary regains control.
pub(crate) struct CapturedPanic {
    pub(crate) location: Option<String>,
    pub(crate) backtrace: Option<String>,
    pub(crate) component_trace: String,
}

/// Structured description of a fault caught at a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
    /// Failure message extracted from the panic payload.
    pub message: String,
    /// Source location of the panic, when the runtime reported one.
    pub location: Option<String>,
    /// Captured backtrace; debug builds only.
    pub backtrace: Option<String>,
    /// Rendering stack at the moment of failure, innermost component first.
    pub component_trace: String,
}

/// Panic payload used by [`raise_fault`] so a boundary can recover the
/// original message without formatting noise around it.
pub(crate) struct ReportedFault {
    pub(crate) message: String,
}

/// Log a failure and raise it toward the nearest enclosing boundary.
///
/// For code paths that have no caller to return an error to, such as deep
/// inside a render. The failure is logged immediately so it is recorded even
/// when nothing is guarding the call.
pub fn raise_fault(error: impl fmt::Display, detail: Option<&str>) -> ! {
    match detail {
        Some(detail) => tracing::error!(%error, detail, "fault raised toward boundary"),
        None => tracing::error!(%error, "fault raised toward boundary"),
    }
    panic::panic_any(ReportedFault {
        message: error.to_string(),
    })
}

/// RAII marker placing a component name on the thread's trace stack for the
/// duration of its render. Nested scopes yield innermost-first traces.
pub struct TraceScope {
    _private: (),
}

impl TraceScope {
    pub fn enter(name: impl Into<String>) -> Self {
        COMPONENT_STACK.with(|stack| stack.borrow_mut().push(name.into()));
        Self { _private: () }
    }
}

impl Drop for TraceScope {
    fn drop(&mut self) {
        COMPONENT_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Component trace for the current thread, innermost scope first, one
/// indented `in <name>` line per component.
pub fn current_component_trace() -> String {
    COMPONENT_STACK.with(|stack| {
        stack
            .borrow()
            .iter()
            .rev()
            .map(|name| format!("    in {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Marks a guarded render as in flight on this thread. Installs the panic
/// hook on first use.
pub(crate) struct RenderGuard {
    _private: (),
}

impl RenderGuard {
    pub(crate) fn enter() -> Self {
        install_hook();
        GUARD_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self { _private: () }
    }
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        GUARD_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let guarded = GUARD_DEPTH.with(|depth| depth.get() > 0);
            if !guarded {
                previous(info);
                return;
            }

            // Backtrace capture is costly; only debug builds surface it.
            let backtrace = if cfg!(debug_assertions) {
                Some(Backtrace::force_capture().to_string())
            } else {
                None
            };
            let context = CapturedPanic {
                location: info.location().map(|loc| loc.to_string()),
                backtrace,
                component_trace: current_component_trace(),
            };
            LAST_PANIC.with(|slot| {
                *slot.borrow_mut() = Some(context);
            });
        }));
    });
}

/// Context the hook recorded for the most recent guarded panic on this
/// thread. Clears the slot.
pub(crate) fn take_panic_context() -> Option<CapturedPanic> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}

/// Best-effort message extraction from a panic payload.
pub(crate) fn payload_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(fault) = payload.downcast_ref::<ReportedFault>() {
        fault.message.clone()
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "An unexpected error occurred".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn trace_scopes_nest_innermost_first() {
        let _outer = TraceScope::enter("App");
        assert_eq!(current_component_trace(), "    in App");

        {
            let _inner = TraceScope::enter("ChatPanel");
            assert_eq!(
                current_component_trace(),
                "    in ChatPanel\n    in App"
            );
        }

        assert_eq!(current_component_trace(), "    in App");
    }

    #[test]
    fn empty_trace_is_empty_string() {
        assert_eq!(current_component_trace(), "");
    }

    #[test]
    fn payload_message_handles_common_payload_shapes() {
        let static_str: Box<dyn Any + Send> = Box::new("static panic");
        assert_eq!(payload_message(static_str.as_ref()), "static panic");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned panic"));
        assert_eq!(payload_message(owned.as_ref()), "owned panic");

        let reported: Box<dyn Any + Send> = Box::new(ReportedFault {
            message: "reported".into(),
        });
        assert_eq!(payload_message(reported.as_ref()), "reported");

        let opaque: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(
            payload_message(opaque.as_ref()),
            "An unexpected error occurred"
        );
    }

    #[test]
    fn raise_fault_carries_its_message_through_the_panic() {
        let _guard = RenderGuard::enter();
        let payload = catch_unwind(AssertUnwindSafe(|| {
            raise_fault("database handle poisoned", Some("while saving"))
        }))
        .unwrap_err();

        assert_eq!(payload_message(payload.as_ref()), "database handle poisoned");
    }
}
