//! Fault isolation for rendering
//!
//! A [`FaultBoundary`] wraps one child render so a panic inside it takes
//! down only that subtree. The boundary records a [`FaultReport`], draws a
//! fallback screen in the child's place, and offers bounded retry, full
//! reset, and a navigate-home escape hatch. Siblings keep rendering
//! normally; nothing crosses the boundary upward.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use ratatui::crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::Frame;

pub mod capture;
pub mod view;
pub mod wrap;

pub use capture::{current_component_trace, raise_fault, FaultReport, TraceScope};
pub use wrap::{Component, Guarded};

use capture::{payload_message, take_panic_context, RenderGuard};

/// Retries a boundary allows before demanding a reset.
pub const MAX_RETRIES: u8 = 3;

type FallbackFn = Box<dyn FnMut(&mut Frame<'_>, Rect, &FaultState)>;
type FaultHandler = Box<dyn FnMut(&FaultReport)>;
type NavigateHome = Box<dyn FnMut()>;

/// Recovery state of one boundary.
#[derive(Debug, Default)]
pub struct FaultState {
    fault: Option<FaultReport>,
    retry_count: u8,
}

impl FaultState {
    pub fn is_failed(&self) -> bool {
        self.fault.is_some()
    }

    pub fn fault(&self) -> Option<&FaultReport> {
        self.fault.as_ref()
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    pub fn attempts_left(&self) -> u8 {
        MAX_RETRIES.saturating_sub(self.retry_count)
    }

    pub(crate) fn record(&mut self, report: FaultReport) {
        self.fault = Some(report);
    }

    /// Clear the fault and consume one retry. The retry counter survives
    /// until [`reset`](Self::reset) so repeated failures cannot loop forever.
    pub(crate) fn clear_for_retry(&mut self) -> bool {
        if self.fault.is_some() && self.retry_count < MAX_RETRIES {
            self.fault = None;
            self.retry_count += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset(&mut self) {
        self.fault = None;
        self.retry_count = 0;
    }
}

/// Fault-isolation wrapper for a child render.
pub struct FaultBoundary {
    child_name: String,
    state: FaultState,
    fallback: Option<FallbackFn>,
    on_fault: Option<FaultHandler>,
    on_navigate_home: Option<NavigateHome>,
}

impl FaultBoundary {
    pub fn new(child_name: impl Into<String>) -> Self {
        Self {
            child_name: child_name.into(),
            state: FaultState::default(),
            fallback: None,
            on_fault: None,
            on_navigate_home: None,
        }
    }

    /// Replace the default fallback screen.
    pub fn with_fallback(
        mut self,
        fallback: impl FnMut(&mut Frame<'_>, Rect, &FaultState) + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Observe every captured fault, e.g. to forward it to an external
    /// reporter. A handler that panics is contained here.
    pub fn with_fault_handler(mut self, handler: impl FnMut(&FaultReport) + 'static) -> Self {
        self.on_fault = Some(Box::new(handler));
        self
    }

    /// Action for the home escape hatch.
    pub fn with_navigate_home(mut self, navigate: impl FnMut() + 'static) -> Self {
        self.on_navigate_home = Some(Box::new(navigate));
        self
    }

    pub fn child_name(&self) -> &str {
        &self.child_name
    }

    pub fn state(&self) -> &FaultState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    pub fn fault(&self) -> Option<&FaultReport> {
        self.state.fault()
    }

    pub fn attempts_left(&self) -> u8 {
        self.state.attempts_left()
    }

    /// Draw the child, or the fallback screen when the boundary is failed.
    ///
    /// The child runs under [`catch_unwind`] with this boundary's name on
    /// the component trace stack. A panic marks the boundary failed and the
    /// fallback is drawn over the child's area in the same frame.
    pub fn render_child<F>(&mut self, frame: &mut Frame<'_>, area: Rect, child: F)
    where
        F: FnOnce(&mut Frame<'_>, Rect),
    {
        if self.state.is_failed() {
            self.render_fallback(frame, area);
            return;
        }

        let outcome = {
            let _guard = RenderGuard::enter();
            let _scope = TraceScope::enter(self.child_name.clone());
            catch_unwind(AssertUnwindSafe(|| child(frame, area)))
        };

        if let Err(payload) = outcome {
            self.capture(payload);
            self.render_fallback(frame, area);
        }
    }

    /// Clear the fault so the child renders again. Returns false when the
    /// boundary is not failed or retries are exhausted.
    pub fn retry(&mut self) -> bool {
        self.state.clear_for_retry()
    }

    /// Clear the fault and restore the full retry allowance.
    pub fn reset(&mut self) {
        self.state.reset()
    }

    /// Invoke the navigate-home action, when one was provided. Does not
    /// touch the fault state; the host decides what leaving the view means.
    pub fn navigate_home(&mut self) {
        if let Some(navigate) = self.on_navigate_home.as_mut() {
            navigate();
        }
    }

    /// Recovery keys while failed: `r` retry, `R` reset, `h` home. Returns
    /// true when the key was consumed. A boundary that is not failed
    /// consumes nothing.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if !self.state.is_failed() {
            return false;
        }
        match key {
            KeyCode::Char('r') => {
                self.retry();
                true
            }
            KeyCode::Char('R') => {
                self.reset();
                true
            }
            KeyCode::Char('h') => {
                self.navigate_home();
                true
            }
            _ => false,
        }
    }

    fn render_fallback(&mut self, frame: &mut Frame<'_>, area: Rect) {
        match self.fallback.as_mut() {
            Some(custom) => custom(frame, area, &self.state),
            None => view::render_default_fallback(frame, area, &self.state),
        }
    }

    fn capture(&mut self, payload: Box<dyn Any + Send>) {
        let message = payload_message(payload.as_ref());
        let (location, backtrace, component_trace) = match take_panic_context() {
            Some(context) => (
                context.location,
                context.backtrace,
                context.component_trace,
            ),
            None => (None, None, current_component_trace()),
        };
        let report = FaultReport {
            message,
            location,
            backtrace,
            component_trace,
        };

        tracing::error!(
            error = %report.message,
            location = report.location.as_deref().unwrap_or("unknown"),
            retry_count = self.state.retry_count(),
            backtrace = report.backtrace.as_deref().unwrap_or(""),
            "boundary caught a rendering fault\n{}",
            report.component_trace
        );

        if let Some(handler) = self.on_fault.as_mut() {
            // Handler panics stay contained.
            let _guard = RenderGuard::enter();
            if catch_unwind(AssertUnwindSafe(|| handler(&report))).is_err() {
                take_panic_context();
                tracing::error!("fault handler panicked; ignoring");
            }
        }

        self.state.record(report);
    }
}
