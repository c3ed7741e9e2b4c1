use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, ThemeError};

/// Shared Ctrl-C flag, checked between pipeline steps.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Install the process-wide Ctrl-C handler.
    ///
    /// The first signal marks the run as interrupted; a second one while a
    /// blocking step is still running exits right away.
    pub fn install() -> std::result::Result<Self, ctrlc::Error> {
        let flag = Self::default();
        let handler = flag.clone();
        ctrlc::set_handler(move || {
            if handler.trigger() {
                eprintln!("error: {}", ThemeError::Interrupted);
                std::process::exit(i32::from(ThemeError::Interrupted.exit_code()));
            }
        })?;
        Ok(flag)
    }

    /// Mark as interrupted. Returns whether it already was.
    pub fn trigger(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            return Err(ThemeError::Interrupted);
        }
        Ok(())
    }
}
