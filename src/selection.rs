//! Shared current-trust selection
//!
//! One logical "current trust code" for the whole application, with
//! synchronous observer notification on every set. This is an explicit
//! context object handed to interested components, not a global.

use parking_lot::RwLock;

/// Trust selected before the user picks anything.
pub const DEFAULT_TRUST_CODE: &str = "RGT";

type Observer = Box<dyn Fn(&str) + Send + Sync>;

/// The process-wide current-trust selection.
pub struct TrustSelection {
    current: RwLock<String>,
    observers: RwLock<Vec<Observer>>,
}

impl TrustSelection {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// The currently selected trust code.
    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    /// Change the selection and synchronously notify every observer.
    ///
    /// Setting the same value again still notifies: consumers re-render on
    /// every set.
    pub fn set(&self, trust_code: &str) {
        {
            let mut current = self.current.write();
            *current = trust_code.to_string();
        }
        for observer in self.observers.read().iter() {
            observer(trust_code);
        }
    }

    /// Register an observer called on every subsequent set.
    pub fn subscribe(&self, observer: impl Fn(&str) + Send + Sync + 'static) {
        self.observers.write().push(Box::new(observer));
    }
}

impl Default for TrustSelection {
    fn default() -> Self {
        Self::new(DEFAULT_TRUST_CODE)
    }
}

impl std::fmt::Debug for TrustSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustSelection")
            .field("current", &self.current())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}
