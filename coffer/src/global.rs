//! Process-wide default container, for top-level bootstrap code which has no
//! better place to hold one. Everything else should receive its container
//! explicitly through its own construction.

use crate::container::Container;
use std::sync::{Arc, Mutex, PoisonError};

/// Handle to a container guarded for cross-thread use.
pub type SharedContainer = Arc<Mutex<Container>>;

static INSTANCE: Mutex<Option<SharedContainer>> = Mutex::new(None);

/// Returns the process-wide container, creating a default one on first
/// access.
pub fn get_instance() -> SharedContainer {
    let mut guard = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .get_or_insert_with(|| Arc::new(Mutex::new(Container::default())))
        .clone()
}

/// Replaces the process-wide container; `None` clears it so the next access
/// creates a fresh default.
pub fn set_instance(container: Option<SharedContainer>) {
    let mut guard = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = container;
}

#[cfg(test)]
mod tests {
    use crate::global::{get_instance, set_instance, SharedContainer};
    use std::sync::Arc;

    #[test]
    fn should_hand_out_the_replaceable_default_container() {
        let custom: SharedContainer = Default::default();
        set_instance(Some(custom.clone()));
        assert!(Arc::ptr_eq(&custom, &get_instance()));

        set_instance(None);
        let fresh = get_instance();
        assert!(!Arc::ptr_eq(&custom, &fresh));
        assert!(Arc::ptr_eq(&fresh, &get_instance()));
    }
}
