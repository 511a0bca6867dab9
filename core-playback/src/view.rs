//! Weak binding between the session and the view currently showing it.

use bridge_traits::{PlayerView, ViewId};
use std::rc::{Rc, Weak};

/// Non-owning handle to the bound [`PlayerView`].
///
/// The host owns its views; the session must never extend their lifetime.
/// Every callback that touches the view goes through [`ViewBinding::live`],
/// which yields nothing once the view is dropped or reports itself dead.
#[derive(Clone)]
pub struct ViewBinding {
    id: ViewId,
    view: Weak<dyn PlayerView>,
}

impl ViewBinding {
    pub fn new(view: &Rc<dyn PlayerView>) -> Self {
        Self {
            id: view.id(),
            view: Rc::downgrade(view),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn is_bound_to(&self, id: ViewId) -> bool {
        self.id == id
    }

    /// Upgrade to a strong handle if the view still exists and is alive.
    pub fn live(&self) -> Option<Rc<dyn PlayerView>> {
        let view = self.view.upgrade()?;
        view.is_alive().then_some(view)
    }
}

impl std::fmt::Debug for ViewBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBinding")
            .field("id", &self.id)
            .field("alive", &self.live().is_some())
            .finish()
    }
}
