//! Shared handles to digital objects
//!
//! A digital object is placed in one div of a structural map and may also be
//! listed in several file groups. Every placement holds a clone of the same
//! handle, so the object is shared rather than owned. Handles compare by
//! identity, not by content.

use crate::structure::digital_object::DigitalObject;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Single-threaded shared handle to a [`DigitalObject`]
#[derive(Clone)]
pub struct DigitalObjectHandle(Rc<RefCell<DigitalObject>>);

/// Read guard for a digital object
pub type ObjectReadGuard<'a> = Ref<'a, DigitalObject>;

/// Write guard for a digital object
pub type ObjectWriteGuard<'a> = RefMut<'a, DigitalObject>;

impl DigitalObjectHandle {
    /// Wrap a digital object in a new handle
    pub fn new(object: DigitalObject) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Shared borrow of the object
    pub fn read(&self) -> ObjectReadGuard<'_> {
        self.0.borrow()
    }

    /// Mutable borrow of the object
    pub fn write(&self) -> ObjectWriteGuard<'_> {
        self.0.borrow_mut()
    }

    /// Run a closure with read access to the object
    pub fn read_with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DigitalObject) -> R,
    {
        let guard = self.read();
        f(&guard)
    }

    /// Whether both handles point to the same object
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl From<DigitalObject> for DigitalObjectHandle {
    fn from(object: DigitalObject) -> Self {
        Self::new(object)
    }
}

impl PartialEq for DigitalObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DigitalObjectHandle {}

impl Hash for DigitalObjectHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for DigitalObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => f.debug_tuple("DigitalObjectHandle").field(&object.path()).finish(),
            Err(_) => f.write_str("DigitalObjectHandle(<borrowed>)"),
        }
    }
}
