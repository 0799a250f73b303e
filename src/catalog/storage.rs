use std::sync::Mutex;

/// Interior-mutable storage cell shared between the host application and
/// the server.
///
/// Every access acquires the cell's lock for exactly one value's worth of
/// work (a copy in, a copy out, or one in-place closure) and releases it on
/// every exit path. Reads of a cell therefore observe the most recent
/// completed write; no ordering is implied across two distinct cells.
pub struct SharedCell<T>(Mutex<T>);

impl<T> SharedCell<T> {
    pub const fn new(value: T) -> Self {
        Self(Mutex::new(value))
    }

    /// Run `f` on the value inside the critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }
}

impl<T: Copy> SharedCell<T> {
    pub fn get(&self) -> T {
        *self.0.lock().unwrap()
    }

    pub fn set(&self, value: T) {
        *self.0.lock().unwrap() = value;
    }
}

/// Backing storage for a string-shaped property: the text plus its declared
/// byte capacity. The capacity bounds writes: a stored value is always
/// strictly shorter than the capacity, mirroring a fixed-size character
/// buffer on the host.
pub struct TextValue {
    text: String,
    capacity: usize,
}

impl TextValue {
    pub const fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Replace the stored text. Rejected (returning `false`, storage
    /// unchanged) unless `s` is strictly shorter than the capacity.
    pub fn assign(&mut self, s: &str) -> bool {
        if s.len() >= self.capacity {
            return false;
        }
        // First write sizes the allocation to the declared capacity, so
        // later writes never reallocate while the cell is locked.
        if self.text.capacity() < self.capacity {
            self.text.reserve(self.capacity - self.text.len());
        }
        self.text.clear();
        self.text.push_str(s);
        true
    }
}
