//! Fixed-capacity ring buffer read by age.
//!
//! [`ShiftRegister`] keeps the last `capacity` pushed values. `at(0)` is the
//! most recent push, `at(k)` the value pushed `k` pushes earlier. The buffer is
//! allocated once at construction; `push` and `at` never allocate.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Ring buffer indexed by age.
///
/// # Example
///
/// ```rust
/// use blockwork_blocks::ShiftRegister;
///
/// let mut reg = ShiftRegister::new(4);
/// reg.push(1.0f32);
/// reg.push(2.0);
/// assert_eq!(reg.at(0), 2.0);
/// assert_eq!(reg.at(1), 1.0);
/// assert_eq!(reg.at(3), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ShiftRegister<T> {
    data: Vec<T>,
    position: usize,
}

impl<T: Copy + Default> ShiftRegister<T> {
    /// Creates a register holding `capacity` default values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "shift register capacity must be > 0");
        Self {
            data: vec![T::default(); capacity],
            position: 0,
        }
    }

    /// Number of values retained.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Pushes a value, dropping the oldest.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.position = (self.position + 1) % self.data.len();
        self.data[self.position] = value;
    }

    /// Value pushed `age` pushes ago (`0` is the latest).
    ///
    /// # Panics
    ///
    /// Panics if `age >= capacity`.
    #[inline]
    pub fn at(&self, age: usize) -> T {
        assert!(age < self.data.len(), "age {age} exceeds capacity {}", self.data.len());
        let index = if age <= self.position {
            self.position - age
        } else {
            self.position + self.data.len() - age
        };
        self.data[index]
    }

    /// Value pushed `age` pushes ago, or `None` past the capacity.
    pub fn get(&self, age: usize) -> Option<T> {
        (age < self.data.len()).then(|| self.at(age))
    }

    /// Resets every slot to the default value.
    pub fn clear(&mut self) {
        self.data.fill(T::default());
        self.position = 0;
    }
}
