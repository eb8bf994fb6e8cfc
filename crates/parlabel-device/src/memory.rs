//! Device memory
//!
//! Device buffers are arrays of 32-bit atomic words. A typed element spans
//! [`DeviceScalar::WORDS`] consecutive words, so an `f64` buffer of `n`
//! elements occupies `2n` words. Because storage is untyped underneath, a
//! buffer can be viewed as another element type with
//! [`DeviceBuffer::alias`]; this is how scratch space is borrowed from an
//! output buffer that has not been written yet.
//!
//! Every access is a relaxed atomic operation. Ordering between kernels is
//! provided by the launch barrier, not by the individual accesses.

use crate::error::{DeviceError, DeviceResult};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

/// Element type storable in device memory
pub trait DeviceScalar: Copy + Send + Sync + 'static {
    /// Number of 32-bit words per element
    const WORDS: usize;

    /// Read one element from `words[..WORDS]`
    fn load(words: &[AtomicU32]) -> Self;

    /// Write one element to `words[..WORDS]`
    fn store(self, words: &[AtomicU32]);
}

macro_rules! impl_scalar_1word {
    ($($t:ty => |$v:ident| $to:expr, |$w:ident| $from:expr;)*) => {
        $(
            impl DeviceScalar for $t {
                const WORDS: usize = 1;

                #[inline]
                fn load(words: &[AtomicU32]) -> Self {
                    let $w = words[0].load(Ordering::Relaxed);
                    $from
                }

                #[inline]
                fn store(self, words: &[AtomicU32]) {
                    let $v = self;
                    words[0].store($to, Ordering::Relaxed);
                }
            }
        )*
    };
}

impl_scalar_1word! {
    u32 => |v| v, |w| w;
    i32 => |v| v as u32, |w| w as i32;
    u16 => |v| v as u32, |w| w as u16;
    u8 => |v| v as u32, |w| w as u8;
    bool => |v| v as u32, |w| w != 0;
    f32 => |v| v.to_bits(), |w| f32::from_bits(w);
}

impl DeviceScalar for u64 {
    const WORDS: usize = 2;

    #[inline]
    fn load(words: &[AtomicU32]) -> Self {
        let lo = words[0].load(Ordering::Relaxed) as u64;
        let hi = words[1].load(Ordering::Relaxed) as u64;
        (hi << 32) | lo
    }

    #[inline]
    fn store(self, words: &[AtomicU32]) {
        words[0].store(self as u32, Ordering::Relaxed);
        words[1].store((self >> 32) as u32, Ordering::Relaxed);
    }
}

impl DeviceScalar for f64 {
    const WORDS: usize = 2;

    #[inline]
    fn load(words: &[AtomicU32]) -> Self {
        f64::from_bits(u64::load(words))
    }

    #[inline]
    fn store(self, words: &[AtomicU32]) {
        self.to_bits().store(words);
    }
}

/// An allocation in device memory
///
/// Created through [`Device::alloc`](crate::Device::alloc) or
/// [`Device::upload`](crate::Device::upload). Buffers are `Sync`: kernels
/// share them by reference and write through atomics.
pub struct DeviceBuffer<T> {
    words: Box<[AtomicU32]>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: DeviceScalar> DeviceBuffer<T> {
    /// Allocate a zero-filled buffer of `len` elements
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Allocation`] if the word count overflows or the
    /// host allocator refuses the request.
    pub fn try_zeroed(len: usize) -> DeviceResult<Self> {
        let requested = len.checked_mul(T::WORDS).ok_or(DeviceError::Allocation {
            requested: usize::MAX,
            limit: usize::MAX,
        })?;
        let mut words = Vec::new();
        words
            .try_reserve_exact(requested)
            .map_err(|_| DeviceError::Allocation {
                requested,
                limit: usize::MAX,
            })?;
        words.extend((0..requested).map(|_| AtomicU32::new(0)));
        Ok(Self {
            words: words.into_boxed_slice(),
            len,
            _marker: PhantomData,
        })
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size in 32-bit words
    #[inline]
    pub fn words(&self) -> usize {
        self.words.len()
    }

    /// Typed view of the whole buffer
    #[inline]
    pub fn slice(&self) -> DeviceSlice<'_, T> {
        DeviceSlice::new(&self.words)
    }

    /// View the same storage as elements of type `U`
    ///
    /// The view covers `words() / U::WORDS` elements. Writes through the
    /// alias clobber the original contents.
    #[inline]
    pub fn alias<U: DeviceScalar>(&self) -> DeviceSlice<'_, U> {
        DeviceSlice::new(&self.words)
    }

    /// Host-to-device copy
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transfer`] if `src.len() != self.len()`.
    pub fn copy_from_host(&self, src: &[T]) -> DeviceResult<()> {
        if src.len() != self.len {
            return Err(DeviceError::Transfer {
                expected: self.len,
                actual: src.len(),
            });
        }
        let dst = self.slice();
        for (i, &v) in src.iter().enumerate() {
            dst.store(i, v);
        }
        Ok(())
    }

    /// Device-to-host copy
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transfer`] if `dst.len() != self.len()`.
    pub fn copy_to_host(&self, dst: &mut [T]) -> DeviceResult<()> {
        if dst.len() != self.len {
            return Err(DeviceError::Transfer {
                expected: self.len,
                actual: dst.len(),
            });
        }
        let src = self.slice();
        for (i, v) in dst.iter_mut().enumerate() {
            *v = src.load(i);
        }
        Ok(())
    }

    /// Device-to-host copy into a new vector
    pub fn to_host(&self) -> Vec<T> {
        self.slice().to_vec()
    }
}

impl<T> fmt::Debug for DeviceBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("type", &std::any::type_name::<T>())
            .field("len", &self.len)
            .field("words", &self.words.len())
            .finish()
    }
}

/// Borrowed typed window onto device memory, handed to kernels
///
/// Out-of-bounds accesses panic, which the device reports as a kernel fault.
pub struct DeviceSlice<'a, T> {
    words: &'a [AtomicU32],
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> Clone for DeviceSlice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DeviceSlice<'_, T> {}

impl<'a, T: DeviceScalar> DeviceSlice<'a, T> {
    fn new(words: &'a [AtomicU32]) -> Self {
        Self {
            words,
            len: words.len() / T::WORDS,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn element(&self, i: usize) -> &'a [AtomicU32] {
        assert!(
            i < self.len,
            "device access out of bounds: index {} >= {}",
            i,
            self.len
        );
        &self.words[i * T::WORDS..(i + 1) * T::WORDS]
    }

    #[inline]
    pub fn load(&self, i: usize) -> T {
        T::load(self.element(i))
    }

    #[inline]
    pub fn store(&self, i: usize, value: T) {
        value.store(self.element(i));
    }

    /// Copy the window to the host
    pub fn to_vec(&self) -> Vec<T> {
        (0..self.len).map(|i| self.load(i)).collect()
    }
}

impl<'a> DeviceSlice<'a, u32> {
    /// Atomic minimum, returns the previous value
    #[inline]
    pub fn fetch_min(&self, i: usize, value: u32) -> u32 {
        self.element(i)[0].fetch_min(value, Ordering::Relaxed)
    }

    /// Atomic add, returns the previous value
    #[inline]
    pub fn fetch_add(&self, i: usize, value: u32) -> u32 {
        self.element(i)[0].fetch_add(value, Ordering::Relaxed)
    }
}

/// A fixed-size module global living in device memory
///
/// Kernels set and clear it; the host observes it only through
/// [`Device::read_global`](crate::Device::read_global), which is a
/// device-to-host transfer.
#[derive(Debug)]
pub struct DeviceGlobal {
    name: &'static str,
    word: AtomicU32,
}

impl DeviceGlobal {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            word: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Device-side OR-write. Idempotent, any number of threads may race.
    #[inline]
    pub fn raise(&self, bits: u32) {
        self.word.fetch_or(bits, Ordering::Relaxed);
    }

    /// Device-side reset to zero
    #[inline]
    pub fn clear(&self) {
        self.word.store(0, Ordering::Relaxed);
    }

    /// Device-side read
    #[inline]
    pub fn value(&self) -> u32 {
        self.word.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let buf = DeviceBuffer::<f64>::try_zeroed(3).unwrap();
        assert_eq!(buf.words(), 6);
        buf.copy_from_host(&[1.5, -2.0, 1e300]).unwrap();
        assert_eq!(buf.to_host(), vec![1.5, -2.0, 1e300]);

        let flags = DeviceBuffer::<bool>::try_zeroed(2).unwrap();
        flags.slice().store(1, true);
        assert_eq!(flags.to_host(), vec![false, true]);
    }

    #[test]
    fn test_alias_shares_storage() {
        let out = DeviceBuffer::<f64>::try_zeroed(4).unwrap();
        let scratch = out.alias::<u32>();
        assert_eq!(scratch.len(), 8);
        scratch.store(0, 7);
        scratch.store(7, 9);
        assert_eq!(scratch.load(0), 7);

        // Overwriting through the typed view clobbers the alias
        out.slice().store(0, 3.0);
        assert_ne!(scratch.load(0), 7);
        assert_eq!(out.slice().load(0), 3.0);
    }

    #[test]
    fn test_transfer_mismatch() {
        let buf = DeviceBuffer::<u32>::try_zeroed(4).unwrap();
        let err = buf.copy_from_host(&[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Transfer {
                expected: 4,
                actual: 3
            }
        ));
        let mut host = vec![0u32; 5];
        assert!(buf.copy_to_host(&mut host).is_err());
    }

    #[test]
    fn test_atomics() {
        let buf = DeviceBuffer::<u32>::try_zeroed(1).unwrap();
        let s = buf.slice();
        s.store(0, 10);
        assert_eq!(s.fetch_min(0, 4), 10);
        assert_eq!(s.fetch_min(0, 8), 4);
        assert_eq!(s.fetch_add(0, 3), 4);
        assert_eq!(s.load(0), 7);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let buf = DeviceBuffer::<u32>::try_zeroed(2).unwrap();
        buf.slice().load(2);
    }

    #[test]
    fn test_global() {
        let g = DeviceGlobal::new("d_modified");
        assert_eq!(g.value(), 0);
        g.raise(1);
        g.raise(1);
        assert_eq!(g.value(), 1);
        g.clear();
        assert_eq!(g.value(), 0);
        assert_eq!(g.name(), "d_modified");
    }
}
