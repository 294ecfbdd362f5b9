//! Raw mesh byte storage with ownership tags.
//!
//! A [`MeshBuffer`] is either owned by the mesh or borrowed from somewhere
//! else. Owned buffers may be moved into an output mesh without copying;
//! borrowed ones are always copied first.

use bitflags::bitflags;

bitflags! {
    /// What a mesh is allowed to do with a buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DataFlags: u8 {
        /// The buffer is owned and can be released or moved elsewhere.
        const OWNED = 1 << 0;
        /// The buffer contents can be modified.
        const MUTABLE = 1 << 1;
    }
}

/// Vertex or index bytes, owned or borrowed.
#[derive(Debug)]
pub enum MeshBuffer<'a> {
    /// Borrowed, read-only bytes.
    Borrowed(&'a [u8]),
    /// Borrowed, writable bytes.
    BorrowedMut(&'a mut [u8]),
    /// Bytes owned by the mesh.
    Owned(Vec<u8>),
}

impl<'a> MeshBuffer<'a> {
    /// Ownership and mutability of the buffer.
    pub fn flags(&self) -> DataFlags {
        match self {
            Self::Borrowed(_) => DataFlags::empty(),
            Self::BorrowedMut(_) => DataFlags::MUTABLE,
            Self::Owned(_) => DataFlags::OWNED | DataFlags::MUTABLE,
        }
    }

    /// Check if the buffer is owned.
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Get the bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Borrowed(bytes) => bytes,
            Self::BorrowedMut(bytes) => &bytes[..],
            Self::Owned(bytes) => bytes.as_slice(),
        }
    }

    /// Get the bytes mutably, `None` for read-only buffers.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            Self::Borrowed(_) => None,
            Self::BorrowedMut(bytes) => Some(&mut bytes[..]),
            Self::Owned(bytes) => Some(bytes.as_mut_slice()),
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Check if the buffer has no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A read-only borrow of the same bytes.
    pub fn borrowed(&self) -> MeshBuffer<'_> {
        MeshBuffer::Borrowed(self.as_slice())
    }

    /// Detach from the borrowed lifetime.
    ///
    /// Owned buffers are moved without copying, borrowed ones are copied.
    pub fn into_owned(self) -> MeshBuffer<'static> {
        match self {
            Self::Owned(bytes) => MeshBuffer::Owned(bytes),
            Self::Borrowed(bytes) => MeshBuffer::Owned(bytes.to_vec()),
            Self::BorrowedMut(bytes) => MeshBuffer::Owned(bytes.to_vec()),
        }
    }
}

impl Default for MeshBuffer<'_> {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

impl From<Vec<u8>> for MeshBuffer<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Owned(bytes)
    }
}

impl<'a> From<&'a [u8]> for MeshBuffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Borrowed(bytes)
    }
}

impl<'a> From<&'a mut [u8]> for MeshBuffer<'a> {
    fn from(bytes: &'a mut [u8]) -> Self {
        Self::BorrowedMut(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let data = [0u8; 4];
        let mut mutable = [0u8; 4];
        assert_eq!(MeshBuffer::Borrowed(&data).flags(), DataFlags::empty());
        assert_eq!(
            MeshBuffer::BorrowedMut(&mut mutable).flags(),
            DataFlags::MUTABLE
        );
        assert_eq!(
            MeshBuffer::Owned(vec![0; 4]).flags(),
            DataFlags::OWNED | DataFlags::MUTABLE
        );
    }

    #[test]
    fn test_as_mut_slice() {
        let data = [1u8, 2];
        assert!(MeshBuffer::Borrowed(&data).as_mut_slice().is_none());

        let mut owned = MeshBuffer::Owned(vec![1, 2]);
        owned.as_mut_slice().unwrap()[0] = 5;
        assert_eq!(owned.as_slice(), &[5, 2]);
    }

    #[test]
    fn test_into_owned_keeps_allocation() {
        let buffer = MeshBuffer::Owned(vec![1, 2, 3]);
        let ptr = buffer.as_slice().as_ptr();
        let owned = buffer.into_owned();
        assert_eq!(owned.as_slice().as_ptr(), ptr);
    }

    #[test]
    fn test_into_owned_copies_borrowed() {
        let data = vec![1u8, 2, 3];
        let owned = MeshBuffer::Borrowed(&data).into_owned();
        assert!(owned.is_owned());
        assert_ne!(owned.as_slice().as_ptr(), data.as_ptr());
        assert_eq!(owned.as_slice(), data.as_slice());
    }
}
