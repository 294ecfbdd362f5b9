//! Strided byte views.
//!
//! A strided view is a 2D view on a byte slice: `len` rows of `width` bytes
//! each, with consecutive rows `stride` bytes apart. The stride is signed and
//! may be zero (every row aliases the first) or negative (rows are walked
//! backwards). Views are bounds-checked once at construction, after which
//! row access is plain slicing.

use crate::error::{MeshError, MeshResult};

/// Check that every row of a view lies inside `size` bytes.
fn check_bounds(
    size: usize,
    offset: usize,
    len: usize,
    width: usize,
    stride: isize,
) -> MeshResult<()> {
    if len == 0 {
        return Ok(());
    }
    let first = offset as i128;
    let last = first + (len as i128 - 1) * stride as i128;
    let lo = first.min(last);
    let hi = first.max(last) + width as i128;
    if lo < 0 || hi > size as i128 {
        return Err(MeshError::ViewOutOfBounds { len, size });
    }
    Ok(())
}

#[inline]
fn row_start(offset: usize, stride: isize, index: usize) -> usize {
    (offset as isize + index as isize * stride) as usize
}

/// Immutable strided view on bytes.
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a> {
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    width: usize,
    stride: isize,
}

impl<'a> StridedView<'a> {
    /// Create a view of `len` rows of `width` bytes, starting `offset` bytes
    /// into `bytes`.
    pub fn new(
        bytes: &'a [u8],
        offset: usize,
        len: usize,
        width: usize,
        stride: isize,
    ) -> MeshResult<Self> {
        check_bounds(bytes.len(), offset, len, width, stride)?;
        Ok(Self {
            bytes,
            offset,
            len,
            width,
            stride,
        })
    }

    /// View a tightly packed slice of plain values, one row per value.
    pub fn from_slice<T: bytemuck::Pod>(values: &'a [T]) -> Self {
        let size = std::mem::size_of::<T>();
        Self {
            bytes: bytemuck::cast_slice(values),
            offset: 0,
            len: values.len(),
            width: size,
            stride: size as isize,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Byte distance between consecutive rows.
    pub fn stride(&self) -> isize {
        self.stride
    }

    /// `(rows, bytes per row)`.
    pub fn size(&self) -> (usize, usize) {
        (self.len, self.width)
    }

    /// Byte offset of the first row in the backing slice.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole backing slice.
    pub fn backing(&self) -> &'a [u8] {
        self.bytes
    }

    /// Get row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn row(&self, index: usize) -> &'a [u8] {
        assert!(
            index < self.len,
            "row {index} out of range for {} rows",
            self.len
        );
        let start = row_start(self.offset, self.stride, index);
        &self.bytes[start..start + self.width]
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.len).map(move |i| self.row(i))
    }

    /// Copy all rows into `dst`, row by row.
    ///
    /// # Panics
    ///
    /// Panics if the two views don't have the same size.
    pub fn copy_into(&self, dst: &mut StridedViewMut<'_>) {
        assert_eq!(
            self.size(),
            dst.size(),
            "strided copy between views of different sizes"
        );
        for i in 0..self.len {
            dst.row_mut(i).copy_from_slice(self.row(i));
        }
    }
}

/// Mutable strided view on bytes.
#[derive(Debug)]
pub struct StridedViewMut<'a> {
    bytes: &'a mut [u8],
    offset: usize,
    len: usize,
    width: usize,
    stride: isize,
}

impl<'a> StridedViewMut<'a> {
    /// Create a mutable view, see [`StridedView::new`].
    pub fn new(
        bytes: &'a mut [u8],
        offset: usize,
        len: usize,
        width: usize,
        stride: isize,
    ) -> MeshResult<Self> {
        check_bounds(bytes.len(), offset, len, width, stride)?;
        Ok(Self {
            bytes,
            offset,
            len,
            width,
            stride,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Byte distance between consecutive rows.
    pub fn stride(&self) -> isize {
        self.stride
    }

    /// `(rows, bytes per row)`.
    pub fn size(&self) -> (usize, usize) {
        (self.len, self.width)
    }

    /// Byte offset of the first row in the backing slice.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn row(&self, index: usize) -> &[u8] {
        assert!(
            index < self.len,
            "row {index} out of range for {} rows",
            self.len
        );
        let start = row_start(self.offset, self.stride, index);
        &self.bytes[start..start + self.width]
    }

    /// Get row `index` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn row_mut(&mut self, index: usize) -> &mut [u8] {
        assert!(
            index < self.len,
            "row {index} out of range for {} rows",
            self.len
        );
        let start = row_start(self.offset, self.stride, index);
        &mut self.bytes[start..start + self.width]
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> StridedView<'_> {
        StridedView {
            bytes: &*self.bytes,
            offset: self.offset,
            len: self.len,
            width: self.width,
            stride: self.stride,
        }
    }
}
