// SPDX-License-Identifier: MIT
//! Zero-copy positions into byte arrays and the bulk-copy primitive
//!
//! An [`ArrayPosition`] is a slice plus a signed offset. It never owns or
//! copies the backing storage; deriving a new position with `+`/`-` only
//! moves the offset, and bounds are checked when an element is touched.
//!
//! Every copy routes to one canonical slice-to-slice copy
//! ([`try_copy_bytes`]). The [`block_copy`] overload set accepts any
//! [`ByteSource`] / [`ByteSink`] flavour (raw slices, positions, segments)
//! and resolves it to `(slice, absolute offset)` first. Copies inside one
//! backing array go through [`copy_within`], which has move semantics.
//!
//! Out-of-range access is a caller bug. The plain forms panic with the
//! [`BufferError`] text; the `try_` forms hand the error back instead.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Range, Sub};

/// Errors raised by buffer addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("index {index} out of range for buffer of length {len}")]
    OutOfRange { index: isize, len: usize },

    #[error("range of {count} bytes at offset {offset} out of range for buffer of length {len}")]
    RangeOutOfRange {
        offset: isize,
        count: usize,
        len: usize,
    },
}

#[inline]
fn resolve_index(offset: isize, idx: usize, len: usize) -> Result<usize, BufferError> {
    let index = offset
        .checked_add_unsigned(idx)
        .ok_or(BufferError::OutOfRange {
            index: isize::MAX,
            len,
        })?;

    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(BufferError::OutOfRange { index, len }),
    }
}

#[inline]
fn resolve_range(offset: isize, count: usize, len: usize) -> Result<Range<usize>, BufferError> {
    let err = BufferError::RangeOutOfRange { offset, count, len };
    let start = usize::try_from(offset).map_err(|_| err)?;
    let end = start.checked_add(count).ok_or(err)?;
    if end > len {
        return Err(err);
    }

    Ok(start..end)
}

#[inline]
fn absolute(base: isize, offset: usize, count: usize, len: usize) -> Result<usize, BufferError> {
    match base.checked_add_unsigned(offset) {
        Some(abs) => usize::try_from(abs).map_err(|_| BufferError::RangeOutOfRange {
            offset: abs,
            count,
            len,
        }),
        None => Err(BufferError::RangeOutOfRange {
            offset: isize::MAX,
            count,
            len,
        }),
    }
}

/// Read-only position into a borrowed array
pub struct ArrayPosition<'a, T> {
    array: &'a [T],
    offset: isize,
}

impl<'a, T> ArrayPosition<'a, T> {
    /// Position `offset` elements into `array`; not bounds-checked here
    pub fn new(array: &'a [T], offset: isize) -> Self {
        Self { array, offset }
    }

    /// The whole backing array, ignoring the offset
    pub fn array(&self) -> &'a [T] {
        self.array
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Element `idx` past this position
    #[inline]
    pub fn get(&self, idx: usize) -> Result<&'a T, BufferError> {
        let i = resolve_index(self.offset, idx, self.array.len())?;
        Ok(&self.array[i])
    }

    /// `count` elements starting at this position
    pub fn slice(&self, count: usize) -> Result<&'a [T], BufferError> {
        let range = resolve_range(self.offset, count, self.array.len())?;
        Ok(&self.array[range])
    }
}

impl<T> Clone for ArrayPosition<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayPosition<'_, T> {}

impl<T> fmt::Debug for ArrayPosition<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayPosition")
            .field("len", &self.array.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> From<&'a [T]> for ArrayPosition<'a, T> {
    fn from(array: &'a [T]) -> Self {
        Self::new(array, 0)
    }
}

impl<T> Index<usize> for ArrayPosition<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &T {
        match self.get(idx) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a, T> Add<isize> for ArrayPosition<'a, T> {
    type Output = ArrayPosition<'a, T>;

    fn add(self, rhs: isize) -> Self::Output {
        ArrayPosition::new(self.array, self.offset + rhs)
    }
}

impl<'a, T> Sub<isize> for ArrayPosition<'a, T> {
    type Output = ArrayPosition<'a, T>;

    fn sub(self, rhs: isize) -> Self::Output {
        ArrayPosition::new(self.array, self.offset - rhs)
    }
}

impl<'a, T> Add<ArrayPosition<'_, T>> for ArrayPosition<'a, T> {
    type Output = ArrayPosition<'a, T>;

    fn add(self, rhs: ArrayPosition<'_, T>) -> Self::Output {
        self + rhs.offset
    }
}

impl<'a, T> Sub<ArrayPosition<'_, T>> for ArrayPosition<'a, T> {
    type Output = ArrayPosition<'a, T>;

    fn sub(self, rhs: ArrayPosition<'_, T>) -> Self::Output {
        self - rhs.offset
    }
}

/// Writable position into a borrowed array
pub struct ArrayPositionMut<'a, T> {
    array: &'a mut [T],
    offset: isize,
}

impl<'a, T> ArrayPositionMut<'a, T> {
    pub fn new(array: &'a mut [T], offset: isize) -> Self {
        Self { array, offset }
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Read-only view at the same position
    pub fn as_position(&self) -> ArrayPosition<'_, T> {
        ArrayPosition::new(&*self.array, self.offset)
    }

    /// Shorter-lived position over the same array, so `self` stays usable
    pub fn reborrow(&mut self) -> ArrayPositionMut<'_, T> {
        ArrayPositionMut::new(&mut *self.array, self.offset)
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Result<&T, BufferError> {
        let i = resolve_index(self.offset, idx, self.array.len())?;
        Ok(&self.array[i])
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> Result<&mut T, BufferError> {
        let i = resolve_index(self.offset, idx, self.array.len())?;
        Ok(&mut self.array[i])
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: T) -> Result<(), BufferError> {
        *self.get_mut(idx)? = value;
        Ok(())
    }

    pub fn slice_mut(&mut self, count: usize) -> Result<&mut [T], BufferError> {
        let range = resolve_range(self.offset, count, self.array.len())?;
        Ok(&mut self.array[range])
    }
}

impl<T: Copy> ArrayPositionMut<'_, T> {
    /// Copy within the backing array, relative to this position
    pub fn copy_within(
        &mut self,
        src_offset: usize,
        dst_offset: usize,
        count: usize,
    ) -> Result<(), BufferError> {
        if count == 0 {
            return Ok(());
        }

        let len = self.array.len();
        let src = absolute(self.offset, src_offset, count, len)?;
        let dst = absolute(self.offset, dst_offset, count, len)?;
        try_copy_within(&mut *self.array, src, dst, count)
    }
}

impl<T> fmt::Debug for ArrayPositionMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayPositionMut")
            .field("len", &self.array.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> From<&'a mut [T]> for ArrayPositionMut<'a, T> {
    fn from(array: &'a mut [T]) -> Self {
        Self::new(array, 0)
    }
}

impl<T> Index<usize> for ArrayPositionMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &T {
        match self.get(idx) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> IndexMut<usize> for ArrayPositionMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut T {
        match self.get_mut(idx) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a, T> Add<isize> for ArrayPositionMut<'a, T> {
    type Output = ArrayPositionMut<'a, T>;

    fn add(self, rhs: isize) -> Self::Output {
        ArrayPositionMut::new(self.array, self.offset + rhs)
    }
}

impl<'a, T> Sub<isize> for ArrayPositionMut<'a, T> {
    type Output = ArrayPositionMut<'a, T>;

    fn sub(self, rhs: isize) -> Self::Output {
        ArrayPositionMut::new(self.array, self.offset - rhs)
    }
}

impl<'a, T> Add<ArrayPosition<'_, T>> for ArrayPositionMut<'a, T> {
    type Output = ArrayPositionMut<'a, T>;

    fn add(self, rhs: ArrayPosition<'_, T>) -> Self::Output {
        self + rhs.offset
    }
}

impl<'a, T> Sub<ArrayPosition<'_, T>> for ArrayPositionMut<'a, T> {
    type Output = ArrayPositionMut<'a, T>;

    fn sub(self, rhs: ArrayPosition<'_, T>) -> Self::Output {
        self - rhs.offset
    }
}

/// Bounded read-only window (`array[offset..offset + count]`)
pub struct ArraySegment<'a, T> {
    array: &'a [T],
    offset: usize,
    count: usize,
}

impl<'a, T> ArraySegment<'a, T> {
    pub fn new(array: &'a [T], offset: usize, count: usize) -> Result<Self, BufferError> {
        resolve_range(offset as isize, count, array.len())?;
        Ok(Self {
            array,
            offset,
            count,
        })
    }

    pub fn array(&self) -> &'a [T] {
        self.array
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn as_slice(&self) -> &'a [T] {
        &self.array[self.offset..self.offset + self.count]
    }
}

impl<T> Clone for ArraySegment<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArraySegment<'_, T> {}

impl<T> fmt::Debug for ArraySegment<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySegment")
            .field("offset", &self.offset)
            .field("count", &self.count)
            .finish()
    }
}

/// Bounded writable window
pub struct ArraySegmentMut<'a, T> {
    array: &'a mut [T],
    offset: usize,
    count: usize,
}

impl<'a, T> ArraySegmentMut<'a, T> {
    pub fn new(array: &'a mut [T], offset: usize, count: usize) -> Result<Self, BufferError> {
        resolve_range(offset as isize, count, array.len())?;
        Ok(Self {
            array,
            offset,
            count,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn as_slice(&self) -> &[T] {
        &self.array[self.offset..self.offset + self.count]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.array[self.offset..self.offset + self.count]
    }
}

impl<T> fmt::Debug for ArraySegmentMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySegmentMut")
            .field("offset", &self.offset)
            .field("count", &self.count)
            .finish()
    }
}

/// Anything [`block_copy`] can read from
pub trait ByteSource {
    /// Backing bytes and the absolute offset this source starts at
    fn source_parts(&self) -> (&[u8], isize);
}

/// Anything [`block_copy`] can write into
pub trait ByteSink {
    fn sink_parts(&mut self) -> (&mut [u8], isize);
}

impl ByteSource for [u8] {
    fn source_parts(&self) -> (&[u8], isize) {
        (self, 0)
    }
}

impl<const N: usize> ByteSource for [u8; N] {
    fn source_parts(&self) -> (&[u8], isize) {
        (self.as_slice(), 0)
    }
}

impl ByteSource for Vec<u8> {
    fn source_parts(&self) -> (&[u8], isize) {
        (self.as_slice(), 0)
    }
}

impl ByteSource for ArrayPosition<'_, u8> {
    fn source_parts(&self) -> (&[u8], isize) {
        (self.array, self.offset)
    }
}

impl ByteSource for ArrayPositionMut<'_, u8> {
    fn source_parts(&self) -> (&[u8], isize) {
        (&*self.array, self.offset)
    }
}

impl ByteSource for ArraySegment<'_, u8> {
    fn source_parts(&self) -> (&[u8], isize) {
        (self.array, self.offset as isize)
    }
}

impl ByteSource for ArraySegmentMut<'_, u8> {
    fn source_parts(&self) -> (&[u8], isize) {
        (&*self.array, self.offset as isize)
    }
}

impl ByteSink for [u8] {
    fn sink_parts(&mut self) -> (&mut [u8], isize) {
        (self, 0)
    }
}

impl<const N: usize> ByteSink for [u8; N] {
    fn sink_parts(&mut self) -> (&mut [u8], isize) {
        (self.as_mut_slice(), 0)
    }
}

impl ByteSink for Vec<u8> {
    fn sink_parts(&mut self) -> (&mut [u8], isize) {
        (self.as_mut_slice(), 0)
    }
}

impl ByteSink for ArrayPositionMut<'_, u8> {
    fn sink_parts(&mut self) -> (&mut [u8], isize) {
        (&mut *self.array, self.offset)
    }
}

impl ByteSink for ArraySegmentMut<'_, u8> {
    fn sink_parts(&mut self) -> (&mut [u8], isize) {
        (&mut *self.array, self.offset as isize)
    }
}

/// Canonical copy: `count` bytes from `src[src_offset..]` to `dst[dst_offset..]`
///
/// A zero count returns before either buffer is examined.
#[inline]
pub fn try_copy_bytes(
    src: &[u8],
    src_offset: usize,
    dst: &mut [u8],
    dst_offset: usize,
    count: usize,
) -> Result<(), BufferError> {
    if count == 0 {
        return Ok(());
    }

    let src_range = resolve_range(src_offset as isize, count, src.len())?;
    let dst_range = resolve_range(dst_offset as isize, count, dst.len())?;
    dst[dst_range].copy_from_slice(&src[src_range]);
    Ok(())
}

/// Panicking form of [`try_copy_bytes`]
#[inline]
pub fn copy_bytes(src: &[u8], src_offset: usize, dst: &mut [u8], dst_offset: usize, count: usize) {
    if let Err(e) = try_copy_bytes(src, src_offset, dst, dst_offset, count) {
        panic!("{e}");
    }
}

/// Copy inside one backing array; overlapping ranges behave like a copy
/// through a temporary buffer
pub fn try_copy_within<T: Copy>(
    buf: &mut [T],
    src_offset: usize,
    dst_offset: usize,
    count: usize,
) -> Result<(), BufferError> {
    if count == 0 {
        return Ok(());
    }

    let src_range = resolve_range(src_offset as isize, count, buf.len())?;
    resolve_range(dst_offset as isize, count, buf.len())?;
    buf.copy_within(src_range, dst_offset);
    Ok(())
}

/// Panicking form of [`try_copy_within`]
pub fn copy_within<T: Copy>(buf: &mut [T], src_offset: usize, dst_offset: usize, count: usize) {
    if let Err(e) = try_copy_within(buf, src_offset, dst_offset, count) {
        panic!("{e}");
    }
}

/// Copy between any source and sink flavour
///
/// Offsets are relative to each side's own position or segment start.
pub fn try_block_copy<S, D>(
    src: &S,
    src_offset: usize,
    dst: &mut D,
    dst_offset: usize,
    count: usize,
) -> Result<(), BufferError>
where
    S: ByteSource + ?Sized,
    D: ByteSink + ?Sized,
{
    if count == 0 {
        return Ok(());
    }

    let (src_bytes, src_base) = src.source_parts();
    let (dst_bytes, dst_base) = dst.sink_parts();
    let src_start = absolute(src_base, src_offset, count, src_bytes.len())?;
    let dst_start = absolute(dst_base, dst_offset, count, dst_bytes.len())?;
    try_copy_bytes(src_bytes, src_start, dst_bytes, dst_start, count)
}

/// Panicking form of [`try_block_copy`]
pub fn block_copy<S, D>(src: &S, src_offset: usize, dst: &mut D, dst_offset: usize, count: usize)
where
    S: ByteSource + ?Sized,
    D: ByteSink + ?Sized,
{
    if let Err(e) = try_block_copy(src, src_offset, dst, dst_offset, count) {
        panic!("{e}");
    }
}
