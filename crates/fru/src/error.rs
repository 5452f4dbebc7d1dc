/*
  ____                 __               __   _ __
 / __ \__ _____ ____  / /___ ____ _    / /  (_) /
/ /_/ / // / _ `/ _ \/ __/ // /  ' \  / /__/ / _ \
\___\_\_,_/\_,_/_//_/\__/\_,_/_/_/_/ /____/_/_.__/
    Part of the Quantum OS Project

Copyright 2025 Gavin Kellam

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

/// Errors surfaced by every public entry point in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruError {
    /// A shape error: bad index, misaligned offset, wrong slot kind.
    InvalidArgument,
    /// The operation has no implementation for this area/field combination.
    NotImplemented,
    /// The requested area, field, or record does not exist in this FRU.
    NotFound,
    /// The target already exists (e.g. an area already occupying that slot).
    AlreadyExists,
    /// The new value can never fit, regardless of current usage.
    TooBig,
    /// The new value would fit in the kind of slot but not in the space left.
    OutOfSpace,
    /// An allocation failed while growing a backing collection to append
    /// a new entry.
    OutOfMemory,
    /// The on-media bytes do not form a well-formed FRU image.
    BadFormat,
    /// A write was attempted against a field the tree navigator only
    /// ever reads (e.g. an area's own format-version byte). Unreachable
    /// with the current field table, kept for a future read-only entry.
    PermissionDenied,
}

pub type Result<T> = core::result::Result<T, FruError>;
