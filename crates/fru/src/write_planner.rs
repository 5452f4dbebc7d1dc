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

//! Accumulates the byte ranges an encode pass actually changed, so a
//! caller can write back only those ranges instead of the whole blob.

use alloc::vec::Vec;

/// A byte range, relative to the start of the whole FRU blob, whose
/// on-media content changed as a result of a `write` call. Ranges may
/// overlap or abut; callers that need disjoint ranges must coalesce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRange {
    pub offset: usize,
    pub len: usize,
}

/// Append-only collector for one `write` call. Emission order matches the
/// order areas are encoded in (common-header slot order, which is also
/// increasing-offset order for any validly laid-out FRU), and within an
/// area, increasing byte offset.
#[derive(Default)]
pub struct WritePlanner {
    ranges: Vec<UpdateRange>,
}

impl WritePlanner {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn emit(&mut self, offset: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.ranges.push(UpdateRange { offset, len });
    }

    pub fn into_ranges(self) -> Vec<UpdateRange> {
        self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_ranges_are_dropped() {
        let mut planner = WritePlanner::new();
        planner.emit(10, 0);
        planner.emit(10, 4);
        assert_eq!(planner.into_ranges(), alloc::vec![UpdateRange { offset: 10, len: 4 }]);
    }
}
