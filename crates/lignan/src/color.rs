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

#[repr(u8)]
#[derive(Clone, Copy)]
pub enum AsciiForeground {
    Green = 32,
    Yellow = 33,
    Red = 31,
    White = 37,
}

/// ANSI escape prefix for the given foreground color.
const fn fg(color: AsciiForeground) -> &'static str {
    match color {
        AsciiForeground::Green => "\x1b[32m",
        AsciiForeground::Yellow => "\x1b[33m",
        AsciiForeground::Red => "\x1b[31m",
        AsciiForeground::White => "\x1b[37m",
    }
}

pub const LOG_STYLE: &str = fg(AsciiForeground::Green);
pub const WARN_STYLE: &str = fg(AsciiForeground::Yellow);
pub const ERR_STYLE: &str = fg(AsciiForeground::Red);
pub const DIM_STYLE: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";
