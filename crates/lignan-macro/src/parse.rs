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

use proc_macro2::Span;
use syn::{
    Expr, Token, Type,
    parse::{Parse, ParseStream},
};

/// One `name: Type = expr;` entry inside `make_debug! { ... }`.
pub struct DebugStream {
    pub stream_name: syn::LitStr,
    pub debug_type: Type,
    pub init_expr: Expr,
}

impl Parse for DebugStream {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let stream_name: syn::LitStr = input.parse()?;
        input.parse::<Token![:]>()?;
        let debug_type: Type = input.parse()?;
        input.parse::<Token![=]>()?;
        let init_expr: Expr = input.parse()?;

        Ok(Self {
            stream_name,
            debug_type,
            init_expr,
        })
    }
}

pub struct DebugMacroInput {
    pub streams: Vec<DebugStream>,
    pub macro_span: Span,
}

impl Parse for DebugMacroInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let macro_span = input.span();
        let streams = input
            .parse_terminated(DebugStream::parse, Token![;])?
            .into_iter()
            .collect();

        Ok(Self {
            streams,
            macro_span,
        })
    }
}
