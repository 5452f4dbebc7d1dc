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

use crate::parse::{DebugMacroInput, DebugStream};
use proc_macro2::Span;
use quote::{quote, quote_spanned};
use syn::{Ident, ItemFn};

pub fn static_stream_var_name(enumeration: usize, stream: &DebugStream) -> String {
    let cleaned: String = stream
        .stream_name
        .value()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        format!("DEBUG_STREAM_OUTPUT_{enumeration}")
    } else {
        format!("DEBUG_STREAM_OUTPUT_{cleaned}")
    }
}

fn generate_stream(enumeration: usize, stream: &DebugStream) -> proc_macro2::TokenStream {
    let name = Ident::new(
        &static_stream_var_name(enumeration, stream),
        stream.stream_name.span(),
    );
    let stream_type = &stream.debug_type;
    let stream_init = &stream.init_expr;

    quote! {
        static #name: ::lignan::lock::DebugMutex<::core::cell::LazyCell<#stream_type>> =
            ::lignan::lock::DebugMutex::new(::core::cell::LazyCell::new(|| #stream_init));
    }
}

fn generate_init_function(macro_input: &DebugMacroInput) -> proc_macro2::TokenStream {
    let stream_outputs: Vec<proc_macro2::TokenStream> = macro_input
        .streams
        .iter()
        .enumerate()
        .map(|(count, stream)| {
            let stream_name = Ident::new(&static_stream_var_name(count, stream), Span::call_site());

            quote! {
                if let Some(mut guard) = #stream_name.try_lock() {
                    let _ = ::core::fmt::Write::write_fmt(&mut *guard, args);
                }
            }
        })
        .collect();

    quote_spanned! {Span::call_site()=>
        fn debug_macro_print(args: ::core::fmt::Arguments) {
            #(#stream_outputs)*
        }

        pub(crate) fn debug_macro_init() {
            ::lignan::set_global_debug_fn(debug_macro_print);
        }
    }
}

pub fn generate_make_debug(macro_input: DebugMacroInput) -> syn::Result<proc_macro2::TokenStream> {
    let each_stream: Vec<proc_macro2::TokenStream> = macro_input
        .streams
        .iter()
        .enumerate()
        .map(|(count, stream)| generate_stream(count, stream))
        .collect();

    let init_function = generate_init_function(&macro_input);

    Ok(quote_spanned! {macro_input.macro_span=>
        #[allow(unused)]
        mod debug_macro {
            use super::*;

            #init_function

            #(#each_stream)*
        }
    })
}

pub fn generate_debug_ready(macro_input: ItemFn) -> proc_macro2::TokenStream {
    let attrs = &macro_input.attrs;
    let vis = &macro_input.vis;
    let sig = &macro_input.sig;
    let body = &macro_input.block;

    quote! {
        #(#attrs)*
        #vis #sig {
            debug_macro::debug_macro_init();
            #body
        }
    }
}
