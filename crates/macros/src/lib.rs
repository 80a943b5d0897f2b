// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider daterange project*
//!
//! This crate contains the daterange procedural macros
//!

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{LitInt, parse_macro_input};

// TODO: these are copied from daterange-core's moment module (so are not synced)
const MIN_YEAR: i64 = -9999;
const MAX_YEAR: i64 = 9999;

/// Parse the literal, returning the compile error to emit on failure
fn parse_literal(lit: &LitInt) -> Result<i64, TokenStream> {
    lit.base10_parse::<i64>().map_err(|_| {
        syn::Error::new_spanned(lit, "Expected a valid i64 integer literal")
            .to_compile_error()
            .into()
    })
}

/// Emit `Type::try_from(value).unwrap()` for a value already checked
fn checked_constructor(type_name: &str, value: i64) -> TokenStream {
    let ident = syn::Ident::new(type_name, proc_macro2::Span::call_site());
    quote! {
        #ident::try_from(#value).unwrap()
    }
    .into()
}

/// Generate the type with compile time bounds checking
fn generate_const_checked_integer_macro(
    input: TokenStream,
    type_name: &str,
    min: i64,
    max: i64,
) -> TokenStream {
    let lit = parse_macro_input!(input as LitInt);

    let value = match parse_literal(&lit) {
        Ok(value) => value,
        Err(error) => return error,
    };

    if value < min || value > max {
        return syn::Error::new_spanned(
            lit,
            format!("{type_name} must be between {min} and {max}"),
        )
        .to_compile_error()
        .into();
    }

    checked_constructor(type_name, value)
}

/// Create a `Day`, using `day!(x)`, with compile time checking of the value.
#[proc_macro]
pub fn day(input: TokenStream) -> TokenStream {
    generate_const_checked_integer_macro(input, "Day", 1, 31)
}

/// Create a `Month`, using `month!(x)`, with compile time checking of the value.
#[proc_macro]
pub fn month(input: TokenStream) -> TokenStream {
    generate_const_checked_integer_macro(input, "Month", 1, 12)
}

/// Create a `Year`, using `year!(x)`, with compile time checking of the value.
#[proc_macro]
pub fn year(input: TokenStream) -> TokenStream {
    generate_const_checked_integer_macro(input, "Year", MIN_YEAR, MAX_YEAR)
}

/// Create a `TimeOfDay`, using `time_of_day!(HHMMSS)`, with compile time
/// checking of each of the packed hour, minute and second parts.
///
/// Leading zeros can be dropped, so `time_of_day!(93000)` is 09:30:00.
#[proc_macro]
pub fn time_of_day(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitInt);

    let value = match parse_literal(&lit) {
        Ok(value) => value,
        Err(error) => return error,
    };

    let (hours, minutes, seconds) = (value / 10000, (value / 100) % 100, value % 100);
    if value < 0 || hours > 23 || minutes > 59 || seconds > 59 {
        return syn::Error::new_spanned(lit, "TimeOfDay must be a valid HHMMSS value")
            .to_compile_error()
            .into();
    }

    checked_constructor("TimeOfDay", value)
}
