//! Procedural macros for the aoc-puzzle library

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitInt, parse_macro_input};

const FIRST_YEAR: u16 = 2015;
const LAST_YEAR: u16 = 2034;

/// Derive macro for registering a solution with the plugin collection
///
/// Generates an `inventory::submit!` of an `aoc_puzzle::SolutionPlugin` so the
/// solution is discovered by `SolutionRegistry::build()` without a central list.
///
/// # Attributes
///
/// - `year`: Required. The Advent of Code year (2015-2034)
/// - `day`: Optional. The day number (1-25). When omitted, the first number in
///   the type name is used (`Day07` is day 7).
///
/// # Requirements
///
/// The type must be a non-generic unit struct implementing `PuzzleSolution`.
/// Violations are reported as compile errors on the offending tokens.
///
/// # Example
///
/// ```ignore
/// use aoc_puzzle::{AdventSolution, Answer, PuzzleInput, PuzzleSolution, SolveError};
///
/// #[derive(AdventSolution)]
/// #[advent(year = 2023)]
/// pub struct Day01;
///
/// impl PuzzleSolution for Day01 {
///     // ... implementation
/// }
/// ```
#[proc_macro_derive(AdventSolution, attributes(advent))]
pub fn derive_advent_solution(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "AdventSolution cannot be derived for generic types",
        ));
    }
    if !matches!(&input.data, Data::Struct(data) if matches!(data.fields, Fields::Unit)) {
        return Err(syn::Error::new_spanned(
            name,
            "AdventSolution requires a unit struct, e.g. `pub struct Day01;`",
        ));
    }

    let attr = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("advent"))
        .ok_or_else(|| {
            syn::Error::new_spanned(name, "missing #[advent(year = ..., day = ...)] attribute")
        })?;

    let mut year: Option<LitInt> = None;
    let mut day: Option<LitInt> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("year") {
            year = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("day") {
            day = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `year` or `day`"))
        }
    })?;

    let year_lit = year.ok_or_else(|| syn::Error::new_spanned(attr, "missing required `year`"))?;
    let year: u16 = year_lit.base10_parse()?;
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return Err(syn::Error::new_spanned(
            &year_lit,
            format!("year must be within {}..={}", FIRST_YEAR, LAST_YEAR),
        ));
    }

    let day: u8 = match day {
        Some(lit) => {
            let value: u8 = lit.base10_parse()?;
            if !(1..=25).contains(&value) {
                return Err(syn::Error::new_spanned(&lit, "day must be within 1..=25"));
            }
            value
        }
        None => infer_day(&name.to_string()).ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "cannot infer the day from the type name; add `day = N` to #[advent(...)]",
            )
        })?,
    };

    Ok(quote! {
        // Compile-time check that the type implements PuzzleSolution
        const _: () = {
            trait MustImplementPuzzleSolution: ::aoc_puzzle::PuzzleSolution {}
            impl MustImplementPuzzleSolution for #name {}
        };

        ::aoc_puzzle::inventory::submit! {
            ::aoc_puzzle::SolutionPlugin {
                year: #year,
                day: #day,
                name: ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#name)),
                solution: &#name,
            }
        }
    })
}

/// First calendar-like number (1-31) in a type name, if it is a puzzle day
fn infer_day(name: &str) -> Option<u8> {
    name.split(|c: char| !c.is_ascii_digit())
        .filter_map(|run| run.parse::<u32>().ok())
        .find(|n| (1..=31).contains(n))
        .and_then(|n| u8::try_from(n).ok())
        .filter(|day| (1..=25).contains(day))
}
