mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the operation summary and the rest its description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two new structs: `CreateX` and `UpdateX` for the model `X`.
/// For both models, fields with #[serde(skip_deserializing)] are skipped, and all
/// other fields (excluding `id`) are included verbatim (including attributes).
///
/// `#[sqlx(..)]` attributes and the `FromRow` derive stay on the model itself.
/// Update fields are wrapped in `Option`, unless they already are one.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
