use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::{punctuated::Punctuated, Meta, Token};

/// Derives that only make sense on the stored model itself.
const MODEL_ONLY_DERIVES: &[&str] = &["FromRow"];

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

fn is_sqlx(attr: &syn::Attribute) -> bool {
	attr.path().is_ident("sqlx")
}

fn is_option(ty: &syn::Type) -> bool {
	let syn::Type::Path(path) = ty else {
		return false;
	};

	path.qself.is_none()
		&& path
			.path
			.segments
			.last()
			.is_some_and(|segment| segment.ident == "Option")
}

/// Whether the field carries `#[serde(skip_deserializing)]` or `#[serde(skip)]`.
fn skips_deserializing(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}

/// Rewrites the struct-level attributes for the input structs, removing
/// `#[sqlx(..)]` and any derive listed in [`MODEL_ONLY_DERIVES`].
fn input_attrs(attrs: &[syn::Attribute]) -> syn::Result<Vec<proc_macro2::TokenStream>> {
	let mut out = Vec::with_capacity(attrs.len());

	for attr in attrs {
		if is_sqlx(attr) {
			continue;
		}

		if !attr.path().is_ident("derive") {
			out.push(attr.to_token_stream());
			continue;
		}

		let derives =
			attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)?;
		let derives = derives
			.into_iter()
			.filter(|path| {
				path.segments.last().map_or(true, |segment| {
					!MODEL_ONLY_DERIVES.iter().any(|name| segment.ident == name)
				})
			})
			.collect::<Vec<_>>();

		if !derives.is_empty() {
			out.push(quote!(#[derive(#(#derives),*)]));
		}
	}

	Ok(out)
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}", ident);
	let update_ident = format_ident!("Update{}", ident);

	let attrs = match input_attrs(&receiver.attrs) {
		Ok(attrs) => attrs,
		Err(e) => return e.into_compile_error().into(),
	};

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(ident, "#[model] only supports structs with named fields")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;

			if skips_deserializing(&field.attrs) {
				return None;
			}

			let attrs = field
				.attrs
				.iter()
				.filter(|attr| !is_sqlx(attr))
				.collect::<Vec<_>>();

			Some((attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	// Fields that are already optional keep their type, so that `null` and
	// a missing field both mean "leave unchanged".
	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		let ty = if is_option(ty) {
			quote!(#ty)
		} else {
			quote!(Option<#ty>)
		};

		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	quote! {
		#input

		#(#attrs)*
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}
