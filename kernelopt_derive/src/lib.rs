use inflector::Inflector;
use proc_macro::TokenStream;
use quote::quote;
use syn::*;

/// Display an enum as its lower-cased variant name, or the string given in
/// `#[style("...")]` on the variant.
#[proc_macro_derive(OpDisplay, attributes(style))]
pub fn op_display_derive(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	let name = input.ident;
	let Data::Enum(DataEnum { variants, .. }) = input.data else {
		return Error::new(name.span(), "OpDisplay is only defined for enums")
			.to_compile_error()
			.into();
	};

	let cases = variants.into_iter().map(|v| {
		let variant_name = &v.ident;
		let variant_str = variant_name.to_string().to_lowercase();
		for attr in &v.attrs {
			if attr.path().is_ident("style") {
				return match attr.parse_args::<LitStr>() {
					Ok(lit_str) => {
						let val = lit_str.value();
						quote! {
							#name::#variant_name => write!(f, "{}", #val)
						}
					}
					Err(_) => Error::new_spanned(attr, "Expected a string literal")
						.to_compile_error(),
				};
			}
		}
		quote! {
			#name::#variant_name => write!(f, "{}", #variant_str)
		}
	});

	let expanded = quote! {
		impl std::fmt::Display for #name {
			fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				match self {
					#( #cases, )*
				}
			}
		}
	};

	TokenStream::from(expanded)
}

/// Implement `PassInfo` for a pass struct.
///
/// `#[pass(name = "...", description = "...")]` sets the registered name and
/// its one-line description. Without a name the kebab-cased struct name is
/// used.
#[proc_macro_derive(RegisteredPass, attributes(pass))]
pub fn registered_pass_derive(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	let name = input.ident;
	let mut pass_name = name.to_string().to_kebab_case();
	let mut description = String::new();

	for attr in &input.attrs {
		if !attr.path().is_ident("pass") {
			continue;
		}
		let parsed = attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("name") {
				pass_name = meta.value()?.parse::<LitStr>()?.value();
				Ok(())
			} else if meta.path.is_ident("description") {
				description = meta.value()?.parse::<LitStr>()?.value();
				Ok(())
			} else {
				Err(meta.error("expected `name` or `description`"))
			}
		});
		if let Err(e) = parsed {
			return e.to_compile_error().into();
		}
	}

	let expanded = quote! {
		impl PassInfo for #name {
			fn pass_name() -> &'static str {
				#pass_name
			}

			fn pass_description() -> &'static str {
				#description
			}
		}
	};

	TokenStream::from(expanded)
}
