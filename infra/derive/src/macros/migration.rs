use super::error::derived_trait_names;
use fxhash::FxHashMap;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Expr, ItemStruct, Lit, LitStr, Meta};

/// Keys every `#[migration(...)]` declaration must carry, in declaration order.
const REQUIRED_KEYS: [&str; 5] = ["name", "description", "threshold", "introduced_on", "change_id"];

pub fn expand_migration(args: TokenStream, input: ItemStruct) -> TokenStream {
    let values = match parse_declaration(args) {
        Ok(values) => values,
        Err(err) => return err.to_compile_error(),
    };

    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !values.contains_key(**key)) {
        return syn::Error::new_spanned(
            &input.ident,
            format!("migration `{}` is missing required key `{missing}`", input.ident),
        )
        .to_compile_error();
    }

    if let Err(err) = validate_values(&values) {
        return err.to_compile_error();
    }

    let ident = &input.ident;
    let type_name = LitStr::new(&ident.to_string(), Span::call_site());
    let [name, description, threshold, introduced_on, change_id] =
        REQUIRED_KEYS.map(|key| &values[key]);

    let derives = match missing_derives(&input) {
        Ok(derives) => derives,
        Err(err) => return err.to_compile_error(),
    };

    quote! {
        #derives
        #input

        #[automatically_derived]
        impl ::fcm_engine::Declared for #ident {
            fn declaration(&self) -> ::fcm_engine::Declaration {
                ::fcm_engine::Declaration {
                    type_name: #type_name,
                    name: Some(#name),
                    description: Some(#description),
                    threshold: Some(#threshold),
                    introduced_on: Some(#introduced_on),
                    change_id: Some(#change_id),
                }
            }
        }
    }
}

fn parse_declaration(args: TokenStream) -> syn::Result<FxHashMap<String, LitStr>> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let metas = parser.parse2(args)?;
    let mut values = FxHashMap::default();

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(meta, "Expected `key = \"...\"`"));
        };

        let Some(key) = pair.path.get_ident().map(ToString::to_string) else {
            return Err(syn::Error::new_spanned(pair.path, "Expected a plain key"));
        };

        if !REQUIRED_KEYS.contains(&key.as_str()) {
            return Err(syn::Error::new_spanned(
                &pair.path,
                format!("Unknown key `{key}`, expected one of: {}", REQUIRED_KEYS.join(", ")),
            ));
        }

        let Expr::Lit(syn::ExprLit { lit: Lit::Str(lit), .. }) = &pair.value else {
            return Err(syn::Error::new_spanned(
                &pair.value,
                format!("Expected string literal for `{key} = \"...\"`"),
            ));
        };

        if values.insert(key.clone(), lit.clone()).is_some() {
            return Err(syn::Error::new_spanned(pair, format!("Duplicate `{key}` argument")));
        }
    }

    Ok(values)
}

/// Shape checks that do not need the engine's parsers. The registry re-validates semantically.
fn validate_values(values: &FxHashMap<String, LitStr>) -> syn::Result<()> {
    for key in ["name", "change_id", "threshold"] {
        let lit = &values[key];
        if lit.value().trim().is_empty() {
            return Err(syn::Error::new_spanned(lit, format!("`{key}` must not be empty")));
        }
    }

    let date = &values["introduced_on"];
    if !is_iso_date(&date.value()) {
        return Err(syn::Error::new_spanned(date, "`introduced_on` must be `YYYY-MM-DD`"));
    }

    Ok(())
}

fn is_iso_date(raw: &str) -> bool {
    let parts: Vec<&str> = raw.split('-').collect();
    matches!(parts.as_slice(), [y, m, d]
        if y.len() == 4 && m.len() == 2 && d.len() == 2
            && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())))
}

fn missing_derives(input: &ItemStruct) -> syn::Result<TokenStream> {
    let derived = derived_trait_names(&input.attrs)?;

    let mut tokens = Vec::new();
    if !derived.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if !derived.contains("Default") {
        tokens.push(quote! { Default });
    }
    Ok(if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } })
}
