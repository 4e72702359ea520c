// Record derive: turns a named-field struct into TypeInfo / FieldInfo builders

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{
    parse_quote, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericParam, Lit, LitStr,
    Meta, Token, Visibility,
};

/// Struct-level `#[record(...)]` options
#[derive(Default)]
struct RecordOptions {
    rename: Option<String>,
    package: Option<String>,
}

/// Field-level attributes gathered from `#[tag]`, `#[record]` and `#[serde]`
#[derive(Default)]
struct FieldOptions {
    tags: Vec<(String, String)>,
    embed: bool,
    skip: bool,
}

fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}

/// Join `///` lines; one leading space per line is markdown padding
fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_string).unwrap_or(line))
        .collect();

    let text = lines.join("\n").trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_record_options(attrs: &[Attribute]) -> syn::Result<RecordOptions> {
    let mut options = RecordOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                options.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("package") {
                options.package = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `rename` or `package`"))
            }
        })?;
    }
    Ok(options)
}

fn is_serde_flatten(attr: &Attribute) -> bool {
    if !attr.path().is_ident("serde") {
        return false;
    }
    attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
        .map(|metas| metas.iter().any(|meta| meta.path().is_ident("flatten")))
        .unwrap_or(false)
}

fn parse_field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let namespace = meta
                    .path
                    .get_ident()
                    .map(unraw)
                    .ok_or_else(|| meta.error("expected a namespace identifier"))?;
                let raw = meta.value()?.parse::<LitStr>()?.value();
                // A repeated namespace replaces the earlier value
                options.tags.retain(|(ns, _)| *ns != namespace);
                options.tags.push((namespace, raw));
                Ok(())
            })?;
        } else if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("embed") {
                    options.embed = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `embed` or `skip`"))
                }
            })?;
        } else if is_serde_flatten(attr) {
            options.embed = true;
        }
    }

    Ok(options)
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = match syn::parse2::<DeriveInput>(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };
    expand(input).unwrap_or_else(|err| err.to_compile_error())
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = input.ident.clone();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.clone(),
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ))
        }
    };

    let record_options = parse_record_options(&input.attrs)?;
    let base_name = record_options.rename.unwrap_or_else(|| unraw(&struct_name));

    // Every type parameter must itself be describable
    let type_params: Vec<syn::Ident> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::schemora_core::Introspect));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // `Page<User>` and `Page<Book>` are distinct records
    let name_expr = if type_params.is_empty() {
        quote! { #base_name }
    } else {
        let format = format!("{}<{}>", base_name, vec!["{}"; type_params.len()].join(", "));
        quote! {
            ::std::format!(#format, #(<#type_params as ::schemora_core::Introspect>::type_info().name()),*)
        }
    };

    let package_expr = match record_options.package {
        Some(package) => quote! { #package },
        None => quote! { ::core::module_path!() },
    };

    let struct_doc = doc_text(&input.attrs).map(|doc| quote! { .with_doc(#doc) });

    let mut field_exprs = Vec::new();
    for field in &fields {
        let options = parse_field_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = unraw(ident);
        let field_ty = &field.ty;
        let exported = matches!(field.vis, Visibility::Public(_));
        let embed = options.embed;
        let tag_calls = options.tags.iter().map(|(namespace, raw)| {
            quote! { .with_tag(#namespace, #raw) }
        });
        let doc_call = doc_text(&field.attrs).map(|doc| quote! { .with_doc(#doc) });

        field_exprs.push(quote! {
            ::schemora_core::FieldInfo::new(
                #field_name,
                <#field_ty as ::schemora_core::Introspect>::type_info(),
            )
            .with_exported(#exported)
            .with_anonymous(#embed)
            #(#tag_calls)*
            #doc_call
        });
    }

    Ok(quote! {
        impl #impl_generics ::schemora_core::Introspect for #struct_name #ty_generics #where_clause {
            fn type_info() -> ::schemora_core::TypeInfo {
                ::schemora_core::TypeInfo::record(
                    #name_expr,
                    #package_expr,
                    <Self as ::schemora_core::Record>::fields,
                )
                #struct_doc
            }
        }

        impl #impl_generics ::schemora_core::Record for #struct_name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::schemora_core::FieldInfo> {
                ::std::vec![
                    #(#field_exprs),*
                ]
            }
        }
    })
}
