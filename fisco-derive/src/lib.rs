use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro that documents the input variables of a situation record.
///
/// For each field, extracts:
/// - Variable name (respects #[serde(rename = "...")] and the deserialize
///   half of #[serde(rename(deserialize = "..."))])
/// - Required (false for Option<T> and #[serde(default)] fields)
/// - Definition period (from #[input(period = "month" | "year")])
/// - Description (from doc comments)
///
/// Generates an `input_schema() -> &'static [InputField]` method. `InputField`
/// must be in scope where the derive is used.
#[proc_macro_derive(InputSchema, attributes(serde, input))]
pub fn derive_input_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("InputSchema only supports structs with named fields"),
        },
        _ => panic!("InputSchema only supports structs"),
    };

    let mut entries = Vec::new();
    for field in fields {
        let field_name = field.ident.as_ref().unwrap().to_string();
        let serde = match SerdeAttrs::from_attrs(&field.attrs) {
            Ok(serde) => serde,
            Err(err) => return err.to_compile_error().into(),
        };
        let variable = serde.rename.unwrap_or(field_name);
        let required = !serde.default && !is_option_type(&field.ty);
        let description = get_doc_comment(&field.attrs);

        let period = match get_input_period(&field.attrs) {
            Ok(Some(period)) => quote! { Some(#period) },
            Ok(None) => quote! { None },
            Err(err) => return err.to_compile_error().into(),
        };

        entries.push(quote! {
            InputField {
                name: #variable,
                required: #required,
                period: #period,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn input_schema() -> &'static [InputField] {
                static SCHEMA: &[InputField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    default: bool,
}

impl SerdeAttrs {
    fn from_attrs(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut out = SerdeAttrs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            // Unknown serde keys are skipped; serde itself reports misuse.
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if meta.input.peek(syn::token::Paren) {
                        // rename(serialize = "..", deserialize = "..")
                        meta.parse_nested_meta(|inner| {
                            let lit: LitStr = inner.value()?.parse()?;
                            if inner.path.is_ident("deserialize") {
                                out.rename = Some(lit.value());
                            }
                            Ok(())
                        })?;
                    } else {
                        let lit: LitStr = meta.value()?.parse()?;
                        out.rename = Some(lit.value());
                    }
                } else if meta.path.is_ident("default") {
                    out.default = true;
                    if meta.input.peek(syn::Token![=]) {
                        let _: LitStr = meta.value()?.parse()?;
                    }
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let _: proc_macro2::TokenStream = content.parse()?;
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

fn get_input_period(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut period = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("input")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("period") {
                let lit: LitStr = meta.value()?.parse()?;
                match lit.value().as_str() {
                    "month" | "year" => period = Some(lit.value()),
                    other => {
                        return Err(meta.error(format!(
                            "unsupported period `{other}`, expected `month` or `year`"
                        )))
                    }
                }
                Ok(())
            } else {
                Err(meta.error("unsupported input attribute"))
            }
        })?;
    }
    Ok(period)
}

fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
