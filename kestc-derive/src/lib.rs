use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Type};

/// Derives a static CSV column listing from a record struct.
///
/// The column name respects `#[serde(rename = "...")]`, `Option<T>` fields
/// become optional columns, and each column's help text is taken from the
/// field's doc comment. Generates `fn csv_columns() -> &'static [CsvColumn]`;
/// the deriving module must have a `CsvColumn { name, required, help }` type
/// in scope.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = &input.ident;

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("CsvSchema requires named struct fields"),
        },
        _ => panic!("CsvSchema can only be derived for structs"),
    };

    let columns = named.iter().map(|field| {
        let name = column_name(field);
        let required = !is_option(&field.ty);
        let help = doc_text(&field.attrs);
        quote! {
            CsvColumn { name: #name, required: #required, help: #help }
        }
    });

    let expanded = quote! {
        impl #ident {
            pub fn csv_columns() -> &'static [CsvColumn] {
                static COLUMNS: &[CsvColumn] = &[#(#columns),*];
                COLUMNS
            }
        }
    };
    expanded.into()
}

/// Column name for a field: the `serde(rename = "...")` value if present,
/// otherwise the field identifier.
fn column_name(field: &syn::Field) -> String {
    let mut renamed = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        // Unrecognized serde entries are skipped; a parse failure just means
        // no rename was found.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                renamed = Some(lit.value());
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    renamed.unwrap_or_else(|| field.ident.as_ref().unwrap().to_string())
}

fn is_option(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.path.segments.last().is_some_and(|s| s.ident == "Option"))
}

fn doc_text(attrs: &[syn::Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let syn::Meta::NameValue(nv) = &attr.meta {
            if let syn::Expr::Lit(lit) = &nv.value {
                if let syn::Lit::Str(s) = &lit.lit {
                    lines.push(s.value().trim().to_string());
                }
            }
        }
    }
    lines.join(" ")
}
