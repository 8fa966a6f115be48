//! `#[base_entity]` injects the shared `id` / `created_at` / `updated_at`
//! columns into a sea-orm model and wires the DAO hooks for them.
//!
//! ```ignore
//! #[base_entity]
//! #[sea_orm::model]
//! #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
//! #[sea_orm(table_name = "recipes")]
//! pub struct Model {
//!     pub name: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Expr, ExprLit, Field, Fields, FieldsNamed, Ident, ItemStruct, Lit, LitStr, Meta, Path, Token,
    parse_macro_input, parse_quote, punctuated::Punctuated,
};

const DEFAULT_TRAITS_PATH: &str = "crate::db::dao::base_traits";

struct BaseColumns {
    traits_path: Path,
    active_model: Ident,
    id: Ident,
    created_at: Ident,
    updated_at: Ident,
}

impl BaseColumns {
    fn new() -> syn::Result<Self> {
        let ident = |name: &str| Ident::new(name, Span::call_site());
        Ok(Self {
            traits_path: syn::parse_str(DEFAULT_TRAITS_PATH)?,
            active_model: ident("ActiveModel"),
            id: ident("id"),
            created_at: ident("created_at"),
            updated_at: ident("updated_at"),
        })
    }

    fn configure(&mut self, args: Punctuated<Meta, Token![,]>) -> syn::Result<()> {
        for meta in args {
            let (key, value) = name_value(meta)?;
            match key.to_string().as_str() {
                "traits" => {
                    self.traits_path = value.parse::<Path>().map_err(|err| {
                        syn::Error::new(value.span(), format!("invalid traits path: {err}"))
                    })?;
                }
                "active_model" => self.active_model = Ident::new(&value.value(), value.span()),
                "id" => self.id = Ident::new(&value.value(), value.span()),
                "created_at" => self.created_at = Ident::new(&value.value(), value.span()),
                "updated_at" => self.updated_at = Ident::new(&value.value(), value.span()),
                _ => {
                    return Err(syn::Error::new_spanned(
                        key,
                        "unknown base_entity key (expected traits, active_model, id, created_at or updated_at)",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Prepends whichever base columns the struct does not declare itself.
    fn inject(&self, fields: &mut FieldsNamed) {
        let declared = |ident: &Ident| {
            fields
                .named
                .iter()
                .any(|field| field.ident.as_ref() == Some(ident))
        };

        let mut injected: Vec<Field> = Vec::new();
        if !declared(&self.id) {
            let id = &self.id;
            injected.push(parse_quote! {
                #[sea_orm(primary_key, auto_increment = false)]
                pub #id: uuid::Uuid
            });
        }
        for stamp in [&self.created_at, &self.updated_at] {
            if !declared(stamp) {
                injected.push(parse_quote! {
                    #[sea_orm(default_expr = "Expr::current_timestamp()")]
                    pub #stamp: sea_orm::entity::prelude::DateTimeWithTimeZone
                });
            }
        }

        let existing = std::mem::take(&mut fields.named);
        fields.named = injected.into_iter().chain(existing).collect();
    }
}

#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut input = parse_macro_input!(item as ItemStruct);

    match expand(args, &mut input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(
    args: Punctuated<Meta, Token![,]>,
    input: &mut ItemStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let mut columns = BaseColumns::new()?;
    columns.configure(args)?;

    let Fields::Named(fields) = &mut input.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "base_entity requires a struct with named fields",
        ));
    };
    columns.inject(fields);

    let BaseColumns {
        traits_path,
        active_model,
        id,
        created_at,
        updated_at,
    } = columns;
    let id_variant = column_variant(&id);
    let created_at_variant = column_variant(&created_at);

    Ok(quote! {
        #input

        impl #traits_path::HasBaseColumns for Entity {
            fn id_column() -> Column {
                Column::#id_variant
            }

            fn created_at_column() -> Column {
                Column::#created_at_variant
            }
        }

        impl #traits_path::HasIdActiveModel for #active_model {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.#id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits_path::TimestampedActiveModel for #active_model {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.#updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }
    })
}

fn name_value(meta: Meta) -> syn::Result<(Ident, LitStr)> {
    let Meta::NameValue(pair) = meta else {
        return Err(syn::Error::new_spanned(
            meta,
            "expected name-value pair, e.g. traits = \"path::to::traits\"",
        ));
    };
    let Some(key) = pair.path.get_ident().cloned() else {
        return Err(syn::Error::new_spanned(
            pair.path,
            "expected simple identifier for attribute key",
        ));
    };
    match pair.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok((key, value)),
        other => Err(syn::Error::new_spanned(
            other,
            "expected string literal for attribute value",
        )),
    }
}

/// `created_at` -> `CreatedAt`, matching the `Column` enum sea-orm derives.
fn column_variant(field: &Ident) -> Ident {
    let camel: String = field
        .to_string()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    Ident::new(&camel, field.span())
}
