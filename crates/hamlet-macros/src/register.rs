use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Ident, ItemFn, LitBool, LitStr};

/// Which link-time table a handler goes into.
#[derive(Clone, Copy)]
pub enum Kind {
    Command,
    Event,
}

impl Kind {
    fn attr(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Event => "event",
        }
    }
}

/// Arguments accepted by `#[command(...)]` and `#[event(...)]`.
#[derive(Default)]
pub struct Args {
    name: Option<LitStr>,
    description: Option<LitStr>,
    once: bool,
}

impl Args {
    pub fn parse(&mut self, kind: Kind, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("description") && matches!(kind, Kind::Command) {
            self.description = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("once") && matches!(kind, Kind::Event) {
            self.once = if meta.input.peek(syn::Token![=]) {
                meta.value()?.parse::<LitBool>()?.value
            } else {
                true
            };
        } else {
            let expected = match kind {
                Kind::Command => "`name` or `description`",
                Kind::Event => "`name` or `once`",
            };
            return Err(meta.error(format!(
                "unsupported #[{}] argument, expected {expected}",
                kind.attr()
            )));
        }
        Ok(())
    }
}

/// Leaves the decorated `async fn` unchanged and appends a
/// `distributed_slice` static that registers it with `hamlet-framework`.
pub fn expand(kind: Kind, args: Args, func: ItemFn) -> TokenStream {
    if func.sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            func.sig.fn_token,
            format!("#[{}] can only be applied to an `async fn`", kind.attr()),
        )
        .into_compile_error();
    }

    let fn_name = &func.sig.ident;
    let fn_name_upper = fn_name.to_string().to_uppercase();
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&fn_name.to_string(), fn_name.span()));
    let fn_name_str = fn_name.to_string();

    let (static_name, slice, body_ty, body) = match kind {
        Kind::Command => {
            let description = args
                .description
                .unwrap_or_else(|| LitStr::new("", Span::call_site()));
            (
                Ident::new(&format!("_HAMLET_COMMAND_{fn_name_upper}"), Span::call_site()),
                quote!(::hamlet_framework::plugin::COMMANDS),
                quote!(::hamlet_framework::plugin::CommandRegistration),
                quote! {
                    ::hamlet_framework::plugin::CommandRegistration {
                        origin: ::core::concat!(::core::module_path!(), "::", #fn_name_str),
                        name: #name,
                        description: #description,
                        handler: |ctx| ::hamlet_framework::__private::futures::FutureExt::boxed(#fn_name(ctx)),
                    }
                },
            )
        }
        Kind::Event => {
            let once = args.once;
            (
                Ident::new(&format!("_HAMLET_EVENT_{fn_name_upper}"), Span::call_site()),
                quote!(::hamlet_framework::plugin::EVENTS),
                quote!(::hamlet_framework::plugin::EventRegistration),
                quote! {
                    ::hamlet_framework::plugin::EventRegistration {
                        origin: ::core::concat!(::core::module_path!(), "::", #fn_name_str),
                        name: #name,
                        once: #once,
                        handler: |args| ::hamlet_framework::__private::futures::FutureExt::boxed(#fn_name(args)),
                    }
                },
            )
        }
    };

    quote! {
        #func

        #[::hamlet_framework::__private::linkme::distributed_slice(#slice)]
        #[linkme(crate = ::hamlet_framework::__private::linkme)]
        static #static_name: #body_ty = #body;
    }
}
