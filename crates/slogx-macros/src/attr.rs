//! Attribute parsing for `#[inspect(...)]`.

use syn::{Attribute, LitStr, Path};

/// Options recognised on the deriving type.
#[allow(clippy::redundant_pub_crate)]
pub(crate) struct ContainerAttrs {
    pub(crate) krate: Path,
}

impl ContainerAttrs {
    #[allow(clippy::redundant_pub_crate)]
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut krate: Option<Path> = None;
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("inspect")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    let value: LitStr = meta.value()?.parse()?;
                    krate = Some(value.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported container attribute, expected `crate`"))
                }
            })?;
        }
        Ok(Self {
            krate: krate.unwrap_or_else(|| syn::parse_quote!(::slogx)),
        })
    }
}

/// Options recognised on fields and variants.
#[derive(Default)]
#[allow(clippy::redundant_pub_crate)]
pub(crate) struct MemberAttrs {
    pub(crate) skip: bool,
    pub(crate) rename: Option<String>,
}

impl MemberAttrs {
    #[allow(clippy::redundant_pub_crate)]
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("inspect")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported attribute, expected `skip` or `rename`"))
                }
            })?;
        }
        Ok(parsed)
    }
}
