//! Links mailed to users
//!
//! The token travels in the `token` query parameter of a configured base URL.

use kernel::error::{
    app_error::{AppResult, ResultExt},
    kind::{ErrorKind, Layer},
};
use url::Url;

/// Append `token=<token>` to `base`, keeping any existing query
pub(crate) fn link_with_token(base: &str, token: &str) -> AppResult<String> {
    let mut url = Url::parse(base).map_app_err(Layer::Service, ErrorKind::InternalService)?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url.into())
}
