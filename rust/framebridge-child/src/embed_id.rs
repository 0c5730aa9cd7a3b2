use framebridge_protocol::{EMBED_ID_PARAM, EmbedId};
use url::form_urlencoded;

/// The embed id the reporter should use.
///
/// A non-empty `ghlEmbedId` parameter in the document's query string wins, so
/// a page previewed outside the generated payload still pairs with the host
/// that loaded it. Otherwise the id baked into the payload is used. `search`
/// is `location.search`, with or without its leading `?`.
pub fn resolve_embed_id(search: &str, baked: &EmbedId) -> EmbedId {
    let query = search.strip_prefix('?').unwrap_or(search);

    let Some(value) = form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == EMBED_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
    else {
        return baked.clone();
    };

    match value.parse::<EmbedId>() {
        Ok(embed_id) => embed_id,
        Err(error) => {
            tracing::warn!(%error, "Ignoring embed id from the query string");
            baked.clone()
        }
    }
}
