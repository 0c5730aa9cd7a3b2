use framebridge_host::{RetryPolicy, stylesheet};
use framebridge_protocol::{
    EMBED_ID_PARAM, EmbedConfig, EmbedId, HEIGHT_MESSAGE_TYPE, HEIGHT_POLL_INTERVAL, HYSTERESIS_PX,
    LOAD_SETTLE_DELAY, MOUNT_RETRY_DELAY, SCROLL_MESSAGE_TYPE,
};
use serde::Serialize;
use url::Url;

use crate::GeneratorError;

/// Script run by the host page.
pub const HOST_TEMPLATE: &str = include_str!("templates/host.js");

/// Script run by the embedded page.
pub const EMBEDDED_TEMPLATE: &str = include_str!("templates/embedded.js");

const PLACEHOLDER_START: &str = "__FB_";
const PLACEHOLDER_END: &str = "__";

/// Serialize `value` as a JavaScript expression that is safe inside an
/// inline `<script>` element.
///
/// `<`, `>` and `&` are written as `\u` escapes, so no string can close the
/// element or open a comment. U+2028 and U+2029 are escaped as well, since
/// older engines treat them as line terminators inside string literals.
pub fn script_json<T: Serialize + ?Sized>(what: &'static str, value: &T) -> Result<String, GeneratorError> {
    let json = serde_json::to_string_pretty(value).map_err(|error| GeneratorError::Serialize {
        what,
        reason: error.to_string(),
    })?;

    let mut escaped = String::with_capacity(json.len());
    for character in json.chars() {
        match character {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            other => escaped.push(other),
        }
    }

    Ok(escaped)
}

/// Replace every `__FB_<NAME>__` placeholder of `template` in a single pass.
///
/// Substituted text is never scanned again, so a value that happens to
/// contain a placeholder is emitted verbatim.
pub fn fill(template: &str, values: &[(&str, String)]) -> Result<String, GeneratorError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(PLACEHOLDER_START) {
        output.push_str(&rest[..start]);

        let after = &rest[start + PLACEHOLDER_START.len()..];
        let Some(end) = after.find(PLACEHOLDER_END) else {
            return Err(GeneratorError::UnknownPlaceholder(rest[start..].to_owned()));
        };

        let name = &after[..end];
        let value = values
            .iter()
            .find_map(|(key, value)| (*key == name).then_some(value))
            .ok_or_else(|| GeneratorError::UnknownPlaceholder(format!("__FB_{name}__")))?;

        output.push_str(value);
        rest = &after[end + PLACEHOLDER_END.len()..];
    }

    output.push_str(rest);
    Ok(output.trim_end().to_owned())
}

/// `url` with the `ghlEmbedId` query parameter set to `embed_id`.
///
/// An existing value is replaced in place (extra occurrences are dropped);
/// otherwise the parameter is appended. Other parameters keep their order.
pub fn iframe_src(url: &Url, embed_id: &EmbedId) -> Url {
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(name, value)| {
            if name != EMBED_ID_PARAM {
                return Some((name.into_owned(), value.into_owned()));
            }
            if replaced {
                return None;
            }
            replaced = true;
            Some((name.into_owned(), embed_id.to_string()))
        })
        .collect();

    let mut src = url.clone();
    {
        let mut query = src.query_pairs_mut();
        query.clear().extend_pairs(&pairs);
        if !replaced {
            query.append_pair(EMBED_ID_PARAM, embed_id);
        }
    }
    src
}

fn protocol_values() -> Result<Vec<(&'static str, String)>, GeneratorError> {
    Ok(vec![
        ("HEIGHT_TYPE", script_json("message type", HEIGHT_MESSAGE_TYPE)?),
        ("SCROLL_TYPE", script_json("message type", SCROLL_MESSAGE_TYPE)?),
        ("EMBED_ID_PARAM", script_json("query parameter", EMBED_ID_PARAM)?),
        ("HYSTERESIS", HYSTERESIS_PX.to_string()),
        ("RETRY_DELAY", MOUNT_RETRY_DELAY.as_millis().to_string()),
        (
            "MAX_ATTEMPTS",
            script_json("retry cap", &RetryPolicy::default().max_attempts)?,
        ),
        ("POLL_INTERVAL", HEIGHT_POLL_INTERVAL.as_millis().to_string()),
        ("LOAD_DELAY", LOAD_SETTLE_DELAY.as_millis().to_string()),
    ])
}

/// The host-page snippet for `config`.
pub fn host_snippet(config: &EmbedConfig) -> Result<String, GeneratorError> {
    let mut values = protocol_values()?;
    values.push(("CONFIG", script_json("embed config", config)?));
    values.push(("STYLE", script_json("style sheet", &stylesheet(config))?));

    fill(HOST_TEMPLATE, &values)
}

/// The embedded-page snippet for `config`. Only the embed id and the button
/// classes are carried over.
pub fn embedded_snippet(config: &EmbedConfig) -> Result<String, GeneratorError> {
    let mut values = protocol_values()?;
    values.push(("EMBED_ID", script_json("embed id", &config.embed_id)?));
    values.push(("BUTTON_CLASSES", script_json("button classes", &config.button_classes)?));

    fill(EMBEDDED_TEMPLATE, &values)
}
