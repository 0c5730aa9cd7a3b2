use framebridge_protocol::EmbedConfig;

/// Style rules for one embed, scoped by its container id.
///
/// The container spans the available width and keeps a gap towards the
/// anchor on the side it was placed. The iframe has no border and a minimum
/// height of [`EmbedConfig::min_height`]; its actual height is set inline by
/// the controller.
pub fn stylesheet(config: &EmbedConfig) -> String {
    let id = config.embed_id.container_id();
    let min_height = config.min_height;

    format!(
        "#{id}{{width:100%;max-width:100%;margin:0 auto;box-sizing:border-box;position:relative;}}\
         #{id}[data-placement=\"above\"]{{margin-bottom:1.5rem;}}\
         #{id}[data-placement=\"below\"]{{margin-top:1.5rem;}}\
         #{id} iframe{{width:100%;min-height:{min_height}px;border:0;display:block;background:transparent;}}"
    )
}
