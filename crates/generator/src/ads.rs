// Sidebar ad slot. Without a configured client and slot the container
// shows a placeholder; missing ad config never fails a render.

use crate::template::html_escape;
use jobspot_core::AdsConfig;

const ADSENSE_SCRIPT_URL: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";

/// `<script>` tag for the `<head>`, only when ads are configured
pub fn ads_script(ads: &AdsConfig) -> Option<String> {
    let (client, _) = ads.slot()?;
    Some(format!(
        r#"<script async src="{}?client={}" crossorigin="anonymous"></script>"#,
        ADSENSE_SCRIPT_URL,
        html_escape(client)
    ))
}

/// The sidebar ad container
pub fn ad_container(ads: &AdsConfig) -> String {
    let inner = match ads.slot() {
        Some((client, slot)) => format!(
            r#"<ins class="adsbygoogle" style="display:block" data-ad-client="{}" data-ad-slot="{}" data-ad-format="auto" data-full-width-responsive="true"></ins>
            <script>(adsbygoogle = window.adsbygoogle || []).push({{}});</script>"#,
            html_escape(client),
            html_escape(slot)
        ),
        None => r#"<span class="ad-placeholder">Advertisement</span>"#.to_string(),
    };

    format!(r#"<div class="ad-container">{}</div>"#, inner)
}
